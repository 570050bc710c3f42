//! Chat session - transcript state machine and assistant reply task
//!
//! `ChatSession` holds the visible transcript: an append-only message list,
//! the one-time welcome placeholder, and the singleton loading indicator.
//! `ChatController` drives it: sends append a user message and spawn a
//! cancellable reply task against the `AssistantBackend` seam. The backend
//! shipped here is a placeholder that answers with canned text after a fixed
//! delay; swapping in a real AI backend means implementing the trait.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Canned reply used until a real AI backend is connected.
pub const PLACEHOLDER_REPLY: &str =
    "I'm a placeholder response. Connect me to your AI backend to get real responses!";

/// Simulated thinking time for the placeholder backend.
const PLACEHOLDER_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    pub role: Role,
}

/// Full render state pushed to the shell after every mutation. The shell
/// re-renders from this alone and always scrolls to the latest entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSnapshot {
    pub messages: Vec<ChatMessage>,
    pub welcome_visible: bool,
    pub loading: bool,
}

/// Receives render-state updates; the Tauri layer forwards them to the
/// webview as `chat-updated` events.
pub trait ChatEvents: Send + Sync {
    fn chat_updated(&self, snapshot: ChatSnapshot);
}

/// The seam where a real backend call gets substituted for the placeholder.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    async fn reply(&self, prompt: &str) -> anyhow::Result<String>;
}

/// Stand-in backend: waits the fixed delay, then returns the canned reply.
pub struct PlaceholderBackend;

#[async_trait]
impl AssistantBackend for PlaceholderBackend {
    async fn reply(&self, _prompt: &str) -> anyhow::Result<String> {
        tokio::time::sleep(PLACEHOLDER_DELAY).await;
        Ok(PLACEHOLDER_REPLY.to_string())
    }
}

#[derive(Debug)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    welcome_visible: bool,
    loading: bool,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            welcome_visible: true,
            loading: false,
        }
    }
}

impl ChatSession {
    /// Append a transcript entry. The first real message of either role
    /// retires the welcome placeholder for good.
    pub fn add_message(&mut self, text: impl Into<String>, role: Role) {
        self.welcome_visible = false;
        self.messages.push(ChatMessage {
            text: text.into(),
            role,
        });
    }

    /// The indicator is a singleton; showing it twice is a no-op.
    pub fn show_loading(&mut self) {
        self.loading = true;
    }

    /// No-ops when the indicator is already absent.
    pub fn hide_loading(&mut self) {
        self.loading = false;
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        ChatSnapshot {
            messages: self.messages.clone(),
            welcome_visible: self.welcome_visible,
            loading: self.loading,
        }
    }
}

pub struct ChatController {
    session: Arc<Mutex<ChatSession>>,
    backend: Arc<dyn AssistantBackend>,
    events: Arc<dyn ChatEvents>,
    cancel: CancellationToken,
}

impl ChatController {
    pub fn new(backend: Arc<dyn AssistantBackend>, events: Arc<dyn ChatEvents>) -> Self {
        Self {
            session: Arc::new(Mutex::new(ChatSession::default())),
            backend,
            events,
            cancel: CancellationToken::new(),
        }
    }

    /// Append the user's message and start the reply task. Returns `false`
    /// when the trimmed input is empty and nothing happened; the shell uses
    /// the return value to decide whether to clear the input box.
    pub async fn send_message(&self, input: &str) -> bool {
        let text = input.trim();
        if text.is_empty() {
            return false;
        }
        {
            let mut session = self.session.lock().await;
            session.add_message(text, Role::User);
            session.show_loading();
            self.events.chat_updated(session.snapshot());
        }
        self.spawn_reply(text.to_string());
        true
    }

    pub async fn snapshot(&self) -> ChatSnapshot {
        self.session.lock().await.snapshot()
    }

    /// Tear down the view. Any in-flight reply task stops at the next await
    /// point and still clears the loading indicator on its way out.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    fn spawn_reply(&self, prompt: String) {
        let session = Arc::clone(&self.session);
        let backend = Arc::clone(&self.backend);
        let events = Arc::clone(&self.events);
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            let reply = tokio::select! {
                () = cancel.cancelled() => None,
                reply = backend.reply(&prompt) => Some(reply),
            };
            // the indicator comes down on every exit path: success, backend
            // failure, and cancellation alike
            let mut session = session.lock().await;
            session.hide_loading();
            match reply {
                Some(Ok(text)) => session.add_message(text, Role::Assistant),
                Some(Err(e)) => log::warn!("assistant backend failed: {e}"),
                None => {}
            }
            events.chat_updated(session.snapshot());
        });
    }
}
