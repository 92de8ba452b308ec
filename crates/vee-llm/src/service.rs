//! Chat client trait and mock implementation.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use vee_core::messages::ChatMessage;

use crate::errors::{LlmError, Result};

/// Trait for the completion service.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Run a chat completion over `messages` and return the answer text.
    async fn chat(&self, messages: &[ChatMessage], temperature: f32) -> Result<String>;

    /// Ask the vision model about a base64-encoded JPEG image.
    async fn analyze_image(&self, image_base64: &str, prompt: &str) -> Result<String>;
}

/// Scriptable mock client for testing.
///
/// Replies are served from a FIFO queue; an exhausted queue fails the call,
/// so a test that under-scripts its scenario fails loudly. Every request's
/// messages are recorded for assertion.
#[derive(Default)]
pub struct MockChatClient {
    replies: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockChatClient {
    /// Create a mock with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply.
    pub fn push_reply(&self, text: impl Into<String>) {
        self.replies.lock().push_back(Ok(text.into()));
    }

    /// Queue a failure.
    pub fn push_error(&self, err: LlmError) {
        self.replies.lock().push_back(Err(err));
    }

    /// All message lists this mock has been called with, in order.
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().clone()
    }

    fn next_reply(&self) -> Result<String> {
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::InvalidResponse("mock script exhausted".into())))
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn chat(&self, messages: &[ChatMessage], _temperature: f32) -> Result<String> {
        self.requests.lock().push(messages.to_vec());
        self.next_reply()
    }

    async fn analyze_image(&self, image_base64: &str, prompt: &str) -> Result<String> {
        self.requests
            .lock()
            .push(vec![ChatMessage::user_with_image(prompt, image_base64)]);
        self.next_reply()
    }
}
