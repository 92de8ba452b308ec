//! Chat message types for the completion service wire format.
//!
//! Messages serialize to the OpenAI-compatible chat schema: plain text
//! content is a JSON string, vision content is an array of typed blocks.

use base64::Engine;
use serde::{Deserialize, Serialize};

/// Message author role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions.
    System,
    /// End-user input.
    User,
    /// Model output.
    Assistant,
}

/// Message content: plain text or a list of content blocks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text content.
    Text(String),
    /// Mixed content blocks (text + images).
    Blocks(Vec<ContentBlock>),
}

/// One block of mixed message content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// A text block.
    Text {
        /// The text.
        text: String,
    },
    /// An image reference (data URI or URL).
    ImageUrl {
        /// The image reference.
        image_url: ImageUrl,
    },
}

/// Image reference wrapper, matching the completion API shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    /// Data URI or remote URL.
    pub url: String,
}

/// One message in a completion request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author role.
    pub role: Role,
    /// Message content.
    pub content: MessageContent,
}

impl ChatMessage {
    /// System message with plain text content.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(text.into()),
        }
    }

    /// User message with plain text content.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Assistant message with plain text content.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Text(text.into()),
        }
    }

    /// User message pairing a prompt with a base64-encoded JPEG image.
    pub fn user_with_image(text: impl Into<String>, image_base64: &str) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Blocks(vec![
                ContentBlock::Text { text: text.into() },
                ContentBlock::ImageUrl {
                    image_url: ImageUrl {
                        url: format!("data:image/jpeg;base64,{image_base64}"),
                    },
                },
            ]),
        }
    }
}

/// Base64-encode raw image bytes for a vision request.
pub fn encode_image_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_message_serializes_as_string_content() {
        let msg = ChatMessage::user("hello");
        let val = serde_json::to_value(&msg).unwrap();
        assert_eq!(val["role"], "user");
        assert_eq!(val["content"], "hello");
    }

    #[test]
    fn system_role_is_lowercase() {
        let val = serde_json::to_value(ChatMessage::system("s")).unwrap();
        assert_eq!(val["role"], "system");
    }

    #[test]
    fn image_message_serializes_blocks() {
        let msg = ChatMessage::user_with_image("what is this?", "AAAA");
        let val = serde_json::to_value(&msg).unwrap();
        let blocks = val["content"].as_array().unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0]["type"], "text");
        assert_eq!(blocks[0]["text"], "what is this?");
        assert_eq!(blocks[1]["type"], "image_url");
        assert_eq!(blocks[1]["image_url"]["url"], "data:image/jpeg;base64,AAAA");
    }

    #[test]
    fn encode_image_round_trips() {
        let encoded = encode_image_base64(b"\xff\xd8\xff");
        assert_eq!(encoded, "/9j/");
    }
}
