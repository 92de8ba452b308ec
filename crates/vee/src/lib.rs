//! # vee
//!
//! Unified entry point for the Vee chatbot backend: re-exports the public
//! surface of every member crate so embedders depend on one crate.

#![deny(unsafe_code)]

pub use vee_core::messages::{ChatMessage, ContentBlock, MessageContent, Role};
pub use vee_core::turns::{HistoricalTurn, Turn};
pub use vee_llm::{ChatClient, LlmConfig, LlmError, MockChatClient, OpenAiClient};
pub use vee_log::{
    AppendRequest, ConversationLog, ConversationMessage, ConversationSummary, FsMirrorSink,
    LogEntry, LogError, MirrorSink,
};
pub use vee_memory::TurnStore;
pub use vee_retrieval::{Document, HttpVectorIndex, MockVectorIndex, RetrievalError, VectorIndex};
pub use vee_runtime::{
    ChatEngine, ChatError, ChatRequest, EngineConfig, ImageRequest, is_food_related,
};
pub use vee_settings::{get_settings, VeeSettings};
pub use vee_voice::{
    detect_format, validate_audio_size, AudioFormat, OpenAiSpeechClient, SpeechClient,
    SpeechConfig, Transcript, VoiceError,
};
