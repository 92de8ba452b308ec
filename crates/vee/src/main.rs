//! # vee
//!
//! Command-line front end for the Vee chatbot backend: one-shot answering
//! (text, image, voice) plus the operational log-inspection commands.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use vee_core::text::truncate_with_suffix;
use vee_core::time::today_utc;
use vee_llm::{LlmConfig, OpenAiClient};
use vee_log::{ConversationLog, FsMirrorSink, MirrorSink};
use vee_memory::TurnStore;
use vee_retrieval::HttpVectorIndex;
use vee_runtime::{ChatEngine, ChatRequest, EngineConfig, ImageRequest};
use vee_settings::{get_settings, VeeSettings};
use vee_voice::{detect_format, validate_audio_size, OpenAiSpeechClient, SpeechClient, SpeechConfig};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Vee chatbot backend.
#[derive(Parser, Debug)]
#[command(name = "vee", about = "Retrieval-augmented food/nutrition chatbot")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask a text question.
    Chat {
        /// The question.
        question: String,
        /// Acting user id.
        #[arg(long)]
        user: Option<String>,
        /// Conversation to continue (generated if omitted).
        #[arg(long)]
        conversation: Option<String>,
    },
    /// Ask a question about an image file.
    ChatImage {
        /// Path to a JPEG image.
        image: PathBuf,
        /// The question about the image.
        #[arg(long, default_value = "What is in this image? Estimate the calories.")]
        question: String,
        /// Acting user id.
        #[arg(long)]
        user: Option<String>,
        /// Conversation to continue (generated if omitted).
        #[arg(long)]
        conversation: Option<String>,
        /// Stored image URL to record for follow-up context.
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Reconstruct a user's history as prompt-ready turns.
    History {
        /// User id.
        #[arg(long)]
        user: String,
        /// Day window (-1 for unbounded).
        #[arg(long, default_value_t = 7)]
        days: i64,
        /// Maximum turns.
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// List a user's conversations, most recently updated first.
    Conversations {
        /// User id.
        #[arg(long)]
        user: String,
        /// Maximum conversations.
        #[arg(long, default_value_t = 100)]
        max: usize,
        /// Print one conversation's messages instead of the list.
        #[arg(long)]
        show: Option<String>,
    },
    /// Inspect the raw conversation log.
    Logs {
        /// Day to inspect (YYYY-MM-DD, default today).
        #[arg(long)]
        date: Option<String>,
        /// Entries to show from the end of the file.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Transcribe an audio file.
    Transcribe {
        /// Path to the audio file (webm/mp3/wav/m4a/ogg).
        audio: PathBuf,
    },
    /// Synthesize speech for a text.
    Speak {
        /// The text to speak.
        text: String,
        /// Output MP3 path.
        #[arg(long, default_value = "speech.mp3")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    vee_core::logging::init_tracing();
    let settings = get_settings();

    match Cli::parse().command {
        Command::Chat {
            question,
            user,
            conversation,
        } => {
            let engine = build_engine(&settings)?;
            let conversation = conversation.unwrap_or_else(new_conversation_id);
            let answer = engine
                .answer(&ChatRequest {
                    question: &question,
                    user_id: user.as_deref(),
                    conversation_id: Some(&conversation),
                })
                .await?;
            println!("{answer}");
        }
        Command::ChatImage {
            image,
            question,
            user,
            conversation,
            image_url,
        } => {
            let bytes = std::fs::read(&image)
                .with_context(|| format!("failed to read image: {}", image.display()))?;
            let engine = build_engine(&settings)?;
            let conversation = conversation.unwrap_or_else(new_conversation_id);
            let answer = engine
                .answer_with_image(&ImageRequest {
                    image: &bytes,
                    question: &question,
                    user_id: user.as_deref(),
                    conversation_id: Some(&conversation),
                    image_url: image_url.as_deref(),
                })
                .await?;
            println!("{answer}");
        }
        Command::History { user, days, limit } => {
            let log = open_log(&settings)?;
            for turn in log.load_user_history_as_turns(&user, days, limit) {
                println!("[{}]", turn.timestamp);
                println!("User: {}", turn.user);
                println!("Assistant: {}\n", turn.assistant);
            }
        }
        Command::Conversations { user, max, show } => {
            let log = open_log(&settings)?;
            match show {
                Some(conversation_id) => {
                    for msg in log.get_conversation_history(&conversation_id, &user) {
                        println!("[{}]", msg.timestamp);
                        println!("Q: {}", msg.question);
                        println!("A: {}", msg.answer);
                        if let Some(url) = &msg.image_url {
                            println!("image: {url}");
                        }
                        println!();
                    }
                }
                None => {
                    for s in log.list_user_conversations(&user, max) {
                        println!(
                            "{}  {} msgs  updated {}  {}",
                            s.conversation_id, s.message_count, s.last_updated, s.title
                        );
                    }
                }
            }
        }
        Command::Logs { date, limit } => {
            let log = open_log(&settings)?;
            let date = match date {
                Some(raw) => raw
                    .parse::<chrono::NaiveDate>()
                    .with_context(|| format!("invalid date: {raw}"))?,
                None => today_utc(),
            };
            print_day_file(&log, date, limit)?;
        }
        Command::Transcribe { audio } => {
            let bytes = std::fs::read(&audio)
                .with_context(|| format!("failed to read audio: {}", audio.display()))?;
            validate_audio_size(&bytes)?;
            let format = detect_format(None, audio.file_name().and_then(|n| n.to_str()))?;
            let client = build_speech_client(&settings)?;
            let transcript = client.speech_to_text(&bytes, format).await?;
            println!("[{}] {}", transcript.language, transcript.text);
        }
        Command::Speak { text, out } => {
            let client = build_speech_client(&settings)?;
            let audio = client.text_to_speech(&text).await?;
            std::fs::write(&out, &audio)
                .with_context(|| format!("failed to write audio: {}", out.display()))?;
            println!("wrote {} bytes to {}", audio.len(), out.display());
        }
    }

    Ok(())
}

fn new_conversation_id() -> String {
    Uuid::now_v7().to_string()
}

fn open_log(settings: &VeeSettings) -> Result<Arc<ConversationLog>> {
    let mut log = ConversationLog::new(&settings.log.dir)
        .with_context(|| format!("failed to open log dir: {}", settings.log.dir.display()))?;
    if settings.log.mirror.enabled {
        let sink: Arc<dyn MirrorSink> = Arc::new(FsMirrorSink::new(&settings.log.mirror.root));
        log = log.with_mirror(sink, settings.log.mirror.prefix.clone());
    }
    Ok(Arc::new(log))
}

fn build_engine(settings: &VeeSettings) -> Result<ChatEngine> {
    let store = Arc::new(TurnStore::new(settings.memory.max_age_hours));
    let log = open_log(settings)?;
    let index = Arc::new(HttpVectorIndex::new(
        settings.retrieval.base_url.clone(),
        settings.retrieval.collection.clone(),
    )?);
    let llm = Arc::new(OpenAiClient::new(LlmConfig {
        model: settings.llm.model.clone(),
        vision_model: settings.llm.vision_model.clone(),
        base_url: settings.llm.base_url.clone(),
        api_key: settings.llm.api_key.clone(),
        timeout_seconds: settings.llm.timeout_seconds,
    })?);
    Ok(ChatEngine::new(
        EngineConfig {
            model: settings.llm.model.clone(),
            vision_model: settings.llm.vision_model.clone(),
            temperature: settings.llm.temperature as f32,
            max_documents: settings.retrieval.max_documents,
            max_history_turns: settings.memory.max_history_turns,
            history_days: settings.memory.history_days,
        },
        store,
        log,
        index,
        llm,
    ))
}

fn build_speech_client(settings: &VeeSettings) -> Result<OpenAiSpeechClient> {
    Ok(OpenAiSpeechClient::new(SpeechConfig {
        stt_model: settings.voice.stt_model.clone(),
        tts_model: settings.voice.tts_model.clone(),
        tts_voice: settings.voice.tts_voice.clone(),
        base_url: settings.llm.base_url.clone(),
        api_key: settings.llm.api_key.clone(),
    })?)
}

fn print_day_file(log: &ConversationLog, date: chrono::NaiveDate, limit: usize) -> Result<()> {
    let path = log.day_file(date);
    if !path.exists() {
        println!("no logs for {date}");
        return Ok(());
    }
    let raw = std::fs::read_to_string(&path)?;
    let lines: Vec<&str> = raw.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(limit);
    for (i, line) in lines[start..].iter().enumerate() {
        let Ok(entry) = serde_json::from_str::<serde_json::Value>(line) else {
            println!("[{}] <malformed line>", start + i + 1);
            continue;
        };
        println!(
            "\n[{}] {}",
            start + i + 1,
            entry["timestamp"].as_str().unwrap_or("?")
        );
        if let Some(user) = entry["user_id"].as_str() {
            println!("user: {user}");
        }
        println!("Q: {}", entry["question"].as_str().unwrap_or(""));
        println!(
            "A: {}",
            truncate_with_suffix(entry["answer"].as_str().unwrap_or(""), 100, "...")
        );
        println!(
            "food-related: {} | docs: {} | history: {}",
            entry["is_food_related"], entry["num_retrieved_docs"], entry["history_length"]
        );
    }
    println!("\nshowing {} of {} entries", lines.len().min(limit), lines.len());
    Ok(())
}
