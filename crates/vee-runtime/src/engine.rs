//! The [`ChatEngine`] — the answering flows and their write-back contract.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::{debug, info, instrument, warn};

use vee_core::messages::{encode_image_base64, ChatMessage};
use vee_core::turns::Turn;
use vee_llm::ChatClient;
use vee_log::{AppendRequest, ConversationLog};
use vee_memory::TurnStore;
use vee_retrieval::VectorIndex;

use crate::errors::Result;
use crate::gate::is_food_related;
use crate::prompt::{
    build_chat_prompt, build_off_topic_prompt, CALORIE_FOCUS_PROMPT, IMAGE_ANALYSIS_PROMPT,
    IMAGE_DECLINED_ANSWER, IMAGE_SCOPE_CHECK_PROMPT, SYSTEM_PROMPT,
};

/// Tunables the engine reads once at construction.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Chat model name, recorded in log metadata.
    pub model: String,
    /// Vision model name, recorded in image-turn log metadata.
    pub vision_model: String,
    /// Sampling temperature for chat completions.
    pub temperature: f32,
    /// Documents to retrieve per question.
    pub max_documents: usize,
    /// Cap on history turns fed into the prompt.
    pub max_history_turns: usize,
    /// Day window for reconstructed history (`-1` = unbounded).
    pub history_days: i64,
}

/// One text question.
#[derive(Clone, Copy, Debug)]
pub struct ChatRequest<'a> {
    /// The question as asked.
    pub question: &'a str,
    /// Asking user, when known.
    pub user_id: Option<&'a str>,
    /// Conversation to continue, when the caller has one.
    pub conversation_id: Option<&'a str>,
}

/// One image question.
#[derive(Clone, Copy, Debug)]
pub struct ImageRequest<'a> {
    /// Raw image bytes (JPEG).
    pub image: &'a [u8],
    /// The question about the image.
    pub question: &'a str,
    /// Asking user, when known.
    pub user_id: Option<&'a str>,
    /// Conversation to continue, when the caller has one.
    pub conversation_id: Option<&'a str>,
    /// Stored image reference recorded in the log for follow-up context.
    pub image_url: Option<&'a str>,
}

/// Orchestrates one exchange end to end: history assembly, topic gating,
/// retrieval, the completion call, and the dual write-back.
///
/// Ordering contract: the completion call happens before any write-back,
/// and a turn that produced no answer is written nowhere. On success the
/// turn store is updated first (it is what the next request in the same
/// conversation reads), then the durable log; a log append failure
/// propagates after the in-memory state is already current.
pub struct ChatEngine {
    config: EngineConfig,
    store: Arc<TurnStore>,
    log: Arc<ConversationLog>,
    index: Arc<dyn VectorIndex>,
    llm: Arc<dyn ChatClient>,
}

impl ChatEngine {
    /// Assemble an engine from its collaborators.
    pub fn new(
        config: EngineConfig,
        store: Arc<TurnStore>,
        log: Arc<ConversationLog>,
        index: Arc<dyn VectorIndex>,
        llm: Arc<dyn ChatClient>,
    ) -> Self {
        Self {
            config,
            store,
            log,
            index,
            llm,
        }
    }

    /// Answer a text question.
    #[instrument(skip(self, req), fields(user_id = ?req.user_id, conversation_id = ?req.conversation_id))]
    pub async fn answer(&self, req: &ChatRequest<'_>) -> Result<String> {
        let food_related = is_food_related(req.question);
        let history = self.assemble_history(req.conversation_id, req.user_id);
        let history_length = history.len();

        let mut num_retrieved_docs = 0;
        let outcome = if food_related {
            let docs = self
                .index
                .query(req.question, self.config.max_documents)
                .await;
            match docs {
                Ok(docs) => {
                    num_retrieved_docs = docs.len();
                    let prompt = build_chat_prompt(req.question, &history, &docs);
                    self.chat(&prompt).await
                }
                Err(e) => Err(e.into()),
            }
        } else {
            debug!("question gated as off-topic");
            self.chat(&build_off_topic_prompt(req.question)).await
        };

        let answer = match outcome {
            Ok(answer) => answer,
            Err(e) => {
                let mut context = Map::new();
                let _ = context.insert("question".into(), json!(req.question));
                let _ = context.insert("is_food_related".into(), json!(food_related));
                let _ = context.insert("history_length".into(), json!(history_length));
                let _ = context.insert("user_id".into(), json!(req.user_id));
                self.log.log_error(&e, Some(&context));
                return Err(e);
            }
        };

        let mut metadata = Map::new();
        let _ = metadata.insert("model".into(), json!(self.config.model));
        let _ = metadata.insert("temperature".into(), json!(self.config.temperature));
        self.write_back(
            req.conversation_id,
            req.user_id,
            req.question,
            &answer,
            food_related,
            num_retrieved_docs,
            history_length,
            metadata,
        )?;

        info!(
            is_food_related = food_related,
            num_retrieved_docs, history_length, "question answered"
        );
        Ok(answer)
    }

    /// Answer a question about an uploaded image.
    ///
    /// The image is first checked for food content by the vision model; a
    /// non-food image gets a canned decline, which still counts as an
    /// answered (and logged) exchange. If the scope check itself fails, the
    /// image is assumed valid rather than rejecting the upload.
    #[instrument(skip(self, req), fields(user_id = ?req.user_id, conversation_id = ?req.conversation_id))]
    pub async fn answer_with_image(&self, req: &ImageRequest<'_>) -> Result<String> {
        let image_base64 = encode_image_base64(req.image);
        let logged_question = format!("[IMAGE] {}", req.question);

        let validated = self.is_food_image(&image_base64).await;
        if !validated {
            let answer = IMAGE_DECLINED_ANSWER.to_string();
            self.write_back(
                req.conversation_id,
                req.user_id,
                &logged_question,
                &answer,
                false,
                0,
                0,
                self.image_metadata(false, req.image_url),
            )?;
            info!("non-food image declined");
            return Ok(answer);
        }

        let prompt = if req.question.to_lowercase().contains("calorie") {
            CALORIE_FOCUS_PROMPT.to_string()
        } else {
            format!("{IMAGE_ANALYSIS_PROMPT}\n\nUser question: {}", req.question)
        };

        let answer = match self.llm.analyze_image(&image_base64, &prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                let mut context = Map::new();
                let _ = context.insert("question".into(), json!(logged_question));
                let _ = context.insert("is_food_related".into(), json!(true));
                let _ = context.insert("user_id".into(), json!(req.user_id));
                let _ = context.insert("has_image".into(), json!(true));
                let e = crate::errors::ChatError::from(e);
                self.log.log_error(&e, Some(&context));
                return Err(e);
            }
        };

        self.write_back(
            req.conversation_id,
            req.user_id,
            &logged_question,
            &answer,
            true,
            0,
            0,
            self.image_metadata(true, req.image_url),
        )?;

        info!("image question answered");
        Ok(answer)
    }

    /// History for the prompt: turns reconstructed from the log (older)
    /// followed by live turn-store turns, keeping the most recent
    /// `max_history_turns`.
    ///
    /// No dedup is attempted between the two sources; the live store holds
    /// this process's current session, the log contributes what happened
    /// before it.
    fn assemble_history(
        &self,
        conversation_id: Option<&str>,
        user_id: Option<&str>,
    ) -> Vec<Turn> {
        let live = conversation_id
            .map(|id| self.store.get_history(id))
            .unwrap_or_default();

        let mut merged: Vec<Turn> = user_id
            .filter(|_| live.is_empty())
            .map(|uid| {
                self.log
                    .load_user_history_as_turns(uid, self.config.history_days, 1000)
            })
            .unwrap_or_default()
            .into_iter()
            .map(Turn::from)
            .collect();
        merged.extend(live);

        if merged.len() > self.config.max_history_turns {
            merged.drain(..merged.len() - self.config.max_history_turns);
        }
        merged
    }

    async fn chat(&self, prompt: &str) -> Result<String> {
        let messages = [ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)];
        Ok(self
            .llm
            .chat(&messages, self.config.temperature)
            .await?)
    }

    async fn is_food_image(&self, image_base64: &str) -> bool {
        match self
            .llm
            .analyze_image(image_base64, IMAGE_SCOPE_CHECK_PROMPT)
            .await
        {
            Ok(verdict) => {
                let verdict = verdict.to_uppercase();
                verdict.contains("FOOD") && !verdict.contains("NOT_FOOD")
            }
            Err(e) => {
                warn!(error = %e, "image scope check failed, allowing image");
                true
            }
        }
    }

    fn image_metadata(&self, validated: bool, image_url: Option<&str>) -> Map<String, Value> {
        let mut metadata = Map::new();
        let _ = metadata.insert("model".into(), json!(self.config.vision_model));
        let _ = metadata.insert("has_image".into(), json!(true));
        let _ = metadata.insert("image_validated".into(), json!(validated));
        if let Some(url) = image_url {
            let _ = metadata.insert("image_url".into(), json!(url));
        }
        metadata
    }

    fn write_back(
        &self,
        conversation_id: Option<&str>,
        user_id: Option<&str>,
        question: &str,
        answer: &str,
        is_food_related: bool,
        num_retrieved_docs: usize,
        history_length: usize,
        metadata: Map<String, Value>,
    ) -> Result<()> {
        if let Some(conv_id) = conversation_id {
            self.store.add_turn(conv_id, question, answer, user_id);
        }
        self.log.log_conversation(&AppendRequest {
            question,
            answer,
            is_food_related,
            num_retrieved_docs,
            history_length,
            user_id,
            conversation_id,
            metadata: Some(metadata),
        })?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
