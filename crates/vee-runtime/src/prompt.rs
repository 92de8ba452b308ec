//! Prompt assembly.
//!
//! Mechanical formatting of history and retrieved context into the chat
//! prompt. The placeholder strings (`(none)`, `No matching knowledge
//! found.`) are load-bearing: the system prompt refers to them when telling
//! the model when it may fall back to general knowledge.

use vee_core::turns::Turn;
use vee_retrieval::Document;

/// System prompt framing the assistant and its scope rules.
pub const SYSTEM_PROMPT: &str = "You are Vee, a culinary co-pilot for a food and recipe platform. \
You ONLY answer questions about cooking, recipes, meal planning, nutrition, food preparation, \
calorie tracking, and dietary preferences. If a question is not about food, politely redirect \
to food topics; do not answer it, even if you know the answer. When the RetrievedContext \
section contains relevant information, answer from it directly and do not invent data that is \
not there. Only fall back to general culinary knowledge when the context says \
\"No matching knowledge found.\" or is not relevant to the question. If conversation history \
exists, continue naturally and do not repeat your introduction.";

/// Vision prompt for general food-image analysis.
pub const IMAGE_ANALYSIS_PROMPT: &str = "Analyze this food image: identify the dish and its \
visible ingredients, estimate calories from the portion sizes and cooking methods you can see, \
and note approximate macros and any apparent dietary characteristics. Be specific and \
realistic; if you cannot clearly identify something, say so.";

/// Vision prompt used when the question asks about calories.
pub const CALORIE_FOCUS_PROMPT: &str = "Analyze this food image and provide a calorie estimate. \
Identify the food items, estimate portion sizes, and calculate approximate calories. \
Format: \"Estimated calories: [number] kcal (confidence: [level])\", then a brief breakdown \
of what you see.";

/// Vision prompt asking only whether the image is food-related.
pub const IMAGE_SCOPE_CHECK_PROMPT: &str = "You are checking whether an image contains food, \
meals, cooking, or nutrition-related content. Respond with ONLY one word: \"FOOD\" if it does, \
\"NOT_FOOD\" if it does not. No explanation.";

/// Canned answer for a declined non-food image.
pub const IMAGE_DECLINED_ANSWER: &str = "I'm Vee, your culinary assistant. I can only analyze \
food-related images. Please upload an image of a meal, food, or cooking-related content.";

/// History block: `User:`/`Assistant:` line pairs, or `(none)`.
pub fn format_history(history: &[Turn]) -> String {
    if history.is_empty() {
        return "(none)".to_string();
    }
    let mut lines = Vec::with_capacity(history.len() * 2);
    for turn in history {
        lines.push(format!("User: {}", turn.user));
        lines.push(format!("Assistant: {}", turn.assistant));
    }
    lines.join("\n")
}

/// Context block: one `[type:id] content` line per document, or the
/// no-match placeholder.
pub fn format_context(docs: &[Document]) -> String {
    if docs.is_empty() {
        return "No matching knowledge found.".to_string();
    }
    docs.iter()
        .map(|doc| format!("[{}:{}] {}", doc.doc_type(), doc.id, doc.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full chat prompt for a food-related question.
pub fn build_chat_prompt(question: &str, history: &[Turn], docs: &[Document]) -> String {
    format!(
        "<ConversationHistory>\n{}\n</ConversationHistory>\n\n\
         <RetrievedContext>\n{}\n</RetrievedContext>\n\n\
         <UserMessage>\n{question}\n</UserMessage>\n\n\
         Answer from the RetrievedContext when it is relevant; start with the information \
         itself, not a greeting.",
        format_history(history),
        format_context(docs),
    )
}

/// Redirect prompt for a question the gate judged off-topic.
pub fn build_off_topic_prompt(question: &str) -> String {
    format!(
        "User question: {question}\n\n\
         IMPORTANT: This question does NOT appear to be about food, cooking, recipes, meals, \
         or nutrition. You MUST politely decline and redirect to food topics only. Do NOT \
         answer the question if it is not food-related."
    )
}
