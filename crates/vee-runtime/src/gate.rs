//! Food-topic gate.
//!
//! A cheap keyword check decides whether a question gets the full
//! retrieval-augmented treatment or a strict redirect prompt. The model
//! still sees every question; the gate only picks the framing and is
//! recorded on the log entry for analytics.

/// Substrings that mark a question as food/cooking-related.
const FOOD_KEYWORDS: &[&str] = &[
    "cook",
    "recipe",
    "meal",
    "food",
    "dinner",
    "lunch",
    "breakfast",
    "snack",
    "ingredient",
    "calorie",
    "calories",
    "nutrition",
    "diet",
    "prep",
    "preparation",
    "kitchen",
    "bake",
    "roast",
    "grill",
    "fry",
    "steam",
    "boil",
    "sauté",
    "protein",
    "carb",
    "fat",
    "macro",
    "serving",
    "portion",
    "dietary",
    "allergy",
    "vegetarian",
    "vegan",
    "pescatarian",
    "gluten",
    "dairy",
    "session",
    "chef",
    "cooking class",
    "meal plan",
    "prep time",
    "cook time",
    "calculate",
    "track",
    "photo",
    "upload",
    "estimate",
];

/// Whether `query` looks food/cooking-related (case-insensitive substring
/// match against the keyword list).
pub fn is_food_related(query: &str) -> bool {
    let query = query.to_lowercase();
    FOOD_KEYWORDS.iter().any(|kw| query.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_food_questions() {
        assert!(is_food_related("Any good RECIPE for lentils?"));
        assert!(is_food_related("how many calories in kabsa"));
        assert!(is_food_related("what should I eat for breakfast"));
    }

    #[test]
    fn matches_inside_words() {
        // "precook" contains "cook"; substring matching is intentional
        assert!(is_food_related("can I precook this"));
    }

    #[test]
    fn rejects_off_topic_questions() {
        assert!(!is_food_related("what's the weather tomorrow"));
        assert!(!is_food_related("write me a python script"));
        assert!(!is_food_related(""));
    }
}
