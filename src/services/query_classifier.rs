use crate::services::substitutions::SubstitutionTable;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Phrases that signal the user is missing an ingredient
pub const SUBSTITUTION_KEYWORDS: &[&str] = &[
    "substitute",
    "replace",
    "instead of",
    "don't have",
    "out of",
    "alternative",
    "swap",
    "use instead",
    "without",
    "missing",
];

/// Curated food, cuisine, meal and technique vocabulary
pub const FOOD_KEYWORDS: &[&str] = &[
    "chicken", "beef", "pork", "fish", "salmon", "pasta", "pizza", "burger",
    "salad", "soup", "dessert", "cake", "cookies", "bread", "rice", "noodles",
    "vegetables", "healthy", "quick", "easy", "cheap", "budget", "kids",
    "spicy", "hot", "mild", "sweet", "sour", "chinese", "italian", "mexican",
    "indian", "thai", "breakfast", "lunch", "dinner", "snack", "appetizer",
    "main", "side", "comfort", "fried", "grilled", "baked", "steamed",
];

/// Free-text tokens shorter than this are never used as search terms
const MIN_TOKEN_LEN: usize = 4;

lazy_static! {
    static ref STOP_WORDS: HashSet<&'static str> = [
        "what",
        "want",
        "need",
        "like",
        "have",
        "make",
        "cook",
        "something",
        "anything",
    ]
    .into_iter()
    .collect();
}

/// How a chat message should be handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryIntent {
    Substitution,
    RecipeSearch,
}

/// Result of classifying one message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedQuery {
    pub intent: QueryIntent,
    /// Canonical table key, set only for substitution intent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_ingredient: Option<String>,
    /// Deduplicated search terms, empty for substitution intent
    pub search_terms: Vec<String>,
}

impl ClassifiedQuery {
    fn substitution(ingredient: &str) -> Self {
        Self {
            intent: QueryIntent::Substitution,
            matched_ingredient: Some(ingredient.to_string()),
            search_terms: Vec::new(),
        }
    }

    fn recipe_search(search_terms: Vec<String>) -> Self {
        Self {
            intent: QueryIntent::RecipeSearch,
            matched_ingredient: None,
            search_terms,
        }
    }
}

/// Keyword-based classifier deciding between substitution lookups and recipe
/// searches
#[derive(Debug, Clone, Copy)]
pub struct QueryClassifier<'t> {
    table: &'t SubstitutionTable,
}

impl<'t> QueryClassifier<'t> {
    pub fn new(table: &'t SubstitutionTable) -> Self {
        Self { table }
    }

    /// Classify a message. Never fails: anything that is not a recognizable
    /// substitution request becomes a recipe search, possibly with no terms.
    pub fn classify(&self, message: &str) -> ClassifiedQuery {
        let message_lower = message.to_lowercase();

        if Self::is_substitution_query(&message_lower) {
            if let Some(ingredient) = self.mentioned_ingredients(&message_lower).first() {
                debug!("Classified as substitution for '{}'", ingredient);
                return ClassifiedQuery::substitution(ingredient);
            }
            debug!("Substitution keywords without a known ingredient, searching recipes");
        }

        let terms = Self::extract_search_terms(&message_lower);
        debug!("Classified as recipe search with terms {:?}", terms);
        ClassifiedQuery::recipe_search(terms)
    }

    // The helpers below expect a message that `classify` already lower-cased.

    /// Check if the message asks to swap out an ingredient
    fn is_substitution_query(message_lower: &str) -> bool {
        SUBSTITUTION_KEYWORDS
            .iter()
            .any(|keyword| message_lower.contains(keyword))
    }

    /// Table keys mentioned anywhere in the message, in table order
    fn mentioned_ingredients(&self, message_lower: &str) -> Vec<&'t str> {
        self.table
            .keys()
            .filter(|key| message_lower.contains(key))
            .collect()
    }

    /// Extract recipe search terms.
    ///
    /// Vocabulary hits come first in vocabulary order, followed by any other
    /// whitespace token of four or more characters that is not a stop word, in
    /// message order. Duplicates are dropped.
    fn extract_search_terms(message_lower: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut terms = Vec::new();

        let mut candidates: Vec<&str> = FOOD_KEYWORDS
            .iter()
            .copied()
            .filter(|keyword| message_lower.contains(keyword))
            .collect();
        candidates.extend(
            message_lower
                .split_whitespace()
                .filter(|word| {
                    word.chars().count() >= MIN_TOKEN_LEN && !STOP_WORDS.contains(word)
                }),
        );

        for term in candidates {
            if seen.insert(term) {
                terms.push(term.to_string());
            }
        }

        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> QueryClassifier<'static> {
        QueryClassifier::new(SubstitutionTable::builtin())
    }

    fn term_set(query: &ClassifiedQuery) -> HashSet<&str> {
        query.search_terms.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_substitution_query() {
        let query = classifier().classify("what can I use instead of buttermilk");

        assert_eq!(query.intent, QueryIntent::Substitution);
        assert_eq!(query.matched_ingredient.as_deref(), Some("buttermilk"));
        assert!(query.search_terms.is_empty());
    }

    #[test]
    fn test_substitution_picks_first_key_in_table_order() {
        // "garlic" appears first in the message but "eggs" precedes it in the table
        let query = classifier().classify("I'm out of garlic and eggs");

        assert_eq!(query.intent, QueryIntent::Substitution);
        assert_eq!(query.matched_ingredient.as_deref(), Some("eggs"));
    }

    #[test]
    fn test_substitution_keywords_are_case_insensitive() {
        let query = classifier().classify("Can I SWAP Sour Cream?");

        assert_eq!(query.intent, QueryIntent::Substitution);
        assert_eq!(query.matched_ingredient.as_deref(), Some("sour cream"));
    }

    #[test]
    fn test_unknown_ingredient_falls_back_to_recipe_search() {
        let query = classifier().classify("what can I substitute for quinoa");

        assert_eq!(query.intent, QueryIntent::RecipeSearch);
        assert!(query.matched_ingredient.is_none());
        assert!(term_set(&query).contains("quinoa"));
    }

    #[test]
    fn test_ingredient_without_keyword_is_recipe_search() {
        let query = classifier().classify("garlic bread");

        assert_eq!(query.intent, QueryIntent::RecipeSearch);
        assert!(term_set(&query).contains("garlic"));
        assert!(term_set(&query).contains("bread"));
    }

    #[test]
    fn test_recipe_search_terms() {
        let query = classifier().classify("I want a quick chicken dinner");

        assert_eq!(query.intent, QueryIntent::RecipeSearch);
        let terms = term_set(&query);
        assert!(terms.contains("chicken"));
        assert!(terms.contains("quick"));
        assert!(terms.contains("dinner"));
        assert!(!terms.contains("want"));
    }

    #[test]
    fn test_empty_message() {
        let query = classifier().classify("");

        assert_eq!(query.intent, QueryIntent::RecipeSearch);
        assert!(query.search_terms.is_empty());
    }

    #[test]
    fn test_short_and_stop_words_are_dropped() {
        let terms = QueryClassifier::extract_search_terms("what do you have to make");
        assert!(terms.is_empty());
    }

    #[test]
    fn test_terms_are_deduplicated() {
        let terms = QueryClassifier::extract_search_terms("spicy spicy thai curry");

        assert_eq!(terms.iter().filter(|t| *t == "spicy").count(), 1);
        assert_eq!(terms, vec!["spicy", "thai", "curry"]);
    }

    #[test]
    fn test_vocabulary_matches_inside_words() {
        // "hot" is found inside "shots"; permissive by intent
        let terms = QueryClassifier::extract_search_terms("espresso shots");
        assert!(terms.contains(&"hot".to_string()));
        assert!(terms.contains(&"espresso".to_string()));
    }

    #[test]
    fn test_mentioned_ingredients() {
        let found = classifier().mentioned_ingredients("wine, garlic and heavy cream");
        assert_eq!(found, vec!["heavy cream", "garlic", "wine"]);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let message = "Easy baked salmon without garlic";
        assert_eq!(classifier().classify(message), classifier().classify(message));
    }

    #[test]
    fn test_intent_serialization() {
        let query = classifier().classify("replace the eggs");
        let json = serde_json::to_value(&query).unwrap();

        assert_eq!(json["intent"], "SUBSTITUTION");
        assert_eq!(json["matched_ingredient"], "eggs");
    }
}
