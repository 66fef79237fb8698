use serde::{Deserialize, Serialize};

pub use recipe::{CategoryCount, RecipeDetail, RecipeIngredient, RecipeInstruction, RecipeSummary};
pub use substitution::{SubstitutionEntry, SubstitutionMatches};

mod recipe;
mod substitution;

/// Chat message sent to the chef assistant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Earlier conversation, passed through to the prompt verbatim
    #[serde(default)]
    pub context: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubstitutionRequest {
    pub ingredient: String,
    /// Dish being cooked, e.g. "pancakes"
    #[serde(default)]
    pub recipe_context: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkSubstitutionRequest {
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub recipe_context: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub message: String,
}

/// Query string for paginated recipe listings
#[derive(Debug, Clone, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    pub q: String,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

/// Reply from the plain chat endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub success: bool,
    pub response: String,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
}

/// Which branch the smart search took
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    SubstitutionResponse,
    RecipeSearch,
}

/// Reply from the smart search endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SmartSearchReply {
    pub success: bool,
    pub chat_response: String,
    pub recipes: Vec<RecipeSummary>,
    pub search_terms: Vec<String>,
    #[serde(skip_serializing_if = "SubstitutionMatches::is_empty")]
    pub substitutions: SubstitutionMatches,
    #[serde(rename = "type")]
    pub kind: ReplyKind,
}

/// Substitutes for one ingredient plus optional chef advice
#[derive(Debug, Clone, Serialize)]
pub struct SubstitutionAdvice {
    pub success: bool,
    pub ingredient: String,
    pub substitutions: Vec<SubstitutionEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub ai_advice: String,
    pub recipe_context: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkSubstitutionReport {
    pub success: bool,
    pub requested_ingredients: Vec<String>,
    pub substitutions: SubstitutionMatches,
    pub missing_ingredients: Vec<String>,
    pub ai_overview: String,
    pub recipe_context: String,
}

/// Health check response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub environment: String,
    pub ai_enabled: bool,
    /// "connected" or "missing"
    pub database: String,
    /// Current timestamp in RFC3339 format
    pub timestamp: String,
}

/// Error response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}
