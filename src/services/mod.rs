pub mod chef;
pub mod nlg;
pub mod query_classifier;
pub mod recipe_store;
pub mod substitutions;

// Re-export public types
pub use chef::ChefAssistant;
pub use nlg::{NlgClient, NlgError, OpenAiClient};
pub use query_classifier::{ClassifiedQuery, QueryClassifier, QueryIntent};
pub use recipe_store::RecipeStore;
pub use substitutions::SubstitutionTable;
