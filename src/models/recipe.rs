use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Listing row for a recipe, as returned by list and search queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RecipeSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub total_time: Option<String>,
    pub servings: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RecipeIngredient {
    pub name: String,
    pub amount: Option<String>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RecipeInstruction {
    pub step_number: i64,
    pub instruction: String,
}

/// A recipe with its ingredient list and ordered steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub summary: RecipeSummary,
    pub ingredients: Vec<RecipeIngredient>,
    pub instructions: Vec<RecipeInstruction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CategoryCount {
    pub name: String,
    pub count: i64,
}
