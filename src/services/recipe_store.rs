use crate::error::{ApiError, Result};
use crate::models::{
    CategoryCount, RecipeDetail, RecipeIngredient, RecipeInstruction, RecipeSummary,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::{str::FromStr, time::Duration};
use tracing::{debug, info};

/// Keyword search result cap
pub const SEARCH_LIMIT: i64 = 50;
/// Result cap when searching on behalf of the chat assistant
pub const SMART_SEARCH_LIMIT: i64 = 6;
/// Only this many extracted terms are used in a multi-term search
pub const MAX_QUERY_TERMS: usize = 3;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

// Recipes without steps or ingredients are incomplete imports and stay hidden.
const COMPLETE_RECIPES: &str = "
    FROM recipes r
    INNER JOIN instructions inst ON r.id = inst.recipe_id
    INNER JOIN recipe_ingredients ri ON r.id = ri.recipe_id";

/// Read-only access to the recipe database
#[derive(Debug, Clone)]
pub struct RecipeStore {
    pool: SqlitePool,
}

impl RecipeStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a lazily connected read-only pool. A missing database file only
    /// shows up once a query runs.
    pub fn connect_lazy(database_url: &str, max_connections: u32) -> Result<Self> {
        let url = if database_url.starts_with("sqlite:") {
            database_url.to_string()
        } else {
            format!("sqlite://{}", database_url)
        };

        let options = SqliteConnectOptions::from_str(&url)?
            .create_if_missing(false)
            .read_only(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_lazy_with(options);

        info!("Recipe store configured for {}", database_url);
        Ok(Self::new(pool))
    }

    /// True if the database can be queried
    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// One page of complete recipes ordered by name. `page` starts at 1.
    pub async fn list_recipes(&self, page: i64, limit: i64) -> Result<Vec<RecipeSummary>> {
        if page < 1 || limit < 1 {
            return Err(ApiError::InvalidInput(
                "page and limit must be positive".to_string(),
            ));
        }
        let offset = (page - 1)
            .checked_mul(limit)
            .ok_or_else(|| ApiError::InvalidInput("page is out of range".to_string()))?;

        let sql = format!(
            "SELECT DISTINCT r.id, r.name, r.description, r.total_time, r.servings
            {COMPLETE_RECIPES}
            ORDER BY r.name
            LIMIT ? OFFSET ?"
        );

        let recipes = sqlx::query_as::<_, RecipeSummary>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(recipes)
    }

    /// First `limit` complete recipes, used as chat context
    pub async fn sample_recipes(&self, limit: i64) -> Result<Vec<RecipeSummary>> {
        self.list_recipes(1, limit).await
    }

    /// Full recipe with ingredients and steps, or `None` if the id is unknown
    pub async fn get_recipe(&self, recipe_id: &str) -> Result<Option<RecipeDetail>> {
        let summary = sqlx::query_as::<_, RecipeSummary>(
            "SELECT id, name, description, total_time, servings
            FROM recipes
            WHERE id = ?",
        )
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(summary) = summary else {
            return Ok(None);
        };

        let ingredients = sqlx::query_as::<_, RecipeIngredient>(
            "SELECT i.name, ri.amount, ri.unit
            FROM recipe_ingredients ri
            JOIN ingredients i ON ri.ingredient_id = i.id
            WHERE ri.recipe_id = ?
            ORDER BY i.name",
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await?;

        let instructions = sqlx::query_as::<_, RecipeInstruction>(
            "SELECT step_number, instruction
            FROM instructions
            WHERE recipe_id = ?
            ORDER BY step_number",
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(RecipeDetail {
            summary,
            ingredients,
            instructions,
        }))
    }

    /// Recipes whose name, description or any ingredient contains `query`
    pub async fn search(&self, query: &str) -> Result<Vec<RecipeSummary>> {
        self.search_terms(&[query], SEARCH_LIMIT).await
    }

    /// Recipes matching any of the first few `terms`, for chat-driven search.
    /// No terms means no query and no results.
    pub async fn search_any<S: AsRef<str>>(&self, terms: &[S]) -> Result<Vec<RecipeSummary>> {
        let terms: Vec<&str> = terms
            .iter()
            .take(MAX_QUERY_TERMS)
            .map(|term| term.as_ref())
            .collect();
        self.search_terms(&terms, SMART_SEARCH_LIMIT).await
    }

    async fn search_terms(&self, terms: &[&str], limit: i64) -> Result<Vec<RecipeSummary>> {
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let conditions =
            vec!["r.name LIKE ? OR r.description LIKE ? OR i.name LIKE ?"; terms.len()];
        let sql = format!(
            "SELECT DISTINCT r.id, r.name, r.description, r.total_time, r.servings
            {COMPLETE_RECIPES}
            LEFT JOIN ingredients i ON ri.ingredient_id = i.id
            WHERE ({})
            ORDER BY r.name
            LIMIT ?",
            conditions.join(" OR ")
        );
        debug!("Searching recipes for {:?}", terms);

        let mut query = sqlx::query_as::<_, RecipeSummary>(&sql);
        for term in terms {
            let pattern = format!("%{}%", term);
            query = query.bind(pattern.clone()).bind(pattern.clone()).bind(pattern);
        }

        let recipes = query.bind(limit).fetch_all(&self.pool).await?;
        Ok(recipes)
    }

    /// Categories with their number of complete recipes, most populated first
    pub async fn categories(&self, limit: Option<i64>) -> Result<Vec<CategoryCount>> {
        let sql = "SELECT c.name, COUNT(DISTINCT r.id) AS count
            FROM categories c
            INNER JOIN recipe_categories rc ON c.id = rc.category_id
            INNER JOIN recipes r ON rc.recipe_id = r.id
            INNER JOIN instructions inst ON r.id = inst.recipe_id
            INNER JOIN recipe_ingredients ri ON r.id = ri.recipe_id
            GROUP BY c.id, c.name
            ORDER BY count DESC, c.name
            LIMIT ?";

        // SQLite treats a negative LIMIT as unlimited
        let categories = sqlx::query_as::<_, CategoryCount>(sql)
            .bind(limit.unwrap_or(-1))
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }
}
