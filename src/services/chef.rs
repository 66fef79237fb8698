use crate::error::Result;
use crate::models::{
    BulkSubstitutionReport, CategoryCount, ChatReply, ReplyKind, RecipeSummary,
    SmartSearchReply, SubstitutionAdvice, SubstitutionEntry, SubstitutionMatches,
};
use crate::services::{
    nlg::NlgClient,
    query_classifier::{QueryClassifier, QueryIntent},
    recipe_store::RecipeStore,
    substitutions::SubstitutionTable,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

const CHAT_MAX_TOKENS: u32 = 300;
const SUBSTITUTION_MAX_TOKENS: u32 = 250;
const ADVICE_MAX_TOKENS: u32 = 150;
const OVERVIEW_MAX_TOKENS: u32 = 200;

/// Recipes fetched for chat context; only the first `PROMPT_RECIPES` are shown
const SAMPLE_RECIPES: i64 = 20;
const PROMPT_RECIPES: usize = 10;
const PROMPT_CATEGORIES: i64 = 10;

const AI_UNAVAILABLE: &str = "AI features not available";
const UNAVAILABLE_REPLY: &str = "Yes, Chef! I'm having some technical difficulties right now, but I'm still here to help! Try searching our recipes directly, or ask me later!";
const GREETING_REPLY: &str = "Yes, Chef! 🍴 I'm here to help you find something delicious! What are you craving today?";
const ADVICE_FALLBACK: &str = "Yes, Chef! I'd recommend trying one of these substitutes - they'll work great in your dish!";
const OVERVIEW_FALLBACK: &str = "Yes, Chef! I found some great substitution options for you!";

/// Personality every completion runs under
pub const PERSONALITY_PROMPT: &str = "You are Hungie, an enthusiastic and encouraging chef AI assistant with a unique personality. Your mission is to help people discover and cook amazing food.

PERSONALITY TRAITS:
- Encouraging and supportive (never intimidating)
- Passionate about food and cooking
- Practical and direct (no fluff, just helpful advice)
- Fun and energetic (use emojis and excitement)
- Uses \"Yes, Chef!\" as a signature catchphrase when appropriate
- Speaks like a knowledgeable but friendly chef who wants everyone to succeed

ANTI-SEO PHILOSOPHY:
- No long backstories or filler content
- Get straight to the point
- Focus on practical cooking help
- Make food accessible, not intimidating

CORE VALUES:
- Real food for real people
- Everyone can cook with confidence
- Substitutions and creativity are encouraged
- Cooking should be fun, not stressful";

/// Chat front end combining the classifier, substitution table, recipe store
/// and an optional NLG backend
#[derive(Clone)]
pub struct ChefAssistant {
    store: RecipeStore,
    table: &'static SubstitutionTable,
    nlg: Option<Arc<dyn NlgClient>>,
}

impl ChefAssistant {
    pub fn new(
        store: RecipeStore,
        table: &'static SubstitutionTable,
        nlg: Option<Arc<dyn NlgClient>>,
    ) -> Self {
        if nlg.is_none() {
            warn!("NLG client not configured - AI features disabled");
        }
        Self { store, table, nlg }
    }

    pub fn ai_enabled(&self) -> bool {
        self.nlg.is_some()
    }

    pub fn substitutions(&self) -> &'static SubstitutionTable {
        self.table
    }

    pub fn classifier(&self) -> QueryClassifier<'static> {
        QueryClassifier::new(self.table)
    }

    /// Free-form chat. Without an NLG backend this reports the feature as
    /// unavailable; any failure along the way degrades to a canned reply.
    pub async fn chat(&self, message: &str, context: &str) -> ChatReply {
        let Some(nlg) = &self.nlg else {
            return ChatReply {
                success: false,
                response: UNAVAILABLE_REPLY.to_string(),
                suggestions: Vec::new(),
                error: Some(AI_UNAVAILABLE.to_string()),
                fallback: false,
            };
        };

        match self.chat_completion(nlg.as_ref(), message, context).await {
            Ok(response) => ChatReply {
                success: true,
                response,
                suggestions: Vec::new(),
                error: None,
                fallback: false,
            },
            Err(e) => {
                warn!("Chat completion failed, using fallback reply: {}", e);
                ChatReply {
                    success: true,
                    response: GREETING_REPLY.to_string(),
                    suggestions: Vec::new(),
                    error: None,
                    fallback: true,
                }
            }
        }
    }

    async fn chat_completion(
        &self,
        nlg: &dyn NlgClient,
        message: &str,
        context: &str,
    ) -> anyhow::Result<String> {
        let recipes = self.store.sample_recipes(SAMPLE_RECIPES).await?;
        let categories = self.store.categories(Some(PROMPT_CATEGORIES)).await?;

        let prompt = chat_prompt(&recipes, &categories, message, context)?;
        let response = nlg
            .complete(PERSONALITY_PROMPT, &prompt, CHAT_MAX_TOKENS)
            .await?;
        Ok(response)
    }

    /// Classify the message and answer with substitutions or matching recipes
    pub async fn smart_search(&self, message: &str, context: &str) -> Result<SmartSearchReply> {
        let query = self.classifier().classify(message);

        if query.intent == QueryIntent::Substitution {
            if let Some(ingredient) = query.matched_ingredient.as_deref() {
                return Ok(self.substitution_reply(ingredient, message).await);
            }
        }

        let recipes = self.store.search_any(&query.search_terms).await?;
        info!(
            "Smart search found {} recipes for terms {:?}",
            recipes.len(),
            query.search_terms
        );

        let chat_response = if self.nlg.is_some() {
            let mut context_message = message.to_string();
            if !recipes.is_empty() {
                context_message.push_str(&format!(
                    "\n\nFound {} matching recipes. Please provide encouraging response and mention some of these options.",
                    recipes.len()
                ));
            }
            self.chat(&context_message, context).await.response
        } else {
            GREETING_REPLY.to_string()
        };

        Ok(SmartSearchReply {
            success: true,
            chat_response,
            recipes,
            search_terms: query.search_terms,
            substitutions: SubstitutionMatches::new(),
            kind: ReplyKind::RecipeSearch,
        })
    }

    async fn substitution_reply(&self, ingredient: &str, message: &str) -> SmartSearchReply {
        let substitutes = self.table.resolve(ingredient).unwrap_or_default().to_vec();
        let canned = format!(
            "Yes, Chef! I've got some great substitutes for {}. Let me help you out!",
            ingredient
        );

        let chat_response = match &self.nlg {
            Some(nlg) => {
                let prompt = substitution_prompt(ingredient, &substitutes, message);
                self.complete_or(nlg.as_ref(), &prompt, SUBSTITUTION_MAX_TOKENS, canned)
                    .await
            }
            None => canned,
        };

        let mut substitutions = SubstitutionMatches::new();
        substitutions.insert(ingredient, substitutes);

        SmartSearchReply {
            success: true,
            chat_response,
            recipes: Vec::new(),
            search_terms: vec![ingredient.to_string()],
            substitutions,
            kind: ReplyKind::SubstitutionResponse,
        }
    }

    /// Substitutes for one ingredient, with a single recommendation when the
    /// dish is known
    pub async fn advise_substitution(
        &self,
        ingredient: &str,
        recipe_context: &str,
    ) -> SubstitutionAdvice {
        let Some(substitutes) = self.table.resolve(ingredient) else {
            return SubstitutionAdvice {
                success: false,
                ingredient: ingredient.to_string(),
                substitutions: Vec::new(),
                message: Some(format!("No substitutions found for '{}'", ingredient)),
                ai_advice: String::new(),
                recipe_context: recipe_context.to_string(),
            };
        };

        let ai_advice = match &self.nlg {
            Some(nlg) if !recipe_context.trim().is_empty() => {
                let prompt = advice_prompt(ingredient, substitutes, recipe_context);
                self.complete_or(
                    nlg.as_ref(),
                    &prompt,
                    ADVICE_MAX_TOKENS,
                    ADVICE_FALLBACK.to_string(),
                )
                .await
            }
            _ => String::new(),
        };

        SubstitutionAdvice {
            success: true,
            ingredient: ingredient.to_string(),
            substitutions: substitutes.to_vec(),
            message: None,
            ai_advice,
            recipe_context: recipe_context.to_string(),
        }
    }

    /// Substitutes for several ingredients at once plus the ones with none
    pub async fn bulk_substitutions(
        &self,
        ingredients: &[String],
        recipe_context: &str,
    ) -> BulkSubstitutionReport {
        let substitutions = self.table.resolve_many(ingredients);
        let missing_ingredients: Vec<String> = ingredients
            .iter()
            .filter(|ingredient| !substitutions.contains(ingredient))
            .cloned()
            .collect();
        debug!(
            "Bulk substitutions: {} matched, {} missing",
            substitutions.len(),
            missing_ingredients.len()
        );

        let ai_overview = match &self.nlg {
            Some(nlg) if !recipe_context.trim().is_empty() && !substitutions.is_empty() => {
                let prompt = overview_prompt(ingredients, &substitutions, recipe_context);
                self.complete_or(
                    nlg.as_ref(),
                    &prompt,
                    OVERVIEW_MAX_TOKENS,
                    OVERVIEW_FALLBACK.to_string(),
                )
                .await
            }
            _ => String::new(),
        };

        BulkSubstitutionReport {
            success: true,
            requested_ingredients: ingredients.to_vec(),
            substitutions,
            missing_ingredients,
            ai_overview,
            recipe_context: recipe_context.to_string(),
        }
    }

    async fn complete_or(
        &self,
        nlg: &dyn NlgClient,
        prompt: &str,
        max_tokens: u32,
        fallback: String,
    ) -> String {
        match nlg.complete(PERSONALITY_PROMPT, prompt, max_tokens).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Completion failed, using fallback: {}", e);
                fallback
            }
        }
    }
}

fn pretty<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

fn chat_prompt(
    recipes: &[RecipeSummary],
    categories: &[CategoryCount],
    message: &str,
    context: &str,
) -> serde_json::Result<String> {
    let shown = &recipes[..recipes.len().min(PROMPT_RECIPES)];

    Ok(format!(
        "
Context about our recipe database:

AVAILABLE RECIPES SAMPLE: {recipes}

POPULAR CATEGORIES: {categories}

Previous conversation context: {context}

User's message: {message}

Please respond as Hungie, keeping in mind:
1. Focus on being helpful and encouraging
2. If they're looking for specific recipes, mention we can search our database
3. Use \"Yes, Chef!\" when appropriate
4. Ask follow-up questions to better understand their needs
5. Keep it conversational and fun!
",
        recipes = pretty(shown)?,
        categories = pretty(categories)?,
    ))
}

fn substitution_prompt(
    ingredient: &str,
    substitutes: &[SubstitutionEntry],
    message: &str,
) -> String {
    format!(
        "The user is asking about substitutions for {ingredient}.

Available substitutions: {subs}

User's original question: {message}

As Hungie, provide encouraging advice about these substitutions. Start with \"Yes, Chef!\" and give practical guidance about which substitute would work best.",
        subs = pretty(substitutes).unwrap_or_default(),
    )
}

fn advice_prompt(
    ingredient: &str,
    substitutes: &[SubstitutionEntry],
    recipe_context: &str,
) -> String {
    format!(
        "The user is making {recipe_context} and needs a substitute for {ingredient}.

Available substitutions: {subs}

As Hungie, provide ONE brief, encouraging recommendation for the best substitute given this recipe context. Start with \"Yes, Chef!\" and be practical and supportive.",
        subs = pretty(substitutes).unwrap_or_default(),
    )
}

fn overview_prompt(
    ingredients: &[String],
    found: &SubstitutionMatches,
    recipe_context: &str,
) -> String {
    let found: Vec<&str> = found.keys().collect();
    format!(
        "The user is making {recipe_context} and needs substitutes for these ingredients: {requested}.

Found substitutions for: {found}

As Hungie, provide a brief, encouraging overview with your top recommendations. Start with \"Yes, Chef!\" and prioritize the most important substitutions.",
        requested = ingredients.join(", "),
        found = found.join(", "),
    )
}
