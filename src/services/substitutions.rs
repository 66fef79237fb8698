use crate::models::{SubstitutionEntry, SubstitutionMatches};
use lazy_static::lazy_static;
use serde::Serialize;
use tracing::debug;

/// Ordered mapping from canonical ingredient name to its substitutes.
///
/// Keys are lower-cased and trimmed on construction. Declaration order is kept
/// because partial matching returns the first key that fits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubstitutionTable {
    entries: SubstitutionMatches,
}

lazy_static! {
    static ref BUILTIN_TABLE: SubstitutionTable = SubstitutionTable::new(builtin_entries());

    /// Ingredient groups used for category browsing
    pub static ref INGREDIENT_CATEGORIES: Vec<(&'static str, Vec<&'static str>)> = vec![
        ("dairy", vec!["milk", "cream", "butter", "cheese", "yogurt", "sour cream"]),
        ("proteins", vec!["chicken", "beef", "pork", "fish", "eggs", "tofu"]),
        ("grains", vec!["flour", "rice", "pasta", "bread", "oats"]),
        ("sweeteners", vec!["sugar", "honey", "syrup", "molasses"]),
        ("vegetables", vec!["onion", "garlic", "tomato", "pepper", "carrot"]),
        ("herbs_spices", vec!["basil", "oregano", "thyme", "cumin", "paprika"]),
    ];
}

impl SubstitutionTable {
    /// Build a table from `(ingredient, substitutes)` pairs in preference order.
    /// A repeated key keeps its first definition.
    pub fn new<K: AsRef<str>>(entries: Vec<(K, Vec<SubstitutionEntry>)>) -> Self {
        let mut table = Self::default();
        for (key, subs) in entries {
            table.entries.insert(normalize(key.as_ref()), subs);
        }
        table
    }

    /// The curated table shipped with the service, built on first use
    pub fn builtin() -> &'static SubstitutionTable {
        &BUILTIN_TABLE
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SubstitutionEntry])> {
        self.entries.iter()
    }

    /// Exact lookup by canonical key
    pub fn get(&self, key: &str) -> Option<&[SubstitutionEntry]> {
        self.entries.get(key)
    }

    /// Find substitutes for an ingredient.
    ///
    /// Tries an exact match on the normalized name first, then the first key
    /// (in table order) that contains the name or is contained by it. Blank
    /// input is contained by every key, so it lands on the first one.
    pub fn resolve(&self, ingredient: &str) -> Option<&[SubstitutionEntry]> {
        self.resolve_key(ingredient).and_then(|key| self.get(key))
    }

    /// Like [`resolve`](Self::resolve) but returns the matched table key
    pub fn resolve_key(&self, ingredient: &str) -> Option<&str> {
        let needle = normalize(ingredient);
        if let Some((key, _)) = self.entries.get_key_value(&needle) {
            return Some(key);
        }

        let partial = self
            .keys()
            .find(|key| needle.contains(key) || key.contains(needle.as_str()));
        if let Some(key) = partial {
            debug!("Partial substitution match: '{}' -> '{}'", needle, key);
        }
        partial
    }

    /// Resolve each ingredient, keeping only those with substitutes, in input
    /// order
    pub fn resolve_many<S: AsRef<str>>(&self, ingredients: &[S]) -> SubstitutionMatches {
        let mut matches = SubstitutionMatches::new();
        for ingredient in ingredients {
            let ingredient = ingredient.as_ref();
            if let Some(subs) = self.resolve(ingredient) {
                matches.insert(ingredient, subs.to_vec());
            }
        }
        matches
    }

    /// Substitutes for every member of an ingredient category. Unknown
    /// categories yield an empty result.
    pub fn resolve_category(&self, category: &str) -> SubstitutionMatches {
        let category = normalize(category);
        INGREDIENT_CATEGORIES
            .iter()
            .find(|(name, _)| *name == category)
            .map(|(_, members)| self.resolve_many(members))
            .unwrap_or_default()
    }
}

/// Names of the known ingredient categories, in declaration order
pub fn category_names() -> Vec<&'static str> {
    INGREDIENT_CATEGORIES.iter().map(|(name, _)| *name).collect()
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

fn builtin_entries() -> Vec<(&'static str, Vec<SubstitutionEntry>)> {
    let e = SubstitutionEntry::new;
    vec![
        // Dairy
        (
            "heavy cream",
            vec![
                e(
                    "milk + butter",
                    "3/4 cup milk + 1/4 cup melted butter",
                    "Perfect for cooking, slightly less rich",
                ),
                e("evaporated milk", "1:1 ratio", "Great for soups and sauces"),
                e("coconut cream", "1:1 ratio", "Adds coconut flavor, dairy-free option"),
            ],
        ),
        (
            "buttermilk",
            vec![
                e(
                    "milk + vinegar",
                    "1 cup milk + 1 tbsp white vinegar",
                    "Let sit 5 minutes, works perfectly for baking",
                ),
                e(
                    "milk + lemon juice",
                    "1 cup milk + 1 tbsp lemon juice",
                    "Let sit 5 minutes, slightly tangier than vinegar",
                ),
                e(
                    "yogurt + milk",
                    "1/2 cup yogurt + 1/2 cup milk",
                    "Creates perfect consistency for pancakes",
                ),
            ],
        ),
        (
            "sour cream",
            vec![
                e("greek yogurt", "1:1 ratio", "Healthier option, same tangy flavor"),
                e(
                    "cream cheese + milk",
                    "3/4 cup cream cheese + 1/4 cup milk",
                    "Mix until smooth, richer flavor",
                ),
                e(
                    "cottage cheese + lemon",
                    "1 cup cottage cheese + 1 tsp lemon juice",
                    "Blend smooth, lighter option",
                ),
            ],
        ),
        // Eggs
        (
            "eggs",
            vec![
                e(
                    "applesauce",
                    "1/4 cup per egg",
                    "Best for moist baked goods, adds slight sweetness",
                ),
                e(
                    "banana",
                    "1/2 mashed banana per egg",
                    "Adds banana flavor, great for muffins and pancakes",
                ),
                e(
                    "flax egg",
                    "1 tbsp ground flaxseed + 3 tbsp water per egg",
                    "Let sit 5 minutes, vegan option",
                ),
            ],
        ),
        // Flour
        (
            "all-purpose flour",
            vec![
                e(
                    "cake flour",
                    "1 cup + 2 tbsp cake flour per 1 cup AP flour",
                    "Creates more tender baked goods",
                ),
                e(
                    "bread flour",
                    "Use 2 tbsp less per cup",
                    "Creates chewier texture, great for pizza dough",
                ),
                e("almond flour", "Use 1/4 less", "Gluten-free, adds nuttiness, denser texture"),
            ],
        ),
        // Sugar
        (
            "white sugar",
            vec![
                e("brown sugar", "1:1 ratio", "Adds molasses flavor and moisture"),
                e(
                    "honey",
                    "3/4 cup per 1 cup sugar",
                    "Reduce liquid by 1/4 cup, adds floral notes",
                ),
                e(
                    "maple syrup",
                    "3/4 cup per 1 cup sugar",
                    "Reduce liquid by 3 tbsp, distinct maple flavor",
                ),
            ],
        ),
        // Spices and herbs
        (
            "fresh herbs",
            vec![
                e(
                    "dried herbs",
                    "1/3 the amount",
                    "1 tbsp fresh = 1 tsp dried, add later in cooking",
                ),
                e("herb paste", "1 tsp paste = 1 tbsp fresh", "More concentrated flavor"),
            ],
        ),
        (
            "garlic",
            vec![
                e("garlic powder", "1/8 tsp per clove", "Less pungent, dissolves easily"),
                e("garlic salt", "1/2 tsp per clove", "Reduce other salt in recipe"),
                e("shallots", "1 small shallot per 2 cloves", "Milder, slightly sweet flavor"),
            ],
        ),
        // Proteins
        (
            "ground beef",
            vec![
                e("ground turkey", "1:1 ratio", "Leaner option, may need extra oil for cooking"),
                e(
                    "lentils",
                    "1 cup cooked lentils per 1/2 lb meat",
                    "Vegetarian option, add extra seasoning",
                ),
                e(
                    "mushrooms",
                    "2 cups diced mushrooms per 1/2 lb meat",
                    "Umami-rich, great texture for sauces",
                ),
            ],
        ),
        // Sauces and condiments
        (
            "worcestershire sauce",
            vec![
                e(
                    "soy sauce + vinegar",
                    "1 tbsp soy sauce + 1/2 tsp vinegar",
                    "Add pinch of sugar for complexity",
                ),
                e("fish sauce", "Use half the amount", "More intense umami flavor"),
            ],
        ),
        (
            "wine",
            vec![
                e("chicken/beef broth", "1:1 ratio", "Use broth that matches your dish"),
                e(
                    "grape juice + vinegar",
                    "1 cup juice + 1 tbsp vinegar",
                    "For white wine in cooking",
                ),
            ],
        ),
    ]
}
