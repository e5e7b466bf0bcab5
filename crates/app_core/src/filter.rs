use shared::{domain::Difficulty, protocol::Recipe};

/// Free-text query plus at most one difficulty tier. Both predicates are
/// evaluated against the full fetched list on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    query: String,
    difficulty: Option<Difficulty>,
}

impl RecipeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Selecting the active tier again clears it. Returns the tier now in
    /// effect.
    pub fn toggle_difficulty(&mut self, tier: Difficulty) -> Option<Difficulty> {
        self.difficulty = if self.difficulty == Some(tier) {
            None
        } else {
            Some(tier)
        };
        self.difficulty
    }

    pub fn is_active(&self) -> bool {
        !self.query.is_empty() || self.difficulty.is_some()
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        let needle = self.query.to_lowercase();
        let name_matches = needle.is_empty() || recipe.name.to_lowercase().contains(&needle);
        let tier_matches = self.difficulty.map_or(true, |tier| recipe.difficulty == tier);
        name_matches && tier_matches
    }

    pub fn apply<'a>(&self, recipes: &'a [Recipe]) -> Vec<&'a Recipe> {
        recipes.iter().filter(|recipe| self.matches(recipe)).collect()
    }
}
