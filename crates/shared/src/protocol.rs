use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Difficulty, HistoryEntryId, ProductId, RecipeId};

/// A product as reported by the detection endpoint. The backend may omit ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedProduct {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub name: String,
    #[serde(alias = "confidenceScore", alias = "confidence_score")]
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedProduct {
    pub id: ProductId,
    pub name: String,
    pub confidence: f64,
}

impl RecognizedProduct {
    pub fn new(id: impl Into<String>, name: impl Into<String>, confidence: f64) -> Self {
        Self {
            id: ProductId::new(id),
            name: name.into(),
            confidence,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRecipesRequest {
    pub products: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    #[serde(rename = "time")]
    pub time_estimate: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub missing_ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<String>,
    #[serde(rename = "image", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Recipe {
    pub fn is_missing(&self, ingredient: &str) -> bool {
        self.missing_ingredients
            .iter()
            .any(|missing| missing == ingredient)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: HistoryEntryId,
    pub recipe_name: String,
    pub cooked_at: DateTime<Utc>,
}
