use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use shared::{
    domain::ProductId,
    protocol::{DetectedProduct, GenerateRecipesRequest, Recipe, RecognizedProduct},
};
use tracing::{info, warn};
use url::Url;

use crate::{api::RecipeApi, error::ClientError, image::ImagePayload};

const DETECT_PRODUCTS_PATH: &str = "detect-products";
const GENERATE_RECIPES_PATH: &str = "generate-recipes";

pub struct HttpRecipeApi {
    http: Client,
    base_url: Url,
}

impl HttpRecipeApi {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http: Client::new(),
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|source| ClientError::BaseUrl {
                url: self.base_url.to_string(),
                source,
            })
    }
}

/// Parses the base url and guarantees a trailing slash so relative joins
/// keep any path prefix.
pub fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&normalized).map_err(|source| ClientError::BaseUrl {
        url: raw.to_string(),
        source,
    })
}

fn transport(endpoint: &Url) -> impl FnOnce(reqwest::Error) -> ClientError + '_ {
    move |source| ClientError::Transport {
        endpoint: endpoint.to_string(),
        source,
    }
}

fn ensure_success(endpoint: &Url, response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ClientError::Status {
            endpoint: endpoint.to_string(),
            status,
        })
    }
}

/// Assigns ids to products the backend left unnamed (or named twice) and
/// clamps confidences into `[0, 1]`.
pub fn normalize_detected(detected: Vec<DetectedProduct>) -> Vec<RecognizedProduct> {
    let mut seen = HashSet::new();
    let mut next_fallback = 1usize;

    detected
        .into_iter()
        .map(|product| {
            let id = match product.id {
                Some(id) if !seen.contains(&id) => id,
                _ => loop {
                    let candidate = ProductId::new(format!("detected-{next_fallback}"));
                    next_fallback += 1;
                    if !seen.contains(&candidate) {
                        break candidate;
                    }
                },
            };
            seen.insert(id.clone());

            let confidence = if product.confidence.is_finite() {
                product.confidence.clamp(0.0, 1.0)
            } else {
                0.0
            };
            if confidence != product.confidence {
                warn!(
                    product = %product.name,
                    reported = product.confidence,
                    clamped = confidence,
                    "confidence outside [0, 1]"
                );
            }

            RecognizedProduct {
                id,
                name: product.name,
                confidence,
            }
        })
        .collect()
}

#[async_trait]
impl RecipeApi for HttpRecipeApi {
    async fn detect_products(
        &self,
        image: &ImagePayload,
    ) -> Result<Vec<RecognizedProduct>, ClientError> {
        let endpoint = self.endpoint(DETECT_PRODUCTS_PATH)?;
        let loaded = image.load().await?;
        let size_bytes = loaded.bytes.len();
        let part = Part::bytes(loaded.bytes)
            .file_name(loaded.file_name)
            .mime_str(&loaded.mime_type)
            .map_err(transport(&endpoint))?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(transport(&endpoint))?;
        let detected: Vec<DetectedProduct> = ensure_success(&endpoint, response)?
            .json()
            .await
            .map_err(transport(&endpoint))?;

        info!(
            %endpoint,
            size_bytes,
            count = detected.len(),
            "products detected"
        );
        Ok(normalize_detected(detected))
    }

    async fn generate_recipes(&self, products: &[String]) -> Result<Vec<Recipe>, ClientError> {
        let endpoint = self.endpoint(GENERATE_RECIPES_PATH)?;
        let response = self
            .http
            .post(endpoint.clone())
            .json(&GenerateRecipesRequest {
                products: products.to_vec(),
            })
            .send()
            .await
            .map_err(transport(&endpoint))?;
        let recipes: Vec<Recipe> = ensure_success(&endpoint, response)?
            .json()
            .await
            .map_err(transport(&endpoint))?;

        info!(%endpoint, count = recipes.len(), "recipes generated");
        Ok(recipes)
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
