use std::time::Duration;

use async_trait::async_trait;
use shared::{
    domain::{Difficulty, RecipeId, User},
    protocol::{Recipe, RecognizedProduct},
};
use tracing::{debug, info};

use crate::{
    api::{AuthService, RecipeApi},
    error::ClientError,
    image::ImagePayload,
};

pub const MOCK_API_LATENCY: Duration = Duration::from_secs(2);
pub const MOCK_AUTH_LATENCY: Duration = Duration::from_secs(1);
pub const MOCK_USER_NAME: &str = "Пользователь";

pub fn sample_products() -> Vec<RecognizedProduct> {
    vec![
        RecognizedProduct::new("1", "Томаты", 0.95),
        RecognizedProduct::new("2", "Сыр", 0.88),
        RecognizedProduct::new("3", "Базилик", 0.75),
    ]
}

pub fn sample_recipes() -> Vec<Recipe> {
    vec![
        Recipe {
            id: RecipeId::new("1"),
            name: "Салат Капрезе".to_string(),
            time_estimate: "10 мин".to_string(),
            difficulty: Difficulty::Easy,
            ingredients: strings(&["Томаты", "Сыр", "Базилик", "Оливковое масло"]),
            missing_ingredients: strings(&["Оливковое масло"]),
            steps: Vec::new(),
            image_url: Some(
                "https://images.unsplash.com/photo-1529312266912-b33cf6227e24?auto=format&fit=crop&w=800&q=80"
                    .to_string(),
            ),
        },
        Recipe {
            id: RecipeId::new("2"),
            name: "Паста с томатами".to_string(),
            time_estimate: "25 мин".to_string(),
            difficulty: Difficulty::Medium,
            ingredients: strings(&["Паста", "Томаты", "Сыр", "Чеснок"]),
            missing_ingredients: strings(&["Паста", "Чеснок"]),
            steps: Vec::new(),
            image_url: Some(
                "https://images.unsplash.com/photo-1563379926898-05f4575a45d8?auto=format&fit=crop&w=800&q=80"
                    .to_string(),
            ),
        },
    ]
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// Sleeps a fixed latency and answers with the static sample data.
#[derive(Debug, Clone)]
pub struct MockRecipeApi {
    latency: Duration,
    fail_with: Option<String>,
}

impl Default for MockRecipeApi {
    fn default() -> Self {
        Self::with_latency(MOCK_API_LATENCY)
    }
}

impl MockRecipeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            fail_with: None,
        }
    }

    /// Simulated failure path: every call errors after the usual latency.
    pub fn failing(latency: Duration, reason: impl Into<String>) -> Self {
        Self {
            latency,
            fail_with: Some(reason.into()),
        }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    async fn simulate(&self, operation: &'static str) -> Result<(), ClientError> {
        debug!(operation, latency_ms = self.latency.as_millis() as u64, "mock call started");
        tokio::time::sleep(self.latency).await;
        match &self.fail_with {
            Some(reason) => Err(ClientError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecipeApi for MockRecipeApi {
    async fn detect_products(
        &self,
        image: &ImagePayload,
    ) -> Result<Vec<RecognizedProduct>, ClientError> {
        self.simulate("detect_products").await?;
        let products = sample_products();
        info!(uri_len = image.uri().len(), count = products.len(), "mock detection finished");
        Ok(products)
    }

    async fn generate_recipes(&self, products: &[String]) -> Result<Vec<Recipe>, ClientError> {
        self.simulate("generate_recipes").await?;
        let recipes = sample_recipes();
        info!(
            products = products.len(),
            count = recipes.len(),
            "mock recipe generation finished"
        );
        Ok(recipes)
    }
}

/// Accepts any non-empty credentials after a fixed latency.
#[derive(Debug, Clone)]
pub struct MockAuthService {
    latency: Duration,
}

impl Default for MockAuthService {
    fn default() -> Self {
        Self::with_latency(MOCK_AUTH_LATENCY)
    }
}

impl MockAuthService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl AuthService for MockAuthService {
    async fn login(&self, email: &str, _password: &str) -> Result<User, ClientError> {
        tokio::time::sleep(self.latency).await;
        Ok(User::new(MOCK_USER_NAME, email))
    }

    async fn register(
        &self,
        name: &str,
        email: &str,
        _password: &str,
    ) -> Result<User, ClientError> {
        tokio::time::sleep(self.latency).await;
        Ok(User::new(name, email))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn detection_waits_two_seconds_and_returns_three_products() {
        let api = MockRecipeApi::new();
        let started = Instant::now();

        let products = api
            .detect_products(&ImagePayload::new("file:///photo.jpg"))
            .await
            .expect("detect");

        assert!(started.elapsed() >= Duration::from_secs(2));
        let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Томаты", "Сыр", "Базилик"]);
        assert!(products
            .iter()
            .all(|p| (0.0..=1.0).contains(&p.confidence)));
    }

    #[tokio::test(start_paused = true)]
    async fn generation_returns_the_two_sample_recipes() {
        let recipes = MockRecipeApi::new()
            .generate_recipes(&["Томаты".to_string()])
            .await
            .expect("generate");
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[1].name, "Паста с томатами");
    }

    #[tokio::test(start_paused = true)]
    async fn failing_mock_reports_unavailable() {
        let err = MockRecipeApi::failing(Duration::from_millis(10), "offline")
            .generate_recipes(&["Сыр".to_string()])
            .await
            .expect_err("must fail");
        assert!(matches!(err, ClientError::Unavailable(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn mock_login_builds_placeholder_user() {
        let user = MockAuthService::new()
            .login("chef@example.com", "secret")
            .await
            .expect("login");
        assert_eq!(user, User::new(MOCK_USER_NAME, "chef@example.com"));
    }
}
