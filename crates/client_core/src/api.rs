use async_trait::async_trait;
use shared::{
    domain::User,
    protocol::{Recipe, RecognizedProduct},
};

use crate::{error::ClientError, image::ImagePayload};

/// The two external operations behind the recognition and generation steps.
#[async_trait]
pub trait RecipeApi: Send + Sync {
    async fn detect_products(
        &self,
        image: &ImagePayload,
    ) -> Result<Vec<RecognizedProduct>, ClientError>;

    async fn generate_recipes(&self, products: &[String]) -> Result<Vec<Recipe>, ClientError>;
}

/// Credentials are only checked for presence by callers; implementations
/// never consult a credential store.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<User, ClientError>;

    async fn register(&self, name: &str, email: &str, password: &str)
        -> Result<User, ClientError>;
}
