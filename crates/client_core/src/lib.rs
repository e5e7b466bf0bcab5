//! External-service seams for the recipe app: recognition, generation and
//! authentication, each with a mock and (for the recipe service) a live
//! HTTP implementation selected once at startup.

use std::sync::Arc;

use tracing::info;

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod image;
pub mod mock;

pub use api::{AuthService, RecipeApi};
pub use config::{load_settings, ApiMode, ClientSettings, SettingsError};
pub use error::ClientError;
pub use http::HttpRecipeApi;
pub use image::{ImagePayload, LoadedImage};
pub use mock::{MockAuthService, MockRecipeApi};

pub fn build_recipe_api(settings: &ClientSettings) -> Result<Arc<dyn RecipeApi>, ClientError> {
    match settings.api_mode {
        ApiMode::Mock => {
            info!(
                latency_ms = settings.mock_latency.as_millis() as u64,
                "using mock recipe service"
            );
            Ok(Arc::new(MockRecipeApi::with_latency(settings.mock_latency)))
        }
        ApiMode::Live => {
            let api = HttpRecipeApi::new(&settings.api_base_url)?;
            info!(base_url = %api.base_url(), "using live recipe service");
            Ok(Arc::new(api))
        }
    }
}

/// Authentication is mocked in every mode.
pub fn build_auth_service(settings: &ClientSettings) -> Arc<dyn AuthService> {
    Arc::new(MockAuthService::with_latency(settings.auth_latency))
}
