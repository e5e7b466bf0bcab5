use std::sync::Arc;

use chrono::Utc;
use client_core::{
    build_auth_service, build_recipe_api, AuthService, ClientError, ClientSettings, ImagePayload,
    RecipeApi,
};
use shared::{
    domain::{Difficulty, ProductId, RecipeId, User},
    error::{ApiError, AppError},
    protocol::{Recipe, RecognizedProduct},
};
use tracing::{info, warn};

use crate::{
    cooking::{CookingProgress, StepOutcome},
    history::HistoryLog,
    navigation::{FrameKey, Graph, NavigationError, Navigator, Route, RouteName, Tab},
    picker::{ImagePicker, ImageSource, PermissionStatus},
    screens::{MainTabs, RecipeDetailScreen, RecipeListScreen, RecognizedProductsScreen},
    session::Session,
};

const LOGIN_FIELDS_REQUIRED: &str = "Введите email и пароль";
const REGISTER_FIELDS_REQUIRED: &str = "Заполните все поля";
const IMAGE_REQUIRED: &str = "Сначала выберите фото";
const PRODUCTS_EMPTY: &str = "Список продуктов пуст";
const DETECTION_FAILED: &str = "Не удалось загрузить список продуктов";
const GENERATION_FAILED: &str = "Не удалось найти рецепты";
const NOTICE_PENDING: &str = "Сначала закройте уведомление";

/// Collaborators the controller calls out to.
#[derive(Clone)]
pub struct Services {
    pub recipes: Arc<dyn RecipeApi>,
    pub auth: Arc<dyn AuthService>,
    pub picker: Arc<dyn ImagePicker>,
}

impl Services {
    pub fn from_settings(
        settings: &ClientSettings,
        picker: Arc<dyn ImagePicker>,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            recipes: build_recipe_api(settings)?,
            auth: build_auth_service(settings),
            picker,
        })
    }
}

/// Owns the session gate, the navigator, cooking history and the pending
/// notice. Every operation takes `&mut self`, so one event runs to completion
/// before the next starts.
///
/// A failed operation leaves its screen as it was before the call and stores
/// the error as the notice. While a notice is pending every other operation
/// is refused.
pub struct AppController {
    services: Services,
    session: Session,
    navigator: Navigator,
    history: HistoryLog,
    notice: Option<ApiError>,
}

impl AppController {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            session: Session::new(),
            navigator: Navigator::new(Graph::Unauthenticated),
            history: HistoryLog::with_samples(Utc::now()),
            notice: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn current_route(&self) -> &Route {
        self.navigator.current().route()
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn notice(&self) -> Option<&ApiError> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) -> Option<ApiError> {
        self.notice.take()
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), AppError> {
        self.ensure_no_notice()?;
        let result = self.login_inner(email, password).await;
        self.surface(result)
    }

    pub fn open_register(&mut self) -> Result<(), AppError> {
        self.ensure_no_notice()?;
        let result = self
            .navigator
            .push(Route::Register(Default::default()))
            .map(|_| ())
            .map_err(AppError::from);
        self.surface(result)
    }

    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), AppError> {
        self.ensure_no_notice()?;
        let result = self.register_inner(name, email, password).await;
        self.surface(result)
    }

    /// Plain back. A no-op at a graph root.
    pub fn back(&mut self) -> Result<(), AppError> {
        self.ensure_no_notice()?;
        self.navigator.pop();
        Ok(())
    }

    pub fn select_tab(&mut self, tab: Tab) -> Result<(), AppError> {
        self.ensure_no_notice()?;
        let result = self.navigator.select_tab(tab).map_err(AppError::from);
        self.surface(result)
    }

    pub async fn pick_image(&mut self, source: ImageSource) -> Result<(), AppError> {
        self.ensure_no_notice()?;
        let result = self.pick_image_inner(source).await;
        self.surface(result)
    }

    pub fn clear_image(&mut self) -> Result<(), AppError> {
        self.ensure_no_notice()?;
        let result = self.main_tab_mut(Tab::Home).map(|tabs| {
            tabs.home.clear();
        });
        self.surface(result)
    }

    /// Pushes the recognized-products screen for the selected photo and runs
    /// detection for it.
    pub async fn recognize(&mut self) -> Result<(), AppError> {
        self.ensure_no_notice()?;
        let result = self.recognize_inner().await;
        self.surface(result)
    }

    pub async fn retry_detection(&mut self) -> Result<(), AppError> {
        self.ensure_no_notice()?;
        let result = self.retry_detection_inner().await;
        self.surface(result)
    }

    pub fn remove_product(&mut self, id: &ProductId) -> Result<(), AppError> {
        self.ensure_no_notice()?;
        let result = self.products_mut().and_then(|screen| {
            screen
                .remove(id)
                .map(|product| info!(product = %product.name, "product removed"))
                .ok_or_else(|| AppError::validation(format!("Продукт {id} не найден")))
        });
        self.surface(result)
    }

    /// Refused while the product list is empty; otherwise pushes the recipe
    /// list for the remaining product names and fetches recipes.
    pub async fn generate_recipes(&mut self) -> Result<(), AppError> {
        self.ensure_no_notice()?;
        let result = self.generate_recipes_inner().await;
        self.surface(result)
    }

    pub async fn retry_recipes(&mut self) -> Result<(), AppError> {
        self.ensure_no_notice()?;
        let result = self.retry_recipes_inner().await;
        self.surface(result)
    }

    pub fn search(&mut self, query: &str) -> Result<(), AppError> {
        self.ensure_no_notice()?;
        let result = self
            .recipe_list_mut()
            .map(|screen| screen.set_query(query));
        self.surface(result)
    }

    pub fn toggle_difficulty(&mut self, tier: Difficulty) -> Result<Option<Difficulty>, AppError> {
        self.ensure_no_notice()?;
        let result = self
            .recipe_list_mut()
            .map(|screen| screen.toggle_difficulty(tier));
        self.surface(result)
    }

    pub fn open_recipe(&mut self, id: &RecipeId) -> Result<(), AppError> {
        self.ensure_no_notice()?;
        let result = self.open_recipe_inner(id);
        self.surface(result)
    }

    pub fn start_cooking(&mut self) -> Result<(), AppError> {
        self.ensure_no_notice()?;
        let result = self.start_cooking_inner();
        self.surface(result)
    }

    /// "Cooked it" on the detail screen is a plain back.
    pub fn mark_cooked(&mut self) -> Result<(), AppError> {
        self.ensure_no_notice()?;
        let result = self.detail_mut().map(|_| ());
        if result.is_ok() {
            self.navigator.pop();
        }
        self.surface(result)
    }

    /// Past the final step the flow records a history entry and lands on the
    /// History tab instead of pushing anything.
    pub fn next_step(&mut self) -> Result<StepOutcome, AppError> {
        self.ensure_no_notice()?;
        let result = self.next_step_inner();
        self.surface(result)
    }

    pub fn prev_step(&mut self) -> Result<(), AppError> {
        self.ensure_no_notice()?;
        let result = self.cooking_mut().map(|progress| {
            progress.back();
        });
        self.surface(result)
    }

    pub fn close_cooking(&mut self) -> Result<(), AppError> {
        self.ensure_no_notice()?;
        let result = self.cooking_mut().map(|_| ());
        if result.is_ok() {
            self.navigator.pop();
        }
        self.surface(result)
    }

    pub fn toggle_notifications(&mut self) -> Result<bool, AppError> {
        self.ensure_no_notice()?;
        let result = self
            .main_tab_mut(Tab::Profile)
            .map(|tabs| tabs.profile.toggle_notifications());
        self.surface(result)
    }

    /// First half of the profile's two-step sign-out.
    pub fn request_logout(&mut self) -> Result<(), AppError> {
        self.ensure_no_notice()?;
        let result = self
            .main_tab_mut(Tab::Profile)
            .map(|tabs| tabs.profile.set_logout_pending(true));
        self.surface(result)
    }

    pub fn cancel_logout(&mut self) -> Result<(), AppError> {
        self.ensure_no_notice()?;
        let result = self
            .main_tab_mut(Tab::Profile)
            .map(|tabs| tabs.profile.set_logout_pending(false));
        self.surface(result)
    }

    pub fn confirm_logout(&mut self) -> Result<(), AppError> {
        self.ensure_no_notice()?;
        let result = self.confirm_logout_inner();
        self.surface(result)
    }

    /// Signs out without the confirmation step.
    pub fn logout(&mut self) -> Result<(), AppError> {
        self.ensure_no_notice()?;
        let result = self.sign_out();
        self.surface(result)
    }

    fn ensure_no_notice(&self) -> Result<(), AppError> {
        match &self.notice {
            Some(_) => Err(AppError::invalid_state(NOTICE_PENDING)),
            None => Ok(()),
        }
    }

    fn surface<T>(&mut self, result: Result<T, AppError>) -> Result<T, AppError> {
        if let Err(err) = &result {
            warn!(code = ?err.code, message = %err.message, "operation failed");
            self.notice = Some(err.clone().into());
        }
        result
    }

    async fn login_inner(&mut self, email: &str, password: &str) -> Result<(), AppError> {
        self.session.ensure_signed_out()?;
        let Route::Login(form) = &mut self.navigator.current_mut().route else {
            return Err(self.wrong_route(RouteName::Login));
        };
        if email.trim().is_empty() || password.trim().is_empty() {
            return Err(AppError::validation(LOGIN_FIELDS_REQUIRED));
        }
        form.email = email.to_string();
        let email = email.trim();

        let user = self.services.auth.login(email, password).await?;
        self.sign_in(user)
    }

    async fn register_inner(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), AppError> {
        self.session.ensure_signed_out()?;
        let Route::Register(form) = &mut self.navigator.current_mut().route else {
            return Err(self.wrong_route(RouteName::Register));
        };
        if [name, email, password].iter().any(|field| field.trim().is_empty()) {
            return Err(AppError::validation(REGISTER_FIELDS_REQUIRED));
        }
        form.name = name.to_string();
        form.email = email.to_string();
        let (name, email) = (name.trim(), email.trim());

        let user = self.services.auth.register(name, email, password).await?;
        self.sign_in(user)
    }

    fn sign_in(&mut self, user: User) -> Result<(), AppError> {
        let email = user.email.clone();
        self.session.sign_in(user)?;
        self.navigator.reset(Graph::Authenticated);
        info!(%email, "signed in");
        Ok(())
    }

    fn confirm_logout_inner(&mut self) -> Result<(), AppError> {
        if !self.main_tab_mut(Tab::Profile)?.profile.logout_pending() {
            return Err(AppError::invalid_state("sign-out was not requested"));
        }
        self.sign_out()
    }

    fn sign_out(&mut self) -> Result<(), AppError> {
        let user = self.session.sign_out()?;
        self.navigator.reset(Graph::Unauthenticated);
        info!(email = %user.email, "signed out");
        Ok(())
    }

    async fn pick_image_inner(&mut self, source: ImageSource) -> Result<(), AppError> {
        self.main_tab_mut(Tab::Home)?;
        let picker = Arc::clone(&self.services.picker);

        if picker.request_permission(source).await == PermissionStatus::Denied {
            return Err(AppError::permission_denied(source.denied_message()));
        }
        let Some(uri) = picker.pick(source).await else {
            info!(?source, "image pick cancelled");
            return Ok(());
        };

        self.main_tab_mut(Tab::Home)?.home.select(uri);
        Ok(())
    }

    async fn recognize_inner(&mut self) -> Result<(), AppError> {
        let uri = self
            .main_tab_mut(Tab::Home)?
            .home
            .selected_image()
            .map(str::to_string)
            .ok_or_else(|| AppError::validation(IMAGE_REQUIRED))?;
        let screen = RecognizedProductsScreen::new(uri)?;
        let key = self.navigator.push(Route::RecognizedProducts(screen))?;
        self.load_products(key).await
    }

    async fn retry_detection_inner(&mut self) -> Result<(), AppError> {
        self.products_mut()?;
        let key = self.navigator.current().key();
        self.load_products(key).await
    }

    async fn retry_recipes_inner(&mut self) -> Result<(), AppError> {
        self.recipe_list_mut()?;
        let key = self.navigator.current().key();
        self.load_recipes(key).await
    }

    async fn generate_recipes_inner(&mut self) -> Result<(), AppError> {
        let names = self.products_mut()?.product_names();
        if names.is_empty() {
            return Err(AppError::validation(PRODUCTS_EMPTY));
        }
        let screen = RecipeListScreen::new(names)?;
        let key = self.navigator.push(Route::RecipeList(screen))?;
        self.load_recipes(key).await
    }

    fn open_recipe_inner(&mut self, id: &RecipeId) -> Result<(), AppError> {
        let recipe = self
            .recipe_list_mut()?
            .find_visible(id)
            .cloned()
            .ok_or_else(|| AppError::validation(format!("Рецепт {id} не найден")))?;
        self.navigator
            .push(Route::RecipeDetail(RecipeDetailScreen::new(recipe)))?;
        Ok(())
    }

    fn start_cooking_inner(&mut self) -> Result<(), AppError> {
        let detail = self.detail_mut()?;
        let progress =
            CookingProgress::new(detail.recipe().name.clone(), detail.instructions())?;
        self.navigator.push(Route::CookingMode(progress))?;
        Ok(())
    }

    fn next_step_inner(&mut self) -> Result<StepOutcome, AppError> {
        let progress = self.cooking_mut()?;
        let outcome = progress.advance();
        if outcome == StepOutcome::Finished {
            let recipe_name = progress.recipe_name().to_string();
            let entry = self.history.record(recipe_name, Utc::now());
            info!(recipe = %entry.recipe_name, "cooking finished");
            self.navigator.jump_to_tab(Tab::History)?;
        }
        Ok(outcome)
    }

    async fn load_products(&mut self, key: FrameKey) -> Result<(), AppError> {
        let err = self.wrong_route(RouteName::RecognizedProducts);
        let uri = match self.navigator.frame_mut(key).map(|frame| &mut frame.route) {
            Some(Route::RecognizedProducts(screen)) => {
                screen.begin_loading();
                screen.image_uri().to_string()
            }
            _ => return Err(err),
        };

        let recipes = Arc::clone(&self.services.recipes);
        let result = recipes.detect_products(&ImagePayload::new(uri)).await;
        self.deliver_products(key, result)
    }

    fn deliver_products(
        &mut self,
        key: FrameKey,
        result: Result<Vec<RecognizedProduct>, ClientError>,
    ) -> Result<(), AppError> {
        let Some(Route::RecognizedProducts(screen)) =
            self.navigator.frame_mut(key).map(|frame| &mut frame.route)
        else {
            warn!(%key, "products arrived for a closed screen; dropping");
            return Ok(());
        };
        match result {
            Ok(products) => {
                info!(%key, count = products.len(), "products delivered");
                screen.finish_loading(products);
                Ok(())
            }
            Err(err) => {
                warn!(%key, error = %err, "product detection failed");
                screen.abort_loading();
                Err(AppError::new(err.code(), DETECTION_FAILED))
            }
        }
    }

    async fn load_recipes(&mut self, key: FrameKey) -> Result<(), AppError> {
        let err = self.wrong_route(RouteName::RecipeList);
        let products = match self.navigator.frame_mut(key).map(|frame| &mut frame.route) {
            Some(Route::RecipeList(screen)) => {
                screen.begin_loading();
                screen.products().to_vec()
            }
            _ => return Err(err),
        };

        let recipes = Arc::clone(&self.services.recipes);
        let result = recipes.generate_recipes(&products).await;
        self.deliver_recipes(key, result)
    }

    fn deliver_recipes(
        &mut self,
        key: FrameKey,
        result: Result<Vec<Recipe>, ClientError>,
    ) -> Result<(), AppError> {
        let Some(Route::RecipeList(screen)) =
            self.navigator.frame_mut(key).map(|frame| &mut frame.route)
        else {
            warn!(%key, "recipes arrived for a closed screen; dropping");
            return Ok(());
        };
        match result {
            Ok(recipes) => {
                info!(%key, count = recipes.len(), "recipes delivered");
                screen.finish_loading(recipes);
                Ok(())
            }
            Err(err) => {
                warn!(%key, error = %err, "recipe generation failed");
                screen.abort_loading();
                Err(AppError::new(err.code(), GENERATION_FAILED))
            }
        }
    }

    fn wrong_route(&self, expected: RouteName) -> AppError {
        NavigationError::WrongRoute {
            expected,
            actual: self.navigator.current().name(),
        }
        .into()
    }

    fn main_tab_mut(&mut self, tab: Tab) -> Result<&mut MainTabs, AppError> {
        let active = match self.current_route() {
            Route::Main(tabs) => tabs.active(),
            _ => return Err(self.wrong_route(RouteName::Main)),
        };
        if active != tab {
            return Err(AppError::invalid_state(format!(
                "{} tab is not active (current: {})",
                tab.label(),
                active.label()
            )));
        }
        let err = self.wrong_route(RouteName::Main);
        match &mut self.navigator.current_mut().route {
            Route::Main(tabs) => Ok(tabs),
            _ => Err(err),
        }
    }

    fn products_mut(&mut self) -> Result<&mut RecognizedProductsScreen, AppError> {
        let err = self.wrong_route(RouteName::RecognizedProducts);
        match &mut self.navigator.current_mut().route {
            Route::RecognizedProducts(screen) => Ok(screen),
            _ => Err(err),
        }
    }

    fn recipe_list_mut(&mut self) -> Result<&mut RecipeListScreen, AppError> {
        let err = self.wrong_route(RouteName::RecipeList);
        match &mut self.navigator.current_mut().route {
            Route::RecipeList(screen) => Ok(screen),
            _ => Err(err),
        }
    }

    fn detail_mut(&mut self) -> Result<&mut RecipeDetailScreen, AppError> {
        let err = self.wrong_route(RouteName::RecipeDetail);
        match &mut self.navigator.current_mut().route {
            Route::RecipeDetail(screen) => Ok(screen),
            _ => Err(err),
        }
    }

    fn cooking_mut(&mut self) -> Result<&mut CookingProgress, AppError> {
        let err = self.wrong_route(RouteName::CookingMode);
        match &mut self.navigator.current_mut().route {
            Route::CookingMode(progress) => Ok(progress),
            _ => Err(err),
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
