//! Per-screen state owned by navigation frames. Route parameters are set at
//! construction and exposed read-only.

use shared::{
    domain::{Difficulty, ProductId, RecipeId, User},
    protocol::{Recipe, RecognizedProduct},
};

use crate::{
    filter::RecipeFilter,
    navigation::{NavigationError, RouteName, Tab},
};

/// Shown when a recipe arrives without its own steps.
pub const DEFAULT_INSTRUCTIONS: [&str; 5] = [
    "Подготовьте все ингредиенты.",
    "Нарежьте овощи кубиками.",
    "Смешайте ингредиенты в большой миске.",
    "Добавьте специи по вкусу.",
    "Подавайте блюдо охлажденным.",
];

const FALLBACK_NAME: &str = "ПОЛЬЗОВАТЕЛЬ";
const FALLBACK_EMAIL: &str = "EMAIL@EXAMPLE.COM";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeScreen {
    selected_image: Option<String>,
}

impl HomeScreen {
    pub fn selected_image(&self) -> Option<&str> {
        self.selected_image.as_deref()
    }

    pub(crate) fn select(&mut self, uri: String) {
        self.selected_image = Some(uri);
    }

    pub(crate) fn clear(&mut self) -> Option<String> {
        self.selected_image.take()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileScreen {
    notifications: bool,
    logout_pending: bool,
}

impl Default for ProfileScreen {
    fn default() -> Self {
        Self {
            notifications: true,
            logout_pending: false,
        }
    }
}

impl ProfileScreen {
    /// Uppercased name and email for the profile header, with placeholders
    /// for missing or blank values.
    pub fn header(user: Option<&User>) -> (String, String) {
        let shown = |value: Option<&str>, fallback: &str| {
            value
                .filter(|v| !v.trim().is_empty())
                .map(str::to_uppercase)
                .unwrap_or_else(|| fallback.to_string())
        };
        (
            shown(user.map(|u| u.name.as_str()), FALLBACK_NAME),
            shown(user.map(|u| u.email.as_str()), FALLBACK_EMAIL),
        )
    }

    pub fn notifications(&self) -> bool {
        self.notifications
    }

    pub fn logout_pending(&self) -> bool {
        self.logout_pending
    }

    pub(crate) fn toggle_notifications(&mut self) -> bool {
        self.notifications = !self.notifications;
        self.notifications
    }

    pub(crate) fn set_logout_pending(&mut self, pending: bool) {
        self.logout_pending = pending;
    }
}

/// Tab container at the root of the authenticated graph. History content is
/// process-wide and lives on the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MainTabs {
    active: Tab,
    pub(crate) home: HomeScreen,
    pub(crate) profile: ProfileScreen,
}

impl MainTabs {
    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn home(&self) -> &HomeScreen {
        &self.home
    }

    pub fn profile(&self) -> &ProfileScreen {
        &self.profile
    }

    pub(crate) fn activate(&mut self, tab: Tab) {
        if self.active != tab {
            self.profile.set_logout_pending(false);
        }
        self.active = tab;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedProductsScreen {
    image_uri: String,
    products: Vec<RecognizedProduct>,
    loading: bool,
}

impl RecognizedProductsScreen {
    pub fn new(image_uri: impl Into<String>) -> Result<Self, NavigationError> {
        let image_uri = image_uri.into();
        if image_uri.trim().is_empty() {
            return Err(NavigationError::MissingParameter {
                route: RouteName::RecognizedProducts,
                parameter: "image_uri",
            });
        }
        Ok(Self {
            image_uri,
            products: Vec::new(),
            loading: true,
        })
    }

    pub fn image_uri(&self) -> &str {
        &self.image_uri
    }

    pub fn products(&self) -> &[RecognizedProduct] {
        &self.products
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn product_names(&self) -> Vec<String> {
        self.products.iter().map(|p| p.name.clone()).collect()
    }

    pub(crate) fn begin_loading(&mut self) {
        self.loading = true;
    }

    pub(crate) fn finish_loading(&mut self, products: Vec<RecognizedProduct>) {
        self.products = products;
        self.loading = false;
    }

    /// A failed load keeps whatever list the screen already had.
    pub(crate) fn abort_loading(&mut self) {
        self.loading = false;
    }

    pub(crate) fn remove(&mut self, id: &ProductId) -> Option<RecognizedProduct> {
        let index = self.products.iter().position(|p| &p.id == id)?;
        Some(self.products.remove(index))
    }
}

/// What the list view shows right now.
#[derive(Debug, PartialEq)]
pub enum RecipeListView<'a> {
    Loading,
    Empty,
    Recipes(Vec<&'a Recipe>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecipeListScreen {
    products: Vec<String>,
    recipes: Vec<Recipe>,
    filter: RecipeFilter,
    loading: bool,
}

impl RecipeListScreen {
    pub fn new(products: Vec<String>) -> Result<Self, NavigationError> {
        if products.is_empty() {
            return Err(NavigationError::MissingParameter {
                route: RouteName::RecipeList,
                parameter: "products",
            });
        }
        Ok(Self {
            products,
            recipes: Vec::new(),
            filter: RecipeFilter::new(),
            loading: true,
        })
    }

    pub fn products(&self) -> &[String] {
        &self.products
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn filter(&self) -> &RecipeFilter {
        &self.filter
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn visible(&self) -> RecipeListView<'_> {
        if self.loading {
            return RecipeListView::Loading;
        }
        let matches = self.filter.apply(&self.recipes);
        if matches.is_empty() {
            RecipeListView::Empty
        } else {
            RecipeListView::Recipes(matches)
        }
    }

    /// Only recipes that pass the current filter can be opened.
    pub fn find_visible(&self, id: &RecipeId) -> Option<&Recipe> {
        self.recipes
            .iter()
            .find(|recipe| &recipe.id == id && self.filter.matches(recipe))
    }

    pub(crate) fn set_query(&mut self, query: impl Into<String>) {
        self.filter.set_query(query);
    }

    pub(crate) fn toggle_difficulty(&mut self, tier: Difficulty) -> Option<Difficulty> {
        self.filter.toggle_difficulty(tier)
    }

    pub(crate) fn begin_loading(&mut self) {
        self.loading = true;
    }

    pub(crate) fn finish_loading(&mut self, recipes: Vec<Recipe>) {
        self.recipes = recipes;
        self.loading = false;
    }

    pub(crate) fn abort_loading(&mut self) {
        self.loading = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientRow<'a> {
    pub name: &'a str,
    pub missing: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecipeDetailScreen {
    recipe: Recipe,
}

impl RecipeDetailScreen {
    pub fn new(recipe: Recipe) -> Self {
        Self { recipe }
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    pub fn ingredient_rows(&self) -> Vec<IngredientRow<'_>> {
        self.recipe
            .ingredients
            .iter()
            .map(|name| IngredientRow {
                name: name.as_str(),
                missing: self.recipe.is_missing(name),
            })
            .collect()
    }

    pub fn instructions(&self) -> Vec<String> {
        if self.recipe.steps.is_empty() {
            DEFAULT_INSTRUCTIONS.iter().map(|s| s.to_string()).collect()
        } else {
            self.recipe.steps.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use client_core::mock::sample_recipes;

    use super::*;

    #[test]
    fn routes_reject_empty_parameters() {
        assert!(matches!(
            RecognizedProductsScreen::new(" "),
            Err(NavigationError::MissingParameter { parameter: "image_uri", .. })
        ));
        assert!(matches!(
            RecipeListScreen::new(Vec::new()),
            Err(NavigationError::MissingParameter { parameter: "products", .. })
        ));
    }

    #[test]
    fn recipe_list_moves_from_loading_to_results_or_empty() {
        let mut screen = RecipeListScreen::new(vec!["Томаты".into()]).expect("screen");
        assert_eq!(screen.visible(), RecipeListView::Loading);

        screen.finish_loading(sample_recipes());
        let RecipeListView::Recipes(visible) = screen.visible() else {
            panic!("expected recipes");
        };
        assert_eq!(visible.len(), 2);

        screen.set_query("борщ");
        assert_eq!(screen.visible(), RecipeListView::Empty);

        screen.begin_loading();
        screen.finish_loading(Vec::new());
        screen.set_query("");
        assert_eq!(screen.visible(), RecipeListView::Empty);
    }

    #[test]
    fn aborted_reload_keeps_the_previous_lists() {
        let mut list = RecipeListScreen::new(vec!["Томаты".into()]).expect("screen");
        list.finish_loading(sample_recipes());
        list.begin_loading();
        list.abort_loading();
        assert!(!list.is_loading());
        assert_eq!(list.recipes().len(), 2);

        let mut products = RecognizedProductsScreen::new("file:///a.jpg").expect("screen");
        products.finish_loading(client_core::mock::sample_products());
        products.begin_loading();
        products.abort_loading();
        assert!(!products.is_loading());
        assert_eq!(products.product_names(), ["Томаты", "Сыр", "Базилик"]);
    }

    #[test]
    fn filtered_out_recipes_cannot_be_found() {
        let mut screen = RecipeListScreen::new(vec!["Сыр".into()]).expect("screen");
        screen.finish_loading(sample_recipes());
        let pasta = RecipeId::new("2");
        assert!(screen.find_visible(&pasta).is_some());
        screen.toggle_difficulty(Difficulty::Easy);
        assert!(screen.find_visible(&pasta).is_none());
    }

    #[test]
    fn detail_flags_missing_ingredients_and_falls_back_to_default_steps() {
        let recipe = sample_recipes().remove(0);
        let screen = RecipeDetailScreen::new(recipe);
        let missing: Vec<_> = screen
            .ingredient_rows()
            .into_iter()
            .filter(|row| row.missing)
            .map(|row| row.name)
            .collect();
        assert_eq!(missing, ["Оливковое масло"]);
        assert_eq!(screen.instructions().len(), DEFAULT_INSTRUCTIONS.len());
    }

    #[test]
    fn detail_prefers_the_recipe_steps() {
        let mut recipe = sample_recipes().remove(1);
        recipe.steps = vec!["Сварите пасту.".into()];
        let screen = RecipeDetailScreen::new(recipe);
        assert_eq!(screen.instructions(), ["Сварите пасту."]);
    }

    #[test]
    fn leaving_the_profile_tab_cancels_a_pending_logout() {
        let mut tabs = MainTabs::default();
        assert!(tabs.profile().notifications());
        tabs.activate(Tab::Profile);
        tabs.profile.set_logout_pending(true);
        tabs.activate(Tab::History);
        assert!(!tabs.profile().logout_pending());
    }

    #[test]
    fn profile_header_uppercases_or_falls_back() {
        let user = User::new("Анна", "anna@example.com");
        assert_eq!(
            ProfileScreen::header(Some(&user)),
            ("АННА".to_string(), "ANNA@EXAMPLE.COM".to_string())
        );
        assert_eq!(
            ProfileScreen::header(Some(&User::new("", "a@b.c"))).0,
            "ПОЛЬЗОВАТЕЛЬ"
        );
        assert_eq!(
            ProfileScreen::header(None),
            ("ПОЛЬЗОВАТЕЛЬ".to_string(), "EMAIL@EXAMPLE.COM".to_string())
        );
    }

    #[test]
    fn removing_products_is_one_way() {
        let mut screen = RecognizedProductsScreen::new("file:///a.jpg").expect("screen");
        screen.finish_loading(client_core::mock::sample_products());
        let removed = screen.remove(&ProductId::new("2")).expect("present");
        assert_eq!(removed.name, "Сыр");
        assert!(screen.remove(&ProductId::new("2")).is_none());
        assert_eq!(screen.product_names(), ["Томаты", "Базилик"]);
    }
}
