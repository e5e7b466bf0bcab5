use shared::protocol::Recipe;

use super::*;
use crate::screens::RecipeDetailScreen;

fn sample_recipe() -> Recipe {
    client_core::mock::sample_recipes().remove(0)
}

fn products_route() -> Route {
    Route::RecognizedProducts(RecognizedProductsScreen::new("file:///photo.jpg").expect("screen"))
}

fn list_route() -> Route {
    Route::RecipeList(RecipeListScreen::new(vec!["Томаты".into()]).expect("screen"))
}

fn detail_route() -> Route {
    Route::RecipeDetail(RecipeDetailScreen::new(sample_recipe()))
}

fn cooking_route() -> Route {
    Route::CookingMode(CookingProgress::new("Салат", vec!["шаг".into()]).expect("progress"))
}

#[test]
fn unauthenticated_graph_reaches_register_and_back() {
    let mut nav = Navigator::new(Graph::Unauthenticated);
    assert_eq!(nav.current().name(), RouteName::Login);
    assert!(nav.pop().is_none());

    nav.push(Route::Register(RegisterForm::default()))
        .expect("login -> register");
    assert!(matches!(
        nav.push(Route::Register(RegisterForm::default())),
        Err(NavigationError::UnreachableEdge { .. })
    ));

    assert_eq!(nav.pop().map(|f| f.name()), Some(RouteName::Register));
    assert_eq!(nav.route_names(), [RouteName::Login]);
    assert_eq!(nav.active_tab(), None);
}

#[test]
fn authenticated_chain_follows_the_edge_table() {
    let mut nav = Navigator::new(Graph::Authenticated);
    assert!(matches!(
        nav.push(list_route()),
        Err(NavigationError::UnreachableEdge {
            from: RouteName::Main,
            to: RouteName::RecipeList
        })
    ));

    nav.push(products_route()).expect("main -> products");
    nav.push(list_route()).expect("products -> list");
    nav.push(detail_route()).expect("list -> detail");
    nav.push(cooking_route()).expect("detail -> cooking");
    assert_eq!(
        nav.route_names(),
        [
            RouteName::Main,
            RouteName::RecognizedProducts,
            RouteName::RecipeList,
            RouteName::RecipeDetail,
            RouteName::CookingMode,
        ]
    );
    assert!(matches!(
        nav.push(products_route()),
        Err(NavigationError::UnreachableEdge { .. })
    ));
}

#[test]
fn detail_routes_hang_off_the_home_tab_only() {
    let mut nav = Navigator::new(Graph::Authenticated);
    nav.select_tab(Tab::History).expect("tab");
    assert!(nav.push(products_route()).is_err());
    nav.select_tab(Tab::Home).expect("tab");
    assert!(nav.push(products_route()).is_ok());
}

#[test]
fn select_tab_requires_the_tab_container_on_top() {
    let mut nav = Navigator::new(Graph::Authenticated);
    nav.push(products_route()).expect("push");
    assert!(matches!(
        nav.select_tab(Tab::Profile),
        Err(NavigationError::WrongRoute { .. })
    ));

    let mut nav = Navigator::new(Graph::Unauthenticated);
    assert_eq!(nav.select_tab(Tab::Home), Err(NavigationError::NoTabs));
    assert_eq!(nav.jump_to_tab(Tab::Home), Err(NavigationError::NoTabs));
}

#[test]
fn jump_to_tab_discards_every_detail_frame() {
    let mut nav = Navigator::new(Graph::Authenticated);
    let products = nav.push(products_route()).expect("push");
    nav.push(list_route()).expect("push");

    nav.jump_to_tab(Tab::History).expect("jump");

    assert!(nav.is_at_root());
    assert_eq!(nav.active_tab(), Some(Tab::History));
    assert!(nav.frame_mut(products).is_none());
}

#[test]
fn replace_checks_the_frame_beneath() {
    let mut nav = Navigator::new(Graph::Authenticated);
    let first = nav.push(products_route()).expect("push");
    let second = nav.replace(products_route()).expect("replace");
    assert_ne!(first, second);
    assert_eq!(nav.depth(), 2);
    assert!(nav.frame_mut(first).is_none());

    assert!(matches!(
        nav.replace(list_route()),
        Err(NavigationError::UnreachableEdge { .. })
    ));
}

#[test]
fn replacing_the_root_only_accepts_the_graph_root() {
    let mut nav = Navigator::new(Graph::Unauthenticated);
    assert!(matches!(
        nav.replace(Route::Register(RegisterForm::default())),
        Err(NavigationError::NotARoot { .. })
    ));
    let before = nav.current().key();
    let after = nav
        .replace(Route::Login(LoginForm::default()))
        .expect("replace root");
    assert_ne!(before, after);
}

#[test]
fn reset_swaps_graphs_and_forgets_history() {
    let mut nav = Navigator::new(Graph::Unauthenticated);
    nav.push(Route::Register(RegisterForm::default()))
        .expect("push");
    nav.reset(Graph::Authenticated);
    assert_eq!(nav.graph(), Graph::Authenticated);
    assert_eq!(nav.route_names(), [RouteName::Main]);
    assert_eq!(nav.active_tab(), Some(Tab::Home));
    assert!(nav.pop().is_none());
}

#[test]
fn frame_keys_find_live_frames() {
    let mut nav = Navigator::new(Graph::Authenticated);
    let key = nav.push(products_route()).expect("push");
    assert!(nav.frame_mut(key).is_some());
    nav.pop();
    assert!(nav.frame_mut(key).is_none());
}

#[test]
fn tabs_parse_from_english_or_russian() {
    assert_eq!("history".parse::<Tab>(), Ok(Tab::History));
    assert_eq!("Профиль".parse::<Tab>(), Ok(Tab::Profile));
    assert!("settings".parse::<Tab>().is_err());
}
