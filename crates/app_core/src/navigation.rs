//! The two navigation subgraphs and the stack that walks them.
//!
//! Each pushed frame owns its screen state and carries a [`FrameKey`] so
//! asynchronous results can find the frame that asked for them, or notice
//! it is gone.

use std::{fmt, str::FromStr};

use shared::error::AppError;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::{
    cooking::CookingProgress,
    screens::{
        LoginForm, MainTabs, RecipeDetailScreen, RecipeListScreen, RecognizedProductsScreen,
        RegisterForm,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Graph {
    Unauthenticated,
    Authenticated,
}

impl Graph {
    pub fn root(self) -> RouteName {
        match self {
            Graph::Unauthenticated => RouteName::Login,
            Graph::Authenticated => RouteName::Main,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Home,
    History,
    Profile,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Home, Tab::History, Tab::Profile];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Home => "Главная",
            Tab::History => "История",
            Tab::Profile => "Профиль",
        }
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lowered = value.trim().to_lowercase();
        Tab::ALL
            .into_iter()
            .find(|tab| {
                lowered == format!("{tab:?}").to_lowercase() || lowered == tab.label().to_lowercase()
            })
            .ok_or_else(|| format!("unknown tab '{value}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteName {
    Login,
    Register,
    Main,
    RecognizedProducts,
    RecipeList,
    RecipeDetail,
    CookingMode,
}

impl RouteName {
    pub fn graph(self) -> Graph {
        match self {
            RouteName::Login | RouteName::Register => Graph::Unauthenticated,
            _ => Graph::Authenticated,
        }
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone)]
pub enum Route {
    Login(LoginForm),
    Register(RegisterForm),
    Main(MainTabs),
    RecognizedProducts(RecognizedProductsScreen),
    RecipeList(RecipeListScreen),
    RecipeDetail(RecipeDetailScreen),
    CookingMode(CookingProgress),
}

impl Route {
    pub fn name(&self) -> RouteName {
        match self {
            Route::Login(_) => RouteName::Login,
            Route::Register(_) => RouteName::Register,
            Route::Main(_) => RouteName::Main,
            Route::RecognizedProducts(_) => RouteName::RecognizedProducts,
            Route::RecipeList(_) => RouteName::RecipeList,
            Route::RecipeDetail(_) => RouteName::RecipeDetail,
            Route::CookingMode(_) => RouteName::CookingMode,
        }
    }

    fn root_of(graph: Graph) -> Route {
        match graph {
            Graph::Unauthenticated => Route::Login(LoginForm::default()),
            Graph::Authenticated => Route::Main(MainTabs::default()),
        }
    }
}

/// Edge table of both subgraphs. Detail routes hang off the Home tab only.
pub fn can_push(from: &Route, to: RouteName) -> bool {
    match (from, to) {
        (Route::Login(_), RouteName::Register) => true,
        (Route::Main(tabs), RouteName::RecognizedProducts) => tabs.active() == Tab::Home,
        (Route::RecognizedProducts(_), RouteName::RecipeList)
        | (Route::RecipeList(_), RouteName::RecipeDetail)
        | (Route::RecipeDetail(_), RouteName::CookingMode) => true,
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameKey(Uuid);

impl FrameKey {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for FrameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone)]
pub struct Frame {
    key: FrameKey,
    pub(crate) route: Route,
}

impl Frame {
    fn new(route: Route) -> Self {
        Self {
            key: FrameKey::new(),
            route,
        }
    }

    pub fn key(&self) -> FrameKey {
        self.key
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn name(&self) -> RouteName {
        self.route.name()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("no edge from {from} to {to}")]
    UnreachableEdge { from: RouteName, to: RouteName },
    #[error("{route} is not the root of the {graph:?} graph")]
    NotARoot { route: RouteName, graph: Graph },
    #[error("expected the {expected} screen but {actual} is on top")]
    WrongRoute {
        expected: RouteName,
        actual: RouteName,
    },
    #[error("tabs are only reachable in the authenticated graph")]
    NoTabs,
    #[error("{route} requires a non-empty {parameter}")]
    MissingParameter {
        route: RouteName,
        parameter: &'static str,
    },
}

impl From<NavigationError> for AppError {
    fn from(value: NavigationError) -> Self {
        match value {
            NavigationError::MissingParameter { .. } => AppError::validation(value.to_string()),
            other => AppError::invalid_state(other.to_string()),
        }
    }
}

/// A root frame that is never popped plus the frames stacked above it.
#[derive(Debug, Clone)]
pub struct Navigator {
    graph: Graph,
    root: Frame,
    above: Vec<Frame>,
}

impl Navigator {
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            root: Frame::new(Route::root_of(graph)),
            above: Vec::new(),
        }
    }

    pub fn graph(&self) -> Graph {
        self.graph
    }

    pub fn depth(&self) -> usize {
        self.above.len() + 1
    }

    pub fn is_at_root(&self) -> bool {
        self.above.is_empty()
    }

    pub fn current(&self) -> &Frame {
        self.above.last().unwrap_or(&self.root)
    }

    pub fn current_mut(&mut self) -> &mut Frame {
        self.above.last_mut().unwrap_or(&mut self.root)
    }

    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        std::iter::once(&self.root).chain(self.above.iter())
    }

    pub fn route_names(&self) -> Vec<RouteName> {
        self.frames().map(Frame::name).collect()
    }

    pub fn frame_mut(&mut self, key: FrameKey) -> Option<&mut Frame> {
        std::iter::once(&mut self.root)
            .chain(self.above.iter_mut())
            .find(|frame| frame.key == key)
    }

    pub fn main_tabs(&self) -> Option<&MainTabs> {
        match &self.root.route {
            Route::Main(tabs) => Some(tabs),
            _ => None,
        }
    }

    pub fn active_tab(&self) -> Option<Tab> {
        self.main_tabs().map(MainTabs::active)
    }

    pub fn push(&mut self, route: Route) -> Result<FrameKey, NavigationError> {
        let from = self.current();
        let to = route.name();
        if !can_push(&from.route, to) {
            return Err(NavigationError::UnreachableEdge {
                from: from.name(),
                to,
            });
        }
        let frame = Frame::new(route);
        let key = frame.key;
        self.above.push(frame);
        debug!(route = %to, %key, depth = self.depth(), "pushed frame");
        Ok(key)
    }

    /// Drops the top frame with its parameters and screen state. `None` at
    /// the root.
    pub fn pop(&mut self) -> Option<Frame> {
        let frame = self.above.pop()?;
        debug!(route = %frame.name(), depth = self.depth(), "popped frame");
        Some(frame)
    }

    pub fn replace(&mut self, route: Route) -> Result<FrameKey, NavigationError> {
        let to = route.name();
        let frame = Frame::new(route);
        let key = frame.key;

        if self.above.is_empty() {
            if to != self.graph.root() {
                return Err(NavigationError::NotARoot {
                    route: to,
                    graph: self.graph,
                });
            }
            self.root = frame;
        } else {
            let beneath = match self.above.len() {
                1 => &self.root,
                n => &self.above[n - 2],
            };
            if !can_push(&beneath.route, to) {
                return Err(NavigationError::UnreachableEdge {
                    from: beneath.name(),
                    to,
                });
            }
            let top = self.above.len() - 1;
            self.above[top] = frame;
        }

        debug!(route = %to, %key, "replaced top frame");
        Ok(key)
    }

    /// Switches tabs while the tab container is on top.
    pub fn select_tab(&mut self, tab: Tab) -> Result<(), NavigationError> {
        let graph = self.graph;
        let actual = self.current().name();
        match &mut self.current_mut().route {
            Route::Main(tabs) => {
                tabs.activate(tab);
                Ok(())
            }
            _ if graph == Graph::Unauthenticated => Err(NavigationError::NoTabs),
            _ => Err(NavigationError::WrongRoute {
                expected: RouteName::Main,
                actual,
            }),
        }
    }

    /// Pops back to the tab container and activates `tab`.
    pub fn jump_to_tab(&mut self, tab: Tab) -> Result<(), NavigationError> {
        let Route::Main(tabs) = &mut self.root.route else {
            return Err(NavigationError::NoTabs);
        };
        tabs.activate(tab);
        let discarded = self.above.len();
        self.above.clear();
        debug!(?tab, discarded, "jumped to tab");
        Ok(())
    }

    /// Graph swap: everything from the previous graph is discarded.
    pub fn reset(&mut self, graph: Graph) {
        debug!(from = ?self.graph, to = ?graph, "navigation graph reset");
        *self = Navigator::new(graph);
    }
}

#[cfg(test)]
#[path = "tests/navigation_tests.rs"]
mod tests;
