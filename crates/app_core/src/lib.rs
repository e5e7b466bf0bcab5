//! Headless core of the recipe app: session gate, navigation graph with
//! per-screen state, recipe filtering, the cooking walk-through, and the
//! controller that drives them against the services in `client_core`.

pub mod controller;
pub mod cooking;
pub mod filter;
pub mod history;
pub mod navigation;
pub mod picker;
pub mod screens;
pub mod session;

pub use controller::{AppController, Services};
pub use cooking::{CookingProgress, StepOutcome};
pub use filter::RecipeFilter;
pub use history::{relative_day_label, HistoryLog};
pub use navigation::{Frame, FrameKey, Graph, NavigationError, Navigator, Route, RouteName, Tab};
pub use picker::{ImagePicker, ImageSource, PermissionStatus};
pub use screens::RecipeListView;
pub use session::{Session, SessionError};
