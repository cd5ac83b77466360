pub mod action;
pub mod app;
pub mod handlers;
pub mod seed;

pub use action::AppAction;
pub use app::{App, Center};
pub use handlers::register_demo_actions;
pub use seed::seed;
