//! Local game API
//! REST surface a front-end drives in place of in-page event handlers

pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod types;

pub use handlers::AppState;
pub use routes::create_router;
pub use types::*;
