mod dto;
pub mod handlers;
mod repo;
pub mod repo_types;
mod services;

pub use services::ensure_caller;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::workout_routes()
}
