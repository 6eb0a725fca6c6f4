use axum::{
    routing::{delete, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/sessions", post(handlers::chat::create_session))
        .route("/api/sessions/:id", delete(handlers::chat::end_session))
        .route("/api/chat", post(handlers::chat::chat))
}
