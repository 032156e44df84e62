//! REST API definitions.

pub mod listing;

use axum::{
    routing::{get, patch, post},
    Router,
};

/// Creates a new [`Router`] serving the REST API.
///
/// [`Service`] is expected to be provided via [`axum::Extension`] layer.
///
/// [`Service`]: crate::Service
pub fn router() -> Router {
    Router::new()
        .route("/listings", get(listing::list).post(listing::create))
        .route("/listings/filter", get(listing::filter))
        .route("/listings/:id", get(listing::get))
        .route("/listing/search", post(listing::search))
        .route(
            "/listing/:id",
            patch(listing::update).delete(listing::delete),
        )
}
