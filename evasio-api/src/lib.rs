use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod checkout;
pub mod codes;
pub mod error;
pub mod forms;
pub mod fulfillment;
pub mod giftcards;
pub mod groups;
pub mod notifications;
pub mod results;
pub mod state;
pub mod webhooks;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // The marketing frontend calls these endpoints from the browser.
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    Router::new()
        .merge(checkout::routes())
        .merge(webhooks::routes())
        .merge(codes::routes())
        .merge(groups::routes())
        .merge(forms::routes())
        .merge(results::routes())
        .merge(giftcards::routes())
        .merge(notifications::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
