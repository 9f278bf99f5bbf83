// src/routes.rs

use axum::{
    Extension, Router,
    http::{HeaderValue, Method},
    routing::get,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{self, answer_key, forms, responses},
    state::AppState,
    store::Collection,
};

/// Assembles the main application router.
///
/// * Mounts the same route group for forms and for surveys.
/// * Serves the static front-end for unmatched paths when configured.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let mut app = Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/forms", collection_routes(Collection::Forms))
        .nest("/api/surveys", collection_routes(Collection::Surveys));

    if let Some(dir) = &state.config.static_dir {
        tracing::info!("Serving front-end from {}", dir.display());
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Routes shared by both collection families. Handlers read the family from the extension.
fn collection_routes(collection: Collection) -> Router<AppState> {
    Router::new()
        .route("/", get(forms::list_forms).post(forms::create_form))
        .route(
            "/draft",
            get(forms::get_draft)
                .put(forms::save_draft)
                .delete(forms::clear_draft),
        )
        .route(
            "/responses",
            get(responses::grouped_responses).delete(responses::clear_responses),
        )
        .route("/{id}", get(forms::get_form).put(forms::revise_form))
        .route(
            "/{id}/responses",
            get(responses::list_responses).post(responses::submit_response),
        )
        .route("/{id}/responses/{response_id}", get(responses::get_response))
        .route(
            "/{id}/responses/{response_id}/grade",
            get(responses::grade_response),
        )
        .route("/{id}/summary", get(responses::summarize_responses))
        .route(
            "/{id}/answer-key",
            get(answer_key::get_answer_key).put(answer_key::save_answer_key),
        )
        .layer(Extension(collection))
}
