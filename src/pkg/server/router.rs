use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;

use super::handlers::probes::{healthz, livez};
use super::handlers::{api, candidates, criteria, evaluations, processes, ui};
use super::state::AppState;
use crate::pkg::internal::documents::MAX_DOCUMENT_BYTES;
use crate::prelude::Result;

pub async fn build_routes() -> Result<Router> {
    let state = AppState::new().await?;
    let app = Router::new()
        .route("/", get(ui::home))
        .route("/dashboard", get(ui::dashboard))
        .route("/processes", post(processes::create))
        .route("/processes/{process_id}/board", get(ui::board))
        .route(
            "/processes/{process_id}/candidates/new",
            get(candidates::create_form),
        )
        .route(
            "/processes/{process_id}/candidates",
            post(candidates::create),
        )
        .route(
            "/candidates/{candidate_id}/document",
            get(candidates::document),
        )
        .route(
            "/processes/{process_id}/criteria",
            get(criteria::list_modal).post(criteria::create),
        )
        .route(
            "/processes/{process_id}/criteria/new",
            get(criteria::create_form),
        )
        .route("/criteria/{criterion_id}/edit", get(criteria::edit_form))
        .route(
            "/criteria/{criterion_id}",
            post(criteria::update).delete(criteria::remove),
        )
        .route("/rankings/{ranking_id}/evaluate", get(evaluations::modal))
        .route(
            "/rankings/{ranking_id}/criteria/{criterion_id}/score",
            post(evaluations::save_score),
        )
        .route("/rankings/{ranking_id}/notes", post(evaluations::save_notes))
        .route("/rankings/{ranking_id}/tier", post(evaluations::update_tier))
        .route(
            "/api/candidates",
            get(api::list_candidates).post(api::create_candidate),
        )
        .route(
            "/api/candidates/{candidate_id}",
            get(api::get_candidate)
                .patch(api::update_candidate)
                .delete(api::delete_candidate),
        )
        .route(
            "/api/processes",
            get(api::list_processes).post(api::create_process),
        )
        .route(
            "/api/processes/{process_id}",
            get(api::get_process)
                .patch(api::update_process)
                .delete(api::delete_process),
        )
        .route(
            "/api/processes/{process_id}/rankings",
            get(api::list_rankings).post(api::attach_candidate),
        )
        .route("/api/rankings/{ranking_id}", delete(api::delete_ranking))
        .route("/healthz", get(healthz))
        .route("/livez", get(livez))
        .layer(DefaultBodyLimit::max(MAX_DOCUMENT_BYTES + 1024 * 1024))
        .with_state(state);

    Ok(app)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use tracing_test::traced_test;

    use super::build_routes;

    #[tokio::test]
    #[traced_test]
    async fn liveness_route_responds() {
        let app = build_routes().await.unwrap();
        let response = app
            .oneshot(Request::get("/livez").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    #[traced_test]
    async fn unknown_route_is_not_found() {
        let app = build_routes().await.unwrap();
        let response = app
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[traced_test]
    async fn processes_route_rejects_get() {
        let app = build_routes().await.unwrap();
        let response = app
            .oneshot(Request::get("/processes").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
