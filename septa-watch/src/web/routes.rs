//! HTTP route handlers.

use askama::Template;
use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::septa::{Direction, SeptaError};
use crate::shell::{Selection, ShellView};
use crate::stations::{DEFAULT_RESULT_COUNT, RESULT_COUNTS, is_offered_count};

use super::dto::*;
use super::state::AppState;
use super::templates::IndexTemplate;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/search", post(search))
        .route("/auto-refresh", post(toggle_auto_refresh))
        .route("/clear", post(clear))
        .route("/api/view", get(view))
        .route("/api/next-to-arrive", get(api_next_to_arrive))
        .route("/api/train-view", get(api_train_view))
        .route("/api/station", get(api_station))
        .route("/api/arrivals", get(api_arrivals))
        .route("/api/search", get(api_search))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// The search window.
async fn index_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let view = state.shell.view().await;
    let template = IndexTemplate::new(view, state.shell.refresh_secs());
    let html = template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })?;
    Ok(Html(html))
}

/// Select a route and start a search.
///
/// Returns to the page straight away; the result appears once the search
/// task finishes.
async fn search(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> Result<Redirect, AppError> {
    let count = checked_count(Some(form.count))?;

    state
        .shell
        .select(Selection {
            origin: form.origin,
            destination: form.destination,
            count,
        })
        .await;
    state.shell.search().await;

    Ok(Redirect::to("/"))
}

async fn toggle_auto_refresh(State(state): State<AppState>) -> Redirect {
    let enabled = state.shell.toggle_auto_refresh().await;
    info!(enabled, "auto-refresh toggled from web");
    Redirect::to("/")
}

async fn clear(State(state): State<AppState>) -> Redirect {
    state.shell.clear().await;
    Redirect::to("/")
}

/// JSON snapshot of the search window.
async fn view(State(state): State<AppState>) -> Json<ShellView> {
    Json(state.shell.view().await)
}

async fn api_next_to_arrive(
    State(state): State<AppState>,
    Query(req): Query<RouteQuery>,
) -> Result<Json<RecordsResponse>, AppError> {
    let count = checked_count(req.count)?;
    let records = state
        .client()
        .next_to_arrive(&req.origin, &req.destination, count)
        .await?;
    Ok(Json(RecordsResponse::new(records)))
}

async fn api_train_view(State(state): State<AppState>) -> Result<Json<RecordsResponse>, AppError> {
    let records = state.client().train_view().await?;
    Ok(Json(RecordsResponse::new(records)))
}

async fn api_station(
    State(state): State<AppState>,
    Query(req): Query<StationQuery>,
) -> Result<Json<RecordsResponse>, AppError> {
    let count = checked_count(req.count)?;
    let direction = checked_direction(req.direction.as_deref())?;
    let records = state
        .client()
        .station_arrivals_departures(&req.station, direction, count)
        .await?;
    Ok(Json(RecordsResponse::new(records)))
}

async fn api_arrivals(
    State(state): State<AppState>,
    Query(req): Query<StationQuery>,
) -> Result<Json<RecordsResponse>, AppError> {
    let count = checked_count(req.count)?;
    let direction = checked_direction(req.direction.as_deref())?;
    let records = state
        .client()
        .arrivals(&req.station, direction, count, req.include_departures)
        .await?;
    Ok(Json(RecordsResponse::new(records)))
}

/// Enhanced search: schedule joined with live status.
async fn api_search(
    State(state): State<AppState>,
    Query(req): Query<RouteQuery>,
) -> Result<Json<RecordsResponse>, AppError> {
    let count = checked_count(req.count)?;
    if req.origin == req.destination {
        return Err(AppError::BadRequest {
            message: "origin and destination must differ".to_string(),
        });
    }
    let records = state
        .client()
        .search_trains_by_route(&req.origin, &req.destination, count)
        .await?;
    Ok(Json(RecordsResponse::new(records)))
}

fn checked_count(count: Option<u32>) -> Result<u32, AppError> {
    let count = count.unwrap_or(DEFAULT_RESULT_COUNT);
    if !is_offered_count(count) {
        return Err(AppError::BadRequest {
            message: format!("count must be one of {RESULT_COUNTS:?}, got {count}"),
        });
    }
    Ok(count)
}

fn checked_direction(direction: Option<&str>) -> Result<Direction, AppError> {
    direction
        .map(str::parse::<Direction>)
        .transpose()
        .map(Option::unwrap_or_default)
        .map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Upstream { message: String, kind: String },
    Internal { message: String },
}

impl From<SeptaError> for AppError {
    fn from(e: SeptaError) -> Self {
        AppError::Upstream {
            kind: e.kind().to_string(),
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, kind) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message, None),
            AppError::Upstream { message, kind } => (StatusCode::BAD_GATEWAY, message, Some(kind)),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message, None),
        };

        warn!(%status, %error, "request failed");

        (status, Json(ErrorResponse { error, kind })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::septa::{Endpoint, MockTransport, SeptaClient};
    use crate::shell::{Shell, ShellConfig};
    use serde_json::json;

    const SCENARIO_BODY: &str = r#"[{
        "train_id": "123",
        "origin": "Suburban Station",
        "destination": "30th Street Station",
        "departure_time": "10:00",
        "arrival_time": "10:20",
        "delay": "5"
    }]"#;

    /// Serve the router on an ephemeral port and return its base URL.
    async fn serve(mock: MockTransport) -> (String, Shell) {
        let shell = Shell::new(SeptaClient::with_transport(mock), ShellConfig::default());
        let app = create_router(AppState::new(shell.clone()), "static");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        (format!("http://{addr}"), shell)
    }

    fn no_redirect() -> reqwest::Client {
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap()
    }

    #[test]
    fn count_validation() {
        assert_eq!(checked_count(None).unwrap(), 10);
        assert_eq!(checked_count(Some(20)).unwrap(), 20);
        assert!(checked_count(Some(7)).is_err());
    }

    #[test]
    fn direction_validation() {
        assert_eq!(checked_direction(None).unwrap(), Direction::North);
        assert_eq!(checked_direction(Some("S")).unwrap(), Direction::South);
        assert!(checked_direction(Some("west")).is_err());
    }

    #[tokio::test]
    async fn health_and_index() {
        let (base, _shell) = serve(MockTransport::new()).await;

        let body = reqwest::get(format!("{base}/health")).await.unwrap().text().await.unwrap();
        assert_eq!(body, "ok");

        let page = reqwest::get(format!("{base}/")).await.unwrap();
        assert_eq!(page.status(), 200);
        let html = page.text().await.unwrap();
        assert!(html.contains("Search Trains"));
        assert!(html.contains("Ready to search for trains"));
    }

    #[tokio::test]
    async fn search_form_dispatches_and_redirects() {
        let mock = MockTransport::new()
            .with_body(Endpoint::NextToArrive, SCENARIO_BODY)
            .with_body(Endpoint::TrainView, "[]");
        let (base, shell) = serve(mock.clone()).await;

        let response = no_redirect()
            .post(format!("{base}/search"))
            .form(&[
                ("origin", "Suburban Station"),
                ("destination", "30th Street Station"),
                ("count", "5"),
            ])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER.as_u16());

        let selection = shell.selection().await;
        assert_eq!(selection.count, 5);

        // The search runs in the background; poll until it lands.
        let mut view = shell.view().await;
        for _ in 0..100 {
            if view.phase == "success" {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            view = shell.view().await;
        }
        assert!(view.output.contains("| Delay: 5 min"));
    }

    #[tokio::test]
    async fn same_station_form_shows_message() {
        let mock = MockTransport::new();
        let (base, shell) = serve(mock.clone()).await;

        no_redirect()
            .post(format!("{base}/search"))
            .form(&[("origin", "Paoli"), ("destination", "Paoli"), ("count", "10")])
            .send()
            .await
            .unwrap();

        assert!(shell.view().await.output.contains("different stations"));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn bad_count_is_rejected() {
        let (base, _shell) = serve(MockTransport::new()).await;

        let response = no_redirect()
            .post(format!("{base}/search"))
            .form(&[("origin", "Paoli"), ("destination", "Exton"), ("count", "7")])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST.as_u16());
    }

    #[tokio::test]
    async fn toggle_and_clear() {
        let (base, shell) = serve(MockTransport::new()).await;
        let client = no_redirect();

        client.post(format!("{base}/auto-refresh")).send().await.unwrap();
        assert!(shell.auto_refresh_enabled().await);

        client.post(format!("{base}/auto-refresh")).send().await.unwrap();
        assert!(!shell.auto_refresh_enabled().await);

        client.post(format!("{base}/clear")).send().await.unwrap();
        let view: serde_json::Value = reqwest::get(format!("{base}/api/view"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(view["status"], "Results cleared");
        assert_eq!(view["output"], "");
    }

    #[tokio::test]
    async fn api_passthrough_and_errors() {
        let mock = MockTransport::new()
            .with_body(Endpoint::NextToArrive, SCENARIO_BODY)
            .with_body(Endpoint::TrainView, r#"{"error":"maintenance"}"#)
            .with_body(
                Endpoint::Arrivals,
                json!([{"train_id": "1", "arrival_time": "10:00"}, {"train_id": "2"}]).to_string(),
            );
        let (base, _shell) = serve(mock.clone()).await;

        let route = "origin=Suburban%20Station&destination=30th%20Street%20Station&count=5";
        let body: RecordsResponse = reqwest::get(format!("{base}/api/next-to-arrive?{route}"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body.count, 1);

        let response = reqwest::get(format!("{base}/api/train-view")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY.as_u16());
        let error: ErrorResponse = response.json().await.unwrap();
        assert_eq!(error.kind.as_deref(), Some("upstream"));

        let body: RecordsResponse =
            reqwest::get(format!("{base}/api/arrivals?station=Paoli&direction=S"))
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
        assert_eq!(body.count, 1);
        assert!(mock.requests().iter().any(|r| {
            r.endpoint == Endpoint::Arrivals && r.query.contains(&("direction", "S".to_string()))
        }));

        let response = reqwest::get(format!("{base}/api/arrivals?station=Paoli&direction=up"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST.as_u16());
    }
}
