use axum::{
    Json, Router,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use kurser_core::prelude::*;
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

/// Planned events of one course
#[derive(Serialize)]
struct PlanResponse {
    course: String,
    events: Vec<EventDescriptor>,
}

#[derive(Deserialize)]
struct PlanQuery {
    format: Option<String>, // "json" or "ics", defaults to "ics"
    calendar_name: Option<String>,
    timezone: Option<String>,
}

pub fn create_app() -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/plan", post(plan_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "Kurser Preview Service",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Preview the calendar events derived from a course study plan",
        "endpoints": {
            "health": "/health",
            "plan": "/plan"
        }
    }))
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Plan a course without publishing it
async fn plan_handler(
    Query(params): Query<PlanQuery>,
    Json(course): Json<Course>,
) -> Result<Response, AppError> {
    tracing::info!("Planning course {}", course.name);
    let events = plan(&course)?;

    match params.format.as_deref() {
        Some("json") => Ok(Json(PlanResponse {
            course: course.name,
            events,
        })
        .into_response()),
        _ => {
            let defaults = IcsOptions::default();
            let generator = IcsGenerator::new(IcsOptions {
                calendar_name: params.calendar_name.or(defaults.calendar_name),
                timezone: params.timezone.or(defaults.timezone),
            });
            let ics_content = generator.generate(&[(course.name, events)])?;

            Ok((
                StatusCode::OK,
                [("Content-Type", "text/calendar; charset=utf-8")],
                ics_content,
            )
                .into_response())
        }
    }
}

#[derive(Debug)]
struct AppError(kurser_core::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self.0 {
            e if e.is_schedule_error() => (StatusCode::UNPROCESSABLE_ENTITY, "invalid schedule"),
            kurser_core::Error::Config(_) | kurser_core::Error::CourseFile { .. } => {
                (StatusCode::BAD_REQUEST, "bad request")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal error"),
        };

        if status.is_server_error() {
            tracing::error!("{}", self.0);
        }

        let body = Json(ErrorResponse {
            error: error_message.to_string(),
            message: self.0.to_string(),
        });

        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<kurser_core::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
