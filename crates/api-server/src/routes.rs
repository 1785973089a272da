use crate::error::ApiError;
use crate::method_override::method_override;
use application::StudentApp;
use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use domain::{DomainError, StudentDraft, StudentId};
use frontend::{StudentForm, View, ViewRenderer};
use serde::Serialize;
use std::sync::Arc;
use tower::util::{MapRequest, MapRequestLayer};
use tower::Layer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub student_app: Arc<StudentApp>,
    pub renderer: Arc<dyn ViewRenderer>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: String,
}

/// Router wrapped so that method overrides are applied before routing
pub type App = MapRequest<Router, fn(Request) -> Request>;

pub fn app(state: AppState) -> App {
    MapRequestLayer::new(method_override as fn(Request) -> Request).layer(router(state))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_students))
        .route("/students", post(create_student))
        .route("/students/new", get(new_student_form))
        .route(
            "/students/:id",
            get(show_student)
                .put(update_student)
                .patch(update_student)
                .delete(delete_student),
        )
        .route("/students/:id/edit", get(edit_student_form))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Ids that cannot even be parsed name no student
fn parse_id(raw: &str) -> Result<StudentId, DomainError> {
    raw.parse()
        .map_err(|_| DomainError::NotFound(raw.to_string()))
}

// Split errors a user can fix by editing the form from everything else
fn form_rejection(
    error: DomainError,
    draft: StudentDraft,
) -> Result<(StatusCode, StudentForm), DomainError> {
    match error {
        DomainError::ValidationFailed(errors) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            StudentForm::rejected(draft, errors),
        )),
        DomainError::DuplicateEmail(email) => Ok((
            StatusCode::CONFLICT,
            StudentForm::with_notice(
                draft,
                format!("A student with email {} already exists", email),
            ),
        )),
        other => Err(other),
    }
}

async fn list_students(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let students = state
        .student_app
        .student_service
        .list_students()
        .await
        .map_err(|e| ApiError::new("Error loading students", e))?;

    Ok(Html(state.renderer.render(&View::Home {
        students: &students,
    })))
}

async fn new_student_form(State(state): State<AppState>) -> Html<String> {
    Html(state.renderer.render(&View::Add {
        form: &StudentForm::empty(),
    }))
}

async fn create_student(
    State(state): State<AppState>,
    Form(draft): Form<StudentDraft>,
) -> Result<Response, ApiError> {
    match state.student_app.student_service.create_student(&draft).await {
        Ok(student) => {
            info!("✅ Created student {} <{}>", student.id, student.email);
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            let (status, form) =
                form_rejection(e, draft).map_err(|e| ApiError::new("Error creating student", e))?;
            warn!("Rejected new student: {}", status);
            Ok((status, Html(state.renderer.render(&View::Add { form: &form }))).into_response())
        }
    }
}

async fn show_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let context = "Error loading student";
    let id = parse_id(&id).map_err(|e| ApiError::new(context, e))?;
    let student = state
        .student_app
        .student_service
        .get_student(&id)
        .await
        .map_err(|e| ApiError::new(context, e))?;

    Ok(Html(state.renderer.render(&View::See { student: &student })))
}

async fn edit_student_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let context = "Error loading edit form";
    let id = parse_id(&id).map_err(|e| ApiError::new(context, e))?;
    let student = state
        .student_app
        .student_service
        .get_student(&id)
        .await
        .map_err(|e| ApiError::new(context, e))?;

    Ok(Html(state.renderer.render(&View::Edit {
        id: &student.id,
        form: &StudentForm::prefilled(&student),
    })))
}

async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(draft): Form<StudentDraft>,
) -> Result<Response, ApiError> {
    let context = "Error updating student";
    let id = parse_id(&id).map_err(|e| ApiError::new(context, e))?;

    match state
        .student_app
        .student_service
        .update_student(&id, &draft)
        .await
    {
        Ok(student) => {
            info!("✏️  Updated student {}", student.id);
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            let (status, form) = form_rejection(e, draft).map_err(|e| ApiError::new(context, e))?;
            warn!("Rejected update of student {}: {}", id, status);
            Ok((
                status,
                Html(state.renderer.render(&View::Edit {
                    id: &id,
                    form: &form,
                })),
            )
                .into_response())
        }
    }
}

async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, ApiError> {
    let context = "Error deleting student";
    let id = parse_id(&id).map_err(|e| ApiError::new(context, e))?;
    state
        .student_app
        .student_service
        .delete_student(&id)
        .await
        .map_err(|e| ApiError::new(context, e))?;

    info!("🗑️  Deleted student {}", id);
    Ok(Redirect::to("/"))
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
