//! Session join and lookup handlers.

use axum::Json;
use axum::extract::{Form, Path, State};
use axum::response::{IntoResponse, Redirect};
use tracing::info;

use crate::dto::request::JoinForm;
use crate::dto::response::{ApiResponse, SessionSummary};
use crate::error::ApiError;
use crate::extractors::Identity;
use crate::state::AppState;

/// POST /join: create or open a session, then redirect to its page.
///
/// A blank code creates a session under a generated code.
pub async fn join(
    State(state): State<AppState>,
    identity: Identity,
    Form(form): Form<JoinForm>,
) -> impl IntoResponse {
    let session = state.store.create_or_get(&form.code, &identity.uid);
    let code = session.code();

    info!(
        session = %code,
        uid = %identity.uid,
        is_dm = session.is_owner(&identity.uid),
        "Joined session"
    );

    (identity.jar, Redirect::to(&format!("/g/{code}")))
}

/// GET /api/sessions/{code} and GET /g/{code}
pub async fn get_session(
    State(state): State<AppState>,
    identity: Identity,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.resolve_session(&code)?;
    let summary = SessionSummary::new(&session, session.is_owner(&identity.uid));
    Ok((identity.jar, Json(ApiResponse::ok(summary))))
}
