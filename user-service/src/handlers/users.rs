use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

use crate::{
    models::{NewUser, User, UserId},
    utils::ValidatedBody,
    AppState,
};

pub async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.users.list_all())
}

/// `GET /api/users/:id`
///
/// The id is read the way clients' `parseInt` reads it: a leading integer,
/// trailing text ignored. Only a segment with no leading digits is a bad id;
/// an integer that cannot belong to a record (negative, too large) is simply
/// not found.
pub async fn get_user(
    State(state): State<AppState>,
    raw_id: Result<Path<String>, PathRejection>,
) -> Result<Json<User>, AppError> {
    let invalid_id = || AppError::BadRequest(anyhow::anyhow!("Invalid user ID"));

    let Path(raw_id) = raw_id.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected user id segment");
        invalid_id()
    })?;

    let id = parse_user_id(&raw_id).ok_or_else(invalid_id)?;

    let user = id.and_then(|id| state.users.get_by_id(id)).ok_or_else(|| {
        tracing::debug!(user_id = %raw_id, "User not found");
        AppError::NotFound(anyhow::anyhow!("User not found"))
    })?;

    Ok(Json(user))
}

pub async fn create_user(
    State(state): State<AppState>,
    ValidatedBody(new_user): ValidatedBody<NewUser>,
) -> impl IntoResponse {
    let user = state.users.create(new_user.name, new_user.email);

    metrics::counter!("user_service_users_created_total").increment(1);
    tracing::info!(user_id = user.id, "User created");

    (StatusCode::CREATED, Json(user))
}

/// Leading-integer parse of a path segment.
///
/// `None` when no digits lead the segment; `Some(None)` when the integer fits
/// no [`UserId`].
fn parse_user_id(raw: &str) -> Option<Option<UserId>> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }

    if negative {
        return Some(None);
    }

    Some(rest[..digits].parse().ok())
}
