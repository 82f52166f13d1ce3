use axum::extract::{rejection::JsonRejection, FromRequest, Request};
use axum::http::header;
use axum::{Form, Json};
use serde_json::{map::Entry, Map, Value};
use service_core::error::AppError;
use thiserror::Error;

use crate::dtos::CreateUserRequest;
use crate::models::NewUser;

/// Limit in UTF-16 code units, the unit browsers and JS clients measure in.
const MAX_EMAIL_LENGTH: usize = 254;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Reasons a create request is rejected. Rules are checked in declaration
/// order and the first failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name and email are required")]
    MissingFields,

    #[error("Name and email must be strings")]
    NotStrings,

    #[error("Invalid email format")]
    InvalidEmail,
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::BadRequest(anyhow::Error::new(err))
    }
}

/// A value that is built from a request body only if the body is valid.
pub trait ValidateRequest: Sized {
    type Payload: From<Value> + Send;

    fn validate(payload: Self::Payload) -> Result<Self, ValidationError>;
}

impl ValidateRequest for NewUser {
    type Payload = CreateUserRequest;

    fn validate(payload: CreateUserRequest) -> Result<Self, ValidationError> {
        validate_new_user(payload.name.as_ref(), payload.email.as_ref())
    }
}

/// Body extractor that runs [`ValidateRequest`] before the handler sees it.
///
/// JSON bodies must be an object or an array; urlencoded forms are decoded
/// into string fields. Any other content type is treated as `{}` so it fails
/// the presence rule rather than being rejected as unsupported media.
pub struct ValidatedBody<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedBody<T>
where
    T: ValidateRequest + Send + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with(FORM_CONTENT_TYPE));

        let body = if is_form {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|rejection| {
                    tracing::debug!(error = %rejection.body_text(), "Rejected form body");
                    AppError::BadRequest(anyhow::anyhow!("Invalid form body"))
                })?;
            form_fields(pairs)
        } else {
            match Json::<Value>::from_request(req, state).await {
                Ok(Json(value)) if value.is_object() || value.is_array() => value,
                Ok(Json(_)) => {
                    tracing::debug!("Rejected JSON body that is not an object or array");
                    return Err(AppError::BadRequest(anyhow::anyhow!("Invalid JSON body")));
                }
                Err(JsonRejection::MissingJsonContentType(_)) => Value::Object(Map::new()),
                Err(rejection) => {
                    tracing::debug!(error = %rejection.body_text(), "Rejected request body");
                    return Err(AppError::BadRequest(anyhow::anyhow!("Invalid JSON body")));
                }
            }
        };

        let value = T::validate(T::Payload::from(body)).map_err(|e| {
            tracing::debug!(reason = %e, "Request failed validation");
            e
        })?;

        Ok(ValidatedBody(value))
    }
}

/// Form pairs as a JSON object. A repeated key collects its values into an
/// array, so it reads as a non-string field.
fn form_fields(pairs: Vec<(String, String)>) -> Value {
    let mut fields = Map::new();
    for (key, value) in pairs {
        match fields.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(Value::String(value));
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                Value::Array(values) => values.push(Value::String(value)),
                existing => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, Value::String(value)]);
                }
            },
        }
    }
    Value::Object(fields)
}

/// Check submitted name and email and produce a storable [`NewUser`].
pub fn validate_new_user(
    name: Option<&Value>,
    email: Option<&Value>,
) -> Result<NewUser, ValidationError> {
    let (Some(name), Some(email)) = (name.filter(|v| is_truthy(v)), email.filter(|v| is_truthy(v)))
    else {
        return Err(ValidationError::MissingFields);
    };

    let (Value::String(name), Value::String(email)) = (name, email) else {
        return Err(ValidationError::NotStrings);
    };

    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(NewUser {
        name: name.clone(),
        email: email.clone(),
    })
}

/// `null`, `false`, `0` and `""` count as absent; everything else, including
/// empty arrays and objects, counts as present.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Structural email check: `local@domain.tld` shape, no deliverability lookup.
pub fn is_valid_email(email: &str) -> bool {
    if email.encode_utf16().count() > MAX_EMAIL_LENGTH {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }

    if local.chars().any(char::is_whitespace) || domain.chars().any(char::is_whitespace) {
        return false;
    }

    match domain.find('.') {
        Some(dot) => dot > 0 && dot < domain.len() - 1,
        None => false,
    }
}
