//! Request extractors that report rejections as `AppError::Validation`
//!
//! axum's own `Json`, `Path` and `Query` reject with plain-text bodies; these
//! wrappers keep every client error in the `{"error": {...}}` shape.

use axum::extract::{
    rejection::{JsonRejection, PathRejection, QueryRejection},
    FromRequest, FromRequestParts,
};

use crate::error::AppError;

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Path parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Query string parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => {
                let (field, message) = describe_data_error(&e.body_text());
                AppError::validation(field, message)
            }
            JsonRejection::JsonSyntaxError(_) => {
                AppError::validation("body", "Request body is not valid JSON")
            }
            JsonRejection::MissingJsonContentType(_) => {
                AppError::validation("body", "Expected `Content-Type: application/json`")
            }
            other => AppError::validation("body", other.body_text()),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::validation("id", rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::validation("query", rejection.body_text())
    }
}

/// Pull the offending field out of a deserialization message such as
/// "Failed to deserialize ...: lines[0]: missing field `quantity` at line 1".
fn describe_data_error(text: &str) -> (String, String) {
    let detail = text
        .split_once("target type: ")
        .map(|(_, rest)| rest)
        .unwrap_or(text);

    // serde reports the path to the value before the first ": "
    let (path, reason) = match detail.split_once(": ") {
        Some((path, reason)) if !path.is_empty() && !path.contains(' ') => {
            (Some(path), reason)
        }
        _ => (None, detail),
    };

    if let Some(missing) = reason
        .split_once("missing field `")
        .and_then(|(_, rest)| rest.split_once('`'))
        .map(|(name, _)| name)
    {
        let field = match path {
            Some(p) => format!("{}.{}", p, missing),
            None => missing.to_string(),
        };
        return (field, format!("{} is required", missing));
    }

    let reason = reason
        .split(" at line ")
        .next()
        .unwrap_or(reason)
        .to_string();
    (path.unwrap_or("body").to_string(), reason)
}
