//! Placeholder route and the catch-all 404.

use crate::errors::AppError;
use axum::{
    http::{Method, Uri},
    response::Html,
};

pub const TESTE_BODY: &str = "O servidor está a funcionar!";

/// `GET /teste`
///
/// Answers with a fixed string so a client can tell the server is up.
pub async fn teste() -> Html<&'static str> {
    Html(TESTE_BODY)
}

/// Fallback for paths that match neither a route nor a static file, and for
/// known paths called with a method they do not accept.
pub async fn not_found(method: Method, uri: Uri) -> AppError {
    AppError::not_found(format!("Cannot {} {}", method, uri.path()))
}
