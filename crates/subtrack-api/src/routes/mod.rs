//! Route modules, one per service surface.

use axum::extract::FromRequest;

use crate::error::ApiError;

pub mod creation;
pub mod health;
pub mod query;

/// JSON body extractor whose rejections answer 400 with the API error body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);
