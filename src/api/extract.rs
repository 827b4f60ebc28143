//! Request body extraction
//!
//! `Json` rejections are plain text by default; this wrapper sends them
//! through the same error envelope as every other failure.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use std::time::Instant;

use super::types::{failure, ApiFailure};
use crate::models::errors::AppError;

/// JSON body whose rejection is an `API_BAD_REQUEST` envelope
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiFailure;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let start = Instant::now();
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                let err = AppError::bad_request(rejection.body_text());
                Err(failure(&err, start.elapsed().as_secs_f64() * 1000.0))
            }
        }
    }
}
