//! Defines the extractors used by the relay endpoints.

use crate::core::Error;
use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;

#[derive(Deserialize)]
struct ConnectParams {
    room: String,
}

/// Extracts the target room identifier from the request url.
///
/// Rooms are client-defined, so any present value is accepted as-is.
pub struct RoomQuery(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for RoomQuery
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<ConnectParams>::from_request_parts(parts, state).await?;
        Ok(RoomQuery(params.room))
    }
}
