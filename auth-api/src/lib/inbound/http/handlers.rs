use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::account::envelope::Envelope;

pub mod signin;
pub mod signup;

/// Transport wrapper for a flow envelope.
///
/// The envelope's own status code becomes the HTTP status; the serialized
/// envelope is the whole body.
#[derive(Debug, Clone)]
pub struct ApiEnvelope<T>(pub Envelope<T>);

impl<T: Serialize> IntoResponse for ApiEnvelope<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(self.0)).into_response()
    }
}
