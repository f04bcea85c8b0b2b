use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::identity::models::Identifier;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::ports::IdentityServicePort;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    let Json(body) = body?;

    state
        .identity_service
        .register(body.into_command())
        .await
        .map_err(ApiError::from)
        .map(|ref identifier| ApiSuccess::new(StatusCode::CREATED, identifier.into()))
}

/// HTTP request body for registering an identity (raw JSON)
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequestBody {
    identifier: String,
    secret: String,
}

impl RegisterRequestBody {
    fn into_command(self) -> RegisterCommand {
        RegisterCommand::new(self.identifier, self.secret)
    }
}

/// Only the identifier is returned, never the secret or its hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub identifier: String,
}

impl From<&Identifier> for RegisterResponseData {
    fn from(identifier: &Identifier) -> Self {
        Self {
            identifier: identifier.as_str().to_string(),
        }
    }
}
