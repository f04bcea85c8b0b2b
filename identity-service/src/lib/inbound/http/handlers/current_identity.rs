use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedIdentity;

/// Echo the identity carried by the request's assertion.
pub async fn current_identity(
    Extension(authenticated): Extension<AuthenticatedIdentity>,
) -> ApiSuccess<CurrentIdentityResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        CurrentIdentityResponseData {
            identifier: authenticated.identifier.as_str().to_string(),
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentIdentityResponseData {
    pub identifier: String,
}
