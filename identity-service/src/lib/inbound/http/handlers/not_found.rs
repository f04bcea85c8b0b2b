use super::ApiError;

pub async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
