use crate::{
    api::AppState,
    db::models::{ErrorDetail, User},
    errors::ErrorMessages,
    logging::AUDIT_TARGET,
};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
    Json,
};
use tracing::{error, warn};

/// Header carrying the caller's API key when auth is enabled
pub const API_KEY_HEADER: &str = "x-api-key";

/// The user a request acts as
///
/// With auth disabled every request runs as the configured first superuser.
/// Otherwise the `x-api-key` header must name a non-expired key.
pub struct CurrentUser(pub User);

fn api_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn unauthorized() -> (StatusCode, Json<ErrorDetail>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorDetail::new(ErrorMessages::Unauthorized.to_string())),
    )
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = (StatusCode, Json<ErrorDetail>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let lookup = if state.config.auth_enabled {
            let Some(key) = api_key(&parts.headers) else {
                warn!(target: AUDIT_TARGET, "Request to {} without API key", parts.uri);
                return Err(unauthorized());
            };
            state.db.get_user_by_api_key(key).await
        } else {
            state.db.get_user_by_email(&state.config.first_superuser).await
        };

        match lookup {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => {
                warn!(target: AUDIT_TARGET, "Unknown credentials for {}", parts.uri);
                Err(unauthorized())
            }
            Err(err) => {
                error!("Failed to resolve current user: {}", err);
                Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorDetail::new(ErrorMessages::DB.to_string())),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_api_key_header_is_trimmed() {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("  secret  "));
        assert_eq!(api_key(&headers), Some("secret"));
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let mut headers = HeaderMap::new();
        assert_eq!(api_key(&headers), None);
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("   "));
        assert_eq!(api_key(&headers), None);
    }
}
