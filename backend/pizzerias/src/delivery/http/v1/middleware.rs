use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    usecase::error::UsecaseError,
    usecase::jwt::{JwtService, TokenType},
    AppState,
};

#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub role: String,
}

impl AuthenticatedUser {
    pub fn require_moderator(&self) -> Result<(), UsecaseError> {
        if matches!(self.role.as_str(), "moderator" | "admin") {
            return Ok(());
        }
        tracing::warn!(user_id = %self.user_id, role = %self.role, "moderation attempt without privileges");
        Err(UsecaseError::Forbidden(
            "Moderator access required".to_string(),
        ))
    }
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
}

pub fn authenticate(
    jwt: &JwtService,
    token: Option<&str>,
) -> Result<AuthenticatedUser, UsecaseError> {
    let Some(token) = token else {
        tracing::warn!("missing or invalid authorization header");
        return Err(UsecaseError::Unauthorized(
            "Missing or invalid Authorization header".to_string(),
        ));
    };

    let claims = jwt.validate_token(token).map_err(|e| {
        tracing::warn!(?e, "invalid token");
        UsecaseError::Unauthorized(format!("Invalid token: {}", e))
    })?;

    if claims.token_type != TokenType::Access {
        tracing::warn!("attempted to use non-access token for authentication");
        return Err(UsecaseError::Unauthorized("Invalid token type".to_string()));
    }

    let user_id = Uuid::parse_str(&claims.sub).map_err(|e| {
        tracing::warn!(?e, "failed to parse user_id from token");
        UsecaseError::Unauthorized("Invalid user ID in token".to_string())
    })?;

    Ok(AuthenticatedUser {
        user_id,
        role: claims.role,
    })
}

pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, UsecaseError> {
    let authenticated_user = authenticate(&state.jwt_service, bearer_token(&request))?;

    tracing::debug!(?authenticated_user, "user authenticated successfully");
    request.extensions_mut().insert(authenticated_user);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::*;
    use crate::usecase::jwt::Claims;

    fn user(role: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            role: role.to_string(),
        }
    }

    #[test]
    fn test_require_moderator() {
        assert!(user("moderator").require_moderator().is_ok());
        assert!(user("admin").require_moderator().is_ok());
        assert!(matches!(
            user("user").require_moderator(),
            Err(UsecaseError::Forbidden(_))
        ));
    }

    fn token(token_type: TokenType, sub: &str) -> String {
        let now = chrono::Utc::now().timestamp();
        crate::usecase::jwt::issue_test_token(
            "secret",
            &Claims {
                sub: sub.to_string(),
                email: "crust@example.com".to_string(),
                exp: now + 3600,
                iat: now,
                token_type,
                role: "user".to_string(),
            },
        )
    }

    #[test]
    fn test_authenticate_access_token() {
        let jwt = JwtService::new("secret".to_string());
        let user_id = Uuid::new_v4();
        let token = token(TokenType::Access, &user_id.to_string());

        let user = authenticate(&jwt, Some(token.as_str())).unwrap();
        assert_eq!(user.user_id, user_id);
        assert_eq!(user.role, "user");
    }

    #[test]
    fn test_authenticate_rejections_are_unauthorized() {
        let jwt = JwtService::new("secret".to_string());
        let refresh = token(TokenType::Refresh, &Uuid::new_v4().to_string());
        let bad_sub = token(TokenType::Access, "not-a-uuid");

        for header in [None, Some("garbage"), Some(refresh.as_str()), Some(bad_sub.as_str())] {
            assert!(matches!(
                authenticate(&jwt, header),
                Err(UsecaseError::Unauthorized(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_missing_header_renders_json_envelope() {
        let jwt = JwtService::new("secret".to_string());
        let response = authenticate(&jwt, None).unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Missing or invalid Authorization header");
    }

    #[test]
    fn test_bearer_token_extraction() {
        let request = Request::builder()
            .header("Authorization", "Bearer abc.def.ghi")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&request), Some("abc.def.ghi"));

        let request = Request::builder()
            .header("Authorization", "Basic xyz")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&request), None);
    }
}
