//! Login against the backend

use sede_core::CurrentUser;
use serde_json::json;
use tracing::{info, instrument};

use crate::client::ApiClient;
use crate::error::Result;

#[derive(Clone)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Exchange credentials for the current user
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentUser> {
        let body = self
            .api
            .post_json(
                &self.api.urls().login(),
                &json!({ "email": email, "password": password }),
            )
            .await?;
        let user = CurrentUser::from_login_response(&body, email);
        info!(user_id = user.id, role = user.role.as_str(), "Logged in");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::DEFAULT_TIMEOUT;
    use crate::test_support::serve;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use sede_core::UserRole;
    use serde_json::Value;

    #[tokio::test]
    async fn test_login_normalizes_user() {
        let app = Router::new().route(
            "/api/auth/login",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["password"], "secret");
                Json(json!({ "user": { "id": 9, "name": "Bia", "role": "Nurse", "headquarterId": 4 } }))
            }),
        );
        let base = serve(app).await;
        let auth = AuthClient::new(ApiClient::new(&base, DEFAULT_TIMEOUT).unwrap());

        let user = auth.login("bia@example.com", "secret").await.unwrap();
        assert_eq!(user.id, 9);
        assert_eq!(user.email, "bia@example.com");
        assert_eq!(user.role, UserRole::Nurse);
        assert_eq!(user.headquarter_id, Some(4));
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let app = Router::new().route(
            "/api/auth/login",
            post(|| async { (StatusCode::UNAUTHORIZED, r#"{"error":"Credenciais inválidas"}"#) }),
        );
        let base = serve(app).await;
        let auth = AuthClient::new(ApiClient::new(&base, DEFAULT_TIMEOUT).unwrap());

        let err = auth.login("x@example.com", "bad").await.unwrap_err();
        assert_eq!(err.status(), Some(401));
    }
}
