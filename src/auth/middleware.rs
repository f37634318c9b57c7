use actix_web::http::header::Header;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use sea_orm::DatabaseConnection;
use std::future::Future;
use std::pin::Pin;

use crate::auth::jwt;
use crate::db::users::get_user_by_id;
use crate::error::AppError;
use crate::models::users::{self, Role};

/// The caller, resolved from the bearer token to an active local user.
pub struct AuthenticatedUser(pub users::Model);

impl AuthenticatedUser {
    pub fn id(&self) -> i32 {
        self.0.id
    }

    pub fn role(&self) -> Role {
        self.0.role
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // 1. Extract the Bearer token from the Authorization header.
            let auth = Authorization::<Bearer>::parse(&req).map_err(|_| {
                AppError::Unauthorized("Authorization header must be: Bearer <token>".to_string())
            })?;
            let bearer = auth.into_scheme();
            let token = bearer.token();

            // 2. Validate it against the shared secret.
            let secret = req
                .app_data::<web::Data<JwtSecret>>()
                .ok_or_else(|| AppError::Internal("JWT secret not configured".to_string()))?;
            let claims = jwt::validate_token(token, &secret.0).map_err(|e| {
                tracing::debug!(error = %e, "rejected bearer token");
                AppError::Unauthorized("Invalid token".to_string())
            })?;
            let user_id = claims.user_id().map_err(AppError::Unauthorized)?;

            // 3. Resolve the local user.
            let db = req
                .app_data::<web::Data<DatabaseConnection>>()
                .ok_or_else(|| AppError::Internal("Database not configured".to_string()))?;

            let user = get_user_by_id(db.get_ref(), user_id)
                .await?
                .ok_or_else(|| AppError::Unauthorized("Unknown user".to_string()))?;

            if !user.is_active {
                return Err(AppError::Forbidden("User account is disabled".to_string()));
            }

            Ok(AuthenticatedUser(user))
        })
    }
}

/// Wrapper type to store the JWT secret in Actix app data.
#[derive(Clone)]
pub struct JwtSecret(pub String);
