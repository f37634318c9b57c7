use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use crate::auth::middleware::AuthenticatedUser;
use crate::error::AppError;
use crate::leads::resolver;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub term: String,
}

/// GET /api/search/client?term=: always 200 with a found/not-found payload.
pub async fn search_client(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    let result = resolver::search_client(db.get_ref(), &query.term).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /api/search/owner?term=
pub async fn search_owner(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    let result = resolver::search_owner(db.get_ref(), &query.term).await?;
    Ok(HttpResponse::Ok().json(result))
}
