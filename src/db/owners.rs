use sea_orm::*;

use crate::models::owners;

/// Insert a new owner. Callers validate the name.
pub async fn insert_owner<C: ConnectionTrait>(
    db: &C,
    name: String,
    phone: Option<String>,
    email: Option<String>,
) -> Result<owners::Model, DbErr> {
    let new_owner = owners::ActiveModel {
        name: Set(name),
        phone: Set(phone),
        email: Set(email),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    new_owner.insert(db).await
}

/// Fetch all owners in natural (id) order.
pub async fn get_all_owners<C: ConnectionTrait>(db: &C) -> Result<Vec<owners::Model>, DbErr> {
    owners::Entity::find()
        .order_by_asc(owners::Column::Id)
        .all(db)
        .await
}

/// Fetch a single owner by ID.
pub async fn get_owner_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<owners::Model>, DbErr> {
    owners::Entity::find_by_id(id).one(db).await
}
