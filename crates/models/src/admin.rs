use sea_orm::{entity::prelude::*, Condition, Set};
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admins")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    errors::require_text("name", name)?;
    errors::max_len("name", name, 100)
}

/// Emails identify admins case-insensitively; stored and compared in this form.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    if !email.contains('@') {
        return Err(ModelError::Validation("invalid email".into()));
    }
    errors::max_len("email", email, 120)
}

/// Insert an admin with an already-hashed password. Duplicate name or email
/// surfaces as [`ModelError::Conflict`].
pub async fn create<C: ConnectionTrait>(db: &C, name: &str, email: &str, password_hash: &str) -> Result<Model, ModelError> {
    validate_name(name)?;
    let email = normalize_email(email);
    validate_email(&email)?;
    let am = ActiveModel {
        name: Set(name.to_string()),
        email: Set(email),
        password_hash: Set(password_hash.to_string()),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Email.eq(normalize_email(email))).one(db).await?)
}

pub async fn exists_with_name_or_email<C: ConnectionTrait>(db: &C, name: &str, email: &str) -> Result<bool, ModelError> {
    let found = Entity::find()
        .filter(Condition::any().add(Column::Name.eq(name)).add(Column::Email.eq(normalize_email(email))))
        .one(db)
        .await?;
    Ok(found.is_some())
}
