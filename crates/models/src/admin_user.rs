use sea_orm::{entity::prelude::*, Set, DatabaseConnection, QueryFilter};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admin_user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    if !email.contains('@') { return Err(errors::ModelError::Validation("invalid email".into())); }
    Ok(())
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Email.eq(email.to_string()))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn create(db: &DatabaseConnection, email: &str, password_hash: String) -> Result<Model, errors::ModelError> {
    validate_email(email)?;
    if password_hash.trim().is_empty() {
        return Err(errors::ModelError::Validation("password hash required".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
