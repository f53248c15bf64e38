//! `service` table: catalog entries offered to customers.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors;

pub const VISIBILITY_PUBLIC: &str = "public";
pub const VISIBILITY_PRIVATE: &str = "private";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// JSON array of image addresses; the first one is the cover.
    #[sea_orm(column_type = "JsonBinary")]
    pub images: Json,
    #[sea_orm(column_type = "Text", nullable)]
    pub image_url: Option<String>,
    /// Execution time in minutes.
    pub total_time: Option<i32>,
    #[sea_orm(column_type = "Double", nullable)]
    pub price: Option<f64>,
    pub visibility: String,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub notes: Option<Json>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_public(&self) -> bool {
        self.visibility == VISIBILITY_PUBLIC
    }
}

pub fn visibility_for(is_public: bool) -> &'static str {
    if is_public { VISIBILITY_PUBLIC } else { VISIBILITY_PRIVATE }
}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("name required".into()));
    }
    Ok(())
}
