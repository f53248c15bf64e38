//! Remote repositories over the `service` and `tool` tables.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::instrument;

use models::{catalog_service, tool};

use crate::catalog::repository::{ServiceRepository, ToolRepository};
use crate::domain::{Annotation, PublicService, Service, ServiceInput, ServicePatch, Tool, ToolInput};
use crate::errors::ServiceError;

/// Remote ids are numeric; anything else cannot match a row.
fn parse_id(id: &str) -> Option<i64> {
    id.trim().parse::<i64>().ok()
}

fn service_from_model(m: catalog_service::Model) -> Service {
    let is_public = m.is_public();
    let images: Vec<String> = serde_json::from_value(m.images).unwrap_or_default();
    Service {
        id: m.id.to_string(),
        name: m.name,
        description: m.description,
        image_url: images.first().cloned().or(m.image_url),
        images,
        execution_time_minutes: m.total_time.map(|t| t.max(0) as u32),
        cost: m.price,
        is_public,
        annotation: m.notes.and_then(Annotation::from_json),
        created_at: m.created_at.with_timezone(&Utc),
    }
}

fn public_from_model(m: catalog_service::Model) -> PublicService {
    PublicService::from(&service_from_model(m))
}

/// Copy every editable field of `s` onto the active model.
fn write_service(am: &mut catalog_service::ActiveModel, s: &Service) -> Result<(), ServiceError> {
    catalog_service::validate_name(&s.name)?;
    am.name = Set(s.name.clone());
    am.description = Set(s.description.clone());
    am.images = Set(serde_json::json!(s.images));
    am.image_url = Set(s.image_url.clone());
    am.total_time = Set(s.execution_time_minutes.map(|m| m.min(i32::MAX as u32) as i32));
    am.price = Set(s.cost);
    am.visibility = Set(catalog_service::visibility_for(s.is_public).to_string());
    am.notes = Set(s.annotation.as_ref().map(Annotation::to_json));
    Ok(())
}

fn tool_from_model(m: tool::Model) -> Tool {
    Tool {
        id: m.id.to_string(),
        name: m.name,
        description: m.description,
        quantity: m.quantity.max(0),
        min_quantity: m.min_quantity.max(0),
        location: m.location,
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

pub struct SeaOrmServiceRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl ServiceRepository for SeaOrmServiceRepository {
    async fn list_all(&self) -> Result<Vec<Service>, ServiceError> {
        let rows = catalog_service::Entity::find()
            .order_by_desc(catalog_service::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(service_from_model).collect())
    }

    async fn list_public(&self) -> Result<Vec<PublicService>, ServiceError> {
        let rows = catalog_service::Entity::find()
            .filter(catalog_service::Column::Visibility.eq(catalog_service::VISIBILITY_PUBLIC))
            .order_by_desc(catalog_service::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(public_from_model).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Service>, ServiceError> {
        let Some(pk) = parse_id(id) else { return Ok(None) };
        let row = catalog_service::Entity::find_by_id(pk).one(&self.db).await?;
        Ok(row.map(service_from_model))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    async fn create(&self, input: ServiceInput) -> Result<Service, ServiceError> {
        let now = Utc::now();
        // id is assigned by the database
        let draft = input.into_service(String::new(), now)?;
        let mut am = catalog_service::ActiveModel { created_at: Set(now.into()), ..Default::default() };
        write_service(&mut am, &draft)?;
        let created = am.insert(&self.db).await?;
        Ok(service_from_model(created))
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: &str, patch: ServicePatch) -> Result<Service, ServiceError> {
        let pk = parse_id(id).ok_or_else(ServiceError::record_not_found)?;
        let row = catalog_service::Entity::find_by_id(pk)
            .one(&self.db)
            .await?
            .ok_or_else(ServiceError::record_not_found)?;
        let mut merged = service_from_model(row.clone());
        merged.apply_patch(patch)?;
        let mut am: catalog_service::ActiveModel = row.into();
        write_service(&mut am, &merged)?;
        let saved = am.update(&self.db).await?;
        Ok(service_from_model(saved))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        let Some(pk) = parse_id(id) else { return Ok(false) };
        let res = catalog_service::Entity::delete_by_id(pk).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}

pub struct SeaOrmToolRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl ToolRepository for SeaOrmToolRepository {
    async fn list_all(&self) -> Result<Vec<Tool>, ServiceError> {
        let rows = tool::Entity::find()
            .order_by_asc(tool::Column::Name)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(tool_from_model).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Tool>, ServiceError> {
        let Some(pk) = parse_id(id) else { return Ok(None) };
        Ok(tool::Entity::find_by_id(pk).one(&self.db).await?.map(tool_from_model))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    async fn create(&self, input: ToolInput) -> Result<Tool, ServiceError> {
        let input = input.normalized()?;
        let now = Utc::now();
        let am = tool::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            quantity: Set(input.quantity),
            min_quantity: Set(input.min_quantity),
            location: Set(input.location),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };
        Ok(tool_from_model(am.insert(&self.db).await?))
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: &str, input: ToolInput) -> Result<Tool, ServiceError> {
        let input = input.normalized()?;
        let pk = parse_id(id).ok_or_else(ServiceError::record_not_found)?;
        let row = tool::Entity::find_by_id(pk)
            .one(&self.db)
            .await?
            .ok_or_else(ServiceError::record_not_found)?;
        let mut am: tool::ActiveModel = row.into();
        am.name = Set(input.name);
        am.description = Set(input.description);
        am.quantity = Set(input.quantity);
        am.min_quantity = Set(input.min_quantity);
        am.location = Set(input.location);
        am.updated_at = Set(Utc::now().into());
        Ok(tool_from_model(am.update(&self.db).await?))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        let Some(pk) = parse_id(id) else { return Ok(false) };
        let res = tool::Entity::delete_by_id(pk).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[test]
    fn non_numeric_ids_do_not_parse() {
        assert_eq!(parse_id("12"), Some(12));
        assert_eq!(parse_id("a1b2"), None);
    }

    #[test]
    fn model_mapping_derives_cover_and_annotation() {
        let m = catalog_service::Model {
            id: 3,
            name: "Pintura".into(),
            description: None,
            images: serde_json::json!(["a.png", "b.png"]),
            image_url: Some("stale.png".into()),
            total_time: Some(45),
            price: Some(99.9),
            visibility: "public".into(),
            notes: Some(serde_json::json!("trazer tinta")),
            created_at: Utc::now().into(),
        };
        let s = service_from_model(m);
        assert_eq!(s.id, "3");
        assert_eq!(s.image_url.as_deref(), Some("a.png"));
        assert_eq!(s.execution_time_minutes, Some(45));
        assert!(s.is_public);
        assert_eq!(s.annotation, Some(Annotation::Text("trazer tinta".into())));
    }

    #[test]
    fn blank_name_never_reaches_the_row() {
        let mut s = ServiceInput { name: "Pintura".into(), ..Default::default() }
            .into_service("1".into(), Utc::now())
            .unwrap();
        let mut am = <catalog_service::ActiveModel as Default>::default();
        write_service(&mut am, &s).unwrap();
        assert_eq!(am.name, Set("Pintura".to_string()));

        s.name = "  ".into();
        let mut am = <catalog_service::ActiveModel as Default>::default();
        assert!(matches!(write_service(&mut am, &s), Err(ServiceError::Model(_))));
    }

    #[tokio::test]
    async fn remote_service_lifecycle() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let repo = SeaOrmServiceRepository { db };
        let created = repo
            .create(ServiceInput { name: "Remote".into(), images: Some(vec!["/uploads/r.png".into()]), ..Default::default() })
            .await?;
        assert_eq!(created.image_url.as_deref(), Some("/uploads/r.png"));

        let toggled = repo.toggle_visibility(&created.id, true).await?;
        assert!(toggled.is_public);
        assert!(repo.list_public().await?.iter().any(|p| p.id == created.id));

        assert!(repo.delete(&created.id).await?);
        assert!(matches!(
            repo.update(&created.id, ServicePatch::default()).await,
            Err(ServiceError::NotFound(_))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn remote_tool_lifecycle() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let repo = SeaOrmToolRepository { db };
        let t = repo
            .create(ToolInput { name: "Drill".into(), quantity: 2, min_quantity: 5, ..Default::default() })
            .await?;
        assert!(t.is_low_stock());
        let t2 = repo
            .update(&t.id, ToolInput { name: "Drill".into(), quantity: 10, min_quantity: 5, ..Default::default() })
            .await?;
        assert!(!t2.is_low_stock());
        assert!(repo.delete(&t.id).await?);
        assert!(repo.get(&t.id).await?.is_none());
        Ok(())
    }
}
