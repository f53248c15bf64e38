use crate::{admin_user, catalog_service, tool};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use anyhow::Result;
use chrono::Utc;
use uuid::Uuid;

use super::setup_test_db;

#[tokio::test]
async fn test_service_crud() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()); };

    let am = catalog_service::ActiveModel {
        name: Set(format!("Pintura {}", Uuid::new_v4())),
        description: Set(Some("Pintura residencial".into())),
        images: Set(serde_json::json!(["/uploads/a.png", "/uploads/b.png"])),
        image_url: Set(Some("/uploads/a.png".into())),
        total_time: Set(Some(90)),
        price: Set(Some(150.5)),
        visibility: Set(catalog_service::visibility_for(true).into()),
        notes: Set(None),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    let created = am.insert(&db).await?;
    assert!(created.id > 0);
    assert!(created.is_public());

    let mut am: catalog_service::ActiveModel = created.clone().into();
    am.visibility = Set(catalog_service::VISIBILITY_PRIVATE.into());
    let updated = am.update(&db).await?;
    assert!(!updated.is_public());

    catalog_service::Entity::delete_by_id(created.id).exec(&db).await?;
    assert!(catalog_service::Entity::find_by_id(created.id).one(&db).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_tool_crud() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()); };

    let now = Utc::now();
    let am = tool::ActiveModel {
        name: Set("Furadeira".into()),
        description: Set(None),
        quantity: Set(2),
        min_quantity: Set(5),
        location: Set(Some("Prateleira A".into())),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };
    let created = am.insert(&db).await?;
    let found = tool::Entity::find_by_id(created.id).one(&db).await?.expect("tool exists");
    assert_eq!(found.quantity, 2);
    assert_eq!(found.location.as_deref(), Some("Prateleira A"));

    tool::Entity::delete_by_id(created.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_admin_user_create_and_find() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()); };

    let email = format!("admin_{}@vipi.local", Uuid::new_v4());
    let created = admin_user::create(&db, &email, "$argon2id$fake".into()).await?;
    let found = admin_user::find_by_email(&db, &email).await?.expect("admin exists");
    assert_eq!(found.id, created.id);

    admin_user::Entity::delete_by_id(created.id).exec(&db).await?;
    Ok(())
}

#[test]
fn admin_email_validation() {
    assert!(admin_user::validate_email("nobody").is_err());
    assert!(admin_user::validate_email("a@b.c").is_ok());
}

#[test]
fn service_name_validation() {
    assert!(catalog_service::validate_name("  ").is_err());
    assert!(catalog_service::validate_name("Corte").is_ok());
}
