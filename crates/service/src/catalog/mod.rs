//! Catalog module: repositories for services and tools plus the application
//! service that ties them to image storage and change notifications.

pub mod repository;
pub mod repo;
pub mod service;

pub use repository::{ServiceRepository, ToolRepository};
pub use service::CatalogService;
