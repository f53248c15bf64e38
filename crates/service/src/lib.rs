//! Service layer for the VIPI catalog.
//! - Domain types and validation for services, tools and admin sessions.
//! - Repositories for the remote (SeaORM) and local (JSON file) backends.
//! - Listing engine, stock statistics and spreadsheet/CSV exports.
//! - Framework independent; the `server` crate only adapts HTTP to these calls.

pub mod errors;
pub mod domain;
pub mod storage;
pub mod listing;
pub mod pagination;
pub mod stats;
pub mod export;
pub mod images;
pub mod changes;
pub mod catalog;
pub mod auth;
pub mod backend;
pub mod runtime;
#[cfg(test)]
pub mod test_support;
