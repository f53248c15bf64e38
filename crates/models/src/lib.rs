pub mod errors;
pub mod db;
pub mod catalog_service;
pub mod tool;
pub mod admin_user;

#[cfg(test)]
mod tests;
