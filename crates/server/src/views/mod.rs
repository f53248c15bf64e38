//! Server-rendered views. Every function here is pure: view-model in,
//! `Node` tree (or a full document string) out.

pub mod html;
pub mod layout;
pub mod toast;
pub mod confirm;
pub mod gallery;
pub mod services;
pub mod tools;
pub mod report;
pub mod catalog;
pub mod login;
