//! Auth module: three-layer architecture (domain, repository, service) plus
//! the session providers the HTTP gate talks to.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;
pub mod session;

pub use service::AuthService;
pub use session::{LocalSessionProvider, RemoteSessionProvider, SessionProvider};
