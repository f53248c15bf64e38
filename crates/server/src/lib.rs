pub mod errors;
pub mod gate;
pub mod nav;
pub mod openapi;
pub mod routes;
pub mod startup;
pub mod state;
pub mod views;

pub use startup::run;
