pub mod errors;
pub mod form;
pub mod openapi;
pub mod routes;
pub mod startup;
pub mod state;

pub use startup::run;
