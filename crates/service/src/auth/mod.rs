//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login and refresh live here together with the failed-login
//! tracker and the JWT issuer they depend on.

pub mod domain;
pub mod errors;
pub mod lockout;
pub mod repository;
pub mod repo;
pub mod service;
pub mod tokens;

pub use service::{AuthConfig, AuthService};
