//! Product and service catalogue CRUD.

pub mod products;
pub mod services;
