//! sea-orm entities for the storefront schema plus small helpers that keep
//! validation next to the columns they guard.

pub mod errors;
pub mod db;
pub mod admin;
pub mod product;
pub mod service;
pub mod booking;

#[cfg(test)]
mod tests;
