//! Business layer for the storefront API.
//! - Auth flow (registration, login with lockout, token refresh).
//! - Catalog CRUD for products and services, including image resolution.
//! - Bookings and click tracking.
//!
//! Everything here is framework independent; the `server` crate adapts it to HTTP.

pub mod errors;
pub mod auth;
pub mod catalog;
pub mod booking_service;
pub mod click_service;
pub mod images;
pub mod contact;
#[cfg(test)]
pub mod test_support;
