//! # rolodex-server
//!
//! REST API server for the Rolodex contacts manager.
//!
//! This crate provides:
//! - **Signup / signin** issuing opaque bearer tokens
//! - **Per-user contact CRUD** with a uniform ownership gate on every
//!   id-based lookup
//! - **Starring** (a boolean flag on the owner's contact)
//! - **REST API** (axum) with JSON bodies throughout
//!
//! The library form exists so integration tests can drive the router
//! in-process; `main.rs` is a thin binary wrapper.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod validate;
