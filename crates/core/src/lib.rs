//! Shopdesk Core - Shared types library.
//!
//! This crate provides common types used across all Shopdesk components:
//! - `admin` - API client and order-composition engine
//! - `cli` - Command-line front end for the order-admin workflow
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, price arithmetic, and
//!   order statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
