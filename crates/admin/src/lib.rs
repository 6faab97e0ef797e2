//! Shopdesk Admin - API client and order-composition engine.
//!
//! This crate talks to the store's backend API and owns the one genuinely
//! stateful workflow in Shopdesk: composing a multi-line order against a
//! backend whose order-create endpoint does not return the identifier of
//! the created resource.
//!
//! # Architecture
//!
//! - [`api`] - typed API boundary: the [`api::OrderApi`] trait, the
//!   `reqwest`-backed [`api::RestClient`], and the normalization layer that
//!   turns loosely-shaped backend JSON into typed structs
//! - [`orders`] - the composition engine: price resolution, the in-memory
//!   selection working set, line synchronization for existing orders, and
//!   the create-discover-attach state machine for new ones
//! - [`config`] - environment-based configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use shopdesk_admin::api::RestClient;
//! use shopdesk_admin::config::AdminConfig;
//! use shopdesk_admin::orders::{OrderCreation, OrderDraft, SelectionMode, SelectionState};
//!
//! let config = AdminConfig::from_env()?;
//! let client = RestClient::new(&config)?;
//!
//! let mut selection = SelectionState::new(SelectionMode::Create);
//! selection.toggle(product_id);
//!
//! let mut creation = OrderCreation::new(client, config.discovery);
//! let created = creation.run(draft, &selection, &catalog).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod orders;

#[cfg(test)]
pub(crate) mod testing;
