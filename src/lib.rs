//! shopkeeper: console-based inventory and order management for a small shop.
//!
//! Customers, categories, products, orders and order rows are persisted in
//! SQLite through sea-orm. Two derived values (an order's total amount and a
//! customer's order count) are maintained by the [`aggregates`] module inside
//! the same transaction as every detail mutation, so no reader ever observes a
//! row without a consistent parent aggregate. Reporting queries in
//! [`queries::reports`] recompute their joins and aggregates at read time and
//! carry no state of their own.

pub mod aggregates;
pub mod config;
pub mod console;
pub mod crypto;
pub mod db;
pub mod entities;
pub mod errors;
pub mod queries;
pub mod seed;
pub mod services;

pub use errors::ServiceError;
