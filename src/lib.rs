//! # Tudu - a minimal todo web application
//!
//! A server-rendered todo list backed by a hosted relational datastore,
//! with CRUD REST endpoints and an optimistic client data layer.
//!
//! ## Features
//!
//! - **REST API**: Collection and item endpoints for the `todos` table
//! - **Server-Rendered Pages**: Task list and single-task detail views
//! - **Optimistic Client**: Local cache mutation with rollback on failure
//! - **Pluggable Datastore**: Hosted REST backend or in-memory backend
//! - **Terminal Client**: Interactive client driving the same data layer
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tudu::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod client;
pub mod commands;
pub mod datastore;
pub mod libs;
pub mod server;
