//! Core types and trait definitions for the ontology loader.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The store, the OLS client and the synchronisers all depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod entity;
pub mod error;
pub mod field;
pub mod mapper;
pub mod remote;
pub mod source;
pub mod text;

pub use error::{Error, Result, SourceError};
