//! # Hermes Core
//!
//! Core types and errors for the Hermes interceptor chain.
//!
//! This crate provides the foundational types used throughout Hermes:
//!
//! - [`RequestId`] - UUID v7 invocation identifier
//! - [`ExecutionContext`] - Per-invocation context propagated to interceptors
//! - [`HermesError`] - Standard error types
//! - [`StageError`] - Typed failure returned by an interceptor

#![doc(html_root_url = "https://docs.rs/hermes-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;

pub use context::{ExecutionContext, RequestId};
pub use error::{HermesError, HermesResult, StageError};
