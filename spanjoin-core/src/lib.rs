//! Core models for the spanjoin interval-join engine.
//!
//! This crate holds the in-memory tabular substrate ([`Frame`], [`Column`],
//! [`Value`]), the join configuration surface ([`JoinConfig`], [`JoinHow`]),
//! the resolved internal schema ([`ResolvedSchema`]) and the error type
//! shared by the engine. The join algorithms themselves live in the
//! `spanjoin` crate.

pub mod errors;
pub mod models;

// re-export for cleaner imports
pub use self::errors::JoinError;
pub use self::models::frame::{Column, Frame};
pub use self::models::schema::{JoinConfig, JoinHow, OutputLayout, ResolvedSchema};
pub use self::models::value::Value;
