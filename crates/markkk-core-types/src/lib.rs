//! Core types shared across Markkk facilities
//!
//! This crate provides the canonical field keys and event names used by
//! the logging and error facilities.

pub mod schema;
