//! WeConvert Core - Fundamental types
//!
//! This crate provides the types shared by every WeConvert crate:
//! - `ConvertError`: what conversion and selection operations fail with
//! - `ErrorReport`: structured, serializable errors for clients

mod error;

pub use error::{codes, ConvertError, ErrorReport};
