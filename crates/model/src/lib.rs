//! An abstraction layer for text-generation endpoints.
//!
//! This crate establishes a small protocol for a chat session to talk to
//! whatever service produces its replies, so that the session can switch
//! between providers (or a scripted fake in tests) without modifying the
//! core codebase.
//!
//! Types in this crate don't define any networking behavior, instead they
//! are the constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod catalog;
mod error;
mod provider;
mod request;
mod response;

pub use catalog::*;
pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
