//! Wire types for the registry backend

mod auth;
mod document;
mod employee;
mod filter;

pub use auth::*;
pub use document::*;
pub use employee::*;
pub use filter::*;
