//! Employee-document registry API client
//!
//! An async client for the registry backend (authentication, CPF checks,
//! employee CRUD) plus the ViaCEP address lookup, and the glue that lets a
//! [`docreg_forms::FormController`] submit through it.

pub mod address;
pub mod auth;
pub mod config;
pub mod error;
pub mod model;

mod client;
mod sender;

pub use client::*;
pub use config::ClientConfig;
pub use sender::FormEndpoint;
