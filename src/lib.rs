//! Client per il portale SweFreq
//!
//! Typed access to the portal backend: session identity, dataset catalog,
//! access requests, the admin roster, beacon queries and consent logging.

pub mod config;
pub mod error;
pub mod models;
pub mod navigation;
pub mod portal;
pub mod services;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::{PortalError, Result};
pub use portal::Portal;
