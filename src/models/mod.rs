pub mod access;
pub mod auth;
pub mod beacon;
pub mod browser;
pub mod dataset;

pub use access::*;
pub use auth::*;
pub use beacon::*;
pub use browser::*;
pub use dataset::*;
