pub mod access_request;
pub mod authorization;
pub mod beacon;
pub mod browser;
pub mod consent;
pub mod cookies;
pub mod dataset;
pub mod http;
pub mod page;
pub mod roster;
pub mod session;

pub use access_request::AccessRequestSubmitter;
pub use authorization::{derive_authorization_level, AuthorizationTracker};
pub use beacon::BeaconClient;
pub use browser::VariantBrowser;
pub use consent::{AuditLog, ConsentBanner, TermsConsentLog};
pub use cookies::CookieJar;
pub use dataset::DatasetResolver;
pub use http::PortalClient;
pub use page::{DatasetPage, DatasetPageView};
pub use roster::RosterManager;
pub use session::SessionResolver;
