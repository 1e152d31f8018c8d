pub mod de;
pub mod text;
pub mod validation;

pub use text::{capitalize_first, path_segment};
pub use validation::{validate_beacon_field, validate_beacon_query, BeaconField};
