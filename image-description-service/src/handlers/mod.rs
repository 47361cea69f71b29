//! HTTP handlers for the image description service.

pub mod analyze;
pub mod fallback;
pub mod health;

pub use analyze::{analyze_image, preflight, NO_IMAGE_MESSAGE};
pub use fallback::{method_not_allowed, route_not_found};
pub use health::health_check;
