pub mod cors;

pub use cors::{ALLOWED_HEADERS, ALLOWED_METHODS, ALLOWED_ORIGIN, cors_headers_middleware};
