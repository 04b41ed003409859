/// Password hashing and bearer-token extraction
pub mod auth;
/// Mapping of domain errors to HTTP responses
pub mod error_handling;
/// Per-source login throttling
pub mod rate_limit;
