//! Session management module
//!
//! Owns the refresh-token side of the token lifecycle: issuing opaque
//! single-use values, rotating them, and tearing sessions down.

mod service;

#[cfg(test)]
mod tests;

pub use service::{hash_token_value, IssuedRefreshToken, SessionManager};
