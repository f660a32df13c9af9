//! # Infrastructure Layer
//!
//! Concrete implementations of the ports defined in `ag_core`:
//! - **Database**: MySQL repositories using SQLx
//! - **Password**: bcrypt password hashing

pub mod database;
pub mod password;

pub use database::connection::create_pool;
pub use database::mysql::{MySqlTokenRepository, MySqlUserRepository};
pub use password::BcryptPasswordHasher;
