//! Repository interfaces (ports) for the persistence layer.

pub mod token;
pub mod user;

pub use token::TokenRepository;
pub use user::UserRepository;
