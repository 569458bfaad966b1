// Authentication module
// JWT-based signup, login, and token refresh plus the authorization guard

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use password::CredentialHasher;
pub use service::AuthService;
pub use token::TokenService;
