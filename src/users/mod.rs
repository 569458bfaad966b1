// User directory module
// Record model, persistence, and the admin-facing query endpoints

pub mod handlers;
pub mod models;
pub mod repository;

pub use repository::UserDirectory;
