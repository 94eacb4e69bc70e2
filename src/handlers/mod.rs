// Handler modules
pub mod analyze;
pub mod purge;
pub mod utils;

// Re-export all handler functions
pub use analyze::handle_analyze;
pub use purge::handle_purge;
pub use utils::CleanupOptions;
