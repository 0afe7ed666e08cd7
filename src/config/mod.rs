pub mod loader;
pub mod store;
pub mod types;
