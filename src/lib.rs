pub mod azure;
pub mod core;
pub mod logger;
pub mod store;
pub mod utils;
