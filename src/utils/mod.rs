pub mod comment_thread;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod pull_request;
pub mod snapshot;
