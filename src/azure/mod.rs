pub mod client;
pub mod comment;
pub mod config;
pub mod prs;
pub mod service;
