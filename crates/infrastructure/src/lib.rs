//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_directory_client;
mod in_memory_directory_client;

pub use http_directory_client::HttpDirectoryClient;
pub use in_memory_directory_client::InMemoryDirectoryClient;
