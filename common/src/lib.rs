//! Leaf utilities shared by the registry client: bind address parsing,
//! self-IP detection and the client configuration model.

pub mod config;
pub mod network;
pub mod utils;
