//! Registry client wrapper.
//!
//! [`client::RegistryClient`] registers this process with a service registry,
//! toggles its availability, reads configuration and discovers peers. The
//! registry SDK itself sits behind the traits in [`ports`].

pub mod advertise;
pub mod client;
pub mod models;
pub mod ports;
