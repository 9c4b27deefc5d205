//! Registry-side data passed through the SDK ports.

use std::collections::HashMap;

/// Metadata key recording which client registered an instance.
pub const REGISTER_SOURCE_KEY: &str = "preserved.register.source";
pub const REGISTER_SOURCE: &str = "rust";

/// A registered service instance, as reported by the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub instance_id: String,
    pub ip: String,
    pub port: u16,
    pub weight: f64,
    pub healthy: bool,
    pub enabled: bool,
    pub ephemeral: bool,
    pub cluster_name: String,
    pub service_name: String,
    pub metadata: HashMap<String, String>,
}

/// A service and the instances currently registered under it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Service {
    pub name: String,
    pub group_name: String,
    pub hosts: Vec<Instance>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegisterInstance {
    pub ip: String,
    pub port: u16,
    pub weight: f64,
    pub enabled: bool,
    pub healthy: bool,
    pub ephemeral: bool,
    pub service_name: String,
    pub metadata: HashMap<String, String>,
}

impl RegisterInstance {
    /// A healthy, enabled, ephemeral registration with weight 1.
    pub fn ephemeral(service_name: &str, ip: &str, port: u16) -> Self {
        Self {
            ip: ip.to_string(),
            port,
            weight: 1.0,
            enabled: true,
            healthy: true,
            ephemeral: true,
            service_name: service_name.to_string(),
            metadata: HashMap::from([(REGISTER_SOURCE_KEY.to_string(), REGISTER_SOURCE.to_string())]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeregisterInstance {
    pub ip: String,
    pub port: u16,
    pub service_name: String,
    pub ephemeral: bool,
}

impl DeregisterInstance {
    pub fn ephemeral(service_name: &str, ip: &str, port: u16) -> Self {
        Self {
            ip: ip.to_string(),
            port,
            service_name: service_name.to_string(),
            ephemeral: true,
        }
    }
}

/// Parameters for picking one healthy instance of a service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectInstance {
    pub service_name: String,
    pub group_name: String,
    /// Empty means any cluster.
    pub clusters: Vec<String>,
}
