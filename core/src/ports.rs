//! # Registry SDK Ports
//!
//! Contracts for the registry SDK this crate wraps. A binding to a concrete
//! SDK implements these traits; nothing in this crate talks to a registry
//! directly.

use std::sync::Arc;

use regshim_common::config::ClientParams;

use crate::models::{DeregisterInstance, Instance, RegisterInstance, SelectInstance, Service};

/// Service registration and discovery.
#[async_trait::async_trait]
pub trait NamingService: Send + Sync {
    async fn register_instance(&self, param: RegisterInstance) -> anyhow::Result<()>;

    async fn deregister_instance(&self, param: DeregisterInstance) -> anyhow::Result<()>;

    async fn get_service(&self, service_name: &str) -> anyhow::Result<Service>;

    async fn select_one_healthy_instance(&self, param: SelectInstance) -> anyhow::Result<Instance>;
}

/// Read access to the configuration center.
#[async_trait::async_trait]
pub trait ConfigService: Send + Sync {
    async fn get_config(&self, data_id: &str, group: &str) -> anyhow::Result<String>;
}

/// Builds SDK clients from [`ClientParams`].
pub trait ClientFactory {
    fn naming_client(&self, params: &ClientParams) -> anyhow::Result<Arc<dyn NamingService>>;

    fn config_client(&self, params: &ClientParams) -> anyhow::Result<Arc<dyn ConfigService>>;
}
