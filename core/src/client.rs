//! # Registry Client
//!
//! Wraps the naming and config clients of a registry SDK and remembers the
//! address this service instance advertises.

use std::sync::Arc;

use anyhow::Context;
use regshim_common::config::{ClientOption, RegistryConfig};
use regshim_common::network::interface::LocalIpv4Resolver;
use regshim_common::utils::interface::{InterfaceSource, SystemInterfaces};
use tracing::{debug, error, info};

use crate::advertise::{self, ServiceAddress};
use crate::models::{DeregisterInstance, Instance, RegisterInstance, SelectInstance, Service};
use crate::ports::{ClientFactory, ConfigService, NamingService};

pub struct RegistryClient {
    config: RegistryConfig,
    naming: Arc<dyn NamingService>,
    configs: Arc<dyn ConfigService>,
    service: ServiceAddress,
}

impl RegistryClient {
    /// Creates a client for `config`.
    ///
    /// A wildcard bind address is replaced by the IPv4 address detected on
    /// the default allow-listed interfaces.
    pub fn connect<F: ClientFactory>(
        config: RegistryConfig,
        options: Vec<ClientOption>,
        factory: &F,
    ) -> anyhow::Result<Self> {
        Self::connect_with(
            config,
            &LocalIpv4Resolver::default(),
            &SystemInterfaces,
            options,
            factory,
        )
    }

    /// Like [`connect`](Self::connect), detecting the wildcard replacement
    /// with `resolver` over the interfaces of `source`.
    pub fn connect_with<S: InterfaceSource, F: ClientFactory>(
        config: RegistryConfig,
        resolver: &LocalIpv4Resolver,
        source: &S,
        options: Vec<ClientOption>,
        factory: &F,
    ) -> anyhow::Result<Self> {
        let service =
            advertise::advertised_address_with(&config.address, || resolver.resolve_from(source))?;
        Self::connect_at(config, service, options, factory)
    }

    /// Creates a client that advertises `service` instead of deriving it from
    /// the configured bind address.
    pub fn connect_at<F: ClientFactory>(
        config: RegistryConfig,
        service: ServiceAddress,
        options: Vec<ClientOption>,
        factory: &F,
    ) -> anyhow::Result<Self> {
        let params = config
            .client_params(options)
            .context("invalid registry endpoint")?;
        debug!(endpoint = %params.endpoint, app = %params.app_name, "creating registry clients");

        let naming = factory
            .naming_client(&params)
            .context("failed to create naming client")?;
        let configs = factory
            .config_client(&params)
            .context("failed to create config client")?;

        Ok(Self::from_parts(config, service, naming, configs))
    }

    pub fn from_parts(
        config: RegistryConfig,
        service: ServiceAddress,
        naming: Arc<dyn NamingService>,
        configs: Arc<dyn ConfigService>,
    ) -> Self {
        Self {
            config,
            naming,
            configs,
            service,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn service_address(&self) -> &ServiceAddress {
        &self.service
    }

    /// Registers this instance as a healthy ephemeral instance.
    pub async fn register_service(&self) -> anyhow::Result<()> {
        self.naming
            .register_instance(RegisterInstance::ephemeral(
                &self.config.app_name,
                &self.service.ip,
                self.service.port,
            ))
            .await
            .with_context(|| format!("failed to register {}", self.service))
    }

    pub async fn deregister_service(&self) -> anyhow::Result<()> {
        self.naming
            .deregister_instance(DeregisterInstance::ephemeral(
                &self.config.app_name,
                &self.service.ip,
                self.service.port,
            ))
            .await
            .with_context(|| format!("failed to deregister {}", self.service))
    }

    /// Re-registers every instance of this service that runs on our IP.
    pub async fn online(&self) -> anyhow::Result<()> {
        let service = self.fetch_own_service().await?;

        for host in self.local_hosts(&service) {
            let param = RegisterInstance::ephemeral(&self.config.app_name, &host.ip, host.port);
            if let Err(e) = self.naming.register_instance(param).await {
                error!(ip = %host.ip, port = host.port, "Failed to bring instance online: {:#}", e);
                return Err(e.context(format!("failed to bring {}:{} online", host.ip, host.port)));
            }
        }
        Ok(())
    }

    /// Deregisters every instance of this service that runs on our IP,
    /// without stopping the process.
    pub async fn offline(&self) -> anyhow::Result<()> {
        let service = self.fetch_own_service().await?;

        for host in self.local_hosts(&service) {
            let param = DeregisterInstance::ephemeral(&self.config.app_name, &host.ip, host.port);
            if let Err(e) = self.naming.deregister_instance(param).await {
                error!(ip = %host.ip, port = host.port, "Failed to take instance offline: {:#}", e);
                return Err(e.context(format!("failed to take {}:{} offline", host.ip, host.port)));
            }
        }
        Ok(())
    }

    /// Reads the configuration blob `data_id` from the configured group.
    pub async fn get_config(&self, data_id: &str) -> anyhow::Result<String> {
        self.configs
            .get_config(data_id, self.config.group())
            .await
            .with_context(|| format!("failed to get config '{data_id}'"))
    }

    /// Picks one healthy instance of `service_name` in the configured group.
    pub async fn get_service_instance(&self, service_name: &str) -> anyhow::Result<Instance> {
        let param = SelectInstance {
            service_name: service_name.to_string(),
            group_name: self.config.group().to_string(),
            clusters: Vec::new(),
        };

        let instance = match self.naming.select_one_healthy_instance(param).await {
            Ok(instance) => instance,
            Err(e) => {
                error!(service = service_name, "Unable to discover service instance: {:#}", e);
                return Err(e.context(format!(
                    "cannot get healthy instance of service {service_name}"
                )));
            }
        };

        info!(
            service = service_name,
            ip = %instance.ip,
            port = instance.port,
            instance_id = %instance.instance_id,
            "Service instance discovered"
        );
        Ok(instance)
    }

    async fn fetch_own_service(&self) -> anyhow::Result<Service> {
        match self.naming.get_service(&self.config.app_name).await {
            Ok(service) => Ok(service),
            Err(e) => {
                error!(service = %self.config.app_name, "Failed to get service: {:#}", e);
                Err(e.context(format!("failed to get service {}", self.config.app_name)))
            }
        }
    }

    fn local_hosts<'a>(&'a self, service: &'a Service) -> impl Iterator<Item = &'a Instance> {
        service.hosts.iter().filter(|host| host.ip == self.service.ip)
    }
}
