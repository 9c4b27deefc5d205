#![cfg(test)]
use std::path::PathBuf;
use std::sync::Arc;

use regshim_common::config::{ClientOption, RegistryConfig, DEFAULT_GROUP};
use regshim_common::network::interface::LocalIpv4Resolver;
use regshim_core::advertise::ServiceAddress;
use regshim_core::client::RegistryClient;
use regshim_core::models::{REGISTER_SOURCE, REGISTER_SOURCE_KEY};

use super::fake::{instance, Call, FakeFactory, FakeRegistry};
use crate::net::util::{ni, v4, StaticSource};

const APP: &str = "demo1x";
const ETHER_UP: u32 = 69699;

fn demo_config() -> RegistryConfig {
    RegistryConfig {
        endpoint: "127.0.0.1:8848".to_string(),
        namespace: "public".to_string(),
        ..RegistryConfig::new(APP, "0.0.0.0:8080")
    }
}

fn own_address() -> ServiceAddress {
    ServiceAddress {
        ip: "192.168.1.5".to_string(),
        port: 8080,
    }
}

fn client_for(registry: Arc<FakeRegistry>) -> RegistryClient {
    let factory = FakeFactory::new(registry);
    RegistryClient::connect_at(demo_config(), own_address(), Vec::new(), &factory).unwrap()
}

#[test]
fn connect_passes_config_to_factory() {
    let factory = FakeFactory::new(FakeRegistry::with_hosts(vec![]));
    let options = vec![
        ClientOption::CacheDir(PathBuf::from("/tmp/nacos/cache")),
        ClientOption::LogDir(PathBuf::from("/tmp/nacos/log")),
    ];

    let client = RegistryClient::connect_at(demo_config(), own_address(), options.clone(), &factory).unwrap();

    let params = factory.params.lock().unwrap().clone();
    assert_eq!(params.len(), 2, "Expected naming and config clients to be built");
    assert_eq!(params[0].endpoint, "127.0.0.1:8848");
    assert_eq!(params[0].server.host, "127.0.0.1");
    assert_eq!(params[0].server.port, 8848);
    assert_eq!(params[0].app_name, APP);
    assert_eq!(params[0].namespace, "public");
    assert_eq!(params[0].options, options);
    assert_eq!(client.service_address(), &own_address());
    assert_eq!(client.config().group(), DEFAULT_GROUP);
}

#[test]
fn connect_reports_naming_client_failure() {
    let mut factory = FakeFactory::new(FakeRegistry::with_hosts(vec![]));
    factory.fail_naming = true;

    let err = RegistryClient::connect_at(demo_config(), own_address(), Vec::new(), &factory)
        .err()
        .expect("connect should fail");
    assert_eq!(err.to_string(), "failed to create naming client");
    assert_eq!(err.root_cause().to_string(), "naming server unreachable");
}

#[test]
fn connect_reports_config_client_failure() {
    let mut factory = FakeFactory::new(FakeRegistry::with_hosts(vec![]));
    factory.fail_config = true;

    let err = RegistryClient::connect_at(demo_config(), own_address(), Vec::new(), &factory)
        .err()
        .expect("connect should fail");
    assert_eq!(err.to_string(), "failed to create config client");
    assert_eq!(err.root_cause().to_string(), "config server unreachable");
}

#[test]
fn connect_rejects_malformed_endpoint() {
    let factory = FakeFactory::new(FakeRegistry::with_hosts(vec![]));
    let cfg = RegistryConfig {
        endpoint: "127.0.0.1".to_string(),
        ..demo_config()
    };

    let err = RegistryClient::connect_at(cfg, own_address(), Vec::new(), &factory)
        .err()
        .expect("connect should fail");
    assert_eq!(err.to_string(), "invalid registry endpoint");
    assert!(factory.params.lock().unwrap().is_empty());
}

#[tokio::test]
async fn register_service_sends_ephemeral_instance() {
    let registry = FakeRegistry::with_hosts(vec![]);
    let client = client_for(registry.clone());

    client.register_service().await.unwrap();

    match registry.calls().as_slice() {
        [Call::Register(param)] => {
            assert_eq!(param.ip, "192.168.1.5");
            assert_eq!(param.port, 8080);
            assert_eq!(param.service_name, APP);
            assert_eq!(param.weight, 1.0);
            assert!(param.enabled && param.healthy && param.ephemeral);
            assert_eq!(param.metadata.get(REGISTER_SOURCE_KEY).map(String::as_str), Some(REGISTER_SOURCE));
        }
        calls => panic!("Unexpected calls: {calls:?}"),
    }
}

#[tokio::test]
async fn register_service_propagates_failure() {
    let registry = FakeRegistry::with_hosts(vec![]);
    registry.fail("register");
    let client = client_for(registry.clone());

    let err = client.register_service().await.unwrap_err();
    assert_eq!(err.to_string(), "failed to register 192.168.1.5:8080");
}

#[tokio::test]
async fn deregister_service_removes_own_instance() {
    let registry = FakeRegistry::with_hosts(vec![]);
    let client = client_for(registry.clone());

    client.deregister_service().await.unwrap();

    match registry.calls().as_slice() {
        [Call::Deregister(param)] => {
            assert_eq!(param.ip, "192.168.1.5");
            assert_eq!(param.port, 8080);
            assert_eq!(param.service_name, APP);
            assert!(param.ephemeral);
        }
        calls => panic!("Unexpected calls: {calls:?}"),
    }
}

#[tokio::test]
async fn online_reregisters_only_local_hosts() {
    let registry = FakeRegistry::with_hosts(vec![
        instance(APP, "192.168.1.5", 8080),
        instance(APP, "10.0.0.2", 8080),
        instance(APP, "192.168.1.5", 8081),
        instance("other", "192.168.1.5", 9000),
    ]);
    let client = client_for(registry.clone());

    client.online().await.unwrap();

    let registered: Vec<(String, u16)> = registry
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::Register(param) => Some((param.ip, param.port)),
            _ => None,
        })
        .collect();
    assert_eq!(
        registered,
        vec![("192.168.1.5".to_string(), 8080), ("192.168.1.5".to_string(), 8081)]
    );
}

#[tokio::test]
async fn offline_deregisters_only_local_hosts() {
    let registry = FakeRegistry::with_hosts(vec![
        instance(APP, "10.0.0.2", 8080),
        instance(APP, "192.168.1.5", 8080),
    ]);
    let client = client_for(registry.clone());

    client.offline().await.unwrap();

    let calls = registry.calls();
    assert_eq!(calls[0], Call::GetService(APP.to_string()));
    match &calls[1..] {
        [Call::Deregister(param)] => {
            assert_eq!(param.ip, "192.168.1.5");
            assert_eq!(param.port, 8080);
        }
        rest => panic!("Unexpected calls: {rest:?}"),
    }
}

#[tokio::test]
async fn online_propagates_lookup_failure() {
    let registry = FakeRegistry::with_hosts(vec![instance(APP, "192.168.1.5", 8080)]);
    registry.fail("get_service");
    let client = client_for(registry.clone());

    let err = client.online().await.unwrap_err();
    assert_eq!(err.to_string(), format!("failed to get service {APP}"));
    assert!(!registry.calls().iter().any(|call| matches!(call, Call::Register(_))));
}

#[tokio::test]
async fn offline_propagates_deregister_failure() {
    let registry = FakeRegistry::with_hosts(vec![instance(APP, "192.168.1.5", 8080)]);
    registry.fail("deregister");
    let client = client_for(registry.clone());

    let err = client.offline().await.unwrap_err();
    assert_eq!(err.to_string(), "failed to take 192.168.1.5:8080 offline");
}

#[tokio::test]
async fn get_config_reads_configured_group() {
    let registry = FakeRegistry::with_hosts(vec![]);
    registry.put_config("application.yaml", DEFAULT_GROUP, "port: 8080");
    let client = client_for(registry.clone());

    assert_eq!(client.get_config("application.yaml").await.unwrap(), "port: 8080");
    assert!(client.get_config("missing.yaml").await.is_err());
}

#[tokio::test]
async fn get_service_instance_selects_healthy_instance() {
    let mut sick = instance("orders", "10.0.0.3", 7000);
    sick.healthy = false;
    let registry = FakeRegistry::with_hosts(vec![sick, instance("orders", "10.0.0.4", 7000)]);
    let client = client_for(registry.clone());

    let found = client.get_service_instance("orders").await.unwrap();
    assert_eq!(found.ip, "10.0.0.4");

    let select = registry
        .calls()
        .into_iter()
        .find_map(|call| match call {
            Call::Select(param) => Some(param),
            _ => None,
        })
        .expect("select call recorded");
    assert_eq!(select.group_name, DEFAULT_GROUP);
    assert!(select.clusters.is_empty());
}

#[tokio::test]
async fn get_service_instance_reports_missing_service() {
    let registry = FakeRegistry::with_hosts(vec![]);
    let client = client_for(registry);

    let err = client.get_service_instance("payments").await.unwrap_err();
    assert_eq!(err.to_string(), "cannot get healthy instance of service payments");
}

#[tokio::test]
async fn wildcard_bind_registers_detected_address() {
    let source = StaticSource(vec![
        ni("docker0", 1, None, &[v4(172, 17, 0, 1, 16)], ETHER_UP),
        ni("eth0", 2, None, &[v4(10, 20, 30, 40, 24)], ETHER_UP),
    ]);
    let registry = FakeRegistry::with_hosts(vec![]);
    let factory = FakeFactory::new(registry.clone());

    let client = RegistryClient::connect_with(
        demo_config(),
        &LocalIpv4Resolver::default(),
        &source,
        Vec::new(),
        &factory,
    )
    .unwrap();
    assert_eq!(client.service_address().to_string(), "10.20.30.40:8080");

    client.register_service().await.unwrap();

    assert!(matches!(
        registry.calls().as_slice(),
        [Call::Register(param)] if param.ip == "10.20.30.40" && param.port == 8080
    ));
}

#[test]
fn concrete_bind_skips_detection() {
    let factory = FakeFactory::new(FakeRegistry::with_hosts(vec![]));
    let cfg = RegistryConfig {
        address: "10.1.1.1:9090".to_string(),
        ..demo_config()
    };

    let client = RegistryClient::connect_with(
        cfg,
        &LocalIpv4Resolver::default(),
        &StaticSource(vec![]),
        Vec::new(),
        &factory,
    )
    .unwrap();
    assert_eq!(client.service_address().to_string(), "10.1.1.1:9090");
}

#[test]
fn wildcard_bind_without_allowed_interface_fails() {
    let factory = FakeFactory::new(FakeRegistry::with_hosts(vec![]));
    let source = StaticSource(vec![ni("tun0", 1, None, &[v4(10, 96, 0, 57, 16)], ETHER_UP)]);

    let err = RegistryClient::connect_with(
        demo_config(),
        &LocalIpv4Resolver::default(),
        &source,
        Vec::new(),
        &factory,
    )
    .err()
    .expect("connect should fail");
    assert_eq!(
        err.root_cause().to_string(),
        "no IPv4 address found on allowed network interfaces"
    );
    assert!(factory.params.lock().unwrap().is_empty(), "No SDK client should be built");
}
