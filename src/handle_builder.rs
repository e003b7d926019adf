//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Builder for creating an [`Adapter Handle`](crate::Handle)
//!

use ini::Ini;
use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;
use std::result::Result;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{ia_err, HBaseError};
use crate::handle::Handle;
use crate::store::StoreClient;
use reqwest::Certificate;
use reqwest::Client;

/// Store property holding the coordination service client port.
pub const ZK_PORT_KEY: &str = "hbase.zookeeper.property.clientPort";
/// Store property holding the coordination quorum hosts.
pub const ZK_QUORUM_KEY: &str = "hbase.zookeeper.quorum";
/// Store property holding the master address.
pub const MASTER_KEY: &str = "hbase.master";
/// Store property holding the coordination root path.
pub const ZNODE_PARENT_KEY: &str = "zookeeper.znode.parent";
pub const RPC_TIMEOUT_KEY: &str = "hbase.rpc.timeout";
pub const OPERATION_TIMEOUT_KEY: &str = "hbase.client.operation.timeout";
pub const SCANNER_TIMEOUT_KEY: &str = "hbase.client.scanner.timeout.period";
pub const SCANNER_CACHING_KEY: &str = "hbase.client.scanner.caching";
/// REST gateway URL. Only read from config files.
pub const REST_ENDPOINT_KEY: &str = "hbase.rest.endpoint";

const DEFAULT_ZK_PORT: &str = "2181";
const DEFAULT_ZNODE_PARENT: &str = "/hbase";
const DEFAULT_RPC_TIMEOUT_MS: u64 = 50000;
const DEFAULT_OPERATION_TIMEOUT_MS: u64 = 10000;
const DEFAULT_SCANNER_TIMEOUT_MS: u64 = 200000;
const DEFAULT_SCANNER_CACHING: u32 = 100;
pub(crate) const DEFAULT_REST_PORT: u16 = 8080;

/// Builder used to set all the parameters to create an [`Adapter Handle`](crate::Handle).
///
/// Every setter returns the builder, so calls can be chained; later calls
/// override earlier ones.
#[derive(Debug, Clone)]
pub struct HandleBuilder {
    pub(crate) endpoint: String,
    pub(crate) zk_port: String,
    pub(crate) zk_quorum: String,
    pub(crate) master: String,
    pub(crate) znode_parent: String,
    pub(crate) rpc_timeout: Duration,
    pub(crate) operation_timeout: Duration,
    pub(crate) scanner_timeout: Duration,
    pub(crate) scanner_caching: u32,
    pub(crate) mode: HandleMode,
    pub(crate) store: Option<Arc<dyn StoreClient>>,
    pub(crate) add_cert: Option<Certificate>,
    pub(crate) client: Option<Client>,
    pub(crate) accept_invalid_certs: bool,
    pub(crate) from_environment: bool,
}

/// The kind of store a [`Handle`] talks to.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum HandleMode {
    /// Connect to a store through its REST gateway.
    #[default]
    Rest,
    /// Use a private in-process [`MemoryStore`](crate::MemoryStore).
    InMemory,
}

impl Default for HandleBuilder {
    fn default() -> Self {
        HandleBuilder {
            endpoint: String::new(),
            zk_port: DEFAULT_ZK_PORT.to_string(),
            zk_quorum: String::new(),
            master: String::new(),
            znode_parent: DEFAULT_ZNODE_PARENT.to_string(),
            rpc_timeout: Duration::from_millis(DEFAULT_RPC_TIMEOUT_MS),
            operation_timeout: Duration::from_millis(DEFAULT_OPERATION_TIMEOUT_MS),
            scanner_timeout: Duration::from_millis(DEFAULT_SCANNER_TIMEOUT_MS),
            scanner_caching: DEFAULT_SCANNER_CACHING,
            mode: HandleMode::default(),
            store: None,
            add_cert: None,
            client: None,
            accept_invalid_certs: false,
            from_environment: false,
        }
    }
}

impl HandleBuilder {
    /// Create a new HandleBuilder struct.
    ///
    /// The defaults are those of a stock store installation: coordination port
    /// `2181`, root path `/hbase`, rpc timeout 50s, operation timeout 10s and
    /// scanner lease timeout 200s. Consider calling
    /// [`from_environment()`](HandleBuilder::from_environment()) to collect all parameters from
    /// the local environment by default.
    pub fn new() -> Self {
        HandleBuilder {
            ..Default::default()
        }
    }
    /// Build a new [`Handle`].
    ///
    /// Note: Internally, if the [`HandleBuilder`] contains
    /// a reference to an existing [`reqwest::Client`], it will clone and
    /// use that. Otherwise, a REST handle creates a new [`reqwest::Client`] for its
    /// own internal use. See [`reqwest_client()`](HandleBuilder::reqwest_client()).
    pub async fn build(self) -> Result<Handle, HBaseError> {
        if !self.zk_port.is_empty() && self.zk_port.parse::<u16>().is_err() {
            return ia_err!(
                "invalid coordination port '{}': must be a number between 0 and 65535",
                self.zk_port
            );
        }
        Handle::new(&self).await
    }
    /// Gather configuration settings from the current environment.
    ///
    /// This method will scan the process [`standard environment`](std::env::Vars) to collect and
    /// set the configuration parameters. The values can be overridden in code if this method is
    /// called first and other methods are called afterwards, for example:
    ///```no_run
    /// # use hbase_adapter::Handle;
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    ///   let handle = Handle::builder()
    ///       .from_environment()?
    ///       .zookeeper_quorum("zk1,zk2,zk3")?
    ///       .build()
    ///       .await?;
    /// # Ok(())
    /// # }
    ///```
    /// The following environment variables are used:
    ///
    /// | variable | description |
    /// | -------- | ----------- |
    /// | `HBASE_ADAPTER_CONFIG_FILE` | A config file to read first (see [`HandleBuilder::from_file()`]). The variables below override its values. |
    /// | `HBASE_ADAPTER_ENDPOINT` | The REST gateway URL. See [`HandleBuilder::endpoint()`]. |
    /// | `HBASE_ADAPTER_MODE` | One of: `rest`, `memory`. |
    /// | `HBASE_ADAPTER_ZK_QUORUM` | See [`HandleBuilder::zookeeper_quorum()`]. |
    /// | `HBASE_ADAPTER_ZK_PORT` | See [`HandleBuilder::zookeeper_port()`]. |
    /// | `HBASE_ADAPTER_MASTER` | See [`HandleBuilder::master()`]. |
    /// | `HBASE_ADAPTER_ZNODE_PARENT` | See [`HandleBuilder::znode_parent()`]. |
    /// | `HBASE_ADAPTER_CA_CERT` | The path to a certificate file in `pem` format (see [`HandleBuilder::add_cert_from_pemfile()`]). |
    /// | `HBASE_ADAPTER_ACCEPT_INVALID_CERTS` | If this is set to `1` or `true`, do not check certificates (see [`HandleBuilder::danger_accept_invalid_certs()`]). |
    ///
    pub fn from_environment(mut self) -> Result<Self, HBaseError> {
        self.from_environment = true;
        if let Some(val) = env::var("HBASE_ADAPTER_CONFIG_FILE").ok() {
            self = self.from_file(&val)?;
        }
        if let Some(val) = env::var("HBASE_ADAPTER_ENDPOINT").ok() {
            self = self.endpoint(&val)?;
        }
        if let Some(val) = env::var("HBASE_ADAPTER_ZK_QUORUM").ok() {
            self = self.zookeeper_quorum(&val)?;
        }
        if let Some(val) = env::var("HBASE_ADAPTER_ZK_PORT").ok() {
            self = self.zookeeper_port(&val)?;
        }
        if let Some(val) = env::var("HBASE_ADAPTER_MASTER").ok() {
            self = self.master(&val)?;
        }
        if let Some(val) = env::var("HBASE_ADAPTER_ZNODE_PARENT").ok() {
            self = self.znode_parent(&val)?;
        }
        if let Some(val) = env::var("HBASE_ADAPTER_CA_CERT").ok() {
            self = self.add_cert_from_pemfile(&val)?;
        }
        if let Some(val) = env::var("HBASE_ADAPTER_ACCEPT_INVALID_CERTS").ok() {
            let lv = val.to_lowercase();
            if lv == "true" || lv == "1" {
                self = self.danger_accept_invalid_certs(true)?;
            }
        }
        if let Some(val) = env::var("HBASE_ADAPTER_MODE").ok() {
            let v = val.to_lowercase();
            match v.as_str() {
                "rest" => self = self.mode(HandleMode::Rest)?,
                "memory" => self = self.mode(HandleMode::InMemory)?,
                _ => {
                    return ia_err!(
                        "invalid value '{}' for HBASE_ADAPTER_MODE: must be one of 'rest', 'memory'",
                        val
                    );
                }
            }
        }
        Ok(self)
    }
    /// Read configuration from the `[DEFAULT]` section of an ini file.
    ///
    /// See [`from_file_with_profile()`](HandleBuilder::from_file_with_profile()).
    pub fn from_file(self, config_file: &str) -> Result<Self, HBaseError> {
        self.from_file_with_profile(config_file, "DEFAULT")
    }
    /// Read configuration from a section of an ini file.
    ///
    /// A leading `~/` in the path is expanded to the user's home directory.
    /// The section uses the store's own property names, for example:
    ///```text
    /// [DEFAULT]
    /// hbase.zookeeper.quorum=zk1,zk2,zk3
    /// hbase.zookeeper.property.clientPort=2181
    /// zookeeper.znode.parent=/hbase
    /// hbase.master=master1:16000
    /// hbase.rpc.timeout=50000
    /// hbase.client.operation.timeout=10000
    /// hbase.client.scanner.timeout.period=200000
    /// hbase.client.scanner.caching=100
    /// hbase.rest.endpoint=http://rest1:8080
    ///```
    /// Timeouts are given in milliseconds. Properties that are not present
    /// keep their current values.
    pub fn from_file_with_profile(
        mut self,
        config_file: &str,
        profile: &str,
    ) -> Result<Self, HBaseError> {
        tracing::debug!(
            "Reading configuration from file {} and profile {}",
            config_file,
            profile
        );
        let file_path = expand_user_home(config_file)?;
        let config = match Ini::load_from_file(&file_path) {
            Ok(c) => c,
            Err(e) => {
                return ia_err!(
                    "error reading config file '{}': {}",
                    file_path,
                    e.to_string()
                );
            }
        };
        let props = match config.section(Some(profile)) {
            Some(p) => p,
            None => {
                return ia_err!(
                    "error reading config file '{}': missing profile '{}'",
                    file_path,
                    profile
                );
            }
        };
        if let Some(v) = props.get(ZK_PORT_KEY) {
            self = self.zookeeper_port(v)?;
        }
        if let Some(v) = props.get(ZK_QUORUM_KEY) {
            self = self.zookeeper_quorum(v)?;
        }
        if let Some(v) = props.get(MASTER_KEY) {
            self = self.master(v)?;
        }
        if let Some(v) = props.get(ZNODE_PARENT_KEY) {
            self = self.znode_parent(v)?;
        }
        if let Some(v) = props.get(RPC_TIMEOUT_KEY) {
            self = self.rpc_timeout(parse_millis(&file_path, RPC_TIMEOUT_KEY, v)?)?;
        }
        if let Some(v) = props.get(OPERATION_TIMEOUT_KEY) {
            self = self.operation_timeout(parse_millis(&file_path, OPERATION_TIMEOUT_KEY, v)?)?;
        }
        if let Some(v) = props.get(SCANNER_TIMEOUT_KEY) {
            self = self.scanner_timeout(parse_millis(&file_path, SCANNER_TIMEOUT_KEY, v)?)?;
        }
        if let Some(v) = props.get(SCANNER_CACHING_KEY) {
            match v.trim().parse::<u32>() {
                Ok(c) => self = self.scanner_caching(c)?,
                Err(_) => {
                    return ia_err!(
                        "error reading config file '{}': invalid value '{}' for '{}'",
                        file_path,
                        v,
                        SCANNER_CACHING_KEY
                    );
                }
            }
        }
        if let Some(v) = props.get(REST_ENDPOINT_KEY) {
            self = self.endpoint(v)?;
        }
        Ok(self)
    }
    /// Set the REST gateway URL, for example `http://rest1:8080`.
    ///
    /// If no scheme is given, `http` is assumed. When no endpoint is set, the
    /// host of [`master()`](HandleBuilder::master()) on port 8080 is used.
    pub fn endpoint(mut self, endpoint: &str) -> Result<Self, HBaseError> {
        self.endpoint = endpoint.trim().to_string();
        Ok(self)
    }
    /// Set the mode of the handle: REST gateway or in-memory store.
    pub fn mode(mut self, mode: HandleMode) -> Result<Self, HBaseError> {
        self.mode = mode;
        Ok(self)
    }
    /// Use the given store client for all requests, ignoring
    /// [`mode()`](HandleBuilder::mode()).
    ///
    /// This is how a test substitutes a fake store, or an application plugs in
    /// its own client implementation.
    pub fn store(mut self, store: Arc<dyn StoreClient>) -> Result<Self, HBaseError> {
        self.store = Some(store);
        Ok(self)
    }
    /// Set the coordination service client port. Default `2181`.
    pub fn zookeeper_port(mut self, port: &str) -> Result<Self, HBaseError> {
        self.zk_port = port.trim().to_string();
        Ok(self)
    }
    /// Set the comma-separated coordination quorum hosts.
    pub fn zookeeper_quorum(mut self, quorum: &str) -> Result<Self, HBaseError> {
        self.zk_quorum = quorum.trim().to_string();
        Ok(self)
    }
    /// Set the master address, `host` or `host:port`.
    pub fn master(mut self, master: &str) -> Result<Self, HBaseError> {
        self.master = master.trim().to_string();
        Ok(self)
    }
    /// Set the coordination root path. Default `/hbase`.
    pub fn znode_parent(mut self, znode_parent: &str) -> Result<Self, HBaseError> {
        if !znode_parent.starts_with('/') {
            return ia_err!("root path '{}' must start with '/'", znode_parent);
        }
        self.znode_parent = znode_parent.to_string();
        Ok(self)
    }
    /// Set the timeout of a single remote call. Default 50 seconds.
    ///
    /// For REST handles this is also the connect timeout.
    pub fn rpc_timeout(mut self, timeout: Duration) -> Result<Self, HBaseError> {
        if timeout.is_zero() {
            return ia_err!("rpc timeout must be greater than zero");
        }
        self.rpc_timeout = timeout;
        Ok(self)
    }
    /// Set the timeout of a whole operation. Default 10 seconds.
    pub fn operation_timeout(mut self, timeout: Duration) -> Result<Self, HBaseError> {
        if timeout.is_zero() {
            return ia_err!("operation timeout must be greater than zero");
        }
        self.operation_timeout = timeout;
        Ok(self)
    }
    /// Set the scanner lease timeout. Default 200 seconds.
    pub fn scanner_timeout(mut self, timeout: Duration) -> Result<Self, HBaseError> {
        if timeout.is_zero() {
            return ia_err!("scanner timeout must be greater than zero");
        }
        self.scanner_timeout = timeout;
        Ok(self)
    }
    /// Set the number of rows a scanner fetches per round trip. Default 100.
    pub fn scanner_caching(mut self, caching: u32) -> Result<Self, HBaseError> {
        if caching == 0 {
            return ia_err!("scanner caching must be greater than zero");
        }
        self.scanner_caching = caching;
        Ok(self)
    }
    /// Add a certificate to use for https connections from a file.
    ///
    /// The file must contain an x509 certificate in `PEM` file format.
    pub fn add_cert_from_pemfile(self, pemfile: &str) -> Result<Self, HBaseError> {
        let path = expand_user_home(pemfile)?;
        let buf = std::fs::read(&path)?;
        match reqwest::Certificate::from_pem(&buf) {
            Ok(cert) => {
                return self.add_cert(cert);
            }
            Err(e) => {
                return ia_err!(
                    "error getting certificate from pemfile {}: {}",
                    pemfile,
                    e.to_string()
                );
            }
        }
    }

    /// Add a certificate to use for https connections.
    pub fn add_cert(mut self, cert: Certificate) -> Result<Self, HBaseError> {
        self.add_cert = Some(cert);
        Ok(self)
    }
    // see https://docs.rs/reqwest/latest/reqwest/struct.ClientBuilder.html#method.danger_accept_invalid_certs
    /// Allow https connection without validating certificates.
    ///
    /// **Warning:** This is only recommended for local testing purposes. Its use is insecure. See [`reqwest::ClientBuilder::danger_accept_invalid_certs()`] for details.
    ///
    pub fn danger_accept_invalid_certs(
        mut self,
        accept_invalid_certs: bool,
    ) -> Result<Self, HBaseError> {
        self.accept_invalid_certs = accept_invalid_certs;
        Ok(self)
    }
    /// Specify a [`reqwest::Client`] to use for all http/s connections.
    ///
    /// By default, a REST [`Handle`](crate::Handle) creates an internal [`reqwest::Client`] to use for
    /// all communications. If your application already has a reqwest Client, you can pass that
    /// into the HandleBuilder to avoid creating multiple connection pools.
    pub fn reqwest_client(mut self, client: &Client) -> Result<Self, HBaseError> {
        self.client = Some(client.clone());
        Ok(self)
    }

    /// The configuration as store property names and values.
    pub fn hbase_configuration(&self) -> BTreeMap<String, String> {
        let mut m = BTreeMap::new();
        m.insert(ZK_PORT_KEY.to_string(), self.zk_port.clone());
        m.insert(ZK_QUORUM_KEY.to_string(), self.zk_quorum.clone());
        m.insert(MASTER_KEY.to_string(), self.master.clone());
        m.insert(ZNODE_PARENT_KEY.to_string(), self.znode_parent.clone());
        m.insert(
            RPC_TIMEOUT_KEY.to_string(),
            self.rpc_timeout.as_millis().to_string(),
        );
        m.insert(
            OPERATION_TIMEOUT_KEY.to_string(),
            self.operation_timeout.as_millis().to_string(),
        );
        m.insert(
            SCANNER_TIMEOUT_KEY.to_string(),
            self.scanner_timeout.as_millis().to_string(),
        );
        m.insert(
            SCANNER_CACHING_KEY.to_string(),
            self.scanner_caching.to_string(),
        );
        m
    }

    // The REST gateway URL: the explicit endpoint, else the master host on
    // the gateway's default port.
    pub(crate) fn rest_endpoint(&self) -> Result<String, HBaseError> {
        let mut ep = self.endpoint.clone();
        if ep.is_empty() {
            let host = match self.master.rsplit_once(':') {
                Some((h, _)) => h,
                None => self.master.as_str(),
            };
            if host.is_empty() {
                if self.from_environment {
                    return ia_err!("can't determine REST endpoint: set HBASE_ADAPTER_ENDPOINT or HBASE_ADAPTER_MASTER");
                }
                return ia_err!("can't determine REST endpoint: call HandleBuilder::endpoint() or HandleBuilder::master()");
            }
            ep = format!("{}:{}", host, DEFAULT_REST_PORT);
        }
        if !ep.starts_with("http://") && !ep.starts_with("https://") {
            ep = format!("http://{}", ep);
        }
        while ep.ends_with('/') {
            ep.pop();
        }
        url::Url::parse(&ep)?;
        Ok(ep)
    }
}

fn parse_millis(file: &str, key: &str, val: &str) -> Result<Duration, HBaseError> {
    match val.trim().parse::<u64>() {
        Ok(ms) => Ok(Duration::from_millis(ms)),
        Err(_) => ia_err!(
            "error reading config file '{}': invalid value '{}' for '{}'",
            file,
            val,
            key
        ),
    }
}

// Expand a leading "~/" to the user's home directory.
pub(crate) fn expand_user_home(file_path: &str) -> Result<String, HBaseError> {
    if file_path.starts_with("~/") || file_path.starts_with("~\\") {
        if let Some(home_dir) = dirs::home_dir() {
            let full_path = home_dir.join(PathBuf::from(&file_path[2..]));
            return Ok(format!("{}", full_path.display()));
        }
        return ia_err!("cannot expand '{}': no home directory", file_path);
    }
    Ok(file_path.to_string())
}
