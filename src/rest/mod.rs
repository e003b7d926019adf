//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! A store client for the REST gateway.
//!
//! The gateway exposes tables, schemas, rows and scanners as JSON resources.
//! It has no notion of disabled tables and cannot pre-split a new table;
//! truncation is carried out as delete and re-create.

pub(crate) mod filter_model;
pub(crate) mod model;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method, Response, StatusCode};
use std::result::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::HBaseErrorCode::{
    BadProtocolMessage, IllegalState, NamespaceExists, NamespaceNotFound, OperationNotSupported,
    ServerError, ServiceUnavailable, TableExists, TableNotFound,
};
use crate::error::{user_agent, HBaseError};
use crate::handle_builder::HandleBuilder;
use crate::store::{
    AdminClient, BatchItemResult, Closeable, Delete, Put, RegionSplit, Scan, ScanResult,
    StoreClient, TableClient,
};
use crate::types::{TableDescriptor, TableName};
use model::{
    CellSetModel, ClusterStatusModel, NamespacesModel, ScannerModel, TableListModel,
    TableSchemaModel,
};

// What a 404 or 409 from the gateway refers to.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Resource {
    Table,
    Namespace,
    Other,
}

#[derive(Debug)]
struct RestRef {
    client: Client,
    endpoint: String,
    operation_timeout: Duration,
    scanner_timeout: Duration,
    closed: AtomicBool,
}

/// A [`StoreClient`] that talks to the store's REST gateway.
#[derive(Debug, Clone)]
pub struct RestStore {
    inner: Arc<RestRef>,
}

impl RestStore {
    /// Create a client from the builder's endpoint, timeout and TLS settings.
    pub fn new(builder: &HandleBuilder) -> Result<RestStore, HBaseError> {
        let endpoint = builder.rest_endpoint()?;
        let client = match &builder.client {
            Some(c) => c.clone(),
            None => {
                let mut cb = reqwest::Client::builder()
                    .connect_timeout(builder.rpc_timeout)
                    .connection_verbose(true);
                if let Some(cert) = &builder.add_cert {
                    cb = cb.add_root_certificate(cert.clone());
                }
                if builder.accept_invalid_certs {
                    cb = cb.danger_accept_invalid_certs(true);
                }
                cb.build()?
            }
        };
        debug!("REST store endpoint={}", endpoint);
        Ok(RestStore {
            inner: Arc::new(RestRef {
                client,
                endpoint,
                operation_timeout: builder.operation_timeout,
                scanner_timeout: builder.scanner_timeout,
                closed: AtomicBool::new(false),
            }),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    fn check_open(&self) -> Result<(), HBaseError> {
        if self.inner.closed.load(Ordering::SeqCst) {
            return Err(HBaseError::new(IllegalState, "REST store is closed"));
        }
        Ok(())
    }
}

impl RestRef {
    fn url(&self, segments: &[&str]) -> Result<Url, HBaseError> {
        let mut u = Url::parse(&self.endpoint)?;
        {
            let mut ps = match u.path_segments_mut() {
                Ok(ps) => ps,
                Err(_) => {
                    return Err(HBaseError::new(
                        IllegalState,
                        &format!("endpoint {} cannot hold a path", self.endpoint),
                    ));
                }
            };
            ps.pop_if_empty();
            for s in segments {
                ps.push(s);
            }
        }
        Ok(u)
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<String>,
        timeout: Duration,
    ) -> Result<Response, HBaseError> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_str("application/json")?);
        headers.insert("User-Agent", HeaderValue::from_str(user_agent())?);
        trace!("{} {}", method, url);
        let mut rb = self
            .client
            .request(method, url)
            .timeout(timeout)
            .headers(headers);
        if let Some(b) = body {
            rb = rb
                .header("Content-Type", HeaderValue::from_str("application/json")?)
                .body(b);
        }
        Ok(rb.send().await?)
    }

    // Send a request and turn any non-success status into an error.
    async fn call(
        &self,
        method: Method,
        url: Url,
        body: Option<String>,
        resource: Resource,
        what: &str,
    ) -> Result<Response, HBaseError> {
        let resp = self
            .send(method, url, body, self.operation_timeout)
            .await?;
        check_status(resp, resource, what).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        resource: Resource,
        what: &str,
    ) -> Result<T, HBaseError> {
        let resp = self.call(Method::GET, url, None, resource, what).await?;
        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn exists(&self, table: &TableName) -> Result<bool, HBaseError> {
        let name = table.to_string();
        let url = self.url(&[name.as_str(), "exists"])?;
        let resp = self
            .send(Method::GET, url, None, self.operation_timeout)
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        check_status(resp, Resource::Table, &name).await?;
        Ok(true)
    }

    async fn schema(&self, table: &TableName) -> Result<TableDescriptor, HBaseError> {
        let name = table.to_string();
        let url = self.url(&[name.as_str(), "schema"])?;
        let m: TableSchemaModel = self.get_json(url, Resource::Table, &name).await?;
        Ok(m.into_descriptor())
    }

    async fn put_schema(
        &self,
        table: &TableName,
        desc: &TableDescriptor,
    ) -> Result<(), HBaseError> {
        let name = table.to_string();
        let model = TableSchemaModel::from_descriptor(&name, desc);
        let body = serde_json::to_string(&model)?;
        let url = self.url(&[name.as_str(), "schema"])?;
        self.call(Method::PUT, url, Some(body), Resource::Table, &name)
            .await?;
        Ok(())
    }

    async fn delete_schema(&self, table: &TableName) -> Result<(), HBaseError> {
        let name = table.to_string();
        let url = self.url(&[name.as_str(), "schema"])?;
        self.call(Method::DELETE, url, None, Resource::Table, &name)
            .await?;
        Ok(())
    }

    async fn scan(&self, table: &TableName, scan: &Scan) -> Result<Vec<ScanResult>, HBaseError> {
        let name = table.to_string();
        let body = serde_json::to_string(&ScannerModel::from_scan(scan))?;
        let url = self.url(&[name.as_str(), "scanner"])?;
        let resp = self
            .send(Method::POST, url, Some(body), self.scanner_timeout)
            .await?;
        let resp = check_status(resp, Resource::Table, &name).await?;
        let location = match resp.headers().get("Location").map(|v| v.to_str()) {
            Some(Ok(l)) => l.to_string(),
            _ => {
                return Err(HBaseError::new(
                    BadProtocolMessage,
                    "scanner created without a Location header",
                ));
            }
        };
        let scanner = Url::parse(&location)?;
        let res = self.drain_scanner(&scanner, scan.limit).await;
        // release the scanner whatever the outcome of the scan
        match self
            .send(Method::DELETE, scanner.clone(), None, self.operation_timeout)
            .await
        {
            Ok(r) if r.status().is_success() => trace!("released scanner {}", scanner),
            Ok(r) => warn!("error releasing scanner {}: status {}", scanner, r.status()),
            Err(e) => warn!("error releasing scanner {}: {}", scanner, e),
        }
        res
    }

    async fn drain_scanner(
        &self,
        scanner: &Url,
        limit: Option<usize>,
    ) -> Result<Vec<ScanResult>, HBaseError> {
        let mut results = Vec::new();
        loop {
            if let Some(l) = limit {
                if results.len() >= l {
                    results.truncate(l);
                    break;
                }
            }
            let resp = self
                .send(Method::GET, scanner.clone(), None, self.scanner_timeout)
                .await?;
            if resp.status() == StatusCode::NO_CONTENT {
                break;
            }
            let resp = check_status(resp, Resource::Other, "scanner").await?;
            let text = resp.text().await?;
            let cs: CellSetModel = serde_json::from_str(&text)?;
            if cs.rows.is_empty() {
                break;
            }
            results.extend(cs.into_results()?);
        }
        Ok(results)
    }
}

async fn check_status(
    resp: Response,
    resource: Resource,
    what: &str,
) -> Result<Response, HBaseError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    let code = match (status, resource) {
        (StatusCode::NOT_FOUND, Resource::Table) => TableNotFound,
        (StatusCode::NOT_FOUND, Resource::Namespace) => NamespaceNotFound,
        (StatusCode::CONFLICT, Resource::Table) => TableExists,
        (StatusCode::CONFLICT, Resource::Namespace) => NamespaceExists,
        (StatusCode::SERVICE_UNAVAILABLE, _) => ServiceUnavailable,
        _ => ServerError,
    };
    Err(HBaseError::new(
        code,
        &format!("{}: http status {}: {}", what, status, text.trim()),
    ))
}

#[async_trait]
impl StoreClient for RestStore {
    async fn admin(&self) -> Result<Box<dyn AdminClient>, HBaseError> {
        self.check_open()?;
        Ok(Box::new(RestAdmin {
            inner: self.inner.clone(),
        }))
    }

    async fn table(&self, table: &TableName) -> Result<Box<dyn TableClient>, HBaseError> {
        self.check_open()?;
        Ok(Box::new(RestTable {
            inner: self.inner.clone(),
            name: table.clone(),
        }))
    }

    fn close(&self) -> Result<(), HBaseError> {
        self.inner.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

// Gateway handles hold no server-side state: releasing them is a no-op.
struct RestAdmin {
    inner: Arc<RestRef>,
}

impl Closeable for RestAdmin {
    fn close(&mut self) -> Result<(), HBaseError> {
        Ok(())
    }
}

#[async_trait]
impl AdminClient for RestAdmin {
    async fn table_exists(&self, table: &TableName) -> Result<bool, HBaseError> {
        self.inner.exists(table).await
    }

    async fn create_table(
        &self,
        table: &TableName,
        descriptor: &TableDescriptor,
        split: &RegionSplit,
    ) -> Result<(), HBaseError> {
        if *split != RegionSplit::None {
            return Err(HBaseError::new(
                OperationNotSupported,
                "the REST gateway cannot create pre-split tables",
            ));
        }
        self.inner.put_schema(table, descriptor).await
    }

    async fn disable_table(&self, table: &TableName) -> Result<(), HBaseError> {
        if !self.inner.exists(table).await? {
            return Err(HBaseError::new(
                TableNotFound,
                &format!("table {} does not exist", table),
            ));
        }
        Ok(())
    }

    async fn enable_table(&self, _table: &TableName) -> Result<(), HBaseError> {
        Ok(())
    }

    async fn is_table_enabled(&self, table: &TableName) -> Result<bool, HBaseError> {
        if !self.inner.exists(table).await? {
            return Err(HBaseError::new(
                TableNotFound,
                &format!("table {} does not exist", table),
            ));
        }
        Ok(true)
    }

    async fn delete_table(&self, table: &TableName) -> Result<(), HBaseError> {
        self.inner.delete_schema(table).await
    }

    async fn truncate_table(
        &self,
        table: &TableName,
        preserve_splits: bool,
    ) -> Result<(), HBaseError> {
        if preserve_splits {
            debug!("REST gateway cannot preserve splits of {}", table);
        }
        let desc = self.inner.schema(table).await?;
        self.inner.delete_schema(table).await?;
        self.inner.put_schema(table, &desc).await
    }

    async fn list_table_names(
        &self,
        namespace: Option<&str>,
    ) -> Result<Vec<TableName>, HBaseError> {
        let (url, resource) = match namespace {
            Some(ns) => (
                self.inner.url(&["namespaces", ns, "tables"])?,
                Resource::Namespace,
            ),
            None => (self.inner.url(&[])?, Resource::Other),
        };
        let m: TableListModel = self
            .inner
            .get_json(url, resource, namespace.unwrap_or("tables"))
            .await?;
        let mut names = Vec::with_capacity(m.tables.len());
        for t in m.tables {
            // namespace listings return bare names
            let full = match namespace {
                Some(ns) if !t.name.contains(':') => format!("{}:{}", ns, t.name),
                _ => t.name,
            };
            names.push(TableName::parse(&full)?);
        }
        Ok(names)
    }

    async fn create_namespace(&self, namespace: &str) -> Result<(), HBaseError> {
        let url = self.inner.url(&["namespaces", namespace])?;
        self.inner
            .call(Method::POST, url, None, Resource::Namespace, namespace)
            .await?;
        Ok(())
    }

    async fn delete_namespace(&self, namespace: &str) -> Result<(), HBaseError> {
        let url = self.inner.url(&["namespaces", namespace])?;
        self.inner
            .call(Method::DELETE, url, None, Resource::Namespace, namespace)
            .await?;
        Ok(())
    }

    async fn list_namespaces(&self) -> Result<Vec<String>, HBaseError> {
        let url = self.inner.url(&["namespaces"])?;
        let m: NamespacesModel = self
            .inner
            .get_json(url, Resource::Other, "namespaces")
            .await?;
        Ok(m.namespaces)
    }

    async fn cluster_status(&self) -> Result<String, HBaseError> {
        let url = self.inner.url(&["status", "cluster"])?;
        let m: ClusterStatusModel = self
            .inner
            .get_json(url, Resource::Other, "cluster status")
            .await?;
        Ok(m.to_string())
    }
}

struct RestTable {
    inner: Arc<RestRef>,
    name: TableName,
}

impl Closeable for RestTable {
    fn close(&mut self) -> Result<(), HBaseError> {
        Ok(())
    }
}

impl RestTable {
    async fn put_rows(&self, puts: &[Put]) -> Result<(), HBaseError> {
        let name = self.name.to_string();
        let body = serde_json::to_string(&CellSetModel::from_puts(puts))?;
        // the row in the path is ignored when the body names its rows
        let url = self.inner.url(&[name.as_str(), "fakerow"])?;
        self.inner
            .call(Method::PUT, url, Some(body), Resource::Table, &name)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl TableClient for RestTable {
    fn table_name(&self) -> &TableName {
        &self.name
    }

    async fn put(&self, put: &Put) -> Result<(), HBaseError> {
        self.put_rows(std::slice::from_ref(put)).await
    }

    async fn batch(&self, puts: &[Put]) -> Result<Vec<BatchItemResult>, HBaseError> {
        // the gateway applies a cell set as a whole
        self.put_rows(puts).await?;
        Ok(puts
            .iter()
            .map(|_| BatchItemResult {
                success: true,
                message: None,
            })
            .collect())
    }

    async fn delete(&self, deletes: &[Delete]) -> Result<(), HBaseError> {
        let name = self.name.to_string();
        // the gateway deletes one row per call
        for d in deletes {
            let key = String::from_utf8_lossy(&d.row).into_owned();
            let url = self.inner.url(&[name.as_str(), key.as_str()])?;
            let resp = self
                .inner
                .send(Method::DELETE, url, None, self.inner.operation_timeout)
                .await?;
            // deleting a missing row is not an error
            if resp.status() == StatusCode::NOT_FOUND && self.inner.exists(&self.name).await? {
                continue;
            }
            check_status(resp, Resource::Table, &name).await?;
        }
        Ok(())
    }

    async fn scan(&self, scan: &Scan) -> Result<Vec<ScanResult>, HBaseError> {
        self.inner.scan(&self.name, scan).await
    }

    async fn descriptor(&self) -> Result<TableDescriptor, HBaseError> {
        self.inner.schema(&self.name).await
    }
}
