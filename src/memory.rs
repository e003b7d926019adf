//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! An in-process store.
//!
//! [`MemoryStore`] keeps tables in memory and implements the whole store
//! contract, including filter evaluation, version retention and
//! enable/disable state. It is meant for tests and for embedding; it also
//! counts open handles and can inject failures so that callers can verify
//! their error paths.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::result::Result;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::trace;

use crate::error::HBaseErrorCode::{
    IllegalArgument, IllegalState, NamespaceExists, NamespaceNotFound, ServerError,
    ServiceUnavailable, TableExists, TableNotDisabled, TableNotEnabled, TableNotFound,
};
use crate::error::HBaseError;
use crate::store::{
    AdminClient, BatchItemResult, Cell, Closeable, Delete, Put, RegionSplit, Scan, ScanResult,
    StoreClient, TableClient,
};
use crate::types::{DescriptorField, TableDescriptor, TableName, DEFAULT_NAMESPACE};

const SYSTEM_NAMESPACE: &str = "hbase";

// Attribute values a family gets when created without them.
const FAMILY_DEFAULTS: [(DescriptorField, &str); 11] = [
    (DescriptorField::BloomFilter, "ROW"),
    (DescriptorField::Versions, "1"),
    (DescriptorField::InMemory, "false"),
    (DescriptorField::KeepDeletedCells, "FALSE"),
    (DescriptorField::DataBlockEncoding, "NONE"),
    (DescriptorField::Ttl, "FOREVER"),
    (DescriptorField::Compression, "NONE"),
    (DescriptorField::MinVersions, "0"),
    (DescriptorField::BlockCache, "true"),
    (DescriptorField::BlockSize, "65536"),
    (DescriptorField::ReplicationScope, "0"),
];

// (family, qualifier) -> versions, newest first
type Columns = BTreeMap<(Vec<u8>, Vec<u8>), Vec<(i64, Vec<u8>)>>;

#[derive(Debug)]
struct MemTable {
    descriptor: TableDescriptor,
    enabled: bool,
    regions: usize,
    rows: BTreeMap<Vec<u8>, Columns>,
}

impl MemTable {
    fn max_versions(&self, family: &[u8]) -> Option<usize> {
        let name = String::from_utf8_lossy(family);
        let f = self.descriptor.family(&name)?;
        let v = f.get(DescriptorField::Versions).unwrap_or("1");
        Some(v.parse::<usize>().unwrap_or(1).max(1))
    }
}

#[derive(Debug)]
struct MemState {
    namespaces: BTreeSet<String>,
    tables: BTreeMap<TableName, MemTable>,
    last_timestamp: i64,
}

#[derive(Debug)]
struct MemInner {
    state: Mutex<MemState>,
    open_handles: AtomicUsize,
    unavailable: AtomicBool,
    fail_release: AtomicBool,
    closed: AtomicBool,
}

/// An in-memory implementation of [`StoreClient`].
///
/// Clones share the same data, so a test can keep a clone to inspect the
/// store while a [`Handle`](crate::Handle) uses another:
/// ```
/// use hbase_adapter::{Handle, MemoryStore};
/// use std::sync::Arc;
/// # #[tokio::main]
/// # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let handle = Handle::builder()
///     .store(Arc::new(store.clone()))?
///     .build()
///     .await?;
/// assert_eq!(store.open_handles(), 0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<MemInner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new()
    }
}

impl MemoryStore {
    /// Create an empty store holding the `default` and `hbase` namespaces.
    pub fn new() -> MemoryStore {
        let mut namespaces = BTreeSet::new();
        namespaces.insert(DEFAULT_NAMESPACE.to_string());
        namespaces.insert(SYSTEM_NAMESPACE.to_string());
        MemoryStore {
            inner: Arc::new(MemInner {
                state: Mutex::new(MemState {
                    namespaces,
                    tables: BTreeMap::new(),
                    last_timestamp: 0,
                }),
                open_handles: AtomicUsize::new(0),
                unavailable: AtomicBool::new(false),
                fail_release: AtomicBool::new(false),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Number of admin and table handles acquired and not yet released.
    pub fn open_handles(&self) -> usize {
        self.inner.open_handles.load(Ordering::SeqCst)
    }

    /// While set, every store call fails with
    /// [`ServiceUnavailable`](crate::HBaseErrorCode::ServiceUnavailable).
    /// Acquiring handles still succeeds.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// While set, releasing a handle reports an error. The handle is
    /// released anyway.
    pub fn fail_release(&self, fail: bool) {
        self.inner.fail_release.store(fail, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    fn acquire(&self) -> Result<(), HBaseError> {
        if self.is_closed() {
            return Err(HBaseError::new(IllegalState, "memory store is closed"));
        }
        self.inner.open_handles.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl MemInner {
    fn state(&self) -> Result<MutexGuard<'_, MemState>, HBaseError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(HBaseError::new(
                ServiceUnavailable,
                "memory store is unavailable",
            ));
        }
        self.state
            .lock()
            .map_err(|_| HBaseError::new(ServerError, "memory store lock poisoned"))
    }

    fn release(&self, released: &mut bool) -> Result<(), HBaseError> {
        if *released {
            return Ok(());
        }
        *released = true;
        self.open_handles.fetch_sub(1, Ordering::SeqCst);
        if self.fail_release.load(Ordering::SeqCst) {
            return Err(HBaseError::new(ServerError, "injected release failure"));
        }
        Ok(())
    }
}

impl MemState {
    fn table(&self, name: &TableName) -> Result<&MemTable, HBaseError> {
        match self.tables.get(name) {
            Some(t) => Ok(t),
            None => Err(table_not_found(name)),
        }
    }

    fn table_mut(&mut self, name: &TableName) -> Result<&mut MemTable, HBaseError> {
        match self.tables.get_mut(name) {
            Some(t) => Ok(t),
            None => Err(table_not_found(name)),
        }
    }

    fn enabled_table(&self, name: &TableName) -> Result<&MemTable, HBaseError> {
        let t = self.table(name)?;
        if !t.enabled {
            return Err(table_not_enabled(name));
        }
        Ok(t)
    }

    // Monotonic millisecond clock: never repeats a timestamp.
    fn next_timestamp(&mut self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        self.last_timestamp = now.max(self.last_timestamp + 1);
        self.last_timestamp
    }

    fn apply_put(&mut self, name: &TableName, put: &Put) -> Result<(), HBaseError> {
        if put.row.is_empty() {
            return Err(HBaseError::new(IllegalArgument, "row key must be non-empty"));
        }
        // check every family before writing anything
        let mut limits = Vec::with_capacity(put.cells.len());
        {
            let t = self.enabled_table(name)?;
            for c in &put.cells {
                match t.max_versions(&c.family) {
                    Some(m) => limits.push(m),
                    None => {
                        return Err(HBaseError::new(
                            IllegalArgument,
                            &format!(
                                "column family '{}' does not exist in table {}",
                                String::from_utf8_lossy(&c.family),
                                name
                            ),
                        ));
                    }
                }
            }
        }
        let ts = self.next_timestamp();
        let t = self.table_mut(name)?;
        let row = t.rows.entry(put.row.clone()).or_default();
        for (c, max) in put.cells.iter().zip(limits) {
            let versions = row
                .entry((c.family.clone(), c.qualifier.clone()))
                .or_default();
            let stamp = c.timestamp.unwrap_or(ts);
            versions.retain(|(t, _)| *t != stamp);
            versions.push((stamp, c.value.clone()));
            versions.sort_by(|a, b| b.0.cmp(&a.0));
            versions.truncate(max);
        }
        Ok(())
    }

    fn scan(&self, name: &TableName, scan: &Scan) -> Result<Vec<ScanResult>, HBaseError> {
        let t = self.enabled_table(name)?;
        let mut results = Vec::new();
        let start = scan.start_row.clone().unwrap_or_default();
        let stop = scan.stop_row.clone().filter(|s| !s.is_empty());
        if let Some(s) = &stop {
            if &start >= s {
                return Ok(results);
            }
        }
        let versions = scan.max_versions.unwrap_or(1).max(1) as usize;
        let mut accepted: u64 = 0;
        for (key, cols) in t.rows.range(start..) {
            if let Some(s) = &stop {
                if key >= s {
                    break;
                }
            }
            if let Some(limit) = scan.limit {
                if results.len() >= limit {
                    break;
                }
            }
            if let Some(f) = &scan.filter {
                if f.exhausted(accepted) {
                    break;
                }
            }
            let mut cells = Vec::new();
            for ((family, qualifier), vs) in cols {
                let in_range = vs.iter().filter(|(ts, _)| match scan.time_range {
                    Some((min, max)) => *ts >= min && *ts < max,
                    None => true,
                });
                for (ts, value) in in_range.take(versions) {
                    cells.push(Cell {
                        row: key.clone(),
                        family: family.clone(),
                        qualifier: qualifier.clone(),
                        timestamp: *ts,
                        value: value.clone(),
                    });
                }
            }
            if cells.is_empty() {
                continue;
            }
            let cells = match &scan.filter {
                Some(f) => match f.apply(key, cells, accepted) {
                    Some(c) if !c.is_empty() => c,
                    _ => continue,
                },
                None => cells,
            };
            accepted += 1;
            results.push(ScanResult {
                row: key.clone(),
                cells,
            });
        }
        Ok(results)
    }
}

fn table_not_found(name: &TableName) -> HBaseError {
    HBaseError::new(TableNotFound, &format!("table {} does not exist", name))
}

fn table_not_enabled(name: &TableName) -> HBaseError {
    HBaseError::new(TableNotEnabled, &format!("table {} is disabled", name))
}

#[async_trait]
impl StoreClient for MemoryStore {
    async fn admin(&self) -> Result<Box<dyn AdminClient>, HBaseError> {
        self.acquire()?;
        Ok(Box::new(MemAdmin {
            inner: self.inner.clone(),
            released: false,
        }))
    }

    async fn table(&self, table: &TableName) -> Result<Box<dyn TableClient>, HBaseError> {
        self.acquire()?;
        Ok(Box::new(MemTableClient {
            inner: self.inner.clone(),
            name: table.clone(),
            released: false,
        }))
    }

    fn close(&self) -> Result<(), HBaseError> {
        self.inner.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

struct MemAdmin {
    inner: Arc<MemInner>,
    released: bool,
}

impl Closeable for MemAdmin {
    fn close(&mut self) -> Result<(), HBaseError> {
        self.inner.release(&mut self.released)
    }
}

#[async_trait]
impl AdminClient for MemAdmin {
    async fn table_exists(&self, table: &TableName) -> Result<bool, HBaseError> {
        Ok(self.inner.state()?.tables.contains_key(table))
    }

    async fn create_table(
        &self,
        table: &TableName,
        descriptor: &TableDescriptor,
        split: &RegionSplit,
    ) -> Result<(), HBaseError> {
        let mut st = self.inner.state()?;
        if !st.namespaces.contains(table.namespace()) {
            return Err(HBaseError::new(
                NamespaceNotFound,
                &format!("namespace {} does not exist", table.namespace()),
            ));
        }
        if st.tables.contains_key(table) {
            return Err(HBaseError::new(
                TableExists,
                &format!("table {} already exists", table),
            ));
        }
        if descriptor.families().is_empty() {
            return Err(HBaseError::new(
                IllegalArgument,
                "table must have at least one column family",
            ));
        }
        let mut desc = descriptor.clone();
        desc.table_name = table.to_string();
        for f in desc.families.iter_mut() {
            for (field, value) in FAMILY_DEFAULTS {
                if f.get(field).is_none() {
                    f.set(field, value);
                }
            }
        }
        trace!("memory store: created table {}", table);
        st.tables.insert(
            table.clone(),
            MemTable {
                descriptor: desc,
                enabled: true,
                regions: split.num_regions(),
                rows: BTreeMap::new(),
            },
        );
        Ok(())
    }

    async fn disable_table(&self, table: &TableName) -> Result<(), HBaseError> {
        let mut st = self.inner.state()?;
        let t = st.table_mut(table)?;
        if !t.enabled {
            return Err(table_not_enabled(table));
        }
        t.enabled = false;
        Ok(())
    }

    async fn enable_table(&self, table: &TableName) -> Result<(), HBaseError> {
        let mut st = self.inner.state()?;
        let t = st.table_mut(table)?;
        if t.enabled {
            return Err(HBaseError::new(
                TableNotDisabled,
                &format!("table {} is already enabled", table),
            ));
        }
        t.enabled = true;
        Ok(())
    }

    async fn is_table_enabled(&self, table: &TableName) -> Result<bool, HBaseError> {
        Ok(self.inner.state()?.table(table)?.enabled)
    }

    async fn delete_table(&self, table: &TableName) -> Result<(), HBaseError> {
        let mut st = self.inner.state()?;
        if st.table(table)?.enabled {
            return Err(HBaseError::new(
                TableNotDisabled,
                &format!("table {} must be disabled before it is deleted", table),
            ));
        }
        st.tables.remove(table);
        Ok(())
    }

    async fn truncate_table(
        &self,
        table: &TableName,
        preserve_splits: bool,
    ) -> Result<(), HBaseError> {
        let mut st = self.inner.state()?;
        let t = st.table_mut(table)?;
        if t.enabled {
            return Err(HBaseError::new(
                TableNotDisabled,
                &format!("table {} must be disabled before it is truncated", table),
            ));
        }
        t.rows.clear();
        if !preserve_splits {
            t.regions = 1;
        }
        // the store brings a truncated table back online
        t.enabled = true;
        Ok(())
    }

    async fn list_table_names(
        &self,
        namespace: Option<&str>,
    ) -> Result<Vec<TableName>, HBaseError> {
        let st = self.inner.state()?;
        if let Some(ns) = namespace {
            if !st.namespaces.contains(ns) {
                return Err(HBaseError::new(
                    NamespaceNotFound,
                    &format!("namespace {} does not exist", ns),
                ));
            }
        }
        Ok(st
            .tables
            .keys()
            .filter(|t| match namespace {
                Some(ns) => t.namespace() == ns,
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn create_namespace(&self, namespace: &str) -> Result<(), HBaseError> {
        let mut st = self.inner.state()?;
        if !st.namespaces.insert(namespace.to_string()) {
            return Err(HBaseError::new(
                NamespaceExists,
                &format!("namespace {} already exists", namespace),
            ));
        }
        Ok(())
    }

    async fn delete_namespace(&self, namespace: &str) -> Result<(), HBaseError> {
        let mut st = self.inner.state()?;
        if !st.namespaces.contains(namespace) {
            return Err(HBaseError::new(
                NamespaceNotFound,
                &format!("namespace {} does not exist", namespace),
            ));
        }
        if namespace == DEFAULT_NAMESPACE || namespace == SYSTEM_NAMESPACE {
            return Err(HBaseError::new(
                IllegalArgument,
                &format!("reserved namespace {} cannot be removed", namespace),
            ));
        }
        if st.tables.keys().any(|t| t.namespace() == namespace) {
            return Err(HBaseError::new(
                IllegalArgument,
                &format!("only empty namespaces can be removed: {}", namespace),
            ));
        }
        st.namespaces.remove(namespace);
        Ok(())
    }

    async fn list_namespaces(&self) -> Result<Vec<String>, HBaseError> {
        Ok(self.inner.state()?.namespaces.iter().cloned().collect())
    }

    async fn cluster_status(&self) -> Result<String, HBaseError> {
        let st = self.inner.state()?;
        let regions: usize = st.tables.values().map(|t| t.regions).sum();
        Ok(format!(
            "Master: memory\nNumber of backup masters: 0\nNumber of live region servers: 1\nNumber of dead region servers: 0\nNumber of tables: {}\nNumber of regions: {}\nAverage load: {}",
            st.tables.len(),
            regions,
            regions as f64
        ))
    }
}

struct MemTableClient {
    inner: Arc<MemInner>,
    name: TableName,
    released: bool,
}

impl Closeable for MemTableClient {
    fn close(&mut self) -> Result<(), HBaseError> {
        self.inner.release(&mut self.released)
    }
}

#[async_trait]
impl TableClient for MemTableClient {
    fn table_name(&self) -> &TableName {
        &self.name
    }

    async fn put(&self, put: &Put) -> Result<(), HBaseError> {
        self.inner.state()?.apply_put(&self.name, put)
    }

    async fn batch(&self, puts: &[Put]) -> Result<Vec<BatchItemResult>, HBaseError> {
        let mut st = self.inner.state()?;
        st.enabled_table(&self.name)?;
        let mut results = Vec::with_capacity(puts.len());
        for p in puts {
            match st.apply_put(&self.name, p) {
                Ok(_) => results.push(BatchItemResult {
                    success: true,
                    message: None,
                }),
                Err(e) => results.push(BatchItemResult {
                    success: false,
                    message: Some(e.message),
                }),
            }
        }
        Ok(results)
    }

    async fn delete(&self, deletes: &[Delete]) -> Result<(), HBaseError> {
        let mut st = self.inner.state()?;
        st.enabled_table(&self.name)?;
        let t = st.table_mut(&self.name)?;
        for d in deletes {
            t.rows.remove(&d.row);
        }
        Ok(())
    }

    async fn scan(&self, scan: &Scan) -> Result<Vec<ScanResult>, HBaseError> {
        self.inner.state()?.scan(&self.name, scan)
    }

    async fn descriptor(&self) -> Result<TableDescriptor, HBaseError> {
        Ok(self.inner.state()?.table(&self.name)?.descriptor.clone())
    }
}
