//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! The store client contract.
//!
//! Every request in this crate is carried out through these traits. The
//! crate ships two implementations, [`RestStore`](crate::RestStore) and
//! [`MemoryStore`](crate::MemoryStore); any other client may be plugged in
//! with [`HandleBuilder::store()`](crate::HandleBuilder::store()).
//!
//! Region location, RPC retries, filter evaluation and versioning all belong
//! to the implementation. Requests only build the parameters below and
//! forward them.

use async_trait::async_trait;
use std::fmt::Debug;
use std::result::Result;

use crate::error::HBaseError;
use crate::filter::ScanFilter;
use crate::types::{TableDescriptor, TableName};

/// A single cell version as returned by the store.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct Cell {
    pub row: Vec<u8>,
    pub family: Vec<u8>,
    pub qualifier: Vec<u8>,
    pub timestamp: i64,
    pub value: Vec<u8>,
}

/// All cells returned for one row by a scan.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct ScanResult {
    pub row: Vec<u8>,
    pub cells: Vec<Cell>,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of cells in this result.
    pub fn size(&self) -> usize {
        self.cells.len()
    }
}

/// One column value of a [`Put`]. A missing timestamp lets the store assign one.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct PutCell {
    pub family: Vec<u8>,
    pub qualifier: Vec<u8>,
    pub timestamp: Option<i64>,
    pub value: Vec<u8>,
}

/// Mutation writing one or more columns of a single row.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct Put {
    pub row: Vec<u8>,
    pub cells: Vec<PutCell>,
}

/// Mutation removing an entire row.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct Delete {
    pub row: Vec<u8>,
}

/// Outcome of one item of a batch call, as reported by the store.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct BatchItemResult {
    pub success: bool,
    pub message: Option<String>,
}

/// How a new table's key space is split into regions.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub enum RegionSplit {
    /// A single region.
    #[default]
    None,
    /// Explicit split points.
    SplitKeys(Vec<Vec<u8>>),
    /// `num_regions` regions spread evenly between `start` and `end`.
    Range {
        start: Vec<u8>,
        end: Vec<u8>,
        num_regions: u32,
    },
}

impl RegionSplit {
    pub fn num_regions(&self) -> usize {
        match self {
            RegionSplit::None => 1,
            RegionSplit::SplitKeys(k) => k.len() + 1,
            RegionSplit::Range { num_regions, .. } => *num_regions as usize,
        }
    }
}

/// Parameters of a single range scan.
#[derive(Default, Debug, Clone)]
pub struct Scan {
    /// Inclusive lower bound.
    pub start_row: Option<Vec<u8>>,
    /// Exclusive upper bound.
    pub stop_row: Option<Vec<u8>>,
    /// `[min, max)` timestamp range.
    pub time_range: Option<(i64, i64)>,
    /// `None` means the store default (newest version only).
    pub max_versions: Option<u32>,
    pub filter: Option<ScanFilter>,
    /// Rows fetched per round trip by the store's scanner.
    pub caching: u32,
    /// Maximum number of results to read from the scanner.
    pub limit: Option<usize>,
}

/// A resource that must be released after use.
///
/// Release is best-effort: failures are logged by the caller and never
/// replace the outcome of the operation that used the resource.
pub trait Closeable: Send + Sync {
    fn close(&mut self) -> Result<(), HBaseError>;
}

/// Administrative handle: schema, namespace and cluster operations.
#[async_trait]
pub trait AdminClient: Closeable {
    async fn table_exists(&self, table: &TableName) -> Result<bool, HBaseError>;
    async fn create_table(
        &self,
        table: &TableName,
        descriptor: &TableDescriptor,
        split: &RegionSplit,
    ) -> Result<(), HBaseError>;
    async fn disable_table(&self, table: &TableName) -> Result<(), HBaseError>;
    async fn enable_table(&self, table: &TableName) -> Result<(), HBaseError>;
    async fn is_table_enabled(&self, table: &TableName) -> Result<bool, HBaseError>;
    async fn delete_table(&self, table: &TableName) -> Result<(), HBaseError>;
    async fn truncate_table(
        &self,
        table: &TableName,
        preserve_splits: bool,
    ) -> Result<(), HBaseError>;
    /// List tables, in all namespaces when `namespace` is `None`.
    async fn list_table_names(
        &self,
        namespace: Option<&str>,
    ) -> Result<Vec<TableName>, HBaseError>;
    async fn create_namespace(&self, namespace: &str) -> Result<(), HBaseError>;
    async fn delete_namespace(&self, namespace: &str) -> Result<(), HBaseError>;
    async fn list_namespaces(&self) -> Result<Vec<String>, HBaseError>;
    async fn cluster_status(&self) -> Result<String, HBaseError>;
}

/// Handle to a single table: data operations.
#[async_trait]
pub trait TableClient: Closeable {
    fn table_name(&self) -> &TableName;
    async fn put(&self, put: &Put) -> Result<(), HBaseError>;
    async fn batch(&self, puts: &[Put]) -> Result<Vec<BatchItemResult>, HBaseError>;
    async fn delete(&self, deletes: &[Delete]) -> Result<(), HBaseError>;
    /// Execute one scan and return its results in row-key order.
    async fn scan(&self, scan: &Scan) -> Result<Vec<ScanResult>, HBaseError>;
    async fn descriptor(&self) -> Result<TableDescriptor, HBaseError>;
}

/// A connection to the store. One instance is shared by every clone of a
/// [`Handle`](crate::Handle) and must be safe for concurrent use.
#[async_trait]
pub trait StoreClient: Send + Sync + Debug {
    async fn admin(&self) -> Result<Box<dyn AdminClient>, HBaseError>;
    async fn table(&self, table: &TableName) -> Result<Box<dyn TableClient>, HBaseError>;
    /// Tear down the connection.
    fn close(&self) -> Result<(), HBaseError>;
}
