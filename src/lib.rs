//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! HBase Adapter for Rust
//!
//! A procedural adapter for Apache HBase. It wraps table lifecycle, mutations
//! and paginated scans behind simple request structs, so applications never
//! manage scanners, admin handles or connections themselves.
//!
//! This adapter uses Rust `async` methods throughout, using the [tokio](https://crates.io/crates/tokio) runtime. There is currently no blocking support.
//!
//! The general flow for an application is:
//! - Create a [`HandleBuilder`] with all needed parameters
//! - Create a [`Handle`] from the [`HandleBuilder`] that will be used throughout the application, across all threads
//! - Interact with the store using the [`Handle`] and Request structs such as [`TableRequest`], [`PutRequest`], [`ScanPageRequest`], etc.
//!
//! ## Simple Example
//! The following code creates a [`Handle`] backed by the in-memory store,
//! writes two rows and reads them back one page at a time.
//! ```no_run
//! use hbase_adapter::{Handle, HandleMode, PageCursor, PutRequest, ScanPageRequest, TableRequest};
//! use hbase_adapter::types::ColumnFamilySpec;
//! use std::error::Error;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn Error>> {
//!     let handle = Handle::builder()
//!         .mode(HandleMode::InMemory)?
//!         .build()
//!         .await?;
//!
//!     TableRequest::new("users")
//!         .column_family(ColumnFamilySpec::new("info"))
//!         .execute(&handle)
//!         .await?;
//!
//!     for (key, name) in [("u1", "jane"), ("u2", "john")] {
//!         PutRequest::new("users", key)
//!             .column("info", "name", name)
//!             .execute(&handle)
//!             .await?;
//!     }
//!
//!     let mut cursor = PageCursor::new("users", 1);
//!     loop {
//!         cursor = ScanPageRequest::new("users")
//!             .cursor(cursor)
//!             .execute(&handle)
//!             .await?;
//!         if cursor.rows().is_empty() {
//!             break;
//!         }
//!         for row in cursor.rows() {
//!             println!("{}", row);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Connecting to a cluster
//!
//! [`HandleMode::Rest`] (the default) talks to the cluster's REST gateway.
//! The gateway is taken from [`HandleBuilder::endpoint()`], or derived from
//! the configured master host. All settings can also be read from the
//! environment with [`HandleBuilder::from_environment()`] or from an ini
//! file with [`HandleBuilder::from_file()`].
//!
//! Any other client may be plugged in by implementing [`StoreClient`] and
//! passing it to [`HandleBuilder::store()`].
//!
//! ## Errors
//!
//! Every operation returns [`HBaseError`]. Use [`HBaseError::kind()`] to tell
//! precondition failures (bad arguments, missing or existing tables, closed
//! handle) from transport failures raised by the store.
//!
//! ## Logging
//!
//! The adapter logs through [tracing](https://crates.io/crates/tracing).
//! Scan and assembly timings are reported at `debug` level; failures to
//! release store resources are reported at `warn` level.

pub mod codec;
pub use crate::codec::ToCellBytes;

#[cfg(test)]
pub(crate) mod codec_tests;
pub(crate) mod delete_request;
pub use crate::delete_request::DeleteRequest;

pub(crate) mod error;
pub use crate::error::{ErrorKind, HBaseError, HBaseErrorCode};

pub mod filter;
#[cfg(test)]
pub(crate) mod filter_tests;
pub use crate::filter::{CompareOp, Comparator, ListOperator, RegexPattern, ScanFilter};

pub(crate) mod handle;
pub use crate::handle::Handle;

pub(crate) mod handle_builder;
pub use crate::handle_builder::{HandleBuilder, HandleMode};

#[cfg(test)]
pub(crate) mod handle_builder_tests;
pub(crate) mod list_tables_request;
pub use crate::list_tables_request::{ListTablesRequest, ListTablesResult};

pub(crate) mod memory;
pub use crate::memory::MemoryStore;

pub(crate) mod namespace_request;
pub use crate::namespace_request::{ListNamespacesRequest, NamespaceRequest};

pub(crate) mod put_request;
pub use crate::put_request::PutRequest;

pub(crate) mod rest;
pub use crate::rest::RestStore;

pub(crate) mod scan_request;
pub use crate::scan_request::{
    ListQualifiersRequest, PageCursor, RowCountRequest, ScanPageRequest, DEFAULT_PAGE_SIZE,
};

pub mod store;
pub use crate::store::{AdminClient, Closeable, StoreClient, TableClient};

pub(crate) mod system_request;
pub use crate::system_request::{adapter_version, ClusterStatusRequest};

pub(crate) mod table_request;
pub use crate::table_request::{
    DropTableRequest, GetTableRequest, TableRequest, TruncateTableRequest,
};

pub mod types;
#[cfg(test)]
pub(crate) mod types_tests;

pub(crate) mod write_multiple_request;
pub use crate::write_multiple_request::{WriteMultipleRequest, WriteMultipleResult};
