//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::codec::ToCellBytes;
use crate::error::{ia_err, HBaseError};
use crate::handle::Handle;
use crate::store::{Put, PutCell};
use crate::types::TableName;
use std::result::Result;
use tracing::trace;

/// Struct used for writing columns of a single row into a table.
///
/// Values are encoded with [`ToCellBytes`], using the store's conventional
/// byte layout for each native type, so that they can be read back with the
/// matching display type in a [`ScanPageRequest`](crate::ScanPageRequest)
/// type map:
/// ```no_run
/// use hbase_adapter::PutRequest;
///
/// # use hbase_adapter::Handle;
/// # #[tokio::main]
/// # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let handle = Handle::builder().build().await?;
/// PutRequest::new("users", "user-0001")
///     .column("info", "name", "Jane")
///     .column("info", "age", 42i32)
///     .column("stats", "score", 97.5f64)
///     .column_at("stats", "visits", 12i64, 1700000000000)
///     .execute(&handle)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Default, Debug, Clone)]
pub struct PutRequest {
    pub(crate) table_name: String,
    pub(crate) row_key: Vec<u8>,
    pub(crate) cells: Vec<PutCell>,
}

impl PutRequest {
    /// Create a new PutRequest for the given row.
    pub fn new(table_name: &str, row_key: impl AsRef<[u8]>) -> PutRequest {
        PutRequest {
            table_name: table_name.to_string(),
            row_key: row_key.as_ref().to_vec(),
            ..Default::default()
        }
    }

    /// Add a column value. The store assigns the timestamp.
    pub fn column(mut self, family: &str, qualifier: &str, value: impl ToCellBytes) -> PutRequest {
        self.cells.push(PutCell {
            family: family.as_bytes().to_vec(),
            qualifier: qualifier.as_bytes().to_vec(),
            timestamp: None,
            value: value.to_cell_bytes(),
        });
        self
    }

    /// Add a column value with an explicit timestamp, in milliseconds since
    /// the epoch.
    pub fn column_at(
        mut self,
        family: &str,
        qualifier: &str,
        value: impl ToCellBytes,
        timestamp: i64,
    ) -> PutRequest {
        self.cells.push(PutCell {
            family: family.as_bytes().to_vec(),
            qualifier: qualifier.as_bytes().to_vec(),
            timestamp: Some(timestamp),
            value: value.to_cell_bytes(),
        });
        self
    }

    pub(crate) fn to_put(&self) -> Result<Put, HBaseError> {
        if self.row_key.is_empty() {
            return ia_err!("row key must be non-empty");
        }
        if self.cells.is_empty() {
            return ia_err!(
                "put of row '{}' must contain at least one column",
                String::from_utf8_lossy(&self.row_key)
            );
        }
        for c in &self.cells {
            if c.family.is_empty() {
                return ia_err!("column family name is missing");
            }
        }
        Ok(Put {
            row: self.row_key.clone(),
            cells: self.cells.clone(),
        })
    }

    pub async fn execute(&self, h: &Handle) -> Result<(), HBaseError> {
        let table = TableName::parse(&self.table_name)?;
        let put = self.to_put()?;
        let t = h.table(&table).await?;
        trace!("put {} cell(s) into {}", put.cells.len(), table);
        t.put(&put).await
    }
}
