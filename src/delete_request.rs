//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::{ia_err, HBaseError};
use crate::handle::Handle;
use crate::store::Delete;
use crate::types::TableName;
use std::result::Result;
use tracing::trace;

/// Struct used for deleting whole rows from a table.
///
/// All given rows are deleted in a single store call. Deleting a row that
/// does not exist is not an error.
#[derive(Default, Debug)]
pub struct DeleteRequest {
    pub(crate) table_name: String,
    pub(crate) row_keys: Vec<Vec<u8>>,
}

impl DeleteRequest {
    pub fn new(table_name: &str) -> DeleteRequest {
        DeleteRequest {
            table_name: table_name.to_string(),
            ..Default::default()
        }
    }

    /// Add a row to delete.
    pub fn row_key(mut self, row_key: impl AsRef<[u8]>) -> DeleteRequest {
        self.row_keys.push(row_key.as_ref().to_vec());
        self
    }

    /// Add several rows to delete.
    pub fn row_keys<K: AsRef<[u8]>>(mut self, row_keys: &[K]) -> DeleteRequest {
        for k in row_keys {
            self.row_keys.push(k.as_ref().to_vec());
        }
        self
    }

    pub async fn execute(&self, h: &Handle) -> Result<(), HBaseError> {
        let table = TableName::parse(&self.table_name)?;
        if self.row_keys.is_empty() {
            return ia_err!("delete from {} needs at least one row key", table);
        }
        if self.row_keys.iter().any(|k| k.is_empty()) {
            return ia_err!("row key must be non-empty");
        }
        let deletes: Vec<Delete> = self
            .row_keys
            .iter()
            .map(|k| Delete { row: k.clone() })
            .collect();
        let t = h.table(&table).await?;
        trace!("deleting {} row(s) from {}", deletes.len(), table);
        t.delete(&deletes).await
    }
}
