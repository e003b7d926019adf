//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::{ia_err, HBaseError};
use crate::handle::Handle;
use crate::put_request::PutRequest;
use crate::store::BatchItemResult;
use crate::types::TableName;
use std::result::Result;
use tracing::trace;

/// Struct used to write several rows of one table in a single batch call.
///
/// The table name of each added [`PutRequest`] is ignored: all rows are
/// written into the table given to [`WriteMultipleRequest::new()`].
///
/// ```no_run
/// use hbase_adapter::{PutRequest, WriteMultipleRequest};
///
/// # use hbase_adapter::Handle;
/// # #[tokio::main]
/// # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let handle = Handle::builder().build().await?;
/// let mut req = WriteMultipleRequest::new("users");
/// for i in 0..10 {
///     req = req.add(
///         PutRequest::new("users", format!("user-{:04}", i))
///             .column("info", "id", i as i64),
///     );
/// }
/// let res = req.execute(&handle).await?;
/// assert_eq!(res.results().len(), 10);
/// # Ok(())
/// # }
/// ```
#[derive(Default, Debug)]
pub struct WriteMultipleRequest {
    pub(crate) table_name: String,
    pub(crate) puts: Vec<PutRequest>,
}

/// Struct representing the result of a [`WriteMultipleRequest`] operation.
///
/// Holds one entry per row, in the order the rows were added, exactly as the
/// store reported it.
#[derive(Default, Debug)]
pub struct WriteMultipleResult {
    pub(crate) results: Vec<BatchItemResult>,
}

impl WriteMultipleResult {
    pub fn results(&self) -> &Vec<BatchItemResult> {
        &self.results
    }

    /// True if the store reported success for every row.
    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|r| r.success)
    }
}

impl WriteMultipleRequest {
    pub fn new(table_name: &str) -> WriteMultipleRequest {
        WriteMultipleRequest {
            table_name: table_name.to_string(),
            ..Default::default()
        }
    }

    /// Add a row to write.
    pub fn add(mut self, put: PutRequest) -> WriteMultipleRequest {
        self.puts.push(put);
        self
    }

    pub fn num_operations(&self) -> usize {
        self.puts.len()
    }

    pub fn clear(&mut self) {
        self.puts.clear();
    }

    pub async fn execute(&self, h: &Handle) -> Result<WriteMultipleResult, HBaseError> {
        let table = TableName::parse(&self.table_name)?;
        if self.puts.is_empty() {
            return ia_err!("batch write into {} has no rows", table);
        }
        let mut puts = Vec::with_capacity(self.puts.len());
        for p in &self.puts {
            puts.push(p.to_put()?);
        }
        let t = h.table(&table).await?;
        trace!("batch write of {} row(s) into {}", puts.len(), table);
        let results = t.batch(&puts).await?;
        Ok(WriteMultipleResult { results })
    }
}
