//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::{ia_err, HBaseError};
use crate::handle::Handle;
use std::result::Result;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq)]
enum NamespaceOp {
    Create,
    Drop,
}

/// Struct used for creating or dropping a namespace.
///
/// Example:
/// ```no_run
/// use hbase_adapter::{NamespaceRequest, TableRequest};
/// # use hbase_adapter::Handle;
/// # #[tokio::main]
/// # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let handle = Handle::builder().build().await?;
///     NamespaceRequest::create("metrics").execute(&handle).await?;
///     TableRequest::new("metrics:daily")
///         .column_families(&["d"])
///         .execute(&handle)
///         .await?;
/// # Ok(())
/// # }
///```
#[derive(Debug)]
pub struct NamespaceRequest {
    pub(crate) namespace: String,
    op: NamespaceOp,
}

impl NamespaceRequest {
    /// Create a namespace. Fails with
    /// [`NamespaceExists`](crate::HBaseErrorCode::NamespaceExists) if it exists.
    pub fn create(namespace: &str) -> NamespaceRequest {
        NamespaceRequest {
            namespace: namespace.to_string(),
            op: NamespaceOp::Create,
        }
    }

    /// Drop a namespace. The store refuses to drop a namespace that still
    /// holds tables.
    pub fn drop(namespace: &str) -> NamespaceRequest {
        NamespaceRequest {
            namespace: namespace.to_string(),
            op: NamespaceOp::Drop,
        }
    }

    pub async fn execute(&self, h: &Handle) -> Result<(), HBaseError> {
        if self.namespace.is_empty() {
            return ia_err!("namespace name must be non-empty");
        }
        if self.namespace.contains(':') {
            return ia_err!("invalid namespace name '{}'", self.namespace);
        }
        let admin = h.admin().await?;
        trace!("{:?} namespace {}", self.op, self.namespace);
        match self.op {
            NamespaceOp::Create => admin.create_namespace(&self.namespace).await,
            NamespaceOp::Drop => admin.delete_namespace(&self.namespace).await,
        }
    }
}

/// Struct used for listing the namespaces of the store.
#[derive(Default, Debug)]
pub struct ListNamespacesRequest {}

impl ListNamespacesRequest {
    pub fn new() -> ListNamespacesRequest {
        ListNamespacesRequest {}
    }

    pub async fn execute(&self, h: &Handle) -> Result<Vec<String>, HBaseError> {
        let admin = h.admin().await?;
        let mut names = admin.list_namespaces().await?;
        names.sort();
        Ok(names)
    }
}
