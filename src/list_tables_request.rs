//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::HBaseError;
use crate::handle::Handle;
use std::result::Result;
use tracing::trace;

/// Struct used for listing tables in the store.
///
/// Table names are returned sorted, as the store prints them: tables in the
/// `default` namespace without a prefix, others as `namespace:table`.
#[derive(Default, Debug)]
pub struct ListTablesRequest {
    pub(crate) namespace: String,
    pub(crate) start_index: i32,
    pub(crate) limit: i32,
}

/// Struct representing the result of a [`ListTablesRequest`] operation.
#[derive(Default, Debug)]
pub struct ListTablesResult {
    pub table_names: Vec<String>,
    /// Index to pass to [`ListTablesRequest::start_index()`] to continue a
    /// limited listing.
    pub last_table_index: i32,
}

impl ListTablesRequest {
    pub fn new() -> ListTablesRequest {
        ListTablesRequest {
            ..Default::default()
        }
    }

    /// Only list tables of this namespace. By default, tables of all
    /// namespaces are listed.
    pub fn namespace(mut self, namespace: &str) -> ListTablesRequest {
        self.namespace = namespace.to_string();
        self
    }

    /// Return at most `limit` names. Zero or less means no limit.
    pub fn limit(mut self, limit: i32) -> ListTablesRequest {
        self.limit = limit;
        self
    }

    /// Skip the first `start_index` names of the sorted listing.
    pub fn start_index(mut self, start_index: i32) -> ListTablesRequest {
        self.start_index = start_index;
        self
    }

    pub async fn execute(&self, h: &Handle) -> Result<ListTablesResult, HBaseError> {
        let admin = h.admin().await?;
        let ns = if self.namespace.is_empty() {
            None
        } else {
            Some(self.namespace.as_str())
        };
        let mut names: Vec<String> = admin
            .list_table_names(ns)
            .await?
            .iter()
            .map(|t| t.to_string())
            .collect();
        names.sort();
        trace!("store returned {} table names", names.len());
        let start = self.start_index.max(0) as usize;
        let mut table_names: Vec<String> = names.into_iter().skip(start).collect();
        if self.limit > 0 {
            table_names.truncate(self.limit as usize);
        }
        let last_table_index = i32::try_from(start + table_names.len()).unwrap_or(i32::MAX);
        Ok(ListTablesResult {
            table_names,
            last_table_index,
        })
    }
}
