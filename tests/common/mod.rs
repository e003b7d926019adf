//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
#![allow(dead_code)]

use hbase_adapter::types::ColumnFamilySpec;
use hbase_adapter::{Handle, MemoryStore, PutRequest, TableRequest};
use std::error::Error;
use std::sync::Arc;

pub fn init_tracing() {
    // Set up a tracing subscriber to see output based on RUST_LOG environment setting
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_ansi(false)
        .compact()
        .try_init();
}

pub async fn memory_handle() -> Result<(Handle, MemoryStore), Box<dyn Error>> {
    init_tracing();
    let store = MemoryStore::new();
    let handle = Handle::builder()
        .store(Arc::new(store.clone()))?
        .build()
        .await?;
    Ok((handle, store))
}

/// Create `users` with family `cf` and rows r1..r5, each with `name` and `n`.
pub async fn users_table(handle: &Handle) -> Result<(), Box<dyn Error>> {
    TableRequest::new("users")
        .column_family(ColumnFamilySpec::new("cf").max_versions(3))
        .execute(handle)
        .await?;
    for i in 1..=5 {
        PutRequest::new("users", format!("r{}", i))
            .column("cf", "name", format!("user{}", i))
            .column("cf", "n", i as i64)
            .execute(handle)
            .await?;
    }
    Ok(())
}
