//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Quickstart: create a table, write rows, page through them and clean up.
//!
//! By default this runs against the in-memory store. Set
//! `HBASE_ADAPTER_MODE=rest` and `HBASE_ADAPTER_ENDPOINT` to use a REST
//! gateway instead. Set `RUST_LOG=debug` to see scan timings.
use hbase_adapter::types::ColumnFamilySpec;
use hbase_adapter::{
    CompareOp, Comparator, DropTableRequest, Handle, HandleMode, PageCursor, PutRequest,
    RowCountRequest, ScanFilter, ScanPageRequest, TableRequest, WriteMultipleRequest,
};
use std::error::Error;

#[tokio::main]
pub async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .compact()
        .init();

    let handle = Handle::builder()
        .mode(HandleMode::InMemory)?
        .from_environment()?
        .build()
        .await?;

    TableRequest::new("quickstart")
        .column_family(ColumnFamilySpec::new("info").max_versions(3))
        .execute(&handle)
        .await?;
    println!("Created table quickstart");

    let mut batch = WriteMultipleRequest::new("quickstart");
    for i in 1..=7 {
        batch = batch.add(
            PutRequest::new("quickstart", format!("user{:03}", i))
                .column("info", "name", format!("name {}", i))
                .column("info", "age", 20 + i as i64),
        );
    }
    let res = batch.execute(&handle).await?;
    println!("Wrote {} rows", res.results().len());

    let mut cursor = PageCursor::new("quickstart", 3);
    loop {
        cursor = ScanPageRequest::new("quickstart")
            .column_type("info", "age", "long")
            .cursor(cursor)
            .execute(&handle)
            .await?;
        if cursor.rows().is_empty() {
            break;
        }
        println!(
            "Page {} (scan {:?}, assembly {:?}):",
            cursor.page_index(),
            cursor.scan_time(),
            cursor.assemble_time()
        );
        for row in cursor.rows() {
            println!("  {}", row);
        }
    }

    let older = ScanPageRequest::new("quickstart")
        .filter(ScanFilter::single_column_value(
            "info",
            "age",
            CompareOp::GreaterOrEqual,
            Comparator::Binary(25i64.to_be_bytes().to_vec()),
        ))
        .column_type("info", "age", "long")
        .execute(&handle)
        .await?;
    println!("Users aged 25 or more:");
    for row in older.rows() {
        println!("  {}", row);
    }

    let count = RowCountRequest::new("quickstart").execute(&handle).await?;
    println!("quickstart holds {} rows", count);

    DropTableRequest::new("quickstart").execute(&handle).await?;
    println!("Dropped table quickstart");
    handle.close()?;
    Ok(())
}
