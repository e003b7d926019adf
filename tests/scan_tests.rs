//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
mod common;

use hbase_adapter::codec::DATA_CONVERSION_EXCEPTION;
use hbase_adapter::types::{ColumnFamilySpec, VersionPolicy};
use hbase_adapter::{
    CompareOp, Comparator, HBaseErrorCode, ListQualifiersRequest, PageCursor, PutRequest,
    RowCountRequest, ScanFilter, ScanPageRequest, TableRequest,
};
use std::error::Error;
use std::result::Result;

fn keys(cursor: &PageCursor) -> Vec<String> {
    cursor.rows().iter().map(|r| r.key_str()).collect()
}

#[tokio::test]
async fn paged_scan_visits_every_row_once() -> Result<(), Box<dyn Error>> {
    let (handle, store) = common::memory_handle().await?;
    common::users_table(&handle).await?;

    let mut cursor = PageCursor::new("users", 2);
    let mut pages: Vec<Vec<String>> = Vec::new();
    loop {
        cursor = ScanPageRequest::new("users")
            .cursor(cursor)
            .execute(&handle)
            .await?;
        if cursor.rows().is_empty() {
            break;
        }
        pages.push(keys(&cursor));
    }
    assert_eq!(
        pages,
        vec![
            vec!["r1".to_string(), "r2".to_string()],
            vec!["r3".to_string(), "r4".to_string()],
            vec!["r5".to_string()],
        ]
    );
    assert_eq!(cursor.page_index(), 4);
    assert_eq!(cursor.start_key(), Some(&b"r5"[..]));
    assert_eq!(store.open_handles(), 0);
    Ok(())
}

#[tokio::test]
async fn paged_scan_moves_start_key_to_last_row() -> Result<(), Box<dyn Error>> {
    let (handle, _store) = common::memory_handle().await?;
    TableRequest::new("t1")
        .column_families(&["cf"])
        .execute(&handle)
        .await?;
    for k in ["r3", "r1", "r5", "r2", "r4"] {
        PutRequest::new("t1", k)
            .column("cf", "q", k)
            .execute(&handle)
            .await?;
    }

    let cursor = ScanPageRequest::new("t1")
        .page_size(2)
        .first_page(true)
        .execute(&handle)
        .await?;
    assert_eq!(keys(&cursor), vec!["r1", "r2"]);
    assert_eq!(cursor.start_key(), Some(&b"r2"[..]));

    let cursor = ScanPageRequest::new("t1")
        .first_page(false)
        .cursor(cursor)
        .execute(&handle)
        .await?;
    assert_eq!(keys(&cursor), vec!["r3", "r4"]);
    assert_eq!(cursor.start_key(), Some(&b"r4"[..]));

    let cursor = ScanPageRequest::new("t1")
        .first_page(false)
        .cursor(cursor)
        .execute(&handle)
        .await?;
    assert_eq!(keys(&cursor), vec!["r5"]);
    assert_eq!(cursor.start_key(), Some(&b"r5"[..]));

    let cursor = ScanPageRequest::new("t1")
        .first_page(false)
        .cursor(cursor)
        .execute(&handle)
        .await?;
    assert!(cursor.rows().is_empty());
    Ok(())
}

#[tokio::test]
async fn first_page_is_repeatable() -> Result<(), Box<dyn Error>> {
    let (handle, _store) = common::memory_handle().await?;
    common::users_table(&handle).await?;
    let a = ScanPageRequest::new("users")
        .page_size(3)
        .first_page(true)
        .execute(&handle)
        .await?;
    let b = ScanPageRequest::new("users")
        .page_size(3)
        .first_page(true)
        .execute(&handle)
        .await?;
    assert_eq!(a.rows(), b.rows());
    assert_eq!(keys(&a), vec!["r1", "r2", "r3"]);
    Ok(())
}

#[tokio::test]
async fn paged_scan_honors_start_and_end_keys() -> Result<(), Box<dyn Error>> {
    let (handle, _store) = common::memory_handle().await?;
    common::users_table(&handle).await?;

    let cursor = ScanPageRequest::new("users")
        .start_key("r2")
        .end_key("r4")
        .page_size(10)
        .execute(&handle)
        .await?;
    assert_eq!(keys(&cursor), vec!["r2", "r3"]);
    assert_eq!(cursor.end_key(), Some(&b"r4"[..]));

    // the stop key carried by the cursor bounds the next page too
    let cursor = ScanPageRequest::new("users")
        .end_key("r4")
        .cursor(cursor)
        .execute(&handle)
        .await?;
    assert!(cursor.rows().is_empty());
    Ok(())
}

#[tokio::test]
async fn empty_table_returns_cursor_unchanged() -> Result<(), Box<dyn Error>> {
    let (handle, _store) = common::memory_handle().await?;
    TableRequest::new("empty")
        .column_families(&["cf"])
        .execute(&handle)
        .await?;
    let cursor = ScanPageRequest::new("empty").execute(&handle).await?;
    assert!(cursor.rows().is_empty());
    assert_eq!(cursor.page_index(), 0);
    assert_eq!(cursor.start_key(), None);
    assert_eq!(cursor.page_size(), hbase_adapter::DEFAULT_PAGE_SIZE);
    Ok(())
}

#[tokio::test]
async fn filters_are_combined_with_and() -> Result<(), Box<dyn Error>> {
    let (handle, _store) = common::memory_handle().await?;
    common::users_table(&handle).await?;
    PutRequest::new("users", "x1")
        .column("cf", "name", "user3")
        .execute(&handle)
        .await?;

    let cursor = ScanPageRequest::new("users")
        .filter(ScanFilter::Prefix(b"r".to_vec()))
        .filter(ScanFilter::single_column_value(
            "cf",
            "name",
            CompareOp::Equal,
            Comparator::Binary(b"user3".to_vec()),
        ))
        .execute(&handle)
        .await?;
    assert_eq!(keys(&cursor), vec!["r3"]);

    // the first page starts at the first row passing the filters
    let cursor = ScanPageRequest::new("users")
        .filter(ScanFilter::Row {
            op: CompareOp::GreaterOrEqual,
            comparator: Comparator::Binary(b"r4".to_vec()),
        })
        .page_size(1)
        .execute(&handle)
        .await?;
    assert_eq!(keys(&cursor), vec!["r4"]);
    let cursor = ScanPageRequest::new("users")
        .filter(ScanFilter::Row {
            op: CompareOp::GreaterOrEqual,
            comparator: Comparator::Binary(b"r4".to_vec()),
        })
        .cursor(cursor)
        .execute(&handle)
        .await?;
    assert_eq!(keys(&cursor), vec!["r5"]);
    Ok(())
}

#[tokio::test]
async fn versions_and_time_range() -> Result<(), Box<dyn Error>> {
    let (handle, _store) = common::memory_handle().await?;
    TableRequest::new("hist")
        .column_family(ColumnFamilySpec::new("cf").max_versions(3))
        .execute(&handle)
        .await?;
    for (ts, v) in [(100, "v1"), (200, "v2"), (300, "v3"), (400, "v4")] {
        PutRequest::new("hist", "k")
            .column_at("cf", "q", v, ts)
            .execute(&handle)
            .await?;
    }

    let cursor = ScanPageRequest::new("hist").execute(&handle).await?;
    let row = &cursor.rows()[0];
    assert_eq!(row.cell_count(), 1);
    assert_eq!(row.value("cf", "q"), Some("v4"));

    // only three versions are retained
    let cursor = ScanPageRequest::new("hist")
        .versions(VersionPolicy::All)
        .execute(&handle)
        .await?;
    let values: Vec<&str> = cursor.rows()[0]
        .versions("cf", "q")
        .iter()
        .map(|v| v.value())
        .collect();
    assert_eq!(values, vec!["v4", "v3", "v2"]);

    let cursor = ScanPageRequest::new("hist")
        .versions(VersionPolicy::Exactly(1))
        .execute(&handle)
        .await?;
    assert_eq!(cursor.rows()[0].cell_count(), 1);

    let cursor = ScanPageRequest::new("hist")
        .max_versions(2)
        .execute(&handle)
        .await?;
    assert_eq!(cursor.rows()[0].cell_count(), 2);

    let cursor = ScanPageRequest::new("hist")
        .versions(VersionPolicy::All)
        .cursor(PageCursor::new("hist", 5).time_range(200, 300))
        .execute(&handle)
        .await?;
    assert_eq!(cursor.rows()[0].value("cf", "q"), Some("v2"));
    assert_eq!(cursor.rows()[0].cell_count(), 1);

    // a range with a zero bound is ignored
    let cursor = ScanPageRequest::new("hist")
        .cursor(PageCursor::new("hist", 5).time_range(0, 300))
        .execute(&handle)
        .await?;
    assert_eq!(cursor.rows()[0].value("cf", "q"), Some("v4"));
    Ok(())
}

#[tokio::test]
async fn type_map_decodes_values() -> Result<(), Box<dyn Error>> {
    let (handle, _store) = common::memory_handle().await?;
    common::users_table(&handle).await?;
    PutRequest::new("users", "r1")
        .column("cf", "bad", "abc")
        .column("cf", "ok", true)
        .column("cf", "i", "xy")
        .execute(&handle)
        .await?;

    let cursor = ScanPageRequest::new("users")
        .column_type("cf", "n", "long")
        .column_type("cf", "bad", "long")
        .column_type("cf", "ok", "boolean")
        .column_type("cf", "i", "int")
        .page_size(2)
        .execute(&handle)
        .await?;
    let row = &cursor.rows()[0];
    assert_eq!(row.value("cf", "n"), Some("1"));
    assert_eq!(row.value("cf", "name"), Some("user1"));
    assert_eq!(row.value("cf", "bad"), Some(DATA_CONVERSION_EXCEPTION));
    assert_eq!(row.value("cf", "ok"), Some("true"));
    assert_eq!(row.value("cf", "i"), Some(DATA_CONVERSION_EXCEPTION));
    // the rest of the page is unaffected
    assert_eq!(cursor.rows().len(), 2);
    assert_eq!(cursor.rows()[1].value("cf", "n"), Some("2"));
    Ok(())
}

#[tokio::test]
async fn scan_argument_errors() -> Result<(), Box<dyn Error>> {
    let (handle, store) = common::memory_handle().await?;
    common::users_table(&handle).await?;

    let err = ScanPageRequest::new("users")
        .page_size(0)
        .execute(&handle)
        .await
        .unwrap_err();
    assert_eq!(err.code, HBaseErrorCode::IllegalArgument);

    let err = ScanPageRequest::new("users")
        .cursor(PageCursor::new("other", 2))
        .execute(&handle)
        .await
        .unwrap_err();
    assert_eq!(err.code, HBaseErrorCode::IllegalArgument);

    let err = ScanPageRequest::new("missing")
        .execute(&handle)
        .await
        .unwrap_err();
    assert_eq!(err.code, HBaseErrorCode::TableNotFound);
    assert_eq!(store.open_handles(), 0);
    Ok(())
}

#[tokio::test]
async fn unbounded_page_size() -> Result<(), Box<dyn Error>> {
    let (handle, _store) = common::memory_handle().await?;
    common::users_table(&handle).await?;

    let cursor = ScanPageRequest::new("users")
        .page_size(usize::MAX)
        .execute(&handle)
        .await?;
    assert_eq!(keys(&cursor), vec!["r1", "r2", "r3", "r4", "r5"]);

    // a later page re-reads its start row, which must not overflow the count
    let cursor = ScanPageRequest::new("users")
        .page_size(usize::MAX)
        .start_key("r2")
        .first_page(false)
        .execute(&handle)
        .await?;
    assert_eq!(keys(&cursor), vec!["r3", "r4", "r5"]);

    let cursor = ScanPageRequest::new("users")
        .first_page(false)
        .cursor(cursor)
        .execute(&handle)
        .await?;
    assert!(cursor.rows().is_empty());
    Ok(())
}

#[tokio::test]
async fn page_size_must_match_cursor() -> Result<(), Box<dyn Error>> {
    let (handle, _store) = common::memory_handle().await?;
    common::users_table(&handle).await?;

    let cursor = ScanPageRequest::new("users")
        .page_size(2)
        .execute(&handle)
        .await?;
    let err = ScanPageRequest::new("users")
        .page_size(3)
        .cursor(cursor.clone())
        .execute(&handle)
        .await
        .unwrap_err();
    assert_eq!(err.code, HBaseErrorCode::IllegalArgument);

    let cursor = ScanPageRequest::new("users")
        .page_size(2)
        .cursor(cursor)
        .execute(&handle)
        .await?;
    assert_eq!(keys(&cursor), vec!["r3", "r4"]);
    Ok(())
}

#[tokio::test]
async fn row_count_and_qualifiers() -> Result<(), Box<dyn Error>> {
    let (handle, _store) = common::memory_handle().await?;
    common::users_table(&handle).await?;

    assert_eq!(RowCountRequest::new("users").execute(&handle).await?, 5);

    let quals = ListQualifiersRequest::new("users").execute(&handle).await?;
    let names: Vec<String> = quals.iter().map(|q| q.type_map_key()).collect();
    assert_eq!(names, vec!["cf.n", "cf.name"]);
    assert!(quals.iter().all(|q| q.display_type == "string"));
    Ok(())
}
