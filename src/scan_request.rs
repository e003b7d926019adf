//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Paged range scans.
//!
//! A [`PageCursor`] carries the position of a paged scan between calls to
//! [`ScanPageRequest::execute()`]. Each call returns the next page of decoded
//! [`Row`]s and an updated cursor:
//! ```no_run
//! use hbase_adapter::{PageCursor, ScanPageRequest};
//! # use hbase_adapter::Handle;
//! # #[tokio::main]
//! # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let handle = Handle::builder().build().await?;
//! let mut cursor = PageCursor::new("users", 20);
//! loop {
//!     cursor = ScanPageRequest::new("users")
//!         .cursor(cursor)
//!         .execute(&handle)
//!         .await?;
//!     if cursor.rows().is_empty() {
//!         break;
//!     }
//!     for row in cursor.rows() {
//!         println!("{}", row);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::{BTreeSet, HashMap};
use std::result::Result;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::codec::decode_cell;
use crate::error::{ia_err, HBaseError};
use crate::filter::ScanFilter;
use crate::handle::Handle;
use crate::store::{Scan, ScanResult};
use crate::types::{ColumnQualifier, Row, TableName, VersionPolicy};

/// Page size used when a scan is started without a cursor.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Position and contents of a paged scan.
///
/// The cursor is owned by the caller and passed back into the next
/// [`ScanPageRequest`]. Its rows are replaced on every fetch.
#[derive(Default, Debug, Clone)]
pub struct PageCursor {
    pub(crate) table_name: String,
    pub(crate) page_index: u32,
    pub(crate) page_size: usize,
    pub(crate) start_key: Option<Vec<u8>>,
    pub(crate) end_key: Option<Vec<u8>>,
    pub(crate) min_timestamp: i64,
    pub(crate) max_timestamp: i64,
    pub(crate) rows: Vec<Row>,
    pub(crate) scan_time: Duration,
    pub(crate) assemble_time: Duration,
}

impl PageCursor {
    /// Create a cursor positioned before the first page.
    pub fn new(table_name: &str, page_size: usize) -> PageCursor {
        PageCursor {
            table_name: table_name.to_string(),
            page_size,
            ..Default::default()
        }
    }

    /// Only return cell versions with timestamps in `[min, max)`.
    ///
    /// The range is ignored unless both bounds are non-zero.
    pub fn time_range(mut self, min_timestamp: i64, max_timestamp: i64) -> PageCursor {
        self.min_timestamp = min_timestamp;
        self.max_timestamp = max_timestamp;
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Number of pages fetched so far.
    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Row key the next page is read from (inclusive).
    pub fn start_key(&self) -> Option<&[u8]> {
        self.start_key.as_deref()
    }

    /// Row key the scan stops at (exclusive).
    pub fn end_key(&self) -> Option<&[u8]> {
        self.end_key.as_deref()
    }

    pub fn min_timestamp(&self) -> i64 {
        self.min_timestamp
    }

    pub fn max_timestamp(&self) -> i64 {
        self.max_timestamp
    }

    /// Rows of the most recently fetched page.
    pub fn rows(&self) -> &Vec<Row> {
        &self.rows
    }

    /// Move the rows of the most recently fetched page out of the cursor.
    pub fn take_rows(&mut self) -> Vec<Row> {
        std::mem::take(&mut self.rows)
    }

    /// Time spent in the store scan of the last fetch.
    pub fn scan_time(&self) -> Duration {
        self.scan_time
    }

    /// Time spent decoding the rows of the last fetch.
    pub fn assemble_time(&self) -> Duration {
        self.assemble_time
    }
}

/// Struct used to fetch one page of a filtered range scan.
///
/// Rows are returned in row-key order. Successive pages never repeat or skip
/// a row, provided the caller marks only the first fetch as the first page
/// and feeds the returned cursor into the next request.
///
/// Filters given with [`filter()`](ScanPageRequest::filter()) are combined
/// with AND semantics. Cell values are decoded for display using the
/// [`type_map()`](ScanPageRequest::type_map()); see
/// [`decode_display_value()`](crate::codec::decode_display_value()).
#[derive(Default, Debug)]
pub struct ScanPageRequest {
    pub(crate) table_name: String,
    pub(crate) start_key: Option<Vec<u8>>,
    pub(crate) end_key: Option<Vec<u8>>,
    pub(crate) filters: Vec<ScanFilter>,
    pub(crate) versions: VersionPolicy,
    pub(crate) page_size: Option<usize>,
    pub(crate) first_page: Option<bool>,
    pub(crate) type_map: HashMap<String, String>,
    pub(crate) cursor: Option<PageCursor>,
}

impl ScanPageRequest {
    pub fn new(table_name: &str) -> ScanPageRequest {
        ScanPageRequest {
            table_name: table_name.to_string(),
            ..Default::default()
        }
    }

    /// Row key to start the scan at (inclusive), used when the cursor has no
    /// position yet. Without it, the scan starts at the first row that
    /// passes the filters.
    pub fn start_key(mut self, key: impl AsRef<[u8]>) -> ScanPageRequest {
        self.start_key = Some(key.as_ref().to_vec());
        self
    }

    /// Row key to stop the scan at (exclusive).
    pub fn end_key(mut self, key: impl AsRef<[u8]>) -> ScanPageRequest {
        self.end_key = Some(key.as_ref().to_vec());
        self
    }

    /// Add a filter. All filters must pass for a row to be returned.
    pub fn filter(mut self, filter: ScanFilter) -> ScanPageRequest {
        self.filters.push(filter);
        self
    }

    pub fn filters(mut self, filters: Vec<ScanFilter>) -> ScanPageRequest {
        self.filters.extend(filters);
        self
    }

    pub fn versions(mut self, versions: VersionPolicy) -> ScanPageRequest {
        self.versions = versions;
        self
    }

    /// Set the version policy from an integer: zero or less returns only the
    /// newest version, `i32::MAX` returns every version.
    pub fn max_versions(mut self, max_versions: i32) -> ScanPageRequest {
        self.versions = VersionPolicy::from_max_versions(max_versions);
        self
    }

    /// Page size of the cursor created when no cursor is given.
    ///
    /// A continued scan keeps the page size of its cursor: setting a
    /// different size together with [`cursor()`](ScanPageRequest::cursor())
    /// is an [`IllegalArgument`](crate::HBaseErrorCode::IllegalArgument)
    /// error.
    pub fn page_size(mut self, page_size: usize) -> ScanPageRequest {
        self.page_size = Some(page_size);
        self
    }

    /// Whether this is the first page of the scan.
    ///
    /// If not set, a cursor that has not fetched any page yet is treated as
    /// the first page.
    pub fn first_page(mut self, first_page: bool) -> ScanPageRequest {
        self.first_page = Some(first_page);
        self
    }

    /// Display types of columns, keyed `"family.qualifier"`.
    pub fn type_map(mut self, type_map: HashMap<String, String>) -> ScanPageRequest {
        self.type_map = type_map;
        self
    }

    /// Add one display type for the given column.
    pub fn column_type(mut self, family: &str, qualifier: &str, display_type: &str) -> ScanPageRequest {
        self.type_map
            .insert(format!("{}.{}", family, qualifier), display_type.to_string());
        self
    }

    /// Continue from the given cursor.
    pub fn cursor(mut self, cursor: PageCursor) -> ScanPageRequest {
        self.cursor = Some(cursor);
        self
    }

    fn combined_filter(&self) -> Option<ScanFilter> {
        if self.filters.is_empty() {
            return None;
        }
        Some(ScanFilter::all(self.filters.clone()))
    }

    /// Fetch the next page.
    ///
    /// The returned cursor holds the rows of this page, its page index is
    /// incremented and its start key is moved to the last row returned. If
    /// the table holds no row passing the filters, the cursor is returned
    /// with no rows and its position unchanged.
    pub async fn execute(&self, h: &Handle) -> Result<PageCursor, HBaseError> {
        let table = TableName::parse(&self.table_name)?;
        let mut cursor = match &self.cursor {
            Some(c) => {
                if TableName::parse(&c.table_name)? != table {
                    return ia_err!(
                        "cursor of table '{}' used to scan table '{}'",
                        c.table_name,
                        self.table_name
                    );
                }
                if let Some(ps) = self.page_size {
                    if ps != c.page_size {
                        return ia_err!(
                            "page size {} differs from the cursor page size {}",
                            ps,
                            c.page_size
                        );
                    }
                }
                c.clone()
            }
            None => PageCursor::new(
                &self.table_name,
                self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            ),
        };
        if cursor.page_size == 0 {
            return ia_err!("page size must be at least 1");
        }
        let first_page = self.first_page.unwrap_or(cursor.page_index == 0);
        cursor.rows.clear();
        cursor.scan_time = Duration::ZERO;
        cursor.assemble_time = Duration::ZERO;

        let t = h.table(&table).await?;

        if cursor.start_key.is_none() && self.start_key.is_some() {
            cursor.start_key = self.start_key.clone();
        }
        if cursor.start_key.is_none() {
            let probe = Scan {
                filter: self.combined_filter(),
                caching: 1,
                limit: Some(1),
                ..Default::default()
            };
            let first = t.scan(&probe).await?;
            match first.into_iter().next() {
                Some(r) if !r.is_empty() => {
                    trace!("scan of {} starts at first row", table);
                    cursor.start_key = Some(r.row);
                }
                _ => {
                    debug!("no row of {} passes the filters", table);
                    return Ok(cursor);
                }
            }
        }

        // a non-first page re-reads the last row of the previous page
        let count = if first_page {
            cursor.page_size
        } else {
            cursor.page_size.saturating_add(1)
        };
        let page = ScanFilter::Page(count as u64);
        let filter = if self.filters.is_empty() {
            page
        } else {
            let mut fs = self.filters.clone();
            fs.push(page);
            ScanFilter::all(fs)
        };
        let time_range = if cursor.min_timestamp != 0 && cursor.max_timestamp != 0 {
            Some((cursor.min_timestamp, cursor.max_timestamp))
        } else {
            None
        };
        let stop_row = match &cursor.end_key {
            Some(k) => Some(k.clone()),
            None => self.end_key.clone(),
        };
        let scan = Scan {
            start_row: cursor.start_key.clone(),
            stop_row,
            time_range,
            max_versions: self.versions.max_versions(),
            filter: Some(filter),
            caching: h.scanner_caching(),
            limit: Some(count),
        };

        let s = Instant::now();
        let results = t.scan(&scan).await?;
        cursor.scan_time = s.elapsed();
        debug!("scan time: {:?}", cursor.scan_time);

        let s = Instant::now();
        let mut last_key: Option<Vec<u8>> = None;
        for (i, rs) in results.iter().enumerate() {
            if !first_page && i == 0 {
                continue;
            }
            if rs.is_empty() {
                continue;
            }
            cursor.rows.push(self.assemble_row(rs));
            last_key = Some(rs.row.clone());
        }
        cursor.assemble_time = s.elapsed();
        debug!("assembly time: {:?}", cursor.assemble_time);

        cursor.page_index += 1;
        if let Some(k) = last_key {
            cursor.start_key = Some(k);
            cursor.end_key = self.end_key.clone();
        }
        trace!(
            "page {} of {}: {} row(s)",
            cursor.page_index,
            table,
            cursor.rows.len()
        );
        Ok(cursor)
    }

    fn assemble_row(&self, rs: &ScanResult) -> Row {
        let mut row = Row::new(&rs.row);
        for c in &rs.cells {
            let tag = if self.type_map.is_empty() {
                None
            } else {
                let key = format!(
                    "{}.{}",
                    String::from_utf8_lossy(&c.family),
                    String::from_utf8_lossy(&c.qualifier)
                );
                self.type_map.get(&key).map(|s| s.as_str())
            };
            let (family, qv) = decode_cell(&c.family, &c.qualifier, c.timestamp, &c.value, tag);
            row.add(&family, qv);
        }
        row
    }
}

/// Struct used to discover the columns of a table.
///
/// Only the first row of the table is sampled, with all of its versions, so
/// columns that row lacks are not reported. Every discovered column has the
/// display type `"string"`.
#[derive(Default, Debug)]
pub struct ListQualifiersRequest {
    pub(crate) table_name: String,
}

impl ListQualifiersRequest {
    pub fn new(table_name: &str) -> ListQualifiersRequest {
        ListQualifiersRequest {
            table_name: table_name.to_string(),
        }
    }

    pub async fn execute(&self, h: &Handle) -> Result<BTreeSet<ColumnQualifier>, HBaseError> {
        let cursor = ScanPageRequest::new(&self.table_name)
            .page_size(1)
            .versions(VersionPolicy::All)
            .first_page(true)
            .execute(h)
            .await?;
        let mut set = BTreeSet::new();
        for row in cursor.rows() {
            for (family, cols) in row.families() {
                for qv in cols {
                    set.insert(ColumnQualifier::new(family, qv.qualifier()));
                }
            }
        }
        Ok(set)
    }
}

/// Struct used to count the rows of a table.
///
/// This scans the whole table, returning only the first cell of each row.
#[derive(Default, Debug)]
pub struct RowCountRequest {
    pub(crate) table_name: String,
}

impl RowCountRequest {
    pub fn new(table_name: &str) -> RowCountRequest {
        RowCountRequest {
            table_name: table_name.to_string(),
        }
    }

    pub async fn execute(&self, h: &Handle) -> Result<u64, HBaseError> {
        let table = TableName::parse(&self.table_name)?;
        let t = h.table(&table).await?;
        let scan = Scan {
            filter: Some(ScanFilter::FirstKeyOnly),
            caching: h.scanner_caching(),
            ..Default::default()
        };
        let results = t.scan(&scan).await?;
        let count: u64 = results.iter().map(|r| r.size() as u64).sum();
        trace!("{} has {} row(s)", table, count);
        Ok(count)
    }
}
