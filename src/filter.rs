//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Scan filters.
//!
//! [`ScanFilter`] is a closed set of the predicates understood by the store.
//! Several filters given to a scan are combined with AND semantics into a
//! single [`ScanFilter::List`].

use regex::Regex;
use std::cmp::Ordering;
use std::result::Result;

use crate::error::ia_err;
use crate::error::HBaseError;
use crate::store::Cell;

/// Comparison applied between a stored value and a [`Comparator`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompareOp {
    Less,
    LessOrEqual,
    Equal,
    NotEqual,
    GreaterOrEqual,
    Greater,
    NoOp,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Less => "LESS",
            CompareOp::LessOrEqual => "LESS_OR_EQUAL",
            CompareOp::Equal => "EQUAL",
            CompareOp::NotEqual => "NOT_EQUAL",
            CompareOp::GreaterOrEqual => "GREATER_OR_EQUAL",
            CompareOp::Greater => "GREATER",
            CompareOp::NoOp => "NO_OP",
        }
    }

    // `ord` is the stored value relative to the comparator's value.
    pub(crate) fn matches(&self, ord: Ordering) -> bool {
        match self {
            CompareOp::Less => ord == Ordering::Less,
            CompareOp::LessOrEqual => ord != Ordering::Greater,
            CompareOp::Equal => ord == Ordering::Equal,
            CompareOp::NotEqual => ord != Ordering::Equal,
            CompareOp::GreaterOrEqual => ord != Ordering::Less,
            CompareOp::Greater => ord == Ordering::Greater,
            CompareOp::NoOp => false,
        }
    }
}

/// A compiled regular expression held by [`Comparator::Regex`].
///
/// Only built through [`Comparator::regex()`] or [`RegexPattern::new()`], so
/// the pattern is always valid.
#[derive(Clone, Debug)]
pub struct RegexPattern(Regex);

impl RegexPattern {
    pub fn new(pattern: &str) -> Result<RegexPattern, HBaseError> {
        match Regex::new(pattern) {
            Ok(re) => Ok(RegexPattern(re)),
            Err(e) => ia_err!("invalid regex '{}': {}", pattern, e.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub(crate) fn is_match(&self, value: &[u8]) -> bool {
        self.0.is_match(&String::from_utf8_lossy(value))
    }
}

impl PartialEq for RegexPattern {
    fn eq(&self, other: &RegexPattern) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for RegexPattern {}

/// The value side of a comparison filter.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Comparator {
    /// Lexicographic byte comparison.
    Binary(Vec<u8>),
    /// Lexicographic comparison against the first `len` bytes of the stored value.
    BinaryPrefix(Vec<u8>),
    /// Case-insensitive substring match. Only `Equal` and `NotEqual` are meaningful.
    Substring(String),
    /// Regular expression match. Only `Equal` and `NotEqual` are meaningful.
    Regex(RegexPattern),
    /// Matches empty values.
    Null,
}

impl Comparator {
    /// Create a regex comparator, validating the pattern.
    pub fn regex(pattern: &str) -> Result<Comparator, HBaseError> {
        Ok(Comparator::Regex(RegexPattern::new(pattern)?))
    }

    // Ordering of `value` relative to this comparator. Matching comparators
    // (substring, regex, null) report Equal on match and Greater otherwise.
    pub(crate) fn compare(&self, value: &[u8]) -> Ordering {
        match self {
            Comparator::Binary(b) => value.cmp(b.as_slice()),
            Comparator::BinaryPrefix(b) => {
                let n = b.len().min(value.len());
                value[..n].cmp(b.as_slice())
            }
            Comparator::Substring(s) => {
                let v = String::from_utf8_lossy(value).to_lowercase();
                if v.contains(&s.to_lowercase()) {
                    Ordering::Equal
                } else {
                    Ordering::Greater
                }
            }
            Comparator::Regex(re) => {
                if re.is_match(value) {
                    Ordering::Equal
                } else {
                    Ordering::Greater
                }
            }
            Comparator::Null => {
                if value.is_empty() {
                    Ordering::Equal
                } else {
                    Ordering::Greater
                }
            }
        }
    }
}

/// How the members of a [`ScanFilter::List`] are combined.
#[derive(Clone, Copy, Default, Debug, Eq, PartialEq)]
pub enum ListOperator {
    /// AND
    #[default]
    MustPassAll,
    /// OR
    MustPassOne,
}

/// A filter predicate evaluated by the store during a scan.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScanFilter {
    /// Return at most this many rows.
    Page(u64),
    /// Return only the first cell of each row.
    FirstKeyOnly,
    /// Return cells with empty values.
    KeyOnly,
    /// Rows whose key starts with the given bytes.
    Prefix(Vec<u8>),
    /// Cells whose qualifier starts with the given bytes.
    ColumnPrefix(Vec<u8>),
    /// Rows up to and including the given key.
    InclusiveStop(Vec<u8>),
    /// Rows whose key compares as given.
    Row { op: CompareOp, comparator: Comparator },
    /// Cells whose family compares as given.
    Family { op: CompareOp, comparator: Comparator },
    /// Cells whose qualifier compares as given.
    Qualifier { op: CompareOp, comparator: Comparator },
    /// Cells whose value compares as given.
    Value { op: CompareOp, comparator: Comparator },
    /// Rows whose value in one column compares as given.
    SingleColumnValue {
        family: Vec<u8>,
        qualifier: Vec<u8>,
        op: CompareOp,
        comparator: Comparator,
        /// Drop rows that do not have the column at all.
        filter_if_missing: bool,
        /// Test only the newest version of the column.
        latest_version_only: bool,
    },
    /// Cells with one of the given timestamps.
    Timestamps(Vec<i64>),
    List {
        operator: ListOperator,
        filters: Vec<ScanFilter>,
    },
}

impl ScanFilter {
    /// AND-combine the given filters.
    pub fn all(filters: Vec<ScanFilter>) -> ScanFilter {
        ScanFilter::List {
            operator: ListOperator::MustPassAll,
            filters,
        }
    }

    /// OR-combine the given filters.
    pub fn any(filters: Vec<ScanFilter>) -> ScanFilter {
        ScanFilter::List {
            operator: ListOperator::MustPassOne,
            filters,
        }
    }

    /// Single column value filter that keeps rows lacking the column.
    pub fn single_column_value(
        family: &str,
        qualifier: &str,
        op: CompareOp,
        comparator: Comparator,
    ) -> ScanFilter {
        ScanFilter::SingleColumnValue {
            family: family.as_bytes().to_vec(),
            qualifier: qualifier.as_bytes().to_vec(),
            op,
            comparator,
            filter_if_missing: false,
            latest_version_only: true,
        }
    }

    /// Apply the filter to one row. `accepted` is the number of rows the scan
    /// has already returned. Returns the surviving cells, or `None` if the row
    /// is filtered out.
    pub(crate) fn apply(&self, row: &[u8], cells: Vec<Cell>, accepted: u64) -> Option<Vec<Cell>> {
        match self {
            ScanFilter::Page(n) => {
                if accepted >= *n {
                    return None;
                }
                Some(cells)
            }
            ScanFilter::FirstKeyOnly => Some(cells.into_iter().take(1).collect()),
            ScanFilter::KeyOnly => Some(
                cells
                    .into_iter()
                    .map(|mut c| {
                        c.value.clear();
                        c
                    })
                    .collect(),
            ),
            ScanFilter::Prefix(p) => keep_row(row.starts_with(p), cells),
            ScanFilter::InclusiveStop(k) => keep_row(row <= k.as_slice(), cells),
            ScanFilter::Row { op, comparator } => keep_row(op.matches(comparator.compare(row)), cells),
            ScanFilter::ColumnPrefix(p) => {
                keep_cells(cells, |c| c.qualifier.starts_with(p))
            }
            ScanFilter::Family { op, comparator } => {
                keep_cells(cells, |c| op.matches(comparator.compare(&c.family)))
            }
            ScanFilter::Qualifier { op, comparator } => {
                keep_cells(cells, |c| op.matches(comparator.compare(&c.qualifier)))
            }
            ScanFilter::Value { op, comparator } => {
                keep_cells(cells, |c| op.matches(comparator.compare(&c.value)))
            }
            ScanFilter::Timestamps(ts) => keep_cells(cells, |c| ts.contains(&c.timestamp)),
            ScanFilter::SingleColumnValue {
                family,
                qualifier,
                op,
                comparator,
                filter_if_missing,
                latest_version_only,
            } => {
                // cells arrive newest first within a column
                let mut column = cells
                    .iter()
                    .filter(|c| &c.family == family && &c.qualifier == qualifier);
                let pass = if *latest_version_only {
                    match column.next() {
                        Some(c) => op.matches(comparator.compare(&c.value)),
                        None => !*filter_if_missing,
                    }
                } else {
                    let versions: Vec<&Cell> = column.collect();
                    if versions.is_empty() {
                        !*filter_if_missing
                    } else {
                        versions
                            .iter()
                            .any(|c| op.matches(comparator.compare(&c.value)))
                    }
                };
                keep_row(pass, cells)
            }
            ScanFilter::List { operator, filters } => match operator {
                ListOperator::MustPassAll => {
                    let mut cells = cells;
                    for f in filters {
                        cells = f.apply(row, cells, accepted)?;
                        if cells.is_empty() {
                            return None;
                        }
                    }
                    Some(cells)
                }
                ListOperator::MustPassOne => {
                    if filters.is_empty() {
                        return Some(cells);
                    }
                    let mut merged: Vec<Cell> = Vec::new();
                    let mut any = false;
                    for f in filters {
                        if let Some(kept) = f.apply(row, cells.clone(), accepted) {
                            any = true;
                            for c in kept {
                                if !merged.iter().any(|m| same_cell(m, &c)) {
                                    merged.push(c);
                                }
                            }
                        }
                    }
                    if !any {
                        return None;
                    }
                    // restore store order: family, qualifier, newest first
                    merged.sort_by(|a, b| {
                        (&a.family, &a.qualifier, b.timestamp).cmp(&(&b.family, &b.qualifier, a.timestamp))
                    });
                    Some(merged)
                }
            },
        }
    }

    /// True if the filter can never return another row once `accepted` rows
    /// have been returned.
    pub(crate) fn exhausted(&self, accepted: u64) -> bool {
        match self {
            ScanFilter::Page(n) => accepted >= *n,
            ScanFilter::List {
                operator: ListOperator::MustPassAll,
                filters,
            } => filters.iter().any(|f| f.exhausted(accepted)),
            ScanFilter::List {
                operator: ListOperator::MustPassOne,
                filters,
            } => !filters.is_empty() && filters.iter().all(|f| f.exhausted(accepted)),
            _ => false,
        }
    }
}

fn keep_row(pass: bool, cells: Vec<Cell>) -> Option<Vec<Cell>> {
    if pass {
        Some(cells)
    } else {
        None
    }
}

fn keep_cells<F: Fn(&Cell) -> bool>(cells: Vec<Cell>, f: F) -> Option<Vec<Cell>> {
    let kept: Vec<Cell> = cells.into_iter().filter(|c| f(c)).collect();
    if kept.is_empty() {
        return None;
    }
    Some(kept)
}

fn same_cell(a: &Cell, b: &Cell) -> bool {
    a.family == b.family && a.qualifier == b.qualifier && a.timestamp == b.timestamp
}
