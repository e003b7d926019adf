//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::HBaseErrorCode;
use crate::filter::{CompareOp, Comparator, RegexPattern, ScanFilter};
use crate::store::Cell;
use std::error::Error;
use std::result::Result;

fn cell(family: &str, qualifier: &str, ts: i64, value: &str) -> Cell {
    Cell {
        row: b"r1".to_vec(),
        family: family.as_bytes().to_vec(),
        qualifier: qualifier.as_bytes().to_vec(),
        timestamp: ts,
        value: value.as_bytes().to_vec(),
    }
}

fn row_cells() -> Vec<Cell> {
    vec![
        cell("cf", "age", 3, "30"),
        cell("cf", "age", 1, "29"),
        cell("cf", "name", 2, "jane"),
    ]
}

#[test]
fn test_compare_ops() -> Result<(), Box<dyn Error>> {
    let c = Comparator::Binary(b"m".to_vec());
    assert!(CompareOp::Less.matches(c.compare(b"a")));
    assert!(!CompareOp::Less.matches(c.compare(b"m")));
    assert!(CompareOp::LessOrEqual.matches(c.compare(b"m")));
    assert!(CompareOp::Equal.matches(c.compare(b"m")));
    assert!(CompareOp::NotEqual.matches(c.compare(b"z")));
    assert!(CompareOp::GreaterOrEqual.matches(c.compare(b"z")));
    assert!(CompareOp::Greater.matches(c.compare(b"z")));
    assert!(!CompareOp::NoOp.matches(c.compare(b"m")));
    Ok(())
}

#[test]
fn test_matching_comparators() -> Result<(), Box<dyn Error>> {
    let s = Comparator::Substring("ANE".to_string());
    assert!(CompareOp::Equal.matches(s.compare(b"jane")));
    assert!(CompareOp::NotEqual.matches(s.compare(b"john")));

    let r = Comparator::regex("^j.*n$")?;
    assert!(CompareOp::Equal.matches(r.compare(b"john")));
    assert!(!CompareOp::Equal.matches(r.compare(b"jane")));

    let err = Comparator::regex("(unclosed").unwrap_err();
    assert_eq!(err.code, HBaseErrorCode::IllegalArgument);

    let p = Comparator::BinaryPrefix(b"ab".to_vec());
    assert!(CompareOp::Equal.matches(p.compare(b"abcdef")));
    assert!(CompareOp::Equal.matches(Comparator::Null.compare(b"")));
    Ok(())
}

#[test]
fn test_regex_comparator_is_compiled() -> Result<(), Box<dyn Error>> {
    let err = RegexPattern::new("(").unwrap_err();
    assert_eq!(err.code, HBaseErrorCode::IllegalArgument);

    let r = Comparator::Regex(RegexPattern::new("^r[12]$")?);
    assert_eq!(r, Comparator::regex("^r[12]$")?);
    assert_ne!(r, Comparator::regex("^r[13]$")?);
    assert!(CompareOp::NotEqual.matches(r.compare(b"r3")));
    assert!(!CompareOp::NotEqual.matches(r.compare(b"r2")));

    let f = ScanFilter::Row {
        op: CompareOp::NotEqual,
        comparator: r,
    };
    assert!(f.apply(b"r1", row_cells(), 0).is_none());
    assert!(f.apply(b"r5", row_cells(), 0).is_some());
    Ok(())
}

#[test]
fn test_row_filters() -> Result<(), Box<dyn Error>> {
    assert!(ScanFilter::Prefix(b"r".to_vec())
        .apply(b"r1", row_cells(), 0)
        .is_some());
    assert!(ScanFilter::Prefix(b"x".to_vec())
        .apply(b"r1", row_cells(), 0)
        .is_none());
    assert!(ScanFilter::InclusiveStop(b"r1".to_vec())
        .apply(b"r1", row_cells(), 0)
        .is_some());
    assert!(ScanFilter::InclusiveStop(b"r0".to_vec())
        .apply(b"r1", row_cells(), 0)
        .is_none());
    let f = ScanFilter::Row {
        op: CompareOp::GreaterOrEqual,
        comparator: Comparator::Binary(b"r2".to_vec()),
    };
    assert!(f.apply(b"r1", row_cells(), 0).is_none());
    Ok(())
}

#[test]
fn test_cell_filters() -> Result<(), Box<dyn Error>> {
    let kept = ScanFilter::FirstKeyOnly
        .apply(b"r1", row_cells(), 0)
        .unwrap_or_default();
    assert_eq!(kept.len(), 1);

    let kept = ScanFilter::KeyOnly
        .apply(b"r1", row_cells(), 0)
        .unwrap_or_default();
    assert_eq!(kept.len(), 3);
    assert!(kept.iter().all(|c| c.value.is_empty()));

    let kept = ScanFilter::ColumnPrefix(b"na".to_vec())
        .apply(b"r1", row_cells(), 0)
        .unwrap_or_default();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].qualifier, b"name".to_vec());

    let kept = ScanFilter::Timestamps(vec![1, 2])
        .apply(b"r1", row_cells(), 0)
        .unwrap_or_default();
    assert_eq!(kept.len(), 2);

    let f = ScanFilter::Value {
        op: CompareOp::Equal,
        comparator: Comparator::Binary(b"nobody".to_vec()),
    };
    assert!(f.apply(b"r1", row_cells(), 0).is_none());
    Ok(())
}

#[test]
fn test_single_column_value() -> Result<(), Box<dyn Error>> {
    let f = ScanFilter::single_column_value(
        "cf",
        "age",
        CompareOp::Equal,
        Comparator::Binary(b"30".to_vec()),
    );
    assert_eq!(f.apply(b"r1", row_cells(), 0).map(|c| c.len()), Some(3));

    // only the newest version is tested by default
    let f = ScanFilter::single_column_value(
        "cf",
        "age",
        CompareOp::Equal,
        Comparator::Binary(b"29".to_vec()),
    );
    assert!(f.apply(b"r1", row_cells(), 0).is_none());

    let f = ScanFilter::SingleColumnValue {
        family: b"cf".to_vec(),
        qualifier: b"age".to_vec(),
        op: CompareOp::Equal,
        comparator: Comparator::Binary(b"29".to_vec()),
        filter_if_missing: true,
        latest_version_only: false,
    };
    assert!(f.apply(b"r1", row_cells(), 0).is_some());

    // missing column
    let keep = ScanFilter::single_column_value(
        "cf",
        "city",
        CompareOp::Equal,
        Comparator::Binary(b"x".to_vec()),
    );
    assert!(keep.apply(b"r1", row_cells(), 0).is_some());
    let drop = ScanFilter::SingleColumnValue {
        family: b"cf".to_vec(),
        qualifier: b"city".to_vec(),
        op: CompareOp::Equal,
        comparator: Comparator::Binary(b"x".to_vec()),
        filter_if_missing: true,
        latest_version_only: true,
    };
    assert!(drop.apply(b"r1", row_cells(), 0).is_none());
    Ok(())
}

#[test]
fn test_filter_lists() -> Result<(), Box<dyn Error>> {
    let and = ScanFilter::all(vec![
        ScanFilter::Prefix(b"r".to_vec()),
        ScanFilter::ColumnPrefix(b"name".to_vec()),
    ]);
    assert_eq!(and.apply(b"r1", row_cells(), 0).map(|c| c.len()), Some(1));

    let and = ScanFilter::all(vec![
        ScanFilter::Prefix(b"r".to_vec()),
        ScanFilter::Prefix(b"x".to_vec()),
    ]);
    assert!(and.apply(b"r1", row_cells(), 0).is_none());

    let or = ScanFilter::any(vec![
        ScanFilter::Prefix(b"x".to_vec()),
        ScanFilter::ColumnPrefix(b"name".to_vec()),
    ]);
    let kept = or.apply(b"r1", row_cells(), 0).unwrap_or_default();
    assert_eq!(kept.len(), 1);

    let or = ScanFilter::any(vec![
        ScanFilter::ColumnPrefix(b"age".to_vec()),
        ScanFilter::Timestamps(vec![3, 2]),
    ]);
    // union without duplicates, in store order
    let kept = or.apply(b"r1", row_cells(), 0).unwrap_or_default();
    let ts: Vec<i64> = kept.iter().map(|c| c.timestamp).collect();
    assert_eq!(ts, vec![3, 1, 2]);
    Ok(())
}

#[test]
fn test_page_filter() -> Result<(), Box<dyn Error>> {
    let f = ScanFilter::all(vec![ScanFilter::Prefix(b"r".to_vec()), ScanFilter::Page(2)]);
    assert!(f.apply(b"r1", row_cells(), 1).is_some());
    assert!(f.apply(b"r1", row_cells(), 2).is_none());
    assert!(!f.exhausted(1));
    assert!(f.exhausted(2));

    let or = ScanFilter::any(vec![ScanFilter::Page(1), ScanFilter::Prefix(b"r".to_vec())]);
    assert!(!or.exhausted(5));
    Ok(())
}
