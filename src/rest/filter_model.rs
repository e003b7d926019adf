//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use base64::prelude::{Engine as _, BASE64_STANDARD};
use serde_json::{json, Value};

use crate::filter::{Comparator, ListOperator, ScanFilter};

fn b64(b: &[u8]) -> String {
    BASE64_STANDARD.encode(b)
}

fn comparator_to_json(c: &Comparator) -> Value {
    match c {
        Comparator::Binary(b) => json!({"type": "BinaryComparator", "value": b64(b)}),
        Comparator::BinaryPrefix(b) => json!({"type": "BinaryPrefixComparator", "value": b64(b)}),
        // matching comparators carry plain text
        Comparator::Substring(s) => json!({"type": "SubstringComparator", "value": s}),
        Comparator::Regex(re) => json!({"type": "RegexStringComparator", "value": re.as_str()}),
        Comparator::Null => json!({"type": "NullComparator"}),
    }
}

/// The gateway's JSON representation of a filter.
pub(crate) fn filter_to_json(f: &ScanFilter) -> Value {
    match f {
        ScanFilter::Page(n) => json!({"type": "PageFilter", "value": n.to_string()}),
        ScanFilter::FirstKeyOnly => json!({"type": "FirstKeyOnlyFilter"}),
        ScanFilter::KeyOnly => json!({"type": "KeyOnlyFilter"}),
        ScanFilter::Prefix(p) => json!({"type": "PrefixFilter", "value": b64(p)}),
        ScanFilter::ColumnPrefix(p) => json!({"type": "ColumnPrefixFilter", "value": b64(p)}),
        ScanFilter::InclusiveStop(k) => json!({"type": "InclusiveStopFilter", "value": b64(k)}),
        ScanFilter::Row { op, comparator } => compare_filter("RowFilter", op.as_str(), comparator),
        ScanFilter::Family { op, comparator } => {
            compare_filter("FamilyFilter", op.as_str(), comparator)
        }
        ScanFilter::Qualifier { op, comparator } => {
            compare_filter("QualifierFilter", op.as_str(), comparator)
        }
        ScanFilter::Value { op, comparator } => {
            compare_filter("ValueFilter", op.as_str(), comparator)
        }
        ScanFilter::SingleColumnValue {
            family,
            qualifier,
            op,
            comparator,
            filter_if_missing,
            latest_version_only,
        } => json!({
            "type": "SingleColumnValueFilter",
            "op": op.as_str(),
            "family": b64(family),
            "qualifier": b64(qualifier),
            "ifMissing": filter_if_missing,
            "latestVersion": latest_version_only,
            "comparator": comparator_to_json(comparator),
        }),
        ScanFilter::Timestamps(ts) => json!({"type": "TimestampsFilter", "timestamps": ts}),
        ScanFilter::List { operator, filters } => {
            let op = match operator {
                ListOperator::MustPassAll => "MUST_PASS_ALL",
                ListOperator::MustPassOne => "MUST_PASS_ONE",
            };
            let fs: Vec<Value> = filters.iter().map(filter_to_json).collect();
            json!({"type": "FilterList", "op": op, "filters": fs})
        }
    }
}

fn compare_filter(kind: &str, op: &str, comparator: &Comparator) -> Value {
    json!({
        "type": kind,
        "op": op,
        "comparator": comparator_to_json(comparator),
    })
}
