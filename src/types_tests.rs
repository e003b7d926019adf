//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::HBaseErrorCode;
use crate::types::*;
use std::error::Error;
use std::result::Result;

#[test]
fn test_table_name_parse() -> Result<(), Box<dyn Error>> {
    let t = TableName::parse("users")?;
    assert_eq!(t.namespace(), "default");
    assert_eq!(t.qualifier(), "users");
    assert_eq!(t.to_string(), "users");

    let t = TableName::parse("sales:orders")?;
    assert_eq!(t.namespace(), "sales");
    assert_eq!(t.qualifier(), "orders");
    assert_eq!(t.to_string(), "sales:orders");

    assert_eq!(TableName::parse("default:users")?, TableName::parse("users")?);

    for bad in ["", "ns:", ":t", "a:b:c"] {
        let err = TableName::parse(bad).unwrap_err();
        assert_eq!(err.code, HBaseErrorCode::IllegalArgument, "{}", bad);
    }
    Ok(())
}

#[test]
fn test_compression_names() -> Result<(), Box<dyn Error>> {
    assert_eq!(Compression::from_name("gzip")?, Compression::Gz);
    assert_eq!(Compression::from_name(" snappy ")?, Compression::Snappy);
    assert_eq!(Compression::from_name("")?, Compression::None);
    assert_eq!(Compression::Zstd.as_str(), "ZSTD");
    assert!(Compression::from_name("bzip2").is_err());
    Ok(())
}

#[test]
fn test_version_policy() -> Result<(), Box<dyn Error>> {
    assert_eq!(VersionPolicy::from_max_versions(0), VersionPolicy::Latest);
    assert_eq!(VersionPolicy::from_max_versions(-3), VersionPolicy::Latest);
    assert_eq!(VersionPolicy::from_max_versions(i32::MAX), VersionPolicy::All);
    assert_eq!(VersionPolicy::from_max_versions(4), VersionPolicy::Exactly(4));
    assert_eq!(VersionPolicy::Latest.max_versions(), None);
    assert_eq!(VersionPolicy::Exactly(2).max_versions(), Some(2));
    assert_eq!(VersionPolicy::All.max_versions(), Some(i32::MAX as u32));
    Ok(())
}

#[test]
fn test_descriptor_fields() -> Result<(), Box<dyn Error>> {
    assert_eq!(DescriptorField::from_key("ttl"), Some(DescriptorField::Ttl));
    assert_eq!(
        DescriptorField::from_key("BLOCKCACHE"),
        Some(DescriptorField::BlockCache)
    );
    assert_eq!(DescriptorField::from_key("COLOR"), None);

    let mut f = ColumnFamilyDescriptor::new("cf");
    f.set(DescriptorField::Versions, "3");
    assert_eq!(f.name(), "cf");
    assert_eq!(f.get(DescriptorField::Versions), Some("3"));
    assert_eq!(f.to_string(), "{NAME => 'cf', VERSIONS => '3'}");

    let mut d = TableDescriptor::new("users");
    d.add_family(f);
    assert!(d.family("cf").is_some());
    assert!(d.family("other").is_none());
    assert_eq!(d.to_string(), "'users', {NAME => 'cf', VERSIONS => '3'}");
    Ok(())
}

#[test]
fn test_row_versions() -> Result<(), Box<dyn Error>> {
    let mut row = Row::new(b"r1");
    row.add("cf", QualifierValue::new("age", 1, "29"));
    row.add("cf", QualifierValue::new("age", 3, "30"));
    row.add("cf", QualifierValue::new("name", 2, "jane"));
    assert_eq!(row.key_str(), "r1");
    assert_eq!(row.cell_count(), 3);
    assert_eq!(row.value("cf", "age"), Some("30"));
    let ts: Vec<i64> = row
        .versions("cf", "age")
        .iter()
        .map(|v| v.timestamp())
        .collect();
    assert_eq!(ts, vec![3, 1]);
    assert_eq!(row.value("cf", "city"), None);
    assert_eq!(row.value("other", "age"), None);
    assert!(Row::new(b"r2").is_empty());
    Ok(())
}

#[test]
fn test_column_qualifier() -> Result<(), Box<dyn Error>> {
    let q = ColumnQualifier::new("cf", "age");
    assert_eq!(q.display_type, "string");
    assert_eq!(q.type_map_key(), "cf.age");
    Ok(())
}
