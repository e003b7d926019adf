//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::codec::{decode_cell, decode_display_value, ToCellBytes, DATA_CONVERSION_EXCEPTION};
use crate::error::HBaseErrorCode;
use crate::error::ErrorKind;
use bigdecimal::BigDecimal;
use std::error::Error;
use std::result::Result;
use std::str::FromStr;

#[test]
fn test_decode_numeric_types() -> Result<(), Box<dyn Error>> {
    assert_eq!(
        decode_display_value(Some("long"), &1234567890123i64.to_cell_bytes())?,
        "1234567890123"
    );
    assert_eq!(
        decode_display_value(Some("int"), &(-42i32).to_cell_bytes())?,
        "-42"
    );
    assert_eq!(
        decode_display_value(Some("short"), &7i16.to_cell_bytes())?,
        "7"
    );
    assert_eq!(
        decode_display_value(Some("double"), &2.5f64.to_cell_bytes())?,
        "2.5"
    );
    assert_eq!(
        decode_display_value(Some("float"), &1.0f32.to_cell_bytes())?,
        "1.0"
    );
    Ok(())
}

#[test]
fn test_decode_tag_is_case_insensitive() -> Result<(), Box<dyn Error>> {
    assert_eq!(
        decode_display_value(Some("  LONG "), &5i64.to_cell_bytes())?,
        "5"
    );
    assert_eq!(
        decode_display_value(Some("Boolean"), &true.to_cell_bytes())?,
        "true"
    );
    assert_eq!(
        decode_display_value(Some("boolean"), &false.to_cell_bytes())?,
        "false"
    );
    Ok(())
}

#[test]
fn test_decode_text_fallback() -> Result<(), Box<dyn Error>> {
    assert_eq!(decode_display_value(None, b"hello")?, "hello");
    assert_eq!(decode_display_value(Some(""), b"hello")?, "hello");
    assert_eq!(decode_display_value(Some("string"), b"hello")?, "hello");
    assert_eq!(decode_display_value(Some("no-such-type"), b"abc")?, "abc");
    Ok(())
}

#[test]
fn test_decode_bigdecimal() -> Result<(), Box<dyn Error>> {
    let d = BigDecimal::from_str("-123.4500")?;
    assert_eq!(
        decode_display_value(Some("bigdecimal"), &d.to_cell_bytes())?,
        "-123.4500"
    );
    let err = decode_display_value(Some("bigdecimal"), &[0, 0]).unwrap_err();
    assert_eq!(err.code, HBaseErrorCode::DataConversion);
    Ok(())
}

#[test]
fn test_decode_wrong_width() -> Result<(), Box<dyn Error>> {
    // "abc" stored in a column declared as long
    let err = decode_display_value(Some("long"), b"abc").unwrap_err();
    assert_eq!(err.code, HBaseErrorCode::DataConversion);
    assert_eq!(err.kind(), ErrorKind::Decode);
    assert!(decode_display_value(Some("int"), &5i64.to_cell_bytes()).is_err());
    assert!(decode_display_value(Some("boolean"), b"").is_err());
    Ok(())
}

#[test]
fn test_decode_cell_contains_failures() -> Result<(), Box<dyn Error>> {
    let (family, qv) = decode_cell(b"cf", b"age", 17, b"abc", Some("long"));
    assert_eq!(family, "cf");
    assert_eq!(qv.qualifier(), "age");
    assert_eq!(qv.timestamp(), 17);
    assert_eq!(qv.value(), DATA_CONVERSION_EXCEPTION);

    let (_, qv) = decode_cell(b"cf", b"age", 18, &30i32.to_cell_bytes(), Some("int"));
    assert_eq!(qv.value(), "30");
    Ok(())
}

#[test]
fn test_cell_bytes_encoding() -> Result<(), Box<dyn Error>> {
    assert_eq!(1i16.to_cell_bytes(), vec![0, 1]);
    assert_eq!(256i32.to_cell_bytes(), vec![0, 0, 1, 0]);
    assert_eq!(true.to_cell_bytes(), vec![0xff]);
    assert_eq!("ab".to_cell_bytes(), b"ab".to_vec());
    assert_eq!(String::from("ab").to_cell_bytes(), b"ab".to_vec());
    assert_eq!(
        bytes::Bytes::from_static(b"xyz").to_cell_bytes(),
        b"xyz".to_vec()
    );
    // scale 2, unscaled 12345
    let d = BigDecimal::from_str("123.45")?;
    assert_eq!(d.to_cell_bytes(), vec![0, 0, 0, 2, 0x30, 0x39]);
    Ok(())
}
