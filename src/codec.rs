//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Conversion between raw cell bytes and display values.
//!
//! Encodings follow the store's `Bytes` conventions: fixed-width big-endian
//! integers and IEEE-754 floats, a single byte for booleans, a 4-byte scale
//! followed by a two's-complement unscaled value for decimals, and UTF-8
//! for everything else.

use bigdecimal::num_bigint::BigInt;
use bigdecimal::BigDecimal;
use std::result::Result;

use crate::error::HBaseError;
use crate::error::HBaseErrorCode::DataConversion;
use crate::types::QualifierValue;

/// Value shown in place of a cell whose bytes do not match its display type.
pub const DATA_CONVERSION_EXCEPTION: &str = "DATA CONVERSION EXCEPTION";

fn fixed<const N: usize>(tag: &str, b: &[u8]) -> Result<[u8; N], HBaseError> {
    match <[u8; N]>::try_from(b) {
        Ok(a) => Ok(a),
        Err(_) => Err(HBaseError::new(
            DataConversion,
            &format!(
                "cannot decode {} bytes as {}: expected {} bytes",
                b.len(),
                tag,
                N
            ),
        )),
    }
}

/// Decode raw cell bytes as the given display type.
///
/// Supported tags (case-insensitive, surrounding whitespace ignored) are
/// `long`, `int`, `short`, `float`, `double`, `bigdecimal` and `boolean`.
/// A missing, empty or unrecognized tag decodes the bytes as UTF-8 text.
pub fn decode_display_value(tag: Option<&str>, b: &[u8]) -> Result<String, HBaseError> {
    let tag = match tag {
        Some(t) if !t.trim().is_empty() => t.trim().to_lowercase(),
        _ => return Ok(String::from_utf8_lossy(b).into_owned()),
    };
    match tag.as_str() {
        "long" => Ok(i64::from_be_bytes(fixed::<8>(&tag, b)?).to_string()),
        "int" => Ok(i32::from_be_bytes(fixed::<4>(&tag, b)?).to_string()),
        "short" => Ok(i16::from_be_bytes(fixed::<2>(&tag, b)?).to_string()),
        "float" => Ok(format!("{:?}", f32::from_be_bytes(fixed::<4>(&tag, b)?))),
        "double" => Ok(format!("{:?}", f64::from_be_bytes(fixed::<8>(&tag, b)?))),
        "bigdecimal" => {
            if b.len() < 5 {
                return Err(HBaseError::new(
                    DataConversion,
                    &format!("cannot decode {} bytes as bigdecimal", b.len()),
                ));
            }
            let scale = i32::from_be_bytes(fixed::<4>(&tag, &b[0..4])?);
            let unscaled = BigInt::from_signed_bytes_be(&b[4..]);
            Ok(BigDecimal::new(unscaled, scale as i64).to_string())
        }
        "boolean" => Ok((fixed::<1>(&tag, b)?[0] != 0).to_string()),
        _ => Ok(String::from_utf8_lossy(b).into_owned()),
    }
}

/// Decode one cell for display.
///
/// Decoding errors are contained here: the returned value holds
/// [`DATA_CONVERSION_EXCEPTION`] instead of failing the caller.
pub fn decode_cell(
    family: &[u8],
    qualifier: &[u8],
    timestamp: i64,
    value: &[u8],
    tag: Option<&str>,
) -> (String, QualifierValue) {
    let family = String::from_utf8_lossy(family).into_owned();
    let qualifier = String::from_utf8_lossy(qualifier).into_owned();
    let display = match decode_display_value(tag, value) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(
                "cell {}:{} not convertible: {}",
                family,
                qualifier,
                e.message
            );
            DATA_CONVERSION_EXCEPTION.to_string()
        }
    };
    let qv = QualifierValue::new(&qualifier, timestamp, &display);
    (family, qv)
}

/// Encoding of native values into cell bytes.
pub trait ToCellBytes {
    fn to_cell_bytes(&self) -> Vec<u8>;
}

impl ToCellBytes for i64 {
    fn to_cell_bytes(&self) -> Vec<u8> {
        self.to_be_bytes().to_vec()
    }
}

impl ToCellBytes for i32 {
    fn to_cell_bytes(&self) -> Vec<u8> {
        self.to_be_bytes().to_vec()
    }
}

impl ToCellBytes for i16 {
    fn to_cell_bytes(&self) -> Vec<u8> {
        self.to_be_bytes().to_vec()
    }
}

impl ToCellBytes for f32 {
    fn to_cell_bytes(&self) -> Vec<u8> {
        self.to_be_bytes().to_vec()
    }
}

impl ToCellBytes for f64 {
    fn to_cell_bytes(&self) -> Vec<u8> {
        self.to_be_bytes().to_vec()
    }
}

impl ToCellBytes for bool {
    fn to_cell_bytes(&self) -> Vec<u8> {
        if *self {
            vec![0xff]
        } else {
            vec![0]
        }
    }
}

impl ToCellBytes for BigDecimal {
    fn to_cell_bytes(&self) -> Vec<u8> {
        let (unscaled, scale) = self.as_bigint_and_exponent();
        let mut v = (scale as i32).to_be_bytes().to_vec();
        v.extend_from_slice(&unscaled.to_signed_bytes_be());
        v
    }
}

impl ToCellBytes for &str {
    fn to_cell_bytes(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl ToCellBytes for String {
    fn to_cell_bytes(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl ToCellBytes for Vec<u8> {
    fn to_cell_bytes(&self) -> Vec<u8> {
        self.clone()
    }
}

impl ToCellBytes for &[u8] {
    fn to_cell_bytes(&self) -> Vec<u8> {
        self.to_vec()
    }
}

impl ToCellBytes for bytes::Bytes {
    fn to_cell_bytes(&self) -> Vec<u8> {
        self.to_vec()
    }
}
