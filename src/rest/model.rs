//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! JSON documents exchanged with the REST gateway.
//!
//! Row keys, column names and values are base64 encoded on the wire.

use base64::prelude::{Engine as _, BASE64_STANDARD};
use serde_derive::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::result::Result;

use crate::error::HBaseError;
use crate::error::HBaseErrorCode::BadProtocolMessage;
use crate::filter::ScanFilter;
use crate::rest::filter_model::filter_to_json;
use crate::store::{Cell, Put, Scan, ScanResult};
use crate::types::{ColumnFamilyDescriptor, DescriptorField, TableDescriptor};

#[derive(Default, Debug, Serialize, Deserialize, PartialEq)]
pub(crate) struct CellModel {
    /// base64 of `family:qualifier`
    pub column: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(rename = "$")]
    pub value: String,
}

#[derive(Default, Debug, Serialize, Deserialize, PartialEq)]
pub(crate) struct RowModel {
    pub key: String,
    #[serde(rename = "Cell", default)]
    pub cells: Vec<CellModel>,
}

#[derive(Default, Debug, Serialize, Deserialize, PartialEq)]
pub(crate) struct CellSetModel {
    #[serde(rename = "Row", default)]
    pub rows: Vec<RowModel>,
}

impl CellSetModel {
    pub(crate) fn from_puts(puts: &[Put]) -> CellSetModel {
        let rows = puts
            .iter()
            .map(|p| RowModel {
                key: BASE64_STANDARD.encode(&p.row),
                cells: p
                    .cells
                    .iter()
                    .map(|c| {
                        let mut column = c.family.clone();
                        column.push(b':');
                        column.extend_from_slice(&c.qualifier);
                        CellModel {
                            column: BASE64_STANDARD.encode(column),
                            timestamp: c.timestamp,
                            value: BASE64_STANDARD.encode(&c.value),
                        }
                    })
                    .collect(),
            })
            .collect();
        CellSetModel { rows }
    }

    pub(crate) fn into_results(self) -> Result<Vec<ScanResult>, HBaseError> {
        let mut results = Vec::with_capacity(self.rows.len());
        for r in self.rows {
            let row = BASE64_STANDARD.decode(&r.key)?;
            let mut cells = Vec::with_capacity(r.cells.len());
            for c in r.cells {
                let column = BASE64_STANDARD.decode(&c.column)?;
                let (family, qualifier) = match column.iter().position(|b| *b == b':') {
                    Some(i) => (column[..i].to_vec(), column[i + 1..].to_vec()),
                    None => {
                        return Err(HBaseError::new(
                            BadProtocolMessage,
                            &format!(
                                "column '{}' has no family separator",
                                String::from_utf8_lossy(&column)
                            ),
                        ));
                    }
                };
                cells.push(Cell {
                    row: row.clone(),
                    family,
                    qualifier,
                    timestamp: c.timestamp.unwrap_or(0),
                    value: BASE64_STANDARD.decode(&c.value)?,
                });
            }
            results.push(ScanResult { row, cells });
        }
        Ok(results)
    }
}

#[derive(Default, Debug, Serialize, Deserialize, PartialEq)]
pub(crate) struct ColumnSchemaModel {
    pub name: String,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

#[derive(Default, Debug, Serialize, Deserialize, PartialEq)]
pub(crate) struct TableSchemaModel {
    pub name: String,
    #[serde(rename = "ColumnSchema", default)]
    pub columns: Vec<ColumnSchemaModel>,
}

impl TableSchemaModel {
    pub(crate) fn from_descriptor(table_name: &str, desc: &TableDescriptor) -> TableSchemaModel {
        let columns = desc
            .families()
            .iter()
            .map(|f| {
                let mut attributes = BTreeMap::new();
                for (k, v) in f.attributes() {
                    if *k != DescriptorField::Name {
                        attributes.insert(k.key().to_string(), serde_json::Value::from(v.as_str()));
                    }
                }
                ColumnSchemaModel {
                    name: f.name().to_string(),
                    attributes,
                }
            })
            .collect();
        TableSchemaModel {
            name: table_name.to_string(),
            columns,
        }
    }

    pub(crate) fn into_descriptor(self) -> TableDescriptor {
        let mut desc = TableDescriptor::new(&self.name);
        for c in self.columns {
            let mut f = ColumnFamilyDescriptor::new(&c.name);
            for (k, v) in &c.attributes {
                if let Some(field) = DescriptorField::from_key(k) {
                    let s = match v {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    f.set(field, &s);
                }
            }
            desc.add_family(f);
        }
        desc
    }
}

#[derive(Default, Debug, Serialize, Deserialize, PartialEq)]
pub(crate) struct TableModel {
    pub name: String,
}

#[derive(Default, Debug, Serialize, Deserialize, PartialEq)]
pub(crate) struct TableListModel {
    #[serde(rename = "table", default)]
    pub tables: Vec<TableModel>,
}

#[derive(Default, Debug, Serialize, Deserialize, PartialEq)]
pub(crate) struct NamespacesModel {
    #[serde(rename = "Namespace", default)]
    pub namespaces: Vec<String>,
}

#[derive(Default, Debug, Serialize, Deserialize, PartialEq)]
pub(crate) struct LiveNodeModel {
    pub name: String,
    #[serde(default)]
    pub requests: i64,
    #[serde(rename = "heapSizeMB", default)]
    pub heap_size_mb: i64,
    #[serde(rename = "Region", default)]
    pub regions: Vec<serde_json::Value>,
}

#[derive(Default, Debug, Serialize, Deserialize, PartialEq)]
pub(crate) struct ClusterStatusModel {
    #[serde(default)]
    pub regions: i64,
    #[serde(default)]
    pub requests: i64,
    #[serde(rename = "averageLoad", default)]
    pub average_load: f64,
    #[serde(rename = "LiveNodes", default)]
    pub live_nodes: Vec<LiveNodeModel>,
    #[serde(rename = "DeadNodes", default)]
    pub dead_nodes: Vec<String>,
}

impl std::fmt::Display for ClusterStatusModel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "Number of live region servers: {}", self.live_nodes.len())?;
        for n in &self.live_nodes {
            writeln!(
                f,
                "    {} requests={}, regions={}, heapSizeMB={}",
                n.name,
                n.requests,
                n.regions.len(),
                n.heap_size_mb
            )?;
        }
        writeln!(f, "Number of dead region servers: {}", self.dead_nodes.len())?;
        for n in &self.dead_nodes {
            writeln!(f, "    {}", n)?;
        }
        writeln!(f, "Number of regions: {}", self.regions)?;
        writeln!(f, "Number of requests: {}", self.requests)?;
        write!(f, "Average load: {}", self.average_load)
    }
}

/// Scanner definition posted to create a scanner.
#[derive(Default, Debug, Serialize, PartialEq)]
pub(crate) struct ScannerModel {
    #[serde(rename = "startRow", skip_serializing_if = "Option::is_none")]
    pub start_row: Option<String>,
    #[serde(rename = "endRow", skip_serializing_if = "Option::is_none")]
    pub end_row: Option<String>,
    #[serde(rename = "startTime", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(rename = "endTime", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    #[serde(rename = "maxVersions", skip_serializing_if = "Option::is_none")]
    pub max_versions: Option<u32>,
    pub caching: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// The filter, itself serialized as a JSON string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl ScannerModel {
    pub(crate) fn from_scan(scan: &Scan) -> ScannerModel {
        ScannerModel {
            start_row: scan
                .start_row
                .as_ref()
                .map(|k| BASE64_STANDARD.encode(k)),
            end_row: scan.stop_row.as_ref().map(|k| BASE64_STANDARD.encode(k)),
            start_time: scan.time_range.map(|(min, _)| min),
            end_time: scan.time_range.map(|(_, max)| max),
            // the gateway returns every version when none is requested
            max_versions: Some(scan.max_versions.unwrap_or(1)),
            caching: scan.caching.max(1),
            limit: scan.limit,
            filter: scan.filter.as_ref().map(|f: &ScanFilter| filter_to_json(f).to_string()),
        }
    }
}
