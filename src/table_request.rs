//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::HBaseErrorCode::TableExists;
use crate::error::{ia_err, HBaseError};
use crate::handle::Handle;
use crate::store::RegionSplit;
use crate::types::{
    ColumnFamilyDescriptor, ColumnFamilySpec, Compression, DescriptorField, TableDescriptor,
    TableName,
};
use std::result::Result;
use tracing::{debug, trace};

/// Struct used for creating a table in the store.
///
/// A table needs at least one column family. Every family gets the same
/// [`Compression`]; time to live and retained versions may be given per
/// family with [`ColumnFamilySpec`].
///
/// Example:
/// ```no_run
/// use hbase_adapter::TableRequest;
/// use hbase_adapter::types::*;
/// # use hbase_adapter::Handle;
/// # use std::error::Error;
/// # #[tokio::main]
/// # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let handle = Handle::builder().build().await?;
///     // Create an example table with two families, keeping up to
///     // 3 versions of each cell in the "info" family
///     TableRequest::new("testusers")
///         .column_family(ColumnFamilySpec::new("info").max_versions(3))
///         .column_family(ColumnFamilySpec::new("stats").time_to_live(86400))
///         .compression(Compression::Snappy)
///         .execute(&handle)
///         .await?;
/// # Ok(())
/// # }
///```
#[derive(Default, Debug)]
pub struct TableRequest {
    pub(crate) table_name: String,
    pub(crate) families: Vec<ColumnFamilySpec>,
    pub(crate) compression: Compression,
    pub(crate) split_keys: Vec<Vec<u8>>,
    pub(crate) start_key: Option<Vec<u8>>,
    pub(crate) end_key: Option<Vec<u8>>,
    pub(crate) num_regions: Option<u32>,
}

impl TableRequest {
    /// Create a new TableRequest.
    ///
    /// `table_name` may be given as `table` or `namespace:table`.
    pub fn new(table_name: &str) -> TableRequest {
        TableRequest {
            table_name: table_name.to_string(),
            ..Default::default()
        }
    }

    /// Add a column family.
    pub fn column_family(mut self, family: ColumnFamilySpec) -> TableRequest {
        self.families.push(family);
        self
    }

    /// Add column families by name only, with store defaults for everything else.
    pub fn column_families(mut self, families: &[&str]) -> TableRequest {
        for f in families {
            self.families.push(ColumnFamilySpec::new(f));
        }
        self
    }

    /// Set the compression used by every column family. The default is
    /// [`Compression::None`].
    pub fn compression(mut self, compression: Compression) -> TableRequest {
        self.compression = compression;
        self
    }

    /// Create the table pre-split at the given row keys.
    ///
    /// Explicit split keys take precedence over [`pre_split()`](TableRequest::pre_split()).
    pub fn split_keys(mut self, keys: Vec<Vec<u8>>) -> TableRequest {
        self.split_keys = keys;
        self
    }

    /// Create the table with `num_regions` regions spread evenly between
    /// `start_key` and `end_key`. `num_regions` must be at least 3 and
    /// `start_key` must sort before `end_key`.
    pub fn pre_split(mut self, start_key: &[u8], end_key: &[u8], num_regions: u32) -> TableRequest {
        self.start_key = Some(start_key.to_vec());
        self.end_key = Some(end_key.to_vec());
        self.num_regions = Some(num_regions);
        self
    }

    fn region_split(&self) -> Result<RegionSplit, HBaseError> {
        if !self.split_keys.is_empty() {
            return Ok(RegionSplit::SplitKeys(self.split_keys.clone()));
        }
        match (&self.start_key, &self.end_key, self.num_regions) {
            (Some(start), Some(end), Some(n)) => {
                if n < 3 {
                    return ia_err!("pre-split needs at least 3 regions, got {}", n);
                }
                if start >= end {
                    return ia_err!("pre-split start key must sort before end key");
                }
                Ok(RegionSplit::Range {
                    start: start.clone(),
                    end: end.clone(),
                    num_regions: n,
                })
            }
            _ => Ok(RegionSplit::None),
        }
    }

    fn descriptor(&self, table: &TableName) -> Result<TableDescriptor, HBaseError> {
        if self.families.is_empty() {
            return ia_err!("table {} needs at least one column family", table);
        }
        let mut desc = TableDescriptor::new(&table.to_string());
        for f in &self.families {
            if f.name.trim().is_empty() {
                return ia_err!("column family name is missing");
            }
            if desc.family(&f.name).is_some() {
                return ia_err!("column family '{}' given more than once", f.name);
            }
            let mut cfd = ColumnFamilyDescriptor::new(&f.name);
            cfd.set(DescriptorField::Compression, self.compression.as_str());
            if let Some(ttl) = f.time_to_live {
                if ttl <= 0 {
                    return ia_err!("time to live of family '{}' must be positive", f.name);
                }
                cfd.set(DescriptorField::Ttl, &ttl.to_string());
            }
            if let Some(v) = f.max_versions {
                if v <= 0 {
                    return ia_err!("max versions of family '{}' must be positive", f.name);
                }
                cfd.set(DescriptorField::Versions, &v.to_string());
            }
            desc.add_family(cfd);
        }
        Ok(desc)
    }

    /// Execute the request, creating the table.
    ///
    /// Returns a [`TableExists`](crate::HBaseErrorCode::TableExists) error if
    /// the table already exists.
    pub async fn execute(&self, h: &Handle) -> Result<(), HBaseError> {
        let table = TableName::parse(&self.table_name)?;
        let desc = self.descriptor(&table)?;
        let split = self.region_split()?;
        let admin = h.admin().await?;
        if admin.table_exists(&table).await? {
            return Err(HBaseError::new(
                TableExists,
                &format!("{} is exist", self.table_name),
            ));
        }
        debug!(
            "creating table {} with {} region(s): {}",
            table,
            split.num_regions(),
            desc
        );
        admin.create_table(&table, &desc, &split).await
    }
}

/// Struct used for dropping a table: the table is disabled, then deleted.
#[derive(Default, Debug)]
pub struct DropTableRequest {
    pub(crate) table_name: String,
}

impl DropTableRequest {
    pub fn new(table_name: &str) -> DropTableRequest {
        DropTableRequest {
            table_name: table_name.to_string(),
        }
    }

    pub async fn execute(&self, h: &Handle) -> Result<(), HBaseError> {
        let table = TableName::parse(&self.table_name)?;
        let admin = h.admin().await?;
        trace!("dropping table {}", table);
        admin.disable_table(&table).await?;
        admin.delete_table(&table).await
    }
}

/// Struct used for removing all rows of a table while keeping its schema.
///
/// The table is disabled, truncated, and enabled again if the store left it
/// disabled.
#[derive(Default, Debug)]
pub struct TruncateTableRequest {
    pub(crate) table_name: String,
    pub(crate) preserve_splits: bool,
}

impl TruncateTableRequest {
    pub fn new(table_name: &str) -> TruncateTableRequest {
        TruncateTableRequest {
            table_name: table_name.to_string(),
            ..Default::default()
        }
    }

    /// Keep the table's region boundaries. The default is `false`.
    pub fn preserve_splits(mut self, preserve_splits: bool) -> TruncateTableRequest {
        self.preserve_splits = preserve_splits;
        self
    }

    pub async fn execute(&self, h: &Handle) -> Result<(), HBaseError> {
        let table = TableName::parse(&self.table_name)?;
        let admin = h.admin().await?;
        trace!(
            "truncating table {} (preserve_splits={})",
            table,
            self.preserve_splits
        );
        admin.disable_table(&table).await?;
        admin.truncate_table(&table, self.preserve_splits).await?;
        if !admin.is_table_enabled(&table).await? {
            admin.enable_table(&table).await?;
        }
        Ok(())
    }
}

/// Struct used to get the schema of a table.
///
/// The returned [`TableDescriptor`] holds one [`ColumnFamilyDescriptor`] per
/// family, with the attributes listed in [`DescriptorField`].
#[derive(Default, Debug)]
pub struct GetTableRequest {
    pub(crate) table_name: String,
}

impl GetTableRequest {
    pub fn new(table_name: &str) -> GetTableRequest {
        GetTableRequest {
            table_name: table_name.to_string(),
        }
    }

    pub async fn execute(&self, h: &Handle) -> Result<TableDescriptor, HBaseError> {
        let table = TableName::parse(&self.table_name)?;
        let t = h.table(&table).await?;
        let mut desc = t.descriptor().await?;
        // report every attribute, even those the store left unset
        for f in desc.families.iter_mut() {
            for field in DescriptorField::ALL {
                if f.get(field).is_none() {
                    f.set(field, "");
                }
            }
        }
        Ok(desc)
    }
}
