//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Public types shared by requests and results.

use std::collections::BTreeMap;
use std::result::Result;

use crate::error::ia_err;
use crate::error::HBaseError;

/// The namespace used for tables created without an explicit namespace.
pub const DEFAULT_NAMESPACE: &str = "default";

/// A fully qualified table name.
///
/// Table names may be given as `"table"` or `"namespace:table"`. A name
/// without a namespace lives in the [`DEFAULT_NAMESPACE`].
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TableName {
    namespace: String,
    qualifier: String,
}

impl TableName {
    /// Parse a table name of the form `table` or `namespace:table`.
    pub fn parse(name: &str) -> Result<TableName, HBaseError> {
        let (ns, q) = match name.split_once(':') {
            Some((ns, q)) => (ns, q),
            None => (DEFAULT_NAMESPACE, name),
        };
        if q.is_empty() {
            return ia_err!("table name is missing in '{}'", name);
        }
        if ns.is_empty() {
            return ia_err!("namespace is empty in '{}'", name);
        }
        if q.contains(':') {
            return ia_err!("invalid table name '{}'", name);
        }
        Ok(TableName {
            namespace: ns.to_string(),
            qualifier: q.to_string(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    pub fn is_default_namespace(&self) -> bool {
        self.namespace == DEFAULT_NAMESPACE
    }
}

impl std::fmt::Display for TableName {
    // Tables in the default namespace print without a prefix, matching
    // how the store lists them.
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_default_namespace() {
            write!(f, "{}", self.qualifier)
        } else {
            write!(f, "{}:{}", self.namespace, self.qualifier)
        }
    }
}

/// Compression algorithm attached to each column family at creation time.
#[derive(Clone, Copy, Default, Debug, Eq, PartialEq)]
pub enum Compression {
    #[default]
    None,
    Gz,
    Lz4,
    Lzo,
    Zstd,
    Snappy,
}

impl Compression {
    /// The algorithm name as the store spells it in table descriptors.
    pub fn as_str(&self) -> &'static str {
        match self {
            Compression::None => "NONE",
            Compression::Gz => "GZ",
            Compression::Lz4 => "LZ4",
            Compression::Lzo => "LZO",
            Compression::Zstd => "ZSTD",
            Compression::Snappy => "SNAPPY",
        }
    }

    pub fn from_name(name: &str) -> Result<Compression, HBaseError> {
        match name.trim().to_uppercase().as_str() {
            "" | "NONE" => Ok(Compression::None),
            "GZ" | "GZIP" => Ok(Compression::Gz),
            "LZ4" => Ok(Compression::Lz4),
            "LZO" => Ok(Compression::Lzo),
            "ZSTD" => Ok(Compression::Zstd),
            "SNAPPY" => Ok(Compression::Snappy),
            _ => ia_err!("unknown compression algorithm '{}'", name),
        }
    }
}

/// Parameters for one column family of a table being created.
///
/// Only the name is required. Time to live is in seconds.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct ColumnFamilySpec {
    pub(crate) name: String,
    pub(crate) time_to_live: Option<i32>,
    pub(crate) max_versions: Option<i32>,
}

impl ColumnFamilySpec {
    pub fn new(name: &str) -> ColumnFamilySpec {
        ColumnFamilySpec {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Cells older than this many seconds are expired by the store.
    pub fn time_to_live(mut self, seconds: i32) -> ColumnFamilySpec {
        self.time_to_live = Some(seconds);
        self
    }

    /// Maximum number of versions the store retains per cell.
    pub fn max_versions(mut self, versions: i32) -> ColumnFamilySpec {
        self.max_versions = Some(versions);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The attributes reported for each column family of a [`TableDescriptor`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum DescriptorField {
    Name,
    BloomFilter,
    Versions,
    InMemory,
    KeepDeletedCells,
    DataBlockEncoding,
    Ttl,
    Compression,
    MinVersions,
    BlockCache,
    BlockSize,
    ReplicationScope,
}

impl DescriptorField {
    pub const ALL: [DescriptorField; 12] = [
        DescriptorField::Name,
        DescriptorField::BloomFilter,
        DescriptorField::Versions,
        DescriptorField::InMemory,
        DescriptorField::KeepDeletedCells,
        DescriptorField::DataBlockEncoding,
        DescriptorField::Ttl,
        DescriptorField::Compression,
        DescriptorField::MinVersions,
        DescriptorField::BlockCache,
        DescriptorField::BlockSize,
        DescriptorField::ReplicationScope,
    ];

    /// The attribute key used by the store.
    pub fn key(&self) -> &'static str {
        match self {
            DescriptorField::Name => "NAME",
            DescriptorField::BloomFilter => "BLOOMFILTER",
            DescriptorField::Versions => "VERSIONS",
            DescriptorField::InMemory => "IN_MEMORY",
            DescriptorField::KeepDeletedCells => "KEEP_DELETED_CELLS",
            DescriptorField::DataBlockEncoding => "DATA_BLOCK_ENCODING",
            DescriptorField::Ttl => "TTL",
            DescriptorField::Compression => "COMPRESSION",
            DescriptorField::MinVersions => "MIN_VERSIONS",
            DescriptorField::BlockCache => "BLOCKCACHE",
            DescriptorField::BlockSize => "BLOCKSIZE",
            DescriptorField::ReplicationScope => "REPLICATION_SCOPE",
        }
    }

    pub fn from_key(key: &str) -> Option<DescriptorField> {
        DescriptorField::ALL
            .iter()
            .find(|f| f.key().eq_ignore_ascii_case(key))
            .copied()
    }
}

/// Description of a single column family.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct ColumnFamilyDescriptor {
    pub(crate) attributes: BTreeMap<DescriptorField, String>,
}

impl ColumnFamilyDescriptor {
    pub fn new(name: &str) -> ColumnFamilyDescriptor {
        let mut d = ColumnFamilyDescriptor::default();
        d.attributes
            .insert(DescriptorField::Name, name.to_string());
        d
    }

    pub fn name(&self) -> &str {
        self.get(DescriptorField::Name).unwrap_or("")
    }

    pub fn get(&self, field: DescriptorField) -> Option<&str> {
        self.attributes.get(&field).map(|s| s.as_str())
    }

    pub fn set(&mut self, field: DescriptorField, value: &str) {
        self.attributes.insert(field, value.to_string());
    }

    pub fn attributes(&self) -> &BTreeMap<DescriptorField, String> {
        &self.attributes
    }
}

impl std::fmt::Display for ColumnFamilyDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for (k, v) in &self.attributes {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{} => '{}'", k.key(), v)?;
            first = false;
        }
        write!(f, "}}")
    }
}

/// Description of a table and its column families, as reported by
/// [`GetTableRequest`](crate::GetTableRequest).
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct TableDescriptor {
    pub(crate) table_name: String,
    pub(crate) families: Vec<ColumnFamilyDescriptor>,
}

impl TableDescriptor {
    pub fn new(table_name: &str) -> TableDescriptor {
        TableDescriptor {
            table_name: table_name.to_string(),
            ..Default::default()
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn families(&self) -> &Vec<ColumnFamilyDescriptor> {
        &self.families
    }

    pub fn family(&self, name: &str) -> Option<&ColumnFamilyDescriptor> {
        self.families.iter().find(|f| f.name() == name)
    }

    pub fn add_family(&mut self, family: ColumnFamilyDescriptor) {
        self.families.push(family);
    }
}

impl std::fmt::Display for TableDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "'{}'", self.table_name)?;
        for fam in &self.families {
            write!(f, ", {}", fam)?;
        }
        Ok(())
    }
}

/// How many versions of each cell a scan returns.
#[derive(Clone, Copy, Default, Debug, Eq, PartialEq)]
pub enum VersionPolicy {
    /// Store default: only the newest version of each cell. No explicit
    /// version parameter is sent.
    #[default]
    Latest,
    /// Every version the store retains.
    All,
    /// At most `n` versions per cell. `n` must be positive.
    Exactly(u32),
}

impl VersionPolicy {
    /// Map an integer max-versions value: non-positive means [`VersionPolicy::Latest`],
    /// `i32::MAX` means [`VersionPolicy::All`].
    pub fn from_max_versions(max_versions: i32) -> VersionPolicy {
        if max_versions <= 0 {
            VersionPolicy::Latest
        } else if max_versions == i32::MAX {
            VersionPolicy::All
        } else {
            VersionPolicy::Exactly(max_versions as u32)
        }
    }

    /// The explicit version limit to send with a scan, if any.
    pub fn max_versions(&self) -> Option<u32> {
        match self {
            VersionPolicy::Latest => None,
            VersionPolicy::All => Some(i32::MAX as u32),
            VersionPolicy::Exactly(0) => None,
            VersionPolicy::Exactly(n) => Some(*n),
        }
    }
}

/// One decoded cell version inside a [`Row`].
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct QualifierValue {
    pub(crate) qualifier: String,
    pub(crate) timestamp: i64,
    pub(crate) value: String,
}

impl QualifierValue {
    pub fn new(qualifier: &str, timestamp: i64, value: &str) -> QualifierValue {
        QualifierValue {
            qualifier: qualifier.to_string(),
            timestamp,
            value: value.to_string(),
        }
    }

    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// The display-formatted value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A row of a scan page: the row key and the display values found for it,
/// grouped by column family.
///
/// When a scan asks for several versions, a qualifier appears once per
/// version returned, newest first.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct Row {
    pub(crate) key: Vec<u8>,
    pub(crate) families: BTreeMap<String, Vec<QualifierValue>>,
}

impl Row {
    pub fn new(key: &[u8]) -> Row {
        Row {
            key: key.to_vec(),
            ..Default::default()
        }
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// The row key as (lossy) UTF-8 text.
    pub fn key_str(&self) -> String {
        String::from_utf8_lossy(&self.key).into_owned()
    }

    pub fn add(&mut self, family: &str, value: QualifierValue) {
        self.families
            .entry(family.to_string())
            .or_default()
            .push(value);
    }

    pub fn families(&self) -> &BTreeMap<String, Vec<QualifierValue>> {
        &self.families
    }

    /// The newest value of the given column, if present.
    pub fn value(&self, family: &str, qualifier: &str) -> Option<&str> {
        self.versions(family, qualifier)
            .into_iter()
            .next()
            .map(|qv| qv.value())
    }

    /// All returned versions of the given column, newest first.
    pub fn versions(&self, family: &str, qualifier: &str) -> Vec<&QualifierValue> {
        let mut v: Vec<&QualifierValue> = match self.families.get(family) {
            Some(cols) => cols.iter().filter(|qv| qv.qualifier == qualifier).collect(),
            None => Vec::new(),
        };
        v.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        v
    }

    pub fn cell_count(&self) -> usize {
        self.families.values().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }
}

impl std::fmt::Display for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}: {{", self.key_str())?;
        let mut first = true;
        for (fam, cols) in &self.families {
            for qv in cols {
                if !first {
                    write!(f, ", ")?;
                }
                write!(f, "{}:{}={}", fam, qv.qualifier, qv.value)?;
                first = false;
            }
        }
        write!(f, "}}")
    }
}

/// A (family, qualifier) pair discovered by
/// [`ListQualifiersRequest`](crate::ListQualifiersRequest).
#[derive(Default, Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ColumnQualifier {
    pub family: String,
    pub qualifier: String,
    /// Display type for the column. Discovery cannot know the stored type,
    /// so this is always `"string"`.
    pub display_type: String,
}

impl ColumnQualifier {
    pub fn new(family: &str, qualifier: &str) -> ColumnQualifier {
        ColumnQualifier {
            family: family.to_string(),
            qualifier: qualifier.to_string(),
            display_type: "string".to_string(),
        }
    }

    /// The `"family.qualifier"` key used in scan type maps.
    pub fn type_map_key(&self) -> String {
        format!("{}.{}", self.family, self.qualifier)
    }
}
