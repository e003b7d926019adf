//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::HBaseErrorCode;
use crate::handle_builder::*;
use std::error::Error;
use std::io::Write;
use std::result::Result;
use std::time::Duration;

#[test]
fn test_defaults() -> Result<(), Box<dyn Error>> {
    let b = HandleBuilder::new();
    let conf = b.hbase_configuration();
    assert_eq!(conf[ZK_PORT_KEY], "2181");
    assert_eq!(conf[ZNODE_PARENT_KEY], "/hbase");
    assert_eq!(conf[RPC_TIMEOUT_KEY], "50000");
    assert_eq!(conf[OPERATION_TIMEOUT_KEY], "10000");
    assert_eq!(conf[SCANNER_TIMEOUT_KEY], "200000");
    assert_eq!(conf[SCANNER_CACHING_KEY], "100");
    assert_eq!(b.mode, HandleMode::Rest);
    Ok(())
}

#[test]
fn test_setter_validation() -> Result<(), Box<dyn Error>> {
    let err = HandleBuilder::new().znode_parent("hbase").unwrap_err();
    assert_eq!(err.code, HBaseErrorCode::IllegalArgument);
    assert!(HandleBuilder::new().rpc_timeout(Duration::ZERO).is_err());
    assert!(HandleBuilder::new().operation_timeout(Duration::ZERO).is_err());
    assert!(HandleBuilder::new().scanner_timeout(Duration::ZERO).is_err());
    assert!(HandleBuilder::new().scanner_caching(0).is_err());

    let b = HandleBuilder::new()
        .zookeeper_quorum("zk1,zk2")?
        .master("master1:16000")?
        .scanner_caching(500)?;
    let conf = b.hbase_configuration();
    assert_eq!(conf[ZK_QUORUM_KEY], "zk1,zk2");
    assert_eq!(conf[MASTER_KEY], "master1:16000");
    assert_eq!(conf[SCANNER_CACHING_KEY], "500");
    Ok(())
}

#[test]
fn test_rest_endpoint() -> Result<(), Box<dyn Error>> {
    let b = HandleBuilder::new().endpoint("rest1:8080/")?;
    assert_eq!(b.rest_endpoint()?, "http://rest1:8080");

    let b = HandleBuilder::new().endpoint("https://rest1")?;
    assert_eq!(b.rest_endpoint()?, "https://rest1");

    // derived from the master host
    let b = HandleBuilder::new().master("master1:16000")?;
    assert_eq!(b.rest_endpoint()?, "http://master1:8080");

    let err = HandleBuilder::new().rest_endpoint().unwrap_err();
    assert_eq!(err.code, HBaseErrorCode::IllegalArgument);
    assert!(err.message.contains("HandleBuilder::endpoint()"));
    Ok(())
}

#[test]
fn test_from_file() -> Result<(), Box<dyn Error>> {
    let mut f = tempfile::NamedTempFile::new()?;
    writeln!(f, "[DEFAULT]")?;
    writeln!(f, "hbase.zookeeper.quorum=zk1,zk2,zk3")?;
    writeln!(f, "hbase.zookeeper.property.clientPort=2182")?;
    writeln!(f, "hbase.rpc.timeout=1500")?;
    writeln!(f, "hbase.client.scanner.caching=25")?;
    writeln!(f, "[other]")?;
    writeln!(f, "hbase.master=m2:16000")?;
    f.flush()?;
    let path = f.path().to_string_lossy().into_owned();

    let b = HandleBuilder::new().from_file(&path)?;
    assert_eq!(b.zk_quorum, "zk1,zk2,zk3");
    assert_eq!(b.zk_port, "2182");
    assert_eq!(b.rpc_timeout, Duration::from_millis(1500));
    assert_eq!(b.scanner_caching, 25);
    assert!(b.master.is_empty());

    let b = HandleBuilder::new().from_file_with_profile(&path, "other")?;
    assert_eq!(b.master, "m2:16000");
    assert_eq!(b.zk_port, "2181");

    let err = HandleBuilder::new()
        .from_file_with_profile(&path, "missing")
        .unwrap_err();
    assert!(err.message.contains("missing profile"));
    assert!(HandleBuilder::new().from_file("/no/such/file.ini").is_err());
    Ok(())
}

#[test]
fn test_from_file_bad_value() -> Result<(), Box<dyn Error>> {
    let mut f = tempfile::NamedTempFile::new()?;
    writeln!(f, "[DEFAULT]")?;
    writeln!(f, "hbase.client.operation.timeout=soon")?;
    f.flush()?;
    let path = f.path().to_string_lossy().into_owned();
    let err = HandleBuilder::new().from_file(&path).unwrap_err();
    assert_eq!(err.code, HBaseErrorCode::IllegalArgument);
    assert!(err.message.contains(OPERATION_TIMEOUT_KEY));
    Ok(())
}

#[test]
fn test_from_environment() -> Result<(), Box<dyn Error>> {
    // the only test in this crate that reads these variables
    std::env::set_var("HBASE_ADAPTER_ZK_QUORUM", "envzk");
    std::env::set_var("HBASE_ADAPTER_MODE", "memory");
    let b = HandleBuilder::new().from_environment()?;
    assert_eq!(b.zk_quorum, "envzk");
    assert_eq!(b.mode, HandleMode::InMemory);
    let err = b.rest_endpoint().unwrap_err();
    assert!(err.message.contains("HBASE_ADAPTER_ENDPOINT"));

    std::env::set_var("HBASE_ADAPTER_MODE", "thrift");
    let res = HandleBuilder::new().from_environment();
    std::env::remove_var("HBASE_ADAPTER_ZK_QUORUM");
    std::env::remove_var("HBASE_ADAPTER_MODE");
    let err = res.unwrap_err();
    assert_eq!(err.code, HBaseErrorCode::IllegalArgument);
    Ok(())
}

#[test]
fn test_expand_user_home() -> Result<(), Box<dyn Error>> {
    assert_eq!(expand_user_home("/etc/hbase.ini")?, "/etc/hbase.ini");
    if dirs::home_dir().is_some() {
        let p = expand_user_home("~/hbase.ini")?;
        assert!(!p.starts_with('~'));
        assert!(p.ends_with("hbase.ini"));
    }
    Ok(())
}
