//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::{sdk_version, HBaseError};
use crate::handle::Handle;
use std::result::Result;

/// Struct used to get the status of the store cluster.
///
/// The status is returned as the store reports it, as a human-readable string
/// (live and dead servers, region count, average load, etc).
#[derive(Default, Debug)]
pub struct ClusterStatusRequest {}

impl ClusterStatusRequest {
    pub fn new() -> ClusterStatusRequest {
        ClusterStatusRequest {}
    }

    pub async fn execute(&self, h: &Handle) -> Result<String, HBaseError> {
        let admin = h.admin().await?;
        admin.cluster_status().await
    }
}

/// The version of this library.
pub fn adapter_version() -> &'static str {
    sdk_version()
}
