//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::HBaseErrorCode::IllegalState;
use crate::error::HBaseError;
use crate::handle_builder::HandleBuilder;
use crate::handle_builder::HandleMode;
use crate::memory::MemoryStore;
use crate::rest::RestStore;
use crate::store::{AdminClient, Closeable, StoreClient, TableClient};
use crate::types::TableName;

use std::collections::BTreeMap;
use std::ops::Deref;
use std::result::Result;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// **The main adapter handle**.
///
/// This should be created once and used
/// throughout the application lifetime, across all threads. Every request
/// takes the handle explicitly; there is no global connection.
///
/// Note: there is no need to enclose this struct in an `Rc` or [`Arc`], as it uses an
/// [`Arc`] internally, so calling `.clone()` on this struct will always return the
/// same underlying handle.
#[derive(Clone, Debug)]
pub struct Handle {
    // Use an inner Arc so cloning keeps the same contents
    pub(crate) inner: Arc<HandleRef>,
}

#[derive(Debug)]
pub(crate) struct HandleRef {
    pub(crate) store: Arc<dyn StoreClient>,
    pub(crate) builder: HandleBuilder,
    closed: AtomicBool,
}

impl Handle {
    /// Create a new [`HandleBuilder`].
    pub fn builder() -> HandleBuilder {
        HandleBuilder::new()
    }

    // Create the new Handle based on builder configuration
    pub(crate) async fn new(b: &HandleBuilder) -> Result<Handle, HBaseError> {
        let builder = b.clone();
        let store: Arc<dyn StoreClient> = match &builder.store {
            Some(s) => s.clone(),
            None => match builder.mode {
                HandleMode::InMemory => Arc::new(MemoryStore::new()),
                HandleMode::Rest => Arc::new(RestStore::new(&builder)?),
            },
        };
        debug!(
            "Creating new Handle: mode={:?}, store={:?}, config={:?}",
            builder.mode,
            store,
            builder.hbase_configuration()
        );
        Ok(Handle {
            inner: Arc::new(HandleRef {
                store,
                builder,
                closed: AtomicBool::new(false),
            }),
        })
    }

    /// Close the underlying store connection.
    ///
    /// Every clone of this handle is affected. Requests executed after this
    /// call fail with [`IllegalState`](crate::HBaseErrorCode::IllegalState). Closing an already
    /// closed handle does nothing.
    pub fn close(&self) -> Result<(), HBaseError> {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        debug!("Closing Handle");
        self.inner.store.close()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// The store configuration this handle was built with, keyed by the
    /// store's configuration property names.
    pub fn configuration(&self) -> BTreeMap<String, String> {
        self.inner.builder.hbase_configuration()
    }

    pub(crate) fn scanner_caching(&self) -> u32 {
        self.inner.builder.scanner_caching
    }

    fn check_open(&self) -> Result<(), HBaseError> {
        if self.is_closed() {
            return Err(HBaseError::new(
                IllegalState,
                "connection is closed or not initialized",
            ));
        }
        Ok(())
    }

    /// Acquire an administrative handle. It is released when the returned
    /// guard is dropped.
    pub(crate) async fn admin(&self) -> Result<Scoped<dyn AdminClient>, HBaseError> {
        self.check_open()?;
        trace!("acquiring admin handle");
        let a = self.inner.store.admin().await?;
        Ok(Scoped::new(a, "admin".to_string()))
    }

    /// Acquire a handle to a single table. It is released when the returned
    /// guard is dropped.
    pub(crate) async fn table(
        &self,
        table: &TableName,
    ) -> Result<Scoped<dyn TableClient>, HBaseError> {
        self.check_open()?;
        trace!("acquiring table handle for {}", table);
        let t = self.inner.store.table(table).await?;
        Ok(Scoped::new(t, format!("table {}", table)))
    }
}

/// An acquired store resource, released exactly once when dropped.
///
/// Release failures are logged and never replace the outcome of the
/// operation that used the resource.
pub(crate) struct Scoped<T: ?Sized + Closeable> {
    inner: Box<T>,
    what: String,
}

impl<T: ?Sized + Closeable> Scoped<T> {
    pub(crate) fn new(inner: Box<T>, what: String) -> Scoped<T> {
        Scoped { inner, what }
    }
}

impl<T: ?Sized + Closeable> Deref for Scoped<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T: ?Sized + Closeable> Drop for Scoped<T> {
    fn drop(&mut self) {
        match self.inner.close() {
            Ok(_) => trace!("released {}", self.what),
            Err(e) => warn!("error releasing {}: {}", self.what, e),
        }
    }
}

