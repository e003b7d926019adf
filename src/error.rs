//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use num_enum::TryFromPrimitive;

include!(concat!(env!("OUT_DIR"), "/ua.rs"));

pub(crate) fn sdk_version() -> &'static str {
    SDK_VERSION
}

pub(crate) fn user_agent() -> &'static str {
    USER_AGENT
}

/// Enumeration of all possible errors returned by this library.
#[derive(Debug, Clone)]
pub struct HBaseError {
    pub code: HBaseErrorCode,
    pub message: String,
}

/// Broad classification of an [`HBaseError`].
///
/// This allows callers to branch on the kind of failure without matching
/// on message strings.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ErrorKind {
    /// The request could not be attempted: bad arguments, the table already
    /// exists, the handle was closed, etc. Retrying the same call will fail again.
    Precondition,
    /// The store or the network failed while carrying out the request.
    Transport,
    /// A stored value could not be converted to its requested display type.
    Decode,
}

impl std::error::Error for HBaseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl std::fmt::Display for HBaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        return write!(f, "code={:?} message=\"{}\"", self.code, self.message);
    }
}

impl HBaseError {
    pub fn new(code: HBaseErrorCode, msg: &str) -> HBaseError {
        HBaseError {
            code,
            message: msg.to_string(),
        }
    }

    pub fn from_int(icode: i32, msg: &str) -> HBaseError {
        if let Ok(code) = HBaseErrorCode::try_from(icode) {
            return HBaseError {
                code: code,
                message: msg.to_string(),
            };
        }
        HBaseError {
            code: HBaseErrorCode::UnknownError,
            message: format!("Invalid integer error code {}", icode),
        }
    }

    /// Classify this error as a precondition, transport or decode failure.
    pub fn kind(&self) -> ErrorKind {
        self.code.kind()
    }
}

macro_rules! ia_error {
    ($($t:tt)*) => {{
        let m = format!($($t)*);
        HBaseError {
            code: crate::error::HBaseErrorCode::IllegalArgument,
            message: format!("{} ({})", m, crate::error::sdk_version()),
        }
    }};
}

pub(crate) use ia_error;

macro_rules! ia_err {
    ($($t:tt)*) => {{
        let m = format!($($t)*);
        Err(HBaseError {
            code: crate::error::HBaseErrorCode::IllegalArgument,
            message: format!("{} ({})", m, crate::error::sdk_version()),
        })
    }};
}

pub(crate) use ia_err;

impl From<reqwest::Error> for HBaseError {
    fn from(e: reqwest::Error) -> Self {
        let mut code = HBaseErrorCode::ServerError;
        if e.is_timeout() {
            code = HBaseErrorCode::RequestTimeout;
        } else if e.is_connect() {
            code = HBaseErrorCode::ServiceUnavailable;
        }
        HBaseError {
            code: code,
            message: format!(
                "reqwest error: {} ({})",
                e.to_string(),
                crate::error::sdk_version()
            ),
        }
    }
}

impl From<reqwest::header::InvalidHeaderValue> for HBaseError {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
        ia_error!("invalid header value: {}", e.to_string())
    }
}

impl From<url::ParseError> for HBaseError {
    fn from(e: url::ParseError) -> Self {
        ia_error!("error parsing url: {}", e.to_string())
    }
}

impl From<serde_json::Error> for HBaseError {
    fn from(e: serde_json::Error) -> Self {
        HBaseError::new(
            HBaseErrorCode::BadProtocolMessage,
            &format!("invalid json from store: {}", e.to_string()),
        )
    }
}

impl From<base64::DecodeError> for HBaseError {
    fn from(e: base64::DecodeError) -> Self {
        HBaseError::new(
            HBaseErrorCode::BadProtocolMessage,
            &format!("invalid base64 from store: {}", e.to_string()),
        )
    }
}

impl From<ini::Error> for HBaseError {
    fn from(e: ini::Error) -> Self {
        ia_error!("error reading config file: {}", e.to_string())
    }
}

impl From<std::io::Error> for HBaseError {
    fn from(e: std::io::Error) -> Self {
        ia_error!("i/o error: {}", e.to_string())
    }
}

// HBaseErrorCode represents the error code.
// Error codes are divided into categories as follows:
//
// 1. Precondition violations, range from 1 to 50(exclusive).
// These include illegal arguments, tables or namespaces that already exist
// or do not exist, and use of a closed handle.
//
// 2. Decode failures, range from 50 to 100(exclusive).
//
// 3. Transport and store failures, range from 100 and up. These are passed
// through to the caller unchanged; this library never retries them.
//
#[derive(Debug, Clone, Copy, Eq, PartialEq, TryFromPrimitive)]
#[repr(i32)]
pub enum HBaseErrorCode {
    /// NoError represents there is no error.
    NoError = 0,

    /// IllegalArgument error represents the application provided an illegal
    /// argument for the operation.
    IllegalArgument = 1,

    /// TableExists error represents the operation attempted to create a table
    /// but the named table already exists.
    TableExists = 2,

    /// TableNotFound error represents the operation attempted to access a table
    /// that does not exist.
    TableNotFound = 3,

    /// NamespaceExists error represents the operation attempted to create a
    /// namespace that already exists.
    NamespaceExists = 4,

    /// NamespaceNotFound error represents the operation attempted to access a
    /// namespace that does not exist.
    NamespaceNotFound = 5,

    /// TableNotEnabled error represents a data operation on a disabled table.
    TableNotEnabled = 6,

    /// TableNotDisabled error represents a schema operation that requires
    /// the table to be disabled first.
    TableNotDisabled = 7,

    /// IllegalState error represents use of a handle that has been closed.
    IllegalState = 8,

    /// OperationNotSupported error represents the operation attempted is not
    /// supported by the configured store.
    OperationNotSupported = 9,

    /// DataConversion error represents a stored value that could not be
    /// decoded as its requested display type.
    DataConversion = 50,

    /// RequestTimeout error represents the request did not complete before
    /// the configured rpc or operation timeout elapsed.
    RequestTimeout = 100,

    /// ServerError represents an internal problem reported by the store.
    ServerError = 101,

    /// ServiceUnavailable error represents the store could not be reached.
    ServiceUnavailable = 102,

    /// BadProtocolMessage error represents a response from the store that
    /// could not be understood.
    BadProtocolMessage = 103,

    /// UnknownError represents an unknown error has occurred on the server.
    UnknownError = 125,
}

impl HBaseErrorCode {
    pub fn kind(&self) -> ErrorKind {
        let c = *self as i32;
        if c < 50 {
            ErrorKind::Precondition
        } else if c < 100 {
            ErrorKind::Decode
        } else {
            ErrorKind::Transport
        }
    }
}
