//! Add-in errors, status codes, and the last-error slot

use std::cell::RefCell;

use thiserror::Error;

use crate::handles::Handle;

/// Result type for add-in functions
pub type AddinResult<T> = std::result::Result<T, AddinError>;

/// Errors raised by worksheet functions
#[derive(Debug, Error)]
pub enum AddinError {
    /// The handle names no live database or statement
    #[error("Invalid handle: {0}")]
    InvalidHandle(Handle),

    /// An argument has the wrong shape or type
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Failure inside the grid/SQL layer
    #[error("{0}")]
    Sql(#[from] sheetsql::Error),

    /// The registry lock was poisoned by a panic in another call
    #[error("Internal error")]
    Internal,
}

impl From<rusqlite::Error> for AddinError {
    fn from(e: rusqlite::Error) -> Self {
        AddinError::Sql(sheetsql::Error::Sqlite(e))
    }
}

impl AddinError {
    pub fn argument<S: Into<String>>(msg: S) -> Self {
        AddinError::InvalidArgument(msg.into())
    }

    /// Status code for this error
    pub fn code(&self) -> i32 {
        match self {
            AddinError::InvalidHandle(_) => SQL_ERR_INVALID_HANDLE,
            AddinError::InvalidArgument(_) => SQL_ERR_INVALID_ARGUMENT,
            AddinError::Internal => SQL_ERR_INTERNAL,
            AddinError::Sql(e) => match e {
                sheetsql::Error::Sqlite(_) => SQL_ERR_ENGINE,
                sheetsql::Error::ShapeMismatch(_) | sheetsql::Error::MissingData(_) => {
                    SQL_ERR_SHAPE
                }
                sheetsql::Error::InvalidValue(_) => SQL_ERR_BIND_TYPE,
                sheetsql::Error::UnknownTable(_) => SQL_ERR_ENGINE,
                sheetsql::Error::Core(_) => SQL_ERR_INVALID_ARGUMENT,
            },
        }
    }
}

// Success
pub const SQL_OK: i32 = 0;

// General errors
pub const SQL_ERR_INVALID_HANDLE: i32 = -2;
pub const SQL_ERR_INTERNAL: i32 = -3;

// Engine errors
pub const SQL_ERR_ENGINE: i32 = -10;

// Argument errors
pub const SQL_ERR_INVALID_ARGUMENT: i32 = -31;
pub const SQL_ERR_SHAPE: i32 = -32;
pub const SQL_ERR_BIND_TYPE: i32 = -33;

/// Get the message for a status code
pub fn status_message(code: i32) -> &'static str {
    match code {
        SQL_OK => "Success",
        SQL_ERR_INVALID_HANDLE => "Invalid handle",
        SQL_ERR_INTERNAL => "Internal error",
        SQL_ERR_ENGINE => "SQL engine error",
        SQL_ERR_INVALID_ARGUMENT => "Invalid argument",
        SQL_ERR_SHAPE => "Data shape mismatch",
        SQL_ERR_BIND_TYPE => "Value cannot be bound",
        _ => "Unknown error",
    }
}

thread_local! {
    static LAST_ERROR: RefCell<Option<(i32, String)>> = RefCell::new(None);
    static LAST_WARNING: RefCell<Option<String>> = RefCell::new(None);
}

/// Record a failure as the calling thread's last error and log it
pub(crate) fn set_last_error(function: &str, err: &AddinError) {
    let message = format!("{function}: {err}");
    log::error!("{message}");
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some((err.code(), message)));
}

pub(crate) fn clear_last_error() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}

/// Settle a call: clear the last error on success, or record it and
/// return `fallback`
pub(crate) fn finish<T>(function: &str, result: AddinResult<T>, fallback: T) -> T {
    match result {
        Ok(value) => {
            clear_last_error();
            value
        }
        Err(err) => {
            set_last_error(function, &err);
            fallback
        }
    }
}

/// Message of the last failed call on this thread, if the last call failed
pub fn last_error() -> Option<String> {
    LAST_ERROR.with(|slot| slot.borrow().as_ref().map(|(_, msg)| msg.clone()))
}

pub(crate) fn set_last_warning(message: Option<String>) {
    LAST_WARNING.with(|slot| *slot.borrow_mut() = message);
}

/// Warning raised by the last `SQL.EXEC` on this thread, such as bind
/// names that matched no parameter
pub fn last_warning() -> Option<String> {
    LAST_WARNING.with(|slot| slot.borrow().clone())
}

/// Status code of the last call on this thread
pub fn last_status() -> i32 {
    LAST_ERROR.with(|slot| slot.borrow().as_ref().map_or(SQL_OK, |(code, _)| *code))
}
