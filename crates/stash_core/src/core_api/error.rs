use std::error::Error;
use std::fmt;

use crate::error::{EditError, StashError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreErrorCode {
    Io,
    Parse,
    Encode,
    InvalidEdit,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreError {
    pub code: CoreErrorCode,
    pub message: String,
}

impl CoreError {
    pub fn new(code: CoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub(crate) fn from_decode(err: StashError) -> Self {
        let code = match err.root() {
            StashError::Io(_) => CoreErrorCode::Io,
            _ => CoreErrorCode::Parse,
        };
        Self::new(code, format!("failed to load stash: {err}"))
    }

    pub(crate) fn from_encode(err: StashError) -> Self {
        let code = match err.root() {
            StashError::Io(_) => CoreErrorCode::Io,
            _ => CoreErrorCode::Encode,
        };
        Self::new(code, format!("failed to save stash: {err}"))
    }
}

impl From<EditError> for CoreError {
    fn from(err: EditError) -> Self {
        Self::new(CoreErrorCode::InvalidEdit, err.to_string())
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl Error for CoreError {}
