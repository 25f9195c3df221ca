use std::fmt;
use std::io;
use std::string::FromUtf8Error;

/// Which of the two hex passes a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HexLayer {
    /// Line 1 of the stash file, the outer blob.
    Blob,
    /// Hex text embedded in a slot record, the item sub-blob.
    ItemPayload,
}

impl fmt::Display for HexLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blob => f.write_str("stash blob"),
            Self::ItemPayload => f.write_str("item payload"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StashError {
    #[error("invalid hex in {layer}: {source}")]
    InvalidHex {
        layer: HexLayer,
        #[source]
        source: hex::FromHexError,
    },

    #[error("truncated data reading {what}: need {needed} bytes, {available} available")]
    TruncatedData {
        what: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("unknown attribute type: {0}")]
    UnknownAttributeType(i32),

    #[error("{what} buffer overflow: {required} bytes exceed capacity of {capacity}")]
    BufferOverflow {
        what: &'static str,
        capacity: usize,
        required: usize,
    },

    #[error("stash file is missing line {line}")]
    MissingMetadataLine { line: usize },

    #[error("{what} is not valid UTF-8")]
    InvalidText {
        what: &'static str,
        #[source]
        source: FromUtf8Error,
    },

    #[error("slot {position}: {source}")]
    Slot {
        position: usize,
        #[source]
        source: Box<StashError>,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl StashError {
    pub(crate) fn truncated(what: &'static str, needed: usize, available: usize) -> Self {
        Self::TruncatedData {
            what,
            needed,
            available,
        }
    }

    pub(crate) fn in_slot(self, position: usize) -> Self {
        Self::Slot {
            position,
            source: Box::new(self),
        }
    }

    /// Strips `Slot` context wrappers down to the underlying failure.
    pub fn root(&self) -> &StashError {
        match self {
            Self::Slot { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Rejected edits to an attribute value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("attribute '{name}' holds a {expected} value, got {found}")]
    KindMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("attribute '{name}' is numeric; '{input}' is not a number")]
    InvalidNumber { name: String, input: String },
}

pub type Result<T, E = StashError> = std::result::Result<T, E>;
