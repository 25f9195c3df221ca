//! Reader and writer for Chronicon `.stash` files.
//!
//! A stash file is three text lines: the hex of an outer binary blob, a
//! format version and a slot count. The blob holds a 12-byte opaque header
//! and a run of slot records; each occupied slot embeds its item as a second,
//! independent layer of hex text.

pub mod attribute;
pub mod codec;
pub mod container;
pub mod core_api;
pub mod cursor;
pub mod error;
pub mod file;
pub mod hex_text;
pub mod item;
pub mod layout;

use std::path::Path;

pub use attribute::{Attribute, AttributeValue};
pub use codec::{CodecOptions, StashCodec};
pub use container::{SlotEntry, StashContainer};
pub use error::{EditError, HexLayer, Result, StashError};
pub use file::StashFile;
pub use item::{ItemRecord, RealItem};

/// Loads a stash file with the default capacity limits.
pub fn load(path: impl AsRef<Path>) -> Result<StashContainer> {
    StashFile::load(path, &StashCodec::default())
}

/// Saves a stash file with the default capacity limits.
pub fn save(container: &StashContainer, path: impl AsRef<Path>) -> Result<()> {
    StashFile::save(container, path, &StashCodec::default())
}
