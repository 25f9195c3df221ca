use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

use tracing::debug;

use crate::attribute::{Attribute, AttributeValue};
use crate::codec::{CodecOptions, StashCodec};
use crate::container::StashContainer;
use crate::error::{HexLayer, StashError};
use crate::file::StashFile;
use crate::hex_text;
use crate::layout::BlobLayout;

use super::error::{CoreError, CoreErrorCode};
use super::types::{AttributeEntry, AttributeKind, SlotSummary, Snapshot};

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine {
    codec: StashCodec,
}

/// A loaded stash plus the codec settings it will be saved with.
#[derive(Debug)]
pub struct Session {
    codec: StashCodec,
    container: StashContainer,
    layout: BlobLayout,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CodecOptions) -> Self {
        Self {
            codec: StashCodec::new(options),
        }
    }

    pub fn open_path(&self, path: impl AsRef<Path>) -> Result<Session, CoreError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to open {}: {e}", path.display()),
            )
        })?;
        self.open_reader(BufReader::new(file))
    }

    pub fn open_text(&self, text: &str) -> Result<Session, CoreError> {
        self.open_reader(Cursor::new(text))
    }

    pub fn open_reader<R: BufRead>(&self, reader: R) -> Result<Session, CoreError> {
        let file = StashFile::read(reader).map_err(CoreError::from_decode)?;
        let blob = hex_text::decode(HexLayer::Blob, &file.blob_hex)
            .map_err(CoreError::from_decode)?;
        let (container, layout) = self
            .codec
            .decode_with_layout(&blob, file.version, file.slot_count)
            .map_err(CoreError::from_decode)?;
        Ok(Session {
            codec: self.codec,
            container,
            layout,
        })
    }
}

impl Session {
    pub fn container(&self) -> &StashContainer {
        &self.container
    }

    /// Byte layout of the blob as it was loaded.
    pub fn layout(&self) -> &BlobLayout {
        &self.layout
    }

    pub fn snapshot(&self) -> Snapshot {
        let total_slots = self.container.slots.len();
        let occupied_slots = self.container.occupied_count();
        Snapshot {
            version: self.container.version.clone(),
            slot_count: self.container.slot_count.clone(),
            header_hex: hex_text::encode(self.container.header),
            total_slots,
            occupied_slots,
            empty_slots: total_slots - occupied_slots,
        }
    }

    pub fn slots(&self) -> Vec<SlotSummary> {
        self.container
            .slots
            .iter()
            .enumerate()
            .map(|(position, slot)| {
                let item = slot.item();
                SlotSummary {
                    position,
                    slot_index: slot.slot_index,
                    empty: item.is_none(),
                    name: slot.payload.display_name().to_string(),
                    field1: item.map(|i| i.field1),
                    field2: item.map(|i| i.field2),
                    attribute_count: slot.payload.attributes().len(),
                }
            })
            .collect()
    }

    pub fn attributes(&self, position: usize) -> Result<Vec<AttributeEntry>, CoreError> {
        let slot = self
            .container
            .slot(position)
            .ok_or_else(|| slot_not_found(position, self.container.slots.len()))?;
        Ok(slot
            .payload
            .attributes()
            .iter()
            .enumerate()
            .map(|(index, attribute)| attribute_entry(index, attribute))
            .collect())
    }

    /// Applies editor text to the named attribute of the slot at `position`,
    /// keeping the attribute's existing kind.
    pub fn set_attribute_value(
        &mut self,
        position: usize,
        name: &str,
        input: &str,
    ) -> Result<(), CoreError> {
        let slot_len = self.container.slots.len();
        let slot = self
            .container
            .slot_mut(position)
            .ok_or_else(|| slot_not_found(position, slot_len))?;
        let item = slot.item_mut().ok_or_else(|| {
            CoreError::new(
                CoreErrorCode::NotFound,
                format!("slot {position} is empty"),
            )
        })?;
        let attribute = item.attribute_mut(name).ok_or_else(|| {
            CoreError::new(
                CoreErrorCode::NotFound,
                format!("slot {position} has no attribute '{name}'"),
            )
        })?;
        attribute.set_value_from_text(input)?;
        debug!(position, name, value = %attribute.value().display_text(), "edited attribute");
        Ok(())
    }

    pub fn to_text(&self) -> Result<String, CoreError> {
        let file = StashFile::encode(&self.container, &self.codec).map_err(CoreError::from_encode)?;
        let mut out = Vec::new();
        file.write(&mut out).map_err(CoreError::from_encode)?;
        String::from_utf8(out).map_err(|e| {
            CoreError::from_encode(StashError::InvalidText {
                what: "stash file",
                source: e,
            })
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CoreError> {
        StashFile::save(&self.container, path, &self.codec).map_err(CoreError::from_encode)
    }
}

fn slot_not_found(position: usize, len: usize) -> CoreError {
    CoreError::new(
        CoreErrorCode::NotFound,
        format!("slot {position} out of range (stash has {len} slots)"),
    )
}

fn attribute_entry(index: usize, attribute: &Attribute) -> AttributeEntry {
    let value = attribute.value();
    let kind = match value {
        AttributeValue::Number(_) => AttributeKind::Number,
        AttributeValue::Text(_) => AttributeKind::Text,
    };
    AttributeEntry {
        index,
        tag: attribute.tag,
        name: attribute.name.clone(),
        kind,
        number: value.as_number(),
        text: value.as_text().map(str::to_string),
        display: value.display_text(),
    }
}
