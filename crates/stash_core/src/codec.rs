use tracing::{debug, trace};

use crate::container::{HEADER_LEN, SlotEntry, StashContainer};
use crate::cursor::{ByteCursor, ByteSink};
use crate::error::{HexLayer, Result, StashError};
use crate::hex_text;
use crate::item::{DEFAULT_ITEM_CAPACITY, ItemRecord, RealItem};
use crate::layout::{BlobLayout, SectionId};

/// Zero-filled bytes trailing every slot record.
pub const PADDING_LEN: usize = 12;
/// Outer blob scratch budget used by the game's own writer.
pub const DEFAULT_BLOB_CAPACITY: usize = 1024 * 1024;

const SLOT_PREFIX_LEN: usize = 8;

/// Capacity limits applied while encoding. `None` lets the buffer grow freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    pub item_capacity: Option<usize>,
    pub blob_capacity: Option<usize>,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            item_capacity: Some(DEFAULT_ITEM_CAPACITY),
            blob_capacity: Some(DEFAULT_BLOB_CAPACITY),
        }
    }
}

impl CodecOptions {
    pub fn unbounded() -> Self {
        Self {
            item_capacity: None,
            blob_capacity: None,
        }
    }

    pub fn with_item_capacity(mut self, capacity: Option<usize>) -> Self {
        self.item_capacity = capacity;
        self
    }

    pub fn with_blob_capacity(mut self, capacity: Option<usize>) -> Self {
        self.blob_capacity = capacity;
        self
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StashCodec {
    options: CodecOptions,
}

impl StashCodec {
    pub fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Decodes line 1 of a stash file.
    pub fn decode_text(
        &self,
        hex: &str,
        version: impl Into<String>,
        slot_count: impl Into<String>,
    ) -> Result<StashContainer> {
        let blob = hex_text::decode(HexLayer::Blob, hex)?;
        self.decode_blob(&blob, version, slot_count)
    }

    pub fn decode_blob(
        &self,
        blob: &[u8],
        version: impl Into<String>,
        slot_count: impl Into<String>,
    ) -> Result<StashContainer> {
        self.decode_with_layout(blob, version, slot_count)
            .map(|(container, _)| container)
    }

    pub fn decode_with_layout(
        &self,
        blob: &[u8],
        version: impl Into<String>,
        slot_count: impl Into<String>,
    ) -> Result<(StashContainer, BlobLayout)> {
        let mut r = ByteCursor::new(blob);
        let mut layout = BlobLayout::new(blob.len());

        let header = r.read_array::<HEADER_LEN>("stash header")?;
        layout.record(SectionId::Header, 0, HEADER_LEN);

        let mut container = StashContainer::new(header, version, slot_count);
        while !r.is_exhausted() {
            let position = container.slots.len();
            let slot = decode_slot(&mut r, position, &mut layout).map_err(|e| e.in_slot(position))?;
            container.slots.push(slot);
        }

        debug!(
            blob_len = blob.len(),
            slots = container.slots.len(),
            occupied = container.occupied_count(),
            "decoded stash blob"
        );
        Ok((container, layout))
    }

    pub fn encode_text(&self, container: &StashContainer) -> Result<String> {
        self.encode_blob(container).map(hex_text::encode)
    }

    /// Padding is always written as zeros; whatever the source held is dropped.
    pub fn encode_blob(&self, container: &StashContainer) -> Result<Vec<u8>> {
        let mut out = ByteSink::new("stash blob", self.options.blob_capacity);
        out.write_bytes(&container.header)?;
        for (position, slot) in container.slots.iter().enumerate() {
            self.encode_slot(&mut out, slot)
                .map_err(|e| e.in_slot(position))?;
        }
        debug!(
            blob_len = out.len(),
            slots = container.slots.len(),
            "encoded stash blob"
        );
        Ok(out.into_bytes())
    }

    fn encode_slot(&self, out: &mut ByteSink, slot: &SlotEntry) -> Result<()> {
        out.write_i32(slot.slot_index)?;
        match &slot.payload {
            ItemRecord::Empty => out.write_i32(0)?,
            ItemRecord::Real(item) => {
                let payload = item.encode_payload(self.options.item_capacity)?;
                let len = i32::try_from(payload.len()).map_err(|_| StashError::BufferOverflow {
                    what: "item payload",
                    capacity: i32::MAX as usize,
                    required: payload.len(),
                })?;
                out.write_i32(len)?;
                out.write_bytes(payload.as_bytes())?;
            }
        }
        out.write_bytes(&[0u8; PADDING_LEN])
    }
}

fn decode_slot(
    r: &mut ByteCursor<'_>,
    position: usize,
    layout: &mut BlobLayout,
) -> Result<SlotEntry> {
    let start = r.position();
    let slot_index = r.read_i32()?;
    let declared = r.read_i32()?;
    let payload_len = usize::try_from(declared)
        .map_err(|_| StashError::truncated("item payload", 0, r.remaining()))?;
    layout.record(SectionId::SlotPrefix(position), start, start + SLOT_PREFIX_LEN);

    let payload = if payload_len > 0 {
        let payload_start = r.position();
        let text = r.read_bytes("item payload", payload_len)?;
        layout.record(
            SectionId::Payload(position),
            payload_start,
            payload_start + payload_len,
        );
        ItemRecord::Real(RealItem::decode_payload(text)?)
    } else {
        ItemRecord::Empty
    };

    let padding_start = r.position();
    r.skip("slot padding", PADDING_LEN)?;
    layout.record(
        SectionId::Padding(position),
        padding_start,
        padding_start + PADDING_LEN,
    );

    trace!(
        position,
        slot_index,
        payload_len,
        name = payload.display_name(),
        "decoded slot"
    );
    Ok(SlotEntry {
        slot_index,
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::{CodecOptions, StashCodec};
    use crate::container::{SlotEntry, StashContainer};
    use crate::error::StashError;

    #[test]
    fn header_only_blob_has_no_slots() {
        let codec = StashCodec::default();
        let container = codec.decode_blob(&[7u8; 12], "1", "0").unwrap();
        assert_eq!(container.header, [7u8; 12]);
        assert!(container.slots.is_empty());
    }

    #[test]
    fn short_header_is_truncated() {
        let codec = StashCodec::default();
        let err = codec.decode_blob(&[0u8; 11], "1", "0").unwrap_err();
        assert!(matches!(err, StashError::TruncatedData { .. }));
    }

    #[test]
    fn negative_payload_length_is_rejected() {
        let mut blob = vec![0u8; 12];
        blob.extend_from_slice(&1i32.to_le_bytes());
        blob.extend_from_slice(&(-4i32).to_le_bytes());
        blob.extend_from_slice(&[0u8; 12]);
        let err = StashCodec::default().decode_blob(&blob, "1", "1").unwrap_err();
        assert!(matches!(
            err.root(),
            StashError::TruncatedData {
                what: "item payload",
                ..
            }
        ));
    }

    #[test]
    fn blob_capacity_is_enforced() {
        let mut container = StashContainer::new([0u8; 12], "1", "4");
        for i in 0..4 {
            container.slots.push(SlotEntry::empty(i));
        }
        let codec = StashCodec::new(CodecOptions::default().with_blob_capacity(Some(12 + 2 * 20)));
        let err = codec.encode_blob(&container).unwrap_err();
        assert!(matches!(
            err.root(),
            StashError::BufferOverflow {
                what: "stash blob",
                ..
            }
        ));
        assert!(matches!(err, StashError::Slot { position: 2, .. }));
    }
}
