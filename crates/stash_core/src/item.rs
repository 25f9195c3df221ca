use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::attribute::Attribute;
use crate::cursor::{ByteCursor, ByteSink};
use crate::error::{HexLayer, Result};
use crate::hex_text;

/// Attribute whose text value names an item.
pub const NAME_ATTRIBUTE: &str = "name";
/// Shown for items without a textual `name` attribute.
pub const UNNAMED_PLACEHOLDER: &str = "<None>";
/// Raw item scratch budget used by the game's own writer.
pub const DEFAULT_ITEM_CAPACITY: usize = 4000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealItem {
    pub field1: i32,
    pub field2: i32,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemRecord {
    Real(RealItem),
    Empty,
}

impl RealItem {
    pub fn new(field1: i32, field2: i32) -> Self {
        Self {
            field1,
            field2,
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Parses a raw item sub-blob. Attributes run to the end of the buffer.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut r = ByteCursor::new(bytes);
        let field1 = r.read_i32()?;
        let field2 = r.read_i32()?;
        let mut attributes = Vec::new();
        while !r.is_exhausted() {
            attributes.push(Attribute::decode(&mut r)?);
        }
        Ok(Self {
            field1,
            field2,
            attributes,
        })
    }

    /// Hex-decodes an embedded payload, then parses it.
    pub fn decode_payload(payload: &[u8]) -> Result<Self> {
        let raw = hex_text::decode(HexLayer::ItemPayload, payload)?;
        Self::decode(&raw)
    }

    pub fn encode_raw(&self, capacity: Option<usize>) -> Result<Vec<u8>> {
        let mut out = ByteSink::new("item", capacity);
        out.write_i32(self.field1)?;
        out.write_i32(self.field2)?;
        for attribute in &self.attributes {
            attribute.encode(&mut out)?;
        }
        debug!(
            size = out.len(),
            attributes = self.attributes.len(),
            "encoded item"
        );
        Ok(out.into_bytes())
    }

    /// Raw encoding wrapped in the second hex layer, as stored in a slot.
    pub fn encode_payload(&self, capacity: Option<usize>) -> Result<String> {
        self.encode_raw(capacity).map(hex_text::encode)
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn attribute_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.attributes.iter_mut().find(|a| a.name == name)
    }

    pub fn name(&self) -> &str {
        self.attribute(NAME_ATTRIBUTE)
            .and_then(|a| a.value().as_text())
            .unwrap_or(UNNAMED_PLACEHOLDER)
    }
}

impl ItemRecord {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn as_real(&self) -> Option<&RealItem> {
        match self {
            Self::Real(item) => Some(item),
            Self::Empty => None,
        }
    }

    pub fn as_real_mut(&mut self) -> Option<&mut RealItem> {
        match self {
            Self::Real(item) => Some(item),
            Self::Empty => None,
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        match self {
            Self::Real(item) => &item.attributes,
            Self::Empty => &[],
        }
    }

    pub fn attributes_mut(&mut self) -> &mut [Attribute] {
        match self {
            Self::Real(item) => &mut item.attributes,
            Self::Empty => &mut [],
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Self::Real(item) => item.name(),
            Self::Empty => UNNAMED_PLACEHOLDER,
        }
    }
}

impl From<RealItem> for ItemRecord {
    fn from(item: RealItem) -> Self {
        Self::Real(item)
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_ITEM_CAPACITY, ItemRecord, RealItem, UNNAMED_PLACEHOLDER};
    use crate::attribute::{Attribute, AttributeValue};
    use crate::error::{HexLayer, StashError};

    fn sword() -> RealItem {
        RealItem::new(1, 2)
            .with_attribute(Attribute::new(0, "name", AttributeValue::Text("Sword".into())))
            .with_attribute(Attribute::new(7, "damage", AttributeValue::Number(12.5)))
    }

    #[test]
    fn item_without_attributes_is_two_fields() {
        let item = RealItem::new(-1, 0x7fff_ffff);
        let raw = item.encode_raw(Some(DEFAULT_ITEM_CAPACITY)).unwrap();
        assert_eq!(raw.len(), 8);
        assert_eq!(RealItem::decode(&raw).unwrap(), item);
    }

    #[test]
    fn payload_is_lowercase_hex_of_raw_bytes() {
        let item = sword();
        let raw = item.encode_raw(None).unwrap();
        let payload = item.encode_payload(None).unwrap();
        assert_eq!(payload.len(), raw.len() * 2);
        assert!(payload.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
        assert_eq!(RealItem::decode_payload(payload.as_bytes()).unwrap(), item);
    }

    #[test]
    fn attribute_order_is_preserved() {
        let item = sword();
        let decoded = RealItem::decode(&item.encode_raw(None).unwrap()).unwrap();
        let names: Vec<&str> = decoded.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["name", "damage"]);
    }

    #[test]
    fn sub_blob_shorter_than_fields_is_truncated() {
        let err = RealItem::decode(&[1, 0, 0, 0, 2]).unwrap_err();
        assert!(matches!(err, StashError::TruncatedData { .. }));
    }

    #[test]
    fn partial_trailing_attribute_is_truncated() {
        let mut raw = sword().encode_raw(None).unwrap();
        raw.truncate(raw.len() - 3);
        assert!(matches!(
            RealItem::decode(&raw),
            Err(StashError::TruncatedData { .. })
        ));
    }

    #[test]
    fn odd_payload_is_invalid_hex() {
        let err = RealItem::decode_payload(b"0100000").unwrap_err();
        assert!(matches!(
            err,
            StashError::InvalidHex {
                layer: HexLayer::ItemPayload,
                ..
            }
        ));
    }

    #[test]
    fn oversized_item_fails_instead_of_truncating() {
        let item = RealItem::new(1, 2).with_attribute(Attribute::new(
            0,
            "lore",
            AttributeValue::Text("x".repeat(DEFAULT_ITEM_CAPACITY)),
        ));
        let err = item.encode_payload(Some(DEFAULT_ITEM_CAPACITY)).unwrap_err();
        assert!(matches!(
            err,
            StashError::BufferOverflow {
                capacity: DEFAULT_ITEM_CAPACITY,
                ..
            }
        ));
        assert!(item.encode_payload(None).is_ok());
    }

    #[test]
    fn name_falls_back_to_placeholder() {
        assert_eq!(sword().name(), "Sword");

        let numeric_name = RealItem::new(0, 0)
            .with_attribute(Attribute::new(0, "name", AttributeValue::Number(4.0)));
        assert_eq!(numeric_name.name(), UNNAMED_PLACEHOLDER);
        assert_eq!(RealItem::new(0, 0).name(), UNNAMED_PLACEHOLDER);
        assert_eq!(ItemRecord::Empty.display_name(), UNNAMED_PLACEHOLDER);
    }

    #[test]
    fn empty_record_has_no_attributes() {
        let mut empty = ItemRecord::Empty;
        assert!(empty.is_empty());
        assert!(empty.attributes().is_empty());
        assert!(empty.attributes_mut().is_empty());
        assert!(empty.as_real().is_none());
    }
}
