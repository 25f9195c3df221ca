use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: String,
    pub slot_count: String,
    pub header_hex: String,
    pub total_slots: usize,
    pub occupied_slots: usize,
    pub empty_slots: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlotSummary {
    pub position: usize,
    pub slot_index: i32,
    pub empty: bool,
    pub name: String,
    pub field1: Option<i32>,
    pub field2: Option<i32>,
    pub attribute_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeKind {
    Number,
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeEntry {
    pub index: usize,
    pub tag: i32,
    pub name: String,
    pub kind: AttributeKind,
    pub number: Option<f64>,
    pub text: Option<String>,
    /// Value as the editor shows it.
    pub display: String,
}
