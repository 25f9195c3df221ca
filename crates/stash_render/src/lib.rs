use std::fmt::Write as _;

use serde_json::{Map as JsonMap, Value as JsonValue};
use stash_core::core_api::{AttributeEntry, AttributeKind, CoreError, Session, SlotSummary};
use stash_core::layout::{BlobLayout, SectionId};

const POSITION_COL_WIDTH: usize = 5;
const INDEX_COL_WIDTH: usize = 8;
const NAME_COL_WIDTH: usize = 32;
const ATTR_NAME_COL_WIDTH: usize = 24;
const ATTR_KIND_COL_WIDTH: usize = 6;
const EMPTY_SLOT_LABEL: &str = "<empty>";

pub fn render_json_full(session: &Session) -> JsonValue {
    let snapshot = session.snapshot();
    let mut out = JsonMap::new();
    out.insert("version".to_string(), JsonValue::String(snapshot.version));
    out.insert(
        "slot_count".to_string(),
        JsonValue::String(snapshot.slot_count),
    );
    out.insert("header".to_string(), JsonValue::String(snapshot.header_hex));
    out.insert(
        "occupied_slots".to_string(),
        JsonValue::from(snapshot.occupied_slots),
    );
    out.insert(
        "empty_slots".to_string(),
        JsonValue::from(snapshot.empty_slots),
    );

    let slots = session
        .slots()
        .iter()
        .map(|slot| slot_to_json(session, slot))
        .collect();
    out.insert("slots".to_string(), JsonValue::Array(slots));
    JsonValue::Object(out)
}

pub fn render_json_slot(session: &Session, position: usize) -> Result<JsonValue, CoreError> {
    // attributes() validates the position before we index the summaries.
    session.attributes(position)?;
    let slots = session.slots();
    Ok(slot_to_json(session, &slots[position]))
}

pub fn render_json_layout(layout: &BlobLayout) -> JsonValue {
    let sections = layout
        .sections
        .iter()
        .map(|section| {
            let mut obj = JsonMap::new();
            obj.insert(
                "section".to_string(),
                JsonValue::String(section_label(section.id)),
            );
            obj.insert("start".to_string(), JsonValue::from(section.range.start));
            obj.insert("end".to_string(), JsonValue::from(section.range.end));
            obj.insert("len".to_string(), JsonValue::from(section.range.len()));
            JsonValue::Object(obj)
        })
        .collect();

    let mut out = JsonMap::new();
    out.insert("blob_len".to_string(), JsonValue::from(layout.blob_len));
    out.insert(
        "section_count".to_string(),
        JsonValue::from(layout.sections.len()),
    );
    out.insert("sections".to_string(), JsonValue::Array(sections));
    JsonValue::Object(out)
}

/// One line per slot: position, opaque slot index and item name.
pub fn render_slot_table(session: &Session) -> String {
    let snapshot = session.snapshot();
    let mut out = String::new();
    writeln!(
        &mut out,
        "Stash version {}  slots {}  ({} occupied, {} empty)",
        snapshot.version, snapshot.slot_count, snapshot.occupied_slots, snapshot.empty_slots
    )
    .expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");
    writeln!(
        &mut out,
        "{:>pw$}  {:>iw$}  {}",
        "Pos",
        "Index",
        "Item",
        pw = POSITION_COL_WIDTH,
        iw = INDEX_COL_WIDTH
    )
    .expect("writing to String cannot fail");

    for slot in session.slots() {
        let label = if slot.empty {
            EMPTY_SLOT_LABEL.to_string()
        } else {
            fit_column(&slot.name, NAME_COL_WIDTH)
        };
        writeln!(
            &mut out,
            "{:>pw$}  {:>iw$}  {}",
            slot.position,
            slot.slot_index,
            label,
            pw = POSITION_COL_WIDTH,
            iw = INDEX_COL_WIDTH
        )
        .expect("writing to String cannot fail");
    }
    out
}

pub fn render_item_sheet(session: &Session, position: usize) -> Result<String, CoreError> {
    let attributes = session.attributes(position)?;
    let slots = session.slots();
    let slot = &slots[position];

    let mut out = String::new();
    writeln!(
        &mut out,
        " ::: Slot {} (index {}) :::",
        slot.position, slot.slot_index
    )
    .expect("writing to String cannot fail");

    if slot.empty {
        writeln!(&mut out, "  {EMPTY_SLOT_LABEL}").expect("writing to String cannot fail");
        return Ok(out);
    }

    writeln!(&mut out, "  Name: {}", slot.name).expect("writing to String cannot fail");
    writeln!(
        &mut out,
        "  Fields: {} / {}",
        slot.field1.unwrap_or_default(),
        slot.field2.unwrap_or_default()
    )
    .expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");

    for attribute in &attributes {
        let kind = match attribute.kind {
            AttributeKind::Number => "num",
            AttributeKind::Text => "text",
        };
        let line = format!(
            "  {:<nw$}{:<kw$}{}",
            fit_column(&attribute.name, ATTR_NAME_COL_WIDTH - 1),
            kind,
            attribute.display,
            nw = ATTR_NAME_COL_WIDTH,
            kw = ATTR_KIND_COL_WIDTH
        );
        writeln!(&mut out, "{}", line.trim_end()).expect("writing to String cannot fail");
    }
    Ok(out)
}

pub fn render_layout(layout: &BlobLayout) -> String {
    let mut out = String::new();
    writeln!(
        &mut out,
        "blob: {} bytes, {} sections",
        layout.blob_len,
        layout.sections.len()
    )
    .expect("writing to String cannot fail");
    for section in &layout.sections {
        writeln!(
            &mut out,
            "  {:<14} {:>8}..{:<8} ({} bytes)",
            section_label(section.id),
            section.range.start,
            section.range.end,
            section.range.len()
        )
        .expect("writing to String cannot fail");
    }
    out
}

fn slot_to_json(session: &Session, slot: &SlotSummary) -> JsonValue {
    let mut obj = JsonMap::new();
    obj.insert("position".to_string(), JsonValue::from(slot.position));
    obj.insert("slot_index".to_string(), JsonValue::from(slot.slot_index));
    obj.insert("empty".to_string(), JsonValue::Bool(slot.empty));
    if slot.empty {
        return JsonValue::Object(obj);
    }

    obj.insert("name".to_string(), JsonValue::String(slot.name.clone()));
    obj.insert("field1".to_string(), JsonValue::from(slot.field1));
    obj.insert("field2".to_string(), JsonValue::from(slot.field2));
    let attributes = session
        .attributes(slot.position)
        .unwrap_or_default()
        .iter()
        .map(attribute_to_json)
        .collect();
    obj.insert("attributes".to_string(), JsonValue::Array(attributes));
    JsonValue::Object(obj)
}

fn attribute_to_json(attribute: &AttributeEntry) -> JsonValue {
    let mut obj = JsonMap::new();
    obj.insert("tag".to_string(), JsonValue::from(attribute.tag));
    obj.insert("name".to_string(), JsonValue::String(attribute.name.clone()));
    let (kind, value) = match attribute.kind {
        AttributeKind::Number => (
            "number",
            // NaN and infinities have no JSON number form.
            attribute
                .number
                .and_then(serde_json::Number::from_f64)
                .map(JsonValue::Number)
                .unwrap_or_else(|| JsonValue::String(attribute.display.clone())),
        ),
        AttributeKind::Text => (
            "text",
            JsonValue::String(attribute.text.clone().unwrap_or_default()),
        ),
    };
    obj.insert("type".to_string(), JsonValue::String(kind.to_string()));
    obj.insert("value".to_string(), value);
    JsonValue::Object(obj)
}

fn section_label(id: SectionId) -> String {
    match id {
        SectionId::Header => "header".to_string(),
        SectionId::SlotPrefix(n) => format!("slot[{n}]"),
        SectionId::Payload(n) => format!("payload[{n}]"),
        SectionId::Padding(n) => format!("padding[{n}]"),
    }
}

fn fit_column(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 3 {
        return value.chars().take(width).collect();
    }

    let mut out = String::with_capacity(width);
    for ch in value.chars().take(width - 3) {
        out.push(ch);
    }
    out.push_str("...");
    out
}
