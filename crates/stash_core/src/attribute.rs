use serde::{Deserialize, Serialize};

use crate::cursor::{ByteCursor, ByteSink};
use crate::error::{EditError, Result, StashError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Number(f64),
    Text(String),
}

impl AttributeValue {
    pub const NUMBER_TYPE: i32 = 0;
    pub const TEXT_TYPE: i32 = 1;

    /// On-disk discriminant written before the value.
    pub fn type_code(&self) -> i32 {
        match self {
            Self::Number(_) => Self::NUMBER_TYPE,
            Self::Text(_) => Self::TEXT_TYPE,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Number(_) => "numeric",
            Self::Text(_) => "text",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match *self {
            Self::Number(v) => Some(v),
            Self::Text(_) => None,
        }
    }

    /// Editor-facing rendering; numbers always keep a fractional part (`3.0`).
    pub fn display_text(&self) -> String {
        match self {
            Self::Number(v) => format!("{v:?}"),
            Self::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Opaque, carried through unmodified.
    pub tag: i32,
    pub name: String,
    value: AttributeValue,
}

impl Attribute {
    pub fn new(tag: i32, name: impl Into<String>, value: AttributeValue) -> Self {
        Self {
            tag,
            name: name.into(),
            value,
        }
    }

    pub fn value(&self) -> &AttributeValue {
        &self.value
    }

    /// Replaces the value, refusing to change its kind.
    pub fn set_value(&mut self, value: AttributeValue) -> Result<(), EditError> {
        if value.type_code() != self.value.type_code() {
            return Err(EditError::KindMismatch {
                name: self.name.clone(),
                expected: self.value.kind(),
                found: value.kind(),
            });
        }
        self.value = value;
        Ok(())
    }

    /// Applies editor input, coercing it to the attribute's existing kind.
    pub fn set_value_from_text(&mut self, input: &str) -> Result<(), EditError> {
        let value = match self.value {
            AttributeValue::Text(_) => AttributeValue::Text(input.to_string()),
            AttributeValue::Number(_) => {
                let parsed = input
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| EditError::InvalidNumber {
                        name: self.name.clone(),
                        input: input.to_string(),
                    })?;
                AttributeValue::Number(parsed)
            }
        };
        self.value = value;
        Ok(())
    }

    pub(crate) fn decode(r: &mut ByteCursor<'_>) -> Result<Self> {
        let tag = r.read_i32()?;
        let name = r.read_string("attribute name")?;
        let value = match r.read_i32()? {
            AttributeValue::NUMBER_TYPE => AttributeValue::Number(r.read_f64()?),
            AttributeValue::TEXT_TYPE => AttributeValue::Text(r.read_string("attribute value")?),
            other => return Err(StashError::UnknownAttributeType(other)),
        };
        Ok(Self { tag, name, value })
    }

    pub(crate) fn encode(&self, out: &mut ByteSink) -> Result<()> {
        out.write_i32(self.tag)?;
        out.write_string(&self.name)?;
        out.write_i32(self.value.type_code())?;
        match &self.value {
            AttributeValue::Number(v) => out.write_f64(*v),
            AttributeValue::Text(s) => out.write_string(s),
        }
    }
}
