use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StashError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Section kinds inside the outer blob. Slot variants carry the slot position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionId {
    Header,
    SlotPrefix(usize),
    Payload(usize),
    Padding(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionLayout {
    pub id: SectionId,
    pub range: ByteRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobLayout {
    pub blob_len: usize,
    pub sections: Vec<SectionLayout>,
}

impl BlobLayout {
    pub(crate) fn new(blob_len: usize) -> Self {
        Self {
            blob_len,
            sections: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, id: SectionId, start: usize, end: usize) {
        self.sections.push(SectionLayout {
            id,
            range: ByteRange { start, end },
        });
    }

    pub fn padding_ranges(&self) -> Vec<ByteRange> {
        self.sections
            .iter()
            .filter(|s| matches!(s.id, SectionId::Padding(_)))
            .map(|s| s.range)
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        let Some(first) = self.sections.first() else {
            return Err(invalid("blob layout must contain at least one section"));
        };

        if first.id != SectionId::Header || first.range.start != 0 {
            return Err(invalid("layout does not start with the header at byte 0"));
        }

        let mut expected = 0usize;
        for section in &self.sections {
            if section.range.start != expected {
                return Err(invalid(format!(
                    "layout gap/overlap around section {:?}: expected start {}, got {}",
                    section.id, expected, section.range.start
                )));
            }
            if section.range.end < section.range.start {
                return Err(invalid(format!(
                    "invalid section range {:?}: {}..{}",
                    section.id, section.range.start, section.range.end
                )));
            }
            expected = section.range.end;
        }

        if expected != self.blob_len {
            return Err(invalid(format!(
                "layout does not cover blob: ended at {}, blob length {}",
                expected, self.blob_len
            )));
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> StashError {
    StashError::Io(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        message.into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::{BlobLayout, SectionId};

    #[test]
    fn contiguous_layout_validates() {
        let mut layout = BlobLayout::new(32);
        layout.record(SectionId::Header, 0, 12);
        layout.record(SectionId::SlotPrefix(0), 12, 20);
        layout.record(SectionId::Padding(0), 20, 32);
        layout.validate().unwrap();
        assert_eq!(layout.padding_ranges().len(), 1);
        assert_eq!(layout.padding_ranges()[0].len(), 12);
    }

    #[test]
    fn gap_is_rejected() {
        let mut layout = BlobLayout::new(32);
        layout.record(SectionId::Header, 0, 12);
        layout.record(SectionId::Padding(0), 20, 32);
        assert!(layout.validate().is_err());
    }

    #[test]
    fn short_coverage_is_rejected() {
        let mut layout = BlobLayout::new(40);
        layout.record(SectionId::Header, 0, 12);
        assert!(layout.validate().is_err());
    }

    #[test]
    fn empty_layout_is_rejected() {
        assert!(BlobLayout::new(0).validate().is_err());
    }
}
