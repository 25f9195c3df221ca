use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use tracing::debug;

use crate::codec::StashCodec;
use crate::container::StashContainer;
use crate::error::{Result, StashError};

#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// The three text lines of a stash file, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StashFile {
    pub blob_hex: String,
    pub version: String,
    pub slot_count: String,
}

impl StashFile {
    pub fn read<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = reader.lines();
        let mut next_line = |line: usize| -> Result<String> {
            match lines.next() {
                Some(text) => {
                    let mut text = text?;
                    if text.ends_with('\r') {
                        text.pop();
                    }
                    Ok(text)
                }
                None => Err(StashError::MissingMetadataLine { line }),
            }
        };

        Ok(Self {
            blob_hex: next_line(1)?,
            version: next_line(2)?,
            slot_count: next_line(3)?,
        })
    }

    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        for line in [&self.blob_hex, &self.version, &self.slot_count] {
            writer.write_all(line.as_bytes())?;
            writer.write_all(LINE_SEPARATOR.as_bytes())?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn decode(&self, codec: &StashCodec) -> Result<StashContainer> {
        codec.decode_text(&self.blob_hex, &self.version, &self.slot_count)
    }

    pub fn encode(container: &StashContainer, codec: &StashCodec) -> Result<Self> {
        Ok(Self {
            blob_hex: codec.encode_text(container)?,
            version: container.version.clone(),
            slot_count: container.slot_count.clone(),
        })
    }

    pub fn load(path: impl AsRef<Path>, codec: &StashCodec) -> Result<StashContainer> {
        let path = path.as_ref();
        let file = Self::read(BufReader::new(File::open(path)?))?;
        debug!(path = %path.display(), version = %file.version, "read stash file");
        file.decode(codec)
    }

    /// Encodes before touching the filesystem, so a failed encode leaves the
    /// destination as it was.
    pub fn save(container: &StashContainer, path: impl AsRef<Path>, codec: &StashCodec) -> Result<()> {
        let path = path.as_ref();
        let file = Self::encode(container, codec)?;
        let mut bytes = Vec::with_capacity(file.blob_hex.len() + 64);
        file.write(&mut bytes)?;
        fs::write(path, bytes)?;
        debug!(path = %path.display(), "wrote stash file");
        Ok(())
    }
}
