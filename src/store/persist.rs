/// Flat-file history persistence: one `#RRGGBB` per line.
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::color::Color;

/// Serialize the history, newline-terminated, oldest first.
pub fn serialize(history: &[Color]) -> String {
    history.iter().map(|color| format!("{color}\n")).collect()
}

/// Parse history text, skipping blank and unparsable lines.
pub fn deserialize(text: &str) -> Vec<Color> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| line.parse().ok())
        .collect()
}

/// Replace the file at `path` with the serialized history.
///
/// The text goes to a temporary file in the same directory that is then
/// renamed over the destination, so a reader sees either the old or the new
/// contents in full.
pub fn save(path: &Path, history: &[Color]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(serialize(history).as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

/// Read the history at `path`. A missing file is an empty history.
pub fn load(path: &Path) -> io::Result<Vec<Color>> {
    match fs::read(path) {
        Ok(bytes) => Ok(deserialize(&String::from_utf8_lossy(&bytes))),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(err),
    }
}
