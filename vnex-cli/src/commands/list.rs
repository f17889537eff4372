//! List command implementation.

use super::detect_format;
use serde::{Deserialize, Serialize};
use std::path::Path;
use vnex_core::entry::ArchiveEntry;
use vnex_core::stream::MemoryStream;
use vnex_formats::{Decoder, Registry};

/// JSON serializable entry data for archive listings.
#[derive(Debug, Serialize, Deserialize)]
struct EntryJson {
    name: String,
    size: u64,
    offset: u64,
}

impl EntryJson {
    fn from_entry(entry: &ArchiveEntry) -> Self {
        Self {
            name: entry.name.clone(),
            size: entry.size,
            offset: entry.offset,
        }
    }
}

/// JSON output for an archive listing.
#[derive(Debug, Serialize, Deserialize)]
struct ArchiveListJson {
    archive: String,
    format: String,
    entries: Vec<EntryJson>,
}

pub fn cmd_list(archive: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(archive)?;
    let registry = Registry::new();
    let (format, decoder) = detect_format(&registry, archive, &data)?;
    let Decoder::Archive(decoder) = decoder else {
        return Err(format!("{}: {format} is not an archive format", archive.display()).into());
    };

    let mut stream = MemoryStream::new(&data);
    let meta = decoder.read_meta(&mut stream)?;

    if json {
        let listing = ArchiveListJson {
            archive: archive.display().to_string(),
            format: format.to_string(),
            entries: meta.entries().iter().map(EntryJson::from_entry).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!("Archive: {} ({})", archive.display(), format);
    println!();
    println!("{:>12}  {:>12}  Name", "Size", "Offset");
    for entry in &meta {
        println!("{:>12}  {:>12}  {}", entry.size, entry.offset, entry.name);
    }
    println!();
    println!("{} entries", meta.len());
    Ok(())
}
