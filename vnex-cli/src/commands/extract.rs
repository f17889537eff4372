//! Extract command implementation.
//!
//! Input files are independent decode sessions with no shared state, so the
//! batch runs one file per thread. A failing file is reported and skipped;
//! the rest of the batch still extracts.

use super::detect_format;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::Path;
use vnex_core::stream::MemoryStream;
use vnex_formats::{Decoder, Registry};

fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("progress bar template is valid")
            .progress_chars("█▓▒░ "),
    );
    pb
}

fn extract_one(
    archive: &Path,
    output: &Path,
    progress: bool,
) -> Result<usize, Box<dyn std::error::Error>> {
    let data = std::fs::read(archive)?;
    let registry = Registry::new();
    let (format, decoder) = detect_format(&registry, archive, &data)?;
    let Decoder::Archive(decoder) = decoder else {
        return Err(format!("{}: {format} is not an archive format", archive.display()).into());
    };

    let mut stream = MemoryStream::new(&data);
    let meta = decoder.read_meta(&mut stream)?;

    let pb = create_progress_bar(meta.len() as u64, progress);
    pb.set_message(archive.display().to_string());

    let mut extracted = 0usize;
    for entry in &meta {
        let file = decoder.read_file(&mut stream, &meta, entry)?;
        let target = output.join(entry.sanitized_name());
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, &file.data)?;
        extracted += 1;
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok(extracted)
}

pub fn cmd_extract(
    archives: &[std::path::PathBuf],
    output: &Path,
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if archives.is_empty() {
        return Err("no input files".into());
    }

    let results: Vec<(String, Result<usize, String>)> = archives
        .par_iter()
        .map(|archive| {
            let outcome = extract_one(archive, output, progress).map_err(|e| e.to_string());
            (archive.display().to_string(), outcome)
        })
        .collect();

    let mut failures = 0usize;
    for (archive, outcome) in results {
        match outcome {
            Ok(count) => println!("{archive}: {count} entries extracted"),
            Err(message) => {
                eprintln!("{archive}: {message}");
                failures += 1;
            }
        }
    }
    if failures > 0 {
        return Err(format!("{failures} of {} files failed", archives.len()).into());
    }
    Ok(())
}
