//! Detect command implementation.

use std::path::Path;
use vnex_formats::Registry;

pub fn cmd_detect(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(file)?;
    let registry = Registry::new();
    match registry.detect(&data) {
        Some((name, _)) => println!("{}: {name}", file.display()),
        None => {
            println!("{}: unrecognized", file.display());
            println!("known formats: {}", registry.names().join(", "));
        }
    }
    Ok(())
}
