//! The read-only table of known format decoders.
//!
//! Decoders register under a `vendor/format` key. Detection probes each
//! decoder's signature check in registration order and reports the first
//! match, so more specific signatures must register before looser ones.

use crate::entis::EriDecoder;
use crate::innocent_grey::IgaDecoder;
use crate::playstation::GxtDecoder;
use vnex_core::decode::{ArchiveDecoder, ImageDecoder};
use vnex_core::error::{Result, VnexError};
use vnex_core::stream::MemoryStream;

/// A registered decoder: either an archive container or a single image.
pub enum Decoder {
    /// Container format with an entry table.
    Archive(Box<dyn ArchiveDecoder>),
    /// Single-image format.
    Image(Box<dyn ImageDecoder>),
}

// Boxed trait objects have no derivable Debug; report the variant.
impl std::fmt::Debug for Decoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Archive(_) => f.write_str("Decoder::Archive"),
            Self::Image(_) => f.write_str("Decoder::Image"),
        }
    }
}

impl Decoder {
    /// Check the signature at the start of the stream.
    pub fn is_recognized(&self, stream: &mut MemoryStream<'_>) -> bool {
        match self {
            Self::Archive(d) => d.is_recognized(stream),
            Self::Image(d) => d.is_recognized(stream),
        }
    }
}

/// The decoder table, fixed at construction.
pub struct Registry {
    decoders: Vec<(&'static str, Decoder)>,
}

impl Registry {
    /// Build the table with every known decoder.
    pub fn new() -> Self {
        Self {
            decoders: vec![
                (
                    "innocent-grey/iga",
                    Decoder::Archive(Box::new(IgaDecoder::new())),
                ),
                (
                    "playstation/gxt",
                    Decoder::Archive(Box::new(GxtDecoder::new())),
                ),
                ("entis/eri", Decoder::Image(Box::new(EriDecoder::new()))),
            ],
        }
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.decoders.iter().map(|(name, _)| *name).collect()
    }

    /// Look up a decoder by its registered name.
    pub fn get(&self, name: &str) -> Result<&Decoder> {
        self.decoders
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, d)| d)
            .ok_or_else(|| VnexError::not_supported(format!("format {name:?}")))
    }

    /// Find the first decoder whose signature matches `data`.
    pub fn detect(&self, data: &[u8]) -> Option<(&'static str, &Decoder)> {
        let mut stream = MemoryStream::new(data);
        self.decoders
            .iter()
            .find(|(_, d)| d.is_recognized(&mut stream))
            .map(|(name, d)| (*name, d))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names() {
        let registry = Registry::new();
        assert_eq!(
            registry.names(),
            vec!["innocent-grey/iga", "playstation/gxt", "entis/eri"]
        );
        assert!(registry.get("innocent-grey/iga").is_ok());
        assert!(matches!(
            registry.get("nowhere/none").unwrap_err(),
            VnexError::NotSupported { .. }
        ));
    }

    #[test]
    fn test_detection_by_signature() {
        let registry = Registry::new();
        let (name, _) = registry.detect(b"IGA0\x00\x00\x00\x00").unwrap();
        assert_eq!(name, "innocent-grey/iga");
        let (name, _) = registry.detect(b"GXT\x00\x03\x00\x00\x10").unwrap();
        assert_eq!(name, "playstation/gxt");
        assert!(registry.detect(b"not a known signature").is_none());
        assert!(registry.detect(b"IG").is_none());
    }
}
