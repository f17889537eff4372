//! Command implementations for the vnex CLI.

pub mod decode;
pub mod detect;
pub mod extract;
pub mod list;

pub use decode::cmd_decode;
pub use detect::cmd_detect;
pub use extract::cmd_extract;
pub use list::cmd_list;

use vnex_formats::{Decoder, Registry};

/// Probe a file's bytes against the registry, failing with the file name
/// when nothing matches.
pub(crate) fn detect_format<'r>(
    registry: &'r Registry,
    path: &std::path::Path,
    data: &[u8],
) -> Result<(&'static str, &'r Decoder), Box<dyn std::error::Error>> {
    registry
        .detect(data)
        .ok_or_else(|| format!("{}: unrecognized format", path.display()).into())
}
