//! # vnex formats
//!
//! Format plugins for vnex. Each module adapts one on-disk format to the
//! core decode contracts:
//!
//! - **innocent-grey/iga**: obfuscated game archive with a packed-integer
//!   directory
//! - **playstation/gxt**: texture container with fixed-size entry records
//! - **entis/eri**: sectioned multi-frame raster image
//!
//! The [`registry::Registry`] maps stable `vendor/format` names to decoders
//! and detects formats by signature.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod entis;
pub mod innocent_grey;
pub mod playstation;
pub mod registry;

pub use entis::EriDecoder;
pub use innocent_grey::IgaDecoder;
pub use playstation::GxtDecoder;
pub use registry::{Decoder, Registry};
