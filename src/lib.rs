#![cfg_attr(docsrs, feature(doc_cfg))]
//! CMSIS-SVD decoding facade.
//!
//! Glues the [`svd_xml`] element tree to the [`svd_core`] device model:
//!
//! ```
//! let device = svd_rs::parse(
//!     "<device><peripherals><peripheral>\
//!        <name>RCC</name><baseAddress>0x40021000</baseAddress>\
//!      </peripheral></peripherals></device>",
//! )?;
//! assert!(device.peripheral("RCC").is_some());
//! # Ok::<(), svd_rs::Error>(())
//! ```

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

pub use svd_core::{
    self, bitrange, derive, dim, AddressBlock, BitRange, Cpu, DecodeOptions, Device, Field, Node,
    Peripheral, Register, SvdError,
};
pub use svd_xml::{self, Element, XmlError};

/// Error type covering every stage of loading an SVD document.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Xml(#[from] XmlError),
    #[error(transparent)]
    Svd(#[from] SvdError),
}

/// Decode SVD text with default options.
pub fn parse(xml: &str) -> Result<Device, Error> {
    parse_with(xml, &DecodeOptions::default())
}

/// Decode SVD text with explicit options.
pub fn parse_with(xml: &str, options: &DecodeOptions) -> Result<Device, Error> {
    let root = svd_xml::parse(xml)?;
    let device = Device::from_node_with(&root, options)?;
    debug!(peripherals = device.peripherals.len(), "decoded svd text");
    Ok(device)
}

/// Read and decode an SVD file with default options.
pub fn load(path: impl AsRef<Path>) -> Result<Device, Error> {
    load_with(path, &DecodeOptions::default())
}

/// Read and decode an SVD file.
pub fn load_with(path: impl AsRef<Path>, options: &DecodeOptions) -> Result<Device, Error> {
    let path = path.as_ref();
    let xml = std::fs::read_to_string(path)?;
    info!(path = %path.display(), bytes = xml.len(), "loading svd");
    parse_with(&xml, options)
}
