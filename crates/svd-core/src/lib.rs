#![cfg_attr(docsrs, feature(doc_cfg))]
//! Typed CMSIS-SVD device model.
//!
//! The decoder walks an already materialized element tree (see [`Node`]) in
//! a single document-order pass:
//!
//! - [`Device::from_node`] builds the CPU, cascades the default register
//!   `size` and decodes each peripheral;
//! - `derivedFrom` is resolved against the peripherals built so far
//!   ([`derive::PeripheralRegistry`]) and merged with [`derive::merge`];
//! - `dim`/`dimIncrement` templates are expanded with [`dim::expand`];
//! - field bit positions are resolved by [`bitrange::resolve`].
//!
//! ```
//! let root = svd_xml::parse(
//!     "<device><peripherals><peripheral>\
//!        <name>GPIOA</name><baseAddress>0x48000000</baseAddress>\
//!      </peripheral></peripherals></device>",
//! )?;
//! let device = svd_core::Device::from_node(&root)?;
//! assert_eq!(device.peripherals[0].base_address, 0x4800_0000);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod bitrange;
mod builder;
pub mod derive;
pub mod dim;
mod error;
pub mod literal;
mod model;
pub mod node;
mod options;

pub use bitrange::BitRange;
pub use error::SvdError;
pub use model::{AddressBlock, Cpu, Device, Field, Peripheral, Register};
pub use node::Node;
pub use options::DecodeOptions;

#[cfg(test)]
pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}
