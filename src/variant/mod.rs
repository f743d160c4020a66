//! Asset-variant resolution engine.
//!
//! Every source image can have generated siblings living in the `resized`
//! subtree: resized copies (`hero-800.jpg`), compressed copies
//! (`hero-min.jpg`), or both (`hero-800-min.jpg`). This module owns the
//! naming convention and the selection logic:
//!
//! - [`grammar`]: parse a base name into `(family, resolution, minified)`
//! - [`dir`]: map an asset path to the directory holding its variants
//! - [`select`]: pick the best substitute under caller-supplied constraints
//!
//! The engine is stateless and performs no writes; a directory listing is
//! its only system call.

pub mod dir;
pub mod grammar;
pub mod select;

pub use dir::variant_dir;
pub use grammar::{Resolution, extract_resolution, is_in_family, strip_compression_suffix};
pub use select::{VariantQuery, select_variant};
