#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `sag-rs` converts animated images to and from SAG, a compact indexed-color
//! animation format for LED matrix displays.
//!
pub use sag_internal::*;
