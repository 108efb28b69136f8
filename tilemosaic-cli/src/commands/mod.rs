//! CLI command implementations.
//!
//! - [`create`] - build a mosaic from footprints
//! - [`update`] - merge footprints into a mosaic
//! - [`info`] - mosaic summary
//! - [`assets`] - asset lookup for a tile, point or bbox

pub mod assets;
pub mod common;
pub mod create;
pub mod info;
pub mod update;
