// src/lib.rs

//! # coffeemap-rs
//!
//! Workspace facade over [`coffeemap_core`]; the demos under `demos/` build
//! against it.

pub use coffeemap_core::*;

/// Common imports for building map views.
pub mod prelude {
    pub use coffeemap_core::{
        resolve, AtlasConfig, ChoroplethFrame, CoffeeMapError, Cutoff, DatasetSource, MatchResult,
        MatchTier, ReferenceIndex, Result, Selection, TypeFilter, Workspace,
    };
}
