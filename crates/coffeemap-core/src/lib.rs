// crates/coffeemap-core/src/lib.rs

//! # coffeemap-core
//!
//! Country-name reconciliation for drawing coffee trade statistics on a
//! world map. Names from statistical tables ("Bolivia (Plurinational State
//! of)", "Viet Nam", "Côte d'Ivoire") are matched against the region names of
//! a GeoJSON boundary dataset in three tiers: exact, normalized, fuzzy.
//!
//! ```rust
//! use coffeemap_core::{resolve, Cutoff, ReferenceIndex};
//!
//! let index = ReferenceIndex::build(["United States of America", "Bolivia"]);
//! let result = resolve(
//!     ["United States", "Bolivia (Plurinational State of)"],
//!     &index,
//!     Cutoff::default(),
//! );
//! assert_eq!(result.reference("Bolivia (Plurinational State of)"), Some("Bolivia"));
//! ```

pub mod boundary;
pub mod cache;
pub mod config;
pub mod error;
pub mod frame;
pub mod index;
pub mod loader;
pub mod matcher;
pub mod similarity;
pub mod table; // Reshape / aggregate
pub mod text; // Name normalizer

// Re-exports
pub use crate::boundary::BoundaryDataset;
pub use crate::config::{AtlasConfig, DatasetEntry};
pub use crate::error::{CoffeeMapError, ColumnKind, Result};
pub use crate::frame::{ChoroplethFrame, FrameRow};
pub use crate::index::ReferenceIndex;
pub use crate::loader::{DatasetSource, Workspace};
pub use crate::matcher::{resolve, Cutoff, Match, MatchResult, MatchTier};
pub use crate::table::{CountryValue, LongTable, Selection, Table, TypeFilter};
pub use crate::text::normalize;
