// crates/coffeemap-core/src/loader.rs

//! # Data Loader
//!
//! Ties configuration, file loading and matching together. Every file is
//! parsed at most once per [`Workspace`]; the reference index is built once
//! per boundary file.

use crate::boundary::BoundaryDataset;
use crate::cache::{LoadCache, ResolveCache};
use crate::config::AtlasConfig;
use crate::error::Result;
use crate::frame::ChoroplethFrame;
use crate::index::ReferenceIndex;
use crate::matcher::{Cutoff, MatchResult};
use crate::table::{LongTable, Selection, Table};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Where a view's statistics come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// A metric listed in the config.
    Metric(String),
    /// An arbitrary CSV; its file stem doubles as the metric label.
    File(PathBuf),
}

/// Config plus the caches of one process run.
#[derive(Debug)]
pub struct Workspace {
    config: AtlasConfig,
    cutoff: Cutoff,
    boundaries: LoadCache<BoundaryDataset>,
    indexes: LoadCache<ReferenceIndex>,
    tables: LoadCache<LongTable>,
    resolved: ResolveCache,
}

impl Workspace {
    /// Fails only when the configured cutoff is out of range.
    pub fn new(config: AtlasConfig) -> Result<Self> {
        let cutoff = config.validated_cutoff()?;
        Ok(Self {
            config,
            cutoff,
            boundaries: LoadCache::new(),
            indexes: LoadCache::new(),
            tables: LoadCache::new(),
            resolved: ResolveCache::new(),
        })
    }

    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    pub fn cutoff(&self) -> Cutoff {
        self.cutoff
    }

    pub fn boundary(&self) -> Result<Arc<BoundaryDataset>> {
        let path = self.config.boundary_path();
        self.boundaries
            .get_or_load(&path, |p| BoundaryDataset::from_path(p))
    }

    pub fn reference_index(&self) -> Result<Arc<ReferenceIndex>> {
        let path = self.config.boundary_path();
        self.indexes
            .get_or_load(&path, |_| Ok(self.boundary()?.index()))
    }

    /// Melted table for a source. Missing-column failures are returned on
    /// every call; only successful loads are cached.
    pub fn table(&self, source: &DatasetSource) -> Result<Arc<LongTable>> {
        let path = self.source_path(source)?;
        self.tables
            .get_or_load(&path, |p| Table::from_path(p)?.melt())
    }

    /// Resolve names against the boundary index with the configured cutoff.
    pub fn resolve<'a, I>(&self, source_names: I) -> Result<Arc<MatchResult>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let index = self.reference_index()?;
        Ok(self.resolved.resolve(source_names, &index, self.cutoff))
    }

    /// Aggregate a selection and join it with boundary regions.
    pub fn frame(&self, source: &DatasetSource, selection: &Selection) -> Result<ChoroplethFrame> {
        let table = self.table(source)?;
        let values = table.aggregate(selection);
        let matches = self.resolve(values.iter().map(|v| v.country.as_str()))?;
        let frame = ChoroplethFrame::build(self.source_label(source)?, selection, values, &matches);
        info!(
            title = %frame.title(),
            rows = frame.rows.len(),
            matched = frame.matched_count(),
            "built choropleth frame"
        );
        Ok(frame)
    }

    /// The configured metric name, or the file stem for ad-hoc CSVs.
    fn source_label(&self, source: &DatasetSource) -> Result<String> {
        Ok(match source {
            DatasetSource::Metric(metric) => self.config.dataset(metric)?.metric.clone(),
            DatasetSource::File(path) => path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        })
    }

    fn source_path(&self, source: &DatasetSource) -> Result<PathBuf> {
        Ok(match source {
            DatasetSource::Metric(metric) => {
                let entry = self.config.dataset(metric)?;
                self.config.resolve_path(&entry.file)
            }
            DatasetSource::File(path) => path.clone(),
        })
    }

    /// Whether the table behind `path` has been loaded already.
    pub fn is_table_cached(&self, path: &Path) -> bool {
        self.tables.contains(path)
    }
}
