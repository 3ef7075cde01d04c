// crates/coffeemap-core/src/config.rs
use crate::error::{CoffeeMapError, Result};
use crate::matcher::Cutoff;
use crate::text::equals_folded;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One selectable metric and the CSV file holding it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub metric: String,
    pub file: PathBuf,
}

impl DatasetEntry {
    pub fn new(metric: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            metric: metric.into(),
            file: file.into(),
        }
    }
}

/// Where the data lives and how strictly names are matched.
///
/// Relative paths in `boundary_file` and `datasets` are resolved against
/// `data_dir`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    pub data_dir: PathBuf,
    pub boundary_file: PathBuf,
    pub cutoff: f64,
    pub datasets: Vec<DatasetEntry>,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            boundary_file: PathBuf::from("countries.geo.json"),
            cutoff: Cutoff::DEFAULT.value(),
            datasets: vec![
                DatasetEntry::new("Production", "Coffee_production.csv"),
                DatasetEntry::new("Consumption", "Coffee_domestic_consumption.csv"),
                DatasetEntry::new("Export", "Coffee_export.csv"),
            ],
        }
    }
}

impl AtlasConfig {
    /// Read a JSON config. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoffeeMapError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: AtlasConfig = serde_json::from_str(&content)?;
        config.validated_cutoff()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validated_cutoff(&self) -> Result<Cutoff> {
        Cutoff::new(self.cutoff)
    }

    /// Dataset for `metric`, compared case- and accent-insensitively.
    pub fn dataset(&self, metric: &str) -> Result<&DatasetEntry> {
        self.datasets
            .iter()
            .find(|d| equals_folded(&d.metric, metric))
            .ok_or_else(|| CoffeeMapError::UnknownMetric(metric.to_owned()))
    }

    pub fn metrics(&self) -> impl Iterator<Item = &str> {
        self.datasets.iter().map(|d| d.metric.as_str())
    }

    /// `path` as-is when absolute, otherwise under `data_dir`.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    pub fn boundary_path(&self) -> PathBuf {
        self.resolve_path(&self.boundary_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_bundled_layout() {
        let config = AtlasConfig::default();
        assert_eq!(config.boundary_path(), Path::new("data/countries.geo.json"));
        assert_eq!(config.validated_cutoff().unwrap(), Cutoff::default());
        assert_eq!(
            config.metrics().collect::<Vec<_>>(),
            ["Production", "Consumption", "Export"]
        );
    }

    #[test]
    fn metric_lookup_is_folded() {
        let config = AtlasConfig::default();
        assert_eq!(
            config.dataset(" export ").unwrap().file,
            Path::new("Coffee_export.csv")
        );
        assert!(matches!(
            config.dataset("imports"),
            Err(CoffeeMapError::UnknownMetric(_))
        ));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: AtlasConfig = serde_json::from_str(r#"{ "cutoff": 0.8 }"#).unwrap();
        assert_eq!(config.cutoff, 0.8);
        assert_eq!(config.datasets.len(), 3);
        assert_eq!(config.data_dir, Path::new("data"));
    }

    #[test]
    fn absolute_paths_are_kept() {
        let config = AtlasConfig::default();
        let abs = std::env::temp_dir().join("world.geojson");
        assert_eq!(config.resolve_path(&abs), abs);
    }
}
