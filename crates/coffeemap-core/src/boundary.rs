// crates/coffeemap-core/src/boundary.rs

//! # Boundary Dataset
//!
//! Reads a GeoJSON FeatureCollection and extracts one region name per
//! feature. Geometry is not interpreted; the parsed document is kept as-is
//! for whatever renders the choropleth.

use crate::error::{CoffeeMapError, Result};
use crate::index::ReferenceIndex;
use crate::text::normalize_opt;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{info, warn};

/// Property keys tried, in order, for a feature's region name.
pub const NAME_KEYS: [&str; 5] = ["name", "NAME", "ADMIN", "ADMIN_NAME", "Country"];

/// A loaded boundary dataset: the raw document plus its region names.
#[derive(Clone, Debug)]
pub struct BoundaryDataset {
    document: Value,
    names: Vec<String>,
}

impl BoundaryDataset {
    /// Parse a FeatureCollection from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let document: Value = serde_json::from_reader(reader)?;
        Self::from_document(document)
    }

    /// Load from disk. With the `compact` feature, `*.gz` files are
    /// decompressed on the fly.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = open_stream(path)?;
        let dataset = Self::from_reader(reader)?;
        info!(
            path = %path.display(),
            regions = dataset.names.len(),
            "loaded boundary dataset"
        );
        Ok(dataset)
    }

    /// Wrap an already-parsed document.
    pub fn from_document(document: Value) -> Result<Self> {
        let features = document
            .get("features")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                CoffeeMapError::InvalidData("expected a GeoJSON FeatureCollection".into())
            })?;

        let mut names = Vec::with_capacity(features.len());
        for (pos, feature) in features.iter().enumerate() {
            let name = feature_name(feature);
            match (name, normalize_opt(name).is_empty()) {
                (None, _) => warn!(feature = pos, "feature has no usable name property; skipped"),
                (Some(name), true) => {
                    warn!(feature = pos, name, "region name has an empty key; only exact lookups reach it");
                    names.push(name.to_owned());
                }
                (Some(name), false) => names.push(name.to_owned()),
            }
        }

        Ok(Self { document, names })
    }

    /// Region names in feature order.
    pub fn region_names(&self) -> &[String] {
        &self.names
    }

    /// The parsed GeoJSON document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Build the lookup index over [`Self::region_names`].
    pub fn index(&self) -> ReferenceIndex {
        ReferenceIndex::build(&self.names)
    }
}

/// First non-empty string among [`NAME_KEYS`] in the feature's properties.
pub fn feature_name(feature: &Value) -> Option<&str> {
    let properties = feature.get("properties")?.as_object()?;
    NAME_KEYS
        .iter()
        .filter_map(|key| properties.get(*key).and_then(Value::as_str))
        .find(|name| !name.is_empty())
}

/// Opens a file, buffers it, and unwraps gzip when the name ends in `.gz`.
fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        CoffeeMapError::NotFound(format!("Dataset not found at {}: {}", path.display(), e))
    })?;
    let reader = BufReader::new(file);

    let gzipped = path.extension().is_some_and(|ext| ext == "gz");
    if !gzipped {
        return Ok(Box::new(reader));
    }

    #[cfg(feature = "compact")]
    {
        use flate2::read::GzDecoder;
        Ok(Box::new(BufReader::new(GzDecoder::new(reader))))
    }

    #[cfg(not(feature = "compact"))]
    {
        Err(CoffeeMapError::InvalidData(format!(
            "{} is gzip-compressed but the 'compact' feature is disabled",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn name_keys_fall_back_in_order() {
        let f = json!({ "properties": { "ADMIN": "France", "Country": "FR" } });
        assert_eq!(feature_name(&f), Some("France"));

        let f = json!({ "properties": { "name": "", "NAME": "Peru" } });
        assert_eq!(feature_name(&f), Some("Peru"));

        let f = json!({ "properties": { "name": 42, "Country": "Chile" } });
        assert_eq!(feature_name(&f), Some("Chile"));

        let f = json!({ "properties": null });
        assert_eq!(feature_name(&f), None);

        let f = json!({ "geometry": null });
        assert_eq!(feature_name(&f), None);
    }

    #[test]
    fn collection_keeps_feature_order_and_skips_nameless() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "name": "Brazil" } },
                { "type": "Feature", "properties": { "iso": "XX" } },
                { "type": "Feature", "properties": { "name": "Colombia" } }
            ]
        });
        let ds = BoundaryDataset::from_document(doc).unwrap();
        assert_eq!(ds.region_names(), ["Brazil", "Colombia"]);
        assert_eq!(ds.index().len(), 2);
        assert_eq!(ds.document()["features"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn names_without_a_key_stay_exact_only() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "name": "日本" } },
                { "type": "Feature", "properties": { "name": "Japan" } }
            ]
        });
        let ds = BoundaryDataset::from_document(doc).unwrap();
        assert_eq!(ds.region_names(), ["日本", "Japan"]);

        let index = ds.index();
        assert!(index.contains_exact("日本"));
        assert_eq!(index.keys().collect::<Vec<_>>(), ["japan"]);
    }

    #[test]
    fn non_collections_are_rejected() {
        let err = BoundaryDataset::from_document(json!({ "type": "Feature" })).unwrap_err();
        assert!(matches!(err, CoffeeMapError::InvalidData(_)));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = BoundaryDataset::from_path("/definitely/not/here.geojson").unwrap_err();
        assert!(matches!(err, CoffeeMapError::NotFound(_)));
    }
}
