//! District boundary polygons and the choropleth join.
//!
//! Boundaries come from a GeoJSON `FeatureCollection` whose features carry
//! the district name in `properties.District`. Names are canonicalized on
//! load the same way the report rows are, so the two sides join on equal
//! strings. A district with no matching polygon is simply absent from the
//! map.

use anyhow::{Context, Result, bail};
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, warn};

use crate::progress::types::ProgressRecord;
use crate::progress::utility::canonical_district;

/// Feature property holding the district name.
pub const BOUNDARY_NAME_PROPERTY: &str = "District";

#[derive(Debug, Clone)]
pub struct BoundarySet {
    features: Vec<Value>,
    names: HashSet<String>,
}

impl BoundarySet {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read boundaries '{}'", path.display()))?;
        Self::from_json(&bytes)
            .with_context(|| format!("invalid boundaries file '{}'", path.display()))
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let collection: Value = serde_json::from_slice(bytes)?;
        let Some(raw_features) = collection["features"].as_array() else {
            bail!("expected a GeoJSON FeatureCollection with a `features` array");
        };

        let mut features = Vec::with_capacity(raw_features.len());
        let mut names = HashSet::new();

        for (i, feature) in raw_features.iter().enumerate() {
            let Some(name) = feature["properties"][BOUNDARY_NAME_PROPERTY].as_str() else {
                warn!(index = i, "Boundary feature has no district name, skipping");
                continue;
            };
            let name = canonical_district(name);

            let mut feature = feature.clone();
            feature["properties"][BOUNDARY_NAME_PROPERTY] = Value::String(name.clone());
            names.insert(name);
            features.push(feature);
        }

        debug!(features = features.len(), "Boundaries loaded");
        Ok(Self { features, names })
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn contains(&self, district: &str) -> bool {
        self.names.contains(district)
    }

    /// Record districts with no polygon, each listed once in input order.
    pub fn unmatched_districts<'a>(&self, records: &'a [ProgressRecord]) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        records
            .iter()
            .map(|r| r.district.as_str())
            .filter(|d| !self.contains(d) && seen.insert(*d))
            .collect()
    }

    /// Builds the map layer: every polygon that has a record, tagged with the
    /// record's category label and fill colour.
    ///
    /// Polygons without a record are left out. When two records share a
    /// district, the later one wins.
    pub fn choropleth(&self, records: &[ProgressRecord]) -> Value {
        let by_district: HashMap<&str, &ProgressRecord> =
            records.iter().map(|r| (r.district.as_str(), r)).collect();

        let features: Vec<Value> = self
            .features
            .iter()
            .filter_map(|feature| {
                let name = feature["properties"][BOUNDARY_NAME_PROPERTY].as_str()?;
                let record = by_district.get(name)?;

                let mut feature = feature.clone();
                let props = &mut feature["properties"];
                props["Category"] = json!(record.category.label());
                props["fill"] = json!(record.category.color());
                props["progress_today"] = json!(record.progress_today);
                props["progress_last"] = json!(record.progress_last);
                Some(feature)
            })
            .collect();

        json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }
}
