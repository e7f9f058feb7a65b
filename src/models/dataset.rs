use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{PipelineError, Result};
use crate::models::RegionCode;
use crate::utils::constants::{GEOMETRY_COLUMN, REGION_CODE_COLUMN};

/// One region of the canonical environmental dataset: a GeoJSON feature with
/// a `NUTS_ID` property, one property per environmental variable and an
/// opaque geometry. Geometry and unrecognized members are never interpreted,
/// only carried through rewrites.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionFeature {
    #[serde(rename = "type")]
    pub feature_type: String,

    #[serde(default, deserialize_with = "null_as_empty_map")]
    pub properties: Map<String, Value>,

    #[serde(default)]
    pub geometry: Value,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RegionFeature {
    pub fn new(code: impl Into<String>) -> Self {
        let mut properties = Map::new();
        properties.insert(
            REGION_CODE_COLUMN.to_string(),
            Value::String(code.into()),
        );
        Self {
            feature_type: "Feature".to_string(),
            properties,
            geometry: Value::Null,
            extra: Map::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn with_geometry(mut self, geometry: Value) -> Self {
        self.geometry = geometry;
        self
    }

    /// The region code carried by this feature, if present and textual.
    pub fn region_code(&self) -> Option<RegionCode> {
        self.properties
            .get(REGION_CODE_COLUMN)
            .and_then(Value::as_str)
            .map(RegionCode::new)
    }
}

/// The canonical environmental dataset for one NUTS level: a GeoJSON
/// FeatureCollection keyed by `NUTS_ID`. The single source of truth; mutated
/// only by appending a column per accepted submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionDataset {
    #[serde(rename = "type")]
    pub collection_type: String,

    pub features: Vec<RegionFeature>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RegionDataset {
    pub fn new(features: Vec<RegionFeature>) -> Self {
        Self {
            collection_type: "FeatureCollection".to_string(),
            features,
            extra: Map::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// The canonical code universe: every region code in the dataset.
    /// Fails if any feature lacks a textual region code, since the merge
    /// contract depends on the key being present everywhere.
    pub fn region_codes(&self) -> Result<BTreeSet<RegionCode>> {
        let mut codes = BTreeSet::new();
        for (index, feature) in self.features.iter().enumerate() {
            let code = feature.region_code().ok_or_else(|| {
                PipelineError::InvalidFormat(format!(
                    "feature {} has no textual '{}' property",
                    index, REGION_CODE_COLUMN
                ))
            })?;
            codes.insert(code);
        }
        Ok(codes)
    }

    /// All column names a submission's variable name can collide with: the
    /// union of property keys across features plus the geometry
    /// pseudo-column.
    pub fn column_names(&self) -> BTreeSet<String> {
        let mut columns: BTreeSet<String> = self
            .features
            .iter()
            .flat_map(|f| f.properties.keys().cloned())
            .collect();
        columns.insert(GEOMETRY_COLUMN.to_string());
        columns
    }

    /// Environmental variable columns in first-seen property order, skipping
    /// the region key and the centroid metadata columns.
    pub fn variable_columns(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut columns = Vec::new();
        for feature in &self.features {
            for key in feature.properties.keys() {
                if key == REGION_CODE_COLUMN
                    || crate::utils::constants::METADATA_COLUMNS.contains(&key.as_str())
                {
                    continue;
                }
                if seen.insert(key.clone()) {
                    columns.push(key.clone());
                }
            }
        }
        columns
    }

    /// Region counts grouped by the two-letter country prefix of the code.
    /// Features without a textual code are skipped rather than failing,
    /// since this feeds overview output only.
    pub fn country_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for feature in &self.features {
            if let Some(code) = feature.region_code() {
                *counts
                    .entry(code.country_prefix().to_string())
                    .or_insert(0) += 1;
            }
        }
        counts
    }

    /// Left-join a validated value mapping onto the dataset as a new
    /// property. Regions absent from the mapping receive JSON null; the
    /// existing columns are never touched.
    pub fn insert_column(
        &mut self,
        name: &str,
        values: &BTreeMap<RegionCode, f64>,
    ) -> Result<()> {
        if self.column_names().contains(name) {
            return Err(PipelineError::InvalidFormat(format!(
                "column '{}' already exists in the dataset",
                name
            )));
        }

        for (index, feature) in self.features.iter_mut().enumerate() {
            let value = match feature.region_code() {
                Some(code) => match values.get(&code) {
                    Some(number) => {
                        Value::Number(serde_json::Number::from_f64(*number).ok_or_else(
                            || {
                                PipelineError::InvalidFormat(format!(
                                    "value {} for region {} is not representable in JSON",
                                    number, code
                                ))
                            },
                        )?)
                    }
                    None => Value::Null,
                },
                None => {
                    return Err(PipelineError::InvalidFormat(format!(
                        "feature {} has no textual '{}' property",
                        index, REGION_CODE_COLUMN
                    )))
                }
            };
            feature.properties.insert(name.to_string(), value);
        }

        Ok(())
    }
}

fn null_as_empty_map<'de, D>(deserializer: D) -> std::result::Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let properties = Option::<Map<String, Value>>::deserialize(deserializer)?;
    Ok(properties.unwrap_or_default())
}
