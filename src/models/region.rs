use std::fmt;

use serde::{Deserialize, Serialize};

/// A NUTS region identifier, e.g. `PL` (country), `PL9` (NUTS1), `PL91`
/// (NUTS2), `PL911` (NUTS3). Validity of a code is defined by membership in
/// the canonical dataset's code universe, not by its shape; this type only
/// carries the identifier and a few structural helpers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionCode(String);

impl RegionCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The two-letter country prefix shared by every NUTS level.
    pub fn country_prefix(&self) -> &str {
        let end = self.0.len().min(2);
        &self.0[..end]
    }

    /// NUTS level implied by the code length, if it matches a known level.
    pub fn level(&self) -> Option<NutsLevel> {
        NutsLevel::from_code_len(self.0.len())
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RegionCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// The three NUTS granularity levels carried by the TickBoard datasets.
/// Submissions are always validated against NUTS3; the coarser levels exist
/// for browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NutsLevel {
    Nuts1,
    Nuts2,
    Nuts3,
}

impl NutsLevel {
    pub fn from_number(level: u8) -> Option<Self> {
        match level {
            1 => Some(NutsLevel::Nuts1),
            2 => Some(NutsLevel::Nuts2),
            3 => Some(NutsLevel::Nuts3),
            _ => None,
        }
    }

    pub fn from_code_len(len: usize) -> Option<Self> {
        match len {
            3 => Some(NutsLevel::Nuts1),
            4 => Some(NutsLevel::Nuts2),
            5 => Some(NutsLevel::Nuts3),
            _ => None,
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            NutsLevel::Nuts1 => 1,
            NutsLevel::Nuts2 => 2,
            NutsLevel::Nuts3 => 3,
        }
    }

    /// File name of the aggregated dataset for this level inside the data
    /// directory.
    pub fn dataset_file_name(&self) -> &'static str {
        match self {
            NutsLevel::Nuts1 => "weighted_aggr_nuts_1.geojson",
            NutsLevel::Nuts2 => "weighted_aggr_nuts_2.geojson",
            NutsLevel::Nuts3 => "weighted_aggr_nuts_3.geojson",
        }
    }
}

impl fmt::Display for NutsLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NUTS{}", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_prefix() {
        assert_eq!(RegionCode::new("PL911").country_prefix(), "PL");
        assert_eq!(RegionCode::new("DE600").country_prefix(), "DE");
        assert_eq!(RegionCode::new("X").country_prefix(), "X");
    }

    #[test]
    fn test_level_from_code_length() {
        assert_eq!(RegionCode::new("PL9").level(), Some(NutsLevel::Nuts1));
        assert_eq!(RegionCode::new("PL91").level(), Some(NutsLevel::Nuts2));
        assert_eq!(RegionCode::new("PL911").level(), Some(NutsLevel::Nuts3));
        assert_eq!(RegionCode::new("PL").level(), None);
        assert_eq!(RegionCode::new("PL91123").level(), None);
    }

    #[test]
    fn test_level_round_trip() {
        for level in [NutsLevel::Nuts1, NutsLevel::Nuts2, NutsLevel::Nuts3] {
            assert_eq!(NutsLevel::from_number(level.number()), Some(level));
        }
        assert_eq!(NutsLevel::from_number(4), None);
    }

    #[test]
    fn test_dataset_file_names() {
        assert_eq!(
            NutsLevel::Nuts3.dataset_file_name(),
            "weighted_aggr_nuts_3.geojson"
        );
        assert_eq!(
            NutsLevel::Nuts1.dataset_file_name(),
            "weighted_aggr_nuts_1.geojson"
        );
    }

    #[test]
    fn test_codes_order_deterministically() {
        let mut codes = vec![
            RegionCode::new("PL922"),
            RegionCode::new("DE600"),
            RegionCode::new("PL911"),
        ];
        codes.sort();
        assert_eq!(codes[0].as_str(), "DE600");
        assert_eq!(codes[2].as_str(), "PL922");
    }
}
