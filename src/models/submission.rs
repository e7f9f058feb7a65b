use std::collections::BTreeMap;

use crate::models::RegionCode;

/// A submission exactly as read from disk: rows of raw string fields, no
/// shape or value guarantees. Values stay unparsed so the numeric-domain
/// check runs at its place in the validation order instead of at read time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSubmission {
    rows: Vec<Vec<String>>,
}

impl RawSubmission {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Convenience constructor for two-column tables.
    pub fn from_pairs<C, V>(pairs: &[(C, V)]) -> Self
    where
        C: ToString,
        V: ToString,
    {
        Self {
            rows: pairs
                .iter()
                .map(|(code, value)| vec![code.to_string(), value.to_string()])
                .collect(),
        }
    }
}

/// A submission that has passed every validation stage: a fresh variable
/// name plus exactly one finite value per canonical region code.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSubmission {
    variable: String,
    values: BTreeMap<RegionCode, f64>,
}

impl ValidatedSubmission {
    pub fn new(variable: impl Into<String>, values: BTreeMap<RegionCode, f64>) -> Self {
        Self {
            variable: variable.into(),
            values,
        }
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn values(&self) -> &BTreeMap<RegionCode, f64> {
        &self.values
    }

    pub fn value_for(&self, code: &RegionCode) -> Option<f64> {
        self.values.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_keeps_row_order_and_text() {
        let raw = RawSubmission::from_pairs(&[("PL911", "1.5"), ("PL922", "x")]);
        assert_eq!(raw.len(), 2);
        assert_eq!(raw.rows()[0], vec!["PL911".to_string(), "1.5".to_string()]);
        assert_eq!(raw.rows()[1][1], "x");
    }

    #[test]
    fn test_validated_submission_lookup() {
        let mut values = BTreeMap::new();
        values.insert(RegionCode::new("PL911"), 4.25);
        let submission = ValidatedSubmission::new("BufferGras", values);

        assert_eq!(submission.variable(), "BufferGras");
        assert_eq!(submission.value_for(&RegionCode::new("PL911")), Some(4.25));
        assert_eq!(submission.value_for(&RegionCode::new("PL922")), None);
    }
}
