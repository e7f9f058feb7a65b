use serde::{Deserialize, Serialize};

/// One entry of the append-only environmental-variable version log: the
/// variable's name and the monotonically increasing version assigned when it
/// was merged into the canonical dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub variable: String,
    pub version: u64,
}

impl VersionRecord {
    pub fn new(variable: impl Into<String>, version: u64) -> Self {
        Self {
            variable: variable.into(),
            version,
        }
    }
}

/// The version log as loaded from disk. Records are kept in file order;
/// an absent log file reads as an empty log whose maximum version is 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersionLog {
    records: Vec<VersionRecord>,
}

impl VersionLog {
    pub fn new(records: Vec<VersionRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[VersionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn max_version(&self) -> u64 {
        self.records.iter().map(|r| r.version).max().unwrap_or(0)
    }

    pub fn next_version(&self) -> u64 {
        self.max_version() + 1
    }

    pub fn contains_variable(&self, name: &str) -> bool {
        self.records.iter().any(|r| r.variable == name)
    }

    /// Records introduced at or before the given version, oldest first.
    /// Used to resolve which variables a model run was trained against.
    pub fn records_up_to(&self, version: u64) -> Vec<&VersionRecord> {
        let mut records: Vec<&VersionRecord> = self
            .records
            .iter()
            .filter(|r| r.version <= version)
            .collect();
        records.sort_by_key(|r| r.version);
        records
    }
}
