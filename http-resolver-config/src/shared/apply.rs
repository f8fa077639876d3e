use serde::{Deserialize, Serialize};

/// What to do when the cluster reports that a manifest object already exists.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Count the object as applied and keep going.
    #[default]
    Ignore,
    /// Fail the apply step like any other rejection.
    Fail,
}

/// Settings of the manifest apply step.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApplyConfig {
    #[serde(default)]
    pub on_conflict: ConflictPolicy,
}
