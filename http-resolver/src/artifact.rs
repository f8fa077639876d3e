use std::collections::BTreeMap;

use crate::framework::{RefSource, ResolvedResource};

/// Documents fetched from every source, concatenated in source order.
///
/// The bytes are kept exactly as served: no reformatting, deduplication or validation happens
/// on the concatenation. Interpreting it, e.g. as a single pipeline definition, is left to the
/// host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    data: Vec<u8>,
}

impl ResolvedArtifact {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

impl ResolvedResource for ResolvedArtifact {
    fn data(&self) -> &[u8] {
        &self.data
    }

    fn annotations(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    fn ref_source(&self) -> Option<&RefSource> {
        None
    }
}
