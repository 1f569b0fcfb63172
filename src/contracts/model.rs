use std::collections::BTreeMap;

use serde_json::Value;

#[derive(Clone, Debug, PartialEq)]
pub struct Contract {
    pub value: Value,
    pub mime_type: String,
}

/// A deployed service as registered in one environment.
///
/// `capabilities` are keyed by communication type, `expectations` by provider
/// name and then communication type.
#[derive(Clone, Debug, PartialEq)]
pub struct Service {
    pub name: String,
    pub version: String,
    pub capabilities: BTreeMap<String, Contract>,
    pub expectations: BTreeMap<String, BTreeMap<String, Contract>>,
}

impl Service {
    pub fn is_provider(&self) -> bool {
        !self.capabilities.is_empty()
    }

    pub fn is_consumer(&self) -> bool {
        !self.expectations.is_empty()
    }
}
