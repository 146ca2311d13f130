//! Entity property models from /api/v1/entities

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One `{id, value}` pair of an entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityProperty {
    pub id: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// Entity as listed by /api/v1/entities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRecord {
    #[serde(default)]
    pub properties: Vec<EntityProperty>,
}

impl EntityRecord {
    /// Flatten the property list into an id → value map
    pub fn into_map(self) -> BTreeMap<String, serde_json::Value> {
        self.properties
            .into_iter()
            .map(|p| (p.id, p.value))
            .collect()
    }
}

/// Match mode for entity name filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FilterType {
    #[default]
    ExactMatch,
    Contains,
    StartsWith,
}

impl FilterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterType::ExactMatch => "EXACT_MATCH",
            FilterType::Contains => "CONTAINS",
            FilterType::StartsWith => "STARTS_WITH",
        }
    }
}
