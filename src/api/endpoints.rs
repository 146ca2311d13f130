//! REST API endpoints for VirtualWisdom

use crate::models::{FilterType, TransactionId};

/// API endpoint paths
pub mod paths {
    // Entity import transaction
    pub const IMPORT_START: &str = "/api/v1/entitiesimport/start";
    pub const IMPORT_COMMIT: &str = "/api/v1/entitiesimport/commit";
    pub const IMPORT_DISCARD: &str = "/api/v1/entitiesimport/discard";
    pub const IMPORT_STATUS: &str = "/api/v1/entitiesimport/status";

    // Entity lookup
    pub const ENTITIES: &str = "/api/v1/entities";
}

/// Query for the import status endpoint
pub fn status_query(transaction_id: Option<&TransactionId>) -> Vec<(&'static str, String)> {
    transaction_id
        .map(|id| ("transactionId", id.to_string()))
        .into_iter()
        .collect()
}

/// Entity lookup query parameters
#[derive(Debug, Clone)]
pub struct EntityQuery {
    pub kind: String,
    pub filter_text: Option<String>,
    pub filter_type: FilterType,
}

impl EntityQuery {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            filter_text: None,
            filter_type: FilterType::default(),
        }
    }

    /// Filter on entity name
    pub fn filter(mut self, text: &str, filter_type: FilterType) -> Self {
        self.filter_text = Some(text.to_string());
        self.filter_type = filter_type;
        self
    }

    /// Query pairs; the match mode is only sent along with a filter text
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("type", self.kind.clone())];
        if let Some(text) = &self.filter_text {
            pairs.push(("filterText", text.clone()));
            pairs.push(("filterType", self.filter_type.as_str().to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_query() {
        let id = TransactionId::Number(7);
        assert_eq!(status_query(Some(&id)), vec![("transactionId", "7".to_string())]);
        assert!(status_query(None).is_empty());
    }

    #[test]
    fn test_entity_query_pairs() {
        assert_eq!(
            EntityQuery::new("host").to_pairs(),
            vec![("type", "host".to_string())]
        );

        let filtered = EntityQuery::new("fcport").filter("50:", FilterType::StartsWith);
        assert_eq!(
            filtered.to_pairs(),
            vec![
                ("type", "fcport".to_string()),
                ("filterText", "50:".to_string()),
                ("filterType", "STARTS_WITH".to_string()),
            ]
        );
    }
}
