//! Local validation of an import document before anything is sent

use serde_json::Value;

use crate::error::{ImportError, ImportResult};
use crate::models::IMPORT_VERSION;

/// Import document that passed the local checks.
///
/// The document is kept as parsed and sent verbatim; entities are not
/// re-shaped on the way through.
#[derive(Debug, Clone)]
pub struct ImportPayload {
    document: Value,
    entity_count: usize,
}

impl ImportPayload {
    /// Parse and validate JSON text
    pub fn parse(input: &str) -> ImportResult<Self> {
        let document: Value = serde_json::from_str(input).map_err(|e| {
            ImportError::InvalidInput(format!("Provided JSON could not be parsed: {}", e))
        })?;
        Self::from_value(document)
    }

    /// Validate an already parsed document
    pub fn from_value(document: Value) -> ImportResult<Self> {
        if !document.get("version").is_some_and(is_supported_version) {
            return Err(ImportError::InvalidInput(
                "Provided JSON does not conform to VW entity import standard; version number mismatch"
                    .into(),
            ));
        }

        let entity_count = document
            .get("entities")
            .and_then(Value::as_array)
            .map(Vec::len)
            .unwrap_or(0);

        if entity_count == 0 {
            return Err(ImportError::InvalidInput(
                "Provided JSON contains no entities".into(),
            ));
        }

        Ok(Self {
            document,
            entity_count,
        })
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn entity_count(&self) -> usize {
        self.entity_count
    }
}

/// Both `2` and `"2"` are accepted
fn is_supported_version(version: &Value) -> bool {
    match version {
        Value::Number(n) => n.as_u64() == Some(u64::from(IMPORT_VERSION)),
        Value::String(s) => s.trim() == IMPORT_VERSION.to_string(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_message(input: &str) -> String {
        match ImportPayload::parse(input) {
            Err(ImportError::InvalidInput(message)) => message,
            other => panic!("expected invalid input, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_document() {
        let payload =
            ImportPayload::parse(r#"{"version": 2, "entities": [{"name": "a"}, {"name": "b"}]}"#)
                .unwrap();
        assert_eq!(payload.entity_count(), 2);
        assert_eq!(payload.document()["entities"][1]["name"], "b");
    }

    #[test]
    fn test_string_version_accepted() {
        assert!(ImportPayload::parse(r#"{"version": "2", "entities": [{}]}"#).is_ok());
    }

    #[test]
    fn test_unparseable() {
        assert!(invalid_message("{not json").starts_with("Provided JSON could not be parsed"));
    }

    #[test]
    fn test_version_checks() {
        for input in [
            r#"{"entities": [{}]}"#,
            r#"{"version": 1, "entities": [{}]}"#,
            r#"{"version": "3", "entities": [{}]}"#,
            r#"{"version": null, "entities": [{}]}"#,
            r#"[{"version": 2}]"#,
        ] {
            assert!(invalid_message(input).contains("version number mismatch"), "{}", input);
        }
    }

    #[test]
    fn test_entity_checks() {
        for input in [
            r#"{"version": 2}"#,
            r#"{"version": 2, "entities": []}"#,
            r#"{"version": 2, "entities": {"a": 1}}"#,
        ] {
            assert_eq!(invalid_message(input), "Provided JSON contains no entities", "{}", input);
        }
    }
}
