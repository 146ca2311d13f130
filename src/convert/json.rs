//! Import document output

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::{Entity, ImportDocument};

/// Write entities as a pretty-printed import document followed by a newline
pub fn write_document<W: Write>(entities: Vec<Entity>, writer: W) -> Result<usize> {
    let document = ImportDocument::new(entities);
    let count = document.entities.len();

    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, &document)
        .map_err(|e| AppError::Convert(format!("JSON serialization error: {}", e)))?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    Ok(count)
}

/// Write an import document to a file, or to stdout for `-`
pub fn write_document_to<P: AsRef<Path>>(entities: Vec<Entity>, path: P) -> Result<usize> {
    let path = path.as_ref();

    if path == Path::new("-") {
        return write_document(entities, io::stdout().lock());
    }

    // Ensure parent directory exists
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    write_document(entities, File::create(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EditList, RelationEntity};
    use tempfile::TempDir;

    fn host(name: &str) -> Entity {
        Entity::Relation(RelationEntity {
            name: name.into(),
            entity_type: "host".into(),
            child_entities: EditList {
                add: vec!["hba1".into()],
            },
        })
    }

    #[test]
    fn test_write_document() {
        let mut out = Vec::new();
        let count = write_document(vec![host("h1"), host("h2")], &mut out).unwrap();
        assert_eq!(count, 2);

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("}\n"));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["version"], 2);
        assert_eq!(value["entities"][1]["name"], "h2");
    }

    #[test]
    fn test_write_document_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("import.json");

        let count = write_document_to(vec![host("h1")], &path).unwrap();
        assert_eq!(count, 1);
        assert!(path.exists());
    }
}
