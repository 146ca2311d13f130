//! CSV readers for nickname and relation files
//!
//! Files have no header row and rows of varying length. Quote characters
//! (single and double) are plain text: they never group fields and are
//! stripped from every field.

use std::io::Read;

use crate::error::Result;
use crate::models::{
    AliasEntity, ApplicationEntity, EditList, Entity, NameKey, PortType, RelationEntity,
};

/// Read `WWN,nickname` rows into alias entities
pub fn read_nicknames<R: Read>(
    input: R,
    port_type: PortType,
    name_key: NameKey,
) -> Result<Vec<Entity>> {
    let mut entities = Vec::new();

    for (row, fields) in read_rows(input)?.into_iter().enumerate() {
        if fields.len() < 2 {
            tracing::debug!("Skipping nickname row {}: fewer than 2 fields", row + 1);
            continue;
        }
        entities.push(Entity::Alias(AliasEntity {
            name: fields[1].clone(),
            wwn: fields[0].clone(),
            port_type,
            name_key,
        }));
    }

    Ok(entities)
}

/// Read `type,name,member...` rows into relation or application entities
pub fn read_relations<R: Read>(input: R) -> Result<Vec<Entity>> {
    let mut entities = Vec::new();

    for (row, mut fields) in read_rows(input)?.into_iter().enumerate() {
        if fields.len() < 3 {
            tracing::debug!("Skipping relation row {}: fewer than 3 fields", row + 1);
            continue;
        }

        let members: Vec<String> = fields
            .split_off(2)
            .into_iter()
            .filter(|m| !m.is_empty())
            .collect();
        let (entity_type, name) = (&fields[0], &fields[1]);

        if entity_type.eq_ignore_ascii_case("application") {
            entities.push(Entity::Application(ApplicationEntity::from_members(
                name,
                entity_type,
                members,
            )));
        } else {
            entities.push(Entity::Relation(RelationEntity {
                name: name.clone(),
                entity_type: entity_type.clone(),
                child_entities: EditList { add: members },
            }));
        }
    }

    Ok(entities)
}

/// Read every record as cleaned fields
fn read_rows<R: Read>(input: R) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .quoting(false)
        .from_reader(input);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(clean_field).collect());
    }
    Ok(rows)
}

fn clean_field(field: &str) -> String {
    field.replace(['\'', '"'], "").trim().to_string()
}
