//! Importable entity shapes written by the CSV converters

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Import format version understood by the appliance
pub const IMPORT_VERSION: u32 = 2;

/// Port flavours an alias can be attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PortType {
    #[default]
    Fcport,
    Hostport,
    Storageport,
}

/// JSON key used for an alias name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum NameKey {
    /// `new_name`, renames an existing port
    #[default]
    NewName,
    /// `name`, the legacy nickname key
    Name,
}

impl NameKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            NameKey::NewName => "new_name",
            NameKey::Name => "name",
        }
    }
}

/// WWN to nickname mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntity {
    pub name: String,
    pub wwn: String,
    pub port_type: PortType,
    pub name_key: NameKey,
}

impl Serialize for AliasEntity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("AliasEntity", 3)?;
        state.serialize_field(self.name_key.as_str(), &self.name)?;
        state.serialize_field("wwn", &self.wwn)?;
        state.serialize_field("type", &self.port_type)?;
        state.end()
    }
}

/// Add-only edit list (`{"add": [...]}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditList {
    pub add: Vec<String>,
}

/// Parent entity grouping child entities (hba → ports, host → hbas, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationEntity {
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub child_entities: EditList,
}

/// Initiator/target/LUN access pattern of an application
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItlPattern {
    pub edit_type: &'static str,
    pub initiator: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lun: Option<String>,
}

/// Application built from I:T[:L] patterns and device names
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationEntity {
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub itl_patterns: Vec<ItlPattern>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devices: Option<EditList>,
}

impl ApplicationEntity {
    /// Sort members into ITL patterns (`I:T:L` or `I:T`) and plain devices
    pub fn from_members<I>(name: &str, entity_type: &str, members: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut itl_patterns = Vec::new();
        let mut devices = Vec::new();

        for member in members {
            let parts: Vec<&str> = member.split(':').collect();
            match parts.as_slice() {
                [initiator, target, lun] => itl_patterns.push(ItlPattern {
                    edit_type: "add",
                    initiator: initiator.to_string(),
                    target: target.to_string(),
                    lun: Some(lun.to_string()),
                }),
                [initiator, target] => itl_patterns.push(ItlPattern {
                    edit_type: "add",
                    initiator: initiator.to_string(),
                    target: target.to_string(),
                    lun: None,
                }),
                _ => devices.push(member),
            }
        }

        Self {
            name: name.to_string(),
            entity_type: entity_type.to_string(),
            itl_patterns,
            devices: (!devices.is_empty()).then_some(EditList { add: devices }),
        }
    }
}

/// Any entity that can appear in an import document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Entity {
    Alias(AliasEntity),
    Relation(RelationEntity),
    Application(ApplicationEntity),
}

/// Top-level import document
#[derive(Debug, Clone, Serialize)]
pub struct ImportDocument {
    pub version: u32,
    pub entities: Vec<Entity>,
}

impl ImportDocument {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self {
            version: IMPORT_VERSION,
            entities,
        }
    }
}
