//! Read-only program introspection model
//!
//! Mirrors the parts of a project document the player glue looks at:
//! targets, their instruction nodes (opcode + fields) and their variables.
//! Block and variable payloads stay as JSON values so that one malformed
//! entry can be skipped without rejecting the whole document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{StagehandError, StagehandResult};

/// Read-only view over loaded program entities
pub trait ProgramView {
    fn targets(&self) -> &[Target];
}

/// A decoded project document
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub targets: Vec<Target>,
}

impl Project {
    pub fn new(targets: Vec<Target>) -> Self {
        Project { targets }
    }

    /// Decode a project document (`project.json`)
    pub fn from_json_str(json: &str) -> StagehandResult<Self> {
        serde_json::from_str(json).map_err(|e| StagehandError::InvalidProject(e.to_string()))
    }

    pub fn from_slice(bytes: &[u8]) -> StagehandResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| StagehandError::InvalidProject(e.to_string()))
    }
}

impl ProgramView for Project {
    fn targets(&self) -> &[Target] {
        &self.targets
    }
}

impl ProgramView for Vec<Target> {
    fn targets(&self) -> &[Target] {
        self
    }
}

fn default_original() -> bool {
    true
}

/// One program entity (stage, sprite, or a runtime clone of a sprite)
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_stage: bool,
    /// Documents only contain originals; clones exist at run time
    #[serde(default = "default_original")]
    pub is_original: bool,
    #[serde(default)]
    pub variables: Map<String, Value>,
    #[serde(default)]
    pub blocks: Map<String, Value>,
}

impl Target {
    pub fn new(name: impl Into<String>) -> Self {
        Target {
            name: name.into(),
            is_original: true,
            ..Default::default()
        }
    }

    pub fn stage() -> Self {
        Target {
            is_stage: true,
            ..Target::new("Stage")
        }
    }

    /// Mark as a runtime clone
    pub fn into_clone(mut self) -> Self {
        self.is_original = false;
        self
    }

    /// Add an instruction node in document form
    pub fn with_block(mut self, id: &str, opcode: &str, fields: &[(&str, &str)]) -> Self {
        let mut field_map = Map::new();
        for (name, value) in fields {
            field_map.insert(
                (*name).to_string(),
                Value::Array(vec![Value::String((*value).to_string()), Value::Null]),
            );
        }
        let mut block = Map::new();
        block.insert("opcode".to_string(), Value::String(opcode.to_string()));
        block.insert("fields".to_string(), Value::Object(field_map));
        self.blocks.insert(id.to_string(), Value::Object(block));
        self
    }

    /// Add a variable in document form
    pub fn with_variable(mut self, id: &str, name: &str, value: Value) -> Self {
        self.variables.insert(
            id.to_string(),
            Value::Array(vec![Value::String(name.to_string()), value]),
        );
        self
    }

    /// Instruction nodes in document order; entries that are not objects are skipped
    pub fn blocks(&self) -> impl Iterator<Item = BlockRef<'_>> {
        self.blocks.iter().filter_map(|(id, node)| {
            node.as_object().map(|node| BlockRef { id, node })
        })
    }

    /// Variables in document order; malformed entries are skipped
    pub fn variables(&self) -> impl Iterator<Item = VariableRef<'_>> {
        self.variables.values().filter_map(VariableRef::from_value)
    }

    pub fn variable_named(&self, name: &str) -> Option<VariableRef<'_>> {
        self.variables().find(|v| v.name == name)
    }
}

/// Borrowed view of one instruction node
#[derive(Clone, Copy, Debug)]
pub struct BlockRef<'a> {
    pub id: &'a str,
    node: &'a Map<String, Value>,
}

impl<'a> BlockRef<'a> {
    pub fn opcode(&self) -> Option<&'a str> {
        self.node.get("opcode").and_then(Value::as_str)
    }

    /// Field value in document form (`[value, id]`), runtime form
    /// (`{"value": v}`) or as a bare string
    pub fn field_value(&self, name: &str) -> Option<&'a str> {
        let field = self.node.get("fields")?.get(name)?;
        match field {
            Value::String(s) => Some(s.as_str()),
            Value::Array(items) => items.first().and_then(Value::as_str),
            Value::Object(obj) => obj.get("value").and_then(Value::as_str),
            _ => None,
        }
    }
}

/// Borrowed view of one variable
#[derive(Clone, Copy, Debug)]
pub struct VariableRef<'a> {
    pub name: &'a str,
    pub value: &'a Value,
}

impl<'a> VariableRef<'a> {
    fn from_value(raw: &'a Value) -> Option<Self> {
        match raw {
            Value::Array(items) => Some(VariableRef {
                name: items.first()?.as_str()?,
                value: items.get(1)?,
            }),
            Value::Object(obj) => Some(VariableRef {
                name: obj.get("name")?.as_str()?,
                value: obj.get("value")?,
            }),
            _ => None,
        }
    }

    /// Display text of the value (strings unquoted)
    pub fn display(&self) -> String {
        match self.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
