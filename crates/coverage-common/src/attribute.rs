//! Array attributes (measured values per cell).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    /// Backend type identifier, e.g. `int16` or `double`.
    pub type_id: String,
    pub nullable: bool,
    /// Free-form annotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, type_id: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            type_id: type_id.into(),
            nullable,
            tag: None,
        }
    }
}
