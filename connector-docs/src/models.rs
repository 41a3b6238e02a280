use serde::Deserialize;
use std::collections::BTreeMap;

/// Description text the metadata extractor emits for undocumented fields
pub const NO_DESCRIPTION: &str = "No description";

#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    pub connectors: Vec<ConnectorMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectorMetadata {
    pub name: String,
    #[serde(default)]
    pub entities: Vec<EntityInfo>,
    #[serde(default)]
    pub sources: Vec<SourceInfo>,
    #[serde(default)]
    pub auth_configs: BTreeMap<String, AuthConfigInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntityInfo {
    pub name: String,
    #[serde(default)]
    pub docstring: String,
    #[serde(default)]
    pub fields: Vec<EntityField>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntityField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceInfo {
    pub name: String,
    #[serde(default)]
    pub docstring: String,
    pub auth_type: Option<String>,
    pub auth_config_class: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfigInfo {
    #[serde(default)]
    pub docstring: String,
    #[serde(default)]
    pub fields: Vec<AuthField>,
    pub parent_class: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
}

impl AuthConfigInfo {
    /// Description of `field`, falling back to the parent class's
    /// description of the same-named field when it has none of its own
    pub fn field_description<'a>(
        &'a self,
        field: &'a AuthField,
        auth_configs: &'a BTreeMap<String, AuthConfigInfo>,
    ) -> &'a str {
        if field.description != NO_DESCRIPTION {
            return &field.description;
        }

        self.parent_class
            .as_ref()
            .and_then(|parent| auth_configs.get(parent))
            .and_then(|parent| {
                parent
                    .fields
                    .iter()
                    .find(|f| f.name == field.name && f.description != NO_DESCRIPTION)
            })
            .map(|f| f.description.as_str())
            .unwrap_or(&field.description)
    }
}
