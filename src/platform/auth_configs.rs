//! Registry of the credential schemas connectors authenticate with.
//!
//! Sources and destinations reference a schema by class name
//! (`auth_config_class`). The detail endpoints resolve that name here to show
//! which fields a user has to fill in.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// A single field of an auth config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigField {
    pub name: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub field_type: String,
    pub required: bool,
    /// Value must never be echoed back to clients
    pub secret: bool,
}

/// The ordered field list of an auth config class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fields {
    pub fields: Vec<ConfigField>,
}

impl Fields {
    /// Looks up the fields of `class_name`, `None` for an unregistered class
    pub fn from_config_class(class_name: &str) -> Option<Fields> {
        registry().get(class_name).cloned()
    }
}

static REGISTRY: OnceLock<HashMap<&'static str, Fields>> = OnceLock::new();

fn field(
    name: &str,
    title: &str,
    description: &str,
    field_type: &str,
    required: bool,
    secret: bool,
) -> ConfigField {
    ConfigField {
        name: name.to_string(),
        title: title.to_string(),
        description: Some(description.to_string()),
        field_type: field_type.to_string(),
        required,
        secret,
    }
}

fn registry() -> &'static HashMap<&'static str, Fields> {
    REGISTRY.get_or_init(|| {
        let api_key = || field("api_key", "API Key", "The API key", "string", true, true);

        let mut classes = HashMap::new();
        classes.insert("APIKeyAuthConfig", Fields { fields: vec![api_key()] });
        classes.insert(
            "URLAndAPIKeyAuthConfig",
            Fields {
                fields: vec![
                    field("url", "URL", "Base URL of the service", "string", true, false),
                    api_key(),
                ],
            },
        );
        classes.insert(
            "OpenAIAuthConfig",
            Fields {
                fields: vec![field(
                    "api_key",
                    "API Key",
                    "The API key for OpenAI",
                    "string",
                    true,
                    true,
                )],
            },
        );
        classes.insert(
            "StripeAuthConfig",
            Fields {
                fields: vec![field(
                    "api_key",
                    "API Key",
                    "The secret key for your Stripe account",
                    "string",
                    true,
                    true,
                )],
            },
        );
        classes.insert(
            "PostgreSQLAuthConfig",
            Fields {
                fields: vec![
                    field(
                        "host",
                        "Host",
                        "The host of the PostgreSQL database",
                        "string",
                        true,
                        false,
                    ),
                    field(
                        "port",
                        "Port",
                        "The port of the PostgreSQL database",
                        "integer",
                        true,
                        false,
                    ),
                    field(
                        "database",
                        "Database",
                        "The name of the database",
                        "string",
                        true,
                        false,
                    ),
                    field("user", "User", "The user to connect as", "string", true, false),
                    field("password", "Password", "The password of the user", "string", true, true),
                    field(
                        "schema",
                        "Schema",
                        "The schema to sync, defaults to public",
                        "string",
                        false,
                        false,
                    ),
                    field(
                        "tables",
                        "Tables",
                        "Comma separated tables to sync, * for all",
                        "string",
                        false,
                        false,
                    ),
                ],
            },
        );
        classes.insert(
            "QdrantAuthConfig",
            Fields {
                fields: vec![
                    field("url", "URL", "Qdrant cluster URL", "string", true, false),
                    field(
                        "api_key",
                        "API Key",
                        "Qdrant API key, empty for local instances",
                        "string",
                        false,
                        true,
                    ),
                ],
            },
        );
        classes.insert(
            "WeaviateAuthConfig",
            Fields {
                fields: vec![
                    field(
                        "cluster_url",
                        "Cluster URL",
                        "Weaviate cluster URL",
                        "string",
                        true,
                        false,
                    ),
                    field("api_key", "API Key", "Weaviate API key", "string", true, true),
                ],
            },
        );
        classes.insert(
            "Neo4jAuthConfig",
            Fields {
                fields: vec![
                    field("uri", "URI", "Bolt URI of the Neo4j instance", "string", true, false),
                    field("username", "Username", "Neo4j user", "string", true, false),
                    field("password", "Password", "Neo4j password", "string", true, true),
                ],
            },
        );
        classes
    })
}
