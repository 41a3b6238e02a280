use std::collections::BTreeMap;
use tracing::debug;

use crate::models::{AuthConfigInfo, EntityInfo, SourceInfo};

pub const CONTENT_START_MARKER: &str = "{/* AUTO-GENERATED CONTENT START */}";
pub const CONTENT_END_MARKER: &str = "{/* AUTO-GENERATED CONTENT END */}";

const SOURCE_TREE_URL: &str =
    "https://github.com/airweave-ai/airweave/tree/main/backend/airweave/platform/sources";

/// Human readable name of an auth type
pub fn auth_type_description(auth_type: &str) -> Option<&'static str> {
    let description = match auth_type {
        "oauth2" => "OAuth 2.0 authentication",
        "oauth2_with_refresh" => "OAuth 2.0 with refresh token",
        "oauth2_with_refresh_rotating" => "OAuth 2.0 with rotating refresh token",
        "trello_auth" => "Trello authentication",
        "api_key" => "API key authentication",
        "url_and_api_key" => "URL and API key authentication",
        "config_class" => "Configuration-based authentication",
        "native_functionality" => "Native functionality",
        "basic" => "Basic authentication",
        "none" => "No authentication required",
        _ => return None,
    };
    Some(description)
}

fn is_oauth(auth_type: &str) -> bool {
    matches!(
        auth_type,
        "oauth2" | "oauth2_with_refresh" | "oauth2_with_refresh_rotating"
    )
}

/// Escapes characters MDX would parse as JSX
pub fn escape_mdx_special_chars(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let escaped = text.replace('<', "&lt;").replace('>', "&gt;");
    debug!("Escaping text: '{}' -> '{}'", text, escaped);
    escaped
}

/// `google_drive` -> `Google Drive`
///
/// Every alphabetic character following a non-alphabetic one starts a word.
pub fn display_name(connector_name: &str) -> String {
    let mut out = String::with_capacity(connector_name.len());
    let mut at_word_start = true;

    for c in connector_name.replace('_', " ").chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

fn header(display: &str) -> String {
    format!(
        r#"<div className="connector-header">
  <img src="icon.svg" alt="{display} logo" width="72" height="72" className="connector-icon" />
  <div className="connector-info">
    <h1>{display}</h1>
    <p>Connect your {display} data to Airweave</p>
  </div>
</div>

## Overview

The {display} connector allows you to sync data from {display} into Airweave, making it available for search and retrieval by your agents.
"#
    )
}

fn authentication_section(
    source: &SourceInfo,
    auth_configs: &BTreeMap<String, AuthConfigInfo>,
) -> String {
    let mut content = String::from("#### Authentication\n\n");
    let auth_type = source.auth_type.as_deref();

    if let Some(auth_type) = auth_type {
        let shown = auth_type_description(auth_type).unwrap_or(auth_type);
        content.push_str(&format!("This connector uses **{shown}**.\n\n"));
    }

    let known_config = source
        .auth_config_class
        .as_deref()
        .and_then(|class| auth_configs.get(class).map(|info| (class, info)));

    match (known_config, auth_type) {
        (Some((class, info)), _) => {
            content.push_str(&format!(
                "Authentication configuration class: `{class}`\n\n"
            ));
            if !info.docstring.is_empty() {
                content.push_str(&format!("{}\n\n", info.docstring));
            }
            if !info.fields.is_empty() {
                for field in &info.fields {
                    let description =
                        escape_mdx_special_chars(info.field_description(field, auth_configs));
                    content.push_str(&format!(
                        "<ParamField\n  name=\"{}\"\n  type=\"{}\"\n  required={{{}}}\n>\n  {}\n</ParamField>\n",
                        field.name, field.field_type, field.required, description
                    ));
                }
                content.push('\n');
            }
        }
        (None, Some(auth_type)) if is_oauth(auth_type) => content.push_str(
            "You can connect through the Airweave UI, which will guide you through the OAuth flow.\n\n",
        ),
        (None, Some("none")) => {
            content.push_str("This connector does not require authentication.\n\n")
        }
        (None, _) => content
            .push_str("Please refer to the Airweave documentation for authentication details.\n\n"),
    }

    content
}

fn entities_section(entities: &[EntityInfo]) -> String {
    let mut content = String::from("\n## Entities\n\n");
    content.push_str("The following data models are available for this connector:\n\n");

    for entity in entities {
        content.push_str(&format!("<Accordion title=\"{}\">\n\n", entity.name));
        content.push_str(&format!("{}\n\n", entity.docstring));
        content.push_str("| Field | Type | Description |\n");
        content.push_str("|-------|------|-------------|\n");
        for field in &entity.fields {
            content.push_str(&format!(
                "| {} | {} | {} |\n",
                field.name,
                field.field_type,
                escape_mdx_special_chars(&field.description)
            ));
        }
        content.push_str("\n</Accordion>\n");
    }

    content
}

/// Renders the generated block of a connector page, markers included
pub fn generate_mdx_content(
    connector_name: &str,
    entities: &[EntityInfo],
    sources: &[SourceInfo],
    auth_configs: &BTreeMap<String, AuthConfigInfo>,
) -> String {
    let display = display_name(connector_name);
    let mut content = header(&display);

    if !sources.is_empty() {
        content.push_str("\n## Configuration\n\n");
        for source in sources {
            content.push_str(&format!("\n### {}\n\n{}\n\n", source.name, source.docstring));
            content.push_str(&authentication_section(source, auth_configs));
        }
    }

    content.push_str(&format!(
        r#"
<Card
  title="View Source Code"
  icon="brands github"
  href="{SOURCE_TREE_URL}/{connector_name}.py"
>
  Explore the {display} connector implementation
</Card>
"#
    ));

    if !entities.is_empty() {
        content.push_str(&entities_section(entities));
    }

    format!("{CONTENT_START_MARKER}\n\n{content}\n\n{CONTENT_END_MARKER}")
}
