//! Generates the MDX pages documenting each connector from extracted
//! connector metadata.

pub mod errors;
pub mod generator;
pub mod models;
pub mod writer;

use std::path::{Path, PathBuf};
use tracing::info;

use errors::DocsError;
use generator::generate_mdx_content;
use models::{ConnectorMetadata, Metadata};
use writer::{update_mdx_file, UpdateOutcome};

pub fn load_metadata(path: &Path) -> Result<Metadata, DocsError> {
    let raw = std::fs::read_to_string(path).map_err(DocsError::io(path))?;
    Ok(serde_json::from_str(&raw)?)
}

/// Pages written in one run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub created: usize,
    pub replaced: usize,
    pub appended: usize,
}

impl Summary {
    fn record(&mut self, outcome: UpdateOutcome) {
        match outcome {
            UpdateOutcome::Created => self.created += 1,
            UpdateOutcome::Replaced => self.replaced += 1,
            UpdateOutcome::Appended => self.appended += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.created + self.replaced + self.appended
    }
}

pub fn page_path(output_dir: &Path, connector: &ConnectorMetadata) -> PathBuf {
    output_dir.join(&connector.name).join("main.mdx")
}

/// Writes `<output_dir>/<name>/main.mdx` for every connector, or only for
/// those named in `only` when it is non-empty
pub fn write_docs(
    metadata: &Metadata,
    output_dir: &Path,
    only: &[String],
) -> Result<Summary, DocsError> {
    if let Some(unknown) = only
        .iter()
        .find(|name| !metadata.connectors.iter().any(|c| &c.name == *name))
    {
        return Err(DocsError::UnknownConnector(unknown.clone()));
    }

    let mut summary = Summary::default();
    for connector in metadata
        .connectors
        .iter()
        .filter(|c| only.is_empty() || only.contains(&c.name))
    {
        info!("Generating docs for {}", connector.name);
        let content = generate_mdx_content(
            &connector.name,
            &connector.entities,
            &connector.sources,
            &connector.auth_configs,
        );
        summary.record(update_mdx_file(&page_path(output_dir, connector), &content)?);
    }

    Ok(summary)
}
