use std::fs;
use std::path::Path;
use tracing::info;

use crate::{
    errors::DocsError,
    generator::{CONTENT_END_MARKER, CONTENT_START_MARKER},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Created,
    Replaced,
    Appended,
}

/// Byte range of the marked region in `text`, end marker included
fn marked_region(text: &str) -> Option<(usize, usize)> {
    let start = text.find(CONTENT_START_MARKER)?;
    let end = text[start..].find(CONTENT_END_MARKER)? + start + CONTENT_END_MARKER.len();
    Some((start, end))
}

/// Writes a generated block into an MDX page
///
/// A missing page is created. An existing page has its marked region
/// replaced, keeping everything around it; without markers the block is
/// appended.
pub fn update_mdx_file(path: &Path, content: &str) -> Result<UpdateOutcome, DocsError> {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(DocsError::io(parent))?;
        }
        fs::write(path, content).map_err(DocsError::io(path))?;
        info!("Created {}", path.display());
        return Ok(UpdateOutcome::Created);
    }

    let existing = fs::read_to_string(path).map_err(DocsError::io(path))?;
    let (updated, outcome) = match marked_region(&existing) {
        Some((start, end)) => (
            format!("{}{}{}", &existing[..start], content, &existing[end..]),
            UpdateOutcome::Replaced,
        ),
        None if existing.trim().is_empty() => (content.to_string(), UpdateOutcome::Appended),
        None => (
            format!("{}\n\n{}\n", existing.trim_end(), content),
            UpdateOutcome::Appended,
        ),
    };

    fs::write(path, updated).map_err(DocsError::io(path))?;
    info!("Updated {} ({:?})", path.display(), outcome);
    Ok(outcome)
}
