//! Local project manifests.
//!
//! A manifest describes the local side of a reconciliation run when the
//! caller tracks artifacts itself instead of scanning a directory. Two shapes
//! are accepted and may be mixed in one file:
//!
//! ```yaml
//! repo: noflo/example
//! artifacts:            # flat list, kind on every entry
//!   - { name: add, kind: component, sha: 3b18e5, changed: false, language: javascript }
//! graphs:               # grouped lists, kind implied by the key
//!   - { name: "My Graph", sha: 9a0364 }
//! components: []
//! specs:
//!   - { name: add, language: yaml, code: "" }
//! ```
//!
//! In grouped entries `code`, when present, decides `has_content`. Graph
//! entries exported by noflo-ui keep their tracking under `properties`
//! (`{ name: main, properties: { sha: 9a0364, changed: false } }`); those
//! values win over the flat `sha` / `changed` fields.

use std::path::Path;

use serde::Deserialize;

use crate::error::ManifestError;
use crate::kind::ArtifactKind;
use crate::types::{ContentHash, LocalArtifact, LocalProject, RepoId};

#[derive(Debug, Deserialize)]
struct ManifestFile {
    #[serde(default)]
    repo: Option<RepoId>,
    #[serde(default)]
    artifacts: Vec<LocalArtifact>,
    #[serde(default)]
    graphs: Vec<GroupedEntry>,
    #[serde(default)]
    components: Vec<GroupedEntry>,
    #[serde(default)]
    specs: Vec<GroupedEntry>,
}

#[derive(Debug, Deserialize)]
struct GroupedEntry {
    name: String,
    #[serde(default)]
    sha: Option<ContentHash>,
    #[serde(default)]
    changed: Option<bool>,
    #[serde(default)]
    has_content: Option<bool>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    properties: Option<GraphProperties>,
}

/// Tracking fields nested under a graph's `properties`.
#[derive(Debug, Default, Deserialize)]
struct GraphProperties {
    #[serde(default)]
    sha: Option<ContentHash>,
    #[serde(default)]
    changed: Option<bool>,
}

impl GroupedEntry {
    fn into_artifact(self, kind: ArtifactKind) -> LocalArtifact {
        let has_content = match (&self.code, self.has_content) {
            (Some(code), _) => !code.is_empty(),
            (None, Some(flag)) => flag,
            (None, None) => true,
        };
        let properties = match kind {
            ArtifactKind::Graph => self.properties.unwrap_or_default(),
            _ => GraphProperties::default(),
        };
        LocalArtifact {
            name: self.name,
            kind,
            content_hash: properties.sha.or(self.sha),
            changed: properties.changed.or(self.changed),
            has_content,
            language: self.language,
            path: None,
        }
    }
}

impl From<ManifestFile> for LocalProject {
    fn from(file: ManifestFile) -> Self {
        let mut artifacts = file.artifacts;
        let grouped = [
            (ArtifactKind::Graph, file.graphs),
            (ArtifactKind::Component, file.components),
            (ArtifactKind::Spec, file.specs),
        ];
        for (kind, entries) in grouped {
            artifacts.extend(entries.into_iter().map(|e| e.into_artifact(kind)));
        }
        LocalProject {
            repo: file.repo,
            artifacts,
        }
    }
}

/// Load a manifest, choosing the parser by file extension.
pub fn load(path: &Path) -> Result<LocalProject, ManifestError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let parse: fn(&str, &Path) -> Result<ManifestFile, ManifestError> = match ext.as_deref() {
        Some("json") => parse_json,
        Some("yaml") | Some("yml") => parse_yaml,
        _ => {
            return Err(ManifestError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };
    let contents = std::fs::read_to_string(path).map_err(|e| ManifestError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(parse(&contents, path)?.into())
}

/// Parse a JSON manifest from a string.
pub fn from_json_str(contents: &str) -> Result<LocalProject, ManifestError> {
    Ok(parse_json(contents, Path::new("<inline>"))?.into())
}

/// Parse a YAML manifest from a string.
pub fn from_yaml_str(contents: &str) -> Result<LocalProject, ManifestError> {
    Ok(parse_yaml(contents, Path::new("<inline>"))?.into())
}

fn parse_json(contents: &str, path: &Path) -> Result<ManifestFile, ManifestError> {
    serde_json::from_str(contents).map_err(|e| ManifestError::Json {
        path: path.to_path_buf(),
        source: e,
    })
}

fn parse_yaml(contents: &str, path: &Path) -> Result<ManifestFile, ManifestError> {
    serde_yaml::from_str(contents).map_err(|e| ManifestError::Yaml {
        path: path.to_path_buf(),
        source: e,
    })
}
