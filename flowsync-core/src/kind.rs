//! Per-kind configuration: directories, extensions, languages, and paths.
//!
//! Graphs, components, and specs share one reconciliation algorithm; what
//! differs between them lives in the [`KindSpec`] table below.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::LocalArtifact;

/// The three artifact families stored in a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Graph,
    Component,
    Spec,
}

/// Static configuration for one [`ArtifactKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindSpec {
    /// Root-level directory holding artifacts of this kind.
    pub directory: &'static str,
    /// Accepted file extensions, without the leading dot.
    pub extensions: &'static [&'static str],
}

const GRAPH: KindSpec = KindSpec {
    directory: "graphs",
    extensions: &["fbp", "json"],
};

const COMPONENT: KindSpec = KindSpec {
    directory: "components",
    extensions: &["coffee", "js", "hpp", "c", "py"],
};

const SPEC: KindSpec = KindSpec {
    directory: "spec",
    extensions: &["yaml", "coffee"],
};

/// Legacy single-file manifest that is refused rather than interpreted.
pub const LEGACY_MANIFEST: &str = "fbp.json";

/// Graph format that wins when both representations of a graph exist.
pub const CANONICAL_GRAPH_EXTENSION: &str = "json";

/// Graph format dropped in favour of [`CANONICAL_GRAPH_EXTENSION`].
pub const LEGACY_GRAPH_EXTENSION: &str = "fbp";

impl ArtifactKind {
    /// All kinds in fetch and reconciliation order.
    pub fn all() -> &'static [ArtifactKind] {
        &[ArtifactKind::Graph, ArtifactKind::Component, ArtifactKind::Spec]
    }

    pub fn spec(self) -> KindSpec {
        match self {
            ArtifactKind::Graph => GRAPH,
            ArtifactKind::Component => COMPONENT,
            ArtifactKind::Spec => SPEC,
        }
    }

    pub fn directory(self) -> &'static str {
        self.spec().directory
    }

    /// `graphs/`, `components/`, or `spec/`.
    pub fn path_prefix(self) -> String {
        format!("{}/", self.directory())
    }

    /// Whether `file_name` carries one of this kind's extensions.
    pub fn accepts(self, file_name: &str) -> bool {
        extension_of(file_name).is_some_and(|ext| self.spec().extensions.contains(&ext))
    }

    /// The kind whose directory is named `directory`, if any.
    pub fn from_directory(directory: &str) -> Option<ArtifactKind> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.directory() == directory)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Graph => write!(f, "graph"),
            ArtifactKind::Component => write!(f, "component"),
            ArtifactKind::Spec => write!(f, "spec"),
        }
    }
}

// ---------------------------------------------------------------------------
// Names and languages
// ---------------------------------------------------------------------------

/// Replace every whitespace character with `_`.
///
/// Applied to local names before comparing them with remote names.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Final segment of a slash-separated path.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Text after the last `.` of the final path segment.
pub fn extension_of(path: &str) -> Option<&str> {
    let name = file_name(path);
    name.rfind('.').map(|idx| &name[idx + 1..])
}

/// Canonical artifact name: final path segment up to its first `.`.
pub fn artifact_name(path: &str) -> &str {
    let name = file_name(path);
    match name.find('.') {
        Some(idx) => &name[..idx],
        None => name,
    }
}

/// Language tag for a file extension. Unknown extensions pass through.
pub fn language_for_extension(extension: &str) -> String {
    match extension {
        "coffee" => "coffeescript",
        "js" => "javascript",
        "hpp" => "c++",
        "c" => "c",
        "py" => "python",
        other => other,
    }
    .to_string()
}

/// File extension for a language tag. Unknown tags are used verbatim.
pub fn extension_for_language(language: &str) -> &str {
    match language {
        "coffeescript" => "coffee",
        "javascript" | "es2015" => "js",
        "c++" => "hpp",
        "python" => "py",
        other => other,
    }
}

/// Canonical sibling of a legacy graph file: `main.fbp` -> `main.json`.
///
/// Returns `None` for anything that is not a `.fbp` file. Directory parts of
/// `path` are kept.
pub fn canonical_graph_path(path: &str) -> Option<String> {
    let stem = path
        .strip_suffix(LEGACY_GRAPH_EXTENSION)?
        .strip_suffix('.')?;
    if stem.is_empty() || stem.ends_with('/') {
        return None;
    }
    Some(format!("{stem}.{CANONICAL_GRAPH_EXTENSION}"))
}

/// Whether the graph at `path` is hidden by its canonical sibling.
///
/// `siblings` is every accepted graph path from the same listing.
pub fn superseded_graph<'a>(path: &str, mut siblings: impl Iterator<Item = &'a str>) -> bool {
    match canonical_graph_path(path) {
        Some(canonical) => siblings.any(|other| other == canonical),
        None => false,
    }
}

/// Repository path for a local artifact that has no remote counterpart yet.
///
/// Graphs always land at `graphs/<name>.json`; other kinds take their
/// extension from the artifact's language.
pub fn create_path(kind: ArtifactKind, artifact: &LocalArtifact) -> String {
    let name = normalize_name(&artifact.name);
    if kind == ArtifactKind::Graph {
        return format!("{}/{name}.{CANONICAL_GRAPH_EXTENSION}", kind.directory());
    }
    match artifact.language.as_deref() {
        Some(language) => format!(
            "{}/{name}.{}",
            kind.directory(),
            extension_for_language(language)
        ),
        None => format!("{}/{name}", kind.directory()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("coffee", "coffeescript")]
    #[case("js", "javascript")]
    #[case("hpp", "c++")]
    #[case("c", "c")]
    #[case("py", "python")]
    #[case("yaml", "yaml")]
    #[case("fbp", "fbp")]
    #[case("rs", "rs")]
    fn language_mapping(#[case] ext: &str, #[case] lang: &str) {
        assert_eq!(language_for_extension(ext), lang);
    }

    #[rstest]
    #[case("coffeescript", "coffee")]
    #[case("javascript", "js")]
    #[case("es2015", "js")]
    #[case("c++", "hpp")]
    #[case("python", "py")]
    #[case("yaml", "yaml")]
    #[case("c", "c")]
    fn reverse_language_mapping(#[case] lang: &str, #[case] ext: &str) {
        assert_eq!(extension_for_language(lang), ext);
    }

    #[test]
    fn normalize_replaces_all_whitespace() {
        assert_eq!(normalize_name("My Graph"), "My_Graph");
        assert_eq!(normalize_name("a\tb\nc  d"), "a_b_c__d");
        assert_eq!(normalize_name("plain"), "plain");
    }

    #[test]
    fn names_and_extensions_from_paths() {
        assert_eq!(artifact_name("foo.fbp"), "foo");
        assert_eq!(artifact_name("lib/foo.spec.yaml"), "foo");
        assert_eq!(extension_of("foo.spec.yaml"), Some("yaml"));
        assert_eq!(extension_of("Makefile"), None);
        assert_eq!(artifact_name("README"), "README");
    }

    #[test]
    fn accepts_only_strict_extensions() {
        assert!(ArtifactKind::Component.accepts("add.js"));
        assert!(ArtifactKind::Component.accepts("add.c"));
        assert!(!ArtifactKind::Component.accepts("add.abc"));
        assert!(!ArtifactKind::Component.accepts("addjs"));
        assert!(ArtifactKind::Graph.accepts("main.fbp"));
        assert!(ArtifactKind::Spec.accepts("add.yaml"));
        assert!(!ArtifactKind::Spec.accepts("add.js"));
    }

    #[rstest]
    #[case("main.fbp", Some("main.json"))]
    #[case("sub/main.fbp", Some("sub/main.json"))]
    #[case("main.json", None)]
    #[case("mainfbp", None)]
    #[case(".fbp", None)]
    fn canonical_graph_paths(#[case] path: &str, #[case] expected: Option<&str>) {
        assert_eq!(canonical_graph_path(path).as_deref(), expected);
    }

    #[test]
    fn legacy_graph_hidden_only_by_its_own_sibling() {
        let listing = ["a.fbp", "a.json", "b.fbp", "c.json"];
        assert!(superseded_graph("a.fbp", listing.iter().copied()));
        assert!(!superseded_graph("b.fbp", listing.iter().copied()));
        assert!(!superseded_graph("a.json", listing.iter().copied()));
    }

    #[test]
    fn create_path_per_kind() {
        let graph = LocalArtifact::new(ArtifactKind::Graph, "My Graph").with_language("fbp");
        assert_eq!(create_path(ArtifactKind::Graph, &graph), "graphs/My_Graph.json");

        let component =
            LocalArtifact::new(ArtifactKind::Component, "do thing").with_language("es2015");
        assert_eq!(
            create_path(ArtifactKind::Component, &component),
            "components/do_thing.js"
        );

        let spec = LocalArtifact::new(ArtifactKind::Spec, "add").with_language("yaml");
        assert_eq!(create_path(ArtifactKind::Spec, &spec), "spec/add.yaml");

        let cpp = LocalArtifact::new(ArtifactKind::Component, "Blink").with_language("c++");
        assert_eq!(create_path(ArtifactKind::Component, &cpp), "components/Blink.hpp");

        let bare = LocalArtifact::new(ArtifactKind::Component, "bare");
        assert_eq!(create_path(ArtifactKind::Component, &bare), "components/bare");
    }

    #[test]
    fn directories_round_trip() {
        for kind in ArtifactKind::all() {
            assert_eq!(ArtifactKind::from_directory(kind.directory()), Some(*kind));
        }
        assert_eq!(ArtifactKind::Spec.path_prefix(), "spec/");
        assert!(ArtifactKind::from_directory("src").is_none());
    }
}
