//! Model candidates and the ordered list tried at startup.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one model the loader may try.
///
/// Either a bare file name (`orca-mini-3b-gguf2-q4_0.gguf`), a name without
/// extension (`orca-mini-3b-gguf2-q4_0`), or a path to a GGUF file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelCandidate(String);

impl ModelCandidate {
    /// Create a candidate from an identifier. Surrounding whitespace is trimmed.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_string())
    }

    /// The raw identifier.
    pub fn id(&self) -> &str {
        &self.0
    }

    /// File name used for the local cache and for downloads.
    ///
    /// Appends `.gguf` when the identifier has no extension.
    pub fn file_name(&self) -> String {
        let name = self.0.rsplit(['/', '\\']).next().unwrap_or(&self.0);
        if name.to_ascii_lowercase().ends_with(".gguf") {
            name.to_string()
        } else {
            format!("{name}.gguf")
        }
    }

    /// Whether the identifier refers to a filesystem path rather than a
    /// catalog name.
    pub fn is_path(&self) -> bool {
        self.0.contains('/') || self.0.contains('\\')
    }

    /// Whether this identifier is safe to use as a download file name.
    pub fn is_downloadable(&self) -> bool {
        !self.0.is_empty() && !self.is_path() && !self.0.contains("..")
    }
}

impl fmt::Display for ModelCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered, immutable list of candidates. First successful load wins.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateList(Vec<ModelCandidate>);

impl CandidateList {
    /// Build a list from identifiers, dropping blank entries.
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            ids.into_iter()
                .map(ModelCandidate::new)
                .filter(|c| !c.id().is_empty())
                .collect(),
        )
    }

    /// Parse a comma-separated list (`a.gguf, b.gguf`).
    pub fn parse(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ModelCandidate> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a CandidateList {
    type Item = &'a ModelCandidate;
    type IntoIter = std::slice::Iter<'a, ModelCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
