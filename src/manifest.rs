//! # Manifest Model and Parsing
//!
//! This module defines the in-memory shape of a workspace manifest and the
//! logic that reads it from disk. A manifest maps a local directory name to a
//! [`RepositoryDescriptor`] describing what to clone there.
//!
//! ## Supported Formats
//!
//! Two on-disk schemas are accepted, distinguished by the kind of the YAML
//! root node:
//!
//! 1.  **`.repos`** (a mapping):
//!
//!     ```yaml
//!     repositories:
//!       demos:
//!         type: git
//!         url: https://github.com/ros2/demos.git
//!         version: rolling
//!         exclude: [demos/nested.repos]
//!     ```
//!
//! 2.  **`.rosinstall`** (a list of single-key mappings keyed by VCS kind):
//!
//!     ```yaml
//!     - git:
//!         local-name: demos
//!         uri: https://github.com/ros2/demos.git
//!         version: rolling
//!     ```
//!
//! A mapping is only ever decoded as the first format and a list only as the
//! second, so a malformed `.repos` file is reported as such instead of being
//! reinterpreted as an empty `.rosinstall` list.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Component, Path};

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

use crate::defaults::{MANIFEST_EXTENSIONS, SUPPORTED_VCS};
use crate::error::{Error, Result};

/// The version-control system a repository entry declares.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VcsKind {
    /// A git repository, the only kind repoweave can import.
    Git,
    /// Any other declared kind, kept verbatim so it can be reported.
    Unsupported(String),
}

impl VcsKind {
    pub fn is_supported(&self) -> bool {
        matches!(self, VcsKind::Git)
    }
}

impl From<String> for VcsKind {
    fn from(value: String) -> Self {
        if value == SUPPORTED_VCS {
            VcsKind::Git
        } else {
            VcsKind::Unsupported(value)
        }
    }
}

impl From<&str> for VcsKind {
    fn from(value: &str) -> Self {
        VcsKind::from(value.to_string())
    }
}

impl From<VcsKind> for String {
    fn from(kind: VcsKind) -> Self {
        match kind {
            VcsKind::Git => SUPPORTED_VCS.to_string(),
            VcsKind::Unsupported(other) => other,
        }
    }
}

impl fmt::Display for VcsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VcsKind::Git => f.write_str(SUPPORTED_VCS),
            VcsKind::Unsupported(other) => f.write_str(other),
        }
    }
}

/// One repository entry of a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    /// VCS kind, written as `type` in `.repos` files.
    #[serde(rename = "type")]
    pub kind: VcsKind,
    /// Remote location to clone from.
    pub url: String,
    /// Branch, tag or commit to check out. Empty means the default branch.
    #[serde(
        default,
        deserialize_with = "scalar_as_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub version: String,
    /// Nested manifests or directories to skip during recursive imports.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

impl RepositoryDescriptor {
    /// Creates a git descriptor with no version and no exclusions.
    pub fn git(url: impl Into<String>) -> Self {
        Self {
            kind: VcsKind::Git,
            url: url.into(),
            version: String::new(),
            exclude: Vec::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = patterns.into_iter().map(Into::into).collect();
        self
    }
}

/// A parsed manifest: local directory name to repository descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub repositories: BTreeMap<String, RepositoryDescriptor>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, descriptor: RepositoryDescriptor) {
        self.repositories.insert(name.into(), descriptor);
    }

    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RepositoryDescriptor)> {
        self.repositories.iter()
    }

    /// Serializes the manifest in the `.repos` format.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

impl IntoIterator for Manifest {
    type Item = (String, RepositoryDescriptor);
    type IntoIter = std::collections::btree_map::IntoIter<String, RepositoryDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.repositories.into_iter()
    }
}

/// `.repos` document layout
#[derive(Deserialize)]
struct ReposDocument {
    // Required key whose value may be null
    #[serde(deserialize_with = "Option::deserialize")]
    repositories: Option<BTreeMap<String, RepositoryDescriptor>>,
}

/// One entry of a `.rosinstall` list, found under its VCS kind key
#[derive(Deserialize)]
struct RosinstallEntry {
    #[serde(rename = "local-name")]
    local_name: String,
    uri: String,
    #[serde(default, deserialize_with = "scalar_as_string")]
    version: String,
    #[serde(default)]
    exclude: Vec<String>,
}

/// Accepts any YAML scalar where a string is expected, so `version: 2.0`
/// and `version: 2` read the same as their quoted forms.
fn scalar_as_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a scalar version, found {:?}",
            other
        ))),
    }
}

/// Parses manifest content in either supported format.
///
/// Fails when the document is not valid YAML, does not match the schema its
/// root node selects, or declares no repositories.
pub fn parse(yaml_content: &str) -> Result<Manifest> {
    let root: Value = serde_yaml::from_str(yaml_content).map_err(|e| Error::ManifestParse {
        message: e.to_string(),
        hint: None,
    })?;

    let manifest = match root {
        Value::Null => return Err(Error::EmptyManifest),
        Value::Mapping(_) => parse_repos_format(root)?,
        Value::Sequence(_) => parse_rosinstall_format(root)?,
        _ => {
            return Err(Error::ManifestParse {
                message: "expected a mapping with a 'repositories' key or a list of repositories"
                    .to_string(),
                hint: Some(
                    "Use the .repos layout ('repositories:' mapping) or the .rosinstall layout (list of '- git:' entries)"
                        .to_string(),
                ),
            })
        }
    };

    if manifest.is_empty() {
        return Err(Error::EmptyManifest);
    }
    for name in manifest.repositories.keys() {
        check_key(name)?;
    }
    Ok(manifest)
}

/// A key names a directory strictly below the import root, so it must be a
/// relative path made of plain components.
fn check_key(name: &str) -> Result<()> {
    let path = Path::new(name);
    let confined = path
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        && path.components().any(|c| matches!(c, Component::Normal(_)));
    if confined {
        return Ok(());
    }
    Err(Error::ManifestParse {
        message: format!("repository key '{}' leaves the import directory", name),
        hint: Some(
            "Keys must be relative paths without '..', such as 'src/demos'".to_string(),
        ),
    })
}

fn parse_repos_format(root: Value) -> Result<Manifest> {
    let document: ReposDocument =
        serde_yaml::from_value(root).map_err(|e| Error::ManifestParse {
            message: format!("invalid .repos document: {}", e),
            hint: Some(
                "Each entry under 'repositories:' needs 'type' and 'url', with optional 'version' and 'exclude'"
                    .to_string(),
            ),
        })?;

    Ok(Manifest {
        repositories: document.repositories.unwrap_or_default(),
    })
}

fn parse_rosinstall_format(root: Value) -> Result<Manifest> {
    let items: Vec<BTreeMap<String, RosinstallEntry>> =
        serde_yaml::from_value(root).map_err(|e| Error::ManifestParse {
            message: format!("invalid .rosinstall document: {}", e),
            hint: Some(
                "Each list item needs a single VCS key with 'local-name' and 'uri'".to_string(),
            ),
        })?;

    let mut manifest = Manifest::new();
    for (index, item) in items.into_iter().enumerate() {
        if item.len() != 1 {
            return Err(Error::ManifestParse {
                message: format!(
                    "entry {} of .rosinstall document has {} keys, expected exactly one VCS key",
                    index,
                    item.len()
                ),
                hint: None,
            });
        }
        for (kind, entry) in item {
            if manifest.repositories.contains_key(&entry.local_name) {
                return Err(Error::ManifestParse {
                    message: format!("duplicate local-name '{}'", entry.local_name),
                    hint: Some("Every repository needs a unique local-name".to_string()),
                });
            }
            manifest.insert(
                entry.local_name,
                RepositoryDescriptor {
                    kind: VcsKind::from(kind),
                    url: entry.uri,
                    version: entry.version,
                    exclude: entry.exclude,
                },
            );
        }
    }
    Ok(manifest)
}

/// Returns true if the path carries one of the manifest extensions.
pub fn is_manifest_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| MANIFEST_EXTENSIONS.contains(&ext))
}

/// Checks that a manifest path exists and has a manifest extension.
pub fn validate_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::ManifestNotFound {
            path: path.to_path_buf(),
        });
    }
    if !is_manifest_file(path) {
        return Err(Error::InvalidManifestExtension {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Reads and parses a manifest file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Manifest> {
    let path = path.as_ref();
    validate_path(path)?;
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}
