//! YAML round-trip normalization.
//!
//! Structured content files are parsed and re-emitted through `serde_yaml`
//! instead of being copied byte-for-byte. Upstream serializers that keep
//! mappings in insertion order can leave an `!!omap` type tag behind, and the
//! downstream consumers of a bundle cannot parse it; re-emission guarantees
//! the output uses only plain mapping/sequence/scalar nodes.

use std::path::Path;

use serde_yaml::Value;

/// Extensions treated as structured YAML content.
const YAML_EXTENSIONS: &[&str] = &["yml", "yaml"];

/// Mapping key updated when a content-version tag is configured.
const CONTENT_VERSION_KEY: &str = "contentVersion";

/// Per-file result of a bundle copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Parsed and re-emitted through the engine's own serializer.
    Normalized,
    /// Copied byte-for-byte: non-YAML content, or a file with a YAML
    /// extension that failed to parse.
    Raw,
}

/// True for filenames with a structured-data (YAML) extension.
pub fn is_yaml_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| YAML_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Parse a YAML document. Returns `None` when the text is not well-formed,
/// in which case the caller must fall back to a raw copy.
pub fn parse_document(text: &str) -> Option<Value> {
    serde_yaml::from_str(text).ok()
}

/// Prepare a parsed document for re-emission: drop any serialization tags and
/// propagate the configured content version into a version-bearing mapping.
pub fn normalize_document(doc: Value, content_version: Option<&str>) -> Value {
    let mut doc = strip_tags(doc);
    if let Some(version) = content_version {
        apply_content_version(&mut doc, version);
    }
    doc
}

/// Replace tagged nodes with their underlying value so only plain
/// mapping/sequence/scalar nodes reach the serializer.
fn strip_tags(doc: Value) -> Value {
    match doc {
        Value::Tagged(tagged) => strip_tags(tagged.value),
        Value::Mapping(mapping) => Value::Mapping(
            mapping
                .into_iter()
                .map(|(key, value)| (strip_tags(key), strip_tags(value)))
                .collect(),
        ),
        Value::Sequence(sequence) => Value::Sequence(sequence.into_iter().map(strip_tags).collect()),
        other => other,
    }
}

/// Overwrite the top-level version field when the document embeds one.
/// Documents without the field are left untouched; the engine does not
/// interpret the document beyond this.
fn apply_content_version(doc: &mut Value, version: &str) {
    if let Value::Mapping(mapping) = doc {
        let key = Value::String(CONTENT_VERSION_KEY.to_string());
        if mapping.contains_key(&key) {
            mapping.insert(key, Value::String(version.to_string()));
        }
    }
}
