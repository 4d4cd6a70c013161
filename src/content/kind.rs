//! Filename-pattern classification of content items.
//!
//! Pure functions only, so the dispatch rules are testable without touching
//! the filesystem. The parsed document is passed in by the caller for the one
//! case where the filename alone cannot decide (bare test playbooks).

use serde_yaml::Value;

use super::role::Role;
use crate::normalize;

/// Filename prefix carried by playbook files in a flattened bundle.
pub const PLAYBOOK_PREFIX: &str = "playbook-";

/// Filename prefix carried by script/automation files in a flattened bundle.
pub const SCRIPT_PREFIX: &str = "script-";

/// Inferred category of a single content file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Playbook,
    Script,
    Other,
}

/// Classify a file by its name and the role of the directory it sits in.
///
/// Test playbooks are allowed on disk without the `playbook-` prefix; they
/// are told apart from test scripts by the top-level `tasks` mapping every
/// playbook carries, which is why the parsed document is consulted for
/// unprefixed YAML files under `TestPlaybooks`.
pub fn classify(role: Option<Role>, name: &str, doc: Option<&Value>) -> FileKind {
    if name.starts_with(PLAYBOOK_PREFIX) {
        return FileKind::Playbook;
    }

    let in_script_dir = matches!(role, Some(Role::TestPlaybooks | Role::Scripts));
    if in_script_dir && normalize::is_yaml_file(name) {
        if role == Some(Role::TestPlaybooks) && has_tasks(doc) {
            return FileKind::Playbook;
        }
        return FileKind::Script;
    }

    FileKind::Other
}

fn has_tasks(doc: Option<&Value>) -> bool {
    doc.and_then(Value::as_mapping)
        .is_some_and(|mapping| mapping.get(Value::String("tasks".to_string())).is_some())
}

/// Destination filename after flattening.
///
/// Idempotent over its own output: names that already carry the right prefix
/// are returned unchanged. Files outside `TestPlaybooks` keep their basename;
/// production content is required to be prefixed on disk already.
pub fn destination_name(role: Option<Role>, kind: FileKind, name: &str) -> String {
    let in_test_dir = role == Some(Role::TestPlaybooks);
    match kind {
        FileKind::Script if in_test_dir && !name.starts_with(SCRIPT_PREFIX) => {
            format!("{SCRIPT_PREFIX}{name}")
        }
        FileKind::Playbook if in_test_dir && !name.starts_with(PLAYBOOK_PREFIX) => {
            format!("{PLAYBOOK_PREFIX}{name}")
        }
        _ => name.to_string(),
    }
}
