//! Role tags for source directories.
//!
//! A role is determined solely by the directory name, never by file contents.
//! The role decides which bundle a directory's files route to and which
//! naming rules apply to them.

use std::fmt;

/// Functional category of a source directory in a content repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Scripts,
    Integrations,
    Playbooks,
    TestPlaybooks,
    Reports,
    Dashboards,
    Widgets,
    IncidentFields,
    IncidentTypes,
    Classifiers,
    Layouts,
    Connections,
}

impl Role {
    /// Fixed processing order for a bundling run. Later directories win
    /// destination-name collisions, so this order is part of the contract.
    pub const ALL: &'static [Role] = &[
        Role::Scripts,
        Role::Integrations,
        Role::Playbooks,
        Role::TestPlaybooks,
        Role::Reports,
        Role::Dashboards,
        Role::Widgets,
        Role::IncidentFields,
        Role::IncidentTypes,
        Role::Classifiers,
        Role::Layouts,
        Role::Connections,
    ];

    /// Resolve a directory name to its role. Returns `None` for directories
    /// that carry no role (pack subfolders like `ReleaseNotes`, integration
    /// subfolders named after the integration, etc.).
    pub fn from_dir_name(name: &str) -> Option<Role> {
        match name {
            "Scripts" => Some(Role::Scripts),
            "Integrations" => Some(Role::Integrations),
            "Playbooks" => Some(Role::Playbooks),
            "TestPlaybooks" => Some(Role::TestPlaybooks),
            "Reports" => Some(Role::Reports),
            "Dashboards" => Some(Role::Dashboards),
            "Widgets" => Some(Role::Widgets),
            "IncidentFields" => Some(Role::IncidentFields),
            "IncidentTypes" => Some(Role::IncidentTypes),
            "Classifiers" => Some(Role::Classifiers),
            "Layouts" => Some(Role::Layouts),
            "Connections" => Some(Role::Connections),
            _ => None,
        }
    }

    /// Directory name this role is tagged by.
    pub fn dir_name(self) -> &'static str {
        match self {
            Role::Scripts => "Scripts",
            Role::Integrations => "Integrations",
            Role::Playbooks => "Playbooks",
            Role::TestPlaybooks => "TestPlaybooks",
            Role::Reports => "Reports",
            Role::Dashboards => "Dashboards",
            Role::Widgets => "Widgets",
            Role::IncidentFields => "IncidentFields",
            Role::IncidentTypes => "IncidentTypes",
            Role::Classifiers => "Classifiers",
            Role::Layouts => "Layouts",
            Role::Connections => "Connections",
        }
    }

    /// Files from this role land in the test bundle instead of the content bundle.
    pub fn is_test(self) -> bool {
        matches!(self, Role::TestPlaybooks)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}
