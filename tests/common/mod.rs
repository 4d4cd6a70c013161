//! Common test utilities for artifactor integration tests

use std::path::PathBuf;

use tempfile::TempDir;

/// A temporary content repository with an `artifacts/` output directory
#[allow(dead_code)]
pub struct TestRepo {
    /// Temporary directory keeping the repo alive for the test
    pub temp: TempDir,
    /// Path to the repository root
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestRepo {
    /// Create a new empty content repository
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a text file in the repository, creating parent directories
    pub fn write_file(&self, rel: &str, content: &str) {
        let file_path = self.path.join(rel);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Write raw bytes in the repository, creating parent directories
    pub fn write_bytes(&self, rel: &str, content: &[u8]) {
        let file_path = self.path.join(rel);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Path of a file under the default `artifacts/` output directory
    pub fn output_file(&self, rel: &str) -> PathBuf {
        self.path.join("artifacts").join(rel)
    }

    /// Read a file under the default `artifacts/` output directory
    pub fn read_output(&self, rel: &str) -> String {
        std::fs::read_to_string(self.output_file(rel)).expect("Failed to read output file")
    }

    /// Sorted filenames directly under an output bundle directory
    pub fn output_names(&self, bundle: &str) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.output_file(bundle))
            .expect("Failed to read bundle directory")
            .map(|entry| {
                entry
                    .expect("Failed to read bundle entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        names.sort();
        names
    }
}

/// Command for the artifactor binary, rooted at the test repository
#[allow(dead_code)]
pub fn artifactor_cmd(repo: &TestRepo) -> assert_cmd::Command {
    let mut cmd =
        assert_cmd::Command::cargo_bin("artifactor").expect("Failed to find artifactor binary");
    cmd.current_dir(&repo.path);
    cmd
}

/// A minimal playbook document: playbooks carry a top-level tasks mapping
#[allow(dead_code)]
pub const PLAYBOOK_YML: &str = "id: example_test\nversion: -1\ntasks:\n  '0':\n    id: '0'\n    type: start\n";

/// A minimal automation document: no tasks mapping
#[allow(dead_code)]
pub const SCRIPT_YML: &str = "name: example_script\nscript: return_results()\ntype: python\n";
