//! The bundling engine.
//!
//! Walks a content repository, classifies every regular file by directory
//! role and filename pattern, computes its flattened destination name, and
//! writes it into the content or test bundle. YAML files are re-emitted
//! through the engine's own serializer on the way so no ordered-map type
//! tags survive into the bundles.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::bundle::{Bundle, BundleTarget};
use crate::content::{self, Role};
use crate::error::{ArtifactorError, Result};
use crate::normalize::{self, CopyOutcome};
use crate::progress::ProgressDisplay;

/// Directory of pack sub-repositories under the artifacts root.
const PACKS_DIR: &str = "Packs";

/// Source directory of the common documentation assets.
const DOCUMENTATION_DIR: &str = "Documentation";

/// Documentation assets copied verbatim into the bundles when present.
const COMMON_DOC_FILES: &[&str] = &["doc-CommonServer.json", "doc-howto.json"];

/// Copy counters for one bundle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CopyStats {
    pub files: usize,
    pub normalized: usize,
    pub raw_copied: usize,
}

impl CopyStats {
    fn record(&mut self, outcome: CopyOutcome) {
        self.files += 1;
        match outcome {
            CopyOutcome::Normalized => self.normalized += 1,
            CopyOutcome::Raw => self.raw_copied += 1,
        }
    }

    fn absorb(&mut self, other: CopyStats) {
        self.files += other.files;
        self.normalized += other.normalized;
        self.raw_copied += other.raw_copied;
    }
}

/// Counters for one full bundling run.
#[derive(Debug, Default, Clone, Copy)]
pub struct CreateSummary {
    pub content: CopyStats,
    pub test: CopyStats,
    pub docs_copied: usize,
}

impl CreateSummary {
    fn absorb(&mut self, other: CreateSummary) {
        self.content.absorb(other.content);
        self.test.absorb(other.test);
        self.docs_copied += other.docs_copied;
    }
}

/// One role directory scheduled for copying into a bundle.
#[derive(Debug, Clone)]
pub struct BundleJob {
    pub source_dir: PathBuf,
    pub target: BundleTarget,
}

/// Engine state for one bundling run: the artifacts root, the two bundle
/// handles, the content-version tag, and the preserve flag.
#[derive(Debug)]
pub struct ContentCreator {
    artifacts_path: PathBuf,
    pub content_bundle: Bundle,
    pub test_bundle: Bundle,
    packs_bundle_path: PathBuf,
    content_version: Option<String>,
    preserve_bundles: bool,
}

impl ContentCreator {
    pub fn new(
        artifacts_path: impl Into<PathBuf>,
        content_bundle_path: impl Into<PathBuf>,
        test_bundle_path: impl Into<PathBuf>,
        packs_bundle_path: impl Into<PathBuf>,
        content_version: Option<String>,
        preserve_bundles: bool,
    ) -> Result<Self> {
        let artifacts_path = artifacts_path.into();
        let artifacts_path = dunce::canonicalize(&artifacts_path).map_err(|_| {
            ArtifactorError::ArtifactsPathNotFound {
                path: artifacts_path.display().to_string(),
            }
        })?;
        // an empty version tag means "do not propagate"
        let content_version = content_version.filter(|version| !version.is_empty());

        Ok(Self {
            artifacts_path,
            content_bundle: Bundle::new(content_bundle_path),
            test_bundle: Bundle::new(test_bundle_path),
            packs_bundle_path: packs_bundle_path.into(),
            content_version,
            preserve_bundles,
        })
    }

    pub fn artifacts_path(&self) -> &Path {
        &self.artifacts_path
    }

    /// Create both bundle directories, clearing leftovers from previous runs
    /// unless the engine was constructed with `preserve_bundles`.
    pub fn prepare_bundles(&self) -> Result<()> {
        self.content_bundle.prepare(self.preserve_bundles)?;
        self.test_bundle.prepare(self.preserve_bundles)?;
        Ok(())
    }

    /// Enumerate every directory of this run in its fixed processing order:
    /// role directories at the repository root first, then each pack's role
    /// subdirectories with packs sorted by name. Later jobs win
    /// destination-name collisions.
    pub fn plan(&self) -> Result<Vec<BundleJob>> {
        let mut jobs = Vec::new();
        self.push_role_jobs(&self.artifacts_path, &mut jobs)?;
        for pack_dir in self.pack_dirs()? {
            self.push_role_jobs(&pack_dir, &mut jobs)?;
        }
        Ok(jobs)
    }

    fn push_role_jobs(&self, root: &Path, jobs: &mut Vec<BundleJob>) -> Result<()> {
        for role in Role::ALL {
            let source_dir = root.join(role.dir_name());
            if !source_dir.is_dir() {
                continue;
            }
            let target = if role.is_test() {
                BundleTarget::Test
            } else {
                BundleTarget::Content
            };
            // package-style content (one folder per integration or script)
            // keeps its files a level down; each folder gets its own
            // non-recursive copy call
            let subdirs = immediate_subdirs(&source_dir)?;
            jobs.push(BundleJob { source_dir, target });
            for source_dir in subdirs {
                jobs.push(BundleJob { source_dir, target });
            }
        }
        Ok(())
    }

    /// Pack directories under `Packs/`, sorted by name so collision winners
    /// are reproducible. Missing `Packs/` just means there is nothing to do.
    pub fn pack_dirs(&self) -> Result<Vec<PathBuf>> {
        let packs_root = self.artifacts_path.join(PACKS_DIR);
        if !packs_root.is_dir() {
            return Ok(Vec::new());
        }
        immediate_subdirs(&packs_root)
    }

    /// Run the scheduled jobs in order, routing each directory into its
    /// bundle. Aborts on the first filesystem error.
    pub fn run_jobs(
        &self,
        jobs: &[BundleJob],
        progress: Option<&ProgressDisplay>,
    ) -> Result<CreateSummary> {
        let mut summary = CreateSummary::default();
        for job in jobs {
            if let Some(progress) = progress {
                progress.start_dir(&job.source_dir.display().to_string());
            }
            match job.target {
                BundleTarget::Content => summary
                    .content
                    .absorb(self.copy_dir_files(&job.source_dir, &self.content_bundle)?),
                BundleTarget::Test => summary
                    .test
                    .absorb(self.copy_dir_files(&job.source_dir, &self.test_bundle)?),
            }
            if let Some(progress) = progress {
                progress.inc();
            }
        }
        Ok(summary)
    }

    /// One full bundling run: prepare the bundles, copy every role directory
    /// at the root and in every pack, then add the documentation assets.
    /// Library-level convenience over the individual operations; the CLI
    /// drives them itself to report progress.
    #[allow(dead_code)]
    pub fn create_content(&self) -> Result<CreateSummary> {
        self.prepare_bundles()?;
        let mut root_jobs = Vec::new();
        self.push_role_jobs(&self.artifacts_path, &mut root_jobs)?;
        let mut summary = self.run_jobs(&root_jobs, None)?;
        summary.absorb(self.copy_packs_content_to_bundles(&self.pack_dirs()?)?);
        summary.docs_copied =
            self.copy_docs_files(self.content_bundle.dir(), &self.packs_bundle_path)?;
        Ok(summary)
    }

    /// Copy every regular file directly under `source_dir` into `bundle`,
    /// flattened under its computed destination name. Does not recurse;
    /// nested directories get one call each from the planner.
    pub fn copy_dir_files(&self, source_dir: &Path, bundle: &Bundle) -> Result<CopyStats> {
        let role = source_dir
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(Role::from_dir_name);

        let mut stats = CopyStats::default();
        for entry in WalkDir::new(source_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| ArtifactorError::DirReadFailed {
                path: source_dir.display().to_string(),
                reason: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let outcome = match entry.file_name().to_str() {
                Some(name) => self.copy_content_file(entry.path(), role, name, bundle)?,
                // names the pattern rules cannot apply to are carried as-is
                None => {
                    let dest = bundle.dir().join(entry.file_name());
                    raw_copy(entry.path(), &dest)?
                }
            };
            stats.record(outcome);
        }
        Ok(stats)
    }

    /// Classify, rename, and write a single content file.
    fn copy_content_file(
        &self,
        path: &Path,
        role: Option<Role>,
        name: &str,
        bundle: &Bundle,
    ) -> Result<CopyOutcome> {
        let doc = if normalize::is_yaml_file(name) {
            match fs::read_to_string(path) {
                Ok(text) => normalize::parse_document(&text),
                // not valid UTF-8: treated like any other malformed
                // structured file and carried over byte-for-byte
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => None,
                Err(e) => {
                    return Err(ArtifactorError::FileReadFailed {
                        path: path.display().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        } else {
            None
        };

        let kind = content::classify(role, name, doc.as_ref());
        let dest = bundle.file_path(&content::destination_name(role, kind, name));

        match doc {
            Some(doc) => {
                let doc = normalize::normalize_document(doc, self.content_version.as_deref());
                let text =
                    serde_yaml::to_string(&doc).map_err(|e| ArtifactorError::YamlEmitFailed {
                        path: path.display().to_string(),
                        reason: e.to_string(),
                    })?;
                fs::write(&dest, text).map_err(|e| ArtifactorError::FileWriteFailed {
                    path: dest.display().to_string(),
                    reason: e.to_string(),
                })?;
                Ok(CopyOutcome::Normalized)
            }
            None => raw_copy(path, &dest),
        }
    }

    /// Copy the supplied pack directories into the bundles: every role
    /// subdirectory present routes by role, `TestPlaybooks` to the test
    /// bundle and everything else to the content bundle. Packs are processed
    /// in input order, so later packs overwrite earlier ones on collisions.
    pub fn copy_packs_content_to_bundles(&self, pack_dirs: &[PathBuf]) -> Result<CreateSummary> {
        let mut jobs = Vec::new();
        for pack_dir in pack_dirs {
            self.push_role_jobs(pack_dir, &mut jobs)?;
        }
        self.run_jobs(&jobs, None)
    }

    /// Copy the fixed documentation assets into the content bundle root and
    /// under `Base/Documentation` in the packs bundle. Docs are best-effort
    /// additions: assets missing at the source are skipped silently.
    pub fn copy_docs_files(
        &self,
        content_bundle_path: &Path,
        packs_bundle_path: &Path,
    ) -> Result<usize> {
        let mut copied = 0;
        for doc_file in COMMON_DOC_FILES {
            let source = self
                .artifacts_path
                .join(DOCUMENTATION_DIR)
                .join(doc_file);
            if !source.is_file() {
                continue;
            }

            raw_copy(&source, &content_bundle_path.join(doc_file))?;

            let packs_docs_dir = packs_bundle_path.join("Base").join(DOCUMENTATION_DIR);
            fs::create_dir_all(&packs_docs_dir).map_err(|e| {
                ArtifactorError::FileWriteFailed {
                    path: packs_docs_dir.display().to_string(),
                    reason: e.to_string(),
                }
            })?;
            raw_copy(&source, &packs_docs_dir.join(doc_file))?;
            copied += 1;
        }
        Ok(copied)
    }
}

fn immediate_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut subdirs = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| ArtifactorError::DirReadFailed {
            path: dir.display().to_string(),
            reason: e.to_string(),
        })?;
        if entry.file_type().is_dir() {
            subdirs.push(entry.into_path());
        }
    }
    Ok(subdirs)
}

fn raw_copy(source: &Path, dest: &Path) -> Result<CopyOutcome> {
    fs::copy(source, dest).map_err(|e| ArtifactorError::FileWriteFailed {
        path: dest.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(CopyOutcome::Raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        repo: PathBuf,
        out: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let repo = temp.path().join("content");
            let out = temp.path().join("artifacts");
            fs::create_dir_all(&repo).unwrap();
            fs::create_dir_all(&out).unwrap();
            Self {
                _temp: temp,
                repo,
                out,
            }
        }

        fn write(&self, rel: &str, content: &str) {
            let path = self.repo.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }

        fn creator(&self) -> ContentCreator {
            ContentCreator::new(
                &self.repo,
                self.out.join("content_bundle"),
                self.out.join("test_bundle"),
                self.out.join("packs"),
                None,
                false,
            )
            .unwrap()
        }
    }

    const PLAYBOOK_YML: &str = "id: FeedAzure_test\ntasks:\n  '0':\n    id: '0'\n";
    const SCRIPT_YML: &str = "name: test_script\nscript: return\n";

    #[test]
    fn test_new_rejects_missing_artifacts_path() {
        let temp = TempDir::new().unwrap();
        let result = ContentCreator::new(
            temp.path().join("no_such_repo"),
            temp.path().join("content_bundle"),
            temp.path().join("test_bundle"),
            temp.path().join("packs"),
            None,
            false,
        );
        assert!(matches!(
            result.unwrap_err(),
            ArtifactorError::ArtifactsPathNotFound { .. }
        ));
    }

    #[test]
    fn test_copy_dir_files_flattens_and_preserves_bytes() {
        let fixture = Fixture::new();
        fixture.write("Integrations/Securonix/Securonix_unified.yml", "id: Securonix\n");
        let image = "Integrations/Securonix/Securonix_image.png";
        fixture.write(image, "\u{89}PNG fake bytes");

        let creator = fixture.creator();
        creator.prepare_bundles().unwrap();
        let stats = creator
            .copy_dir_files(
                &fixture.repo.join("Integrations/Securonix"),
                &creator.content_bundle,
            )
            .unwrap();

        assert_eq!(stats.files, 2);
        assert_eq!(stats.normalized, 1);
        assert_eq!(stats.raw_copied, 1);
        // non-structured files are byte-identical at the destination
        assert_eq!(
            fs::read(creator.content_bundle.file_path("Securonix_image.png")).unwrap(),
            fs::read(fixture.repo.join(image)).unwrap()
        );
        assert!(
            creator
                .content_bundle
                .file_path("Securonix_unified.yml")
                .exists()
        );
    }

    #[test]
    fn test_copy_dir_files_missing_source_aborts() {
        let fixture = Fixture::new();
        let creator = fixture.creator();
        creator.prepare_bundles().unwrap();

        let result =
            creator.copy_dir_files(&fixture.repo.join("Scripts"), &creator.content_bundle);
        assert!(matches!(
            result.unwrap_err(),
            ArtifactorError::DirReadFailed { .. }
        ));
    }

    #[test]
    fn test_malformed_yaml_falls_back_to_raw_copy() {
        let fixture = Fixture::new();
        fixture.write("Scripts/broken.yml", "key: [unclosed");

        let creator = fixture.creator();
        creator.prepare_bundles().unwrap();
        let stats = creator
            .copy_dir_files(&fixture.repo.join("Scripts"), &creator.content_bundle)
            .unwrap();

        assert_eq!(stats.raw_copied, 1);
        assert_eq!(
            fs::read_to_string(creator.content_bundle.file_path("broken.yml")).unwrap(),
            "key: [unclosed"
        );
    }

    #[test]
    fn test_pack_test_playbooks_scenario() {
        let fixture = Fixture::new();
        let pack = "Packs/FeedAzure/TestPlaybooks";
        fixture.write(&format!("{pack}/FeedAzure_test.yml"), PLAYBOOK_YML);
        fixture.write(
            &format!("{pack}/playbook-FeedAzure_test_copy_no_prefix.yml"),
            PLAYBOOK_YML,
        );
        fixture.write(&format!("{pack}/just_a_test_script.yml"), SCRIPT_YML);
        fixture.write(&format!("{pack}/script-prefixed_automation.yml"), SCRIPT_YML);

        let creator = fixture.creator();
        creator.prepare_bundles().unwrap();
        let summary = creator
            .copy_packs_content_to_bundles(&[fixture.repo.join("Packs/FeedAzure")])
            .unwrap();

        assert_eq!(summary.test.files, 4);
        assert_eq!(summary.content.files, 0);

        let mut names: Vec<_> = fs::read_dir(creator.test_bundle.dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "playbook-FeedAzure_test.yml",
                "playbook-FeedAzure_test_copy_no_prefix.yml",
                "script-just_a_test_script.yml",
                "script-prefixed_automation.yml",
            ]
        );
    }

    #[test]
    fn test_bundles_are_disjoint() {
        let fixture = Fixture::new();
        fixture.write("Packs/FeedAzure/Scripts/automation.yml", SCRIPT_YML);
        fixture.write("Packs/FeedAzure/TestPlaybooks/FeedAzure_test.yml", PLAYBOOK_YML);

        let fixture_creator = fixture.creator();
        fixture_creator.prepare_bundles().unwrap();
        fixture_creator
            .copy_packs_content_to_bundles(&[fixture.repo.join("Packs/FeedAzure")])
            .unwrap();

        let content_names: Vec<_> = fs::read_dir(fixture_creator.content_bundle.dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        let test_names: Vec<_> = fs::read_dir(fixture_creator.test_bundle.dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();

        assert_eq!(content_names, vec!["automation.yml"]);
        assert_eq!(test_names, vec!["playbook-FeedAzure_test.yml"]);
    }

    #[test]
    fn test_later_pack_wins_name_collision() {
        let fixture = Fixture::new();
        fixture.write("Packs/Alpha/Reports/report-shared.json", "{\"from\": \"alpha\"}");
        fixture.write("Packs/Beta/Reports/report-shared.json", "{\"from\": \"beta\"}");

        let creator = fixture.creator();
        creator.prepare_bundles().unwrap();
        creator
            .copy_packs_content_to_bundles(&[
                fixture.repo.join("Packs/Alpha"),
                fixture.repo.join("Packs/Beta"),
            ])
            .unwrap();

        let winner =
            fs::read_to_string(creator.content_bundle.file_path("report-shared.json")).unwrap();
        assert_eq!(winner, "{\"from\": \"beta\"}");
    }

    #[test]
    fn test_content_version_propagates_through_copy() {
        let fixture = Fixture::new();
        fixture.write(
            "Scripts/script-Sleep.yml",
            "name: Sleep\ncontentVersion: 0.0.0\n",
        );

        let creator = ContentCreator::new(
            &fixture.repo,
            fixture.out.join("content_bundle"),
            fixture.out.join("test_bundle"),
            fixture.out.join("packs"),
            Some("2.5.0".to_string()),
            false,
        )
        .unwrap();
        creator.prepare_bundles().unwrap();
        creator
            .copy_dir_files(&fixture.repo.join("Scripts"), &creator.content_bundle)
            .unwrap();

        let text =
            fs::read_to_string(creator.content_bundle.file_path("script-Sleep.yml")).unwrap();
        assert!(text.contains("contentVersion: 2.5.0"));
    }

    #[test]
    fn test_create_content_full_run() {
        let fixture = Fixture::new();
        fixture.write("Scripts/script-Sleep.yml", "name: Sleep\nscript: sleep\n");
        fixture.write("TestPlaybooks/script-Sleep-for-testplaybook.yml", SCRIPT_YML);
        fixture.write("Packs/FeedAzure/TestPlaybooks/FeedAzure_test.yml", PLAYBOOK_YML);
        fixture.write("Documentation/doc-howto.json", "{\"howto\": true}");

        let creator = fixture.creator();
        let summary = creator.create_content().unwrap();

        assert_eq!(summary.content.files, 1);
        assert_eq!(summary.test.files, 2);
        assert_eq!(summary.docs_copied, 1);
        assert!(creator.content_bundle.file_path("script-Sleep.yml").exists());
        assert!(
            creator
                .test_bundle
                .file_path("script-Sleep-for-testplaybook.yml")
                .exists()
        );
        assert!(
            creator
                .test_bundle
                .file_path("playbook-FeedAzure_test.yml")
                .exists()
        );
        assert!(fixture.out.join("content_bundle/doc-howto.json").exists());
        assert!(
            fixture
                .out
                .join("packs/Base/Documentation/doc-howto.json")
                .exists()
        );
    }

    #[test]
    fn test_plan_orders_root_roles_before_packs() {
        let fixture = Fixture::new();
        fixture.write("Scripts/script-Sleep.yml", SCRIPT_YML);
        fixture.write("TestPlaybooks/a_test.yml", SCRIPT_YML);
        fixture.write("Packs/Beta/Scripts/b.yml", SCRIPT_YML);
        fixture.write("Packs/Alpha/Scripts/a.yml", SCRIPT_YML);

        let creator = fixture.creator();
        let jobs = creator.plan().unwrap();
        let dirs: Vec<_> = jobs
            .iter()
            .map(|job| {
                job.source_dir
                    .strip_prefix(creator.artifacts_path())
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();

        assert_eq!(
            dirs,
            vec![
                "Scripts",
                "TestPlaybooks",
                "Packs/Alpha/Scripts",
                "Packs/Beta/Scripts",
            ]
        );
        assert_eq!(jobs[1].target, BundleTarget::Test);
    }

    #[test]
    fn test_plan_includes_package_subdirs() {
        let fixture = Fixture::new();
        fixture.write(
            "Integrations/Securonix/Securonix_unified.yml",
            "id: Securonix\n",
        );
        fixture.write("Integrations/integration-Whois.yml", "id: Whois\n");

        let creator = fixture.creator();
        let jobs = creator.plan().unwrap();
        let dirs: Vec<_> = jobs
            .iter()
            .map(|job| {
                job.source_dir
                    .strip_prefix(creator.artifacts_path())
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();

        assert_eq!(dirs, vec!["Integrations", "Integrations/Securonix"]);

        creator.prepare_bundles().unwrap();
        creator.run_jobs(&jobs, None).unwrap();
        assert!(
            creator
                .content_bundle
                .file_path("Securonix_unified.yml")
                .exists()
        );
        assert!(
            creator
                .content_bundle
                .file_path("integration-Whois.yml")
                .exists()
        );
    }
}
