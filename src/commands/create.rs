//! Create command: one full bundling run over a content repository

use console::Style;

use crate::cli::CreateArgs;
use crate::creator::ContentCreator;
use crate::error::Result;
use crate::progress::ProgressDisplay;

/// Run create command
pub fn run(args: CreateArgs, verbose: bool) -> Result<()> {
    let content_bundle_path = args.output.join("content_bundle");
    let test_bundle_path = args.output.join("test_bundle");
    let packs_bundle_path = args.output.join("packs");

    let creator = ContentCreator::new(
        args.artifacts_path,
        &content_bundle_path,
        &test_bundle_path,
        &packs_bundle_path,
        args.content_version,
        args.preserve_bundles,
    )?;

    creator.prepare_bundles()?;
    let jobs = creator.plan()?;
    if verbose {
        println!("Bundling {} directories from {}:", jobs.len(), creator.artifacts_path().display());
        for job in &jobs {
            println!("  {}", job.source_dir.display());
        }
    }

    let progress = ProgressDisplay::new(jobs.len() as u64);
    let mut summary = match creator.run_jobs(&jobs, Some(&progress)) {
        Ok(summary) => summary,
        Err(e) => {
            progress.abandon();
            return Err(e);
        }
    };
    summary.docs_copied =
        creator.copy_docs_files(creator.content_bundle.dir(), &packs_bundle_path)?;
    progress.finish();

    let done = Style::new().bold().green();
    println!(
        "{} {} content files -> {}",
        done.apply_to("Bundled"),
        summary.content.files,
        content_bundle_path.display()
    );
    println!(
        "{} {} test files -> {}",
        done.apply_to("Bundled"),
        summary.test.files,
        test_bundle_path.display()
    );
    if verbose {
        let normalized = summary.content.normalized + summary.test.normalized;
        let raw = summary.content.raw_copied + summary.test.raw_copied;
        println!(
            "  {} normalized, {} copied raw, {} docs copied",
            normalized, raw, summary.docs_copied
        );
    }

    Ok(())
}
