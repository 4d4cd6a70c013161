//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// artifactor - content artifact bundler
///
/// Flatten a content repository into a deployable content bundle and a test bundle.
#[derive(Parser, Debug)]
#[command(
    name = "artifactor",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Content artifact bundler for content repositories",
    long_about = "artifactor walks a hierarchically-organized content repository (Scripts, \
                  Integrations, Playbooks, TestPlaybooks, Packs, ...) and flattens it into \
                  two artifacts: a content bundle with all deployable files and a test \
                  bundle with all test-only files, normalizing YAML on the way.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  artifactor create\n    \
                  artifactor create -a ./content -o ./artifacts\n    \
                  artifactor create --content-version 2.5.0\n    \
                  artifactor create --preserve-bundles\n\n\
                  \x1b[1m\x1b[32mDocumentation:\x1b[0m\n    \
                  https://github.com/artifactor-dev/artifactor"
)]
pub struct Cli {
    /// Print a summary line for every copied directory
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the content and test bundles from a content repository
    Create(CreateArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the create command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Bundle the repository in the current directory:\n    artifactor create\n\n\
                  Bundle a repository elsewhere:\n    artifactor create -a ~/src/content\n\n\
                  Write bundles under a build directory:\n    artifactor create -o build/artifacts\n\n\
                  Stamp a release version into version-bearing files:\n    artifactor create --content-version 2.5.0\n\n\
                  Keep files from a previous partial run:\n    artifactor create --preserve-bundles")]
pub struct CreateArgs {
    /// Content repository root to bundle
    #[arg(long, short = 'a', value_name = "DIR", default_value = ".")]
    pub artifacts_path: PathBuf,

    /// Directory receiving content_bundle/, test_bundle/ and packs/
    #[arg(long, short = 'o', value_name = "DIR", default_value = "artifacts")]
    pub output: PathBuf,

    /// Version tag propagated into files that embed a contentVersion field
    #[arg(long, value_name = "VERSION")]
    pub content_version: Option<String>,

    /// Keep files already present in the bundle directories
    #[arg(long, short = 'p')]
    pub preserve_bundles: bool,
}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    artifactor completions --shell bash > ~/.bash_completion.d/artifactor\n\n\
                  Generate zsh completions:\n    artifactor completions --shell zsh > ~/.zfunc/_artifactor\n\n\
                  Generate fish completions:\n    artifactor completions --shell fish > ~/.config/fish/completions/artifactor.fish")]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(long, value_enum)]
    pub shell: clap_complete::Shell,
}
