// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Subcommands:
//   query <repo>   fetch once and print / save the views
//   shell          interactive prompt, one repository per line
//   lang [en|zh]   show, set or toggle the remembered language
//   cache clear    drop cached API answers
// =============================================================================

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::export::{CopyTarget, OutputFormat};
use crate::i18n::Language;
use crate::render::ExportFormat;

#[derive(Parser, Debug)]
#[command(
    name = "hub-io",
    version,
    about = "Fetch a GitHub repository's contributors and export them as an image, JSON or an HTML table",
    long_about = "hub-io queries the GitHub REST API for a repository's contributors and renders them \
                  three ways: a circular-avatar mosaic (PNG/WebP), a JSON blob, and an HTML table \
                  you can paste into a README."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

// Options accepted by every subcommand
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// GitHub token (overrides GITHUB_TOKEN / HUB_IO_TOKEN and config.toml)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Interface language for this run (does not change the saved choice)
    #[arg(long, global = true, value_enum)]
    pub lang: Option<Language>,

    /// GitHub API base URL, e.g. for GitHub Enterprise
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Skip the contributor cache
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the contributors of one repository
    ///
    /// Example: hub-io query minorcell/hub-io --format image --out-dir ./out
    Query {
        /// Repository as owner/repo or https://github.com/owner/repo
        repo: String,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Interactive prompt: type owner/repo, press Enter, repeat
    ///
    /// Commands inside the prompt: :lang [en|zh], :clear, :help, :quit
    Shell {
        #[command(flatten)]
        render: RenderArgs,
    },

    /// Show the current language, set it, or toggle it when no value is given
    Lang {
        #[arg(value_enum)]
        language: Option<Language>,
    },

    /// Manage the contributor cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Remove every cached answer
    Clear,
    /// Print where the cache file lives
    Path,
}

// How to render and where to put the results
#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Which views to produce
    #[arg(long, value_enum, default_value_t = OutputFormat::All)]
    pub format: OutputFormat,

    /// Write files into this directory instead of printing to stdout
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Image encoding for the mosaic
    #[arg(long, value_enum, default_value_t = ExportFormat::Png)]
    pub image_format: ExportFormat,

    /// Print the mosaic as a data: URL instead of writing an image file
    #[arg(long)]
    pub data_url: bool,

    /// Put one view on the system clipboard
    #[arg(long, value_enum)]
    pub copy: Option<CopyTarget>,

    /// Maximum mosaic width in logical pixels
    #[arg(long, default_value_t = crate::render::mosaic::MAX_WIDTH)]
    pub width: u32,

    /// Contributors per API page (1-100)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub per_page: Option<u32>,

    /// Stop after this many API pages
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_pages: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_query_defaults() {
        let cli = Cli::parse_from(["hub-io", "query", "minorcell/hub-io"]);
        match cli.command {
            Commands::Query { repo, render } => {
                assert_eq!(repo, "minorcell/hub-io");
                assert_eq!(render.format, OutputFormat::All);
                assert_eq!(render.image_format, ExportFormat::Png);
                assert_eq!(render.width, 800);
                assert!(render.out_dir.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "hub-io", "query", "a/b", "--lang", "zh", "--no-cache", "--format", "json", "--copy", "json",
        ]);
        assert_eq!(cli.global.lang, Some(Language::Zh));
        assert!(cli.global.no_cache);
    }

    #[test]
    fn test_per_page_range_is_enforced() {
        assert!(Cli::try_parse_from(["hub-io", "query", "a/b", "--per-page", "0"]).is_err());
        assert!(Cli::try_parse_from(["hub-io", "query", "a/b", "--per-page", "101"]).is_err());
    }

    #[test]
    fn test_lang_without_value_toggles() {
        let cli = Cli::parse_from(["hub-io", "lang"]);
        assert!(matches!(cli.command, Commands::Lang { language: None }));
    }
}
