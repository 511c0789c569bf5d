// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Load settings (config.toml + environment + flags) and start logging
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 1 = query failed, 2 = error)
//
// Notices for the user go to stderr; stdout only carries the rendered
// views, so `hub-io query owner/repo --format json > out.json` works.
// =============================================================================

mod cli;
mod config;
mod error;
mod export;
mod github;
mod i18n;
mod render;
mod session;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use cli::{CacheAction, Cli, Commands, GlobalArgs, RenderArgs};
use config::Settings;
use export::{CopyTarget, SystemClipboard};
use github::{ContributorCache, GithubClient};
use i18n::messages::*;
use i18n::{I18n, Language};
use render::MosaicOptions;
use session::{Notice, Outcome, Session, ShellCommand};

const EXAMPLE_REPO: &str = "minorcell/hub-io";

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = success
//   Ok(1) = the query failed (bad input, unknown repo, API error)
//   Err   = unexpected error (exit code 2)
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let mut settings = Settings::load().context("loading configuration")?;
    apply_global_flags(&mut settings, &cli.global);

    match cli.command {
        Commands::Query { repo, render } => handle_query(settings, &cli.global, &repo, &render).await,
        Commands::Shell { render } => handle_shell(settings, &cli.global, &render).await,
        Commands::Lang { language } => handle_lang(&settings, &cli.global, language),
        Commands::Cache { action } => handle_cache(&settings, &cli.global, action),
    }
}

// Logs go to stderr. HUB_IO_LOG (or RUST_LOG) picks the filter; --verbose
// forces debug output for this crate.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("hub_io=debug")
    } else {
        std::env::var("HUB_IO_LOG")
            .ok()
            .map(EnvFilter::new)
            .or_else(|| EnvFilter::try_from_default_env().ok())
            .unwrap_or_else(|| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn apply_global_flags(settings: &mut Settings, global: &GlobalArgs) {
    if let Some(token) = &global.token {
        settings.token = Some(token.clone());
    }
    if let Some(api_base) = &global.api_base {
        settings.api_base = api_base.clone();
    }
    if global.no_cache {
        settings.persist_cache = false;
    }
}

fn build_session(mut settings: Settings, global: &GlobalArgs, render: &RenderArgs) -> Result<Session> {
    if let Some(per_page) = render.per_page {
        settings.per_page = per_page;
    }
    if let Some(max_pages) = render.max_pages {
        settings.max_pages = max_pages;
    }

    let client = GithubClient::new(settings.client_options()).context("creating GitHub client")?;

    let cache = match settings.cache_file() {
        Some(path) => ContributorCache::load(path, settings.cache_ttl),
        None => ContributorCache::in_memory(settings.cache_ttl),
    };

    let i18n = run_language(I18n::load(settings.language_file()), &settings, global);

    Ok(Session::new(client, cache, i18n, !global.no_cache))
}

// --lang (or HUB_IO_LANG / config.toml) overrides the saved language for this run
fn run_language(i18n: I18n, settings: &Settings, global: &GlobalArgs) -> I18n {
    match global.lang.or(settings.language) {
        Some(language) => i18n.with_language(language),
        None => i18n,
    }
}

// Handles the 'query' subcommand
async fn handle_query(settings: Settings, global: &GlobalArgs, repo: &str, render: &RenderArgs) -> Result<i32> {
    let mut session = build_session(settings, global, render)?;

    match session.search(repo).await {
        Outcome::Found(contributors) => {
            deliver(&mut session, &contributors, render).await?;
            Ok(0)
        }
        Outcome::NoData => Ok(0),
        // Failures that are not about the query itself are internal errors
        Outcome::Failed(e) if !e.is_user_facing() => Ok(2),
        Outcome::Rejected | Outcome::Failed(_) => Ok(1),
    }
}

// Handles the 'shell' subcommand
//
// Reads one line at a time from stdin, like pressing Enter in a search box.
async fn handle_shell(settings: Settings, global: &GlobalArgs, render: &RenderArgs) -> Result<i32> {
    let mut session = build_session(settings, global, render)?;

    eprintln!("{}", session.i18n().tr(&APP_INFO));
    eprintln!("{}", session.i18n().tr(&SHELL_HELP));
    eprintln!("{}: {}", session.i18n().tr(&EXAMPLE), EXAMPLE_REPO);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        eprint!("{}> ", session.i18n().tr(&REPOSITORY_URL));
        std::io::stderr().flush().ok();

        let Some(line) = lines.next_line().await.context("reading stdin")? else {
            break;
        };

        match ShellCommand::parse(&line) {
            ShellCommand::Search(input) => {
                if let Outcome::Found(contributors) = session.search(&input).await {
                    // A failed export should not end the session
                    if let Err(e) = deliver(&mut session, &contributors, render).await {
                        session.notify(Notice::Error(format!("{e:#}")));
                    }
                }
            }
            ShellCommand::Lang(choice) => {
                let language = match choice {
                    Some(language) => {
                        session.set_language(language);
                        language
                    }
                    None => session.toggle_language(),
                };
                let msg = session
                    .i18n()
                    .t(&LANGUAGE_CURRENT, &[("language", language.to_string())]);
                session.notify(Notice::Success(msg));
            }
            ShellCommand::ClearCache => session.clear_cache(),
            ShellCommand::Help => eprintln!("{}", session.i18n().tr(&SHELL_HELP)),
            ShellCommand::Quit => break,
            ShellCommand::Unknown(_) => {
                let msg = session.i18n().tr(&SHELL_HELP);
                session.notify(Notice::Warning(msg));
            }
        }

        // Notices were already printed
        session.take_notices();
    }

    Ok(0)
}

// Renders the requested views and sends them to files, stdout and/or the clipboard
async fn deliver(session: &mut Session, contributors: &[github::Contributor], render: &RenderArgs) -> Result<()> {
    let mosaic_options = MosaicOptions {
        max_width: render.width,
        ..MosaicOptions::default()
    };
    let artifacts = export::build_artifacts(
        session.client().http(),
        contributors,
        render.format,
        render.image_format,
        mosaic_options,
        render.copy,
    )
    .await
    .context("rendering contributors")?;

    if let Some(image) = &artifacts.image {
        if image.missing > 0 {
            let msg = session
                .i18n()
                .t(&AVATARS_MISSING, &[("count", image.missing.to_string())]);
            session.notify(Notice::Warning(msg));
        }
    }

    match &render.out_dir {
        Some(dir) => {
            let written = export::write_files(dir, &artifacts, render.format)
                .with_context(|| format!("writing files to {}", dir.display()))?;
            for path in written {
                let msg = session
                    .i18n()
                    .t(&FILE_WRITTEN, &[("path", path.display().to_string())]);
                session.notify(Notice::Success(msg));
            }
            if artifacts.image.is_some() && render.format.wants_image() {
                let msg = session.i18n().tr(&IMAGE_EXPORTED);
                session.notify(Notice::Success(msg));
            }
        }
        None => print_artifacts(session, &artifacts, render)?,
    }

    if let Some(target) = render.copy {
        copy_artifact(session, &artifacts, target);
    }

    Ok(())
}

// Prints the text views to stdout; the image goes to a file in the current
// directory (or to stdout as a data URL with --data-url)
fn print_artifacts(session: &mut Session, artifacts: &export::Artifacts, render: &RenderArgs) -> Result<()> {
    let format = render.format;
    let mut sections = Vec::new();

    if let Some(json) = artifacts.json.as_ref().filter(|_| format.wants_json()) {
        sections.push(json.clone());
    }
    if let Some(table) = artifacts.table.as_ref().filter(|_| format.wants_table()) {
        sections.push(table.clone());
    }
    if let Some(markdown) = artifacts.markdown.as_ref().filter(|_| format.wants_markdown()) {
        sections.push(markdown.trim_end().to_string());
    }

    if let Some(image) = artifacts.image.as_ref().filter(|_| format.wants_image()) {
        if render.data_url {
            sections.push(image.data_url());
        } else {
            let path = export::write_file(Path::new("."), &image.file_name(), &image.bytes)
                .context("saving mosaic image")?;
            let written = session
                .i18n()
                .t(&FILE_WRITTEN, &[("path", path.display().to_string())]);
            session.notify(Notice::Success(written));
            let msg = session.i18n().tr(&IMAGE_EXPORTED);
            session.notify(Notice::Success(msg));
        }
    }

    if let Some(text) = stdout_text(&sections) {
        println!("{text}");
    }
    Ok(())
}

// Sections separated by a blank line; None when there is nothing to print
fn stdout_text(sections: &[String]) -> Option<String> {
    if sections.is_empty() {
        None
    } else {
        Some(sections.join("\n\n"))
    }
}

// Clipboard problems (no display, no permission) are warnings, not failures
fn copy_artifact(session: &mut Session, artifacts: &export::Artifacts, target: CopyTarget) {
    let result = SystemClipboard::open()
        .and_then(|mut clipboard| export::copy_to(&mut clipboard, artifacts, target));

    let notice = match result {
        Ok(true) => {
            let text = match target {
                CopyTarget::Json => &JSON_COPIED,
                CopyTarget::Table => &MARKDOWN_COPIED,
                CopyTarget::Image => &IMAGE_COPIED,
            };
            Notice::Success(session.i18n().tr(text))
        }
        Ok(false) => Notice::Warning(session.i18n().tr(&NO_DATA)),
        Err(e) => Notice::Warning(
            session
                .i18n()
                .t(&CLIPBOARD_FAILED, &[("error", e.to_string())]),
        ),
    };
    session.notify(notice);
}

// Handles the 'lang' subcommand
fn handle_lang(settings: &Settings, global: &GlobalArgs, language: Option<Language>) -> Result<i32> {
    let mut saved = I18n::load(settings.language_file());

    let current = match language {
        Some(language) => {
            saved.set_language(language);
            language
        }
        None => saved.toggle(),
    };

    let i18n = run_language(saved, settings, global);

    println!("{}", i18n.t(&LANGUAGE_CURRENT, &[("language", current.to_string())]));
    let hint = match current {
        Language::En => &SWITCH_TO_CHINESE,
        Language::Zh => &SWITCH_TO_ENGLISH,
    };
    println!("  hub-io lang  ({})", i18n.tr(hint));
    Ok(0)
}

// Handles the 'cache' subcommand
fn handle_cache(settings: &Settings, global: &GlobalArgs, action: CacheAction) -> Result<i32> {
    let i18n = run_language(I18n::load(settings.language_file()), settings, global);

    match action {
        CacheAction::Clear => {
            // Expired or corrupt entries load as an empty cache; the file still goes
            if let Some(path) = settings.cache_file() {
                ContributorCache::load(path, settings.cache_ttl).clear();
            }
            println!("{}", Notice::Success(i18n.tr(&CACHE_CLEARED)));
        }
        CacheAction::Path => match settings.cache_file() {
            Some(path) => println!("{}", path.display()),
            None => println!("(cache is not persisted)"),
        },
    }
    Ok(0)
}
