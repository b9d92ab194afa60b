//! # CLI Layer
//!
//! The only place in the workspace that:
//! - Knows about stdout and stderr
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: shell arguments into typed commands via clap
//! 2. **Context Setup**: logging, layered config, build mode and the [`SiteApi`]
//! 3. **Dispatch**: one arm per command, each a single call into the API
//! 4. **Output**: `render.rs` for terminals, `serde_json` for `--output json`
//!
//! Commands that produce site artifacts (`rss`, `sitemap`, `render`, the HTML
//! flags) always print the artifact itself, whatever the output mode.

use anyhow::{bail, Context};
use chrono::Utc;
use gardenapp::api::SiteApi;
use gardenapp::cdn::client::{Credentials, HttpAdminApi};
use gardenapp::cdn::snapshot::{read_snapshot, snapshot_date, snapshot_path};
use gardenapp::config::{BuildMode, SiteConfig};
use gardenapp::lastmod::{GitLastModified, LastModifiedProvider, NoLastModified};
use gardenapp::likes::HttpItunesLookup;
use gardenapp::listing::{list_items_html, tag_cloud_html};
use gardenapp::markdown::Target;
use gardenapp::store::fs::FileStore;
use gardenapp::store::ContentStore;
use log::{debug, LevelFilter};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::io::Write;

use super::render;
use super::setup::{parse_cli, CdnCommands, Cli, Commands};

pub fn run() -> anyhow::Result<()> {
    let cli = parse_cli();
    init_logging(cli.verbose);

    let root = match &cli.root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("Cannot determine the current directory")?,
    };

    let mut config = SiteConfig::load(&root)?;
    if cli.production {
        config = config.with_mode(BuildMode::Production);
    }
    debug!(
        "Site root {}, content in {}, {} build",
        root.display(),
        config.content_dir.display(),
        config.mode
    );

    let store = FileStore::new(&config.content_dir);
    if cli.no_git {
        dispatch(&cli, SiteApi::new(store, NoLastModified, config))
    } else {
        dispatch(&cli, SiteApi::new(store, GitLastModified::new(root), config))
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();
    // A logger may already be installed when running inside a harness.
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}

fn print_output(output: &str) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    if !output.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    Ok(())
}

fn dispatch<S: ContentStore, L: LastModifiedProvider>(cli: &Cli, api: SiteApi<S, L>) -> anyhow::Result<()> {
    let json = cli.output.is_structured();
    let build = api.build();
    let naked = Commands::Build;
    let command = cli.command.as_ref().unwrap_or(&naked);

    let output = match command {
        Commands::Build => {
            let summary = build.summary()?;
            if json {
                render::to_json(&summary)?
            } else {
                render::render_summary(&summary)
            }
        }
        Commands::List { kind } => {
            let entries = build.list(*kind)?;
            if json {
                render::to_json(&entries)?
            } else {
                render::render_entries(&entries, build.aggregation().now())
            }
        }
        Commands::Tags => {
            let tags = build.tags()?;
            if json {
                render::to_json(tags)?
            } else {
                render::render_tags(tags)
            }
        }
        Commands::Filter { tags, html } => {
            let filtered = build.filter_notes(tags)?;
            if *html {
                let results: Vec<_> = filtered.results.iter().collect();
                format!(
                    "{}\n{}",
                    list_items_html(&results),
                    tag_cloud_html(&filtered.facets)
                )
            } else if json {
                render::to_json(&filtered)?
            } else {
                render::render_filter(&filtered)
            }
        }
        Commands::Tree => {
            let notes = build.notes()?;
            if json {
                render::to_json(notes)?
            } else {
                render::render_tree(notes)
            }
        }
        Commands::Rss => build.rss(api.image_catalog()?.as_ref())?,
        Commands::Sitemap => build.sitemap()?,
        Commands::Render { id, markdown, feed } => {
            let target = if *markdown {
                Target::Markdown
            } else if *feed {
                Target::Feed
            } else {
                Target::Html
            };
            let rendered = build.render(id, target, api.image_catalog()?.as_ref())?;
            if json {
                render::to_json(&rendered)?
            } else {
                rendered.content
            }
        }
        Commands::Audit { html } => {
            let audit = build.audit()?;
            if *html {
                audit.to_html()
            } else if json {
                render::to_json(&audit)?
            } else {
                render::render_audit(&audit)
            }
        }
        Commands::Cdn { action } => cdn(&api, action, json)?,
        Commands::Likes => {
            let lookup = HttpItunesLookup::new()?;
            let likes = api.likes(&lookup)?;
            if json {
                render::to_json(&likes)?
            } else {
                render::render_likes(&likes)
            }
        }
    };

    print_output(&output)
}

fn cdn<S: ContentStore, L: LastModifiedProvider>(
    api: &SiteApi<S, L>,
    action: &CdnCommands,
    json: bool,
) -> anyhow::Result<String> {
    let config = api.config();
    match action {
        CdnCommands::Cache => {
            let (Some(cloud_name), Some(api_key), Some(api_secret)) = (
                config.cdn_cloud_name.clone(),
                config.cdn_api_key.clone(),
                config.cdn_api_secret.clone(),
            ) else {
                bail!("cdn cache needs cdn_cloud_name, cdn_api_key and cdn_api_secret in the site config");
            };
            let admin = HttpAdminApi::new(Credentials {
                cloud_name,
                api_key,
                api_secret,
            })?;
            let path = api.cache_images(&admin, Utc::now())?;
            Ok(render::render_cached(&path.display().to_string()))
        }
        CdnCommands::Show => {
            let folder = &config.cdn_folder;
            let path = snapshot_path(&config.cdn_cache_dir, folder);
            let date = snapshot_date(&config.cdn_cache_dir, folder)
                .with_context(|| format!("Cannot read {}", path.display()))?;
            let count = read_snapshot(&config.cdn_cache_dir, folder)?.len();
            if json {
                render::to_json(&serde_json::json!({
                    "folder": folder,
                    "date": date,
                    "count": count,
                    "path": path,
                }))
            } else {
                Ok(render::render_snapshot(folder, date.as_deref(), count))
            }
        }
    }
}
