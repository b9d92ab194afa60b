use clap::{Parser, Subcommand, ValueEnum};
use gardenapp::model::Kind;
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Styled text for people
    #[default]
    Term,
    /// JSON for scripts
    Json,
}

impl OutputMode {
    pub fn is_structured(self) -> bool {
        self == OutputMode::Json
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "garden",
    bin_name = "garden",
    version,
    disable_help_subcommand = true,
    about = "Build-time content pipeline for a personal site",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Site root (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub root: Option<PathBuf>,

    /// Redact private and unpublished content
    #[arg(short, long, global = true, help_heading = "Options")]
    pub production: bool,

    /// Skip git history lookups for last-modified dates
    #[arg(long, global = true, help_heading = "Options")]
    pub no_git: bool,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputMode::Term, help_heading = "Options")]
    pub output: OutputMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load everything and summarize the build
    Build,

    /// List entries, optionally of one kind
    #[command(alias = "ls")]
    List {
        /// post, draft, note, bookmark, til or page
        #[arg(short, long)]
        kind: Option<Kind>,
    },

    /// List every tag in the build
    Tags,

    /// Filter the notes page by tags
    Filter {
        /// Tags that every result must carry
        tags: Vec<String>,

        /// Print the list and tag cloud HTML fragments
        #[arg(long)]
        html: bool,
    },

    /// Show the note forest
    Tree,

    /// Print the RSS feed
    Rss,

    /// Print the sitemap
    Sitemap,

    /// Render one entry's body
    Render {
        /// Entry id, e.g. `garden/my-note`
        id: String,

        /// Markdown with wiki links and images resolved
        #[arg(short, long, conflicts_with = "feed")]
        markdown: bool,

        /// Feed-safe HTML, without raw HTML or embeds
        #[arg(long)]
        feed: bool,
    },

    /// Digest of posts in progress
    Audit {
        /// Print the HTML digest
        #[arg(long)]
        html: bool,
    },

    /// Image CDN snapshot
    Cdn {
        #[command(subcommand)]
        action: CdnCommands,
    },

    /// Albums, books and podcasts from the likes lists
    Likes,
}

#[derive(Subcommand, Debug)]
pub enum CdnCommands {
    /// Download the asset folder listing into the snapshot
    Cache,
    /// Show what the snapshot holds
    Show,
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["garden", "list", "--kind", "notes", "--production", "--output", "json"]).unwrap();
        assert!(cli.production);
        assert_eq!(cli.output, OutputMode::Json);
        assert!(matches!(cli.command, Some(Commands::List { kind: Some(Kind::Note) })));
    }

    #[test]
    fn test_filter_takes_many_tags() {
        let cli = Cli::try_parse_from(["garden", "filter", "rust", "web"]).unwrap();
        match cli.command {
            Some(Commands::Filter { tags, html }) => {
                assert_eq!(tags, vec!["rust", "web"]);
                assert!(!html);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert!(Cli::try_parse_from(["garden", "list", "--kind", "poem"]).is_err());
    }

    #[test]
    fn test_render_targets_conflict() {
        assert!(Cli::try_parse_from(["garden", "render", "a", "--markdown", "--feed"]).is_err());
        let cli = Cli::try_parse_from(["garden", "render", "garden/a", "-m"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Render { markdown: true, feed: false, .. })
        ));
    }

    #[test]
    fn test_cdn_subcommands() {
        let cli = Cli::try_parse_from(["garden", "cdn", "show"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Cdn { action: CdnCommands::Show })));
    }
}
