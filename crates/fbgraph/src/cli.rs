//! Clap derive structures for the `fbgraph` CLI.
//!
//! Defines the command tree, global flags, and shared argument types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// fbgraph -- query and publish to the Facebook Graph API
#[derive(Debug, Parser)]
#[command(
    name = "fbgraph",
    version,
    about = "Query and publish to the Facebook Graph API from the command line",
    long_about = "Reads objects and connections, follows paging cursors, publishes and\n\
        deletes content, downloads images, and reads Page and Post insights.\n\n\
        Credentials come from a named profile, environment variables, or flags.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Profile to use
    #[arg(long, short = 'p', env = "FBGRAPH_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Access token (overrides profile)
    #[arg(long, env = "FBGRAPH_ACCESS_TOKEN", global = true, hide_env_values = true)]
    pub access_token: Option<String>,

    /// App secret used to sign requests with appsecret_proof
    #[arg(long, env = "FBGRAPH_APP_SECRET", global = true, hide_env_values = true)]
    pub app_secret: Option<String>,

    /// Graph API version, e.g. v19.0 (overrides profile)
    #[arg(long, env = "FBGRAPH_API_VERSION", global = true)]
    pub api_version: Option<String>,

    /// Graph host (overrides profile)
    #[arg(long, env = "FBGRAPH_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FBGRAPH_OUTPUT",
        default_value = "json",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates (for recording proxies)
    #[arg(long, short = 'k', env = "FBGRAPH_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "FBGRAPH_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table
    Table,
    /// Pretty-printed JSON (default)
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch a single object by id
    #[command(alias = "get")]
    Object(ObjectArgs),

    /// Fetch one page of an object's connection
    #[command(alias = "conn")]
    Connection(ConnectionArgs),

    /// List posts from a feed as typed posts
    Feed(FeedArgs),

    /// Publish to a connection and print the new object's id
    Publish(PublishArgs),

    /// POST to an object or connection and print the raw response
    Post(PostArgs),

    /// Delete an object or a connection edge
    #[command(alias = "rm")]
    Delete(DeleteArgs),

    /// Download an image connection (e.g. a profile picture)
    Image(ImageArgs),

    /// Read Page or Post insights
    Insights(InsightsArgs),

    /// Print the appsecret_proof for the configured token and secret
    Proof,

    /// Manage configuration profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared argument groups ───────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PageArgs {
    /// Page size
    #[arg(long)]
    pub limit: Option<u32>,

    /// Cursor to read after
    #[arg(long)]
    pub after: Option<String>,

    /// Cursor to read before
    #[arg(long)]
    pub before: Option<String>,

    /// Unix timestamp lower bound
    #[arg(long)]
    pub since: Option<i64>,

    /// Unix timestamp upper bound
    #[arg(long)]
    pub until: Option<i64>,

    /// Offset into the collection
    #[arg(long)]
    pub offset: Option<u32>,

    /// Follow a server-issued paging URL instead of the window above
    #[arg(
        long,
        conflicts_with_all = ["limit", "after", "before", "since", "until", "offset"]
    )]
    pub page_url: Option<String>,
}

// ── Reads ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ObjectArgs {
    /// Object id, or "me"
    pub id: String,

    /// Comma-separated fields to request
    #[arg(long, short = 'f')]
    pub fields: Option<String>,

    /// Extra query parameter (repeatable)
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,
}

#[derive(Debug, Args)]
pub struct ConnectionArgs {
    /// Object id, or "me"
    pub id: String,

    /// Connection name, e.g. "feed" or "insights/page_fans"
    pub name: String,

    /// Comma-separated fields to request
    #[arg(long, short = 'f')]
    pub fields: Option<String>,

    /// Extra query parameter (repeatable)
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Args)]
pub struct FeedArgs {
    /// Object id whose feed to read
    #[arg(default_value = "me")]
    pub id: String,

    /// Connection to read posts from
    #[arg(long, short = 'c', default_value = "feed")]
    pub connection: String,

    /// Comma-separated fields to request
    #[arg(long, short = 'f')]
    pub fields: Option<String>,

    #[command(flatten)]
    pub page: PageArgs,
}

// ── Writes ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PublishArgs {
    /// Target object id, or "me"
    pub id: String,

    /// Connection to publish to, e.g. "feed" or "photos"
    pub connection: String,

    /// Form fields
    #[arg(value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub fields: Vec<(String, String)>,

    /// File attachment; sends the request as multipart
    #[arg(long = "file", value_name = "FIELD=PATH", value_parser = parse_key_value)]
    pub files: Vec<(String, String)>,

    /// Content type for attachments
    #[arg(long, default_value = "application/octet-stream")]
    pub content_type: String,
}

#[derive(Debug, Args)]
pub struct PostArgs {
    /// Target object id
    pub id: String,

    /// Connection to post to
    #[arg(long, short = 'c')]
    pub connection: Option<String>,

    /// Form fields
    #[arg(value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Object id to delete
    pub id: String,

    /// Connection edge to delete from, e.g. "likes"
    #[arg(long, short = 'c')]
    pub connection: Option<String>,

    /// Extra query parameter (repeatable)
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,
}

// ── Images & insights ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ImageArgs {
    /// Object id, or "me"
    pub id: String,

    /// Image connection
    #[arg(long, short = 'c', default_value = "picture")]
    pub connection: String,

    /// Predefined size: square, small, normal, large, album
    #[arg(long = "type", conflicts_with_all = ["width", "height"])]
    pub image_type: Option<String>,

    /// Width in pixels (requires --height)
    #[arg(long, requires = "height")]
    pub width: Option<u32>,

    /// Height in pixels (requires --width)
    #[arg(long, requires = "width")]
    pub height: Option<u32>,

    /// File to write the image to
    #[arg(long = "out", short = 'O')]
    pub out: PathBuf,
}

#[derive(Debug, Args)]
pub struct InsightsArgs {
    /// Page or Post id
    pub id: String,

    /// Metric names, e.g. page_fans
    #[arg(required = true)]
    pub metrics: Vec<String>,

    /// Aggregation period: day, week, days_28, month, lifetime
    #[arg(long)]
    pub period: Option<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a profile with guided setup
    Init,

    /// Display the resolved configuration with secrets redacted
    Show,

    /// Set a configuration value
    Set {
        /// Config key (dot-separated path, e.g. "profiles.work.api_version")
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store an access token (or app secret) in the system keyring
    SetToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,

        /// Store the app secret instead of the access token
        #[arg(long)]
        app_secret: bool,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

// ── Value parsers ────────────────────────────────────────────────────

/// Parse `key=value`; the value may itself contain `=`.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_owned(), value.to_owned())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn key_value_splits_on_first_equals() {
        assert_eq!(
            parse_key_value("link=https://x.test/?a=b").unwrap(),
            ("link".into(), "https://x.test/?a=b".into())
        );
        assert_eq!(parse_key_value("message=").unwrap(), ("message".into(), String::new()));
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=v").is_err());
    }

    #[test]
    fn image_size_flags_travel_together() {
        let err = Cli::try_parse_from(["fbgraph", "image", "me", "--width", "10", "-O", "x.jpg"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
