//! CLI argument parsing.
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, eyre};
use std::path::{self, Path};
use url::Url;

use color_eyre::eyre::Result;

/// Global CLI arguments for GitBucket access and debugging.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(
        long,
        env = "GITBUCKET_TOKEN",
        hide_env_values = true,
        default_value = "",
        global = true
    )]
    /// GitBucket access token. Falls back to GITBUCKET_TOKEN env var.
    pub token: String,

    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging.
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Operations against a GitBucket repository.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check whether a URI or working copy belongs to a GitBucket instance.
    Probe {
        /// Repository URL or path to a local working copy.
        uri: String,
    },

    /// Print the resolved repository settings as JSON.
    Resolve {
        /// Repository URL or path to a local working copy.
        uri: String,

        #[arg(long)]
        /// Branch to work against instead of the current head.
        branch: Option<String>,
    },

    /// Print the user the token authenticates as.
    Whoami {
        /// Repository URL or path to a local working copy.
        uri: String,
    },

    /// Check whether a branch exists on the repository.
    BranchExists {
        /// Repository URL or path to a local working copy.
        uri: String,

        /// Branch name to look up.
        branch: String,
    },
}

/// Interpret `raw` as a URL, falling back to a local path which becomes a
/// `file://` URI.
pub fn parse_uri(raw: &str) -> Result<Url> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(eyre!("a repository uri or path is required"));
    }

    // single letter schemes are windows drive letters
    if let Ok(url) = Url::parse(raw)
        && url.scheme().len() > 1
    {
        return Ok(url);
    }

    path_to_uri(Path::new(raw))
}

fn path_to_uri(path: &Path) -> Result<Url> {
    let absolute = path::absolute(path)
        .wrap_err_with(|| format!("failed to resolve {}", path.display()))?;

    Url::from_file_path(&absolute)
        .map_err(|_| eyre!("unable to convert {} to a uri", absolute.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_uri_keeps_urls() {
        let uri = parse_uri("https://bucket.example.com/git/acme/widgets.git")
            .unwrap();
        assert_eq!(uri.scheme(), "https");
        assert_eq!(uri.path(), "/git/acme/widgets.git");
    }

    #[test]
    fn parse_uri_converts_relative_paths() {
        let uri = parse_uri("some/working/copy").unwrap();
        let expected = std::env::current_dir()
            .unwrap()
            .join("some/working/copy");

        assert_eq!(uri.scheme(), "file");
        assert_eq!(uri.to_file_path().unwrap(), expected);
    }

    #[test]
    fn parse_uri_converts_absolute_paths() {
        let dir = tempfile::TempDir::new().unwrap();
        let uri = parse_uri(dir.path().to_str().unwrap()).unwrap();

        assert_eq!(uri.scheme(), "file");
        assert_eq!(uri.to_file_path().unwrap(), dir.path());
    }

    #[test]
    fn parse_uri_rejects_blank_input() {
        assert!(parse_uri("  ").is_err());
    }

    #[test]
    fn parses_subcommands() {
        let args = Args::try_parse_from([
            "gitbucket-keeper",
            "--token",
            "secret",
            "resolve",
            "https://bucket.example.com/git/acme/widgets",
            "--branch",
            "main",
        ])
        .unwrap();

        assert_eq!(args.token, "secret");
        assert!(!args.debug);
        match args.command {
            Command::Resolve { uri, branch } => {
                assert_eq!(uri, "https://bucket.example.com/git/acme/widgets");
                assert_eq!(branch.as_deref(), Some("main"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn token_falls_back_to_environment() {
        temp_env::with_var("GITBUCKET_TOKEN", Some("from-env"), || {
            let args = Args::try_parse_from([
                "gitbucket-keeper",
                "whoami",
                "https://bucket.example.com/git/acme/widgets",
            ])
            .unwrap();

            assert_eq!(args.token, "from-env");
        });
    }
}
