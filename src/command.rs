//! Subcommand implementations.
use color_eyre::eyre::{Result, eyre};
use log::*;
use secrecy::SecretString;

use gitbucket_keeper::{
    CollaborationPlatform, GitBucket, RepositorySettings, SettingsReader,
    forge::config::{AuthSettings, PlatformSettings},
    git::Git2Discovery,
};

use crate::cli::{Args, Command, parse_uri};

/// Run the subcommand selected on the command line.
pub async fn execute(args: &Args) -> Result<()> {
    let reader = SettingsReader::new(Git2Discovery);

    match &args.command {
        Command::Probe { uri } => {
            let uri = parse_uri(uri)?;
            let found = reader.can_read(&uri).await;
            info!("{uri} is a GitBucket repository: {found}");
            println!("{found}");
        }
        Command::Resolve { uri, branch } => {
            let settings = resolve(&reader, uri, branch.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        Command::Whoami { uri } => {
            let settings = resolve(&reader, uri, None)?;
            let platform = connect(&reader, args, &settings)?;
            let user = platform.get_current_user().await?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        Command::BranchExists { uri, branch } => {
            let settings = resolve(&reader, uri, None)?;
            let platform = connect(&reader, args, &settings)?;
            let exists = platform
                .repository_branch_exists(
                    &settings.repository_owner,
                    &settings.repository_name,
                    branch,
                )
                .await?;
            println!("{exists}");
        }
    }

    Ok(())
}

fn resolve(
    reader: &SettingsReader<Git2Discovery>,
    uri: &str,
    branch: Option<&str>,
) -> Result<RepositorySettings> {
    let uri = parse_uri(uri)?;

    reader
        .repository_settings(&uri, branch)?
        .ok_or_else(|| eyre!("no GitBucket remote configured for {uri}"))
}

fn connect(
    reader: &SettingsReader<Git2Discovery>,
    args: &Args,
    settings: &RepositorySettings,
) -> Result<GitBucket> {
    let mut platform_settings = PlatformSettings {
        token: (!args.token.is_empty())
            .then(|| SecretString::from(args.token.clone())),
        ..Default::default()
    };
    reader.update_platform_settings(&mut platform_settings);

    let token = platform_settings
        .token
        .ok_or_else(|| eyre!("must set gitbucket token"))?;

    let mut platform = GitBucket::new();
    platform.initialise(AuthSettings {
        api_base: settings.api_uri.clone(),
        token,
    })?;

    Ok(platform)
}
