use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;
use tempfile::TempDir;
use url::Url;

use crate::{
    error::KeeperError,
    forge::config::{ForkMode, PlatformSettings, TOKEN_ENV_VAR, URL_PATTERN},
    git::{Git2Discovery, GitRemote, MockGitDiscovery},
    settings::{RemoteInfo, reader::SettingsReader},
};

fn remote_reader() -> SettingsReader<MockGitDiscovery> {
    // remote mode never consults git
    SettingsReader::new(MockGitDiscovery::new())
}

fn gitbucket_remote() -> GitRemote {
    GitRemote {
        name: "upstream".into(),
        url: Url::parse("https://bucket.example.com/git/acme/widgets.git")
            .unwrap(),
    }
}

#[test]
fn remote_uri_resolves_owner_name_and_api() {
    let uri = Url::parse("https://host/git/acme/widgets.git").unwrap();

    let settings = remote_reader()
        .repository_settings(&uri, None)
        .unwrap()
        .unwrap();

    assert_eq!(settings.repository_owner, "acme");
    assert_eq!(settings.repository_name, "widgets");
    assert_eq!(settings.api_uri.as_str(), "https://host/api/v3/");
    assert_eq!(settings.repository_uri, uri);
    assert!(settings.remote_info.is_none());
}

#[test]
fn remote_uri_with_target_branch_only_records_branch() {
    let uri = Url::parse("https://host/git/acme/widgets").unwrap();

    let settings = remote_reader()
        .repository_settings(&uri, Some("release/2.0"))
        .unwrap()
        .unwrap();

    assert_eq!(
        settings.remote_info,
        Some(RemoteInfo {
            branch_name: Some("release/2.0".into()),
            ..Default::default()
        })
    );
}

#[test]
fn remote_uri_keeps_scheme_host_and_port_for_api() {
    let uri =
        Url::parse("http://build.example.com:8080/git/acme/widgets?tab=files#top")
            .unwrap();

    let settings = remote_reader()
        .repository_settings(&uri, None)
        .unwrap()
        .unwrap();

    assert_eq!(
        settings.api_uri.as_str(),
        "http://build.example.com:8080/api/v3/"
    );
}

#[test]
fn remote_uri_with_wrong_segment_count_is_rejected() {
    let reader = remote_reader();

    for raw in [
        "https://host/",
        "https://host/acme/widgets",
        "https://host/git/acme/widgets/tree",
        "https://host/gitbucket/git/acme/widgets.git",
    ] {
        let uri = Url::parse(raw).unwrap();
        let result = reader.repository_settings(&uri, None);
        match result {
            Err(KeeperError::Configuration(msg)) => {
                assert!(msg.contains(uri.as_str()), "{msg}");
                assert!(msg.contains(URL_PATTERN), "{msg}");
            }
            other => panic!("expected configuration error for {raw}, got {other:?}"),
        }
    }
}

#[test]
fn remote_uri_ignores_empty_segments() {
    let uri = Url::parse("https://host//git//acme/widgets.git/").unwrap();

    let settings = remote_reader()
        .repository_settings(&uri, None)
        .unwrap()
        .unwrap();

    assert_eq!(settings.repository_owner, "acme");
    assert_eq!(settings.repository_name, "widgets");
}

#[test]
fn remote_uri_with_bare_git_suffix_is_rejected() {
    let uri = Url::parse("https://host/git/acme/.git").unwrap();

    let result = remote_reader().repository_settings(&uri, None);

    assert!(matches!(result, Err(KeeperError::Configuration(_))));
}

#[test]
fn remote_uri_only_strips_trailing_git_suffix() {
    let uri = Url::parse("https://host/git/acme/my.github.io").unwrap();

    let settings = remote_reader()
        .repository_settings(&uri, None)
        .unwrap()
        .unwrap();

    assert_eq!(settings.repository_name, "my.github.io");
}

#[test]
fn local_uri_outside_git_is_not_a_repository() {
    let mut git = MockGitDiscovery::new();
    git.expect_is_git_repo().times(1).returning(|_| Ok(false));

    let uri = Url::parse("file:///work/plain-folder").unwrap();
    let result = SettingsReader::new(git).repository_settings(&uri, None);

    match result {
        Err(KeeperError::NotARepository(path)) => {
            assert_eq!(path, PathBuf::from("/work/plain-folder"))
        }
        other => panic!("expected not a repository, got {other:?}"),
    }
}

#[test]
fn local_repo_without_platform_remote_yields_nothing() {
    let mut git = MockGitDiscovery::new();
    git.expect_is_git_repo().returning(|_| Ok(true));
    git.expect_get_remote_for_platform()
        .withf(|_, host| host.contains("gitbucket"))
        .times(1)
        .returning(|_, _| Ok(None));
    git.expect_discover_repo().never();

    let uri = Url::parse("file:///work/widgets").unwrap();
    let result = SettingsReader::new(git)
        .repository_settings(&uri, None)
        .unwrap();

    assert!(result.is_none());
}

#[test]
fn local_repo_resolves_through_platform_remote() {
    let mut git = MockGitDiscovery::new();
    git.expect_is_git_repo().returning(|_| Ok(true));
    git.expect_get_remote_for_platform()
        .returning(|_, _| Ok(Some(gitbucket_remote())));
    git.expect_discover_repo()
        .times(1)
        .returning(|_| Ok(PathBuf::from("/work/widgets")));
    git.expect_get_current_head()
        .withf(|path| path.ends_with("widgets"))
        .times(1)
        .returning(|_| Ok("develop".into()));

    let uri = Url::parse("file:///work/widgets/src/Widgets").unwrap();
    let settings = SettingsReader::new(git)
        .repository_settings(&uri, None)
        .unwrap()
        .unwrap();

    assert_eq!(settings.repository_owner, "acme");
    assert_eq!(settings.repository_name, "widgets");
    assert_eq!(
        settings.api_uri.as_str(),
        "https://bucket.example.com/api/v3/"
    );
    assert_eq!(settings.repository_uri, gitbucket_remote().url);
    assert_eq!(
        settings.remote_info,
        Some(RemoteInfo {
            working_folder: Some(PathBuf::from("/work/widgets/src/Widgets")),
            local_repository_uri: Some(PathBuf::from("/work/widgets")),
            branch_name: Some("develop".into()),
            remote_name: Some("upstream".into()),
        })
    );
}

#[test]
fn local_repo_prefers_target_branch_over_head() {
    let mut git = MockGitDiscovery::new();
    git.expect_is_git_repo().returning(|_| Ok(true));
    git.expect_get_remote_for_platform()
        .returning(|_, _| Ok(Some(gitbucket_remote())));
    git.expect_discover_repo()
        .returning(|_| Ok(PathBuf::from("/work/widgets")));
    git.expect_get_current_head().never();

    let uri = Url::parse("file:///work/widgets").unwrap();
    let settings = SettingsReader::new(git)
        .repository_settings(&uri, Some("main"))
        .unwrap()
        .unwrap();

    assert_eq!(
        settings.remote_info.unwrap().branch_name.as_deref(),
        Some("main")
    );
}

#[test]
fn local_repo_with_malformed_remote_is_rejected() {
    let mut git = MockGitDiscovery::new();
    git.expect_is_git_repo().returning(|_| Ok(true));
    git.expect_get_remote_for_platform().returning(|_, _| {
        Ok(Some(GitRemote {
            name: "origin".into(),
            url: Url::parse("https://gitbucket.example.com/acme").unwrap(),
        }))
    });
    git.expect_discover_repo()
        .returning(|_| Ok(PathBuf::from("/work/widgets")));
    git.expect_get_current_head().returning(|_| Ok("main".into()));

    let uri = Url::parse("file:///work/widgets").unwrap();
    let result = SettingsReader::new(git).repository_settings(&uri, None);

    assert!(matches!(result, Err(KeeperError::Configuration(_))));
}

#[test]
fn local_working_copy_resolves_end_to_end() {
    let dir = TempDir::new().unwrap();
    let mut opts = git2::RepositoryInitOptions::new();
    opts.initial_head("trunk");
    let repo = git2::Repository::init_opts(dir.path(), &opts).unwrap();
    repo.remote("origin", "https://github.com/acme/widgets.git")
        .unwrap();
    repo.remote("bucket", "https://gitbucket.example.com/git/acme/widgets.git")
        .unwrap();

    let nested = dir.path().join("src");
    std::fs::create_dir_all(&nested).unwrap();
    let uri = Url::from_directory_path(&nested).unwrap();

    let settings = SettingsReader::new(Git2Discovery)
        .repository_settings(&uri, None)
        .unwrap()
        .unwrap();

    assert_eq!(settings.repository_owner, "acme");
    assert_eq!(settings.repository_name, "widgets");
    assert_eq!(
        settings.api_uri.as_str(),
        "https://gitbucket.example.com/api/v3/"
    );

    let remote_info = settings.remote_info.unwrap();
    assert_eq!(remote_info.remote_name.as_deref(), Some("bucket"));
    assert_eq!(remote_info.branch_name.as_deref(), Some("trunk"));
    assert_eq!(
        std::fs::canonicalize(remote_info.local_repository_uri.unwrap())
            .unwrap(),
        std::fs::canonicalize(dir.path()).unwrap()
    );
}

#[test]
fn local_directory_without_git_fails_end_to_end() {
    let dir = TempDir::new().unwrap();
    let uri = Url::from_directory_path(dir.path()).unwrap();

    let result =
        SettingsReader::new(Git2Discovery).repository_settings(&uri, None);

    assert!(matches!(result, Err(KeeperError::NotARepository(_))));
}

#[tokio::test]
async fn can_read_local_copy_without_platform_remote_is_false() {
    let mut git = MockGitDiscovery::new();
    git.expect_is_git_repo().returning(|_| Ok(true));
    git.expect_get_remote_for_platform().returning(|_, _| Ok(None));

    let uri = Url::parse("file:///work/widgets").unwrap();

    assert!(!SettingsReader::new(git).can_read(&uri).await);
}

#[tokio::test]
async fn can_read_non_repository_folder_is_false() {
    let mut git = MockGitDiscovery::new();
    git.expect_is_git_repo().returning(|_| Ok(false));

    let uri = Url::parse("file:///work/plain-folder").unwrap();

    assert!(!SettingsReader::new(git).can_read(&uri).await);
}

#[test]
fn environment_token_overrides_configured_token() {
    temp_env::with_var(TOKEN_ENV_VAR, Some("from-env"), || {
        let mut settings = PlatformSettings {
            token: Some(SecretString::from("configured".to_string())),
            fork_mode: Some(ForkMode::PreferFork),
        };

        remote_reader().update_platform_settings(&mut settings);

        assert_eq!(settings.token.unwrap().expose_secret(), "from-env");
        assert_eq!(settings.fork_mode, Some(ForkMode::PreferFork));
    });
}

#[test]
fn configured_token_is_kept_without_environment_value() {
    temp_env::with_var(TOKEN_ENV_VAR, Some(""), || {
        let mut settings = PlatformSettings {
            token: Some(SecretString::from("configured".to_string())),
            fork_mode: None,
        };

        remote_reader().update_platform_settings(&mut settings);

        assert_eq!(settings.token.unwrap().expose_secret(), "configured");
        assert_eq!(settings.fork_mode, Some(ForkMode::SingleRepositoryOnly));
    });
}

#[test]
fn missing_token_stays_missing() {
    temp_env::with_var_unset(TOKEN_ENV_VAR, || {
        let mut settings = PlatformSettings::default();

        remote_reader().update_platform_settings(&mut settings);

        assert!(settings.token.is_none());
        assert_eq!(settings.fork_mode, Some(ForkMode::SingleRepositoryOnly));
    });
}
