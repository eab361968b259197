use log::*;
use reqwest::header::ACCEPT;
use url::Url;

use crate::{
    error::Result,
    forge::config::{
        API_VERSION_MARKER, DIAGNOSTIC_PATH, PROBE_TIMEOUT, USER_AGENT,
    },
};

/// Build the plugin listing URL for the instance hosting `uri`.
///
/// URIs that already point at the API are probed relative to themselves.
/// Repository URIs lose their trailing `<marker>/<owner>/<repo>` segments so
/// instances served below a context path keep that path.
pub fn diagnostic_url(uri: &Url) -> Result<Url> {
    if uri.as_str().contains(API_VERSION_MARKER) {
        let mut base = uri.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        return Ok(base.join(DIAGNOSTIC_PATH)?);
    }

    let segments = uri
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect::<Vec<&str>>())
        .unwrap_or_default();

    let keep = segments.len().saturating_sub(3);
    let prefix = segments[..keep]
        .iter()
        .map(|seg| format!("{seg}/"))
        .collect::<String>();

    let mut root = uri.clone();
    root.set_path(&format!("/{prefix}"));
    root.set_query(None);
    root.set_fragment(None);

    Ok(root.join(&format!("{API_VERSION_MARKER}/{DIAGNOSTIC_PATH}"))?)
}

/// Probe the diagnostic route without credentials. Any failure, including a
/// timeout, means the URI is not a GitBucket repository.
pub async fn can_read(uri: &Url) -> bool {
    match probe(uri).await {
        Ok(found) => {
            debug!("GitBucket probe for {uri}: {found}");
            found
        }
        Err(err) => {
            debug!("No valid GitBucket repo during repo check: {err}");
            false
        }
    }
}

async fn probe(uri: &Url) -> Result<bool> {
    let url = diagnostic_url(uri)?;

    let client = reqwest::Client::builder()
        .timeout(PROBE_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()?;

    let response = client
        .get(url)
        .header(ACCEPT, "application/json")
        .send()
        .await?;

    Ok(response.status().is_success())
}
