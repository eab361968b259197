use serde::Serialize;

use crate::{
    error::{KeeperError, Result},
    update::update_set::PackageUpdateSet,
};

const COMMIT_EMOJI: &str = ":package:";

const BODY_TEMPLATE: &str = r#"
{%- for update in updates -%}
{% if updates | length > 1 %}## {{ update.id }}

{% endif -%}
NuGet package `{{ update.id }}` is updated to `{{ update.version }}`
{%- if update.source %} from {{ update.source }}{% endif %}.

{% if update.version_count > 1 -%}
{{ update.version_count }} versions of `{{ update.id }}` were found in use: {{ update.previous | join(sep=", ") }}.
{%- else -%}
`{{ update.id }}` {{ update.previous | first }} was previously in use.
{%- endif %}
{% if update.highest %}
There is also a higher version, `{{ update.highest }}`, but this was not applied as only `{{ update.allowed_change }}` version changes are allowed.
{% endif %}
Updated in {{ update.paths | length }} project{{ update.paths | length | pluralize }}:
{% for path in update.paths -%}
- `{{ path }}`
{% endfor %}
{% endfor -%}
This is an automated update. Merge only if it passes tests.
"#;

#[derive(Serialize)]
struct UpdateView {
    id: String,
    version: String,
    source: Option<String>,
    allowed_change: String,
    highest: Option<String>,
    previous: Vec<String>,
    version_count: usize,
    paths: Vec<String>,
}

impl From<&PackageUpdateSet> for UpdateView {
    fn from(update: &PackageUpdateSet) -> Self {
        let mut versions = update
            .current_packages()
            .iter()
            .map(|p| &p.version)
            .collect::<Vec<_>>();
        versions.sort();
        versions.dedup();

        let highest = (update.highest_version() != update.match_version())
            .then(|| update.highest_version().to_string());

        Self {
            id: update.match_id().to_string(),
            version: update.match_version().to_string(),
            source: update.selected().source.clone(),
            allowed_change: update.allowed_change().to_string(),
            highest,
            previous: versions.iter().map(|v| format!("`{v}`")).collect(),
            version_count: update.count_current_versions(),
            paths: update
                .current_packages()
                .iter()
                .map(|p| p.path.display().to_string())
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct BodyContext {
    updates: Vec<UpdateView>,
}

fn ensure_not_empty(updates: &[PackageUpdateSet]) -> Result<()> {
    if updates.is_empty() {
        return Err(KeeperError::invalid_update("no updates to describe"));
    }
    Ok(())
}

/// Pull request title for one or more updates.
pub fn pr_title(updates: &[PackageUpdateSet]) -> Result<String> {
    ensure_not_empty(updates)?;

    match updates {
        [single] => Ok(format!(
            "Automatic update of {} to {}",
            single.match_id(),
            single.match_version()
        )),
        many => Ok(format!("Automatic update of {} packages", many.len())),
    }
}

/// Commit message matching [`pr_title`].
pub fn commit_message(updates: &[PackageUpdateSet]) -> Result<String> {
    Ok(format!("{COMMIT_EMOJI} {}", pr_title(updates)?))
}

/// Markdown pull request body describing each update.
pub fn pr_body(updates: &[PackageUpdateSet]) -> Result<String> {
    ensure_not_empty(updates)?;

    let mut tera = tera::Tera::default();
    tera.add_raw_template("pr_body", BODY_TEMPLATE)?;

    let context = tera::Context::from_serialize(BodyContext {
        updates: updates.iter().map(UpdateView::from).collect(),
    })?;

    Ok(tera.render("pr_body", &context)?)
}
