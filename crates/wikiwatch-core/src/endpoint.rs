// ── API endpoint resolution ──
//
// Maps a `Project` to the base URL of its `api.php`. Failure is a typed
// error, never a silent skip: the aggregator records it against the
// project like any other per-project failure.

use url::Url;

use crate::error::CoreError;
use crate::model::Project;

/// Resolves a project to its Action API endpoint.
pub trait EndpointResolver: Send + Sync {
    fn resolve(&self, project: &Project) -> Result<Url, CoreError>;
}

/// Production Wikimedia hosts.
///
/// - `https://{code}.wikipedia.org/w/api.php`
/// - `https://commons.wikimedia.org/w/api.php`
/// - `https://www.wikidata.org/w/api.php`
#[derive(Debug, Clone, Copy, Default)]
pub struct WikimediaEndpoints;

impl EndpointResolver for WikimediaEndpoints {
    fn resolve(&self, project: &Project) -> Result<Url, CoreError> {
        let raw = match project {
            Project::Wikipedia(language) => {
                validate_language_code(project, &language.code)?;
                format!("https://{}.wikipedia.org/w/api.php", language.code)
            }
            Project::Commons => "https://commons.wikimedia.org/w/api.php".into(),
            Project::Wikidata => "https://www.wikidata.org/w/api.php".into(),
        };

        Url::parse(&raw).map_err(|e| CoreError::EndpointResolution {
            project: project.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Language codes become DNS labels: ASCII alphanumerics and `-` only.
fn validate_language_code(project: &Project, code: &str) -> Result<(), CoreError> {
    let valid = !code.is_empty()
        && !code.starts_with('-')
        && !code.ends_with('-')
        && code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');

    if valid {
        Ok(())
    } else {
        Err(CoreError::EndpointResolution {
            project: project.to_string(),
            reason: format!("language code {code:?} is not a valid subdomain"),
        })
    }
}
