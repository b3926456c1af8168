// ── Watchlist aggregation ──
//
// One `list=watchlist` query per project, dispatched concurrently and
// joined before anything is returned. A project that fails is recorded
// and skipped; the fetch as a whole fails only when every project did.

use futures_util::future::join_all;
use tracing::{debug, info, warn};

use wikiwatch_api::types::WatchlistResponse;
use wikiwatch_api::{MediaWikiService, ServiceRequest};

use super::WatchlistController;
use crate::convert;
use crate::error::CoreError;
use crate::model::{Language, Project, ProjectFailure, Watchlist, WatchlistItem};

/// Single bounded page; no continuation.
const WATCHLIST_LIMIT: &str = "500";
const WATCHLIST_PROPS: &str = "ids|title|flags|comment|parsedcomment|timestamp|sizes|user|loginfo";

/// Dispatch order: one Wikipedia per language, then Commons, then Wikidata.
pub fn watchlist_projects(languages: &[Language]) -> Vec<Project> {
    let mut projects = Project::projects_from_languages(languages);
    projects.push(Project::Commons);
    projects.push(Project::Wikidata);
    projects
}

type ProjectOutcome = (Project, Result<Vec<WatchlistItem>, CoreError>);

impl<S: MediaWikiService> WatchlistController<S> {
    /// Fetch the watchlist for the configured languages.
    pub async fn fetch_configured_watchlist(&self) -> Result<Watchlist, CoreError> {
        self.fetch_watchlist(&self.inner.config.languages).await
    }

    /// Fetch and merge the watchlist of every project for `languages`.
    ///
    /// Succeeds if at least one project succeeded. Items keep dispatch
    /// order across projects and API order within each; failed projects
    /// are listed in [`Watchlist::failures`]. If every project failed,
    /// the first failure in dispatch order is returned.
    pub async fn fetch_watchlist(&self, languages: &[Language]) -> Result<Watchlist, CoreError> {
        let service = self.service()?;

        if languages.is_empty() {
            return Err(CoreError::LanguagesUnavailable);
        }

        let projects = watchlist_projects(languages);
        info!(projects = projects.len(), "fetching watchlist");

        let service = &*service;
        let futs = projects.into_iter().map(|project| async move {
            let outcome = self.fetch_project_watchlist(service, &project).await;
            (project, outcome)
        });

        // join_all yields outcomes in dispatch order regardless of
        // completion order; merging happens only after every call settled.
        merge_outcomes(join_all(futs).await)
    }

    async fn fetch_project_watchlist(
        &self,
        service: &S,
        project: &Project,
    ) -> Result<Vec<WatchlistItem>, CoreError> {
        let url = self.endpoint(project)?;

        let request = ServiceRequest::get(url)
            .param("action", "query")
            .param("list", "watchlist")
            .param("wllimit", WATCHLIST_LIMIT)
            .param("wlallrev", "1")
            .param("wlprop", WATCHLIST_PROPS)
            .param_opt("variant", project.variant_code());

        let response: WatchlistResponse = service.perform_typed(&request).await?;
        let items = convert::watchlist_from_response(response, project)?;

        debug!(%project, items = items.len(), "project watchlist fetched");
        Ok(items)
    }
}

fn merge_outcomes(outcomes: Vec<ProjectOutcome>) -> Result<Watchlist, CoreError> {
    let mut items = Vec::new();
    let mut failures = Vec::new();
    let mut succeeded = 0_usize;

    for (project, outcome) in outcomes {
        match outcome {
            Ok(mut project_items) => {
                succeeded += 1;
                items.append(&mut project_items);
            }
            Err(error) => {
                warn!(%project, error = %error, "project watchlist fetch failed");
                failures.push(ProjectFailure { project, error });
            }
        }
    }

    if succeeded == 0 {
        if let Some(first) = failures.into_iter().next() {
            return Err(first.error);
        }
        return Ok(Watchlist::default());
    }

    info!(
        items = items.len(),
        succeeded,
        failed = failures.len(),
        "watchlist fetched"
    );
    Ok(Watchlist::new(items, failures))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use chrono::{TimeZone, Utc};

    use super::*;

    fn item(title: &str, project: &Project) -> WatchlistItem {
        WatchlistItem {
            title: title.into(),
            revision_id: 2,
            old_revision_id: 1,
            username: "Tester".into(),
            is_anon: false,
            is_bot: false,
            timestamp: Utc.with_ymd_and_hms(2023, 5, 30, 11, 37, 31).unwrap(),
            comment_wikitext: String::new(),
            comment_html: String::new(),
            byte_length: 10,
            old_byte_length: 5,
            project: project.clone(),
        }
    }

    fn unexpected() -> CoreError {
        CoreError::UnexpectedResponse {
            operation: "watchlist query",
        }
    }

    #[test]
    fn projects_end_with_shared_sites() {
        let projects = watchlist_projects(&[Language::new("en"), Language::new("es")]);
        assert_eq!(
            projects,
            [
                Project::Wikipedia(Language::new("en")),
                Project::Wikipedia(Language::new("es")),
                Project::Commons,
                Project::Wikidata,
            ]
        );
    }

    #[test]
    fn merge_concatenates_in_dispatch_order() {
        let en = Project::Wikipedia(Language::new("en"));
        let outcomes = vec![
            (en.clone(), Ok(vec![item("A", &en), item("B", &en)])),
            (Project::Commons, Ok(vec![item("File:C.jpg", &Project::Commons)])),
            (Project::Wikidata, Ok(Vec::new())),
        ];

        let watchlist = merge_outcomes(outcomes).unwrap();
        let titles: Vec<_> = watchlist.items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["A", "B", "File:C.jpg"]);
        assert!(!watchlist.is_partial());
    }

    #[test]
    fn merge_keeps_successes_and_records_failures() {
        let en = Project::Wikipedia(Language::new("en"));
        let outcomes = vec![
            (en.clone(), Err(unexpected())),
            (Project::Commons, Ok(vec![item("File:C.jpg", &Project::Commons)])),
            (Project::Wikidata, Err(CoreError::ServiceUnavailable)),
        ];

        let watchlist = merge_outcomes(outcomes).unwrap();
        assert_eq!(watchlist.len(), 1);
        let failed: Vec<_> = watchlist.failures().iter().map(|f| &f.project).collect();
        assert_eq!(failed, [&en, &Project::Wikidata]);
    }

    #[test]
    fn merge_fails_with_first_error_when_nothing_succeeded() {
        let outcomes = vec![
            (Project::Wikipedia(Language::new("en")), Err(unexpected())),
            (Project::Commons, Err(CoreError::ServiceUnavailable)),
        ];

        let err = merge_outcomes(outcomes).unwrap_err();
        assert!(matches!(err, CoreError::UnexpectedResponse { .. }));
    }
}
