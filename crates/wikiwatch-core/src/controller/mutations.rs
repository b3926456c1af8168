// ── Page mutations and watch status ──
//
// Watch, unwatch, rollback and undo against a single project. Each call
// decodes into its own response schema and then checks that operation's
// success contract; server-reported errors take precedence over shape
// checks. Nothing is retried.

use tracing::{debug, info};

use wikiwatch_api::types::{
    AllMessagesResponse, EditResponse, PageInfoResponse, RollbackResponse, WatchActionResponse,
};
use wikiwatch_api::{MediaWikiService, ServiceRequest, TokenKind};

use super::WatchlistController;
use crate::error::CoreError;
use crate::model::{ExpiryType, Project, UndoOrRollbackResult, WatchStatus};

/// Interface message that prefixes undo summaries.
const UNDO_SUMMARY_MESSAGE: &str = "undo-summary";
const ROLLBACK_RIGHT: &str = "rollback";

impl<S: MediaWikiService> WatchlistController<S> {
    /// Add `title` to the watchlist on `project`.
    pub async fn watch(
        &self,
        title: &str,
        project: &Project,
        expiry: ExpiryType,
    ) -> Result<(), CoreError> {
        let service = self.service()?;
        let url = self.endpoint(project)?;

        let request = ServiceRequest::post(url, TokenKind::Watch)
            .param("action", "watch")
            .param("titles", title)
            .param("expiry", expiry.to_string());

        let response: WatchActionResponse = service.perform_typed(&request).await?;
        fail_on_remote_errors(project, response.errors)?;

        let watched = response.watch.first().and_then(|w| w.watched);
        if watched != Some(true) {
            return Err(CoreError::UnexpectedResponse { operation: "watch" });
        }

        info!(%project, title, %expiry, "watched");
        Ok(())
    }

    /// Remove `title` from the watchlist on `project`.
    pub async fn unwatch(&self, title: &str, project: &Project) -> Result<(), CoreError> {
        let service = self.service()?;
        let url = self.endpoint(project)?;

        let request = ServiceRequest::post(url, TokenKind::Watch)
            .param("action", "watch")
            .param("unwatch", "1")
            .param("titles", title);

        let response: WatchActionResponse = service.perform_typed(&request).await?;
        fail_on_remote_errors(project, response.errors)?;

        let unwatched = response.watch.first().and_then(|w| w.unwatched);
        if unwatched != Some(true) {
            return Err(CoreError::UnexpectedResponse {
                operation: "unwatch",
            });
        }

        info!(%project, title, "unwatched");
        Ok(())
    }

    /// Whether `title` is watched on `project`.
    ///
    /// With `needs_rollback_rights`, also asks for the user's rights and
    /// reports whether `rollback` is among them. Without it the rights
    /// field is `None`, not `Some(false)`.
    pub async fn fetch_watch_status(
        &self,
        title: &str,
        project: &Project,
        needs_rollback_rights: bool,
    ) -> Result<WatchStatus, CoreError> {
        let service = self.service()?;
        let url = self.endpoint(project)?;

        let mut request = ServiceRequest::get(url)
            .param("action", "query")
            .param("prop", "info")
            .param("inprop", "watched")
            .param("titles", title);

        if needs_rollback_rights {
            request = request.param("meta", "userinfo").param("uiprop", "rights");
        }

        let response: PageInfoResponse = service.perform_typed(&request).await?;
        fail_on_remote_errors(project, response.errors)?;

        let unexpected = || CoreError::UnexpectedResponse {
            operation: "watch status",
        };
        let query = response.query.ok_or_else(unexpected)?;
        let watched = query
            .pages
            .first()
            .and_then(|page| page.watched)
            .ok_or_else(unexpected)?;

        let user_has_rollback_rights = if needs_rollback_rights {
            query
                .userinfo
                .map(|info| info.rights.iter().any(|right| right == ROLLBACK_RIGHT))
        } else {
            None
        };

        Ok(WatchStatus {
            watched,
            user_has_rollback_rights,
        })
    }

    /// Roll back the latest consecutive edits by `username` to `title`.
    pub async fn rollback(
        &self,
        title: &str,
        project: &Project,
        username: &str,
    ) -> Result<UndoOrRollbackResult, CoreError> {
        let service = self.service()?;
        let url = self.endpoint(project)?;

        let request = ServiceRequest::post(url, TokenKind::Rollback)
            .param("action", "rollback")
            .param("title", title)
            .param("user", username);

        let response: RollbackResponse = service.perform_typed(&request).await?;
        fail_on_remote_errors(project, response.errors)?;

        let result = response
            .rollback
            .and_then(|r| Some(UndoOrRollbackResult::new(r.revid?, r.old_revid?)))
            .ok_or(CoreError::UnexpectedResponse {
                operation: "rollback",
            })?;

        info!(%project, title, username, new_revision = result.new_revision_id, "rolled back");
        Ok(result)
    }

    /// Undo revision `revision_id` of `title`.
    ///
    /// Two dependent calls: first the localized `undo-summary` prefix is
    /// looked up for (`revision_id`, `username`); only if that succeeds is
    /// the edit submitted, with summary `"{prefix} {summary}"`. A failed
    /// lookup is returned as-is and no edit is attempted.
    pub async fn undo(
        &self,
        title: &str,
        revision_id: u64,
        summary: &str,
        username: &str,
        project: &Project,
    ) -> Result<UndoOrRollbackResult, CoreError> {
        let service = self.service()?;

        let prefix = self
            .fetch_undo_summary_prefix(&*service, revision_id, username, project)
            .await?;

        let url = self.endpoint(project)?;
        let request = ServiceRequest::post(url, TokenKind::Csrf)
            .param("action", "edit")
            .param("title", title)
            .param("summary", format!("{prefix} {summary}"))
            .param("undo", revision_id.to_string());

        let response: EditResponse = service.perform_typed(&request).await?;
        fail_on_remote_errors(project, response.errors)?;

        let result = response
            .edit
            .filter(|edit| edit.result.as_deref() == Some("Success"))
            .and_then(|edit| Some(UndoOrRollbackResult::new(edit.newrevid?, edit.oldrevid?)))
            .ok_or(CoreError::UnexpectedResponse { operation: "undo" })?;

        info!(%project, title, revision_id, new_revision = result.new_revision_id, "undone");
        Ok(result)
    }

    /// Read-only lookup of the parsed `undo-summary` message.
    async fn fetch_undo_summary_prefix(
        &self,
        service: &S,
        revision_id: u64,
        username: &str,
        project: &Project,
    ) -> Result<String, CoreError> {
        let url = self.endpoint(project)?;

        let request = ServiceRequest::get(url)
            .param("action", "query")
            .param("meta", "allmessages")
            .param("amenableparser", "1")
            .param("ammessages", UNDO_SUMMARY_MESSAGE)
            .param("amargs", format!("{revision_id}|{username}"));

        let response: AllMessagesResponse = service.perform_typed(&request).await?;
        fail_on_remote_errors(project, response.errors)?;

        let prefix = response
            .query
            .into_iter()
            .flat_map(|q| q.allmessages)
            .find(|message| message.name == UNDO_SUMMARY_MESSAGE && !message.missing)
            .and_then(|message| message.content)
            .ok_or(CoreError::UnexpectedResponse {
                operation: "undo summary lookup",
            })?;

        debug!(%project, %prefix, "fetched undo summary prefix");
        Ok(prefix)
    }
}

fn fail_on_remote_errors(
    project: &Project,
    errors: Vec<wikiwatch_api::types::ApiError>,
) -> Result<(), CoreError> {
    CoreError::from_api_errors(project, errors).map_or(Ok(()), Err)
}
