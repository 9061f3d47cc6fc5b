use std::collections::HashMap;
use std::sync::Arc;

use futures_lite::future;
use tokio::sync::Mutex;

use crate::document::SharedDocument;
use crate::models::{Commit, Endpoint, Job, PullRequest, RunSummary, Stats};
use crate::registry::{PageKind, PageRegistry, StageTargets};
use crate::render;
use crate::source::DataSource;

pub const MISSING_RUNS_MESSAGE: &str = "Backend response contained no runs.";
pub const MALFORMED_RUNS_MESSAGE: &str = "Backend sent runs in an unexpected format.";

/// A load in flight for one page. Renders only land while it is still the
/// newest load of that page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ticket(u64);

pub struct PageLoader {
    source: Arc<dyn DataSource>,
    registry: Arc<PageRegistry>,
    document: SharedDocument,
    generations: Mutex<HashMap<String, u64>>,
}

impl PageLoader {
    pub fn new(
        source: Arc<dyn DataSource>,
        registry: Arc<PageRegistry>,
        document: SharedDocument,
    ) -> Self {
        Self {
            source,
            registry,
            document,
            generations: Mutex::new(HashMap::new()),
        }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    async fn issue_ticket(&self, page_id: &str) -> Ticket {
        let mut generations = self.generations.lock().await;
        let generation = generations.entry(page_id.to_string()).or_insert(0);
        *generation += 1;
        Ticket(*generation)
    }

    async fn is_current(&self, page_id: &str, ticket: Ticket) -> bool {
        let current = self.generations.lock().await.get(page_id).copied();
        if current != Some(ticket.0) {
            tracing::debug!(
                "Dropping stale response for `{}` (load {} superseded by {:?})",
                page_id,
                ticket.0,
                current
            );
            return false;
        }
        true
    }

    async fn fetch_resource<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: Endpoint,
    ) -> Option<T> {
        self.source
            .fetch(&endpoint)
            .await?
            .resource(endpoint.resource_key())
    }

    /// The runs list, with the same visible failure as the gateway's: a
    /// payload that arrives but can't be read replaces the loading row with
    /// an error row.
    async fn fetch_runs(&self) -> Option<Vec<RunSummary>> {
        let endpoint = Endpoint::Runs;
        let envelope = self.source.fetch(&endpoint).await?;
        let message = match envelope.decode::<Vec<RunSummary>>(endpoint.resource_key()) {
            Ok(Some(runs)) => return Some(runs),
            Ok(None) => MISSING_RUNS_MESSAGE.to_string(),
            Err(e) => {
                tracing::warn!("Discarding malformed runs payload: {}", e);
                MALFORMED_RUNS_MESSAGE.to_string()
            }
        };

        let mut doc = self.document.lock().await;
        if let Err(e) = render::render_error(&mut doc, &message) {
            tracing::warn!("Could not render error row: {}", e);
        }
        None
    }

    pub async fn load_page_data(&self, page_id: &str) {
        let kind = match self.registry.get(page_id) {
            Some(targets) => targets.kind.clone(),
            None => {
                tracing::warn!("No page registered as `{}`, nothing to load", page_id);
                return;
            }
        };
        let ticket = self.issue_ticket(page_id).await;
        tracing::info!("Loading `{}` from {}", page_id, self.source.name());

        match kind {
            PageKind::Overview => self.load_overview(page_id, ticket).await,
            PageKind::Source => self.load_source(page_id, ticket).await,
            PageKind::Stage(stage) => self.load_stage(page_id, ticket, &stage).await,
        }
    }

    async fn load_overview(&self, page_id: &str, ticket: Ticket) {
        let (stats, runs) = future::zip(
            self.fetch_resource::<Stats>(Endpoint::Stats),
            self.fetch_runs(),
        )
        .await;

        if !self.is_current(page_id, ticket).await {
            return;
        }
        let mut doc = self.document.lock().await;
        if let Some(stats) = stats {
            render::render_stats(&mut doc, &stats);
        }
        if let Some(runs) = runs.filter(|runs| !runs.is_empty()) {
            if let Err(e) = render::render_runs(&mut doc, &runs) {
                tracing::error!("Could not render runs: {}", e);
            }
        }
    }

    async fn load_source(&self, page_id: &str, ticket: Ticket) {
        let (commits, pulls) = future::zip(
            self.fetch_resource::<Vec<Commit>>(Endpoint::Commits),
            self.fetch_resource::<Vec<PullRequest>>(Endpoint::Pulls),
        )
        .await;

        if !self.is_current(page_id, ticket).await {
            return;
        }
        let mut doc = self.document.lock().await;
        if let Some(commits) = commits.filter(|commits| !commits.is_empty()) {
            if let Err(e) = render::render_commits(&mut doc, &commits) {
                tracing::error!("Could not render commits: {}", e);
            }
        }
        if let Some(pulls) = pulls.filter(|pulls| !pulls.is_empty()) {
            if let Err(e) = render::render_pulls(&mut doc, &pulls) {
                tracing::error!("Could not render pull requests: {}", e);
            }
        }
    }

    async fn load_stage(&self, page_id: &str, ticket: Ticket, stage: &StageTargets) {
        let latest = match self
            .fetch_runs()
            .await
            .and_then(|runs| runs.into_iter().next())
        {
            Some(run) => run,
            None => return,
        };

        let jobs = match self
            .fetch_resource::<Vec<Job>>(Endpoint::RunDetail(latest.id))
            .await
        {
            Some(jobs) => jobs,
            None => return,
        };

        if !self.is_current(page_id, ticket).await {
            return;
        }
        let mut doc = self.document.lock().await;
        if !render::render_job_steps(&mut doc, stage, &jobs) {
            tracing::debug!(
                "Run {} has no job matching `{}`",
                latest.id,
                stage.keyword
            );
        }
    }
}
