use async_trait::async_trait;

use crate::models::{Endpoint, Envelope, RunStatus, RunSummary, Stats};
use crate::source::DataSource;

pub fn stats() -> Stats {
    Stats {
        total_runs: 142,
        pass_rate: 87.0,
        avg_duration: "4m 32s".into(),
        active_runs: 2,
        failed_today: 3,
    }
}

pub fn runs() -> Vec<RunSummary> {
    [
        (9001, 142, "feature/auth", "a3f9c12", "rahul-s", RunStatus::Run, "1m 48s", "2 min ago"),
        (9000, 141, "fix/db-timeout", "f1e2a09", "priya-n", RunStatus::Pass, "4m 11s", "1 hr ago"),
        (8999, 140, "feature/export", "b9c3d14", "arjun-d", RunStatus::Fail, "2m 55s", "3 hr ago"),
        (8998, 139, "main", "c4a8e21", "rahul-s", RunStatus::Pass, "3m 58s", "5 hr ago"),
        (8997, 138, "feature/export", "e7d1f09", "arjun-d", RunStatus::Pass, "4m 02s", "8 hr ago"),
        (8996, 137, "hotfix/login", "a1b2c3d", "priya-n", RunStatus::Pass, "3m 20s", "1 day ago"),
        (8995, 136, "main", "d4e5f6a", "rahul-s", RunStatus::Fail, "1m 09s", "1 day ago"),
    ]
    .into_iter()
    .map(
        |(id, run_number, branch, sha, author, status, duration, started)| RunSummary {
            id,
            run_number,
            branch: branch.into(),
            commit_hash: sha.into(),
            author: author.into(),
            status,
            duration: duration.into(),
            started_at: started.into(),
        },
    )
    .collect()
}

/// Static snapshot served in place of the backend. Only the overview's data
/// exists; every other endpoint has nothing to show.
pub struct FixtureSource;

#[async_trait]
impl DataSource for FixtureSource {
    fn name(&self) -> &'static str {
        "fixture"
    }

    async fn fetch(&self, endpoint: &Endpoint) -> Option<Envelope> {
        let envelope = match endpoint {
            Endpoint::Stats => Envelope::ok(endpoint.resource_key(), &stats()),
            Endpoint::Runs => Envelope::ok(endpoint.resource_key(), &runs()),
            _ => return None,
        };
        match envelope {
            Ok(envelope) => Some(envelope),
            Err(e) => {
                tracing::error!("Could not wrap fixture for {}: {}", endpoint.path(), e);
                None
            }
        }
    }
}
