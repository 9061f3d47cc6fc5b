use askama::Template;

use crate::document::Document;
use crate::models::{Commit, Job, PullRequest, RunSummary, Stats};
use crate::registry::StageTargets;

pub const RUNS_TABLE: &str = "runs-table";
pub const COMMITS_TABLE: &str = "commits-table";
pub const PULLS_TABLE: &str = "pulls-table";

pub const STAT_TOTAL_RUNS: &str = "stat-total-runs";
pub const STAT_PASS_RATE: &str = "stat-pass-rate";
pub const STAT_AVG_DURATION: &str = "stat-avg-duration";
pub const STAT_ACTIVE_RUNS: &str = "stat-active-runs";
pub const STAT_FAILED_TODAY: &str = "stat-failed-today";

pub const STAT_ANCHORS: [&str; 5] = [
    STAT_TOTAL_RUNS,
    STAT_PASS_RATE,
    STAT_AVG_DURATION,
    STAT_ACTIVE_RUNS,
    STAT_FAILED_TODAY,
];

pub const LOADING_MESSAGE: &str = "Loading from GitHub...";

#[derive(Template)]
#[template(path = "runs.html")]
struct RunRows<'a> {
    runs: &'a [RunSummary],
}

#[derive(Template)]
#[template(path = "commits.html")]
struct CommitRows<'a> {
    commits: &'a [Commit],
}

#[derive(Template)]
#[template(path = "pulls.html")]
struct PullRows<'a> {
    pulls: &'a [PullRequest],
}

#[derive(Template)]
#[template(path = "status_row.html")]
struct StatusRow<'a> {
    color: &'a str,
    message: &'a str,
}

pub fn render_stats(doc: &mut Document, stats: &Stats) {
    doc.set_text(STAT_TOTAL_RUNS, &stats.total_runs.to_string());
    doc.set_text(STAT_PASS_RATE, &format!("{}%", stats.pass_rate));
    doc.set_text(STAT_AVG_DURATION, &stats.avg_duration);
    doc.set_text(STAT_ACTIVE_RUNS, &stats.active_runs.to_string());
    doc.set_text(STAT_FAILED_TODAY, &stats.failed_today.to_string());
}

pub fn render_runs(doc: &mut Document, runs: &[RunSummary]) -> askama::Result<()> {
    let rows = RunRows { runs }.render()?;
    doc.set_html(RUNS_TABLE, &rows);
    Ok(())
}

pub fn render_commits(doc: &mut Document, commits: &[Commit]) -> askama::Result<()> {
    let rows = CommitRows { commits }.render()?;
    doc.set_html(COMMITS_TABLE, &rows);
    Ok(())
}

pub fn render_pulls(doc: &mut Document, pulls: &[PullRequest]) -> askama::Result<()> {
    let rows = PullRows { pulls }.render()?;
    doc.set_html(PULLS_TABLE, &rows);
    Ok(())
}

/// Writes the status of the first job whose name contains the stage keyword
/// into the stage's header pill and badge. Returns whether a job matched.
pub fn render_job_steps(doc: &mut Document, stage: &StageTargets, jobs: &[Job]) -> bool {
    let keyword = stage.keyword.to_lowercase();
    let job = match jobs
        .iter()
        .find(|job| job.name.to_lowercase().contains(&keyword))
    {
        Some(job) => job,
        None => return false,
    };

    let status = job.status.as_str();
    doc.set_class(&stage.header_pill, &format!("pill {}", status));
    doc.set_html(
        &stage.header_pill,
        &format!(
            "<span class=\"pill-dot\"></span>{}",
            askama_escape::escape(&status.to_uppercase(), askama_escape::Html)
        ),
    );

    doc.set_class(
        &stage.badge,
        &format!("stage-badge {}", job.status.badge_class()),
    );
    doc.set_text(&stage.badge, job.status.badge_label());
    true
}

pub fn render_loading(doc: &mut Document) -> askama::Result<()> {
    let row = StatusRow {
        color: "muted",
        message: LOADING_MESSAGE,
    }
    .render()?;
    doc.set_html(RUNS_TABLE, &row);
    Ok(())
}

pub fn render_error(doc: &mut Document, message: &str) -> askama::Result<()> {
    let row = StatusRow {
        color: "red",
        message: &format!("\u{26a0} {}", message),
    }
    .render()?;
    doc.set_html(RUNS_TABLE, &row);
    Ok(())
}
