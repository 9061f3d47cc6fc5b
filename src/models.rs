use std::borrow::Cow;

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

/// Status shared by runs and jobs. Anything the backend sends that we don't
/// know about is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum RunStatus {
    Pass,
    Fail,
    Run,
    Pending,
    Other(String),
}

impl Default for RunStatus {
    fn default() -> Self {
        RunStatus::Pending
    }
}

impl From<Option<String>> for RunStatus {
    fn from(status: Option<String>) -> Self {
        match status.as_deref() {
            None | Some("") | Some("pending") => RunStatus::Pending,
            Some("pass") => RunStatus::Pass,
            Some("fail") => RunStatus::Fail,
            Some("run") => RunStatus::Run,
            Some(other) => RunStatus::Other(other.to_string()),
        }
    }
}

impl From<&str> for RunStatus {
    fn from(status: &str) -> Self {
        Some(status.to_string()).into()
    }
}

impl From<RunStatus> for String {
    fn from(status: RunStatus) -> Self {
        status.as_str().to_string()
    }
}

impl RunStatus {
    pub fn as_str(&self) -> &str {
        match self {
            RunStatus::Pass => "pass",
            RunStatus::Fail => "fail",
            RunStatus::Run => "run",
            RunStatus::Pending => "pending",
            RunStatus::Other(status) => status,
        }
    }

    pub fn pill_class(&self) -> &'static str {
        match self {
            RunStatus::Pass => "pass",
            RunStatus::Fail => "fail",
            RunStatus::Run => "run",
            RunStatus::Pending | RunStatus::Other(_) => "skip",
        }
    }

    pub fn pill_label(&self) -> Cow<'static, str> {
        match self {
            RunStatus::Pass => "PASSED".into(),
            RunStatus::Fail => "FAILED".into(),
            RunStatus::Run => "RUNNING".into(),
            RunStatus::Pending => "PENDING".into(),
            RunStatus::Other(status) => status.to_uppercase().into(),
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            RunStatus::Pass => "badge-pass",
            RunStatus::Fail => "badge-fail",
            RunStatus::Run => "badge-run",
            RunStatus::Pending | RunStatus::Other(_) => "badge-warn",
        }
    }

    pub fn badge_label(&self) -> &'static str {
        match self {
            RunStatus::Pass => "OK",
            RunStatus::Fail => "FAIL",
            RunStatus::Run => "RUN",
            RunStatus::Pending => "...",
            RunStatus::Other(_) => "?",
        }
    }
}

/// Missing and `null` both become the type's default. Runs still in
/// progress come back with gaps, e.g. no duration yet.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub id: u64,
    #[serde(default, deserialize_with = "or_default")]
    pub run_number: u64,
    #[serde(default, deserialize_with = "or_default")]
    pub branch: String,
    #[serde(
        rename = "sha",
        alias = "commitHash",
        default,
        deserialize_with = "or_default"
    )]
    pub commit_hash: String,
    #[serde(default, deserialize_with = "or_default")]
    pub author: String,
    #[serde(default)]
    pub status: RunStatus,
    #[serde(default, deserialize_with = "or_default")]
    pub duration: String,
    #[serde(
        rename = "started",
        alias = "startedAt",
        default,
        deserialize_with = "or_default"
    )]
    pub started_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    #[serde(rename = "sha", alias = "hash", default, deserialize_with = "or_default")]
    pub hash: String,
    #[serde(default, deserialize_with = "or_default")]
    pub message: String,
    #[serde(default, deserialize_with = "or_default")]
    pub author: String,
    #[serde(default, deserialize_with = "or_default")]
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub number: u64,
    #[serde(default, deserialize_with = "or_default")]
    pub title: String,
    #[serde(default, deserialize_with = "or_default")]
    pub author: String,
    #[serde(default, deserialize_with = "or_default")]
    pub branch: String,
    #[serde(default, deserialize_with = "or_default")]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    #[serde(default)]
    pub status: RunStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_runs: u64,
    pub pass_rate: f64,
    pub avg_duration: String,
    pub active_runs: u64,
    pub failed_today: u64,
}

/// `{ success, error?, <resource>: <payload> }` as served by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl Envelope {
    pub fn ok<T: Serialize>(key: &str, payload: &T) -> serde_json::Result<Self> {
        let mut data = serde_json::Map::new();
        data.insert(key.to_string(), serde_json::to_value(payload)?);
        Ok(Envelope {
            success: true,
            error: None,
            data,
        })
    }

    /// Decodes one resource out of the envelope. A missing key, a `null`
    /// or a payload of the wrong shape all count as "no data".
    pub fn resource<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.decode(key) {
            Ok(resource) => resource,
            Err(e) => {
                tracing::warn!("Discarding malformed `{}` payload: {}", key, e);
                None
            }
        }
    }

    /// Like `resource`, but keeps a malformed payload apart from an absent
    /// one: `Ok(None)` for a missing key or `null`.
    pub fn decode<T: DeserializeOwned>(&self, key: &str) -> serde_json::Result<Option<T>> {
        match self.data.get(key).filter(|value| !value.is_null()) {
            Some(value) => serde_json::from_value(value.clone()).map(Some),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Stats,
    Runs,
    RunDetail(u64),
    Commits,
    Pulls,
}

impl Endpoint {
    pub fn path(&self) -> String {
        match self {
            Endpoint::Stats => "/api/stats".into(),
            Endpoint::Runs => "/api/runs".into(),
            Endpoint::RunDetail(id) => format!("/api/runs/{}", id),
            Endpoint::Commits => "/api/commits".into(),
            Endpoint::Pulls => "/api/pulls".into(),
        }
    }

    /// Key under which the endpoint's payload sits in the envelope.
    pub fn resource_key(&self) -> &'static str {
        match self {
            Endpoint::Stats => "stats",
            Endpoint::Runs => "runs",
            Endpoint::RunDetail(_) => "jobs",
            Endpoint::Commits => "commits",
            Endpoint::Pulls => "pulls",
        }
    }
}
