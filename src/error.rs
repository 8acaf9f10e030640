use chrono::{DateTime, Local};
use thiserror::Error;

/// time entry作成時に発生するエラー。
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("invalid time format: {0:?} (expected hh:mmAM or hh:mmPM)")]
    InvalidTimeFormat(String),
    #[error("end time {end} is before start time {start}")]
    EndBeforeStart {
        start: DateTime<Local>,
        end: DateTime<Local>,
    },
    #[error("workspace not found: {0}")]
    NoWorkspace(i64),
    #[error("project not found: {0}")]
    ProjectNotFound(String),
    #[error("toggl request failed: {0:#}")]
    RemoteService(anyhow::Error),
}
