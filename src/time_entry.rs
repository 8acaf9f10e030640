use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// time entryの作成元としてToggl APIに送る名前。
pub const CREATED_WITH: &str = "toggl-entry";

/// 新しく作成するtime entry。
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewTimeEntry {
	pub created_with: String,
	pub description: String,
	pub start: DateTime<Utc>,
	pub stop: DateTime<Utc>,
	pub duration: i64,
	pub project_id: i64,
	pub workspace_id: i64,
	pub billable: bool,
}

/// Toggl APIから返されたtime entry。
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TimeEntry {
	pub id: i64,
	pub workspace_id: i64,
	#[serde(default)]
	pub project_id: Option<i64>,
	#[serde(default)]
	pub description: Option<String>,
	pub start: DateTime<Utc>,
	#[serde(default)]
	pub stop: Option<DateTime<Utc>>,
	pub duration: i64,
	#[serde(default)]
	pub billable: bool,
}
