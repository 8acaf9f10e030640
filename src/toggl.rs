use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info};
#[cfg(test)]
use mockall::automock;
use reqwest::{header::CONTENT_TYPE, Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize};

use crate::history::DescriptionRecord;
use crate::project::{Project, Workspace};
use crate::time_entry::{NewTimeEntry, TimeEntry};

/// Toggl API v9のベースURL。
pub const DEFAULT_API_URL: &str = "https://api.track.toggl.com/api/v9";

/// Toggl APIのtime entryから説明文の履歴に必要な項目をデシリアライズするための構造体。
#[derive(Debug, Deserialize)]
struct TogglTimeEntry {
    id: i64,
    description: Option<String>,
}

/// Toggl APIへのアクセスを抽象化したtrait。
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TogglRepository: Send + Sync {
    /// ログインユーザーのワークスペース一覧を取得する。
    async fn list_workspaces(&self) -> Result<Vec<Workspace>>;

    /// 指定されたワークスペースのプロジェクト一覧を取得する。
    async fn list_projects(&self, workspace_id: i64) -> Result<Vec<Project>>;

    /// 指定された期間のtime entryを取得する。
    ///
    /// 説明文が空のtime entryは含まない。
    ///
    /// # Arguments
    ///
    /// * `start_at` - 取得するタイムエントリーの開始日時
    /// * `end_at` - 取得するタイムエントリーの終了日時
    async fn list_entries(
        &self,
        start_at: &DateTime<Utc>,
        end_at: &DateTime<Utc>,
    ) -> Result<Vec<DescriptionRecord>>;

    /// time entryを作成し、作成されたtime entryを返す。
    async fn create_entry(&self, entry: &NewTimeEntry) -> Result<TimeEntry>;
}

/// Toggl APIと通信するためのクライアント。
///
/// # Examples
///
/// ```
/// let client = TogglClient::new(DEFAULT_API_URL, &api_token);
/// let workspaces = client.list_workspaces().await.unwrap();
/// ```
pub struct TogglClient {
    client: Client,
    api_url: String,
    api_token: String,
}

impl TogglClient {
    /// 新しい`TogglClient`を返す。
    ///
    /// # Arguments
    ///
    /// * `api_url` - Toggl APIのベースURL
    /// * `api_token` - Toggl APIのトークン
    pub fn new(api_url: &str, api_token: &str) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
        }
    }

    /// 認証情報を付与したリクエストを作成する。
    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .basic_auth(&self.api_token, Some("api_token"))
            .header(CONTENT_TYPE, "application/json")
    }

    /// リクエストを送信し、レスポンスをデシリアライズする。
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self
            .request(builder)
            .send()
            .await
            .with_context(|| format!("Failed to send request to Toggl API at {}", self.api_url))?
            .error_for_status()
            .context("Request returned an error status")?
            .json::<T>()
            .await
            .context("Failed to deserialize response")?;

        Ok(response)
    }
}

#[async_trait]
impl TogglRepository for TogglClient {
    async fn list_workspaces(&self) -> Result<Vec<Workspace>> {
        let workspaces: Option<Vec<Workspace>> = self
            .send(self.client.get(format!("{}/me/workspaces", self.api_url)))
            .await
            .context("Failed to get workspace list from toggl")?;
        let workspaces = workspaces.unwrap_or_default();
        info!("length of workspaces: {}", workspaces.len());

        Ok(workspaces)
    }

    async fn list_projects(&self, workspace_id: i64) -> Result<Vec<Project>> {
        // プロジェクトが存在しない場合はnullが返される
        let projects: Option<Vec<Project>> = self
            .send(self.client.get(format!(
                "{}/workspaces/{}/projects",
                self.api_url, workspace_id
            )))
            .await
            .with_context(|| format!("Failed to get project list of workspace {}", workspace_id))?;
        let projects = projects.unwrap_or_default();
        info!("length of projects: {}", projects.len());

        Ok(projects)
    }

    async fn list_entries(
        &self,
        start_at: &DateTime<Utc>,
        end_at: &DateTime<Utc>,
    ) -> Result<Vec<DescriptionRecord>> {
        let toggl_time_entries: Option<Vec<TogglTimeEntry>> = self
            .send(
                self.client
                    .get(format!("{}/me/time_entries", self.api_url))
                    .query(&[
                        ("start_date", start_at.to_rfc3339()),
                        ("end_date", end_at.to_rfc3339()),
                    ]),
            )
            .await
            .context("Failed to get time entries from toggl")?;
        let toggl_time_entries = toggl_time_entries.unwrap_or_default();
        info!("length of time entries: {}", toggl_time_entries.len());

        let records = toggl_time_entries
            .into_iter()
            .filter_map(|entry| match entry.description {
                Some(description) if !description.is_empty() => Some(DescriptionRecord {
                    id: entry.id,
                    description,
                }),
                _ => None,
            })
            .collect();

        Ok(records)
    }

    async fn create_entry(&self, entry: &NewTimeEntry) -> Result<TimeEntry> {
        debug!("Creating time entry: {:?}", entry);
        let created: TimeEntry = self
            .send(
                self.client
                    .post(format!(
                        "{}/workspaces/{}/time_entries",
                        self.api_url, entry.workspace_id
                    ))
                    .json(entry),
            )
            .await
            .context("Failed to create time entry on toggl")?;
        info!("Time entry created: {}", created.id);

        Ok(created)
    }
}
