use log::info;

use crate::config::WorkspaceSelector;
use crate::error::EntryError;
use crate::project::ProjectResolver;
use crate::time_entry::{NewTimeEntry, TimeEntry, CREATED_WITH};
use crate::time_window;
use crate::toggl::TogglRepository;

/// 1件のtime entryを組み立てて作成する。
pub struct EntryComposer<'a, T: TogglRepository> {
    toggl_client: &'a T,
    project_name: String,
    workspace: WorkspaceSelector,
}

impl<'a, T: TogglRepository> EntryComposer<'a, T> {
    /// 新しい`EntryComposer`を返す。
    ///
    /// # Arguments
    /// * `toggl_client` - Toggl APIと通信するためのリポジトリ
    /// * `project_name` - time entryを登録するプロジェクト名
    /// * `workspace` - プロジェクトを探すワークスペースの選択方法
    pub fn new(toggl_client: &'a T, project_name: String, workspace: WorkspaceSelector) -> Self {
        Self {
            toggl_client,
            project_name,
            workspace,
        }
    }

    /// 今日の`start_raw`から`end_raw`までのtime entryを作成する。
    ///
    /// 時刻の解釈とプロジェクトの解決がすべて成功した場合のみ作成のリクエストを送る。
    /// 終了時刻が開始時刻と同じ場合は0秒のtime entryを作成する。
    ///
    /// # Arguments
    ///
    /// * `description` - time entryの説明文
    /// * `start_raw` - 開始時刻 (例: `08:00AM`)
    /// * `end_raw` - 終了時刻 (例: `04:30PM`)
    pub async fn execute(
        &self,
        description: &str,
        start_raw: &str,
        end_raw: &str,
    ) -> Result<TimeEntry, EntryError> {
        let window = time_window::resolve(start_raw, end_raw)?;
        if window.duration_seconds < 0 {
            return Err(EntryError::EndBeforeStart {
                start: window.start,
                end: window.end,
            });
        }
        info!("Duration: {:.2}h", window.hours());

        let resolved = ProjectResolver::new(self.toggl_client)
            .resolve(&self.workspace, &self.project_name)
            .await?;

        let entry = NewTimeEntry {
            created_with: CREATED_WITH.to_string(),
            description: description.to_string(),
            start: window.start.to_utc(),
            stop: window.end.to_utc(),
            duration: window.duration_seconds,
            project_id: resolved.project.id,
            workspace_id: resolved.workspace_id,
            billable: false,
        };
        let created = self
            .toggl_client
            .create_entry(&entry)
            .await
            .map_err(EntryError::RemoteService)?;
        info!("Time entry created successfully.");

        Ok(created)
    }
}
