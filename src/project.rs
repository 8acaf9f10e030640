use log::{debug, info};
use serde::Deserialize;

use crate::config::WorkspaceSelector;
use crate::error::EntryError;
use crate::toggl::TogglRepository;

/// ワークスペース。
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Workspace {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

/// ワークスペースに属するプロジェクト。
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
}

/// 解決したプロジェクトと、その所属するワークスペースのID。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedProject {
    pub workspace_id: i64,
    pub project: Project,
}

/// ワークスペース一覧から対象のワークスペースを選択する。
pub fn select_workspace<'a>(
    workspaces: &'a [Workspace],
    selector: &WorkspaceSelector,
) -> Option<&'a Workspace> {
    match selector {
        WorkspaceSelector::First => workspaces.first(),
        WorkspaceSelector::Id(id) => workspaces.iter().find(|w| w.id == *id),
    }
}

/// プロジェクト一覧から名前が完全に一致する最初のプロジェクトを探す。
pub fn find_project<'a>(projects: &'a [Project], target_name: &str) -> Option<&'a Project> {
    projects.iter().find(|p| p.name == target_name)
}

/// 名前からプロジェクトを解決する。
pub struct ProjectResolver<'a, T: TogglRepository> {
    toggl_client: &'a T,
}

impl<'a, T: TogglRepository> ProjectResolver<'a, T> {
    /// 新しい`ProjectResolver`を返す。
    ///
    /// # Arguments
    /// * `toggl_client` - Toggl APIと通信するためのリポジトリ
    pub fn new(toggl_client: &'a T) -> Self {
        Self { toggl_client }
    }

    /// 選択したワークスペースから、名前が一致するプロジェクトを取得する。
    ///
    /// 他のワークスペースは探さない。
    /// `WorkspaceSelector::First`でワークスペースが1つもない場合は、プロジェクトが見つからないものとして扱う。
    ///
    /// # Arguments
    ///
    /// * `selector` - ワークスペースの選択方法
    /// * `target_name` - プロジェクト名
    pub async fn resolve(
        &self,
        selector: &WorkspaceSelector,
        target_name: &str,
    ) -> Result<ResolvedProject, EntryError> {
        let workspaces = self
            .toggl_client
            .list_workspaces()
            .await
            .map_err(EntryError::RemoteService)?;

        let workspace = match (select_workspace(&workspaces, selector), selector) {
            (Some(workspace), _) => workspace,
            (None, WorkspaceSelector::Id(id)) => return Err(EntryError::NoWorkspace(*id)),
            (None, WorkspaceSelector::First) => {
                return Err(EntryError::ProjectNotFound(target_name.to_string()))
            }
        };
        debug!("Selected workspace: {} ({})", workspace.id, workspace.name);

        let projects = self
            .toggl_client
            .list_projects(workspace.id)
            .await
            .map_err(EntryError::RemoteService)?;
        let project = find_project(&projects, target_name)
            .cloned()
            .ok_or_else(|| EntryError::ProjectNotFound(target_name.to_string()))?;
        info!("Project resolved: {} ({})", project.name, project.id);

        Ok(ResolvedProject {
            workspace_id: workspace.id,
            project,
        })
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use mockall::predicate::eq;
    use rstest::rstest;

    use super::{find_project, select_workspace, Project, ProjectResolver, Workspace};
    use crate::config::WorkspaceSelector;
    use crate::error::EntryError;
    use crate::toggl::MockTogglRepository;

    fn workspace(id: i64) -> Workspace {
        Workspace {
            id,
            name: format!("ws{}", id),
        }
    }

    fn project(id: i64, name: &str) -> Project {
        Project {
            id,
            name: name.to_string(),
        }
    }

    #[rstest]
    #[case::first(&[workspace(1), workspace(2)], WorkspaceSelector::First, Some(1))]
    #[case::first_of_empty(&[], WorkspaceSelector::First, None)]
    #[case::by_id(&[workspace(1), workspace(2)], WorkspaceSelector::Id(2), Some(2))]
    #[case::unknown_id(&[workspace(1)], WorkspaceSelector::Id(3), None)]
    fn test_select_workspace(
        #[case] workspaces: &[Workspace],
        #[case] selector: WorkspaceSelector,
        #[case] expected: Option<i64>,
    ) {
        assert_eq!(
            select_workspace(workspaces, &selector).map(|w| w.id),
            expected
        );
    }

    #[rstest]
    #[case::found(&[project(1, "Camunda")], "Camunda", Some(1))]
    #[case::not_found(&[project(1, "Other")], "Camunda", None)]
    #[case::case_sensitive(&[project(1, "camunda")], "Camunda", None)]
    #[case::first_match_wins(&[project(1, "Other"), project(2, "Camunda"), project(3, "Camunda")], "Camunda", Some(2))]
    #[case::empty(&[], "Camunda", None)]
    fn test_find_project(
        #[case] projects: &[Project],
        #[case] target: &str,
        #[case] expected: Option<i64>,
    ) {
        assert_eq!(find_project(projects, target).map(|p| p.id), expected);
    }

    #[tokio::test]
    async fn test_resolve() {
        let mut toggl = MockTogglRepository::new();
        toggl
            .expect_list_workspaces()
            .times(1)
            .returning(|| Ok(vec![workspace(1)]));
        toggl
            .expect_list_projects()
            .with(eq(1))
            .times(1)
            .returning(|_| Ok(vec![project(1, "Camunda")]));

        let resolved = ProjectResolver::new(&toggl)
            .resolve(&WorkspaceSelector::First, "Camunda")
            .await
            .unwrap();

        assert_eq!(resolved.workspace_id, 1);
        assert_eq!(resolved.project, project(1, "Camunda"));
    }

    #[tokio::test]
    async fn test_resolve_project_not_found() {
        let mut toggl = MockTogglRepository::new();
        toggl
            .expect_list_workspaces()
            .returning(|| Ok(vec![workspace(1)]));
        toggl
            .expect_list_projects()
            .returning(|_| Ok(vec![project(1, "Other")]));

        let result = ProjectResolver::new(&toggl)
            .resolve(&WorkspaceSelector::First, "Camunda")
            .await;

        assert!(matches!(result, Err(EntryError::ProjectNotFound(name)) if name == "Camunda"));
    }

    /// ワークスペースがない場合は、プロジェクト一覧を取得せずにプロジェクトが見つからないとする。
    #[tokio::test]
    async fn test_resolve_no_workspaces() {
        let mut toggl = MockTogglRepository::new();
        toggl
            .expect_list_workspaces()
            .returning(|| Ok(vec![]));
        toggl.expect_list_projects().times(0);

        let result = ProjectResolver::new(&toggl)
            .resolve(&WorkspaceSelector::First, "Camunda")
            .await;

        assert!(matches!(result, Err(EntryError::ProjectNotFound(_))));
    }

    #[tokio::test]
    async fn test_resolve_selected_workspace() {
        let mut toggl = MockTogglRepository::new();
        toggl
            .expect_list_workspaces()
            .returning(|| Ok(vec![workspace(1), workspace(2)]));
        toggl
            .expect_list_projects()
            .with(eq(2))
            .times(1)
            .returning(|_| Ok(vec![project(20, "Camunda")]));

        let resolved = ProjectResolver::new(&toggl)
            .resolve(&WorkspaceSelector::Id(2), "Camunda")
            .await
            .unwrap();

        assert_eq!(resolved.workspace_id, 2);
        assert_eq!(resolved.project.id, 20);
    }

    #[tokio::test]
    async fn test_resolve_unknown_workspace() {
        let mut toggl = MockTogglRepository::new();
        toggl
            .expect_list_workspaces()
            .returning(|| Ok(vec![workspace(1)]));
        toggl.expect_list_projects().times(0);

        let result = ProjectResolver::new(&toggl)
            .resolve(&WorkspaceSelector::Id(5), "Camunda")
            .await;

        assert!(matches!(result, Err(EntryError::NoWorkspace(5))));
    }

    #[tokio::test]
    async fn test_resolve_remote_error() {
        let mut toggl = MockTogglRepository::new();
        toggl
            .expect_list_workspaces()
            .returning(|| Err(anyhow!("connection refused")));

        let result = ProjectResolver::new(&toggl)
            .resolve(&WorkspaceSelector::First, "Camunda")
            .await;

        assert!(matches!(result, Err(EntryError::RemoteService(_))));
    }
}
