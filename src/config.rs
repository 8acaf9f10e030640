use thiserror::Error;

use crate::Args;

/// プロジェクトを探すワークスペースの選択方法。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WorkspaceSelector {
    /// ワークスペース一覧の先頭を利用する。
    #[default]
    First,
    /// 指定したIDのワークスペースを利用する。
    Id(i64),
}

/// 設定の組み立て時に発生するエラー。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "No API token provided! Get one at https://track.toggl.com/profile, \
         then set the TOGGL_API_TOKEN environment variable or pass it via '-a'."
    )]
    MissingApiToken,
}

/// 実行時の設定。
///
/// コマンドライン引数と環境変数から一度だけ組み立て、以降は値として受け渡す。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub api_token: String,
    /// 指定されていない場合は履歴から選択する。
    pub description: Option<String>,
    pub start: String,
    pub end: String,
    pub project_name: String,
    pub workspace: WorkspaceSelector,
    pub suggestion_limit: usize,
}

impl TryFrom<Args> for Config {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let api_token = match args.api_token {
            Some(token) if !token.trim().is_empty() => token,
            _ => return Err(ConfigError::MissingApiToken),
        };

        Ok(Self {
            api_url: args.api_url,
            api_token,
            description: args.description.filter(|d| !d.trim().is_empty()),
            start: args.start,
            end: args.end,
            project_name: args.project,
            workspace: args
                .workspace
                .map(WorkspaceSelector::Id)
                .unwrap_or_default(),
            suggestion_limit: args.limit,
        })
    }
}
