use std::collections::HashSet;

use chrono::Months;
use log::{debug, info, warn};

use crate::datetime;
use crate::error::EntryError;
use crate::toggl::TogglRepository;

/// 候補として表示する説明文の数の既定値。
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// 説明文の履歴として利用するtime entry。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DescriptionRecord {
    pub id: i64,
    pub description: String,
}

/// 重複を除いた説明文を、最初に出現した順に最大`limit`件返す。
pub fn suggest(entries: &[DescriptionRecord], limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .filter(|entry| seen.insert(entry.description.as_str()))
        .map(|entry| entry.description.clone())
        .take(limit)
        .collect()
}

/// 直近に利用した説明文を取得する。
pub struct DescriptionHistory<'a, T: TogglRepository> {
    toggl_client: &'a T,
}

impl<'a, T: TogglRepository> DescriptionHistory<'a, T> {
    /// 新しい`DescriptionHistory`を返す。
    ///
    /// # Arguments
    /// * `toggl_client` - Toggl APIと通信するためのリポジトリ
    pub fn new(toggl_client: &'a T) -> Self {
        Self { toggl_client }
    }

    /// 過去1ヶ月のtime entryから、直近に利用した説明文を取得する。
    ///
    /// # Arguments
    ///
    /// * `limit` - 取得する説明文の最大数
    pub async fn latest_descriptions(&self, limit: usize) -> Result<Vec<String>, EntryError> {
        let end_at = datetime::now();
        let start_at = match end_at.checked_sub_months(Months::new(1)) {
            Some(start_at) => start_at,
            None => {
                warn!("Failed to go back one month from {}, using it as is", end_at);
                end_at
            }
        };
        info!("Start at: {}, End at: {}", start_at, end_at);

        let entries = self
            .toggl_client
            .list_entries(&start_at, &end_at)
            .await
            .map_err(EntryError::RemoteService)?;
        debug!(
            "Fetched time entries: {:?}",
            entries.iter().map(|entry| entry.id).collect::<Vec<_>>()
        );
        let descriptions = suggest(&entries, limit);
        info!("length of suggested descriptions: {}", descriptions.len());

        Ok(descriptions)
    }
}
