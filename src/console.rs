use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use chrono::Local;

use crate::time_entry::TimeEntry;

/// Consoleにtime entryを表示するためのtrait。
pub trait ConsolePresenter {
    /// 作成したタイムエントリーを表示する。
    ///
    /// # Arguments
    ///
    /// * `entry` - 表示するタイムエントリー
    fn show_created_entry(&mut self, entry: &TimeEntry) -> Result<()>;
}

/// 作成したタイムエントリーを1行で表示する。
pub struct ConsoleLine<'a, W: Write> {
    writer: &'a mut W,
}

impl<'a, W: Write> ConsoleLine<'a, W> {
    /// 新しい`ConsoleLine`を返す。
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }
}

impl<'a, W: Write> ConsolePresenter for ConsoleLine<'a, W> {
    // 開始、終了時刻と時間単位の長さを表示する。
    fn show_created_entry(&mut self, entry: &TimeEntry) -> Result<()> {
        let start_str = entry
            .start
            .with_timezone(&Local)
            .format("%H:%M")
            .to_string();
        let end_str = entry
            .stop
            .map(|stop| stop.with_timezone(&Local).format("%H:%M").to_string())
            .unwrap_or_else(|| "now".to_string());
        let duration_hours = entry.duration as f64 / 3600.0;
        writeln!(
            self.writer,
            "Created: {} ~ {} ({:.2}h) {}",
            start_str,
            end_str,
            duration_hours,
            entry.description.as_deref().unwrap_or_default()
        )
        .with_context(|| format!("Failed to write time entry: {:?}", entry))?;

        Ok(())
    }
}

/// 説明文を入力してもらうためのtrait。
pub trait DescriptionPrompt {
    /// 候補から説明文を選択、または新しい説明文を入力してもらう。
    ///
    /// # Arguments
    ///
    /// * `suggestions` - 説明文の候補
    fn select(&mut self, suggestions: &[String]) -> Result<String>;
}

/// 番号付きの候補を表示し、1行読み込んで説明文を決める。
///
/// 候補の番号が入力された場合はその候補を、それ以外はそのまま説明文として扱う。
pub struct ConsoleDescriptionPrompt<'a, R: BufRead, W: Write> {
    reader: &'a mut R,
    writer: &'a mut W,
}

impl<'a, R: BufRead, W: Write> ConsoleDescriptionPrompt<'a, R, W> {
    /// 新しい`ConsoleDescriptionPrompt`を返す。
    pub fn new(reader: &'a mut R, writer: &'a mut W) -> Self {
        Self { reader, writer }
    }
}

impl<'a, R: BufRead, W: Write> DescriptionPrompt for ConsoleDescriptionPrompt<'a, R, W> {
    fn select(&mut self, suggestions: &[String]) -> Result<String> {
        if suggestions.is_empty() {
            write!(self.writer, "Description: ").context("Failed to write prompt")?;
        } else {
            writeln!(
                self.writer,
                "Select a description by number or type a new one:"
            )
            .context("Failed to write prompt")?;
            for (i, suggestion) in suggestions.iter().enumerate() {
                writeln!(self.writer, "  {}) {}", i + 1, suggestion)
                    .context("Failed to write suggestion")?;
            }
            write!(self.writer, "> ").context("Failed to write prompt")?;
        }
        self.writer.flush().context("Failed to flush prompt")?;

        let mut line = String::new();
        self.reader
            .read_line(&mut line)
            .context("Failed to read description")?;
        let input = line.trim();
        if input.is_empty() {
            bail!("Description must not be empty");
        }

        let selected = input
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| suggestions.get(i));

        Ok(selected.cloned().unwrap_or_else(|| input.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use chrono::{Local, TimeZone, Utc};
    use rstest::rstest;

    use super::{ConsoleDescriptionPrompt, ConsoleLine, ConsolePresenter, DescriptionPrompt};
    use crate::time_entry::TimeEntry;

    fn dummy_entry(stop: bool) -> TimeEntry {
        TimeEntry {
            id: 1,
            workspace_id: 1,
            project_id: Some(1),
            description: Some("entry1".to_string()),
            start: Utc.with_ymd_and_hms(2021, 1, 1, 1, 0, 0).unwrap(),
            stop: stop.then(|| Utc.with_ymd_and_hms(2021, 1, 1, 9, 30, 0).unwrap()),
            duration: 30600,
            billable: false,
        }
    }

    /// テスト用に1 time entryに対する期待値の文字列を作成する。
    fn expected_output(entry: &TimeEntry) -> String {
        let start_str = entry
            .start
            .with_timezone(&Local)
            .format("%H:%M")
            .to_string();
        let end_str = entry
            .stop
            .map(|stop| stop.with_timezone(&Local).format("%H:%M").to_string())
            .unwrap_or_else(|| "now".to_string());
        format!("Created: {} ~ {} (8.50h) entry1\n", start_str, end_str)
    }

    #[rstest]
    #[case::with_stop(dummy_entry(true))]
    #[case::no_stop(dummy_entry(false))]
    fn test_show_created_entry(#[case] entry: TimeEntry) {
        let mut writer = Vec::new();
        let mut presenter = ConsoleLine::new(&mut writer);

        presenter.show_created_entry(&entry).unwrap();

        assert_eq!(String::from_utf8(writer).unwrap(), expected_output(&entry));
    }

    #[rstest]
    #[case::first("1\n", "foo")]
    #[case::second(" 2 \n", "bar")]
    #[case::free_text("write docs\n", "write docs")]
    #[case::out_of_range("3\n", "3")]
    #[case::zero("0\n", "0")]
    #[case::no_newline("bar", "bar")]
    fn test_select(#[case] input: &str, #[case] expected: &str) {
        let suggestions = vec!["foo".to_string(), "bar".to_string()];
        let mut reader = Cursor::new(input.as_bytes());
        let mut writer = Vec::new();
        let mut prompt = ConsoleDescriptionPrompt::new(&mut reader, &mut writer);

        let selected = prompt.select(&suggestions).unwrap();

        assert_eq!(selected, expected);
        assert_eq!(
            String::from_utf8(writer).unwrap(),
            "Select a description by number or type a new one:\n  1) foo\n  2) bar\n> "
        );
    }

    /// 候補がない場合は番号ではなく入力した文字列を説明文とする。
    #[test]
    fn test_select_without_suggestions() {
        let mut reader = Cursor::new("1\n".as_bytes());
        let mut writer = Vec::new();
        let mut prompt = ConsoleDescriptionPrompt::new(&mut reader, &mut writer);

        let selected = prompt.select(&[]).unwrap();

        assert_eq!(selected, "1");
        assert_eq!(String::from_utf8(writer).unwrap(), "Description: ");
    }

    #[rstest]
    #[case::blank("  \n")]
    #[case::eof("")]
    fn test_select_empty(#[case] input: &str) {
        let suggestions = vec!["foo".to_string()];
        let mut reader = Cursor::new(input.as_bytes());
        let mut writer = Vec::new();
        let mut prompt = ConsoleDescriptionPrompt::new(&mut reader, &mut writer);

        assert!(prompt.select(&suggestions).is_err());
    }
}
