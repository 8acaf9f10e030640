use chrono::{DateTime, Local, NaiveDate, Utc};

#[cfg(not(test))]
/// 現在のUTC時間を取得する。
pub fn now() -> DateTime<Utc> {
    Utc::now()
}


#[cfg(test)]
pub use mock_datetime::now;

/// Localタイムゾーンでの今日の日付を取得する。
///
/// 時刻の入力はすべてこの日付に固定して解釈する。
pub fn today() -> NaiveDate {
    now().with_timezone(&Local).date_naive()
}
