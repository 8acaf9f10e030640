use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::datetime;
use crate::error::EntryError;

static CLOCK_TIME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}):(\d{2})(AM|PM)$").expect("valid clock time pattern"));

/// 午前、午後を表す列挙型。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

/// `hh:mmAM`, `hh:mmPM`形式で入力された時刻。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockTime {
    pub meridiem: Meridiem,
    pub time: NaiveTime,
}

impl FromStr for ClockTime {
    type Err = EntryError;

    /// 時刻をパースする。
    ///
    /// 時は1から12、分は0から59のみ受け付ける。`12:xxAM`は0時台、`12:xxPM`は12時台となる。
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EntryError::InvalidTimeFormat(s.to_string());

        let captures = CLOCK_TIME_PATTERN.captures(s.trim()).ok_or_else(invalid)?;
        let hour: u32 = captures[1].parse().map_err(|_| invalid())?;
        let minute: u32 = captures[2].parse().map_err(|_| invalid())?;
        let meridiem = match &captures[3] {
            "AM" => Meridiem::Am,
            _ => Meridiem::Pm,
        };
        if !(1..=12).contains(&hour) {
            return Err(invalid());
        }

        let hour24 = match meridiem {
            Meridiem::Am => hour % 12,
            Meridiem::Pm => hour % 12 + 12,
        };
        let time = NaiveTime::from_hms_opt(hour24, minute, 0).ok_or_else(invalid)?;

        Ok(Self { meridiem, time })
    }
}

/// 開始時刻と終了時刻、その間の秒数。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    /// 終了時刻が開始時刻より前の場合は負の値となる。
    pub duration_seconds: i64,
}

impl TimeWindow {
    /// 開始、終了時刻から新しい`TimeWindow`を返す。
    pub fn new(start: DateTime<Local>, end: DateTime<Local>) -> Self {
        Self {
            start,
            end,
            duration_seconds: (end - start).num_seconds(),
        }
    }

    /// 時間単位の長さを返す。
    pub fn hours(&self) -> f64 {
        self.duration_seconds as f64 / 3600.0
    }
}

/// 入力された開始時刻と終了時刻を、Localタイムゾーンの今日の時刻として解釈する。
///
/// 日付をまたぐ補正は行わない。
///
/// # Arguments
///
/// * `start_raw` - 開始時刻 (例: `08:00AM`)
/// * `end_raw` - 終了時刻 (例: `04:30PM`)
pub fn resolve(start_raw: &str, end_raw: &str) -> Result<TimeWindow, EntryError> {
    let today = datetime::today();
    let start = anchor(&Local, today, start_raw)?;
    let end = anchor(&Local, today, end_raw)?;
    let window = TimeWindow::new(start, end);
    debug!(
        "Resolved time window: {} ~ {} ({}s)",
        window.start, window.end, window.duration_seconds
    );

    Ok(window)
}

/// 時刻を指定された日付に固定する。
///
/// 夏時間の終了で同じ時刻が2回ある場合は早い方を利用する。
/// 夏時間の開始で存在しない時刻はエラーとする。
fn anchor<Tz: TimeZone>(
    tz: &Tz,
    date: NaiveDate,
    raw: &str,
) -> Result<DateTime<Tz>, EntryError> {
    let clock: ClockTime = raw.parse()?;
    debug!("Parsed {:?} as {} {:?}", raw, clock.time, clock.meridiem);
    tz.from_local_datetime(&date.and_time(clock.time))
        .earliest()
        .ok_or_else(|| EntryError::InvalidTimeFormat(raw.to_string()))
}
