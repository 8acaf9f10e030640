use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use log::{warn, LevelFilter};

/// ログファイルを置くディレクトリ名。
const LOG_DIR_NAME: &str = "toggl-entry";

/// ロガーを初期化する。
///
/// 標準エラー出力には警告以上(`verbose`の場合はデバッグ以上)を色付きで出力する。
/// キャッシュディレクトリが取得できる場合は、情報以上をファイルにも出力する。
/// ログファイルが開けない場合は警告を出し、標準エラー出力のみで続行する。
///
/// # Arguments
///
/// * `verbose` - 詳細なログを標準エラー出力に表示するかどうか
pub fn init(verbose: bool) -> Result<()> {
    let path = log_file_path();
    let (dispatch, file_error) = build_dispatch(verbose, path.as_deref());

    dispatch.apply().context("Failed to set logger")?;
    if let Some(error) = file_error {
        warn!("Log file is disabled: {:#}", error);
    }

    Ok(())
}

/// ロガーを組み立てる。
///
/// ログファイルが開けなかった場合は、ファイルへの出力を含まないロガーとそのエラーを返す。
fn build_dispatch(
    verbose: bool,
    log_path: Option<&Path>,
) -> (fern::Dispatch, Option<anyhow::Error>) {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue);
    let stderr_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let stderr = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .level(stderr_level)
        .chain(std::io::stderr());

    let dispatch = fern::Dispatch::new()
        .level(LevelFilter::Debug)
        .level_for("hyper", LevelFilter::Warn)
        .level_for("reqwest", LevelFilter::Warn)
        .chain(stderr);

    match log_path.map(file_dispatch) {
        Some(Ok(file)) => (dispatch.chain(file), None),
        Some(Err(error)) => (dispatch, Some(error)),
        None => (dispatch, None),
    }
}

/// ファイルへ出力するロガーを作成する。
fn file_dispatch(path: &Path) -> Result<fern::Dispatch> {
    let file = fern::log_file(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    Ok(fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{} {}] {}",
                Local::now().format("%Y-%m-%dT%H:%M:%S%:z"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(LevelFilter::Info)
        .chain(file))
}

/// ログファイルのパスを返す。ディレクトリがない場合は作成する。
fn log_file_path() -> Option<PathBuf> {
    let dir = dirs::cache_dir()?.join(LOG_DIR_NAME);
    fs::create_dir_all(&dir).ok()?;
    Some(dir.join(format!("{}.log", LOG_DIR_NAME)))
}
