//! Notices and the results table printed around a download.

use chrono::NaiveDateTime;
use kzn_core::{DownloadResult, DownloadStatus};
use std::fmt::Write as _;

use super::gid::Gid;

const TIMESTAMP_FORMAT: &str = "%m/%d %H:%M:%S";

fn notice(at: NaiveDateTime, message: &str) -> String {
    format!("{} [NOTICE] {}", at.format(TIMESTAMP_FORMAT), message)
}

pub fn start_notice(at: NaiveDateTime, count: usize) -> String {
    notice(at, &format!("Downloading {count} item(s)"))
}

pub fn complete_notice(at: NaiveDateTime, path: &str) -> String {
    notice(at, &format!("Download complete: {path}"))
}

/// Renders the results table and status legend, newline-terminated.
pub fn results_table(gid: &Gid, result: &DownloadResult) -> String {
    let mut out = String::new();
    out.push_str("Download Results:\n");
    out.push_str("gid   |stat|avg speed  |path/URI\n");
    out.push_str("======+====+===========+=======================================================\n");
    let _ = writeln!(
        out,
        "{}|{:<4}|{:>9}|{}",
        gid, result.status, result.speed, result.path
    );
    out.push('\n');
    out.push_str("Status Legend:\n");
    out.push_str("(OK):download completed.\n");
    if result.status == DownloadStatus::Err {
        out.push_str("(ERR):error occurred.\n");
    }
    out
}
