pub mod logger;
pub mod types;
pub mod reference;
pub mod identifiers;
pub mod encoding;
pub mod xml_node;
pub mod dir_list;
pub mod lexicon_parse;
pub mod cross_refs;
pub mod taxonomy;
pub mod validate;
pub mod xml_export;
pub mod xml_import;
pub mod pipeline;

pub mod db;

#[cfg(test)]
pub(crate) mod test_fixtures;

use std::env;
use std::fs::create_dir_all;
use std::path::PathBuf;
use std::error::Error;
use app_dirs::{get_app_root, AppDataType, AppInfo};
use indicatif::{ProgressBar, ProgressStyle};

pub const APP_INFO: AppInfo = AppInfo{name: "semdict", author: "semdict"};

/// Prefix of the composite sense identifiers built during extraction.
pub static SENSE_ID_PREFIX: &str = "sense-";

/// Corpus name used for occurrence groups when none is configured.
pub static DEFAULT_CORPUS_NAME: &str = "MARBLE";

pub fn get_create_semdict_app_root() -> Result<PathBuf, Box<dyn Error>> {
    let p = get_app_root(AppDataType::UserData, &APP_INFO)?;
    if !p.exists() {
        create_dir_all(&p)?;
    }
    Ok(p)
}

/// Directory for log files.
///
/// Precedence:
/// - SEMDICT_LOG_DIR env var
/// - the user data app root
pub fn get_create_semdict_log_dir() -> Result<PathBuf, Box<dyn Error>> {
    let p = match env::var("SEMDICT_LOG_DIR") {
        Ok(s) if !s.is_empty() => PathBuf::from(s),
        _ => get_create_semdict_app_root()?.join("logs"),
    };
    if !p.exists() {
        create_dir_all(&p)?;
    }
    Ok(p)
}

/// Progress bar for long-running stages, hidden unless `visible`.
pub fn progress_bar(len: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-");
    pb.set_style(style);
    pb
}
