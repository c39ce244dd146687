//! End-to-end tests for the find/highlight pipeline.
//!
//! These exercise the handoff between modules that unit tests cannot
//! cover: reading an article file, running the search session, rendering,
//! and saving/resuming search state through the preference store.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use artfind::app::{run_find, run_highlight};
use artfind::cli::{FindArgs, HighlightArgs};
use artfind::config::{AppConfig, PrefsConfig};
use artfind::highlight::HighlightStyle;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const ARTICLE: &str = "Rust is fast. Rust is safe. Trust the borrow checker.";

fn write_article(dir: &Path) -> PathBuf {
    let path = dir.join("article.txt");
    std::fs::write(&path, ARTICLE).unwrap();
    path
}

fn config_with_prefs(dir: &Path) -> AppConfig {
    AppConfig {
        prefs: PrefsConfig {
            path: Some(dir.join("state").join("prefs.json")),
        },
        ..AppConfig::default()
    }
}

fn highlight_args(file: &Path, query: Option<&str>) -> HighlightArgs {
    HighlightArgs {
        query: query.map(str::to_string),
        file: Some(file.to_path_buf()),
        position: 0,
        resume: false,
        save: false,
    }
}

async fn highlight(args: &HighlightArgs, config: &AppConfig) -> String {
    let mut out = Vec::new();
    run_highlight(args, config, HighlightStyle::for_pipe(), &mut out)
        .await
        .unwrap();
    String::from_utf8(out).unwrap()
}

// ---------------------------------------------------------------------------
// find
// ---------------------------------------------------------------------------

#[test]
fn test_find_prints_char_offsets_from_file() {
    let tmp = TempDir::new().unwrap();
    let file = write_article(tmp.path());
    let args = FindArgs {
        query: "rust".to_string(),
        file: Some(file),
    };

    let mut out = Vec::new();
    run_find(&args, &AppConfig::default(), &mut out).unwrap();
    // "Trust" contains "rust" too.
    assert_eq!(String::from_utf8(out).unwrap(), "0\n14\n29\n");
}

#[test]
fn test_find_case_sensitive_config() {
    let tmp = TempDir::new().unwrap();
    let file = write_article(tmp.path());
    let mut config = AppConfig::default();
    config.search.ignore_case = false;
    let args = FindArgs {
        query: "rust".to_string(),
        file: Some(file),
    };

    let mut out = Vec::new();
    run_find(&args, &config, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "29\n");
}

#[test]
fn test_find_missing_file_is_error() {
    let args = FindArgs {
        query: "rust".to_string(),
        file: Some(PathBuf::from("/nonexistent/artfind/article.txt")),
    };
    let mut out = Vec::new();
    assert!(run_find(&args, &AppConfig::default(), &mut out).is_err());
}

// ---------------------------------------------------------------------------
// highlight
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_highlight_focus_moves_with_position() {
    let tmp = TempDir::new().unwrap();
    let file = write_article(tmp.path());
    let config = AppConfig::default();

    let output = highlight(&highlight_args(&file, Some("is")), &config).await;
    assert_eq!(
        output,
        "Rust {is} fast. Rust [is] safe. Trust the borrow checker.\n[1/2]\n"
    );

    let args = HighlightArgs {
        position: -1,
        ..highlight_args(&file, Some("is"))
    };
    let output = highlight(&args, &config).await;
    assert_eq!(
        output,
        "Rust [is] fast. Rust {is} safe. Trust the borrow checker.\n[2/2]\n"
    );
}

#[tokio::test]
async fn test_highlight_without_query_or_resume_is_error() {
    let tmp = TempDir::new().unwrap();
    let file = write_article(tmp.path());
    let mut out = Vec::new();
    let result = run_highlight(
        &highlight_args(&file, None),
        &AppConfig::default(),
        HighlightStyle::for_pipe(),
        &mut out,
    )
    .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_highlight_save_then_resume() {
    let tmp = TempDir::new().unwrap();
    let file = write_article(tmp.path());
    let config = config_with_prefs(tmp.path());

    // Save a search focused on the third "rust".
    let save = HighlightArgs {
        position: 2,
        save: true,
        ..highlight_args(&file, Some("rust"))
    };
    let output = highlight(&save, &config).await;
    assert!(output.ends_with("[3/3]\n"), "got {output:?}");
    assert!(tmp.path().join("state").join("prefs.json").exists());

    // Resume without a query: same query, same focus.
    let resume = HighlightArgs {
        resume: true,
        ..highlight_args(&file, None)
    };
    let output = highlight(&resume, &config).await;
    assert_eq!(
        output,
        "[Rust] is fast. [Rust] is safe. T{rust} the borrow checker.\n[3/3]\n"
    );

    // Resume and step forward, wrapping to the first match.
    let step = HighlightArgs {
        resume: true,
        position: 1,
        ..highlight_args(&file, None)
    };
    let output = highlight(&step, &config).await;
    assert!(output.starts_with("{Rust} is fast."), "got {output:?}");
    assert!(output.ends_with("[1/3]\n"));
}

#[tokio::test]
async fn test_highlight_resume_with_nothing_saved_needs_query() {
    let tmp = TempDir::new().unwrap();
    let file = write_article(tmp.path());
    let config = config_with_prefs(tmp.path());

    let resume = HighlightArgs {
        resume: true,
        ..highlight_args(&file, None)
    };
    let mut out = Vec::new();
    let result = run_highlight(&resume, &config, HighlightStyle::for_pipe(), &mut out).await;
    assert!(result.is_err());

    // An explicit query still works when nothing was saved.
    let resume_with_query = HighlightArgs {
        resume: true,
        ..highlight_args(&file, Some("safe"))
    };
    let output = highlight(&resume_with_query, &config).await;
    assert!(output.contains("{safe}"));
}

#[tokio::test]
async fn test_highlight_new_query_overrides_resumed_one() {
    let tmp = TempDir::new().unwrap();
    let file = write_article(tmp.path());
    let config = config_with_prefs(tmp.path());

    let save = HighlightArgs {
        save: true,
        ..highlight_args(&file, Some("rust"))
    };
    highlight(&save, &config).await;

    let resume = HighlightArgs {
        resume: true,
        ..highlight_args(&file, Some("borrow"))
    };
    let output = highlight(&resume, &config).await;
    assert_eq!(
        output,
        "Rust is fast. Rust is safe. Trust the {borrow} checker.\n[1/1]\n"
    );
}
