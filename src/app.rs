//! Command implementations behind the `find` and `highlight` subcommands.
//!
//! Both read the article text from `--file` or stdin. Output goes to the
//! writer passed in so the commands can be driven from tests.

use std::error::Error;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::cli::{FindArgs, HighlightArgs};
use crate::config::AppConfig;
use crate::highlight::{render_search, AnsiHighlighter, HighlightStyle};
use crate::navigation::{SavedSearch, SearchSession};
use crate::prefs::{JsonFileStore, Pref};
use crate::search::find_matches;

pub type AppResult<T> = Result<T, Box<dyn Error>>;

/// Read the article text from `file`, or from stdin when `None`.
pub fn read_text(file: Option<&Path>) -> io::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Preference key under which the search for `file` is saved.
///
/// Files are keyed by canonical path. Stdin has no path, so piped text is
/// keyed by a digest of its contents.
pub fn saved_search_key(file: Option<&Path>, text: &str) -> String {
    match file {
        Some(path) => {
            let path = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
            format!("search:{}", path.display())
        }
        None => {
            let digest = blake3::hash(text.as_bytes()).to_hex();
            format!("search:stdin:{}", &digest.as_str()[..16])
        }
    }
}

// ---------------------------------------------------------------------------
// find
// ---------------------------------------------------------------------------

/// Print the character offset of every match in `text`, one per line.
pub fn write_offsets<W: Write>(
    out: &mut W,
    text: &str,
    query: &str,
    ignore_case: bool,
) -> io::Result<usize> {
    let offsets = find_matches(Some(text), query, ignore_case);
    for offset in &offsets {
        writeln!(out, "{}", offset)?;
    }
    Ok(offsets.len())
}

pub fn run_find<W: Write>(args: &FindArgs, config: &AppConfig, out: &mut W) -> AppResult<()> {
    let text = read_text(args.file.as_deref())?;
    let count = write_offsets(out, &text, &args.query, config.search.ignore_case)?;
    tracing::debug!(query = %args.query, count, "find complete");
    Ok(())
}

// ---------------------------------------------------------------------------
// highlight
// ---------------------------------------------------------------------------

/// Move the focus `steps` matches forward, or backward when negative.
pub fn step_focus(session: &mut SearchSession, steps: i64) {
    session.move_by(steps);
}

/// Render the session over `text` followed by the match counter line.
pub fn write_highlighted<W: Write>(
    out: &mut W,
    text: &str,
    session: &SearchSession,
    style: HighlightStyle,
) -> io::Result<()> {
    let mut highlighter = AnsiHighlighter::new(text, style);
    render_search(session.navigator(), &mut highlighter);
    out.write_all(highlighter.finish().as_bytes())?;
    if !text.ends_with('\n') {
        writeln!(out)?;
    }
    if let Some(counter) = session.match_counter_display() {
        writeln!(out, "{}", counter)?;
    }
    Ok(())
}

pub async fn run_highlight<W: Write>(
    args: &HighlightArgs,
    config: &AppConfig,
    style: HighlightStyle,
    out: &mut W,
) -> AppResult<()> {
    let text = read_text(args.file.as_deref())?;
    let mut session = SearchSession::new(config.search.ignore_case);

    let store = if args.resume || args.save {
        let path = config
            .prefs
            .path
            .clone()
            .ok_or("no preferences path: set [prefs] path in the config file")?;
        Some(JsonFileStore::open(path)?)
    } else {
        None
    };
    let mut saved: Pref<SavedSearch> = Pref::new(saved_search_key(args.file.as_deref(), &text));

    if let (true, Some(store)) = (args.resume, store.as_ref()) {
        match saved.get(store)? {
            Some(prev) => {
                tracing::debug!(query = %prev.query, position = prev.position, "resuming search");
                session.restore(&prev, Some(&text));
            }
            None => tracing::debug!(key = saved.key(), "no saved search"),
        }
    }

    if let Some(query) = &args.query {
        session.enter();
        session.search(Some(&text), query);
    }

    if !session.is_active() {
        return Err("no query given and no saved search to resume".into());
    }

    step_focus(&mut session, args.position);
    write_highlighted(out, &text, &session, style)?;

    if let (true, Some(store)) = (args.save, store.as_ref()) {
        saved.set(store, Some(session.snapshot()))?;
        store.flush().await?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
