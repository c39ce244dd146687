//! Drawing search matches over the article text.
//!
//! The core never renders anything itself. It hands ranges to a
//! [`SearchRenderer`]: every match first, then the focused match, which also
//! moves the caret to its start. [`AnsiHighlighter`] is the renderer used by
//! the command-line front end.
//!
//! TTY detection controls the decoration: ANSI background colors for
//! interactive terminals, ASCII markers (`[..]` for matches, `{..}` for the
//! focused match) for piped output.

use crate::cli::Theme;
use crate::navigation::MatchNavigator;
use crate::search::MatchRange;

// ---------------------------------------------------------------------------
// Renderer contract
// ---------------------------------------------------------------------------

/// Receives search results to decorate.
pub trait SearchRenderer {
    /// Remove all match and focus decorations.
    fn clear(&mut self);
    /// Decorate every match.
    fn draw_matches(&mut self, ranges: &[MatchRange]);
    /// Decorate the focused match distinctly and move the caret to its start.
    fn draw_focus(&mut self, range: MatchRange);
}

/// Push the navigator's current state into `renderer`.
pub fn render_search<R: SearchRenderer + ?Sized>(navigator: &MatchNavigator, renderer: &mut R) {
    renderer.clear();
    renderer.draw_matches(navigator.all());
    if let Some(range) = navigator.current() {
        renderer.draw_focus(range);
    }
}

// ---------------------------------------------------------------------------
// Decoration style
// ---------------------------------------------------------------------------

/// Open/close sequences wrapped around decorated runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightStyle {
    match_open: &'static str,
    match_close: &'static str,
    focus_open: &'static str,
    focus_close: &'static str,
}

impl HighlightStyle {
    /// ANSI background colors for an interactive terminal.
    pub fn for_tty(theme: &Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                match_open: "\x1b[30;43m", // black on yellow
                match_close: "\x1b[0m",
                focus_open: "\x1b[30;46m", // black on cyan
                focus_close: "\x1b[0m",
            },
            Theme::Light => Self {
                match_open: "\x1b[30;103m", // black on bright yellow
                match_close: "\x1b[0m",
                focus_open: "\x1b[97;44m", // white on blue
                focus_close: "\x1b[0m",
            },
        }
    }

    /// Plain ASCII markers for piped output.
    pub fn for_pipe() -> Self {
        Self {
            match_open: "[",
            match_close: "]",
            focus_open: "{",
            focus_close: "}",
        }
    }

    fn open(&self, decoration: Decoration) -> &'static str {
        match decoration {
            Decoration::Plain => "",
            Decoration::Match => self.match_open,
            Decoration::Focus => self.focus_open,
        }
    }

    fn close(&self, decoration: Decoration) -> &'static str {
        match decoration {
            Decoration::Plain => "",
            Decoration::Match => self.match_close,
            Decoration::Focus => self.focus_close,
        }
    }
}

// ---------------------------------------------------------------------------
// AnsiHighlighter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decoration {
    Plain,
    Match,
    Focus,
}

/// Renders the text with decorated match runs into a `String`.
///
/// Decorations are tracked per character, so overlapping matches merge into
/// one run and the focused match always wins over a plain match. Adjacent
/// matches that do not overlap each get their own run.
#[derive(Debug, Clone)]
pub struct AnsiHighlighter {
    chars: Vec<char>,
    decorations: Vec<Decoration>,
    /// A drawn range starts at this character.
    starts: Vec<bool>,
    /// Some drawn range covers both this character and the one before it.
    bridged: Vec<bool>,
    caret: Option<usize>,
    style: HighlightStyle,
}

impl AnsiHighlighter {
    pub fn new(text: &str, style: HighlightStyle) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();
        Self {
            chars,
            decorations: vec![Decoration::Plain; len],
            starts: vec![false; len],
            bridged: vec![false; len],
            caret: None,
            style,
        }
    }

    /// Character offset of the caret, set by the last focused match.
    pub fn caret(&self) -> Option<usize> {
        self.caret
    }

    fn paint(&mut self, range: MatchRange, decoration: Decoration) {
        let end = range.end.min(self.decorations.len());
        let start = range.start.min(end);
        if start == end {
            return;
        }
        for slot in &mut self.decorations[start..end] {
            if *slot != Decoration::Focus {
                *slot = decoration;
            }
        }
        self.starts[start] = true;
        self.bridged[start + 1..end].fill(true);
    }

    /// Whether a new decorated run must open at character `idx`.
    fn breaks_run(&self, idx: usize) -> bool {
        self.starts[idx] && !self.bridged[idx]
    }

    /// Produce the decorated text.
    pub fn finish(&self) -> String {
        let mut out = String::with_capacity(self.chars.len() * 2);
        let mut current = Decoration::Plain;
        for (idx, (ch, &decoration)) in self.chars.iter().zip(&self.decorations).enumerate() {
            let new_run = decoration != Decoration::Plain && self.breaks_run(idx);
            if decoration != current || new_run {
                out.push_str(self.style.close(current));
                out.push_str(self.style.open(decoration));
                current = decoration;
            }
            out.push(*ch);
        }
        out.push_str(self.style.close(current));
        out
    }
}

impl SearchRenderer for AnsiHighlighter {
    fn clear(&mut self) {
        self.decorations.fill(Decoration::Plain);
        self.starts.fill(false);
        self.bridged.fill(false);
        self.caret = None;
    }

    fn draw_matches(&mut self, ranges: &[MatchRange]) {
        for range in ranges {
            self.paint(*range, Decoration::Match);
        }
    }

    fn draw_focus(&mut self, range: MatchRange) {
        self.paint(range, Decoration::Focus);
        self.caret = Some(range.start.min(self.chars.len()));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchQuery;

    fn navigator_for(text: &str, query: &str) -> MatchNavigator {
        let mut nav = MatchNavigator::new();
        nav.set_matches(SearchQuery::new(query).find_in(Some(text)));
        nav
    }

    fn render(text: &str, nav: &MatchNavigator) -> AnsiHighlighter {
        let mut hl = AnsiHighlighter::new(text, HighlightStyle::for_pipe());
        render_search(nav, &mut hl);
        hl
    }

    #[test]
    fn test_render_marks_all_and_focus() {
        let nav = navigator_for("Hello World", "o");
        let hl = render("Hello World", &nav);
        assert_eq!(hl.finish(), "Hell{o} W[o]rld");
        assert_eq!(hl.caret(), Some(4));
    }

    #[test]
    fn test_render_follows_navigation() {
        let mut nav = navigator_for("Hello World", "o");
        nav.move_next();
        let hl = render("Hello World", &nav);
        assert_eq!(hl.finish(), "Hell[o] W{o}rld");
        assert_eq!(hl.caret(), Some(7));
    }

    #[test]
    fn test_render_overlapping_matches_merge() {
        let nav = navigator_for("aaa", "aa");
        let hl = render("aaa", &nav);
        assert_eq!(hl.finish(), "{aa}[a]");
    }

    #[test]
    fn test_render_adjacent_matches_stay_separate() {
        let nav = navigator_for("aaa", "a");
        assert_eq!(nav.len(), 3);
        let hl = render("aaa", &nav);
        assert_eq!(hl.finish(), "{a}[a][a]");
    }

    #[test]
    fn test_render_adjacent_matches_focus_in_middle() {
        let mut nav = navigator_for("abab", "ab");
        nav.move_next();
        let hl = render("abab", &nav);
        assert_eq!(hl.finish(), "[ab]{ab}");

        let nav = navigator_for("xaaay", "a");
        let hl = render("xaaay", &nav);
        assert_eq!(hl.finish(), "x{a}[a][a]y");
    }

    #[test]
    fn test_render_adjacent_matches_tty_reopens_color() {
        let nav = navigator_for("aa", "a");
        let mut hl = AnsiHighlighter::new("aa", HighlightStyle::for_tty(&Theme::Dark));
        render_search(&nav, &mut hl);
        assert_eq!(
            hl.finish(),
            "\x1b[30;46ma\x1b[0m\x1b[30;43ma\x1b[0m"
        );
    }

    #[test]
    fn test_render_no_matches_leaves_text_untouched() {
        let nav = navigator_for("Hello World", "xyz");
        let hl = render("Hello World", &nav);
        assert_eq!(hl.finish(), "Hello World");
        assert!(hl.caret().is_none());
    }

    #[test]
    fn test_render_multibyte_text() {
        let nav = navigator_for("日本語test日本語", "本");
        let hl = render("日本語test日本語", &nav);
        assert_eq!(hl.finish(), "日{本}語test日[本]語");
        assert_eq!(hl.caret(), Some(1));
    }

    #[test]
    fn test_render_match_at_end_of_text() {
        let nav = navigator_for("say hi", "hi");
        let hl = render("say hi", &nav);
        assert_eq!(hl.finish(), "say {hi}");
    }

    #[test]
    fn test_clear_drops_previous_decorations() {
        let nav = navigator_for("Hello World", "o");
        let mut hl = render("Hello World", &nav);
        hl.clear();
        assert_eq!(hl.finish(), "Hello World");
        assert!(hl.caret().is_none());
    }

    #[test]
    fn test_out_of_bounds_range_is_clamped() {
        let mut hl = AnsiHighlighter::new("abc", HighlightStyle::for_pipe());
        hl.draw_matches(&[MatchRange::new(2, 10)]);
        hl.draw_focus(MatchRange::new(5, 9));
        assert_eq!(hl.finish(), "ab[c]");
        assert_eq!(hl.caret(), Some(3));
    }

    #[test]
    fn test_tty_style_wraps_runs_in_ansi() {
        let nav = navigator_for("ab", "b");
        let mut hl = AnsiHighlighter::new("ab", HighlightStyle::for_tty(&Theme::Dark));
        render_search(&nav, &mut hl);
        assert_eq!(hl.finish(), "a\x1b[30;46mb\x1b[0m");
    }

    #[test]
    fn test_tty_styles_differ_by_theme() {
        assert_ne!(
            HighlightStyle::for_tty(&Theme::Dark),
            HighlightStyle::for_tty(&Theme::Light)
        );
    }
}
