use super::spans::{Span, space_runs, string_literal_spans};
use super::{ConvertOptions, Mode};

/// Collapse runs of `options.tab_width` spaces into tabs.
///
/// In [`Mode::All`] every run is replaced. In [`Mode::LiteralAware`] runs
/// lying fully inside a double-quoted string literal are kept as spaces.
pub fn convert(text: &str, options: &ConvertOptions) -> String {
    if options.tab_width == 0 {
        return text.to_string();
    }

    match options.mode {
        Mode::All => text.replace(&" ".repeat(options.tab_width), "\t"),
        Mode::LiteralAware => {
            let runs = qualifying_runs(text, options.tab_width);
            splice_tabs(text, &runs)
        }
    }
}

/// Space runs not fully contained in any string literal.
///
/// A run that only partly overlaps a literal still qualifies.
pub fn qualifying_runs(text: &str, tab_width: usize) -> Vec<Span> {
    let literals = string_literal_spans(text);

    space_runs(text, tab_width)
        .into_iter()
        .filter(|run| !literals.iter().any(|literal| literal.contains(run)))
        .collect()
}

fn splice_tabs(text: &str, runs: &[Span]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    for run in runs {
        out.push_str(&text[cursor..run.start]);
        out.push('\t');
        cursor = run.end;
    }
    out.push_str(&text[cursor..]);

    out
}
