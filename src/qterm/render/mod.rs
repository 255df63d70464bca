//! # Text Renderer
//!
//! Turns raw handler output into display markup in two passes over one
//! left-to-right scan:
//!
//! 1. `$$…$$` regions are cut out as math and handed to [`math::to_unicode`].
//! 2. Everything between math regions is scanned for identifier links: DOIs
//!    (`10.<4-9 digits>/<suffix>`) and the explicit `[text](url)` links the
//!    paper formatter emits.
//!
//! Math regions are never scanned for links, so a DOI quoted inside a formula
//! stays part of the formula. The [`segments`] of a source tile it exactly:
//! concatenating their spans gives back the original string.

pub mod markup;
pub mod math;

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

pub use markup::{HtmlMarkup, Markup, TerminalMarkup};

pub const DOI_RESOLVER: &str = "https://doi.org/";

static MATH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\$(.*?)\$\$").expect("math pattern is valid"));

static LINK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?P<doi>10\.[0-9]{4,9}/[-._;()/:A-Z0-9]+)|\[(?P<text>[^\]\n]+)\]\((?P<url>https?://[^\s)]+)\)",
    )
    .expect("link pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind<'a> {
    Plain(&'a str),
    /// The expression between the delimiters
    Math(&'a str),
    Link { text: &'a str, target: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSegment<'a> {
    /// Byte range of `raw` this segment was produced from
    pub span: Range<usize>,
    pub kind: SegmentKind<'a>,
}

/// Splits `raw` into plain, math and link segments in source order.
pub fn segments(raw: &str) -> Vec<RenderSegment<'_>> {
    let mut out = Vec::new();
    let mut last = 0;

    for caps in MATH_PATTERN.captures_iter(raw) {
        let Some(whole) = caps.get(0) else { continue };
        scan_links(raw, last..whole.start(), &mut out);
        let expr = caps.get(1).map_or("", |m| m.as_str());
        out.push(RenderSegment {
            span: whole.range(),
            kind: SegmentKind::Math(expr),
        });
        last = whole.end();
    }
    scan_links(raw, last..raw.len(), &mut out);

    out
}

fn scan_links<'a>(raw: &'a str, region: Range<usize>, out: &mut Vec<RenderSegment<'a>>) {
    let base = region.start;
    let text = &raw[region];
    let mut cursor = 0;

    for caps in LINK_PATTERN.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };

        let (end, kind) = if let Some(doi) = caps.name("doi") {
            let trimmed = trim_doi(doi.as_str());
            if trimmed.is_empty() {
                continue;
            }
            let kind = SegmentKind::Link {
                text: trimmed,
                target: format!("{}{}", DOI_RESOLVER, trimmed),
            };
            (doi.start() + trimmed.len(), kind)
        } else {
            let (Some(label), Some(url)) = (caps.name("text"), caps.name("url")) else {
                continue;
            };
            let kind = SegmentKind::Link {
                text: label.as_str(),
                target: url.as_str().to_string(),
            };
            (whole.end(), kind)
        };

        push_plain(text, cursor..whole.start(), base, out);
        out.push(RenderSegment {
            span: base + whole.start()..base + end,
            kind,
        });
        cursor = end;
    }

    push_plain(text, cursor..text.len(), base, out);
}

fn push_plain<'a>(
    text: &'a str,
    range: Range<usize>,
    base: usize,
    out: &mut Vec<RenderSegment<'a>>,
) {
    if range.is_empty() {
        return;
    }
    out.push(RenderSegment {
        span: base + range.start..base + range.end,
        kind: SegmentKind::Plain(&text[range]),
    });
}

/// Drops sentence punctuation the DOI grammar would otherwise swallow.
/// Returns an empty string when nothing of the suffix survives.
fn trim_doi(doi: &str) -> &str {
    let trimmed = doi.trim_end_matches(['.', ',', ';', ':']);
    match trimmed.find('/') {
        Some(slash) if slash + 1 < trimmed.len() => trimmed,
        _ => "",
    }
}

/// Renders `raw` through `markup`.
pub fn render(raw: &str, markup: &dyn Markup) -> String {
    let mut out = String::with_capacity(raw.len());

    for segment in segments(raw) {
        match segment.kind {
            SegmentKind::Plain(text) => markup.plain(&mut out, text),
            SegmentKind::Math(expr) => match math::to_unicode(expr) {
                Ok(rendered) => markup.math(&mut out, expr, &rendered),
                Err(err) => {
                    tracing::debug!(expr, error = %err, "math rendering failed");
                    markup.math_error(&mut out, expr);
                }
            },
            SegmentKind::Link { text, target } => markup.link(&mut out, &target, text),
        }
    }

    out
}
