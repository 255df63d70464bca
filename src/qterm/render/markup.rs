use console::Style;
use std::borrow::Cow;

/// Output back-end for the renderer.
///
/// The renderer decides *what* each region of the source is; a `Markup`
/// decides how it looks on a particular surface.
pub trait Markup {
    fn plain(&self, out: &mut String, text: &str);

    /// `source` is the raw LaTeX, `rendered` its Unicode conversion.
    fn math(&self, out: &mut String, source: &str, rendered: &str);

    /// Fallback when the math step fails on `source`.
    fn math_error(&self, out: &mut String, source: &str);

    fn link(&self, out: &mut String, target: &str, text: &str);
}

/// ANSI terminal output. Links become OSC 8 hyperlinks.
#[derive(Debug, Clone)]
pub struct TerminalMarkup {
    color: bool,
    plain_style: Option<Style>,
    math_style: Style,
    link_style: Style,
    error_style: Style,
}

impl TerminalMarkup {
    pub fn new(color: bool) -> Self {
        Self {
            color,
            plain_style: None,
            math_style: Style::new().cyan().italic().force_styling(true),
            link_style: Style::new().color256(39).underlined().force_styling(true),
            error_style: Style::new().red().force_styling(true),
        }
    }

    /// Paints the text between math and links with `style`.
    pub fn with_plain_style(mut self, style: Style) -> Self {
        self.plain_style = Some(style);
        self
    }
}

impl Markup for TerminalMarkup {
    fn plain(&self, out: &mut String, text: &str) {
        let text = strip_controls(text);
        let text = text.as_ref();
        match &self.plain_style {
            Some(style) if self.color => out.push_str(&style.apply_to(text).to_string()),
            _ => out.push_str(text),
        }
    }

    fn math(&self, out: &mut String, _source: &str, rendered: &str) {
        let rendered = strip_controls(rendered);
        let rendered = rendered.as_ref();
        if self.color {
            out.push_str(&self.math_style.apply_to(rendered).to_string());
        } else {
            out.push_str(rendered);
        }
    }

    fn math_error(&self, out: &mut String, source: &str) {
        let text = format!("LaTeX Error: {}", strip_controls(source));
        if self.color {
            out.push_str(&self.error_style.apply_to(text).to_string());
        } else {
            out.push_str(&text);
        }
    }

    fn link(&self, out: &mut String, target: &str, text: &str) {
        let target = strip_controls(target);
        let text = strip_controls(text);
        if self.color {
            let styled = self.link_style.apply_to(text);
            out.push_str(&format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", target, styled));
        } else {
            out.push_str(&format!("{} <{}>", text, target));
        }
    }
}

/// Drops C0/C1 control characters other than newline and tab, so remote
/// text cannot emit its own escape sequences.
fn strip_controls(text: &str) -> Cow<'_, str> {
    let is_unsafe = |c: char| c.is_control() && c != '\n' && c != '\t';
    if text.contains(is_unsafe) {
        Cow::Owned(text.chars().filter(|&c| !is_unsafe(c)).collect())
    } else {
        Cow::Borrowed(text)
    }
}

/// HTML fragment output for embedding in a page.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlMarkup;

impl Markup for HtmlMarkup {
    fn plain(&self, out: &mut String, text: &str) {
        push_escaped(out, text);
    }

    fn math(&self, out: &mut String, _source: &str, rendered: &str) {
        out.push_str("<span class=\"math\">");
        push_escaped(out, rendered);
        out.push_str("</span>");
    }

    fn math_error(&self, out: &mut String, source: &str) {
        out.push_str("<span class=\"math-error\">LaTeX Error: ");
        push_escaped(out, source);
        out.push_str("</span>");
    }

    fn link(&self, out: &mut String, target: &str, text: &str) {
        out.push_str("<a class=\"doi-link\" href=\"");
        push_escaped(out, target);
        out.push_str("\">");
        push_escaped(out, text);
        out.push_str("</a>");
    }
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}
