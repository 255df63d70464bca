use console::Style;
use qterm::surface::{Theme, ThemeSink};

pub const PROMPT_MARKER: &str = "⟩⟩";

/// The active palette. Acts as the [`ThemeSink`] handed to commands.
#[derive(Debug, Clone)]
pub struct Palette {
    theme: Theme,
    color: bool,
}

impl Palette {
    pub fn new(theme: Theme, color: bool) -> Self {
        Self { theme, color }
    }

    /// Style for ordinary output in the current theme.
    pub fn primary(&self) -> Style {
        if !self.color {
            return Style::new();
        }
        Style::new()
            .color256(rgb_to_ansi256(self.theme.rgb()))
            .force_styling(true)
    }

    pub fn prompt(&self) -> String {
        format!("{} ", self.primary().bold().apply_to(PROMPT_MARKER))
    }
}

impl ThemeSink for Palette {
    fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    fn theme(&self) -> Theme {
        self.theme
    }
}

/// Nearest xterm-256 colour for an RGB triple.
pub fn rgb_to_ansi256((r, g, b): (u8, u8, u8)) -> u8 {
    if r == g && g == b {
        return match r {
            0..=7 => 16,
            248..=255 => 231,
            v => 232 + ((v as u16 - 8) * 24 / 240) as u8,
        };
    }
    let level = |v: u8| ((v as u16 * 5 + 127) / 255) as u8;
    16 + 36 * level(r) + 6 * level(g) + level(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_theme_colors_into_the_cube() {
        assert_eq!(rgb_to_ansi256(Theme::Green.rgb()), 46);
        assert_eq!(rgb_to_ansi256(Theme::White.rgb()), 231);
        assert_eq!(rgb_to_ansi256((0, 0, 0)), 16);
    }

    #[test]
    fn greys_use_the_ramp() {
        let grey = rgb_to_ansi256((128, 128, 128));
        assert!((232..=255).contains(&grey));
    }

    #[test]
    fn palette_is_a_theme_sink() {
        let mut palette = Palette::new(Theme::Green, false);
        palette.set_theme(Theme::Blue);
        assert_eq!(palette.theme(), Theme::Blue);
        assert_eq!(palette.prompt(), "⟩⟩ ");
    }
}
