//! Theme system

use ratatui::style::Color;

/// Semantic color names. Renderers only ever refer to these; the active
/// [`Palette`] decides the final color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorToken {
    TextPrimary,
    TextSecondary,
    TextMuted,
    BorderDefault,
    BorderFocus,
    Track,
    Success,
    Warning,
    Error,
    Info,
    AccentBlue,
    AccentCyan,
    AccentGreen,
    AccentMagenta,
    AccentOrange,
    AccentPink,
    AccentYellow,
    /// Rotating series color, wraps around the accent set.
    Series(usize),
    /// Heatmap density tier, 0 (empty) through 4 (hottest).
    Heat(u8),
}

impl ColorToken {
    const SERIES: [ColorToken; 7] = [
        ColorToken::AccentCyan,
        ColorToken::AccentMagenta,
        ColorToken::AccentGreen,
        ColorToken::AccentYellow,
        ColorToken::AccentBlue,
        ColorToken::AccentPink,
        ColorToken::AccentOrange,
    ];

    /// Resolve `Series(n)` to a concrete accent token; other tokens pass through.
    pub fn resolve_series(self) -> ColorToken {
        match self {
            ColorToken::Series(n) => Self::SERIES[n % Self::SERIES.len()],
            other => other,
        }
    }
}

/// Token to color resolution, injected into every render call.
pub trait Palette {
    fn color(&self, token: ColorToken) -> Color;
}

/// Complete color palette for TUI rendering
#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    // Backgrounds
    pub bg_primary: Color,
    pub bg_tertiary: Color,

    // Borders
    pub border_default: Color,
    pub border_focus: Color,

    // Text
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    // Status
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    // Accents
    pub accent_blue: Color,
    pub accent_cyan: Color,
    pub accent_green: Color,
    pub accent_magenta: Color,
    pub accent_orange: Color,
    pub accent_pink: Color,
    pub accent_yellow: Color,
}

impl ThemeColors {
    /// Default theme
    pub const DEFAULT: Self = Self {
        // Backgrounds
        bg_primary: Color::Rgb(22, 24, 38),
        bg_tertiary: Color::Rgb(32, 35, 52),

        // Borders
        border_default: Color::Rgb(130, 135, 160),
        border_focus: Color::Rgb(120, 220, 170),

        // Text
        text_primary: Color::Rgb(230, 233, 248),
        text_secondary: Color::Rgb(185, 190, 210),
        text_muted: Color::Rgb(140, 145, 168),

        // Status
        success: Color::Rgb(110, 220, 120),
        warning: Color::Rgb(235, 195, 100),
        error: Color::Rgb(250, 120, 130),
        info: Color::Rgb(110, 200, 245),

        // Accents
        accent_blue: Color::Rgb(120, 170, 250),
        accent_cyan: Color::Rgb(100, 215, 235),
        accent_green: Color::Rgb(110, 210, 120),
        accent_magenta: Color::Rgb(210, 150, 235),
        accent_orange: Color::Rgb(245, 175, 100),
        accent_pink: Color::Rgb(240, 145, 180),
        accent_yellow: Color::Rgb(235, 195, 100),
    };

    /// Blend between the tertiary background and the green accent, the same
    /// ramp the activity heatmap uses.
    fn heat(&self, tier: u8) -> Color {
        let intensity = match tier {
            0 => return self.bg_tertiary,
            1 => 0.35,
            2 => 0.6,
            3 => 0.82,
            _ => 1.0,
        };
        let (br, bgc, bb) = rgb(self.bg_tertiary, (60, 60, 60));
        let (r, g, b) = rgb(self.accent_green, (100, 200, 100));
        Color::Rgb(
            (br + (r - br) * intensity) as u8,
            (bgc + (g - bgc) * intensity) as u8,
            (bb + (b - bb) * intensity) as u8,
        )
    }
}

fn rgb(color: Color, fallback: (u8, u8, u8)) -> (f64, f64, f64) {
    let (r, g, b) = match color {
        Color::Rgb(r, g, b) => (r, g, b),
        _ => fallback,
    };
    (r as f64, g as f64, b as f64)
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Palette for ThemeColors {
    fn color(&self, token: ColorToken) -> Color {
        match token.resolve_series() {
            ColorToken::TextPrimary => self.text_primary,
            ColorToken::TextSecondary => self.text_secondary,
            ColorToken::TextMuted => self.text_muted,
            ColorToken::BorderDefault => self.border_default,
            ColorToken::BorderFocus => self.border_focus,
            ColorToken::Track => self.bg_tertiary,
            ColorToken::Success => self.success,
            ColorToken::Warning => self.warning,
            ColorToken::Error => self.error,
            ColorToken::Info => self.info,
            ColorToken::AccentBlue => self.accent_blue,
            ColorToken::AccentCyan => self.accent_cyan,
            ColorToken::AccentGreen => self.accent_green,
            ColorToken::AccentMagenta => self.accent_magenta,
            ColorToken::AccentOrange => self.accent_orange,
            ColorToken::AccentPink => self.accent_pink,
            ColorToken::AccentYellow => self.accent_yellow,
            ColorToken::Heat(tier) => self.heat(tier),
            ColorToken::Series(_) => self.text_primary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_tokens_wrap() {
        assert_eq!(ColorToken::Series(0).resolve_series(), ColorToken::AccentCyan);
        assert_eq!(ColorToken::Series(7).resolve_series(), ColorToken::AccentCyan);
        assert_eq!(ColorToken::Series(1).resolve_series(), ColorToken::AccentMagenta);
    }

    #[test]
    fn test_heat_tiers_are_distinct() {
        let colors = ThemeColors::DEFAULT;
        assert_eq!(colors.color(ColorToken::Heat(0)), colors.bg_tertiary);
        assert_eq!(colors.color(ColorToken::Heat(4)), colors.accent_green);
        assert_ne!(colors.color(ColorToken::Heat(1)), colors.color(ColorToken::Heat(2)));
    }
}
