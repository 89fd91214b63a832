//! Theme colors, with optional hex overrides from the `[theme]` config table

use ratatui::style::Color;

use crate::config::ThemeOverrides;

/// Theme colors for the UI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub accent: Color,           // Active tab, highlights, key hints
    pub success: Color,          // Online badge
    pub danger: Color,           // Offline badge, errors
    pub warning: Color,          // Checking badge, status messages
    pub text: Color,             // Primary text
    pub text_dim: Color,         // Secondary text
    pub bg_selected: Color,      // Selected tab background
    pub inactive: Color,         // Inactive borders
    pub header: Color,           // Section and table headers
    pub gold: Color,             // Rank 1
    pub silver: Color,           // Rank 2
    pub bronze: Color,           // Rank 3
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Rgb(137, 180, 250),
            success: Color::Rgb(166, 218, 149),
            danger: Color::Rgb(243, 139, 168),
            warning: Color::Rgb(250, 179, 135),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            bg_selected: Color::Rgb(69, 71, 90),
            inactive: Color::Rgb(88, 91, 112),
            header: Color::Rgb(203, 166, 247),
            gold: Color::Rgb(249, 226, 175),
            silver: Color::Rgb(186, 194, 222),
            bronze: Color::Rgb(217, 119, 6),
        }
    }
}

impl Theme {
    /// Default palette with any valid overrides applied
    pub fn with_overrides(overrides: &ThemeOverrides) -> Self {
        let mut theme = Self::default();

        let slots: [(&Option<String>, &mut Color, &str); 5] = [
            (&overrides.accent, &mut theme.accent, "accent"),
            (&overrides.success, &mut theme.success, "success"),
            (&overrides.danger, &mut theme.danger, "danger"),
            (&overrides.warning, &mut theme.warning, "warning"),
            (&overrides.text, &mut theme.text, "text"),
        ];

        for (value, slot, name) in slots {
            if let Some(raw) = value {
                match Self::parse_hex_color(raw) {
                    Some(color) => *slot = color,
                    None => tracing::warn!("Ignoring invalid {} color: {}", name, raw),
                }
            }
        }

        theme
    }

    /// Color for a leaderboard rank
    pub fn rank_color(&self, rank: u8) -> Color {
        match rank {
            1 => self.gold,
            2 => self.silver,
            3 => self.bronze,
            _ => self.text,
        }
    }

    /// Parse a hex color string (#RRGGBB or #RGB)
    pub fn parse_hex_color(s: &str) -> Option<Color> {
        let s = s.trim().trim_start_matches('#');

        if !s.is_ascii() {
            return None;
        }

        if s.len() == 6 {
            let r = u8::from_str_radix(&s[0..2], 16).ok()?;
            let g = u8::from_str_radix(&s[2..4], 16).ok()?;
            let b = u8::from_str_radix(&s[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        } else if s.len() == 3 {
            let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(Theme::parse_hex_color("#FFC107"), Some(Color::Rgb(255, 193, 7)));
        assert_eq!(Theme::parse_hex_color("fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(Theme::parse_hex_color("#12345"), None);
        assert_eq!(Theme::parse_hex_color("#GGGGGG"), None);
        assert_eq!(Theme::parse_hex_color("#ééé"), None);
    }

    #[test]
    fn test_overrides_apply_valid_colors_only() {
        let overrides = ThemeOverrides {
            accent: Some("#D35F5F".to_string()),
            success: Some("not-a-color".to_string()),
            ..Default::default()
        };
        let theme = Theme::with_overrides(&overrides);

        assert_eq!(theme.accent, Color::Rgb(211, 95, 95));
        assert_eq!(theme.success, Theme::default().success);
    }
}
