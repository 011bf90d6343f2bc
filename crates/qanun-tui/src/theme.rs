use ratatui::style::{Color, Modifier, Style};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeMode {
    Dark,
    Light,
}

#[derive(Clone, Debug)]
pub struct Theme {
    pub mode: ThemeMode,
    pub text: Color,
    pub text_muted: Color,
    pub background: Color,
    pub background_panel: Color,
    pub background_element: Color,
    pub border: Color,
    pub border_active: Color,
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub user_message: Color,
    pub bot_message: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            mode: ThemeMode::Dark,
            text: Color::Rgb(238, 238, 238),
            text_muted: Color::Rgb(128, 128, 128),
            background: Color::Reset,
            background_panel: Color::Rgb(24, 32, 48),
            background_element: Color::Rgb(36, 46, 66),
            border: Color::Rgb(70, 80, 100),
            border_active: Color::Rgb(212, 175, 55),
            primary: Color::Rgb(212, 175, 55),
            secondary: Color::Rgb(120, 160, 220),
            accent: Color::Rgb(90, 200, 170),
            success: Color::Rgb(80, 200, 120),
            warning: Color::Rgb(255, 200, 80),
            error: Color::Rgb(255, 90, 90),
            info: Color::Rgb(100, 180, 255),
            user_message: Color::Rgb(120, 160, 220),
            bot_message: Color::Rgb(212, 175, 55),
        }
    }

    pub fn light() -> Self {
        Self {
            mode: ThemeMode::Light,
            text: Color::Rgb(30, 30, 30),
            text_muted: Color::Rgb(110, 110, 110),
            background: Color::Reset,
            background_panel: Color::Rgb(244, 241, 232),
            background_element: Color::Rgb(232, 228, 214),
            border: Color::Rgb(180, 172, 150),
            border_active: Color::Rgb(150, 110, 20),
            primary: Color::Rgb(150, 110, 20),
            secondary: Color::Rgb(30, 80, 160),
            accent: Color::Rgb(20, 130, 110),
            success: Color::Rgb(30, 140, 70),
            warning: Color::Rgb(190, 130, 0),
            error: Color::Rgb(200, 40, 40),
            info: Color::Rgb(30, 100, 200),
            user_message: Color::Rgb(30, 80, 160),
            bot_message: Color::Rgb(150, 110, 20),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_active
        } else {
            self.border
        })
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name() {
        assert_eq!(Theme::by_name(" Light ").unwrap().mode, ThemeMode::Light);
        assert_eq!(Theme::by_name("dark").unwrap().mode, ThemeMode::Dark);
        assert!(Theme::by_name("solarized").is_none());
    }
}
