use ratatui::style::Color;
use repdeck_types::ColorScheme;

use crate::app::App;

pub struct ThemeColors {
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub text: Color,
    pub text_dim: Color,
    pub background: Color,
    pub border: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    /// Filled heart and other "liked" markers
    pub liked: Color,
}

pub fn get_theme_colors(app: &App) -> ThemeColors {
    theme_for(app.color_scheme)
}

pub fn theme_for(scheme: ColorScheme) -> ThemeColors {
    match scheme {
        // Gym floor: high-contrast orange on charcoal
        ColorScheme::Default => ThemeColors {
            primary: Color::Rgb(255, 140, 0),
            secondary: Color::Rgb(255, 190, 90),
            accent: Color::Rgb(0, 200, 255),
            text: Color::Rgb(235, 235, 235),
            text_dim: Color::Rgb(140, 140, 140),
            background: Color::Rgb(18, 18, 18),
            border: Color::Rgb(90, 90, 90),
            success: Color::Rgb(80, 220, 120),
            warning: Color::Rgb(255, 210, 0),
            error: Color::Rgb(255, 80, 80),
            liked: Color::Rgb(255, 60, 110),
        },

        ColorScheme::Dark => ThemeColors {
            primary: Color::Rgb(100, 200, 255),
            secondary: Color::Rgb(150, 150, 255),
            accent: Color::Rgb(255, 100, 200),
            text: Color::Rgb(220, 220, 220),
            text_dim: Color::Rgb(120, 120, 120),
            background: Color::Rgb(20, 20, 25),
            border: Color::Rgb(60, 60, 70),
            success: Color::Rgb(100, 255, 150),
            warning: Color::Rgb(255, 200, 100),
            error: Color::Rgb(255, 100, 100),
            liked: Color::Rgb(255, 90, 120),
        },

        ColorScheme::Light => ThemeColors {
            primary: Color::Rgb(0, 100, 200),
            secondary: Color::Rgb(100, 50, 200),
            accent: Color::Rgb(200, 0, 100),
            text: Color::Rgb(30, 30, 30),
            text_dim: Color::Rgb(100, 100, 100),
            background: Color::Rgb(250, 250, 250),
            border: Color::Rgb(180, 180, 180),
            success: Color::Rgb(0, 150, 50),
            warning: Color::Rgb(200, 150, 0),
            error: Color::Rgb(200, 0, 0),
            liked: Color::Rgb(210, 20, 70),
        },
    }
}
