use engine::{Category, Medal, TransactionStatus};
use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub surface: Color,
    pub text: Color,
    pub text_muted: Color,
    pub border: Color,
    pub border_focused: Color,
    pub accent: Color,
    pub positive: Color,
    pub warning: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            surface: Color::Rgb(20, 26, 32),
            text: Color::Rgb(220, 220, 220),
            text_muted: Color::Rgb(140, 140, 140),
            border: Color::Rgb(60, 70, 80),
            border_focused: Color::Rgb(80, 160, 160),
            accent: Color::Rgb(80, 160, 160),
            positive: Color::Rgb(90, 180, 110),
            warning: Color::Rgb(220, 170, 60),
            error: Color::Rgb(200, 80, 80),
        }
    }
}

impl Theme {
    /// Fixed colour per emission category (slate, amber, green, violet).
    pub fn category(&self, category: Category) -> Color {
        match category {
            Category::Plastic => Color::Rgb(100, 116, 139),
            Category::Transportation => Color::Rgb(245, 158, 11),
            Category::Energy => Color::Rgb(34, 197, 94),
            Category::Food => Color::Rgb(139, 92, 246),
        }
    }

    pub fn medal(&self, medal: Medal) -> Color {
        match medal {
            Medal::Gold => Color::Rgb(234, 179, 8),
            Medal::Silver => Color::Rgb(180, 180, 190),
            Medal::Bronze => Color::Rgb(205, 127, 50),
        }
    }

    pub fn status(&self, status: TransactionStatus) -> Color {
        match status {
            TransactionStatus::Pending => self.warning,
            TransactionStatus::Completed => self.positive,
            TransactionStatus::Failed | TransactionStatus::Cancelled => self.error,
        }
    }
}
