/// Terminal colour scheme for the report.
///
/// The theme is a plain value handed to every renderer. With colour off
/// every method returns the text unchanged, so rendered output can be
/// compared byte for byte.
use colored::{ColoredString, Colorize};
use shuruhoja_core::model::{Recommendation, RiskLevel};

/// Semantic colour roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Heading,
    Critical,
    Caution,
    Safe,
    Muted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub color: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self { color: true }
    }
}

impl Theme {
    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn paint(&self, text: &str, tone: Tone) -> String {
        if !self.color {
            return text.to_string();
        }
        let styled: ColoredString = match tone {
            Tone::Heading => text.cyan().bold(),
            Tone::Critical => text.red(),
            Tone::Caution => text.yellow(),
            Tone::Safe => text.green(),
            Tone::Muted => text.dimmed(),
        };
        styled.to_string()
    }

    pub fn risk_tone(risk: RiskLevel) -> Tone {
        match risk {
            RiskLevel::Critical => Tone::Critical,
            RiskLevel::Caution => Tone::Caution,
            RiskLevel::Safe => Tone::Safe,
        }
    }

    pub fn recommendation_tone(rec: Recommendation) -> Tone {
        match rec {
            Recommendation::Delete => Tone::Critical,
            Recommendation::Review => Tone::Caution,
            Recommendation::Keep => Tone::Safe,
        }
    }

    pub fn risk(&self, risk: RiskLevel) -> String {
        self.paint(risk.label(), Self::risk_tone(risk))
    }

    pub fn recommendation(&self, rec: Recommendation) -> String {
        self.paint(rec.label(), Self::recommendation_tone(rec))
    }

    pub fn heading(&self, text: &str) -> String {
        self.paint(text, Tone::Heading)
    }
}
