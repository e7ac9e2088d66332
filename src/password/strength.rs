//! Heuristic password strength scoring (0-100).
//!
//! The score is additive:
//! - 2 points per character, at most 40
//! - 10 points per character class present (upper, lower, digit, symbol)
//! - a bonus of 20 for 12+ characters using all four classes, otherwise
//!   10 for 10+ characters using at least three
//!
//! capped at 100.

use std::fmt;

/// Coarse verdict derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrengthLevel {
    Weak,
    Moderate,
    Good,
    Strong,
}

impl StrengthLevel {
    fn from_score(score: u8) -> Self {
        match score {
            80.. => StrengthLevel::Strong,
            60..=79 => StrengthLevel::Good,
            40..=59 => StrengthLevel::Moderate,
            _ => StrengthLevel::Weak,
        }
    }

    fn verdict(self) -> &'static str {
        match self {
            StrengthLevel::Strong => "Strong password!",
            StrengthLevel::Good => "Good password, but could be stronger",
            StrengthLevel::Moderate => "Moderate password - consider strengthening",
            StrengthLevel::Weak => "Weak password - needs improvement",
        }
    }
}

impl fmt::Display for StrengthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StrengthLevel::Weak => "weak",
            StrengthLevel::Moderate => "moderate",
            StrengthLevel::Good => "good",
            StrengthLevel::Strong => "strong",
        };
        f.write_str(label)
    }
}

/// Result of `analyze_password_strength`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrengthReport {
    pub score: u8,
    pub level: StrengthLevel,
    /// Suggestions first, the verdict last.
    pub feedback: Vec<String>,
}

/// Score a password and explain what is missing.
pub fn analyze_password_strength(password: &str) -> StrengthReport {
    if password.is_empty() {
        return StrengthReport {
            score: 0,
            level: StrengthLevel::Weak,
            feedback: vec!["Password is empty".to_string()],
        };
    }

    let (mut upper, mut lower, mut digit, mut symbol) = (false, false, false, false);
    for c in password.chars() {
        if c.is_uppercase() {
            upper = true;
        } else if c.is_lowercase() {
            lower = true;
        } else if c.is_numeric() {
            digit = true;
        } else if is_symbol(c) {
            symbol = true;
        }
    }

    let classes = [upper, lower, digit, symbol].iter().filter(|&&b| b).count();
    let length = password.chars().count();

    let mut score = (length * 2).min(40) + classes * 10;
    if length >= 12 && classes == 4 {
        score += 20;
    } else if length >= 10 && classes >= 3 {
        score += 10;
    }
    let score = score.min(100) as u8;

    let mut feedback = Vec::new();
    if length < 8 {
        feedback.push("Password is too short".to_string());
    }
    if !upper || !lower {
        feedback.push("Mix upper and lowercase letters".to_string());
    }
    if !digit {
        feedback.push("Add numbers".to_string());
    }
    if !symbol {
        feedback.push("Add symbols".to_string());
    }

    let level = StrengthLevel::from_score(score);
    feedback.push(level.verdict().to_string());

    StrengthReport {
        score,
        level,
        feedback,
    }
}

fn is_symbol(c: char) -> bool {
    c.is_ascii_punctuation() || (!c.is_alphanumeric() && !c.is_whitespace() && !c.is_control())
}
