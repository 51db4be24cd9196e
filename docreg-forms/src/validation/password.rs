//! Password strength scoring.

const SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Strength bucket derived from the number of satisfied checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrengthLevel {
    Weak,
    Medium,
    Strong,
}

/// Individual checks that contribute to the score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PasswordChecks {
    pub length: bool,
    pub uppercase: bool,
    pub lowercase: bool,
    pub numbers: bool,
    pub symbols: bool,
}

/// Result of [`password_strength`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordStrength {
    pub level: StrengthLevel,
    /// Number of satisfied checks, 0 to 5.
    pub score: u8,
    pub checks: PasswordChecks,
}

impl PasswordStrength {
    /// Human-readable hints for every unmet check, in a fixed order.
    pub fn missing_requirements(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.checks.length {
            missing.push("pelo menos 8 caracteres");
        }
        if !self.checks.uppercase {
            missing.push("uma letra maiúscula");
        }
        if !self.checks.lowercase {
            missing.push("uma letra minúscula");
        }
        if !self.checks.numbers {
            missing.push("um número");
        }
        if !self.checks.symbols {
            missing.push("um símbolo especial");
        }
        missing
    }

    /// Feedback line for a strength meter.
    pub fn feedback(&self) -> String {
        let missing = self.missing_requirements();
        if missing.is_empty() {
            "Senha forte! ✓".to_string()
        } else {
            format!("Adicione: {}", missing.join(", "))
        }
    }
}

/// Scores a password.
///
/// Fewer than 3 satisfied checks is weak, exactly 3 is medium, and 4 or
/// more is strong.
pub fn password_strength(password: &str) -> PasswordStrength {
    let checks = PasswordChecks {
        length: password.chars().count() >= 8,
        uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
        lowercase: password.chars().any(|c| c.is_ascii_lowercase()),
        numbers: password.chars().any(|c| c.is_ascii_digit()),
        symbols: password.chars().any(|c| SYMBOLS.contains(c)),
    };

    let score = [
        checks.length,
        checks.uppercase,
        checks.lowercase,
        checks.numbers,
        checks.symbols,
    ]
    .into_iter()
    .filter(|&passed| passed)
    .count() as u8;

    let level = match score {
        0..=2 => StrengthLevel::Weak,
        3 => StrengthLevel::Medium,
        _ => StrengthLevel::Strong,
    };

    PasswordStrength {
        level,
        score,
        checks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        assert_eq!(password_strength("abc").level, StrengthLevel::Weak);
        assert_eq!(password_strength("abcdefgh").level, StrengthLevel::Weak);
        assert_eq!(password_strength("abcdefg1").level, StrengthLevel::Medium);
        assert_eq!(password_strength("Abcdefg1").level, StrengthLevel::Strong);
        assert_eq!(password_strength("Abcdefg1!").score, 5);
    }

    #[test]
    fn test_missing_requirements() {
        let strength = password_strength("abcdefgh");
        assert_eq!(
            strength.missing_requirements(),
            vec!["uma letra maiúscula", "um número", "um símbolo especial"]
        );
        assert_eq!(
            strength.feedback(),
            "Adicione: uma letra maiúscula, um número, um símbolo especial"
        );
    }

    #[test]
    fn test_full_score_feedback() {
        assert_eq!(password_strength("Abcdefg1!").feedback(), "Senha forte! ✓");
    }
}
