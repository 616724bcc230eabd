//! Street name classification.
//!
//! Numbered and lettered streets ("E 14 St", "Avenue B") rarely have a
//! story worth telling, so only properly named streets get a fact lookup.
//! The policy is an ordered rule table; the first matching rule decides
//! the mode and anything unmatched is a named street.

use std::sync::LazyLock;

use regex::Regex;
use street_card_models::CardMode;

/// A single classification rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationRule {
    /// Stable rule identifier.
    pub name: &'static str,
    /// Case-insensitive regex, anchored at the start of the trimmed name.
    pub pattern: &'static str,
    /// Mode assigned when the pattern matches.
    pub mode: CardMode,
}

/// Classification rules in evaluation order.
pub const CLASSIFICATION_RULES: &[ClassificationRule] = &[
    // "14 St", "14th St", "14 Street", "14th Street"
    ClassificationRule {
        name: "numbered_street",
        pattern: r"(?i)^\d+\s*(?:st|nd|rd|th)?\s+(?:st|street)\b",
        mode: CardMode::NumberedStreet,
    },
    // "E 14 St", "W 4th St", "East 14th Street"
    ClassificationRule {
        name: "directional_numbered_street",
        pattern: r"(?i)^(?:e|w|n|s|east|west|north|south)\.?\s+\d+\s*(?:st|nd|rd|th)?\s+(?:st|street)\b",
        mode: CardMode::NumberedStreet,
    },
    // "1 Ave", "1st Ave", "2 Avenue"
    ClassificationRule {
        name: "numbered_avenue",
        pattern: r"(?i)^\d+\s*(?:st|nd|rd|th)?\s+(?:ave|avenue)\b",
        mode: CardMode::NumberedStreet,
    },
    // "Ave A", "Avenue B"
    ClassificationRule {
        name: "lettered_avenue",
        pattern: r"(?i)^(?:ave|avenue)\s+[a-z]\b",
        mode: CardMode::NumberedStreet,
    },
];

static COMPILED_RULES: LazyLock<Vec<(&'static ClassificationRule, Regex)>> = LazyLock::new(|| {
    CLASSIFICATION_RULES
        .iter()
        .map(|rule| (rule, Regex::new(rule.pattern).expect("valid regex")))
        .collect()
});

/// Returns the first rule matching `name`, if any.
#[must_use]
pub fn matching_rule(name: &str) -> Option<&'static ClassificationRule> {
    let name = name.trim();
    COMPILED_RULES
        .iter()
        .find(|(_, re)| re.is_match(name))
        .map(|(rule, _)| *rule)
}

/// Classifies a snapped street's primary name.
///
/// An absent or blank name means no street was resolved.
#[must_use]
pub fn classify(name: Option<&str>) -> CardMode {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return CardMode::Near;
    };

    matching_rule(name).map_or(CardMode::NamedStreet, |rule| {
        log::trace!("Street {name:?} matched rule {}", rule.name);
        rule.mode
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_name_is_near() {
        assert_eq!(classify(None), CardMode::Near);
    }

    #[test]
    fn blank_name_is_near() {
        assert_eq!(classify(Some("")), CardMode::Near);
        assert_eq!(classify(Some("   ")), CardMode::Near);
    }

    #[test]
    fn proper_names_are_named() {
        for name in [
            "Broadway",
            "Bedford Avenue",
            "St Marks Place",
            "Avenue of the Americas",
            "Fifth Avenue",
            "Eastern Parkway",
            "West End Avenue",
        ] {
            assert_eq!(classify(Some(name)), CardMode::NamedStreet, "{name}");
        }
    }

    #[test]
    fn numbered_streets() {
        for name in ["14 St", "14th Street", "14 Street", "3rd St", "  42nd ST  "] {
            assert_eq!(classify(Some(name)), CardMode::NumberedStreet, "{name}");
        }
    }

    #[test]
    fn directional_numbered_streets() {
        for name in ["E 14 St", "W 4th St", "East 14th Street", "n 110 street"] {
            assert_eq!(classify(Some(name)), CardMode::NumberedStreet, "{name}");
        }
    }

    #[test]
    fn numbered_avenues() {
        for name in ["1st Avenue", "1st Ave", "2 Avenue", "10th AVE"] {
            assert_eq!(classify(Some(name)), CardMode::NumberedStreet, "{name}");
        }
    }

    #[test]
    fn lettered_avenues() {
        for name in ["Avenue B", "Ave A", "avenue d"] {
            assert_eq!(classify(Some(name)), CardMode::NumberedStreet, "{name}");
        }
    }

    #[test]
    fn reports_first_matching_rule() {
        assert_eq!(matching_rule("E 14 St").map(|r| r.name), Some("directional_numbered_street"));
        assert_eq!(matching_rule("Ave C").map(|r| r.name), Some("lettered_avenue"));
        assert_eq!(matching_rule("Broadway"), None);
    }

    #[test]
    fn is_deterministic() {
        for name in ["Broadway", "14th Street", "Avenue B"] {
            assert_eq!(classify(Some(name)), classify(Some(name)));
        }
    }

    #[test]
    fn every_rule_pattern_compiles() {
        assert_eq!(COMPILED_RULES.len(), CLASSIFICATION_RULES.len());
    }
}
