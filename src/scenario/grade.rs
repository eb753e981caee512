//! Suitability Grade
//!
//! Ordinal grade for growing a crop in a region. Declared worst-first so the
//! derived `Ord` reads naturally: `Grade::Optimal > Grade::Suitable`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    /// No rule and no baseline entry for the pair
    NoData,
    /// Grade 4: not viable
    Unsuitable,
    /// Grade 3: viable with significant intervention
    Possible,
    /// Grade 2: viable with modest intervention
    Suitable,
    /// Grade 1: best conditions
    Optimal,
}

impl Grade {
    /// The four real grades, best first
    pub const RANKED: [Grade; 4] = [
        Grade::Optimal,
        Grade::Suitable,
        Grade::Possible,
        Grade::Unsuitable,
    ];

    pub fn display_text(&self) -> &'static str {
        match self {
            Grade::Optimal => "Optimal",
            Grade::Suitable => "Suitable",
            Grade::Possible => "Possible",
            Grade::Unsuitable => "Unsuitable",
            Grade::NoData => "No data",
        }
    }

    /// Label used in the Korean reference tables, e.g. "1등급 (최적)"
    pub fn korean_label(&self) -> &'static str {
        match self {
            Grade::Optimal => "1등급 (최적)",
            Grade::Suitable => "2등급 (적합)",
            Grade::Possible => "3등급 (가능)",
            Grade::Unsuitable => "4등급 (불가능)",
            Grade::NoData => "자료 없음",
        }
    }

    /// Numeric class, 1 = best; `None` for `NoData`
    pub fn class(&self) -> Option<u8> {
        match self {
            Grade::Optimal => Some(1),
            Grade::Suitable => Some(2),
            Grade::Possible => Some(3),
            Grade::Unsuitable => Some(4),
            Grade::NoData => None,
        }
    }

    /// Parse a grade label from a reference table
    ///
    /// Accepts the leading token of English or Korean labels ("optimal",
    /// "1등급 (최적)", "최적", "1"). Unknown labels return `None`.
    pub fn parse_label(label: &str) -> Option<Grade> {
        let token = label
            .trim()
            .split(|c: char| c.is_whitespace() || c == '(')
            .next()
            .unwrap_or("")
            .to_lowercase();

        match token.as_str() {
            "1" | "1등급" | "최적" | "optimal" => Some(Grade::Optimal),
            "2" | "2등급" | "적합" | "suitable" => Some(Grade::Suitable),
            "3" | "3등급" | "가능" | "possible" => Some(Grade::Possible),
            "4" | "4등급" | "불가능" | "부적합" | "unsuitable" => Some(Grade::Unsuitable),
            "no_data" | "nodata" | "자료없음" => Some(Grade::NoData),
            _ => None,
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_best_is_greatest() {
        assert!(Grade::Optimal > Grade::Suitable);
        assert!(Grade::Suitable > Grade::Possible);
        assert!(Grade::Possible > Grade::Unsuitable);
        assert!(Grade::Unsuitable > Grade::NoData);
    }

    #[test]
    fn test_parse_korean_and_english_labels() {
        assert_eq!(Grade::parse_label("1등급 (최적)"), Some(Grade::Optimal));
        assert_eq!(Grade::parse_label(" 3등급(가능) "), Some(Grade::Possible));
        assert_eq!(Grade::parse_label("Suitable"), Some(Grade::Suitable));
        assert_eq!(Grade::parse_label("4"), Some(Grade::Unsuitable));
        assert_eq!(Grade::parse_label("excellent"), None);
        assert_eq!(Grade::parse_label(""), None);
    }

    #[test]
    fn test_labels_parse_back() {
        for grade in Grade::RANKED {
            assert_eq!(Grade::parse_label(grade.korean_label()), Some(grade));
            assert_eq!(Grade::parse_label(grade.display_text()), Some(grade));
        }
    }
}
