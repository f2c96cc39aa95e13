use std::str::FromStr;

pub const WEIGHT_MIN: f64 = 0.01;
pub const WEIGHT_MAX: f64 = 10.00;
pub const WEIGHT_FALLBACK: f64 = 1.00;

/// Parses an optional raw form value, falling back when the value is
/// missing, blank or malformed. The second element reports whether the
/// fallback was used so callers can log or assert on it.
pub fn parse_with_fallback<T: FromStr + Copy>(raw: Option<&str>, fallback: T) -> (T, bool) {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => match value.parse::<T>() {
            Ok(parsed) => (parsed, false),
            Err(_) => (fallback, true),
        },
        _ => (fallback, true),
    }
}

/// Trims an optional text value, collapsing blank input to `None`.
pub fn trim_to_none(raw: Option<&str>) -> Option<String> {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => Some(value.to_string()),
        _ => None,
    }
}

/// Clamps a criterion weight into the accepted range.
pub fn clamp_weight(weight: f64) -> f64 {
    weight.clamp(WEIGHT_MIN, WEIGHT_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_numbers_without_defaulting() {
        assert_eq!(parse_with_fallback(Some(" 2.5 "), 1.0), (2.5, false));
        assert_eq!(parse_with_fallback::<u32>(Some("7"), 0), (7, false));
    }

    #[test]
    fn falls_back_on_missing_input() {
        assert_eq!(parse_with_fallback::<f64>(None, 1.0), (1.0, true));
        assert_eq!(parse_with_fallback::<f64>(Some(""), 1.0), (1.0, true));
        assert_eq!(parse_with_fallback::<f64>(Some("   "), 1.0), (1.0, true));
    }

    #[test]
    fn falls_back_on_malformed_input() {
        assert_eq!(parse_with_fallback::<f64>(Some("abc"), 1.0), (1.0, true));
        assert_eq!(parse_with_fallback::<u32>(Some("-3"), 0), (0, true));
        assert_eq!(parse_with_fallback::<u32>(Some("2.5"), 0), (0, true));
    }

    #[test]
    fn blank_text_collapses_to_none() {
        assert_eq!(trim_to_none(Some("   ")), None);
        assert_eq!(trim_to_none(Some("")), None);
        assert_eq!(trim_to_none(None), None);
        assert_eq!(trim_to_none(Some("  kept  ")), Some("kept".to_string()));
    }

    #[test]
    fn weights_clamp_into_range() {
        assert_eq!(clamp_weight(0.0), 0.01);
        assert_eq!(clamp_weight(-4.0), 0.01);
        assert_eq!(clamp_weight(50.0), 10.0);
        assert_eq!(clamp_weight(2.5), 2.5);
    }
}
