/// Normalize a free-form phone string to the canonical "+<digits>" form
/// used as the lookup key.
///
/// Rules, in order:
/// - exactly 10 digits: assume US/Canada, prefix "+1"
/// - exactly 11 digits starting with 1: country code present, prefix "+"
/// - more than 7 digits: raw input starting with "+" passes through as "+"
///   plus its digits; a "00" international prefix is dropped in favor of
///   "+"; 11+ digits are taken as already carrying a country code; 8-9
///   digit inputs without either marker are treated as domestic ("+1")
/// - anything shorter: "+" plus whatever digits there are, which makes the
///   no-digit case degenerate ("+") but never a panic
///
/// Pure and total; idempotent over its own output.
pub fn normalize_phone(raw: &str) -> String {
    let digits = digits_only(raw);

    if digits.len() == 10 {
        return format!("+1{digits}");
    }
    if digits.len() == 11 && digits.starts_with('1') {
        return format!("+{digits}");
    }
    if digits.len() > 7 {
        if raw.trim_start().starts_with('+') {
            return format!("+{digits}");
        }
        if let Some(rest) = digits.strip_prefix("00") {
            return format!("+{rest}");
        }
        if digits.len() >= 11 {
            return format!("+{digits}");
        }
        return format!("+1{digits}");
    }

    format!("+{digits}")
}

/// A canonical form with no digits after the "+" must never be submitted
/// to a lookup.
pub fn is_submittable(canonical: &str) -> bool {
    match canonical.strip_prefix('+') {
        Some(rest) => !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Suffix used by the loosened fallback lookup: the last 10 digits of the
/// input, or None when there are fewer than 10.
pub fn last_ten_digits(raw: &str) -> Option<String> {
    let digits = digits_only(raw);
    if digits.len() < 10 {
        return None;
    }
    Some(digits[digits.len() - 10..].to_string())
}
