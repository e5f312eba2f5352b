//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Limits exist because the document store enforces no field lengths of
//! its own.

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, category, pattern, shape, color, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Product descriptions
pub const MAX_DESCRIPTION_LEN: usize = 5000;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

// ── Validation helpers ───────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
/// Returns the message only; callers aggregate or wrap as needed.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    if value.len() > max_len {
        return Err(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ));
    }
    Ok(())
}

/// Check a `#RRGGBB` hex color code.
pub fn is_hex_color(value: &str) -> bool {
    let Some(hex) = value.strip_prefix('#') else {
        return false;
    };
    hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Minimal email shape check (local@domain.tld). Deliverability is proven
/// by the OTP round trip, not here.
pub fn is_email(value: &str) -> bool {
    if value.len() > MAX_EMAIL_LEN {
        return false;
    }
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && !local.contains(char::is_whitespace)
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains(char::is_whitespace)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_color_accepts_six_digit_codes() {
        assert!(is_hex_color("#FF0000"));
        assert!(is_hex_color("#a1b2c3"));
    }

    #[test]
    fn hex_color_rejects_malformed_codes() {
        assert!(!is_hex_color("FF0000"));
        assert!(!is_hex_color("#FF00"));
        assert!(!is_hex_color("#GG0000"));
        assert!(!is_hex_color("#FF00001"));
    }

    #[test]
    fn email_shape_check() {
        assert!(is_email("a@b.co"));
        assert!(is_email("user.name@shop.example.com"));
        assert!(!is_email("no-at-sign"));
        assert!(!is_email("two@@signs.com"));
        assert!(!is_email("space in@local.com"));
        assert!(!is_email("bare@domain"));
    }

    #[test]
    fn required_text_rejects_blank_and_oversized() {
        assert!(validate_required_text("rug", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(validate_required_text(&long, "name", MAX_NAME_LEN).is_err());
    }
}
