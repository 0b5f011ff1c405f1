use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Centralized registry for PII redaction regex patterns.
///
/// Player contacts are emails or phone numbers, and bearer credentials are
/// base64url strings; all three must never reach the logs verbatim.
pub struct PiiRegexRegistry;

impl PiiRegexRegistry {
    /// Email pattern: matches standard email addresses
    /// SAFETY: This regex pattern is a vetted literal that compiles successfully
    pub fn email() -> &'static Regex {
        static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
        });
        &EMAIL_REGEX
    }

    /// Phone pattern: "+" international numbers with separators, or a bare
    /// run of 7-15 digits
    /// SAFETY: This regex pattern is a vetted literal that compiles successfully
    pub fn phone() -> &'static Regex {
        static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\+\d[\d\s().-]{5,}\d|\b\d{7,15}\b").unwrap()
        });
        &PHONE_REGEX
    }

    /// Opaque token pattern: base64 / base64url runs (≥20 chars)
    /// SAFETY: This regex pattern is a vetted literal that compiles successfully
    pub fn token() -> &'static Regex {
        static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"[A-Za-z0-9_+/-]{20,}={0,2}").unwrap()
        });
        &TOKEN_REGEX
    }
}

fn mask_email(full_match: &str) -> String {
    match full_match.find('@') {
        Some(0) | None => full_match.to_string(),
        Some(at_pos) => {
            let first_char: String = full_match[..at_pos].chars().take(1).collect();
            format!("{first_char}***{}", &full_match[at_pos..])
        }
    }
}

fn mask_phone(full_match: &str) -> String {
    let digits: Vec<char> = full_match.chars().filter(char::is_ascii_digit).collect();
    let tail: String = digits[digits.len().saturating_sub(2)..].iter().collect();
    format!("***{tail}")
}

/// Redacts sensitive information from a string.
///
/// - Emails keep the first character of the local part and the domain
/// - Tokens (base64-like runs of 20+ chars) become `[REDACTED_TOKEN]`
/// - Phone numbers keep only their last two digits
///
/// Order: emails, then tokens, then phones, so a token's digit runs are not
/// mistaken for phone numbers.
pub fn redact(input: &str) -> String {
    let email_redacted = PiiRegexRegistry::email()
        .replace_all(input, |caps: &regex::Captures| mask_email(&caps[0]));

    let token_redacted =
        PiiRegexRegistry::token().replace_all(&email_redacted, "[REDACTED_TOKEN]");

    PiiRegexRegistry::phone()
        .replace_all(&token_redacted, |caps: &regex::Captures| mask_phone(&caps[0]))
        .to_string()
}

/// A wrapper that redacts sensitive strings when displayed.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", redact(self.0))
    }
}
