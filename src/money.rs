//! Money formatting.
//!
//! Prices arrive from the storefront as integer cents and are rendered
//! through a merchant-supplied format template containing one
//! `{{ variant }}` placeholder, e.g. `"${{amount}}"` or
//! `"{{amount_with_comma_separator}} €"`. The variant selects precision and
//! the thousands/decimal delimiters.
//!
//! All arithmetic is integer-only; a malformed numeric input degrades to a
//! bare `0` substitution rather than raising an error.

use std::sync::LazyLock;

use regex::Regex;

/// Matches the first `{{ variant }}` placeholder in a format template.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("placeholder pattern compiles"));

/// Default template when the merchant supplies none.
const DEFAULT_FORMAT: &str = "${{amount}}";

/// A money amount: integer cents, or a numeric string treated as a
/// pre-formatted integer-cents string with stray `.` separators.
#[derive(Debug, Clone)]
pub enum MoneyInput {
    /// Integer cents.
    Cents(i64),
    /// Numeric text; `.` characters are stripped before parsing.
    Text(String),
}

impl From<i64> for MoneyInput {
    fn from(cents: i64) -> Self {
        Self::Cents(cents)
    }
}

impl From<&str> for MoneyInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for MoneyInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl MoneyInput {
    /// Resolve to integer cents; `None` is the degraded (unparseable) case.
    fn cents(&self) -> Option<i64> {
        match self {
            Self::Cents(cents) => Some(*cents),
            Self::Text(text) => text.replace('.', "").trim().parse().ok(),
        }
    }
}

/// Placeholder variants and their precision/delimiter rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    Amount,
    AmountNoDecimals,
    AmountWithCommaSeparator,
    AmountNoDecimalsWithCommaSeparator,
    AmountNoDecimalsWithSpaceSeparator,
    AmountWithApostropheSeparator,
}

impl Variant {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "amount" => Some(Self::Amount),
            "amount_no_decimals" => Some(Self::AmountNoDecimals),
            "amount_with_comma_separator" => Some(Self::AmountWithCommaSeparator),
            "amount_no_decimals_with_comma_separator" => {
                Some(Self::AmountNoDecimalsWithCommaSeparator)
            }
            "amount_no_decimals_with_space_separator" => {
                Some(Self::AmountNoDecimalsWithSpaceSeparator)
            }
            "amount_with_apostrophe_separator" => Some(Self::AmountWithApostropheSeparator),
            _ => None,
        }
    }

    /// `(show_decimals, thousands_separator, decimal_separator)`
    const fn rules(self) -> (bool, &'static str, &'static str) {
        match self {
            Self::Amount => (true, ",", "."),
            Self::AmountNoDecimals => (false, ",", "."),
            Self::AmountWithCommaSeparator => (true, ".", ","),
            Self::AmountNoDecimalsWithCommaSeparator => (false, ".", ","),
            Self::AmountNoDecimalsWithSpaceSeparator => (false, " ", "."),
            Self::AmountWithApostropheSeparator => (true, "'", "."),
        }
    }
}

/// Format integer cents through a placeholder template.
///
/// The template defaults to `"${{amount}}"`. The first `{{ variant }}`
/// placeholder is substituted; an unrecognized variant substitutes the
/// empty string (the placeholder is blanked out, not an error), and a
/// template without any placeholder is returned unchanged. Unparseable
/// numeric text substitutes a bare `0`.
pub fn format_money(value: impl Into<MoneyInput>, format: Option<&str>) -> String {
    let template = format.unwrap_or(DEFAULT_FORMAT);

    let Some(captures) = PLACEHOLDER.captures(template) else {
        return template.to_string();
    };

    let substitution = match Variant::parse(&captures[1]) {
        Some(variant) => match value.into().cents() {
            Some(cents) => format_with_delimiters(cents, variant),
            None => "0".to_string(),
        },
        // Unknown variant: blank the placeholder out.
        None => String::new(),
    };

    let span = captures.get(0).expect("captures imply a full match");
    let mut out = String::with_capacity(template.len() + substitution.len());
    out.push_str(&template[..span.start()]);
    out.push_str(&substitution);
    out.push_str(&template[span.end()..]);
    out
}

/// Render cents with the variant's delimiter rules.
///
/// No-decimals variants truncate toward zero.
fn format_with_delimiters(cents: i64, variant: Variant) -> String {
    let (show_decimals, thousands, decimal) = variant.rules();

    let sign = if cents < 0 { "-" } else { "" };
    let magnitude = cents.unsigned_abs();
    let units = group_thousands(magnitude / 100, thousands);

    if show_decimals {
        format!("{sign}{units}{decimal}{:02}", magnitude % 100)
    } else {
        format!("{sign}{units}")
    }
}

/// Insert the thousands separator every three digits from the right.
fn group_thousands(n: u64, separator: &str) -> String {
    let digits = n.to_string();
    let head = digits.len() % 3;

    let mut parts = Vec::with_capacity(digits.len() / 3 + 1);
    if head > 0 {
        parts.push(&digits[..head]);
    }
    let mut i = head;
    while i < digits.len() {
        parts.push(&digits[i..i + 3]);
        i += 3;
    }
    parts.join(separator)
}
