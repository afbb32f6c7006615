use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
}

// INR per one unit of each foreign currency.
#[derive(Debug, Clone, PartialEq)]
pub struct FxTable {
    rates: BTreeMap<Currency, f64>,
}

impl Default for FxTable {
    fn default() -> Self {
        Self::new(83.0, 90.0, 105.0)
    }
}

impl FxTable {
    pub fn new(usd: f64, eur: f64, gbp: f64) -> Self {
        let rates = BTreeMap::from([
            (Currency::Usd, usd),
            (Currency::Eur, eur),
            (Currency::Gbp, gbp),
        ]);
        Self { rates }
    }

    pub fn rate(&self, currency: Currency) -> f64 {
        self.rates.get(&currency).copied().unwrap_or(1.0)
    }
}

fn number_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\d,.]+").expect("static regex"))
}

fn marker(pattern: &'static str, cell: &'static OnceLock<Regex>) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static regex"))
}

fn has_inr(text: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    marker(r"(?i)₹|INR", &RE).is_match(text)
}

fn detect_foreign(text: &str) -> Option<Currency> {
    static USD: OnceLock<Regex> = OnceLock::new();
    static EUR: OnceLock<Regex> = OnceLock::new();
    static GBP: OnceLock<Regex> = OnceLock::new();

    if marker(r"(?i)\$|USD", &USD).is_match(text) {
        Some(Currency::Usd)
    } else if marker(r"(?i)€|EUR", &EUR).is_match(text) {
        Some(Currency::Eur)
    } else if marker(r"(?i)£|GBP", &GBP).is_match(text) {
        Some(Currency::Gbp)
    } else {
        None
    }
}

fn detect_unit(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    if lower.contains("month") {
        Some("month")
    } else if ["year", "annum", "annual"].iter().any(|u| lower.contains(u)) {
        Some("year")
    } else {
        None
    }
}

// "1.5.2" reads as 1.5 and "." as nothing.
fn leading_number(token: &str) -> Option<f64> {
    let cleaned: String = token.chars().filter(|c| *c != ',').collect();
    let mut end = 0;
    let mut seen_dot = false;
    for (idx, c) in cleaned.char_indices() {
        match c {
            '0'..='9' => end = idx + 1,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
    }
    cleaned[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Formats a whole rupee amount with Indian digit grouping: `₹1,66,000`.
pub fn format_inr(amount: f64) -> String {
    let rounded = amount.round().max(0.0) as u64;
    let digits = rounded.to_string();
    if digits.len() <= 3 {
        return format!("₹{digits}");
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, right) = rest.split_at(rest.len() - 2);
        groups.push(right);
        rest = left;
    }
    groups.push(rest);
    groups.reverse();

    format!("₹{},{tail}", groups.join(","))
}

pub fn to_display_currency(pay: &str, fx: &FxTable) -> String {
    let tokens: Vec<&str> = number_token()
        .find_iter(pay)
        .map(|m| m.as_str())
        .collect();
    if tokens.is_empty() {
        return pay.to_string();
    }

    let rate = if has_inr(pay) {
        1.0
    } else {
        detect_foreign(pay).map_or(1.0, |c| fx.rate(c))
    };

    let values: Vec<f64> = tokens
        .iter()
        .filter_map(|t| leading_number(t))
        .map(|n| n * rate)
        .collect();

    let display = match values.as_slice() {
        [] => return pay.to_string(),
        [single] => format_inr(*single),
        [first, .., last] => format!("{} - {}", format_inr(*first), format_inr(*last)),
    };

    match detect_unit(pay) {
        Some(unit) => format!("{display}/{unit}"),
        None => display,
    }
}
