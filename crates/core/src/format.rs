//! Display helpers shared by every view.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Format an amount as US currency, e.g. `$1,234.56` or `-$5.00`.
#[must_use]
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}${grouped}.{cents}")
}

/// Long-form date, e.g. `January 5, 2026`.
#[must_use]
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Cut `text` to at most `max_chars` characters, appending `...` when cut.
#[must_use]
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", text.get(..byte_index).unwrap_or(text)),
        None => text.to_string(),
    }
}

/// One star in a five-star rating display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Star {
    Full,
    Half,
    Empty,
}

/// Break a 0-5 rating into five stars; a fraction of .5 or more shows a half star.
#[must_use]
pub fn star_rating(rating: f64) -> [Star; 5] {
    let rating = rating.clamp(0.0, 5.0);
    let full = rating.floor();
    let has_half = rating - full >= 0.5;

    let mut stars = [Star::Empty; 5];
    for (position, star) in (1_u8..).zip(stars.iter_mut()) {
        let position = f64::from(position);
        if position <= full {
            *star = Star::Full;
        } else if has_half && position - 1.0 <= full {
            *star = Star::Half;
        }
    }
    stars
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Decimal::ZERO), "$0.00");
        assert_eq!(format_currency(Decimal::new(599, 2)), "$5.99");
        assert_eq!(format_currency(Decimal::new(123_456_789, 2)), "$1,234,567.89");
        assert_eq!(format_currency(Decimal::new(100_000, 2)), "$1,000.00");
        assert_eq!(format_currency(Decimal::new(-500, 2)), "-$5.00");
        assert_eq!(format_currency(Decimal::new(12_345, 3)), "$12.35");
    }

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2026, 1, 5, 15, 30, 0).unwrap();
        assert_eq!(format_date(&date), "January 5, 2026");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("exactly", 7), "exactly");
        assert_eq!(truncate_text("truncate me", 8), "truncate...");
        assert_eq!(truncate_text("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn test_star_rating() {
        use Star::{Empty, Full, Half};
        assert_eq!(star_rating(3.0), [Full, Full, Full, Empty, Empty]);
        assert_eq!(star_rating(3.5), [Full, Full, Full, Half, Empty]);
        assert_eq!(star_rating(4.4), [Full, Full, Full, Full, Empty]);
        assert_eq!(star_rating(0.0), [Empty; 5]);
        assert_eq!(star_rating(9.0), [Full; 5]);
    }
}
