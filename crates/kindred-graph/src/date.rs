//! Partial-date normalization and display.
//!
//! Dates are free text at the edges and canonical strings inside the store.
//! Three shapes are recognized: a four-digit year, a year and month, and a
//! full date. Input components may omit zero padding (`2020-3-5`); canonical
//! output always pads (`2020-03-05`). Day values are range-checked against
//! `1..=31` only, with no calendar check against the month's length.
//!
//! Anything that is not one of the three shapes passes through trimmed under
//! [`DatePolicy::Lenient`], and is rejected under [`DatePolicy::Strict`].

use core::fmt;

use crate::error::GraphError;

/// Month abbreviations used by [`display_form`], January first.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// ---------------------------------------------------------------------------
// PartialDate
// ---------------------------------------------------------------------------

/// A recognized date of year, year-month, or full-date precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartialDate {
    /// Four-digit year.
    pub year: u16,
    /// Month in `1..=12`, if known.
    pub month: Option<u8>,
    /// Day in `1..=31`, if known. Only present together with a month.
    pub day: Option<u8>,
}

/// How strictly component widths are checked while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Widths {
    /// One or two digits for month and day (user input).
    Loose,
    /// Exactly two digits for month and day (canonical form).
    Canonical,
}

impl PartialDate {
    /// Recognize user input. Surrounding whitespace is ignored and month/day
    /// may be written with one or two digits.
    pub fn parse(input: &str) -> Option<Self> {
        Self::parse_with(input.trim(), Widths::Loose)
    }

    /// Recognize canonical form only (`YYYY`, `YYYY-MM`, `YYYY-MM-DD`).
    pub fn parse_canonical(input: &str) -> Option<Self> {
        Self::parse_with(input, Widths::Canonical)
    }

    fn parse_with(input: &str, widths: Widths) -> Option<Self> {
        let parts: Vec<&str> = input.split('-').collect();
        match parts.as_slice() {
            [year] => Some(Self {
                year: parse_year(year)?,
                month: None,
                day: None,
            }),
            [year, month] => Some(Self {
                year: parse_year(year)?,
                month: Some(parse_component(month, widths, 12)?),
                day: None,
            }),
            [year, month, day] => Some(Self {
                year: parse_year(year)?,
                month: Some(parse_component(month, widths, 12)?),
                day: Some(parse_component(day, widths, 31)?),
            }),
            _ => None,
        }
    }

    /// Human-readable rendering: `2020`, `Mar 2020`, or `5 Mar 2020`.
    pub fn display_form(self) -> String {
        let Some(month) = self.month else {
            return format!("{:04}", self.year);
        };
        let name = month_abbreviation(month);
        match self.day {
            Some(day) => format!("{day} {name} {:04}", self.year),
            None => format!("{name} {:04}", self.year),
        }
    }
}

/// Canonical form.
impl fmt::Display for PartialDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.year)?;
        if let Some(month) = self.month {
            write!(f, "-{month:02}")?;
        }
        if let Some(day) = self.day {
            write!(f, "-{day:02}")?;
        }
        Ok(())
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_year(s: &str) -> Option<u16> {
    if s.len() != 4 || !is_digits(s) {
        return None;
    }
    s.parse().ok()
}

fn parse_component(s: &str, widths: Widths, max: u8) -> Option<u8> {
    let width_ok = match widths {
        Widths::Loose => (1..=2).contains(&s.len()),
        Widths::Canonical => s.len() == 2,
    };
    if !width_ok || !is_digits(s) {
        return None;
    }
    let value: u8 = s.parse().ok()?;
    (1..=max).contains(&value).then_some(value)
}

fn month_abbreviation(month: u8) -> &'static str {
    usize::from(month)
        .checked_sub(1)
        .and_then(|index| MONTH_ABBREVIATIONS.get(index))
        .copied()
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Normalize free-text date input to canonical form.
///
/// Empty or whitespace-only input yields an empty string. Unrecognized
/// shapes (including out-of-range months and days) are returned trimmed.
pub fn normalize(input: &str) -> String {
    let trimmed = input.trim();
    PartialDate::parse(trimmed).map_or_else(|| trimmed.to_owned(), |date| date.to_string())
}

/// Like [`normalize`], but unrecognized non-empty input is an error.
pub fn normalize_strict(input: &str) -> Result<String, GraphError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    PartialDate::parse(trimmed)
        .map(|date| date.to_string())
        .ok_or_else(|| GraphError::InvalidDate {
            input: trimmed.to_owned(),
        })
}

/// Render a stored date for display. Non-canonical text passes through.
pub fn display_form(stored: &str) -> String {
    PartialDate::parse_canonical(stored).map_or_else(|| stored.to_owned(), |date| date.display_form())
}

/// Which normalizer applies to dates entered through the family-tree facade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DatePolicy {
    /// Unrecognized text is stored verbatim (trimmed).
    #[default]
    Lenient,
    /// Unrecognized text is rejected with [`GraphError::InvalidDate`].
    Strict,
}

impl DatePolicy {
    /// Select the policy from a `strict` flag.
    pub const fn from_strict(strict: bool) -> Self {
        if strict { Self::Strict } else { Self::Lenient }
    }

    /// Normalize `input` under this policy.
    pub fn apply(self, input: &str) -> Result<String, GraphError> {
        match self {
            Self::Lenient => Ok(normalize(input)),
            Self::Strict => normalize_strict(input),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_month_and_day() {
        assert_eq!(normalize("2020-3-5"), "2020-03-05");
        assert_eq!(normalize(" 1999-7 "), "1999-07");
        assert_eq!(normalize("1850"), "1850");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize_strict("  "), Ok(String::new()));
    }

    #[test]
    fn out_of_range_components_pass_through() {
        assert_eq!(normalize("2020-13-01"), "2020-13-01");
        assert_eq!(normalize("2020-00"), "2020-00");
        assert_eq!(normalize("2020-02-32"), "2020-02-32");
        // No month-length check.
        assert_eq!(normalize("2021-2-31"), "2021-02-31");
    }

    #[test]
    fn unrecognized_shapes_are_trimmed_verbatim() {
        assert_eq!(normalize("  circa 1900 "), "circa 1900");
        assert_eq!(normalize("20-01-2020"), "20-01-2020");
        assert_eq!(normalize("2020-001"), "2020-001");
    }

    #[test]
    fn strict_policy_rejects_unrecognized() {
        assert_eq!(
            DatePolicy::Strict.apply(" about 1900"),
            Err(GraphError::InvalidDate {
                input: String::from("about 1900")
            })
        );
        assert_eq!(DatePolicy::Strict.apply("1900-1"), Ok(String::from("1900-01")));
        assert_eq!(DatePolicy::Lenient.apply(" about 1900"), Ok(String::from("about 1900")));
    }

    #[test]
    fn display_forms() {
        assert_eq!(display_form("1850"), "1850");
        assert_eq!(display_form("2020-03"), "Mar 2020");
        assert_eq!(display_form("2020-03-05"), "5 Mar 2020");
        assert_eq!(display_form("1999-12-25"), "25 Dec 1999");
        assert_eq!(display_form(""), "");
    }

    #[test]
    fn display_passes_through_non_canonical() {
        assert_eq!(display_form("2020-3-5"), "2020-3-5");
        assert_eq!(display_form("2020-13"), "2020-13");
        assert_eq!(display_form("circa 1900"), "circa 1900");
    }
}
