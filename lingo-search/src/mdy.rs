//! US-style `M/D[/Y]` dates.
//!
//! Years may be written with two or four digits, or left out entirely. A
//! missing year is inferred so that the date never lands after the reference
//! date: `8/1` typed on 2000-07-01 means 1999-08-01.
//!
//! Two-digit years pivot at 69: `00..=68` become `2000..=2068` and `69..=99`
//! become `1969..=1999`.

use jiff::{Timestamp, civil::Date, tz::TimeZone};

/// Structural view of a `M/D[/Y]` string, before calendar validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mdy {
    pub month: i8,
    pub day: i8,
    /// Four-digit year, already expanded from two digits when needed.
    pub year: Option<i16>,
}

impl Mdy {
    /// Matches the whole of `text` against `M/D`, `M/D/YY` or `M/D/YYYY`.
    pub fn scan(text: &str) -> Option<Self> {
        let (month, rest) = digits(text, 1, 2)?;
        let rest = rest.strip_prefix('/')?;
        let (day, rest) = digits(rest, 1, 2)?;
        if rest.is_empty() {
            return Some(Self {
                month: month as i8,
                day: day as i8,
                year: None,
            });
        }

        let rest = rest.strip_prefix('/')?;
        let year = match rest.len() {
            2 => expand_two_digit_year(digits(rest, 2, 2)?.0 as u8),
            4 => digits(rest, 4, 4)?.0 as i16,
            _ => return None,
        };
        Some(Self {
            month: month as i8,
            day: day as i8,
            year: Some(year),
        })
    }

    /// Turns the parts into a calendar date, inferring a missing year from
    /// `relative_to`. Impossible dates (`2/30`, `13/1`) resolve to `None`.
    pub fn resolve(self, relative_to: Date) -> Option<Date> {
        let year = match self.year {
            Some(year) => year,
            None => infer_year(self.month, self.day, relative_to),
        };
        Date::new(year, self.month, self.day).ok()
    }
}

/// Parses `term` as a `M/D[/Y]` date.
///
/// ```
/// use jiff::civil::date;
/// use lingo_search::mdy;
///
/// let reference = date(2000, 7, 1);
/// assert_eq!(mdy::parse("6/1/2015", reference), Some(date(2015, 6, 1)));
/// assert_eq!(mdy::parse("6/1/89", reference), Some(date(1989, 6, 1)));
/// assert_eq!(mdy::parse("7/1", reference), Some(date(2000, 7, 1)));
/// assert_eq!(mdy::parse("8/1", reference), Some(date(1999, 8, 1)));
/// assert_eq!(mdy::parse("2/30", reference), None);
/// ```
pub fn parse(term: &str, relative_to: Date) -> Option<Date> {
    Mdy::scan(term)?.resolve(relative_to)
}

/// Today's date in the system time zone.
pub fn today() -> Date {
    Timestamp::now().to_zoned(TimeZone::system()).date()
}

pub fn expand_two_digit_year(year: u8) -> i16 {
    let year = i16::from(year % 100);
    if year < 69 { 2000 + year } else { 1900 + year }
}

fn infer_year(month: i8, day: i8, reference: Date) -> i16 {
    if (month, day) <= (reference.month(), reference.day()) {
        reference.year()
    } else {
        reference.year() - 1
    }
}

/// Reads a run of `min..=max` ASCII digits that fills the next field.
fn digits(text: &str, min: usize, max: usize) -> Option<(u16, &str)> {
    let len = text.bytes().take_while(u8::is_ascii_digit).count();
    if len < min || len > max {
        return None;
    }
    let value = text[..len].parse().ok()?;
    Some((value, &text[len..]))
}
