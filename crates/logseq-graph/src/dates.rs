//! Journal date and block time patterns.
//!
//! Logseq configures dates with date-fns style patterns such as
//! `yyyy_MM_dd` or `MMM do, yyyy`. [`DateFormat`] compiles a pattern once
//! and can then format and parse [`chrono`] values with it.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

use crate::error::{GraphError, Result};

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Year4,
    Year2,
    MonthName,
    MonthShort,
    Month2,
    Month,
    Day2,
    DayOrdinal,
    Day,
    WeekdayName,
    WeekdayShort,
    Hour24Padded,
    Hour24,
    Hour12Padded,
    Hour12,
    Minute2,
    Minute,
    Second2,
    Second,
    AmPm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Field(Field),
    Literal(String),
}

/// Pattern letters, longest first so `yyyy` wins over `yy`.
const PATTERNS: &[(&str, Field)] = &[
    ("yyyy", Field::Year4),
    ("yy", Field::Year2),
    ("MMMM", Field::MonthName),
    ("MMM", Field::MonthShort),
    ("MM", Field::Month2),
    ("M", Field::Month),
    ("dd", Field::Day2),
    ("do", Field::DayOrdinal),
    ("d", Field::Day),
    ("EEEE", Field::WeekdayName),
    ("EEE", Field::WeekdayShort),
    ("E", Field::WeekdayShort),
    ("HH", Field::Hour24Padded),
    ("H", Field::Hour24),
    ("hh", Field::Hour12Padded),
    ("h", Field::Hour12),
    ("mm", Field::Minute2),
    ("m", Field::Minute),
    ("ss", Field::Second2),
    ("s", Field::Second),
    ("a", Field::AmPm),
];

/// A compiled date or time pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    pattern: String,
    tokens: Vec<Token>,
}

#[derive(Debug, Default)]
struct Parsed {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    hour: Option<u32>,
    minute: Option<u32>,
    second: Option<u32>,
    pm: Option<bool>,
}

impl DateFormat {
    /// Compiles `pattern`. Text in single quotes is literal, `''` is a quote.
    pub fn new(pattern: &str) -> Result<Self> {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut rest = pattern;

        while !rest.is_empty() {
            if let Some(quoted) = rest.strip_prefix('\'') {
                if let Some(after) = quoted.strip_prefix('\'') {
                    literal.push('\'');
                    rest = after;
                    continue;
                }
                let end = quoted.find('\'').ok_or_else(|| GraphError::DateFormat {
                    format: pattern.to_string(),
                    reason: "unterminated quote".to_string(),
                })?;
                literal.push_str(&quoted[..end]);
                rest = &quoted[end + 1..];
                continue;
            }

            if let Some(&(letters, field)) = PATTERNS.iter().find(|(p, _)| rest.starts_with(p)) {
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(Token::Field(field));
                rest = &rest[letters.len()..];
                continue;
            }

            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                literal.push(c);
            }
            rest = chars.as_str();
        }
        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Ok(Self {
            pattern: pattern.to_string(),
            tokens,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn format_date(&self, date: NaiveDate) -> String {
        self.format(Some(date), None)
    }

    pub fn format_time(&self, time: NaiveTime) -> String {
        self.format(None, Some(time))
    }

    /// Formats whichever fields the pattern uses. Missing values format as
    /// zero.
    pub fn format(&self, date: Option<NaiveDate>, time: Option<NaiveTime>) -> String {
        let mut out = String::new();
        let (year, month, day) = date.map_or((0, 1, 1), |d| (d.year(), d.month(), d.day()));
        let weekday = date.map_or(0, |d| d.weekday().num_days_from_monday() as usize);
        let (hour, minute, second) = time.map_or((0, 0, 0), |t| (t.hour(), t.minute(), t.second()));
        let hour12 = match hour % 12 {
            0 => 12,
            h => h,
        };

        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Field(field) => match field {
                    Field::Year4 => out.push_str(&format!("{year:04}")),
                    Field::Year2 => out.push_str(&format!("{:02}", year.rem_euclid(100))),
                    Field::MonthName => out.push_str(MONTHS[month as usize - 1]),
                    Field::MonthShort => out.push_str(&MONTHS[month as usize - 1][..3]),
                    Field::Month2 => out.push_str(&format!("{month:02}")),
                    Field::Month => out.push_str(&month.to_string()),
                    Field::Day2 => out.push_str(&format!("{day:02}")),
                    Field::DayOrdinal => {
                        out.push_str(&day.to_string());
                        out.push_str(ordinal_suffix(day));
                    }
                    Field::Day => out.push_str(&day.to_string()),
                    Field::WeekdayName => out.push_str(WEEKDAYS[weekday]),
                    Field::WeekdayShort => out.push_str(&WEEKDAYS[weekday][..3]),
                    Field::Hour24Padded => out.push_str(&format!("{hour:02}")),
                    Field::Hour24 => out.push_str(&hour.to_string()),
                    Field::Hour12Padded => out.push_str(&format!("{hour12:02}")),
                    Field::Hour12 => out.push_str(&hour12.to_string()),
                    Field::Minute2 => out.push_str(&format!("{minute:02}")),
                    Field::Minute => out.push_str(&minute.to_string()),
                    Field::Second2 => out.push_str(&format!("{second:02}")),
                    Field::Second => out.push_str(&second.to_string()),
                    Field::AmPm => out.push_str(if hour < 12 { "AM" } else { "PM" }),
                },
            }
        }
        out
    }

    /// Parses a date; the whole input must match the pattern.
    pub fn parse_date(&self, input: &str) -> Option<NaiveDate> {
        let parsed = self.parse(input)?;
        NaiveDate::from_ymd_opt(parsed.year?, parsed.month?, parsed.day?)
    }

    /// Parses a time of day. Seconds default to zero.
    pub fn parse_time(&self, input: &str) -> Option<NaiveTime> {
        let parsed = self.parse(input)?;
        let mut hour = parsed.hour?;
        match parsed.pm {
            Some(true) if hour < 12 => hour += 12,
            Some(false) if hour == 12 => hour = 0,
            _ => {}
        }
        NaiveTime::from_hms_opt(hour, parsed.minute.unwrap_or(0), parsed.second.unwrap_or(0))
    }

    fn parse(&self, input: &str) -> Option<Parsed> {
        let mut parsed = Parsed::default();
        let mut rest = input;

        for token in &self.tokens {
            match token {
                Token::Literal(text) => rest = rest.strip_prefix(text.as_str())?,
                Token::Field(field) => {
                    rest = match field {
                        Field::Year4 => take_number(rest, 4, 4, &mut parsed.year)?,
                        Field::Year2 => {
                            let mut year = None;
                            let rest = take_number(rest, 2, 2, &mut year)?;
                            parsed.year = year.map(|y: i32| 2000 + y);
                            rest
                        }
                        Field::MonthName => take_name(rest, &MONTHS, None, &mut parsed.month)?,
                        Field::MonthShort => take_name(rest, &MONTHS, Some(3), &mut parsed.month)?,
                        Field::Month2 => take_number(rest, 2, 2, &mut parsed.month)?,
                        Field::Month => take_number(rest, 1, 2, &mut parsed.month)?,
                        Field::Day2 => take_number(rest, 2, 2, &mut parsed.day)?,
                        Field::DayOrdinal => {
                            let rest = take_number(rest, 1, 2, &mut parsed.day)?;
                            ["st", "nd", "rd", "th"]
                                .iter()
                                .find_map(|suffix| rest.strip_prefix(suffix))?
                        }
                        Field::Day => take_number(rest, 1, 2, &mut parsed.day)?,
                        Field::WeekdayName => take_name(rest, &WEEKDAYS, None, &mut None)?,
                        Field::WeekdayShort => take_name(rest, &WEEKDAYS, Some(3), &mut None)?,
                        Field::Hour24Padded | Field::Hour12Padded => {
                            take_number(rest, 2, 2, &mut parsed.hour)?
                        }
                        Field::Hour24 | Field::Hour12 => take_number(rest, 1, 2, &mut parsed.hour)?,
                        Field::Minute2 => take_number(rest, 2, 2, &mut parsed.minute)?,
                        Field::Minute => take_number(rest, 1, 2, &mut parsed.minute)?,
                        Field::Second2 => take_number(rest, 2, 2, &mut parsed.second)?,
                        Field::Second => take_number(rest, 1, 2, &mut parsed.second)?,
                        Field::AmPm => {
                            let upper = rest.get(..2)?.to_ascii_uppercase();
                            parsed.pm = match upper.as_str() {
                                "AM" => Some(false),
                                "PM" => Some(true),
                                _ => return None,
                            };
                            &rest[2..]
                        }
                    }
                }
            }
        }

        rest.is_empty().then_some(parsed)
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Reads between `min` and `max` ASCII digits.
fn take_number<'a, T: std::str::FromStr>(
    input: &'a str,
    min: usize,
    max: usize,
    out: &mut Option<T>,
) -> Option<&'a str> {
    let len = input
        .bytes()
        .take(max)
        .take_while(u8::is_ascii_digit)
        .count();
    if len < min {
        return None;
    }
    *out = Some(input[..len].parse().ok()?);
    Some(&input[len..])
}

/// Reads a month or weekday name, or its first `short` letters. Stores the
/// one-based position of the name.
fn take_name<'a>(
    input: &'a str,
    names: &[&str],
    short: Option<usize>,
    out: &mut Option<u32>,
) -> Option<&'a str> {
    names.iter().enumerate().find_map(|(i, name)| {
        let name = short.map_or(*name, |n| &name[..n]);
        let head = input.get(..name.len())?;
        if !head.eq_ignore_ascii_case(name) {
            return None;
        }
        *out = Some(i as u32 + 1);
        Some(&input[name.len()..])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case("yyyy_MM_dd", "2024_03_05")]
    #[case("MMM do, yyyy", "Mar 5th, 2024")]
    #[case("MMMM d, yyyy", "March 5, 2024")]
    #[case("EEEE, dd.MM.yy", "Tuesday, 05.03.24")]
    #[case("E, MM/dd/yyyy", "Tue, 03/05/2024")]
    #[case("yyyy-MM-dd'T'", "2024-03-05T")]
    #[case("yyyyMMdd", "20240305")]
    fn formats_and_parses_dates(#[case] pattern: &str, #[case] text: &str) {
        let format = DateFormat::new(pattern).unwrap();
        assert_eq!(format.format_date(date(2024, 3, 5)), text);
        assert_eq!(format.parse_date(text), Some(date(2024, 3, 5)));
    }

    #[rstest]
    #[case(1, "1st")]
    #[case(2, "2nd")]
    #[case(3, "3rd")]
    #[case(11, "11th")]
    #[case(12, "12th")]
    #[case(22, "22nd")]
    #[case(31, "31st")]
    fn ordinal_days(#[case] day: u32, #[case] text: &str) {
        let format = DateFormat::new("do").unwrap();
        assert_eq!(format.format_date(date(2024, 1, day)), text);
    }

    #[rstest]
    #[case("HH:mm", "07:05", 7, 5)]
    #[case("H:mm", "19:30", 19, 30)]
    #[case("h:mm a", "7:30 PM", 19, 30)]
    #[case("h:mm a", "12:15 AM", 0, 15)]
    #[case("hh:mm a", "12:00 PM", 12, 0)]
    fn formats_and_parses_times(
        #[case] pattern: &str,
        #[case] text: &str,
        #[case] hour: u32,
        #[case] minute: u32,
    ) {
        let format = DateFormat::new(pattern).unwrap();
        let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap();
        assert_eq!(format.format_time(time), text);
        assert_eq!(format.parse_time(text), Some(time));
    }

    #[rstest]
    #[case("2024_3_05")]
    #[case("2024_03_05x")]
    #[case("2024_02_30")]
    #[case("notes")]
    fn rejects_non_matching_input(#[case] text: &str) {
        let format = DateFormat::new("yyyy_MM_dd").unwrap();
        assert_eq!(format.parse_date(text), None);
    }

    #[test]
    fn quotes_escape_pattern_letters() {
        let format = DateFormat::new("'day' d 'of' MMMM, ''yy").unwrap();
        assert_eq!(format.format_date(date(2023, 7, 4)), "day 4 of July, '23");
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        assert!(matches!(
            DateFormat::new("yyyy 'oops"),
            Err(GraphError::DateFormat { .. })
        ));
    }
}
