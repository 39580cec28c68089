use crate::error::{ImporterError, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// A calendar value parsed from an export cell: always a date, with a time
/// of day when the source carried one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportDate {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
}

impl ExportDate {
    /// The value as a timestamp, midnight when the source had no time part.
    pub fn into_datetime(self) -> NaiveDateTime {
        let time = self.time.unwrap_or_else(|| NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        self.date.and_time(time)
    }
}

/// Parses the two date forms the exports use: `D/M/Y` and
/// `D,M,Y,H,Min,S`. The delimiter is any run of non-alphanumeric
/// characters, so `15/03/2020` and `15.03.2020 10:30:00` both split
/// cleanly. Months are 1-based.
pub fn parse(input: &str) -> Result<ExportDate> {
    let parts: Vec<&str> = input
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|p| !p.is_empty())
        .collect();

    if parts.len() != 3 && parts.len() != 6 {
        return Err(format_error(
            input,
            format!("expected 3 or 6 components, found {}", parts.len()),
        ));
    }

    let mut numbers = Vec::with_capacity(parts.len());
    for part in &parts {
        let n: u32 = part
            .parse()
            .map_err(|_| format_error(input, format!("non-numeric component '{part}'")))?;
        numbers.push(n);
    }

    let (day, month, year) = (numbers[0], numbers[1], numbers[2]);
    let date = NaiveDate::from_ymd_opt(year as i32, month, day)
        .ok_or_else(|| format_error(input, "day/month out of range".to_string()))?;

    let time = if numbers.len() == 6 {
        Some(
            NaiveTime::from_hms_opt(numbers[3], numbers[4], numbers[5])
                .ok_or_else(|| format_error(input, "time of day out of range".to_string()))?,
        )
    } else {
        None
    };

    Ok(ExportDate { date, time })
}

fn format_error(input: &str, reason: String) -> ImporterError {
    ImporterError::DateFormat {
        input: input.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_date_only() {
        let parsed = parse("15/03/2020").unwrap();
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2020, 3, 15).unwrap());
        assert_eq!(parsed.time, None);
    }

    #[test]
    fn parses_date_with_time() {
        let parsed = parse("15,03,2020,10,30,00").unwrap();
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2020, 3, 15).unwrap());
        assert_eq!(parsed.time, NaiveTime::from_hms_opt(10, 30, 0));
        assert_eq!(
            parsed.into_datetime(),
            NaiveDate::from_ymd_opt(2020, 3, 15)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap()
        );
    }

    #[test]
    fn accepts_mixed_delimiters() {
        let parsed = parse("1.6.2019 08:05:59").unwrap();
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2019, 6, 1).unwrap());
        assert_eq!(parsed.time, NaiveTime::from_hms_opt(8, 5, 59));
    }

    #[test]
    fn rejects_wrong_component_count() {
        assert!(parse("15/03").is_err());
        assert!(parse("15/03/2020/10").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn rejects_non_numeric_components() {
        assert!(parse("15/Mar/2020").is_err());
    }

    #[test]
    fn rejects_out_of_range_dates() {
        assert!(parse("32/01/2020").is_err());
        assert!(parse("15/13/2020").is_err());
        assert!(parse("15,03,2020,25,00,00").is_err());
    }

    #[test]
    fn date_only_converts_to_midnight() {
        let parsed = parse("2/1/2021").unwrap();
        assert_eq!(
            parsed.into_datetime(),
            NaiveDate::from_ymd_opt(2021, 1, 2)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }
}
