use super::normalizer::{clean_name, parse_date, parse_time_of_day};
use super::{empty_string_as_none, identify_child, parse_number, ParseError, ParseErrorKind};
use crate::workflows::forecast::domain::AttendanceRecord;
use chrono::NaiveDateTime;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct AttendanceRow {
    #[serde(
        rename = "Child ID",
        alias = "child_id",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    child_id: Option<String>,
    #[serde(
        rename = "First name",
        alias = "first_name",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    first_name: Option<String>,
    #[serde(
        rename = "Last name",
        alias = "last_name",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    last_name: Option<String>,
    #[serde(
        rename = "Date",
        alias = "date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    date: Option<String>,
    #[serde(
        rename = "School account",
        alias = "Business name",
        alias = "Business Name",
        alias = "biz_name",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    business_name: Option<String>,
    #[serde(
        rename = "Hours checked in",
        alias = "hours_checked_in",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    hours_checked_in: Option<String>,
    #[serde(
        rename = "Minutes checked in",
        alias = "mins_checked_in",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    minutes_checked_in: Option<String>,
    #[serde(
        rename = "Check-in time",
        alias = "check_in_time",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    check_in_time: Option<String>,
    #[serde(
        rename = "Check-in date",
        alias = "check_in_date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    check_in_date: Option<String>,
    #[serde(
        rename = "Check-out time",
        alias = "check_out_time",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    check_out_time: Option<String>,
    #[serde(
        rename = "Check-out date",
        alias = "check_out_date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    check_out_date: Option<String>,
}

impl AttendanceRow {
    pub(crate) fn into_record(self, line: u64) -> Result<AttendanceRecord, ParseError> {
        let child_id = identify_child(
            line,
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.child_id.as_deref(),
        )?;

        let fail = |kind: ParseErrorKind| ParseError::new(line, Some(child_id.clone()), kind);

        let date_field = match (&self.date, &self.check_in_date) {
            (Some(date), _) => ("Date", date),
            (None, Some(date)) => ("Check-in date", date),
            (None, None) => return Err(fail(ParseErrorKind::MissingField { field: "Date" })),
        };
        let date = parse_date(date_field.1).ok_or_else(|| {
            fail(ParseErrorKind::InvalidDate {
                field: date_field.0,
                value: date_field.1.clone(),
            })
        })?;

        let time_in_care_hours = if self.hours_checked_in.is_some()
            || self.minutes_checked_in.is_some()
        {
            let hours = self
                .hours_checked_in
                .as_deref()
                .map(|value| parse_number("Hours checked in", value))
                .transpose()
                .map_err(&fail)?
                .unwrap_or(0.0);
            let minutes = self
                .minutes_checked_in
                .as_deref()
                .map(|value| parse_number("Minutes checked in", value))
                .transpose()
                .map_err(&fail)?
                .unwrap_or(0.0);
            hours + minutes / 60.0
        } else {
            let check_in = Self::timestamp(
                ("Check-in time", self.check_in_time.as_deref()),
                ("Check-in date", self.check_in_date.as_deref()),
                date,
            );
            let check_out = Self::timestamp(
                ("Check-out time", self.check_out_time.as_deref()),
                ("Check-out date", self.check_out_date.as_deref()),
                check_in
                    .as_ref()
                    .ok()
                    .copied()
                    .flatten()
                    .map(|ts| ts.date())
                    .unwrap_or(date),
            );

            match (check_in.map_err(&fail)?, check_out.map_err(&fail)?) {
                (Some(check_in), Some(check_out)) => {
                    let minutes = (check_out - check_in).num_minutes();
                    if minutes < 0 {
                        return Err(fail(ParseErrorKind::NegativeDuration));
                    }
                    minutes as f64 / 60.0
                }
                _ => return Err(fail(ParseErrorKind::MissingDuration)),
            }
        };

        Ok(AttendanceRecord {
            child_id,
            business_name: self.business_name.as_deref().map(clean_name),
            date,
            time_in_care_hours,
        })
    }

    /// `Ok(None)` when the time column is blank.
    fn timestamp(
        time: (&'static str, Option<&str>),
        date: (&'static str, Option<&str>),
        fallback_date: chrono::NaiveDate,
    ) -> Result<Option<NaiveDateTime>, ParseErrorKind> {
        let Some(raw_time) = time.1 else {
            return Ok(None);
        };

        let time_of_day =
            parse_time_of_day(raw_time).ok_or_else(|| ParseErrorKind::InvalidTime {
                field: time.0,
                value: raw_time.to_string(),
            })?;

        let day = match date.1 {
            Some(raw_date) => parse_date(raw_date).ok_or_else(|| ParseErrorKind::InvalidDate {
                field: date.0,
                value: raw_date.to_string(),
            })?,
            None => fallback_date,
        };

        Ok(Some(day.and_time(time_of_day)))
    }
}
