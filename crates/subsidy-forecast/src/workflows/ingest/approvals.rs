use super::normalizer::{clean_name, parse_days, parse_eligibility, parse_flag, parse_money};
use super::{empty_string_as_none, identify_child, ParseError, ParseErrorKind};
use crate::workflows::forecast::domain::{ApprovalRecord, Copay, Eligibility, RateTable};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct ApprovalRow {
    #[serde(
        rename = "Business Name",
        alias = "Business name",
        alias = "School account",
        alias = "biz_name",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    business_name: Option<String>,
    #[serde(
        rename = "First name",
        alias = "First name**",
        alias = "first_name",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    first_name: Option<String>,
    #[serde(
        rename = "Last name",
        alias = "Last name**",
        alias = "last_name",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    last_name: Option<String>,
    #[serde(
        rename = "Child ID",
        alias = "child_id",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    child_id: Option<String>,
    #[serde(
        rename = "School age",
        alias = "School age**",
        alias = "school_age",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    school_age: Option<String>,
    #[serde(
        rename = "Case number",
        alias = "Case number**",
        alias = "case_number",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    case_number: Option<String>,
    #[serde(
        rename = "Full days approved",
        alias = "Full days approved**",
        alias = "full_days_approved",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    full_days_approved: Option<String>,
    #[serde(
        rename = "Part days (or school days) approved",
        alias = "Part days (or school days) approved**",
        alias = "Part days approved",
        alias = "part_days_approved",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    part_days_approved: Option<String>,
    #[serde(
        rename = "Total full day rate",
        alias = "Full day rate",
        alias = "full_day_rate",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    full_day_rate: Option<String>,
    #[serde(
        rename = "Total part day rate",
        alias = "Part day rate",
        alias = "part_day_rate",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    part_day_rate: Option<String>,
    #[serde(
        rename = "Full day quality add-on",
        alias = "Full day quality add on",
        alias = "full_day_quality_add_on",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    full_day_quality_add_on: Option<String>,
    #[serde(
        rename = "Part day quality add-on",
        alias = "Part day quality add on",
        alias = "part_day_quality_add_on",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    part_day_quality_add_on: Option<String>,
    #[serde(
        rename = "Co-pay per child",
        alias = "Copay per child",
        alias = "copay",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    copay_per_child: Option<String>,
    #[serde(
        rename = "Family co-pay",
        alias = "Family copay",
        alias = "family_copay",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    family_copay: Option<String>,
    #[serde(
        rename = "Maximum monthly payment",
        alias = "max_monthly_payment",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    max_monthly_payment: Option<String>,
    #[serde(
        rename = "Eligibility",
        alias = "Eligibility status",
        alias = "eligibility",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    eligibility: Option<String>,
}

impl ApprovalRow {
    pub(crate) fn into_record(self, line: u64) -> Result<ApprovalRecord, ParseError> {
        let child_id = identify_child(
            line,
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.child_id.as_deref(),
        )?;

        let fail = |kind: ParseErrorKind| ParseError::new(line, Some(child_id.clone()), kind);

        let case_number = self
            .case_number
            .as_deref()
            .map(str::trim)
            .ok_or_else(|| fail(ParseErrorKind::MissingField { field: "Case number" }))?
            .to_string();
        let business_name = self
            .business_name
            .as_deref()
            .map(clean_name)
            .ok_or_else(|| fail(ParseErrorKind::MissingField { field: "Business Name" }))?;

        let school_age = match self.school_age.as_deref() {
            Some(value) => parse_flag(value).ok_or_else(|| {
                fail(ParseErrorKind::InvalidFlag {
                    field: "School age",
                    value: value.to_string(),
                })
            })?,
            None => false,
        };

        let days = |field: &'static str, value: Option<&str>| match value {
            Some(raw) => parse_days(raw).ok_or_else(|| {
                fail(ParseErrorKind::InvalidNumber {
                    field,
                    value: raw.to_string(),
                })
            }),
            None => Ok(0),
        };
        let money = |field: &'static str, value: Option<&str>| {
            value
                .map(|raw| {
                    parse_money(raw).ok_or_else(|| {
                        fail(ParseErrorKind::InvalidNumber {
                            field,
                            value: raw.to_string(),
                        })
                    })
                })
                .transpose()
        };
        let rate = |field: &'static str, value: Option<&str>| match money(field, value)? {
            Some(amount) if amount < 0.0 => Err(fail(ParseErrorKind::NegativeAmount {
                field,
                value: value.unwrap_or_default().to_string(),
            })),
            amount => Ok(amount),
        };
        let required_rate = |field: &'static str, value: Option<&str>| {
            rate(field, value)?.ok_or_else(|| fail(ParseErrorKind::MissingField { field }))
        };

        let full_days_approved = days("Full days approved", self.full_days_approved.as_deref())?;
        let part_days_approved = days(
            "Part days (or school days) approved",
            self.part_days_approved.as_deref(),
        )?;

        let rates = RateTable {
            full_day_rate: required_rate("Total full day rate", self.full_day_rate.as_deref())?,
            part_day_rate: required_rate("Total part day rate", self.part_day_rate.as_deref())?,
            full_day_quality_add_on: rate(
                "Full day quality add-on",
                self.full_day_quality_add_on.as_deref(),
            )?,
            part_day_quality_add_on: rate(
                "Part day quality add-on",
                self.part_day_quality_add_on.as_deref(),
            )?,
        };

        let copay = match (
            money("Co-pay per child", self.copay_per_child.as_deref())?,
            money("Family co-pay", self.family_copay.as_deref())?,
        ) {
            (Some(amount), _) => Some(Copay::PerChild(amount)),
            (None, Some(amount)) => Some(Copay::Family(amount)),
            (None, None) => None,
        };

        let max_monthly_payment = money(
            "Maximum monthly payment",
            self.max_monthly_payment.as_deref(),
        )?;

        let eligibility = self
            .eligibility
            .as_deref()
            .map(parse_eligibility)
            .unwrap_or(Eligibility::Eligible);

        Ok(ApprovalRecord {
            business_name,
            case_number,
            first_name: self.first_name.as_deref().map(clean_name).unwrap_or_default(),
            last_name: self.last_name.as_deref().map(clean_name).unwrap_or_default(),
            child_id,
            school_age,
            full_days_approved,
            part_days_approved,
            rates,
            copay,
            max_monthly_payment,
            eligibility,
        })
    }
}
