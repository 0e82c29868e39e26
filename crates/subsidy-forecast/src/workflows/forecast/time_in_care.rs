use super::domain::{DayCounts, DomainError};

const PART_DAY_LIMIT: f64 = 5.0;
const FULL_DAY_LIMIT: f64 = 12.0;
const EXTENDED_DAY_LIMIT: f64 = 17.0;
const MAX_HOURS_IN_DAY: f64 = 24.0;

/// Converts a stay length into billable day units.
///
/// Stays between 12 and 17 hours earn one full day and one part day; stays of
/// 17 hours or more earn two full days.
pub fn classify_time_in_care(hours: f64) -> Result<DayCounts, DomainError> {
    if !hours.is_finite() || !(0.0..=MAX_HOURS_IN_DAY).contains(&hours) {
        return Err(DomainError { hours });
    }

    let counts = if hours < PART_DAY_LIMIT {
        DayCounts::new(0, 1)
    } else if hours <= FULL_DAY_LIMIT {
        DayCounts::new(1, 0)
    } else if hours < EXTENDED_DAY_LIMIT {
        DayCounts::new(1, 1)
    } else {
        DayCounts::new(2, 0)
    };

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(hours: f64) -> (u32, u32) {
        let counts = classify_time_in_care(hours).expect("hours within range");
        (counts.full_days, counts.part_days)
    }

    #[test]
    fn short_stays_count_as_part_days() {
        assert_eq!(counts(0.0), (0, 1));
        assert_eq!(counts(3.0 + 34.0 / 60.0), (0, 1));
        assert_eq!(counts(4.99), (0, 1));
    }

    #[test]
    fn standard_stays_count_as_full_days() {
        assert_eq!(counts(5.0), (1, 0));
        assert_eq!(counts(10.0 + 26.0 / 60.0), (1, 0));
        assert_eq!(counts(12.0), (1, 0));
    }

    #[test]
    fn extended_stays_earn_both_units() {
        assert_eq!(counts(12.01), (1, 1));
        assert_eq!(counts(13.75), (1, 1));
        assert_eq!(counts(16.99), (1, 1));
    }

    #[test]
    fn overnight_stays_earn_two_full_days() {
        assert_eq!(counts(17.0), (2, 0));
        assert_eq!(counts(20.9), (2, 0));
        assert_eq!(counts(24.0), (2, 0));
    }

    #[test]
    fn out_of_range_hours_are_rejected() {
        assert_eq!(
            classify_time_in_care(24.5),
            Err(DomainError { hours: 24.5 })
        );
        assert!(classify_time_in_care(-1.0).is_err());
        assert!(classify_time_in_care(f64::NAN).is_err());
    }

    #[test]
    fn no_stay_earns_more_than_two_units() {
        let mut hours = 0.0;
        while hours <= 24.0 {
            let counts = classify_time_in_care(hours).expect("in range");
            assert!(counts.full_days + counts.part_days <= 2, "{hours} hours");
            hours += 0.25;
        }
    }
}
