use super::domain::{AttendanceCategory, ChildRecord, Copay, RevenueEstimate};

/// Portion of the copay charged against this child.
pub fn copay_share(copay: Option<Copay>, num_children: u32) -> f64 {
    match copay {
        Some(Copay::PerChild(amount)) => amount,
        Some(Copay::Family(amount)) => amount / num_children.max(1) as f64,
        None => 0.0,
    }
}

/// Guaranteed, potential and maximum revenue for one classified child.
///
/// Attended days are billed only up to the adjusted approval, so the three
/// figures always satisfy `min <= potential <= max`.
pub fn estimate_revenue(
    record: &ChildRecord,
    category: AttendanceCategory,
    days_left: u32,
) -> RevenueEstimate {
    let copay = copay_share(record.approval.copay, record.family.num_children);
    let full_rate = record.approval.rates.full_rate();
    let part_rate = record.approval.rates.part_rate();

    let billable_full = record.full_days_attended.min(record.adj_full_days_approved);
    let billable_part = record.part_days_attended.min(record.adj_part_days_approved);

    let approved_revenue = record.adj_full_days_approved as f64 * full_rate
        + record.adj_part_days_approved as f64 * part_rate;
    let attended_revenue = billable_full as f64 * full_rate + billable_part as f64 * part_rate;

    let min_revenue = match category {
        AttendanceCategory::SureBet => approved_revenue,
        _ => attended_revenue,
    };

    let potential_revenue = match category {
        AttendanceCategory::NotMet => {
            let full_days_difference = record.adj_full_days_approved - billable_full;
            let part_days_difference = record.adj_part_days_approved - billable_part;

            let potential_full_days = days_left.min(full_days_difference);
            let potential_part_days = if full_days_difference < days_left {
                (days_left - full_days_difference).min(part_days_difference)
            } else {
                0
            };

            (billable_full + potential_full_days) as f64 * full_rate
                + (billable_part + potential_part_days) as f64 * part_rate
        }
        _ => approved_revenue,
    };

    RevenueEstimate {
        min_revenue: min_revenue - copay,
        potential_revenue: potential_revenue - copay,
        max_revenue: approved_revenue - copay,
    }
}

/// Extra revenue if every unused approved part day were billed as a full day.
pub fn e_learning_revenue_potential(record: &ChildRecord) -> f64 {
    if !record.approval.school_age || record.adj_part_days_approved <= record.part_days_attended {
        return 0.0;
    }

    let unused_part_days = record.adj_part_days_approved - record.part_days_attended;
    let rate_difference =
        (record.approval.rates.full_rate() - record.approval.rates.part_rate()).max(0.0);
    unused_part_days as f64 * rate_difference
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::forecast::domain::{
        ApprovalRecord, ChildAttendanceSummary, Eligibility, FamilyTotals, RateTable,
    };

    fn record(approved: (u32, u32), attended: (u32, u32), school_age: bool) -> ChildRecord {
        let approval = ApprovalRecord {
            business_name: "Lil Baby Ducklings".to_string(),
            case_number: "01".to_string(),
            first_name: "Cory".to_string(),
            last_name: "Booker".to_string(),
            child_id: "CoryBooker".to_string(),
            school_age,
            full_days_approved: approved.0,
            part_days_approved: approved.1,
            rates: RateTable::new(20.0, 10.0),
            copay: None,
            max_monthly_payment: None,
            eligibility: Eligibility::Eligible,
        };
        let mut record = ChildRecord::from_approval(
            approval,
            ChildAttendanceSummary {
                full_days_attended: attended.0,
                part_days_attended: attended.1,
            },
        );
        record.family = FamilyTotals {
            num_children: 1,
            ..FamilyTotals::default()
        };
        record
    }

    #[test]
    fn sure_bet_guarantees_the_full_approval() {
        let child = record((10, 4), (6, 1), false);
        let revenue = estimate_revenue(&child, AttendanceCategory::SureBet, 5);
        assert_eq!(revenue.min_revenue, 240.0);
        assert_eq!(revenue.potential_revenue, 240.0);
        assert_eq!(revenue.max_revenue, 240.0);
    }

    #[test]
    fn other_categories_guarantee_attended_days_only() {
        let child = record((10, 4), (6, 1), false);
        for category in [
            AttendanceCategory::OnTrack,
            AttendanceCategory::AtRisk,
            AttendanceCategory::NotEnoughInfo,
        ] {
            let revenue = estimate_revenue(&child, category, 5);
            assert_eq!(revenue.min_revenue, 130.0, "{category:?}");
            assert_eq!(revenue.potential_revenue, 240.0, "{category:?}");
        }
    }

    #[test]
    fn not_met_projects_remaining_days_full_days_first() {
        // 4 full days outstanding, 6 days left: 4 full + 2 of the 3 outstanding part days
        let child = record((10, 4), (6, 1), false);
        let revenue = estimate_revenue(&child, AttendanceCategory::NotMet, 6);
        assert_eq!(revenue.potential_revenue, 10.0 * 20.0 + 3.0 * 10.0);

        // fewer days left than outstanding full days: no part days projected
        let revenue = estimate_revenue(&child, AttendanceCategory::NotMet, 3);
        assert_eq!(revenue.potential_revenue, 9.0 * 20.0 + 1.0 * 10.0);
    }

    #[test]
    fn copay_is_subtracted_and_family_copay_is_shared() {
        let mut child = record((10, 0), (10, 0), false);
        child.approval.copay = Some(Copay::PerChild(15.0));
        let revenue = estimate_revenue(&child, AttendanceCategory::SureBet, 0);
        assert_eq!(revenue.max_revenue, 185.0);

        child.approval.copay = Some(Copay::Family(30.0));
        child.family.num_children = 3;
        let revenue = estimate_revenue(&child, AttendanceCategory::SureBet, 0);
        assert_eq!(revenue.max_revenue, 190.0);
    }

    #[test]
    fn overage_is_never_billed_beyond_approval() {
        let child = record((5, 2), (9, 4), false);
        let revenue = estimate_revenue(&child, AttendanceCategory::OnTrack, 3);
        assert_eq!(revenue.min_revenue, revenue.max_revenue);
    }

    #[test]
    fn revenue_ordering_holds_for_every_category() {
        for category in [
            AttendanceCategory::NotEnoughInfo,
            AttendanceCategory::SureBet,
            AttendanceCategory::NotMet,
            AttendanceCategory::AtRisk,
            AttendanceCategory::OnTrack,
        ] {
            for days_left in [0, 3, 12, 30] {
                for attended_full in 0..=12 {
                    for attended_part in 0..=6 {
                        let mut child = record((10, 5), (attended_full, attended_part), true);
                        child.approval.copay = Some(Copay::PerChild(7.5));
                        let revenue = estimate_revenue(&child, category, days_left);
                        assert!(revenue.min_revenue <= revenue.potential_revenue);
                        assert!(revenue.potential_revenue <= revenue.max_revenue);
                    }
                }
            }
        }
    }

    #[test]
    fn e_learning_upside_counts_unused_part_days() {
        let cases = [
            (true, 3, 20.0),
            (true, 5, 0.0),
            (false, 3, 0.0),
            (false, 5, 0.0),
        ];

        for (school_age, part_attended, expected) in cases {
            let child = record((0, 5), (0, part_attended), school_age);
            assert_eq!(e_learning_revenue_potential(&child), expected);
        }
    }

    #[test]
    fn e_learning_upside_is_never_negative() {
        let mut child = record((0, 5), (0, 1), true);
        child.approval.rates = RateTable::new(10.0, 25.0);
        assert_eq!(e_learning_revenue_potential(&child), 0.0);
    }
}
