use super::domain::{
    ApprovalRecord, AttendanceRecord, ChildAttendanceSummary, ChildRecord, FamilyTotals,
    ForecastError,
};
use super::time_in_care::classify_time_in_care;
use std::collections::HashMap;

/// Classifies every stay and sums the resulting day units per child.
pub fn count_days_attended(
    records: &[AttendanceRecord],
) -> Result<HashMap<String, ChildAttendanceSummary>, ForecastError> {
    let mut per_child: HashMap<String, ChildAttendanceSummary> = HashMap::new();

    for record in records {
        let counts = classify_time_in_care(record.time_in_care_hours).map_err(|source| {
            ForecastError::TimeInCare {
                child_id: record.child_id.clone(),
                date: record.date,
                source,
            }
        })?;

        *per_child.entry(record.child_id.clone()).or_default() += counts;
    }

    Ok(per_child)
}

/// Left join of approvals onto attendance; children with no visits get zero counts.
pub fn join_attendance(
    approvals: Vec<ApprovalRecord>,
    attendance: &HashMap<String, ChildAttendanceSummary>,
) -> Vec<ChildRecord> {
    approvals
        .into_iter()
        .map(|approval| {
            let summary = attendance
                .get(&approval.child_id)
                .copied()
                .unwrap_or_default();
            ChildRecord::from_approval(approval, summary)
        })
        .collect()
}

/// Children whose attendance was logged under a business other than the one
/// their approval pays. Rows without a business name are not compared.
pub fn business_mismatches(
    attendance: &[AttendanceRecord],
    approvals: &[ApprovalRecord],
) -> Vec<String> {
    let approved_at: HashMap<&str, &str> = approvals
        .iter()
        .map(|approval| (approval.child_id.as_str(), approval.business_name.as_str()))
        .collect();

    let mut mismatched: Vec<String> = attendance
        .iter()
        .filter(|record| {
            match (
                record.business_name.as_deref(),
                approved_at.get(record.child_id.as_str()),
            ) {
                (Some(logged), Some(approved)) => !logged.eq_ignore_ascii_case(approved),
                _ => false,
            }
        })
        .map(|record| record.child_id.clone())
        .collect();
    mismatched.sort();
    mismatched.dedup();
    mismatched
}

pub fn adjust_school_age_days(records: Vec<ChildRecord>) -> Vec<ChildRecord> {
    records.into_iter().map(adjust_child_approval).collect()
}

/// School-age children who attend more full days than approved are assumed to
/// be spending their part-day budget on full days.
pub(crate) fn adjust_child_approval(mut record: ChildRecord) -> ChildRecord {
    let approval = &record.approval;
    let extra_full_days = if approval.school_age {
        record
            .full_days_attended
            .saturating_sub(approval.full_days_approved)
    } else {
        0
    };

    record.adj_full_days_approved = approval.full_days_approved.saturating_add(extra_full_days);
    record.adj_part_days_approved = approval.part_days_approved.saturating_sub(extra_full_days);
    record
}

pub fn cap_attendance(records: Vec<ChildRecord>) -> Vec<ChildRecord> {
    records
        .into_iter()
        .map(|mut record| {
            record.full_days_attended = record.full_days_attended.min(record.adj_full_days_approved);
            record.part_days_attended = record.part_days_attended.min(record.adj_part_days_approved);
            record
        })
        .collect()
}

/// Sums adjusted approvals and attendance per case number and attaches the
/// totals to every child of the case.
pub fn calculate_family_days(records: Vec<ChildRecord>) -> Vec<ChildRecord> {
    let mut families: HashMap<String, FamilyTotals> = HashMap::new();

    for record in &records {
        let totals = families.entry(record.case_number().to_string()).or_default();
        totals.full_days_approved = totals
            .full_days_approved
            .saturating_add(record.adj_full_days_approved);
        totals.full_days_attended = totals
            .full_days_attended
            .saturating_add(record.full_days_attended);
        totals.part_days_approved = totals
            .part_days_approved
            .saturating_add(record.adj_part_days_approved);
        totals.part_days_attended = totals
            .part_days_attended
            .saturating_add(record.part_days_attended);
        totals.num_children += 1;
    }

    records
        .into_iter()
        .map(|mut record| {
            record.family = families
                .get(record.case_number())
                .copied()
                .unwrap_or_default();
            record
        })
        .collect()
}
