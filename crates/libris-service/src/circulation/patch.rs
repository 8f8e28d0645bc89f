//! Planning for administrative loan overrides.
//!
//! The override path is an escape hatch: most field writes are applied as
//! given. The planning step decides the parts that are not free-form —
//! return-date defaulting, the copy transition that accompanies a close,
//! and the policy-gated reopen.

use chrono::{DateTime, Utc};

use libris_core::{AppError, AppResult};
use libris_entity::copy::CopyStatus;
use libris_entity::loan::{LoanPatch, LoanRecord, LoanStatus};

/// The resolved effect of an administrative patch.
#[derive(Debug, Clone)]
pub struct AdminPatchPlan {
    /// Field changes to write to the ledger.
    pub patch: LoanPatch,
    /// Null out the return date (reopen only).
    pub clear_return_date: bool,
    /// Status to write to the referenced copy, when the override carries
    /// a copy transition.
    pub copy_transition: Option<CopyStatus>,
}

/// Decide what an administrative patch does to the record/copy pair.
///
/// `reopen_updates_copy` is the configured policy for the
/// `returned -> checked_out` direction: when false the record is written
/// as given and the copy is left untouched; when true the reopen also
/// flips the copy back to `checked_out` (the caller must re-validate copy
/// availability under its transaction).
pub fn plan_admin_patch(
    record: &LoanRecord,
    patch: &LoanPatch,
    now: DateTime<Utc>,
    reopen_updates_copy: bool,
) -> AppResult<AdminPatchPlan> {
    if patch.is_empty() {
        return Err(AppError::validation("Update contains no fields"));
    }

    let effective_due = patch.due_date.unwrap_or(record.due_date);
    if effective_due < record.borrow_date {
        return Err(AppError::validation(format!(
            "Due date {} is before the borrow date {}",
            effective_due, record.borrow_date
        )));
    }

    let mut plan = AdminPatchPlan {
        patch: patch.clone(),
        clear_return_date: false,
        copy_transition: None,
    };

    match (record.status, patch.status) {
        (LoanStatus::CheckedOut, Some(LoanStatus::Returned)) => {
            plan.copy_transition = Some(CopyStatus::Available);
            if plan.patch.return_date.is_none() {
                plan.patch.return_date = Some(now);
            }
        }
        (LoanStatus::Returned, Some(LoanStatus::CheckedOut)) => {
            plan.clear_return_date = true;
            if reopen_updates_copy {
                plan.copy_transition = Some(CopyStatus::CheckedOut);
            }
        }
        _ => {}
    }

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn record(status: LoanStatus) -> LoanRecord {
        let now = Utc::now();
        LoanRecord {
            record_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            copy_id: 1,
            borrow_date: now - Duration::days(10),
            due_date: now + Duration::days(20),
            return_date: (status == LoanStatus::Returned).then_some(now - Duration::days(1)),
            status,
        }
    }

    #[test]
    fn test_empty_patch_rejected() {
        let err = plan_admin_patch(
            &record(LoanStatus::CheckedOut),
            &LoanPatch::default(),
            Utc::now(),
            false,
        )
        .unwrap_err();
        assert_eq!(err.kind, libris_core::error::ErrorKind::Validation);
    }

    #[test]
    fn test_due_before_borrow_rejected() {
        let rec = record(LoanStatus::CheckedOut);
        let patch = LoanPatch {
            due_date: Some(rec.borrow_date - Duration::days(1)),
            ..Default::default()
        };
        assert!(plan_admin_patch(&rec, &patch, Utc::now(), false).is_err());
    }

    #[test]
    fn test_close_defaults_return_date_and_frees_copy() {
        let now = Utc::now();
        let patch = LoanPatch {
            status: Some(LoanStatus::Returned),
            ..Default::default()
        };
        let plan = plan_admin_patch(&record(LoanStatus::CheckedOut), &patch, now, false).unwrap();
        assert_eq!(plan.patch.return_date, Some(now));
        assert_eq!(plan.copy_transition, Some(CopyStatus::Available));
    }

    #[test]
    fn test_close_keeps_explicit_return_date() {
        let now = Utc::now();
        let explicit = now - Duration::hours(3);
        let patch = LoanPatch {
            return_date: Some(explicit),
            status: Some(LoanStatus::Returned),
            ..Default::default()
        };
        let plan = plan_admin_patch(&record(LoanStatus::CheckedOut), &patch, now, false).unwrap();
        assert_eq!(plan.patch.return_date, Some(explicit));
    }

    #[test]
    fn test_reopen_respects_policy() {
        let patch = LoanPatch {
            status: Some(LoanStatus::CheckedOut),
            ..Default::default()
        };

        let plan = plan_admin_patch(&record(LoanStatus::Returned), &patch, Utc::now(), false).unwrap();
        assert!(plan.clear_return_date);
        assert_eq!(plan.copy_transition, None);

        let plan = plan_admin_patch(&record(LoanStatus::Returned), &patch, Utc::now(), true).unwrap();
        assert_eq!(plan.copy_transition, Some(CopyStatus::CheckedOut));
    }

    #[test]
    fn test_due_date_only_patch_has_no_copy_transition() {
        let rec = record(LoanStatus::CheckedOut);
        let patch = LoanPatch {
            due_date: Some(rec.due_date + Duration::days(14)),
            ..Default::default()
        };
        let plan = plan_admin_patch(&rec, &patch, Utc::now(), false).unwrap();
        assert_eq!(plan.copy_transition, None);
        assert!(!plan.clear_return_date);
    }
}
