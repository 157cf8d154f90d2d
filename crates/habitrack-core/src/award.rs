//! Awarding badges against a store.
//!
//! Loads a habit's history, asks the evaluator what is newly earned and saves
//! each proposal once. The evaluator itself never touches storage.

use chrono::NaiveDate;

use crate::badges::evaluate_badges;
use crate::error::{CoreError, Result, ValidationError};
use crate::habit::Badge;
use crate::storage::HabitStore;

/// Evaluate and persist any badges `habit_id` has newly earned as of `today`.
///
/// Returns the badges that were saved, in evaluation order. A proposal that
/// turns out to exist by the time it is written is skipped.
///
/// # Errors
/// Propagates store errors, including [`CoreError::InvalidDate`] from a
/// check-in whose day cannot be read.
pub fn award_badges<S: HabitStore + ?Sized>(
    store: &S,
    habit_id: &str,
    today: NaiveDate,
) -> Result<Vec<Badge>> {
    let check_ins = store.load_check_ins(habit_id, None)?;
    let mut existing = store.load_existing_badge_names(habit_id)?;

    let proposals = evaluate_badges(&check_ins, &existing, today);
    tracing::debug!(
        habit_id,
        check_ins = check_ins.len(),
        proposals = proposals.len(),
        "evaluated badges"
    );

    let mut awarded = Vec::with_capacity(proposals.len());
    for proposal in proposals {
        if !existing.insert(proposal.name.clone()) {
            continue;
        }
        match store.save_badge(habit_id, &proposal) {
            Ok(badge) => {
                tracing::info!(habit_id, badge = %badge.name, "badge awarded");
                awarded.push(badge);
            }
            Err(CoreError::Validation(ValidationError::DuplicateBadge { name, .. })) => {
                tracing::debug!(habit_id, badge = %name, "badge already saved, skipping");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(awarded)
}
