//! Positional reconciliation of a selection list
//!
//! Compares the list read under the write lock (closure data) with the
//! desired list, position by position (1-based). Two entries at the same
//! position are equal when [`SelectionVo::same_content`] holds, so rebuilt but
//! unchanged entries produce no work and a moved entry always does.

use std::collections::HashSet;

use super::action::ActionType;
use super::vo::{SelectionFields, SelectionVo};

/// Previous entry that loses its membership in the current study value
#[derive(Debug)]
pub struct Removal<'a, F> {
    pub order: usize,
    pub vo: &'a SelectionVo<F>,
    /// `Delete` when the uid is gone from the desired list, `Edit` otherwise
    pub action: ActionType,
}

/// Desired entry written as a new selection row
#[derive(Debug)]
pub struct Addition<'a, F> {
    pub order: usize,
    pub vo: &'a SelectionVo<F>,
}

#[derive(Debug)]
pub struct SelectionDiff<'a, F> {
    pub removals: Vec<Removal<'a, F>>,
    pub additions: Vec<Addition<'a, F>>,
}

impl<F> SelectionDiff<'_, F> {
    pub fn is_empty(&self) -> bool {
        self.removals.is_empty() && self.additions.is_empty()
    }
}

pub fn compute_diff<'a, F: SelectionFields>(
    previous: &'a [SelectionVo<F>],
    desired: &'a [SelectionVo<F>],
) -> SelectionDiff<'a, F> {
    let desired_uids: HashSet<&str> = desired
        .iter()
        .map(|vo| vo.study_selection_uid.as_str())
        .collect();

    let classify = |vo: &SelectionVo<F>| {
        if desired_uids.contains(vo.study_selection_uid.as_str()) {
            ActionType::Edit
        } else {
            ActionType::Delete
        }
    };

    let mut removals = Vec::new();
    let mut additions = Vec::new();

    for position in 0..previous.len().max(desired.len()) {
        let order = position + 1;
        match (previous.get(position), desired.get(position)) {
            (Some(old), Some(new)) => {
                if !old.same_content(new) {
                    removals.push(Removal {
                        order,
                        vo: old,
                        action: classify(old),
                    });
                    additions.push(Addition { order, vo: new });
                }
            }
            (Some(old), None) => removals.push(Removal {
                order,
                vo: old,
                action: classify(old),
            }),
            (None, Some(new)) => additions.push(Addition { order, vo: new }),
            (None, None) => unreachable!("position is below the longer list length"),
        }
    }

    SelectionDiff {
        removals,
        additions,
    }
}

/// First uid that occurs more than once in `selections`
pub fn find_duplicate_uid<F>(selections: &[SelectionVo<F>]) -> Option<&str> {
    let mut seen = HashSet::new();
    selections
        .iter()
        .map(|vo| vo.study_selection_uid.as_str())
        .find(|uid| !seen.insert(*uid))
}
