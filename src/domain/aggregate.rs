use crate::errors::{SelectionError, SelectionResult};

use super::vo::{SelectionFields, SelectionVo};

/// List read under the study write lock, kept for the diff in `save()`
#[derive(Debug, Clone)]
pub struct ClosureData<F> {
    pub study_uid: String,
    pub selections: Vec<SelectionVo<F>>,
}

/// Ordered selection list of one kind for one study
///
/// Position in `selections` is the 1-based order. Every mutation replaces
/// entries with new VO instances; nothing is edited in place.
#[derive(Debug, Clone)]
pub struct StudySelectionAR<F> {
    study_uid: String,
    selections: Vec<SelectionVo<F>>,
    closure_data: Option<ClosureData<F>>,
}

impl<F: SelectionFields> StudySelectionAR<F> {
    pub fn from_repository_values(
        study_uid: impl Into<String>,
        selections: Vec<SelectionVo<F>>,
    ) -> Self {
        Self {
            study_uid: study_uid.into(),
            selections,
            closure_data: None,
        }
    }

    pub fn study_uid(&self) -> &str {
        &self.study_uid
    }

    pub fn selections(&self) -> &[SelectionVo<F>] {
        &self.selections
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn has_closure_data(&self) -> bool {
        self.closure_data.is_some()
    }

    pub(crate) fn set_closure_data(&mut self, closure: ClosureData<F>) {
        self.closure_data = Some(closure);
    }

    pub(crate) fn take_closure_data(&mut self) -> Option<ClosureData<F>> {
        self.closure_data.take()
    }

    fn position(&self, selection_uid: &str) -> SelectionResult<usize> {
        self.selections
            .iter()
            .position(|vo| vo.study_selection_uid == selection_uid)
            .ok_or_else(|| SelectionError::SelectionNotFound(selection_uid.to_string()))
    }

    fn check_belongs_here(&self, vo: &SelectionVo<F>) -> SelectionResult<()> {
        if vo.study_uid != self.study_uid {
            return Err(SelectionError::Validation(format!(
                "selection {} belongs to study {}, not {}",
                vo.study_selection_uid, vo.study_uid, self.study_uid
            )));
        }
        vo.fields.validate()
    }

    pub fn add_selection(&mut self, vo: SelectionVo<F>) -> SelectionResult<()> {
        self.check_belongs_here(&vo)?;
        if self.position(&vo.study_selection_uid).is_ok() {
            return Err(SelectionError::DuplicateSelection(vo.study_selection_uid));
        }
        self.selections.push(vo);
        Ok(())
    }

    pub fn remove_selection(&mut self, selection_uid: &str) -> SelectionResult<()> {
        let index = self.position(selection_uid)?;
        self.selections.remove(index);
        Ok(())
    }

    pub fn update_selection(&mut self, vo: SelectionVo<F>) -> SelectionResult<()> {
        self.check_belongs_here(&vo)?;
        let index = self.position(&vo.study_selection_uid)?;
        self.selections[index] = vo;
        Ok(())
    }

    /// Move a selection to `new_order`, clamped to `1..=len`
    pub fn set_new_order_for_selection(
        &mut self,
        selection_uid: &str,
        new_order: i32,
    ) -> SelectionResult<()> {
        let index = self.position(selection_uid)?;
        let max_order = self.selections.len() as i32;
        let target = new_order.clamp(1, max_order) as usize - 1;
        let vo = self.selections.remove(index);
        self.selections.insert(target, vo);
        Ok(())
    }

    /// The selection and its 1-based order
    pub fn get_specific_selection(
        &self,
        selection_uid: &str,
    ) -> SelectionResult<(&SelectionVo<F>, usize)> {
        let index = self.position(selection_uid)?;
        Ok((&self.selections[index], index + 1))
    }

    pub fn accept_version(&mut self, selection_uid: &str, author: &str) -> SelectionResult<()> {
        let index = self.position(selection_uid)?;
        self.selections[index] = self.selections[index].accepted(author);
        Ok(())
    }
}
