use crate::core::sizing::SizingResult;
use indexmap::IndexMap;
use parking_lot::RwLock;

/// Holds the single live sizing result per project.
///
/// Recalculation is a wholesale overwrite, never a merge, so a stale field
/// cannot survive a parameter change; the superseded result is returned to
/// the caller and otherwise discarded. The lock serialises concurrent
/// recalculations of the same project, so a result is never read
/// half-written.
#[derive(Debug, Default)]
pub struct SizingResultStore {
    results: RwLock<IndexMap<String, SizingResult>>,
}

impl SizingResultStore {
    pub fn new() -> Self {
        Default::default()
    }

    /// Store the latest result for its project, returning the superseded
    /// one if there was any.
    pub fn upsert(&self, result: SizingResult) -> Option<SizingResult> {
        self.results
            .write()
            .insert(result.project_id.clone(), result)
    }

    pub fn get(&self, project_id: &str) -> Option<SizingResult> {
        self.results.read().get(project_id).cloned()
    }

    /// Drop a project's result. Project deletion itself is owned by an
    /// external collaborator; this only clears the sizing state.
    pub fn remove(&self, project_id: &str) -> Option<SizingResult> {
        self.results.write().shift_remove(project_id)
    }

    pub fn len(&self) -> usize {
        self.results.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.read().is_empty()
    }
}
