//! Reconcile the compiled model with live per-place state.
//!
//! The contract exposes its marking one place at a time. [`merge_state`]
//! walks the model's places and writes each answer at that place's own
//! offset, so the result lines up with the place vector regardless of the
//! order the contract lists places in.

use crate::error::StateError;
use crate::model::ModelPetriNet;

/// Query every place's marking and collect it into an offset-aligned vector.
///
/// The first failing query aborts the merge; nothing partial is returned.
pub fn merge_state<E, F>(model: &ModelPetriNet, mut query: F) -> Result<Vec<i64>, StateError<E>>
where
    F: FnMut(u8) -> Result<i64, E>,
{
    let len = model.places.len();
    let mut state = vec![0i64; len];
    let mut claimed: Vec<Option<&str>> = vec![None; len];
    for place in &model.places {
        let idx = usize::from(place.offset);
        if idx >= len {
            return Err(StateError::OffsetOutOfRange {
                label: place.label.clone(),
                offset: place.offset,
                len,
            });
        }
        if let Some(first) = claimed[idx] {
            return Err(StateError::DuplicateOffset {
                label: place.label.clone(),
                first: first.to_string(),
                offset: place.offset,
            });
        }
        claimed[idx] = Some(&place.label);
        state[idx] = query(place.offset).map_err(|reason| StateError::Query {
            offset: place.offset,
            reason,
        })?;
    }
    Ok(state)
}

/// Transition labels indexed by transition offset.
///
/// An offset no transition claims stays `None`. Offsets past the end of
/// the vector are ignored.
pub fn action_labels(model: &ModelPetriNet) -> Vec<Option<String>> {
    let mut actions = vec![None; model.transitions.len()];
    for t in &model.transitions {
        if let Some(slot) = actions.get_mut(usize::from(t.offset)) {
            *slot = Some(t.label.clone());
        }
    }
    actions
}
