use crate::emotion::Emotion;

/// One step of the per-modality hidden state.
///
/// An absent observation keeps the prior state; any present observation
/// replaces it. No damping happens here: window inertia lives in the
/// aggregation policy.
pub fn advance(observation: Option<Emotion>, prior_state: Emotion) -> Emotion {
    match observation {
        None => prior_state,
        Some(observed) if observed == prior_state => prior_state,
        Some(observed) => observed,
    }
}
