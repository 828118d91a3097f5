use crate::domain::state::{LivingCounts, MatchState, Winner};

/// Winner for the given living role counts, if the match is decided.
///
/// Impostors win at parity, not only once every crewmate is dead.
pub fn evaluate(counts: LivingCounts) -> Option<Winner> {
    if counts.impostors == 0 {
        Some(Winner::Crewmates)
    } else if counts.impostors >= counts.crewmates {
        Some(Winner::Impostor)
    } else {
        None
    }
}

/// Evaluate a live match. A finished match yields `None` so callers never
/// finish it twice.
pub fn check(state: &MatchState) -> Option<Winner> {
    if state.is_finished() {
        return None;
    }
    evaluate(state.living_counts())
}
