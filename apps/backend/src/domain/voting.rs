//! Ballot tally and ejection rule.

use serde::{Deserialize, Serialize};

use crate::domain::state::{MatchState, ParticipantId};

/// One tally bucket. `target: None` is the skip bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyEntry {
    pub target: Option<ParticipantId>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteResult {
    /// Buckets in first-seen ballot order.
    pub tally: Vec<TallyEntry>,
    pub ejected: Option<ParticipantId>,
}

/// Tally ballots and pick the participant to eject, if any.
///
/// A strictly greater count takes the lead, an equal count clears it, a
/// lesser one is ignored. Only a sole leader that is not skip is ejected,
/// so any tie at the maximum (skip included) ejects nobody.
pub fn resolve<I>(ballots: I) -> VoteResult
where
    I: IntoIterator<Item = Option<ParticipantId>>,
{
    let mut tally: Vec<TallyEntry> = Vec::new();
    for ballot in ballots {
        match tally.iter_mut().find(|e| e.target == ballot) {
            Some(entry) => entry.count += 1,
            None => tally.push(TallyEntry {
                target: ballot,
                count: 1,
            }),
        }
    }

    let mut max = 0;
    let mut leader: Option<Option<ParticipantId>> = None;
    for entry in &tally {
        if entry.count > max {
            max = entry.count;
            leader = Some(entry.target);
        } else if entry.count == max {
            leader = None;
        }
    }

    VoteResult {
        tally,
        ejected: leader.flatten(),
    }
}

/// Ballots of the living roster. Non-voters count as skip.
pub fn ballots(state: &MatchState) -> Vec<Option<ParticipantId>> {
    state
        .living()
        .map(|p| if p.has_voted { p.vote_target } else { None })
        .collect()
}
