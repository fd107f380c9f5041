use itertools::Itertools;

use crate::assignment::Assignment;
use crate::error::InvalidInputError;
use crate::exclusions::Exclusions;
use crate::participant::{Participant, ParticipantId};

/// Smallest group a draw is attempted for. Two people could only swap gifts.
pub const MIN_PARTICIPANTS: usize = 3;

/// Validated draw input with participants replaced by their index.
#[derive(Debug, Clone)]
pub struct DrawProblem {
    ids: Vec<ParticipantId>,
    /// `candidates[giver]` lists the recipient indices `giver` may draw, ascending.
    candidates: Vec<Vec<usize>>,
}

impl DrawProblem {
    pub fn new(
        participants: &[Participant],
        exclusions: &Exclusions,
    ) -> Result<Self, InvalidInputError> {
        if participants.len() < MIN_PARTICIPANTS {
            return Err(InvalidInputError::TooFewParticipants {
                count: participants.len(),
                minimum: MIN_PARTICIPANTS,
            });
        }
        if let Some(duplicate) = participants.iter().map(|p| &p.id).duplicates().next() {
            return Err(InvalidInputError::DuplicateParticipant(duplicate.clone()));
        }
        exclusions.check_references(participants)?;

        let ids: Vec<ParticipantId> = participants.iter().map(|p| p.id.clone()).collect();
        let candidates = ids
            .iter()
            .map(|giver| {
                ids.iter()
                    .positions(|recipient| !exclusions.excludes(giver.as_str(), recipient.as_str()))
                    .collect()
            })
            .collect();

        Ok(Self { ids, candidates })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn id(&self, index: usize) -> &ParticipantId {
        &self.ids[index]
    }

    #[must_use]
    pub fn candidates(&self, giver: usize) -> &[usize] {
        &self.candidates[giver]
    }

    /// The first giver nobody is allowed to be drawn by, if any.
    #[must_use]
    pub fn giver_without_candidates(&self) -> Option<usize> {
        self.candidates.iter().position(Vec::is_empty)
    }

    /// Turns `recipients[giver] = recipient` back into ids.
    #[must_use]
    pub fn to_assignment(&self, recipients: &[usize]) -> Assignment {
        recipients
            .iter()
            .enumerate()
            .map(|(giver, &recipient)| (self.ids[giver].clone(), self.ids[recipient].clone()))
            .collect()
    }
}
