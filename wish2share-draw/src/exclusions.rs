use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{ExclusionRuleError, InvalidInputError};
use crate::participant::{Participant, ParticipantId};

/// Directional exclusion rules: `giver -> recipients the giver must not draw`.
///
/// "A excludes B" forbids A drawing B but says nothing about B drawing A. Use
/// [`Exclusions::exclude_mutually`] for partners. Drawing yourself is always
/// forbidden, whether or not it is stored here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Exclusions(BTreeMap<ParticipantId, BTreeSet<ParticipantId>>);

impl Exclusions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forbids `giver` from drawing `recipient`. Returns whether the rule is new.
    pub fn exclude(
        &mut self,
        giver: impl Into<ParticipantId>,
        recipient: impl Into<ParticipantId>,
    ) -> bool {
        self.0.entry(giver.into()).or_default().insert(recipient.into())
    }

    pub fn exclude_mutually(&mut self, a: impl Into<ParticipantId>, b: impl Into<ParticipantId>) {
        let (a, b) = (a.into(), b.into());
        self.exclude(a.clone(), b.clone());
        self.exclude(b, a);
    }

    /// Removes a single rule. Returns whether it existed.
    pub fn allow(&mut self, giver: &str, recipient: &str) -> bool {
        let Some(excluded) = self.0.get_mut(giver) else {
            return false;
        };
        let removed = excluded.remove(recipient);
        if excluded.is_empty() {
            self.0.remove(giver);
        }
        removed
    }

    /// Drops every rule in which `id` appears on either side.
    pub fn forget(&mut self, id: &str) {
        self.0.remove(id);
        self.0.retain(|_, excluded| {
            excluded.remove(id);
            !excluded.is_empty()
        });
    }

    /// Whether `giver` may not draw `recipient`. Always true for `giver == recipient`.
    #[must_use]
    pub fn excludes(&self, giver: &str, recipient: &str) -> bool {
        giver == recipient
            || self
                .0
                .get(giver)
                .is_some_and(|excluded| excluded.contains(recipient))
    }

    /// The stored rules of `giver`, without the implicit self exclusion.
    pub fn excluded_by<'a>(&'a self, giver: &str) -> impl Iterator<Item = &'a ParticipantId> + 'a {
        self.0.get(giver).into_iter().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, &BTreeSet<ParticipantId>)> {
        self.0.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeSet::is_empty)
    }

    /// Rejects rules that mention ids outside of `participants`.
    pub fn check_references(&self, participants: &[Participant]) -> Result<(), InvalidInputError> {
        let known: BTreeSet<&str> = participants.iter().map(|p| p.id.as_str()).collect();
        for (giver, excluded) in &self.0 {
            if !known.contains(giver.as_str()) {
                return Err(InvalidInputError::UnknownGiver(giver.clone()));
            }
            if let Some(recipient) = excluded.iter().find(|r| !known.contains(r.as_str())) {
                return Err(InvalidInputError::UnknownRecipient {
                    giver: giver.clone(),
                    recipient: recipient.clone(),
                });
            }
        }
        Ok(())
    }

    /// Number of people `giver` could still draw.
    #[must_use]
    pub fn remaining_candidates(&self, giver: &str, participants: &[Participant]) -> usize {
        participants
            .iter()
            .filter(|recipient| !self.excludes(giver, recipient.id.as_str()))
            .count()
    }

    /// The rule applied when exclusions are configured: every participant has to
    /// keep at least `required` possible recipients.
    pub fn check_configuration(
        &self,
        participants: &[Participant],
        required: usize,
    ) -> Result<(), ExclusionRuleError> {
        self.check_references(participants)?;
        for participant in participants {
            let remaining = self.remaining_candidates(participant.id.as_str(), participants);
            if remaining < required {
                return Err(ExclusionRuleError::TooFewOptions {
                    participant: participant.id.clone(),
                    remaining,
                    required,
                });
            }
        }
        Ok(())
    }
}

impl<G, R> FromIterator<(G, R)> for Exclusions
where
    G: Into<ParticipantId>,
    R: Into<ParticipantId>,
{
    fn from_iter<I: IntoIterator<Item = (G, R)>>(iter: I) -> Self {
        let mut exclusions = Self::new();
        for (giver, recipient) in iter {
            exclusions.exclude(giver, recipient);
        }
        exclusions
    }
}
