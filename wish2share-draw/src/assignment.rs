use core::fmt;
use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::exclusions::Exclusions;
use crate::participant::{Participant, ParticipantId};

/// Who buys a gift for whom: `giver -> recipient`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignment(BTreeMap<ParticipantId, ParticipantId>);

/// Why a map is not a valid draw result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    MissingGiver(ParticipantId),
    UnknownGiver(ParticipantId),
    NotReceiving(ParticipantId),
    SelfAssigned(ParticipantId),
    Excluded {
        giver: ParticipantId,
        recipient: ParticipantId,
    },
}

impl Assignment {
    #[must_use]
    pub fn recipient_of(&self, giver: &str) -> Option<&ParticipantId> {
        self.0.get(giver)
    }

    /// The reverse lookup, who draws `recipient`.
    #[must_use]
    pub fn giver_for(&self, recipient: &str) -> Option<&ParticipantId> {
        self.0
            .iter()
            .find_map(|(giver, r)| (r.as_str() == recipient).then_some(giver))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, &ParticipantId)> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every way this map fails to be a bijection without fixed points that honors `exclusions`.
    #[must_use]
    pub fn violations(
        &self,
        participants: &[Participant],
        exclusions: &Exclusions,
    ) -> Vec<Violation> {
        let ids: BTreeSet<&ParticipantId> = participants.iter().map(|p| &p.id).collect();
        let recipients: BTreeSet<&ParticipantId> = self.0.values().collect();

        let mut violations = Vec::new();
        for id in &ids {
            if !self.0.contains_key(*id) {
                violations.push(Violation::MissingGiver((*id).clone()));
            }
            if !recipients.contains(id) {
                violations.push(Violation::NotReceiving((*id).clone()));
            }
        }
        for (giver, recipient) in &self.0 {
            if !ids.contains(giver) {
                violations.push(Violation::UnknownGiver(giver.clone()));
            } else if giver == recipient {
                violations.push(Violation::SelfAssigned(giver.clone()));
            } else if exclusions.excludes(giver.as_str(), recipient.as_str()) {
                violations.push(Violation::Excluded {
                    giver: giver.clone(),
                    recipient: recipient.clone(),
                });
            }
        }
        violations
    }

    #[must_use]
    pub fn is_valid_for(&self, participants: &[Participant], exclusions: &Exclusions) -> bool {
        self.violations(participants, exclusions).is_empty()
    }
}

impl FromIterator<(ParticipantId, ParticipantId)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (ParticipantId, ParticipantId)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .iter()
                .format_with("\n", |(giver, recipient), f| f(&format_args!(
                    "{giver} -> {recipient}"
                )))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Assignment, Violation};
    use crate::exclusions::Exclusions;
    use crate::participant::{Participant, ParticipantId};

    fn people(ids: &[&str]) -> Vec<Participant> {
        ids.iter().map(|id| Participant::new(*id, *id, "")).collect()
    }

    fn pairs(pairs: &[(&str, &str)]) -> Assignment {
        pairs
            .iter()
            .map(|(g, r)| (ParticipantId::from(*g), ParticipantId::from(*r)))
            .collect()
    }

    #[test]
    fn cycle_is_valid() {
        let participants = people(&["A", "B", "C", "D"]);
        let assignment = pairs(&[("A", "B"), ("B", "C"), ("C", "D"), ("D", "A")]);
        assert!(assignment.is_valid_for(&participants, &Exclusions::new()));
        assert_eq!(assignment.giver_for("A"), Some(&ParticipantId::from("D")));
        assert_eq!(assignment.to_string(), "A -> B\nB -> C\nC -> D\nD -> A");
    }

    #[test]
    fn excluded_pair_is_reported() {
        let participants = people(&["A", "B", "C", "D"]);
        let exclusions: Exclusions = [("A", "B")].into_iter().collect();
        let assignment = pairs(&[("A", "B"), ("B", "C"), ("C", "D"), ("D", "A")]);
        assert_eq!(
            assignment.violations(&participants, &exclusions),
            vec![Violation::Excluded {
                giver: "A".into(),
                recipient: "B".into(),
            }]
        );
    }

    #[test]
    fn not_a_bijection() {
        let participants = people(&["A", "B", "C"]);
        let assignment = pairs(&[("A", "B"), ("B", "A"), ("C", "C")]);
        let violations = assignment.violations(&participants, &Exclusions::new());
        assert!(violations.contains(&Violation::SelfAssigned("C".into())));

        let assignment = pairs(&[("A", "B"), ("B", "A")]);
        let violations = assignment.violations(&participants, &Exclusions::new());
        assert!(violations.contains(&Violation::MissingGiver("C".into())));
        assert!(violations.contains(&Violation::NotReceiving("C".into())));
    }
}
