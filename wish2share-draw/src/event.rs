use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assignment::Assignment;
use crate::error::{DrawError, EventError};
use crate::exclusions::Exclusions;
use crate::generator::AssignmentGenerator;
use crate::participant::{Participant, ParticipantId};
use crate::problem::DrawProblem;

/// An event whose participants draw names once.
///
/// While no assignment is stored participants and exclusion rules can change.
/// Once drawn, the event is frozen until [`Event::reset_draw`] is called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    #[serde(default)]
    participants: Vec<Participant>,
    #[serde(default)]
    exclusions: Exclusions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    assignment: Option<Assignment>,
}

impl Event {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            participants: Vec::new(),
            exclusions: Exclusions::new(),
            assignment: None,
        }
    }

    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    #[must_use]
    pub fn participant(&self, id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id.as_str() == id)
    }

    #[must_use]
    pub const fn exclusions(&self) -> &Exclusions {
        &self.exclusions
    }

    #[must_use]
    pub const fn assignment(&self) -> Option<&Assignment> {
        self.assignment.as_ref()
    }

    #[must_use]
    pub const fn is_drawn(&self) -> bool {
        self.assignment.is_some()
    }

    fn ensure_open(&self) -> Result<(), EventError> {
        if self.is_drawn() {
            Err(EventError::AlreadyDrawn)
        } else {
            Ok(())
        }
    }

    fn ensure_member(&self, id: &str) -> Result<(), EventError> {
        if self.participant(id).is_some() {
            Ok(())
        } else {
            Err(EventError::UnknownParticipant(id.into()))
        }
    }

    pub fn add_participant(&mut self, participant: Participant) -> Result<(), EventError> {
        self.ensure_open()?;
        if self.participant(participant.id.as_str()).is_some() {
            return Err(EventError::DuplicateParticipant(participant.id));
        }
        self.participants.push(participant);
        Ok(())
    }

    /// Removes a participant together with every exclusion rule mentioning them.
    ///
    /// Refused when the remaining rules would leave someone with fewer than
    /// `required` possible recipients. Without remaining rules there is nothing
    /// to check, so small events can still shrink.
    pub fn remove_participant(
        &mut self,
        id: &str,
        required: usize,
    ) -> Result<Participant, EventError> {
        self.ensure_open()?;
        let index = self
            .participants
            .iter()
            .position(|p| p.id.as_str() == id)
            .ok_or_else(|| EventError::UnknownParticipant(id.into()))?;

        let mut participants = self.participants.clone();
        let removed = participants.remove(index);
        let mut exclusions = self.exclusions.clone();
        exclusions.forget(id);
        if !exclusions.is_empty() {
            exclusions.check_configuration(&participants, required)?;
        }

        self.participants = participants;
        self.exclusions = exclusions;
        Ok(removed)
    }

    /// Replaces all rules, provided every participant keeps `required` possible recipients.
    pub fn set_exclusions(
        &mut self,
        exclusions: Exclusions,
        required: usize,
    ) -> Result<(), EventError> {
        self.ensure_open()?;
        exclusions.check_configuration(&self.participants, required)?;
        self.exclusions = exclusions;
        Ok(())
    }

    /// Adds a single rule under the same condition as [`Event::set_exclusions`].
    pub fn exclude(
        &mut self,
        giver: &str,
        recipient: &str,
        required: usize,
    ) -> Result<(), EventError> {
        let mut exclusions = self.exclusions.clone();
        exclusions.exclude(giver, recipient);
        self.set_exclusions(exclusions, required)
    }

    /// Everything a draw would reject, plus the configuration rule.
    pub fn check(&self, required: usize) -> Result<(), EventError> {
        DrawProblem::new(&self.participants, &self.exclusions).map_err(DrawError::from)?;
        self.exclusions
            .check_configuration(&self.participants, required)?;
        Ok(())
    }

    /// Draws names and stores the result. Refused if the event was drawn already.
    pub fn draw<R: Rng + ?Sized>(
        &mut self,
        generator: &AssignmentGenerator,
        rng: &mut R,
    ) -> Result<&Assignment, EventError> {
        self.ensure_open()?;
        let assignment = generator.generate(&self.participants, &self.exclusions, rng)?;
        info!(event = %self.id, participants = self.participants.len(), "event drawn");
        Ok(self.assignment.insert(assignment))
    }

    /// Discards the stored draw and returns it.
    pub fn reset_draw(&mut self) -> Option<Assignment> {
        let previous = self.assignment.take();
        if previous.is_some() {
            info!(event = %self.id, "draw reset");
        }
        previous
    }

    /// Whom `giver` buys a gift for. `None` until names are drawn.
    pub fn recipient_for(&self, giver: &str) -> Result<Option<&Participant>, EventError> {
        self.ensure_member(giver)?;
        Ok(self
            .assignment
            .as_ref()
            .and_then(|assignment| assignment.recipient_of(giver))
            .and_then(|recipient: &ParticipantId| self.participant(recipient.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::Event;
    use crate::error::{DrawError, EventError, ExclusionRuleError, InvalidInputError};
    use crate::exclusions::Exclusions;
    use crate::generator::AssignmentGenerator;
    use crate::participant::Participant;

    fn family() -> Event {
        let mut event = Event::new("xmas", "Christmas");
        for (id, first, last) in [
            ("anna", "Anna", "Meyer"),
            ("ben", "Ben", "Meyer"),
            ("carla", "Carla", "Schulz"),
            ("david", "David", "Schulz"),
            ("emil", "Emil", "Wagner"),
        ] {
            event
                .add_participant(Participant::new(id, first, last))
                .unwrap();
        }
        event
    }

    #[test]
    fn draw_once_until_reset() {
        let mut event = family();
        let mut exclusions = Exclusions::new();
        exclusions.exclude_mutually("anna", "ben");
        event.set_exclusions(exclusions, 2).unwrap();

        let generator = AssignmentGenerator::default();
        let mut rng = StdRng::seed_from_u64(5);
        let first = event.draw(&generator, &mut rng).unwrap().clone();
        assert!(first.is_valid_for(event.participants(), event.exclusions()));
        assert!(matches!(
            event.draw(&generator, &mut rng),
            Err(EventError::AlreadyDrawn)
        ));
        assert_eq!(event.assignment(), Some(&first));

        assert_eq!(event.reset_draw(), Some(first));
        assert!(!event.is_drawn());
        assert!(event.draw(&generator, &mut rng).is_ok());
    }

    #[test]
    fn frozen_after_draw() {
        let mut event = family();
        event
            .draw(&AssignmentGenerator::default(), &mut StdRng::seed_from_u64(6))
            .unwrap();
        assert!(matches!(
            event.add_participant(Participant::new("frida", "Frida", "")),
            Err(EventError::AlreadyDrawn)
        ));
        assert!(matches!(
            event.remove_participant("anna", 2),
            Err(EventError::AlreadyDrawn)
        ));
        assert!(matches!(
            event.exclude("anna", "ben", 2),
            Err(EventError::AlreadyDrawn)
        ));
    }

    #[test]
    fn duplicate_participant() {
        let mut event = family();
        assert!(matches!(
            event.add_participant(Participant::new("anna", "Anna", "Other")),
            Err(EventError::DuplicateParticipant(id)) if id.as_str() == "anna"
        ));
    }

    #[test]
    fn removing_participant_drops_rules() {
        let mut event = family();
        event.exclude("anna", "ben", 2).unwrap();
        event.exclude("carla", "anna", 2).unwrap();
        event.remove_participant("anna", 2).unwrap();
        assert!(event.exclusions().is_empty());
        assert!(matches!(
            event.remove_participant("anna", 2),
            Err(EventError::UnknownParticipant(_))
        ));
    }

    #[test]
    fn removal_keeps_configuration_rule() {
        let mut event = Event::new("small", "Small");
        for id in ["a", "b", "c", "d"] {
            event.add_participant(Participant::new(id, id, "")).unwrap();
        }
        event.exclude("a", "b", 2).unwrap();

        // without c, a could only draw d
        let error = event.remove_participant("c", 2).unwrap_err();
        assert!(matches!(
            error,
            EventError::ExclusionRule(ExclusionRuleError::TooFewOptions { remaining: 1, .. })
        ));
        assert_eq!(event.participants().len(), 4);
        assert!(event.exclusions().excludes("a", "b"));
        assert!(event.check(2).is_ok());

        event.remove_participant("c", 1).unwrap();
        assert_eq!(event.participants().len(), 3);
    }

    #[test]
    fn removal_without_rules_is_unchecked() {
        let mut event = Event::new("trio", "Trio");
        for id in ["a", "b", "c"] {
            event.add_participant(Participant::new(id, id, "")).unwrap();
        }
        event.remove_participant("c", 2).unwrap();
        assert_eq!(event.participants().len(), 2);
    }

    #[test]
    fn configuration_rule() {
        let mut event = family();
        event.exclude("anna", "ben", 2).unwrap();
        event.exclude("anna", "carla", 2).unwrap();
        let error = event.exclude("anna", "david", 2).unwrap_err();
        assert!(matches!(
            error,
            EventError::ExclusionRule(ExclusionRuleError::TooFewOptions { remaining: 1, .. })
        ));
        // rejected rule is not stored
        assert!(!event.exclusions().excludes("anna", "david"));
        assert!(matches!(
            event.exclude("anna", "zoe", 2),
            Err(EventError::ExclusionRule(ExclusionRuleError::InvalidInput(
                InvalidInputError::UnknownRecipient { .. }
            )))
        ));
    }

    #[test]
    fn check_small_event() {
        let mut event = Event::new("tiny", "Tiny");
        event.add_participant(Participant::new("a", "A", "")).unwrap();
        event.add_participant(Participant::new("b", "B", "")).unwrap();
        assert!(matches!(
            event.check(2),
            Err(EventError::Draw(DrawError::InvalidInput(
                InvalidInputError::TooFewParticipants { count: 2, .. }
            )))
        ));
        assert!(family().check(2).is_ok());
    }

    #[test]
    fn private_lookup() {
        let mut event = family();
        assert_eq!(event.recipient_for("anna").unwrap(), None);
        assert!(event.recipient_for("nobody").is_err());
        event
            .draw(&AssignmentGenerator::default(), &mut StdRng::seed_from_u64(7))
            .unwrap();
        let recipient = event.recipient_for("anna").unwrap().unwrap();
        assert_ne!(recipient.id.as_str(), "anna");
    }
}
