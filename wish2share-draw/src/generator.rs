use rand::Rng;
use tracing::{info, instrument, warn};
use wish2share_config::Config;

use crate::assignment::Assignment;
use crate::error::DrawError;
use crate::exclusions::Exclusions;
use crate::participant::Participant;
use crate::problem::DrawProblem;
use crate::strategy::{DrawStrategy, Strategy};

/// Draws names with a fixed [`Strategy`]. Holds no state between draws.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssignmentGenerator {
    strategy: Strategy,
}

impl AssignmentGenerator {
    #[must_use]
    pub const fn new(strategy: Strategy) -> Self {
        Self { strategy }
    }

    #[must_use]
    pub const fn from_config(config: &Config) -> Self {
        Self::new(Strategy::from_kind(config.strategy, config.max_attempts))
    }

    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Draws a giver to recipient mapping in which nobody draws themselves or
    /// someone they exclude.
    ///
    /// Input problems are reported as [`DrawError::InvalidInput`] before `rng` is
    /// touched. When no valid draw is found [`DrawError::Infeasible`] is returned,
    /// constraints are never relaxed.
    #[instrument(level = "debug", skip_all, fields(participants = participants.len(), strategy = ?self.strategy))]
    pub fn generate<R: Rng + ?Sized>(
        &self,
        participants: &[Participant],
        exclusions: &Exclusions,
        rng: &mut R,
    ) -> Result<Assignment, DrawError> {
        let problem = DrawProblem::new(participants, exclusions)?;
        match self.strategy.solve(&problem, rng) {
            Ok(recipients) => {
                let assignment = problem.to_assignment(&recipients);
                debug_assert!(assignment.is_valid_for(participants, exclusions));
                info!("names drawn");
                Ok(assignment)
            }
            Err(error) => {
                warn!(%error, "no valid draw");
                Err(error.into())
            }
        }
    }
}

/// [`AssignmentGenerator::generate`] with the default rejection sampling strategy.
pub fn generate_assignment<R: Rng + ?Sized>(
    participants: &[Participant],
    exclusions: &Exclusions,
    rng: &mut R,
) -> Result<Assignment, DrawError> {
    AssignmentGenerator::default().generate(participants, exclusions, rng)
}
