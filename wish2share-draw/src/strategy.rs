pub mod matching;
pub mod rejection;

use core::num::NonZeroU32;

use rand::Rng;
use wish2share_config::StrategyKind;

pub use self::matching::Matching;
pub use self::rejection::RejectionSampling;
use crate::error::InfeasibleAssignmentError;
use crate::problem::DrawProblem;

/// An algorithm that turns a validated [`DrawProblem`] into `recipients[giver]`.
///
/// Implementations must only return complete permutations in which every
/// giver got one of its candidates. All randomness comes from `rng`.
pub trait DrawStrategy {
    fn solve<R: Rng + ?Sized>(
        &self,
        problem: &DrawProblem,
        rng: &mut R,
    ) -> Result<Vec<usize>, InfeasibleAssignmentError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    RejectionSampling(RejectionSampling),
    Matching(Matching),
}

impl Default for Strategy {
    fn default() -> Self {
        Self::RejectionSampling(RejectionSampling::default())
    }
}

impl Strategy {
    #[must_use]
    pub const fn from_kind(kind: StrategyKind, max_attempts: NonZeroU32) -> Self {
        match kind {
            StrategyKind::RejectionSampling => {
                Self::RejectionSampling(RejectionSampling { max_attempts })
            }
            StrategyKind::Matching => Self::Matching(Matching),
        }
    }
}

impl DrawStrategy for Strategy {
    fn solve<R: Rng + ?Sized>(
        &self,
        problem: &DrawProblem,
        rng: &mut R,
    ) -> Result<Vec<usize>, InfeasibleAssignmentError> {
        match self {
            Self::RejectionSampling(strategy) => strategy.solve(problem, rng),
            Self::Matching(strategy) => strategy.solve(problem, rng),
        }
    }
}
