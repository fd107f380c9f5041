use core::num::NonZeroU32;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace};

use super::DrawStrategy;
use crate::error::InfeasibleAssignmentError;
use crate::problem::DrawProblem;

pub use wish2share_config::DEFAULT_MAX_ATTEMPTS;

/// Shuffle the givers, let each one draw a random free candidate, start over on
/// a dead end. Gives up after `max_attempts`.
///
/// Fast for the usual party sizes and sparse rules, but it cannot prove that a
/// draw is impossible. It just stops trying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RejectionSampling {
    pub max_attempts: NonZeroU32,
}

impl Default for RejectionSampling {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Scratch space reused between attempts.
struct Attempt {
    order: Vec<usize>,
    recipients: Vec<usize>,
    claimed: Vec<bool>,
    available: Vec<usize>,
}

impl Attempt {
    fn new(len: usize) -> Self {
        Self {
            order: (0..len).collect(),
            recipients: vec![0; len],
            claimed: vec![false; len],
            available: Vec::with_capacity(len),
        }
    }

    /// Runs one greedy pass. On a dead end returns the giver that got stuck.
    fn run<R: Rng + ?Sized>(&mut self, problem: &DrawProblem, rng: &mut R) -> Result<(), usize> {
        self.order.shuffle(rng);
        self.claimed.fill(false);

        for &giver in &self.order {
            self.available.clear();
            self.available.extend(
                problem
                    .candidates(giver)
                    .iter()
                    .copied()
                    .filter(|&recipient| !self.claimed[recipient]),
            );
            let Some(&recipient) = self.available.choose(rng) else {
                return Err(giver);
            };
            self.claimed[recipient] = true;
            self.recipients[giver] = recipient;
        }
        Ok(())
    }
}

impl DrawStrategy for RejectionSampling {
    fn solve<R: Rng + ?Sized>(
        &self,
        problem: &DrawProblem,
        rng: &mut R,
    ) -> Result<Vec<usize>, InfeasibleAssignmentError> {
        // every attempt would fail at this giver
        if let Some(giver) = problem.giver_without_candidates() {
            return Err(InfeasibleAssignmentError {
                attempts: 0,
                stuck: Some(problem.id(giver).clone()),
            });
        }

        let mut attempt = Attempt::new(problem.len());
        let mut stuck = None;
        for number in 1..=self.max_attempts.get() {
            match attempt.run(problem, rng) {
                Ok(()) => {
                    debug!(attempts = number, "draw succeeded");
                    return Ok(attempt.recipients);
                }
                Err(giver) => {
                    trace!(attempt = number, stuck = %problem.id(giver), "dead end");
                    stuck = Some(giver);
                }
            }
        }

        Err(InfeasibleAssignmentError {
            attempts: self.max_attempts.get(),
            stuck: stuck.map(|giver| problem.id(giver).clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use core::num::NonZeroU32;
    use std::collections::BTreeSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::{RejectionSampling, DEFAULT_MAX_ATTEMPTS};
    use crate::exclusions::Exclusions;
    use crate::participant::Participant;
    use crate::problem::DrawProblem;
    use crate::strategy::DrawStrategy;

    fn people(ids: &[&str]) -> Vec<Participant> {
        ids.iter().map(|id| Participant::new(*id, *id, "")).collect()
    }

    fn assert_permutation(recipients: &[usize], problem: &DrawProblem) {
        let distinct: BTreeSet<usize> = recipients.iter().copied().collect();
        assert_eq!(distinct.len(), recipients.len());
        for (giver, recipient) in recipients.iter().enumerate() {
            assert!(problem.candidates(giver).contains(recipient));
        }
    }

    #[test]
    fn default_matches_configuration() {
        let config = wish2share_config::Config::default();
        assert_eq!(RejectionSampling::default().max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(config.max_attempts, DEFAULT_MAX_ATTEMPTS);
    }

    #[test]
    fn finds_derangement() {
        let problem = DrawProblem::new(&people(&["A", "B", "C", "D", "E"]), &Exclusions::new())
            .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let recipients = RejectionSampling::default()
                .solve(&problem, &mut rng)
                .unwrap();
            assert_permutation(&recipients, &problem);
        }
    }

    #[test]
    fn reaches_every_derangement_of_four() {
        let problem =
            DrawProblem::new(&people(&["A", "B", "C", "D"]), &Exclusions::new()).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let seen: BTreeSet<Vec<usize>> = (0..2000)
            .map(|_| {
                RejectionSampling::default()
                    .solve(&problem, &mut rng)
                    .unwrap()
            })
            .collect();
        // !4 = 9
        assert_eq!(seen.len(), 9);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        // A, B and C may only draw D
        let exclusions: Exclusions = [
            ("A", "B"),
            ("A", "C"),
            ("B", "A"),
            ("B", "C"),
            ("C", "A"),
            ("C", "B"),
        ]
        .into_iter()
        .collect();
        let problem = DrawProblem::new(&people(&["A", "B", "C", "D"]), &exclusions).unwrap();
        let strategy = RejectionSampling {
            max_attempts: NonZeroU32::new(50).unwrap(),
        };
        let error = strategy
            .solve(&problem, &mut StdRng::seed_from_u64(3))
            .unwrap_err();
        assert_eq!(error.attempts, 50);
        assert!(error.stuck.is_some());
    }

    #[test]
    fn no_candidates_fails_without_attempts() {
        let exclusions: Exclusions = [("A", "B"), ("A", "C")].into_iter().collect();
        let problem = DrawProblem::new(&people(&["A", "B", "C"]), &exclusions).unwrap();
        let error = RejectionSampling::default()
            .solve(&problem, &mut StdRng::seed_from_u64(4))
            .unwrap_err();
        assert_eq!(error.attempts, 0);
        assert_eq!(error.stuck, Some("A".into()));
    }
}
