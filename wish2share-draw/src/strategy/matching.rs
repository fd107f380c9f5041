use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::DrawStrategy;
use crate::error::InfeasibleAssignmentError;
use crate::problem::DrawProblem;

/// Randomized augmenting path matching between givers and recipients.
///
/// Unlike [`super::RejectionSampling`] this always terminates with a definitive
/// answer: if some giver cannot be matched no valid draw exists. The result is
/// random but not uniformly distributed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Matching;

struct Matcher<'a> {
    edges: &'a [Vec<usize>],
    giver_of: Vec<Option<usize>>,
    visited: Vec<bool>,
}

impl Matcher<'_> {
    fn augment(&mut self, giver: usize) -> bool {
        let edges = self.edges;
        for &recipient in &edges[giver] {
            if self.visited[recipient] {
                continue;
            }
            self.visited[recipient] = true;
            let free = match self.giver_of[recipient] {
                None => true,
                Some(previous) => self.augment(previous),
            };
            if free {
                self.giver_of[recipient] = Some(giver);
                return true;
            }
        }
        false
    }
}

impl DrawStrategy for Matching {
    fn solve<R: Rng + ?Sized>(
        &self,
        problem: &DrawProblem,
        rng: &mut R,
    ) -> Result<Vec<usize>, InfeasibleAssignmentError> {
        let len = problem.len();
        let edges: Vec<Vec<usize>> = (0..len)
            .map(|giver| {
                let mut candidates = problem.candidates(giver).to_vec();
                candidates.shuffle(rng);
                candidates
            })
            .collect();
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(rng);

        let mut matcher = Matcher {
            edges: &edges,
            giver_of: vec![None; len],
            visited: vec![false; len],
        };
        for giver in order {
            matcher.visited.fill(false);
            if !matcher.augment(giver) {
                // a maximum matching leaves this giver out, so no perfect one exists
                return Err(InfeasibleAssignmentError {
                    attempts: 1,
                    stuck: Some(problem.id(giver).clone()),
                });
            }
        }

        let mut recipients = vec![0; len];
        for (recipient, giver) in matcher.giver_of.into_iter().enumerate() {
            if let Some(giver) = giver {
                recipients[giver] = recipient;
            }
        }
        debug!(participants = len, "matching found");
        Ok(recipients)
    }
}
