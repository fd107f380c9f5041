//! Secret-Santa style name drawing.
//!
//! Every participant gives exactly one gift and receives exactly one, nobody
//! draws themselves and exclusion rules are always honored. When the rules make
//! that impossible the draw fails with [`InfeasibleAssignmentError`] instead of
//! relaxing them.

pub mod assignment;
pub mod error;
pub mod event;
pub mod exclusions;
pub mod generator;
pub mod participant;
pub mod problem;
pub mod store;
pub mod strategy;

pub use assignment::Assignment;
pub use error::{
    DrawError, EventError, ExclusionRuleError, InfeasibleAssignmentError, InvalidInputError,
    StoreError,
};
pub use event::Event;
pub use exclusions::Exclusions;
pub use generator::{generate_assignment, AssignmentGenerator};
pub use participant::{Participant, ParticipantId};
pub use strategy::{DrawStrategy, Matching, RejectionSampling, Strategy};
