//! Bodies - rigid block state, force kernels and the explicit integrator
//!
//! All blocks live in one structure-of-arrays `BodyState` together with
//! the singleton player body. Every kernel is a single O(N) pass and
//! accumulates into the shared force/moment buffers; only
//! `time_integrate` consumes them.

mod contact;
mod forces;
mod integrate;
mod state;

pub use contact::{block_corners, ContactParams};
pub use state::{BodyState, Fixity, Player};
