pub mod error;
pub mod manager;
pub mod matches;
pub mod sets;
pub mod types;

pub use error::SetError;
pub use manager::SetManager;
pub use matches::Match;
pub use sets::{derive_state, Set};
pub use types::{
    MatchRecord, MatchSnapshot, SetRecord, SetSnapshot, SetState, SharedSetManager, FORFEIT_SCORE,
};
