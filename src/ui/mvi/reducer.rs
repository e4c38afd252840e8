use super::intent::Intent;
use super::state::UiState;

/// The one place a state transition happens.
pub trait Reducer {
    type State: UiState;
    type Intent: Intent;

    /// Pure and total. Intents that do not apply to `state` (unknown tags,
    /// missing records) return it unchanged.
    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}
