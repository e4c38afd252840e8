/// State owned by a [`crate::store::Store`].
///
/// Never mutated in place: each transition builds a new value and readers
/// hold `Arc` snapshots of older ones. `PartialEq` lets tests and reducers
/// detect a no-op transition.
pub trait UiState: Clone + PartialEq + Default + Send + Sync + 'static {}
