use std::fmt::Debug;

/// An action handed to a [`super::Reducer`].
///
/// Produced by click handlers in the view and by the driver (clock ticks,
/// lot arrival, price ticks). `Default` is the intent a store applies once
/// when it is built, so reducers should treat it as a no-op.
pub trait Intent: Debug + Default + Send + 'static {}
