use std::sync::Arc;

use crate::auction::intent::AuctionIntent;
use crate::auction::state::{AuctionState, Lot};
use crate::ui::mvi::Reducer;

pub struct AuctionReducer;

impl Reducer for AuctionReducer {
    type State = AuctionState;
    type Intent = AuctionIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            AuctionIntent::SetCurrentTime { time } => AuctionState { time, ..state },
            AuctionIntent::SetLotCollection { lots } => AuctionState {
                lots: Some(lots.into_iter().map(Arc::new).collect()),
                ..state
            },
            AuctionIntent::SetLotPrice { id, price } => update_lot(state, id, |lot| lot.price = price),
            AuctionIntent::MarkFavorite { id } => update_lot(state, id, |lot| lot.favorite = true),
            AuctionIntent::UnmarkFavorite { id } => {
                update_lot(state, id, |lot| lot.favorite = false)
            }
            AuctionIntent::Unknown => state,
        }
    }
}

/// Rebuilds the lot list, touching only lots with `id`.
///
/// Lots that end up unchanged keep their `Arc`, so views and tests can tell
/// untouched records apart by pointer.
fn update_lot(state: AuctionState, id: u64, apply: impl Fn(&mut Lot)) -> AuctionState {
    let AuctionState { time, lots } = state;
    let lots = lots.map(|lots| {
        lots.into_iter()
            .map(|lot| {
                if lot.id != id {
                    return lot;
                }
                let mut next = Lot::clone(&lot);
                apply(&mut next);
                if next == *lot {
                    lot
                } else {
                    Arc::new(next)
                }
            })
            .collect()
    });
    AuctionState { time, lots }
}
