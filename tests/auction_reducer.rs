mod common;

use std::sync::Arc;

use common::{loaded_state, lot, two_lots, T0};
use pinecone::auction::{AuctionIntent, AuctionReducer, AuctionState};
use pinecone::ui::mvi::Reducer;
use time::macros::datetime;

#[test]
fn set_lot_collection_leaves_loading() {
    let state = AuctionReducer::reduce(
        AuctionState::new(T0),
        AuctionIntent::SetLotCollection { lots: two_lots() },
    );

    assert!(!state.is_loading());
    assert_eq!(state.time, T0);
    let lots = state.lots.as_ref().unwrap();
    assert_eq!(lots.len(), 2);
    assert_eq!(*lots[0], lot(1, "A", 42, false));
    assert_eq!(*lots[1], lot(2, "B", 42, true));
}

#[test]
fn set_lot_price_only_touches_that_lot() {
    let before = loaded_state(two_lots());
    let untouched = Arc::clone(before.lot(2).unwrap());

    let after = AuctionReducer::reduce(
        before.clone(),
        AuctionIntent::SetLotPrice { id: 1, price: 47 },
    );

    assert_eq!(after.lot(1).unwrap().price, 47);
    assert!(Arc::ptr_eq(after.lot(2).unwrap(), &untouched));
    assert_eq!(after.time, before.time);
}

#[test]
fn last_price_wins() {
    let state = [44, 51, 45].into_iter().fold(loaded_state(two_lots()), |state, price| {
        AuctionReducer::reduce(state, AuctionIntent::SetLotPrice { id: 2, price })
    });
    assert_eq!(state.lot(2).unwrap().price, 45);
}

#[test]
fn mark_and_unmark_favorite() {
    let marked = AuctionReducer::reduce(
        loaded_state(two_lots()),
        AuctionIntent::MarkFavorite { id: 1 },
    );
    assert!(marked.lot(1).unwrap().favorite);

    let unmarked = AuctionReducer::reduce(marked, AuctionIntent::UnmarkFavorite { id: 2 });
    assert!(!unmarked.lot(2).unwrap().favorite);
    assert!(unmarked.lot(1).unwrap().favorite);
}

#[test]
fn marking_an_existing_favorite_keeps_the_same_lot() {
    let before = loaded_state(two_lots());
    let favorite = Arc::clone(before.lot(2).unwrap());

    let after = AuctionReducer::reduce(before, AuctionIntent::MarkFavorite { id: 2 });

    assert!(Arc::ptr_eq(after.lot(2).unwrap(), &favorite));
}

#[test]
fn set_current_time_keeps_lots() {
    let before = loaded_state(two_lots());
    let later = datetime!(2024-05-01 23:30:00 UTC);

    let after = AuctionReducer::reduce(
        before.clone(),
        AuctionIntent::SetCurrentTime { time: later },
    );

    assert_eq!(after.time, later);
    assert_eq!(after.lots, before.lots);
}

#[test]
fn lot_updates_before_lots_arrive_are_ignored() {
    let loading = AuctionState::new(T0);
    for intent in [
        AuctionIntent::SetLotPrice { id: 1, price: 50 },
        AuctionIntent::MarkFavorite { id: 1 },
        AuctionIntent::UnmarkFavorite { id: 1 },
    ] {
        assert_eq!(AuctionReducer::reduce(loading.clone(), intent), loading);
    }
}

#[test]
fn unknown_lot_id_is_ignored() {
    let state = loaded_state(two_lots());
    let after = AuctionReducer::reduce(
        state.clone(),
        AuctionIntent::SetLotPrice { id: 99, price: 1 },
    );
    assert_eq!(after, state);
}

#[test]
fn unknown_intent_is_a_no_op() {
    let state = loaded_state(two_lots());
    assert_eq!(AuctionReducer::reduce(state.clone(), AuctionIntent::Unknown), state);
}

#[test]
fn reduce_is_deterministic() {
    let state = loaded_state(two_lots());
    let intents = || {
        vec![
            AuctionIntent::SetLotPrice { id: 1, price: 48 },
            AuctionIntent::MarkFavorite { id: 1 },
            AuctionIntent::SetCurrentTime {
                time: datetime!(2024-05-01 08:00:00 UTC),
            },
        ]
    };

    let first = intents()
        .into_iter()
        .fold(state.clone(), AuctionReducer::reduce);
    let second = intents()
        .into_iter()
        .fold(state.clone(), AuctionReducer::reduce);

    assert_eq!(first, second);
    // The input snapshot is untouched.
    assert_eq!(state, loaded_state(two_lots()));
}

#[test]
fn intents_decode_from_tagged_json() {
    let intent: AuctionIntent =
        serde_json::from_str(r#"{"type":"set-lot-price","id":3,"price":49}"#).unwrap();
    assert_eq!(intent, AuctionIntent::SetLotPrice { id: 3, price: 49 });

    let intent: AuctionIntent =
        serde_json::from_str(r#"{"type":"set-current-time","time":"2024-05-01T12:00:00Z"}"#)
            .unwrap();
    assert_eq!(intent, AuctionIntent::SetCurrentTime { time: T0 });
}

#[test]
fn unrecognized_tag_decodes_as_unknown() {
    let intent: AuctionIntent = serde_json::from_str(r#"{"type":"place-bid"}"#).unwrap();
    assert_eq!(intent, AuctionIntent::Unknown);
}
