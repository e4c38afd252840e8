use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auction::state::Lot;
use crate::ui::mvi::Intent;

/// Actions understood by [`super::AuctionReducer`].
///
/// Serialized with a `type` tag (`"set-lot-price"`, ...). Any tag that is
/// not listed here decodes as [`AuctionIntent::Unknown`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AuctionIntent {
    SetCurrentTime {
        #[serde(with = "time::serde::rfc3339")]
        time: OffsetDateTime,
    },
    SetLotCollection {
        lots: Vec<Lot>,
    },
    SetLotPrice {
        id: u64,
        price: i64,
    },
    MarkFavorite {
        id: u64,
    },
    UnmarkFavorite {
        id: u64,
    },
    /// Also the intent a store applies on construction.
    #[default]
    #[serde(other)]
    Unknown,
}

impl Intent for AuctionIntent {}
