//! Auction view components.
//!
//! Every component is a pure function of its props. State and the dispatch
//! capability travel down the tree as `Data` props; nothing here reaches for
//! a global store.

use std::sync::Arc;

use time::macros::format_description;
use time::OffsetDateTime;

use crate::auction::{AuctionIntent, AuctionState, Lot};
use crate::store::Dispatcher;
use crate::vdom::{element, text, Component, Props, VNode};

pub const APP: Component = Component::new("App", app);
pub const HEADER: Component = Component::new("Header", header);
pub const LOGO: Component = Component::new("Logo", logo);
pub const CLOCK: Component = Component::new("Clock", clock);
pub const LOADING: Component = Component::new("Loading", loading);
pub const LOTS: Component = Component::new("Lots", lots);
pub const LOT: Component = Component::new("Lot", lot);
pub const FAVORITE_BUTTON: Component = Component::new("FavoriteButton", favorite_button);

pub const LOADING_TEXT: &str = "Loading…";
pub const LOGO_SRC: &str = "pinecone-logo.png";

const STATE: &str = "state";
const DISPATCH: &str = "dispatch";
const TIME: &str = "time";
const LOTS_PROP: &str = "lots";
const LOT_PROP: &str = "lot";

/// Hours (inclusive) during which the clock shows the day icon.
const DAY_HOURS: std::ops::RangeInclusive<u8> = 7..=21;

/// Root of the auction view for one state snapshot.
pub fn app_view(state: Arc<AuctionState>, dispatcher: Dispatcher<AuctionIntent>) -> VNode {
    element(
        APP,
        Props::new()
            .data(STATE, state)
            .data(DISPATCH, Arc::new(dispatcher)),
        vec![],
    )
}

fn app(props: &Props) -> VNode {
    let Some(state) = props.get_data::<AuctionState>(STATE) else {
        return element("div", Props::new().class("app"), vec![]);
    };

    let body = match &state.lots {
        None => element(LOADING, Props::new(), vec![]),
        Some(lots) => element(
            LOTS,
            Props::new()
                .data(LOTS_PROP, Arc::new(lots.clone()))
                .forward(props, DISPATCH),
            vec![],
        ),
    };

    element(
        "div",
        Props::new().class("app"),
        vec![
            element(HEADER, Props::new(), vec![]),
            element(CLOCK, Props::new().data(TIME, Arc::new(state.time)), vec![]),
            body,
        ],
    )
}

fn header(_props: &Props) -> VNode {
    element(
        "div",
        Props::new().class("header"),
        vec![element(LOGO, Props::new(), vec![])],
    )
}

fn logo(_props: &Props) -> VNode {
    element(
        "img",
        Props::new()
            .class("logo")
            .attr("src", LOGO_SRC)
            .attr("alt", "pinecone logo"),
        vec![],
    )
}

fn clock(props: &Props) -> VNode {
    let time = props
        .get_data::<OffsetDateTime>(TIME)
        .map(|time| *time)
        .unwrap_or(OffsetDateTime::UNIX_EPOCH);
    let label = time
        .format(format_description!("[hour]:[minute]:[second]"))
        .unwrap_or_default();
    let icon = if DAY_HOURS.contains(&time.hour()) {
        "icon day"
    } else {
        "icon night"
    };

    element(
        "div",
        Props::new().class("clock"),
        vec![
            element("span", Props::new().class("value"), vec![text(label)]),
            element("span", Props::new().class(icon), vec![]),
        ],
    )
}

fn loading(_props: &Props) -> VNode {
    element("div", Props::new().class("loading"), vec![text(LOADING_TEXT)])
}

fn lots(props: &Props) -> VNode {
    let lots = props
        .get_data::<Vec<Arc<Lot>>>(LOTS_PROP)
        .map(|lots| lots.as_ref().clone())
        .unwrap_or_default();

    element(
        "section",
        Props::new().class("list"),
        lots.into_iter()
            .map(|lot| {
                element(
                    LOT,
                    Props::new()
                        .key(lot.id)
                        .data(LOT_PROP, lot)
                        .forward(props, DISPATCH),
                    vec![],
                )
            })
            .collect(),
    )
}

fn lot(props: &Props) -> VNode {
    let Some(lot) = props.get_data::<Lot>(LOT_PROP) else {
        return element("article", Props::new().class("lot"), vec![]);
    };
    let class = if lot.favorite { "lot favorite" } else { "lot" };

    element(
        "article",
        Props::new().class(class),
        vec![
            element("div", Props::new().class("price"), vec![VNode::from(lot.price)]),
            element("h1", Props::new(), vec![text(lot.name.clone())]),
            element("p", Props::new(), vec![text(lot.description.clone())]),
            element(
                FAVORITE_BUTTON,
                Props::new()
                    .data(LOT_PROP, Arc::clone(&lot))
                    .forward(props, DISPATCH),
                vec![],
            ),
        ],
    )
}

fn favorite_button(props: &Props) -> VNode {
    let Some(lot) = props.get_data::<Lot>(LOT_PROP) else {
        return element("button", Props::new().class("favorite-toggle"), vec![]);
    };
    let (id, favorite) = (lot.id, lot.favorite);
    let label = if favorite { "★ Favorite" } else { "☆ Favorite" };

    let mut button = Props::new().class("favorite-toggle");
    if let Some(dispatch) = props.get_data::<Dispatcher<AuctionIntent>>(DISPATCH) {
        let identity = format!("favorite-toggle:{}:{}", id, favorite);
        button = button.handler_with_identity("on_click", identity, move || {
            dispatch.dispatch(if favorite {
                AuctionIntent::UnmarkFavorite { id }
            } else {
                AuctionIntent::MarkFavorite { id }
            })
        });
    }

    element("button", button, vec![text(label)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vdom::{evaluate, ENode};
    use time::macros::datetime;

    fn render_clock(time: OffsetDateTime) -> ENode {
        evaluate(&element(CLOCK, Props::new().data(TIME, Arc::new(time)), vec![]))
    }

    fn class_of(node: &ENode) -> Option<&str> {
        match node {
            ENode::Element(element) => element.attrs.get("class").and_then(|v| v.as_str()),
            ENode::Text(_) => None,
        }
    }

    fn children(node: &ENode) -> &[ENode] {
        match node {
            ENode::Element(element) => &element.children,
            ENode::Text(_) => &[],
        }
    }

    #[test]
    fn clock_shows_day_icon_between_seven_and_twenty_one() {
        for (time, icon) in [
            (datetime!(2024-05-01 06:59:59 UTC), "icon night"),
            (datetime!(2024-05-01 07:00:00 UTC), "icon day"),
            (datetime!(2024-05-01 21:59:59 UTC), "icon day"),
            (datetime!(2024-05-01 22:00:00 UTC), "icon night"),
        ] {
            let clock = render_clock(time);
            assert_eq!(class_of(&children(&clock)[1]), Some(icon), "at {}", time);
        }
    }

    #[test]
    fn clock_formats_time_of_day() {
        let clock = render_clock(datetime!(2024-05-01 09:05:03 UTC));
        let value = &children(&clock)[0];
        assert_eq!(children(value), &[ENode::Text("09:05:03".to_string())]);
    }

    #[test]
    fn favorite_lot_is_marked() {
        let lot = Arc::new(Lot {
            id: 4,
            name: "Pinyon".to_string(),
            description: "Small and nutty".to_string(),
            price: 50,
            favorite: true,
        });
        let article = evaluate(&element(LOT, Props::new().data(LOT_PROP, lot), vec![]));

        assert_eq!(class_of(&article), Some("lot favorite"));
        let parts = children(&article);
        assert_eq!(parts.len(), 4);
        assert_eq!(children(&parts[0]), &[ENode::Text("50".to_string())]);
        assert_eq!(class_of(&parts[3]), Some("favorite-toggle"));
    }
}
