mod common;

use std::sync::Arc;

use common::{two_lots, T0};
use pinecone::auction::{AuctionIntent, AuctionReducer, AuctionState};
use pinecone::dom::{Document, Host, HostError, Mutation, NodeId};
use pinecone::store::Store;
use pinecone::ui::runtime::Renderer;
use pinecone::ui::view::{app_view, LOADING_TEXT};
use pinecone::vdom::{element, MatchStrategy, Props, Reconciler};

struct Harness {
    store: Arc<Store<AuctionReducer>>,
    renderer: Renderer,
}

impl Harness {
    fn new(reconciler: Reconciler) -> Self {
        Self {
            store: Arc::new(Store::new(AuctionState::new(T0))),
            renderer: Renderer::new(Document::with_root("root"), "root", reconciler).unwrap(),
        }
    }

    fn loaded(reconciler: Reconciler) -> Self {
        let mut harness = Self::new(reconciler);
        harness
            .store
            .dispatch(AuctionIntent::SetLotCollection { lots: two_lots() });
        harness.render();
        harness
    }

    fn render(&mut self) -> Vec<Mutation> {
        let tree = app_view(self.store.get_state(), self.store.dispatcher());
        self.renderer.render(&tree).unwrap()
    }

    fn document(&self) -> &Document {
        self.renderer.document()
    }

    fn root(&self) -> NodeId {
        self.renderer.root()
    }

    fn app(&self) -> NodeId {
        self.document().query_class(self.root(), "app")[0]
    }

    /// Children of `div.app`: header, clock, then loading or list.
    fn sections(&self) -> Vec<NodeId> {
        self.document().children(&self.app())
    }

    fn class(&self, node: NodeId) -> Option<&str> {
        self.document().attribute(&node, "class").and_then(|v| v.as_str())
    }
}

#[test]
fn missing_root_is_reported() {
    let err = Renderer::new(Document::new(), "root", Reconciler::default()).unwrap_err();
    assert_eq!(err, HostError::MissingRoot { id: "root".to_string() });
}

#[test]
fn renders_loading_until_lots_arrive() {
    let mut harness = Harness::new(Reconciler::default());
    harness.render();

    let sections = harness.sections();
    assert_eq!(sections.len(), 3);
    assert_eq!(harness.class(sections[0]), Some("header"));
    assert_eq!(harness.class(sections[1]), Some("clock"));
    assert_eq!(harness.class(sections[2]), Some("loading"));
    assert_eq!(harness.document().text_content(sections[2]), LOADING_TEXT);
}

#[test]
fn lot_arrival_replaces_only_the_loading_child() {
    let mut harness = Harness::new(Reconciler::default());
    harness.render();
    let before = harness.sections();

    harness
        .store
        .dispatch(AuctionIntent::SetLotCollection { lots: two_lots() });
    let journal = harness.render();
    let after = harness.sections();

    assert_eq!(after[0], before[0]);
    assert_eq!(after[1], before[1]);
    assert_ne!(after[2], before[2]);
    assert_eq!(harness.class(after[2]), Some("list"));
    assert_eq!(harness.document().query_tag(after[2], "article").len(), 2);

    let app = harness.app();
    let app_edits: Vec<&Mutation> = journal
        .iter()
        .filter(|m| match m {
            Mutation::Append { parent, .. }
            | Mutation::Insert { parent, .. }
            | Mutation::Remove { parent, .. }
            | Mutation::Replace { parent, .. } => *parent == app,
            _ => false,
        })
        .collect();
    assert_eq!(
        app_edits,
        vec![&Mutation::Replace {
            parent: app,
            old: before[2],
            new: after[2],
        }]
    );
}

#[test]
fn price_update_only_rewrites_the_price_text() {
    let mut harness = Harness::loaded(Reconciler::default());
    let prices = harness.document().query_class(harness.root(), "price");
    let price_text = harness.document().children(&prices[0])[0];

    harness
        .store
        .dispatch(AuctionIntent::SetLotPrice { id: 1, price: 47 });
    let journal = harness.render();

    assert_eq!(journal, vec![Mutation::SetText { node: price_text }]);

    let prices = harness.document().query_class(harness.root(), "price");
    assert_eq!(harness.document().children(&prices[0]), vec![price_text]);
    assert_eq!(harness.document().text(&price_text), Some("47"));
    assert_eq!(harness.document().text_content(prices[1]), "42");
}

#[test]
fn rendering_the_same_state_twice_is_stable() {
    let mut harness = Harness::loaded(Reconciler::default());
    let html = harness.renderer.html();

    let journal = harness.render();

    assert!(journal.is_empty(), "{:?}", journal);
    assert_eq!(harness.renderer.html(), html);
}

#[test]
fn favorite_toggle_rebinds_its_handler_only_when_the_flag_flips() {
    let mut harness = Harness::loaded(Reconciler::default());
    let button = harness.document().query_class(harness.root(), "favorite-toggle")[0];

    harness
        .store
        .dispatch(AuctionIntent::MarkFavorite { id: 1 });
    let journal = harness.render();

    assert!(journal.contains(&Mutation::SetAttribute {
        node: button,
        name: "on_click".to_string(),
    }));
    let rebound = journal
        .iter()
        .filter(|m| matches!(m, Mutation::SetAttribute { name, .. } if name == "on_click"))
        .count();
    assert_eq!(rebound, 1);
}

#[test]
fn repeated_list_churn_keeps_the_document_bounded() {
    let mut harness = Harness::loaded(Reconciler::default());
    let baseline = harness.document().node_count();

    for _ in 0..20 {
        harness
            .store
            .dispatch(AuctionIntent::SetLotCollection { lots: Vec::new() });
        harness.render();
        assert!(harness.document().query_tag(harness.root(), "article").is_empty());

        harness
            .store
            .dispatch(AuctionIntent::SetLotCollection { lots: two_lots() });
        harness.render();
    }

    assert_eq!(harness.document().node_count(), baseline);
    assert_eq!(harness.document().query_tag(harness.root(), "article").len(), 2);
}

#[test]
fn favorite_click_round_trips_through_the_store() {
    let mut harness = Harness::loaded(Reconciler::default());
    let button = harness.document().query_class(harness.root(), "favorite-toggle")[0];
    assert_eq!(harness.document().text_content(button), "☆ Favorite");

    assert!(harness.document().dispatch_event(button, "click"));
    assert!(harness.store.get_state().lot(1).unwrap().favorite);

    harness.render();
    let articles = harness.document().query_tag(harness.root(), "article");
    assert_eq!(harness.class(articles[0]), Some("lot favorite"));
    assert_eq!(harness.document().text_content(button), "★ Favorite");

    assert!(harness.document().dispatch_event(button, "click"));
    assert!(!harness.store.get_state().lot(1).unwrap().favorite);
}

#[test]
fn keyed_lots_keep_their_articles_when_reordered() {
    let mut harness = Harness::loaded(Reconciler::new(MatchStrategy::Keyed, true));
    let before = harness.document().query_tag(harness.root(), "article");

    let mut reversed = two_lots();
    reversed.reverse();
    harness
        .store
        .dispatch(AuctionIntent::SetLotCollection { lots: reversed });
    harness.render();

    let after = harness.document().query_tag(harness.root(), "article");
    assert_eq!(after, vec![before[1], before[0]]);
    assert_eq!(
        harness
            .document()
            .attribute(&after[0], "data-key")
            .and_then(|v| v.as_str()),
        Some("2")
    );
}

#[test]
fn failed_render_leaves_store_and_next_render_intact() {
    let mut harness = Harness::loaded(Reconciler::default());
    let html = harness.renderer.html();
    let state = harness.store.get_state();
    let listeners = harness.store.listener_count();

    let broken = element("div", Props::new(), vec![element("not a tag", Props::new(), vec![])]);
    let err = harness.renderer.render(&broken).unwrap_err();

    assert_eq!(err, HostError::InvalidTag { tag: "not a tag".to_string() });
    assert!(Arc::ptr_eq(&harness.store.get_state(), &state));
    assert_eq!(harness.store.listener_count(), listeners);

    let journal = harness.render();
    assert!(journal.iter().all(|m| !m.is_structural()));
    assert_eq!(harness.renderer.html(), html);

    harness
        .store
        .dispatch(AuctionIntent::SetLotPrice { id: 2, price: 50 });
    harness.render();
    let prices = harness.document().query_class(harness.root(), "price");
    assert_eq!(harness.document().text_content(prices[1]), "50");
}
