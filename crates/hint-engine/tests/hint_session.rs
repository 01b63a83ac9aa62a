use dom_fixture::{FixtureDocument, PageFixture, RecordingRenderer};
use hint_engine::{
    ActionKind, Category, ElementClass, HintEngine, HintError, HintOutcome, HintPolicyView,
    HintStyle, MatchState, OpenMode, Resource,
};
use hintkit_core_types::{ElementId, WindowId};

type Engine = HintEngine<FixtureDocument, RecordingRenderer>;

const BASE: &str = "https://example.com/index.html";

fn engine_with(page: PageFixture, policy: HintPolicyView) -> Engine {
    let dom = FixtureDocument::from_page(&page).expect("fixture loads");
    HintEngine::new(&policy, dom, RecordingRenderer::new()).expect("valid policy")
}

fn letters(seq: &str) -> HintPolicyView {
    HintPolicyView {
        letter_seq: seq.to_string(),
        ..HintPolicyView::default()
    }
}

fn numbers() -> HintPolicyView {
    HintPolicyView {
        style: HintStyle::Number,
        ..HintPolicyView::default()
    }
}

/// One link per entry, stacked far enough apart that labels never collide.
fn links_page(texts: &[&str]) -> PageFixture {
    let body: String = texts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            format!(
                r#"<a id="l{i}" href="/{i}" data-rect="10 {} 80 12">{text}</a>"#,
                10 + i * 30
            )
        })
        .collect();
    PageFixture::new(format!("<html><body>{body}</body></html>")).with_url(BASE)
}

fn id(engine: &Engine, name: &str) -> ElementId {
    engine
        .dom()
        .element_by_id(name)
        .unwrap_or_else(|| panic!("element #{name} exists"))
}

fn session_elements(engine: &Engine) -> Vec<ElementId> {
    engine
        .session()
        .expect("session live")
        .active_nodes()
        .map(|node| node.element)
        .collect()
}

#[test]
fn three_links_get_first_letters_and_resolve_on_one_key() {
    let mut engine = engine_with(links_page(&["One", "Two", "Three"]), letters("asdfg"));

    let outcome = engine
        .show_hints(Category::Links, OpenMode::NORMAL)
        .expect("show hints");
    assert_eq!(outcome, HintOutcome::Pending);
    assert_eq!(engine.renderer().visible_labels(), vec!["a", "s", "d"]);
    assert_eq!(engine.state(), Some(MatchState::Initial));
    assert_eq!(
        engine.renderer().notifier_text(),
        Some("https://example.com/0")
    );

    let outcome = engine
        .update_hints("s", Category::Links)
        .expect("update hints");
    let action = outcome.action().expect("resolved");
    assert_eq!(action.element, id(&engine, "l1"));
    assert_eq!(action.to_string(), "click|click|https://example.com/1");
    assert!(!action.performed);
    assert!(engine.renderer().is_clean());
    assert!(engine.session().is_none());
    assert_eq!(engine.pending_target(), Some(id(&engine, "l1")));
}

#[test]
fn numeric_labels_for_twelve_candidates() {
    let texts = vec!["link"; 12];
    let mut engine = engine_with(links_page(&texts), numbers());

    engine
        .show_hints(Category::Links, OpenMode::NORMAL)
        .expect("show hints");
    let expected: Vec<String> = (10..=21).map(|n| n.to_string()).collect();
    assert_eq!(engine.renderer().visible_labels(), expected);

    let outcome = engine.update_hints("1", Category::Links).expect("update");
    assert!(outcome.is_pending());
    assert_eq!(engine.session().expect("live").active.len(), 10);
    assert_eq!(engine.state(), Some(MatchState::Filtering));

    let outcome = engine.update_hints("12", Category::Links).expect("update");
    assert_eq!(
        outcome.action().map(|a| a.element),
        Some(id(&engine, "l2"))
    );
}

#[test]
fn text_filter_in_letter_mode_is_case_insensitive() {
    let mut engine = engine_with(links_page(&["One", "Two", "Three"]), letters("asdfg"));
    engine
        .show_hints(Category::Links, OpenMode::NORMAL)
        .expect("show hints");

    // `T` is not a label character, so it filters by text
    let outcome = engine.update_hints("T", Category::Links).expect("update");
    assert!(outcome.is_pending());
    assert_eq!(engine.renderer().visible_labels(), vec!["s", "d"]);

    let outcome = engine.update_hints("Th", Category::Links).expect("update");
    assert_eq!(
        outcome.action().map(|a| a.element),
        Some(id(&engine, "l2"))
    );
}

#[test]
fn narrowing_is_monotonic_and_deletion_rebuilds() {
    let texts = ["a", "b", "c", "d", "e", "f"];
    let mut engine = engine_with(links_page(&texts), letters("asdfg"));
    engine
        .show_hints(Category::Links, OpenMode::NORMAL)
        .expect("show hints");
    let fresh = engine.renderer().visible_labels();
    assert_eq!(fresh, vec!["aa", "sa", "da", "as", "ss", "ds"]);

    engine.update_hints("a", Category::Links).expect("update");
    let narrowed = session_elements(&engine);
    assert_eq!(engine.renderer().visible_labels(), vec!["aa", "as"]);
    assert!(narrowed.len() < texts.len());

    // backspace to empty input restores the initial set
    let outcome = engine.update_hints("", Category::Links).expect("update");
    assert!(outcome.is_pending());
    assert_eq!(engine.renderer().visible_labels(), fresh);
    assert_eq!(session_elements(&engine).len(), texts.len());

    engine.update_hints("s", Category::Links).expect("update");
    let after_deletion = session_elements(&engine);

    let mut direct = engine_with(links_page(&texts), letters("asdfg"));
    direct
        .show_hints(Category::Links, OpenMode::NORMAL)
        .expect("show hints");
    direct.update_hints("s", Category::Links).expect("update");
    assert_eq!(after_deletion, session_elements(&direct));
    assert_eq!(
        engine.renderer().visible_labels(),
        direct.renderer().visible_labels()
    );
}

#[test]
fn empty_match_tears_down_and_next_update_rebuilds() {
    let mut engine = engine_with(links_page(&["One", "Two", "Three"]), letters("asdfg"));
    engine
        .show_hints(Category::Links, OpenMode::NORMAL)
        .expect("show hints");

    let outcome = engine.update_hints("x", Category::Links).expect("update");
    assert_eq!(outcome, HintOutcome::NoHints);
    assert!(engine.session().is_none());
    assert!(engine.renderer().is_clean());

    let outcome = engine.update_hints("d", Category::Links).expect("update");
    assert_eq!(
        outcome.action().map(|a| a.element),
        Some(id(&engine, "l2"))
    );
}

#[test]
fn escape_switches_digits_to_text_matching() {
    let mut engine = engine_with(links_page(&["Route 66", "Page 1", "Other"]), numbers());
    engine
        .show_hints(Category::Links, OpenMode::NORMAL)
        .expect("show hints");

    let outcome = engine.update_hints("\\", Category::Links).expect("update");
    assert!(outcome.is_pending());
    assert_eq!(engine.state(), Some(MatchState::Escaped));
    assert_eq!(engine.renderer().visible_labels().len(), 3);

    let outcome = engine.update_hints("\\6", Category::Links).expect("update");
    assert_eq!(
        outcome.action().map(|a| a.element),
        Some(id(&engine, "l0"))
    );
}

#[test]
fn numeric_text_match_prefers_earliest_word_and_relabels() {
    let mut engine = engine_with(
        links_page(&["Crab apple", "Apple pie", "Banana"]),
        numbers(),
    );
    engine
        .show_hints(Category::Links, OpenMode::NORMAL)
        .expect("show hints");

    let outcome = engine.update_hints("apple", Category::Links).expect("update");
    assert!(outcome.is_pending());
    assert_eq!(engine.renderer().visible_labels(), vec!["1", "2"]);
    let current = engine
        .session()
        .and_then(|s| s.current_node())
        .map(|node| node.element);
    assert_eq!(current, Some(id(&engine, "l1")));
    assert_eq!(
        engine.renderer().notifier_text(),
        Some("https://example.com/1")
    );

    // a digit now picks among the relabeled survivors
    let outcome = engine.update_hints("apple1", Category::Links).expect("update");
    assert_eq!(
        outcome.action().map(|a| a.element),
        Some(id(&engine, "l0"))
    );
}

#[test]
fn single_candidate_resolves_without_session() {
    let mut engine = engine_with(links_page(&["Only"]), HintPolicyView::default());
    let outcome = engine
        .show_hints(Category::Links, OpenMode::NORMAL)
        .expect("show hints");
    let action = outcome.action().expect("resolved immediately");
    assert_eq!(action.class, ElementClass::Click);
    assert!(engine.session().is_none());
    assert!(engine.renderer().is_clean());
}

#[test]
fn no_candidates_reports_no_hints() {
    let page = PageFixture::new("<html><body><p>text only</p></body></html>");
    let mut engine = engine_with(page, HintPolicyView::default());
    let outcome = engine
        .show_hints(Category::Links, OpenMode::NORMAL)
        .expect("show hints");
    assert_eq!(outcome, HintOutcome::NoHints);
    assert!(engine.session().is_none());
}

#[test]
fn invisible_elements_are_not_hinted() {
    let page = PageFixture::new(
        r#"<html><body>
            <a id="shown" href="/a" data-rect="10 10 40 12">shown</a>
            <a id="none" href="/b" style="display: none" data-rect="10 40 40 12">none</a>
            <div style="display:none"><a id="nested" href="/c" data-rect="10 70 40 12">nested</a></div>
            <a id="below" href="/d" data-rect="10 900 40 12">below</a>
            <a id="half" href="/e" data-rect="-20 100 40 12">half</a>
            <a id="hidden" href="/f" style="visibility: hidden" data-rect="10 130 40 12">hidden</a>
            <a id="unlaid" href="/g">no layout</a>
        </body></html>"#,
    );
    let mut engine = engine_with(page, HintPolicyView::default());
    engine
        .show_hints(Category::Links, OpenMode::NORMAL)
        .expect("show hints");
    assert_eq!(
        session_elements(&engine),
        vec![id(&engine, "shown"), id(&engine, "half")]
    );
}

#[test]
fn frames_are_traversed_and_blocked_frames_skipped() {
    let page = PageFixture::new(
        r#"<html><body>
            <a id="top" href="/top" data-rect="10 10 40 12">top</a>
            <iframe data-frame="inner" data-rect="0 100 400 300"></iframe>
            <iframe data-frame="ads" data-frame-blocked data-rect="0 500 400 100"></iframe>
            <a id="after" href="/after" data-rect="10 700 40 12">after</a>
        </body></html>"#,
    )
    .with_url(BASE)
    .with_frame(
        "inner",
        PageFixture::new(
            r#"<html><body><a id="inner" href="/inner" data-rect="5 5 40 12">inner</a></body></html>"#,
        )
        .with_url("https://frames.example.com/"),
    );
    let mut engine = engine_with(page, HintPolicyView::default());
    engine
        .show_hints(Category::Links, OpenMode::NORMAL)
        .expect("show hints");

    assert_eq!(
        session_elements(&engine),
        vec![id(&engine, "top"), id(&engine, "inner"), id(&engine, "after")]
    );
    let session = engine.session().expect("live");
    assert_eq!(session.nodes[1].window, WindowId(1));
    assert!(engine.renderer().stylesheet(WindowId(1)).is_some());
}

#[test]
fn image_map_areas_are_hinted_at_their_coordinates() {
    let page = PageFixture::new(
        r##"<html><body>
            <img id="img" src="/map.png" usemap="#nav" data-rect="100 100 200 100">
            <map name="nav">
                <area id="a1" href="/a1" coords="10,20,30,40">
                <area id="nohref" coords="0,0,5,5">
                <area id="a3" href="/a3" coords="50,0,60,10">
            </map>
            <img id="plain" src="/plain.png" data-rect="400 100 20 20">
            <a id="link" href="/link" data-rect="10 400 40 12">link</a>
        </body></html>"##,
    )
    .with_url(BASE);
    let mut engine = engine_with(page, HintPolicyView::default());
    engine
        .show_hints(Category::All, OpenMode::NORMAL)
        .expect("show hints");

    assert_eq!(
        session_elements(&engine),
        vec![
            id(&engine, "a1"),
            id(&engine, "a3"),
            id(&engine, "plain"),
            id(&engine, "link")
        ]
    );
    let session = engine.session().expect("live");
    assert!(session.nodes[0].is_area);
    assert!(!session.nodes[2].is_area);
    // areas are active first but never get an overlay
    assert_eq!(session.nodes[0].overlay, None);
    let first = engine
        .renderer()
        .hint(session.nodes[0].hint)
        .expect("hint rendered");
    assert_eq!((first.top, first.left), (120.0, 110.0));
    let second = engine
        .renderer()
        .hint(session.nodes[1].hint)
        .expect("hint rendered");
    assert_eq!((second.top, second.left), (100.0, 150.0));
}

#[test]
fn images_without_a_map_are_hinted_in_every_category() {
    let page = PageFixture::new(
        r#"<html><body>
            <img id="photo" src="/photo.png" data-rect="10 10 200 100">
            <a id="link" href="/x" data-rect="10 200 40 12">x</a>
        </body></html>"#,
    )
    .with_url(BASE);
    for category in [Category::Url, Category::All] {
        let mut engine = engine_with(page.clone(), HintPolicyView::default());
        let outcome = engine
            .show_hints(category, OpenMode::NORMAL)
            .expect("show hints");
        assert_eq!(outcome, HintOutcome::Pending, "category: {category:?}");
        assert_eq!(
            session_elements(&engine),
            vec![id(&engine, "photo"), id(&engine, "link")],
            "category: {category:?}"
        );
    }
}

#[test]
fn images_category_reports_url_without_resource() {
    let page = PageFixture::new(
        r#"<html><body>
            <img id="img" src="/photo.png" data-rect="10 10 200 100">
            <a href="/x" data-rect="10 200 40 12">x</a>
        </body></html>"#,
    )
    .with_url(BASE);
    let mut engine = engine_with(page, HintPolicyView::default());
    let outcome = engine
        .show_hints(Category::Images, OpenMode::NORMAL)
        .expect("show hints");
    let action = outcome.action().expect("single image resolves");
    assert_eq!(action.to_string(), "none|none|none");
    assert_eq!(action.resource, Resource::None);
    assert_eq!(action.url.as_deref(), Some("https://example.com/photo.png"));
}

#[test]
fn overlapping_labels_are_nudged_right() {
    let page = PageFixture::new(
        r#"<html><body>
            <a href="/a" data-rect="10 10 40 12">a</a>
            <a href="/b" data-rect="12 12 40 12">b</a>
        </body></html>"#,
    );
    let mut engine = engine_with(page, HintPolicyView::default());
    engine
        .show_hints(Category::Links, OpenMode::NORMAL)
        .expect("show hints");
    let session = engine.session().expect("live");
    let second = engine
        .renderer()
        .hint(session.nodes[1].hint)
        .expect("hint rendered");
    // default font is 10px, so the collision box is 5px and the nudge 13px
    assert_eq!((second.top, second.left), (12.0, 25.0));
    assert_eq!(second.z_index, 37002);
}

#[test]
fn labels_follow_page_scroll() {
    let page = PageFixture::new(
        r#"<html><body>
            <a href="/a" data-rect="10 150 40 12">a</a>
            <a href="/b" data-rect="10 300 40 12">b</a>
        </body></html>"#,
    )
    .with_scroll(0.0, 100.0);
    let policy = HintPolicyView {
        offset_top: 2.0,
        offset_left: -1.0,
        ..HintPolicyView::default()
    };
    let mut engine = engine_with(page, policy);
    engine
        .show_hints(Category::Links, OpenMode::NORMAL)
        .expect("show hints");
    let session = engine.session().expect("live");
    let first = engine
        .renderer()
        .hint(session.nodes[0].hint)
        .expect("hint rendered");
    assert_eq!((first.top, first.left), (152.0, 9.0));
}

#[test]
fn positioned_body_offsets_replace_scroll() {
    let page = PageFixture::new(
        r#"<html><body style="position: relative" data-rect="30 40 800 600">
            <a href="/a" data-rect="100 200 40 12">a</a>
            <a href="/b" data-rect="100 260 40 12">b</a>
        </body></html>"#,
    )
    .with_scroll(0.0, 100.0);
    let mut engine = engine_with(page, HintPolicyView::default());
    engine
        .show_hints(Category::Links, OpenMode::NORMAL)
        .expect("show hints");
    let session = engine.session().expect("live");
    let first = engine
        .renderer()
        .hint(session.nodes[0].hint)
        .expect("hint rendered");
    assert_eq!((first.top, first.left), (160.0, 70.0));
}

#[test]
fn cycling_wraps_and_updates_emphasis() {
    let mut engine = engine_with(links_page(&["One", "Two", "Three"]), letters("asdfg"));
    engine
        .show_hints(Category::Links, OpenMode::NORMAL)
        .expect("show hints");
    let theme = engine.theme().clone();

    engine.focus_next();
    assert_eq!(
        engine.renderer().notifier_text(),
        Some("https://example.com/1")
    );
    engine.focus_prev();
    engine.focus_prev();
    assert_eq!(
        engine.renderer().notifier_text(),
        Some("https://example.com/2")
    );

    let session = engine.session().expect("live");
    let current = session.current_node().expect("current");
    assert_eq!(current.element, id(&engine, "l2"));
    let fonts: Vec<Option<String>> = session
        .nodes
        .iter()
        .map(|node| engine.renderer().hint(node.hint).and_then(|h| h.font.clone()))
        .collect();
    assert_eq!(
        fonts,
        vec![
            Some(theme.font.clone()),
            Some(theme.font.clone()),
            Some(theme.big_font.clone())
        ]
    );
    let attached = engine.renderer().attached_overlays();
    assert_eq!(attached.len(), 1);
    assert_eq!(attached[0].background.as_deref(), Some(theme.active_color.as_str()));

    let outcome = engine.follow_active(Category::Links).expect("follow");
    assert_eq!(
        outcome.action().map(|a| a.element),
        Some(id(&engine, "l2"))
    );
    assert!(engine.renderer().is_clean());
}

#[test]
fn mark_mode_keeps_every_overlay_attached() {
    let policy = HintPolicyView {
        mark_hints: true,
        ..letters("asdfg")
    };
    let mut engine = engine_with(links_page(&["One", "Two", "Three"]), policy);
    engine
        .show_hints(Category::Links, OpenMode::NORMAL)
        .expect("show hints");
    assert_eq!(engine.renderer().attached_overlays().len(), 3);

    engine.focus_next();
    let theme = engine.theme().clone();
    let session = engine.session().expect("live");
    let backgrounds: Vec<Option<String>> = session
        .nodes
        .iter()
        .map(|node| {
            node.overlay
                .and_then(|o| engine.renderer().overlay(o))
                .and_then(|o| o.background.clone())
        })
        .collect();
    assert_eq!(
        backgrounds,
        vec![
            Some(theme.normal_color.clone()),
            Some(theme.active_color.clone()),
            Some(theme.normal_color.clone())
        ]
    );
    assert_eq!(engine.renderer().attached_overlays().len(), 3);
}

#[test]
fn without_auto_follow_a_single_survivor_waits() {
    let policy = HintPolicyView {
        auto_follow: false,
        ..letters("asdfg")
    };
    let mut engine = engine_with(links_page(&["One", "Two", "Three"]), policy);
    engine
        .show_hints(Category::Links, OpenMode::NORMAL)
        .expect("show hints");

    let outcome = engine.update_hints("d", Category::Links).expect("update");
    assert!(outcome.is_pending());
    let outcome = engine.follow_active(Category::Links).expect("follow");
    assert_eq!(
        outcome.action().map(|a| a.element),
        Some(id(&engine, "l2"))
    );
}

#[test]
fn clear_is_safe_in_any_state() {
    let mut engine = engine_with(links_page(&["One", "Two"]), HintPolicyView::default());
    engine.clear();
    engine.clear();
    assert!(engine.session().is_none());
    assert!(!engine.perform(ActionKind::Click));
    assert_eq!(
        engine.follow_active(Category::Links).expect("follow"),
        HintOutcome::NoHints
    );

    engine
        .show_hints(Category::Links, OpenMode::NORMAL)
        .expect("show hints");
    engine.clear();
    engine.clear();
    assert!(engine.renderer().is_clean());
    assert_eq!(engine.state(), None);
}

#[test]
fn invalid_alphabet_is_rejected() {
    let dom = FixtureDocument::from_html("<a>x</a>").expect("fixture loads");
    let result = HintEngine::new(&letters("a"), dom, RecordingRenderer::new());
    assert!(matches!(result, Err(HintError::InvalidConfig(_))));
}
