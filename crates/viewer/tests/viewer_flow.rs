//! End-to-end viewer behaviour against an in-memory deck

mod common;

use common::{healthy_deck, manifest, MemoryFetcher, RecordingWidget, STYLESHEET};
use flipview_common::{ViewerConfig, ZoomLevel};
use flipview_viewer::{
    Button, HeadlessSurface, Key, NavControl, SpreadWidget, UiEvent, Viewer, ViewerSurface,
};

async fn start_spread(total: u32) -> Viewer<HeadlessSurface, SpreadWidget> {
    Viewer::start(
        ViewerConfig::default(),
        &healthy_deck(total),
        HeadlessSurface::new(),
        SpreadWidget::new(),
    )
    .await
}

fn assert_boundaries(viewer: &Viewer<HeadlessSurface, SpreadWidget>) {
    let state = viewer.state();
    let surface = viewer.surface();
    assert_eq!(surface.is_enabled(NavControl::First), state.current != 1);
    assert_eq!(surface.is_enabled(NavControl::Previous), state.current != 1);
    assert_eq!(surface.is_enabled(NavControl::Next), state.current != state.total);
    assert_eq!(surface.is_enabled(NavControl::Last), state.current != state.total);
}

#[tokio::test]
async fn startup_populates_first_spread() {
    let viewer = start_spread(12).await;
    let surface = viewer.surface();

    assert_eq!(viewer.state().total, 12);
    assert_eq!(viewer.state().current, 1);
    assert_eq!(surface.total_pages(), 12);
    assert_eq!(surface.populated_pages(), vec![1, 2]);

    let first = surface.page(1).unwrap();
    assert_eq!(first.id(), Some("slide1"));
    assert_eq!(first.find_by_class("text-block").len(), 1);
    assert_eq!(first.find_by_class("image-block").len(), 1);
    assert_eq!(first.style("display").as_deref(), Some("block"));
    assert_eq!(first.style("pointer-events").as_deref(), Some("none"));
    assert_eq!(surface.page(2).unwrap().id(), Some("slide2"));

    assert!(viewer.pages()[2..].iter().all(|p| !p.is_populated()));
    assert_eq!(surface.counter(), "1");
    assert_eq!(surface.slider(), 1);
    assert_boundaries(&viewer);

    assert_eq!(surface.thumbnails().len(), 12);
    assert_eq!(surface.active_thumbnails(), vec![1]);
    assert_eq!(surface.stylesheets().len(), 1);
    assert_eq!(surface.stylesheets()[0].0, "slide-styles");
    assert_eq!(surface.stylesheets()[0].1, STYLESHEET);

    assert_eq!(viewer.widget().resize_count(), 1);
    assert_eq!(viewer.widget().size(), (1600, 1200));
}

#[tokio::test]
async fn page_containers_mark_covers() {
    let viewer = start_spread(4).await;
    let pages = viewer.widget().pages();
    assert_eq!(pages.len(), 4);
    assert!(pages[0].cover && !pages[0].back_cover);
    assert!(!pages[1].cover && !pages[1].back_cover);
    assert!(pages[3].back_cover);
}

#[tokio::test]
async fn navigating_populates_neighbours() {
    let mut viewer = start_spread(12).await;

    viewer.go_to(6);
    assert_eq!(viewer.state().current, 6);
    for ordinal in [5, 6, 7] {
        assert!(viewer.page(ordinal).unwrap().is_populated(), "page {}", ordinal);
    }
    assert!(!viewer.page(4).unwrap().is_populated());
    assert!(!viewer.page(8).unwrap().is_populated());
    assert_eq!(viewer.surface().counter(), "6-7");
    assert_eq!(viewer.surface().slider(), 6);
    assert_eq!(viewer.surface().active_thumbnails(), vec![6]);
    assert_boundaries(&viewer);
}

#[tokio::test]
async fn last_page_disables_forward_controls() {
    let mut viewer = start_spread(12).await;

    viewer.handle(UiEvent::Click(Button::Last));
    assert_eq!(viewer.state().current, 12);
    assert_eq!(viewer.surface().counter(), "12");
    assert!(!viewer.surface().is_enabled(NavControl::Next));
    assert!(!viewer.surface().is_enabled(NavControl::Last));
    assert!(viewer.surface().is_enabled(NavControl::Previous));
    assert!(viewer.page(11).unwrap().is_populated());

    viewer.next();
    assert_eq!(viewer.state().current, 12);
}

#[tokio::test]
async fn counter_and_boundaries_hold_on_every_page() {
    let mut viewer = start_spread(7).await;
    for ordinal in 1..=7 {
        viewer.go_to(ordinal);
        let expected = if ordinal == 1 || ordinal == 7 {
            ordinal.to_string()
        } else {
            format!("{}-{}", ordinal, ordinal + 1)
        };
        assert_eq!(viewer.surface().counter(), expected);
        assert_eq!(viewer.surface().active_thumbnails(), vec![ordinal]);
        assert_boundaries(&viewer);
    }
}

#[tokio::test]
async fn out_of_range_go_to_is_ignored() {
    let mut viewer = start_spread(12).await;
    viewer.go_to(4);

    viewer.go_to(0);
    assert_eq!(viewer.state().current, 4);
    viewer.go_to(13);
    assert_eq!(viewer.state().current, 4);
    assert_eq!(viewer.surface().counter(), "4-5");
}

#[tokio::test]
async fn every_page_populated_after_full_walk() {
    let mut viewer = start_spread(12).await;
    while !viewer.state().at_last() {
        viewer.next();
    }
    assert!(viewer.pages().iter().all(|p| p.is_populated()));
    for ordinal in 1..=12 {
        assert_eq!(viewer.surface().render_count(ordinal), 1, "page {}", ordinal);
    }
}

#[tokio::test]
async fn populate_is_idempotent() {
    let mut viewer = start_spread(3).await;
    let before = viewer.surface().page(1).cloned();

    assert!(!viewer.populate(1));
    assert!(!viewer.populate(0));
    assert!(!viewer.populate(4));
    assert_eq!(viewer.surface().page(1).cloned(), before);
    assert_eq!(viewer.surface().render_count(1), 1);

    assert!(viewer.populate(3));
    assert!(!viewer.populate(3));
    assert_eq!(viewer.surface().render_count(3), 1);
}

#[tokio::test]
async fn markup_failure_falls_back_to_placeholders() {
    let fetcher = MemoryFetcher::new()
        .with("metadata.json", manifest(5))
        .with("style.css", STYLESHEET);

    let mut viewer = Viewer::start(
        ViewerConfig::default(),
        &fetcher,
        HeadlessSurface::new(),
        SpreadWidget::new(),
    )
    .await;
    assert!(viewer.markup().is_none());

    viewer.go_to(5);
    viewer.go_to(3);
    for ordinal in 1..=5 {
        let page = viewer.surface().page(ordinal).unwrap();
        assert!(
            page.text_content().contains(&format!("Slide {}", ordinal)),
            "page {}",
            ordinal
        );
        assert!(page.find_by_class("text-block").is_empty());
    }

    let first = &viewer.surface().thumbnails()[0].element;
    let tile = first.child_elements().next().unwrap();
    assert_eq!(tile.style("background").as_deref(), Some("#f0f0f0"));
    assert_eq!(tile.text_content(), "1");
    assert_eq!(first.find_by_class("thumbnail-number")[0].text_content(), "1");
}

#[tokio::test]
async fn missing_fragment_gets_placeholder() {
    let markup = common::deck_markup(2);
    let fetcher = MemoryFetcher::new()
        .with("metadata.json", manifest(3))
        .with("index.html", markup);

    let mut viewer = Viewer::start(
        ViewerConfig::default(),
        &fetcher,
        HeadlessSurface::new(),
        SpreadWidget::new(),
    )
    .await;
    viewer.go_to(3);

    assert_eq!(viewer.surface().page(2).unwrap().id(), Some("slide2"));
    let third = viewer.surface().page(3).unwrap();
    assert!(third.text_content().contains("Slide 3"));
    assert!(viewer.surface().stylesheets().is_empty());
}

#[tokio::test]
async fn manifest_failure_uses_host_slides() {
    let fetcher = MemoryFetcher::new().with("index.html", common::deck_markup(3));
    let surface = HeadlessSurface::new().with_host_slides(vec![None, Some("b.png".to_string()), None]);

    let viewer = Viewer::start(ViewerConfig::default(), &fetcher, surface, SpreadWidget::new()).await;

    assert_eq!(viewer.state().total, 3);
    assert_eq!(viewer.slides()[0].image.as_deref(), Some("slide1.jpg"));
    assert_eq!(viewer.slides()[1].image.as_deref(), Some("b.png"));
    assert_eq!(viewer.surface().page(1).unwrap().id(), Some("slide1"));
}

#[tokio::test]
async fn nothing_loads_yields_empty_viewer() {
    let mut viewer = Viewer::start(
        ViewerConfig::default(),
        &MemoryFetcher::new(),
        HeadlessSurface::new(),
        SpreadWidget::new(),
    )
    .await;

    assert_eq!(viewer.state().total, 0);
    assert!(viewer.pages().is_empty());
    viewer.next();
    viewer.handle(UiEvent::Click(Button::Last));
    viewer.handle(UiEvent::KeyDown(Key::Home));
    assert_eq!(viewer.state().current, 0);
}

#[tokio::test]
async fn stylesheet_injected_once() {
    let fetcher = healthy_deck(2);
    let mut surface = HeadlessSurface::new();
    surface.inject_stylesheet("slide-styles", "/* host */");

    let viewer = Viewer::start(ViewerConfig::default(), &fetcher, surface, SpreadWidget::new()).await;

    assert_eq!(viewer.surface().stylesheets().len(), 1);
    assert_eq!(viewer.surface().stylesheets()[0].1, "/* host */");
    assert_eq!(fetcher.requests(), vec!["metadata.json", "index.html"]);
}

#[tokio::test]
async fn startup_fetch_order() {
    let fetcher = healthy_deck(2);
    let _viewer =
        Viewer::start(ViewerConfig::default(), &fetcher, HeadlessSurface::new(), SpreadWidget::new())
            .await;
    assert_eq!(
        fetcher.requests(),
        vec!["metadata.json", "index.html", "style.css"]
    );
}

#[tokio::test]
async fn keyboard_navigation() {
    let mut viewer = start_spread(12).await;

    viewer.handle(UiEvent::KeyDown(Key::ArrowRight));
    assert_eq!(viewer.state().current, 2);
    viewer.handle(UiEvent::KeyDown(Key::ArrowRight));
    assert_eq!(viewer.state().current, 4);
    viewer.handle(UiEvent::KeyDown(Key::ArrowLeft));
    assert_eq!(viewer.state().current, 3);
    viewer.handle(UiEvent::KeyDown(Key::End));
    assert_eq!(viewer.state().current, 12);
    viewer.handle(UiEvent::KeyDown(Key::Home));
    assert_eq!(viewer.state().current, 1);

    let outcome = viewer.handle(UiEvent::KeyDown(Key::from_name("q")));
    assert!(!outcome.prevent_default);
}

#[tokio::test]
async fn fullscreen_key_toggles_and_prevents_default() {
    let mut viewer = start_spread(4).await;

    let outcome = viewer.handle(UiEvent::KeyDown(Key::from_name("F11")));
    assert!(outcome.prevent_default);
    assert!(viewer.state().fullscreen);
    assert!(viewer.surface().fullscreen_class());

    viewer.handle(UiEvent::Click(Button::ToggleThumbnails));
    assert!(viewer.surface().panel_open());

    viewer.handle(UiEvent::KeyDown(Key::Escape));
    assert!(!viewer.state().fullscreen);
    assert!(!viewer.surface().fullscreen_class());
    assert!(!viewer.surface().panel_open());
    assert!(!viewer.state().thumbnails_open);
}

#[tokio::test]
async fn escape_outside_fullscreen_only_closes_panel() {
    let mut viewer = start_spread(4).await;
    viewer.handle(UiEvent::Click(Button::ToggleThumbnails));

    viewer.handle(UiEvent::KeyDown(Key::Escape));
    assert!(!viewer.state().fullscreen);
    assert!(!viewer.surface().is_fullscreen());
    assert!(!viewer.surface().panel_open());
}

#[tokio::test]
async fn rejected_fullscreen_leaves_state() {
    let mut viewer = Viewer::start(
        ViewerConfig::default(),
        &healthy_deck(2),
        HeadlessSurface::new().deny_fullscreen(),
        SpreadWidget::new(),
    )
    .await;

    viewer.handle(UiEvent::Click(Button::Fullscreen));
    assert!(!viewer.state().fullscreen);
    assert!(!viewer.surface().fullscreen_class());
}

#[tokio::test]
async fn fullscreen_left_externally_is_reentered() {
    let mut viewer = start_spread(2).await;
    viewer.toggle_fullscreen();
    viewer.surface_mut().leave_fullscreen_externally();

    viewer.toggle_fullscreen();
    assert!(viewer.state().fullscreen);
    assert!(viewer.surface().is_fullscreen());
}

#[tokio::test]
async fn zoom_levels_swap_classes() {
    let mut viewer = start_spread(2).await;
    assert_eq!(viewer.state().zoom, ZoomLevel::Fit);
    assert_eq!(viewer.surface().zoom_class(), None);

    viewer.handle(UiEvent::Click(Button::ZoomIn));
    assert_eq!(viewer.state().zoom, ZoomLevel::In);
    assert_eq!(viewer.surface().zoom_class(), Some("zoomed"));

    viewer.handle(UiEvent::Click(Button::ZoomOut));
    assert_eq!(viewer.state().zoom, ZoomLevel::Out);
    assert_eq!(viewer.surface().zoom_class(), Some("zoomed-out"));
}

#[tokio::test]
async fn slider_and_thumbnail_navigation() {
    let mut viewer = start_spread(12).await;

    viewer.handle(UiEvent::SliderInput("9".to_string()));
    assert_eq!(viewer.state().current, 9);
    viewer.handle(UiEvent::SliderInput("nine".to_string()));
    assert_eq!(viewer.state().current, 9);

    viewer.handle(UiEvent::Click(Button::ToggleThumbnails));
    viewer.handle(UiEvent::ThumbnailClick(2));
    assert_eq!(viewer.state().current, 2);
    assert!(!viewer.surface().panel_open());
    assert_eq!(viewer.surface().active_thumbnails(), vec![2]);
}

#[tokio::test]
async fn turning_page_is_marked_until_turn_ends() {
    let mut viewer = start_spread(6).await;
    viewer.go_to(4);
    assert!(!viewer.surface().is_turning(4));
}

#[tokio::test]
async fn fake_widget_receives_commands() {
    let mut viewer = Viewer::start(
        ViewerConfig::default(),
        &healthy_deck(5),
        HeadlessSurface::new(),
        RecordingWidget::default(),
    )
    .await;

    viewer.next();
    viewer.go_to(0);
    viewer.go_to(4);
    viewer.previous();

    assert_eq!(
        viewer.widget().commands,
        vec!["mount", "size 1600x1200", "next", "page 4", "previous"]
    );
    assert_eq!(viewer.state().current, 3);
    assert_eq!(viewer.widget().mounted.len(), 5);
}

#[tokio::test]
async fn widget_turn_beyond_deck_is_vetoed() {
    let mut viewer = Viewer::start(
        ViewerConfig::default(),
        &healthy_deck(2),
        HeadlessSurface::new(),
        RecordingWidget::default(),
    )
    .await;

    viewer.next();
    viewer.next();
    assert_eq!(viewer.state().current, 2);
    assert!(viewer
        .widget()
        .commands
        .contains(&"prevented 3".to_string()));
}

#[tokio::test]
async fn missing_notification_populates_pages() {
    let mut widget = RecordingWidget::default();
    widget.report_missing = vec![9, 10];

    let mut viewer = Viewer::start(
        ViewerConfig::default(),
        &healthy_deck(12),
        HeadlessSurface::new(),
        widget,
    )
    .await;

    viewer.next();
    assert!(viewer.page(9).unwrap().is_populated());
    assert!(viewer.page(10).unwrap().is_populated());
    assert_eq!(viewer.surface().populated_pages(), vec![1, 2, 3, 9, 10]);
}
