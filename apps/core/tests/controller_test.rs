use quickswitch_core::contract::{BackgroundMessage, PageRequest, SearchResponse};
use quickswitch_core::controller::{Dispatch, Entry, KeyOutcome, QueryOutcome, ResponseOutcome, UiController};
use quickswitch_core::model::{BookmarkNode, HistoryItem, SourceKind, TabInfo};
use quickswitch_core::overlay_state::{Key, OpenAction};
use quickswitch_core::selection::SelectionChange;

fn issue(ui: &mut UiController, query: &str) -> u64 {
    match ui.on_query_input(query) {
        QueryOutcome::Search { generation, request } => {
            assert_eq!(
                request,
                PageRequest::Search {
                    query: query.trim().to_string()
                }
            );
            generation
        }
        other => panic!("expected a search request, got {other:?}"),
    }
}

fn mixed_response() -> SearchResponse {
    SearchResponse {
        tabs: vec![TabInfo {
            id: Some(11),
            window_id: 2,
            title: Some("GitHub".into()),
            url: Some("https://github.com".into()),
            ..Default::default()
        }],
        bookmarks: vec![BookmarkNode {
            id: "b".into(),
            title: "git".into(),
            url: Some("https://git-scm.com".into()),
        }],
        history: vec![HistoryItem {
            id: "h".into(),
            title: Some("git tutorial".into()),
            url: Some("https://learn.example/git".into()),
            ..Default::default()
        }],
    }
}

fn selected_kind(ui: &UiController) -> Option<SourceKind> {
    match ui.selection().selected()? {
        Entry::Result(result) => Some(result.group()),
        Entry::Command(_) => None,
    }
}

#[test]
fn open_search_message_mounts_once_then_refocuses() {
    let mut ui = UiController::default();
    assert_eq!(
        ui.handle_background_message(BackgroundMessage::OpenSearch),
        OpenAction::Mount
    );
    assert_eq!(
        ui.handle_background_message(BackgroundMessage::OpenSearch),
        OpenAction::FocusExisting
    );
    assert!(ui.close());
    assert_eq!(ui.open(), OpenAction::Reveal);
}

#[test]
fn empty_response_shows_placeholder_and_enter_does_nothing() {
    let mut ui = UiController::default();
    ui.open();
    let generation = issue(&mut ui, "zzz");

    assert_eq!(
        ui.on_search_response(generation, &SearchResponse::default()),
        ResponseOutcome::NoResults
    );
    assert!(ui.shows_no_results());
    assert!(ui.selection().is_empty());
    assert_eq!(ui.on_key(&Key::Enter), KeyOutcome::Ignored);
    assert!(ui.is_open());
}

#[test]
fn tabs_come_first_and_are_preselected() {
    let mut ui = UiController::default();
    ui.open();
    let generation = issue(&mut ui, "git");

    assert_eq!(
        ui.on_search_response(generation, &mixed_response()),
        ResponseOutcome::Applied { len: 3 }
    );

    let labels: Vec<&str> = ui.groups().iter().map(|g| g.label()).collect();
    assert_eq!(labels, vec!["Tabs", "Bookmarks", "History"]);
    assert_eq!(selected_kind(&ui), Some(SourceKind::Tab));
}

#[test]
fn arrow_keys_wrap_around() {
    let mut ui = UiController::default();
    ui.open();
    let generation = issue(&mut ui, "git");
    ui.on_search_response(generation, &mixed_response());

    assert_eq!(
        ui.on_key(&Key::ArrowUp),
        KeyOutcome::Moved(SelectionChange {
            deselected: Some(0),
            selected: 2
        })
    );
    assert_eq!(selected_kind(&ui), Some(SourceKind::History));
    assert_eq!(
        ui.on_key(&Key::ArrowDown),
        KeyOutcome::Moved(SelectionChange {
            deselected: Some(2),
            selected: 0
        })
    );
}

#[test]
fn enter_on_tab_dispatches_switch_and_closes() {
    let mut ui = UiController::default();
    ui.open();
    let generation = issue(&mut ui, "git");
    ui.on_search_response(generation, &mixed_response());

    assert_eq!(
        ui.on_key(&Key::Enter),
        KeyOutcome::Dispatched(Dispatch::Request(PageRequest::SwitchToTab {
            tab_id: 11,
            window_id: 2
        }))
    );
    assert!(!ui.is_open());
}

#[test]
fn click_on_bookmark_dispatches_open_bookmark() {
    let mut ui = UiController::default();
    ui.open();
    let generation = issue(&mut ui, "git");
    ui.on_search_response(generation, &mixed_response());

    assert_eq!(
        ui.activate(1),
        Some(Dispatch::Request(PageRequest::OpenBookmark {
            url: "https://git-scm.com".into()
        }))
    );
    assert_eq!(ui.activate(9), None);
}

#[test]
fn reopening_keeps_query_and_selection() {
    let mut ui = UiController::default();
    ui.open();
    let generation = issue(&mut ui, "git");
    ui.on_search_response(generation, &mixed_response());
    ui.on_key(&Key::ArrowDown);

    assert_eq!(ui.on_key(&Key::Escape), KeyOutcome::Closed);
    assert_eq!(ui.open(), OpenAction::Reveal);

    assert_eq!(ui.query(), "git");
    assert_eq!(ui.selection().selected_index(), Some(1));
}

#[test]
fn keys_pass_through_while_closed() {
    let mut ui = UiController::default();
    assert_eq!(ui.on_key(&Key::ArrowDown), KeyOutcome::PassThrough);
    assert_eq!(ui.on_key(&Key::Escape), KeyOutcome::PassThrough);

    ui.open();
    assert_eq!(ui.on_key(&Key::from_name("a")), KeyOutcome::RefocusQuery);
}

#[test]
fn backdrop_click_closes() {
    let mut ui = UiController::default();
    ui.open();
    assert!(ui.on_backdrop_click());
    assert!(!ui.on_backdrop_click());
}

#[test]
fn unknown_command_shows_no_results() {
    let mut ui = UiController::default();
    ui.open();
    assert_eq!(ui.on_query_input("!weather"), QueryOutcome::Commands { count: 0 });
    assert!(ui.shows_no_results());
    assert_eq!(ui.on_key(&Key::Enter), KeyOutcome::Ignored);
}
