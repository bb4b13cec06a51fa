use proptest::prelude::*;

use quickswitch_core::contract::SearchResponse;
use quickswitch_core::model::{BookmarkNode, HistoryItem, SourceKind, SourceRef, TabInfo};
use quickswitch_core::search::{rank, score};
use quickswitch_core::selection::{next_selection_index, Direction, SelectionState};

fn response_from(tabs: Vec<(String, String)>, bookmarks: Vec<(String, String)>, history: Vec<(String, String)>) -> SearchResponse {
    SearchResponse {
        tabs: tabs
            .into_iter()
            .enumerate()
            .map(|(i, (title, url))| TabInfo {
                id: Some(i as i64),
                window_id: 1,
                title: Some(title),
                url: Some(url),
                ..Default::default()
            })
            .collect(),
        bookmarks: bookmarks
            .into_iter()
            .enumerate()
            .map(|(i, (title, url))| BookmarkNode {
                id: format!("b{i}"),
                title,
                url: Some(format!("https://{url}")),
            })
            .collect(),
        history: history
            .into_iter()
            .enumerate()
            .map(|(i, (title, url))| HistoryItem {
                id: format!("h{i}"),
                title: Some(title),
                url: Some(format!("https://{url}")),
                ..Default::default()
            })
            .collect(),
    }
}

fn entries() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("[a-c ]{0,12}", "[a-c.]{1,10}"), 0..8)
}

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Up), Just(Direction::Down)]
}

proptest! {
    #[test]
    fn score_is_deterministic_and_bounded(query in "[a-z]{1,6}", title in ".{0,40}", url in ".{0,40}") {
        let first = score(&query, &title, &url);
        let second = score(&query, &title, &url);
        prop_assert_eq!(first, second);
        prop_assert!((0..=170).contains(&first));
    }

    #[test]
    fn groups_are_partitioned_in_fixed_order(
        query in "[a-c]{1,3}",
        tabs in entries(),
        bookmarks in entries(),
        history in entries(),
    ) {
        let total = tabs.len() + bookmarks.len() + history.len();
        let ranked = rank(&query, &response_from(tabs, bookmarks, history));

        prop_assert_eq!(ranked.len(), total);
        let order = |kind: SourceKind| SourceKind::ORDER.iter().position(|k| *k == kind);
        for pair in ranked.results().windows(2) {
            prop_assert!(order(pair[0].group()) <= order(pair[1].group()));
        }
        let covered: usize = ranked.groups().iter().map(|g| g.len).sum();
        prop_assert_eq!(covered, total);
        prop_assert!(ranked.groups().iter().all(|g| g.len > 0));
    }

    #[test]
    fn ties_keep_source_order(query in "[a-c]{1,3}", tabs in entries()) {
        let ranked = rank(&query, &response_from(tabs, Vec::new(), Vec::new()));

        for pair in ranked.results().windows(2) {
            prop_assert!(pair[0].relevance >= pair[1].relevance);
            if pair[0].relevance == pair[1].relevance {
                let (SourceRef::Tab { tab_id: left, .. }, SourceRef::Tab { tab_id: right, .. }) =
                    (&pair[0].candidate.source, &pair[1].candidate.source)
                else {
                    return Err(TestCaseError::fail("tab result without tab source"));
                };
                prop_assert!(left < right);
            }
        }
    }

    #[test]
    fn selection_stays_in_bounds(len in 1usize..20, moves in prop::collection::vec(direction(), 0..50)) {
        let mut state = SelectionState::new((0..len).collect::<Vec<_>>());
        for direction in moves {
            let change = state.step(direction).unwrap();
            prop_assert!(change.selected < len);
            prop_assert_eq!(state.selected_index(), Some(change.selected));
        }
    }

    #[test]
    fn stepping_down_len_times_returns_to_start(len in 1usize..20, start in 0usize..20) {
        let start = start % len;
        let mut index = start;
        for _ in 0..len {
            index = next_selection_index(index, len, Direction::Down);
        }
        prop_assert_eq!(index, start);
    }
}
