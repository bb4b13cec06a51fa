use crate::contract::SearchResponse;
use crate::model::{RankedResult, SearchCandidate, SourceKind};

pub const TAB_BIAS: i64 = 2000;
pub const BOOKMARK_BIAS: i64 = 1000;
pub const HISTORY_BIAS: i64 = 0;

pub const NO_RESULTS_TEXT: &str = "No results found";

/// Fixed addend that keeps every tab above every bookmark above every history entry.
/// Larger than the best possible text score (100 + 50 + 20).
pub fn source_bias(kind: SourceKind) -> i64 {
    match kind {
        SourceKind::Tab => TAB_BIAS,
        SourceKind::Bookmark => BOOKMARK_BIAS,
        SourceKind::History => HISTORY_BIAS,
    }
}

/// Text relevance of a title/url pair for a query. Case-insensitive.
pub fn score(query: &str, title: &str, url: &str) -> i64 {
    let query = query.to_lowercase();
    let title_folded = title.to_lowercase();
    let url_folded = url.to_lowercase();

    title_score(&title_folded, &query) + url_score(&url_folded, &query) + length_bonus(title)
}

fn title_score(title: &str, query: &str) -> i64 {
    if title == query {
        100
    } else if title.starts_with(query) {
        80
    } else if title.contains(&format!(" {query} ")) {
        70
    } else if title.contains(query) {
        60
    } else {
        0
    }
}

fn url_score(url: &str, query: &str) -> i64 {
    if url == query {
        50
    } else if url.starts_with(query) {
        40
    } else if url.contains(query) {
        30
    } else {
        0
    }
}

/// `max(0, 20 - len/2)` with the half length truncated. Length is counted in
/// UTF-16 code units, the unit browser titles are measured in.
fn length_bonus(title: &str) -> i64 {
    let half_length = (title.encode_utf16().count() / 2) as i64;
    (20 - half_length).max(0)
}

pub fn score_candidate(query: &str, candidate: &SearchCandidate) -> i64 {
    score(query, &candidate.title, candidate.url_or_empty()) + source_bias(candidate.kind)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultGroup {
    pub kind: SourceKind,
    /// Index of the group's first result in the flat ordering.
    pub start: usize,
    pub len: usize,
}

impl ResultGroup {
    pub fn label(&self) -> &'static str {
        self.kind.group_label()
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.len
    }
}

/// Flat display ordering partitioned into contiguous groups (Tabs, Bookmarks, History).
/// Empty groups are omitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedResults {
    results: Vec<RankedResult>,
    groups: Vec<ResultGroup>,
}

impl RankedResults {
    pub fn results(&self) -> &[RankedResult] {
        &self.results
    }

    pub fn groups(&self) -> &[ResultGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn into_results(self) -> Vec<RankedResult> {
        self.results
    }
}

/// Converts a raw aggregator response into ranked, grouped results.
/// Bookmarks and history entries without a url are dropped here.
pub fn rank(query: &str, response: &SearchResponse) -> RankedResults {
    let candidates = response
        .tabs
        .iter()
        .filter_map(SearchCandidate::from_tab)
        .chain(response.bookmarks.iter().filter_map(SearchCandidate::from_bookmark))
        .chain(response.history.iter().filter_map(SearchCandidate::from_history))
        .collect();

    rank_candidates(query, candidates)
}

pub fn rank_candidates(query: &str, candidates: Vec<SearchCandidate>) -> RankedResults {
    let mut scored: Vec<RankedResult> = candidates
        .into_iter()
        .map(|candidate| RankedResult {
            relevance: score_candidate(query, &candidate),
            candidate,
        })
        .collect();

    // `sort_by` is stable: equal scores keep their source order.
    scored.sort_by(|a, b| b.relevance.cmp(&a.relevance));

    let mut results = Vec::with_capacity(scored.len());
    let mut groups = Vec::new();
    for kind in SourceKind::ORDER {
        let start = results.len();
        results.extend(scored.iter().filter(|r| r.group() == kind).cloned());
        let len = results.len() - start;
        if len > 0 {
            groups.push(ResultGroup { kind, start, len });
        }
    }

    RankedResults { results, groups }
}
