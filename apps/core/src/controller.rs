use std::time::{Duration, Instant};

use crate::commands::{built_in_commands, find_matching_commands, is_command, Command, CommandAction};
use crate::config::Config;
use crate::contract::{BackgroundMessage, PageRequest, SearchResponse};
use crate::model::RankedResult;
use crate::overlay_state::{Key, KeyRoute, OpenAction, OverlayState};
use crate::search::{rank, ResultGroup};
use crate::selection::{HoverDebounce, SelectionChange, SelectionState};

/// One selectable row in the overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Result(RankedResult),
    Command(Command),
}

impl Entry {
    pub fn activate(&self) -> Dispatch {
        match self {
            Self::Result(result) => Dispatch::Request(result.candidate.action().into()),
            Self::Command(command) => Dispatch::Command(command.action),
        }
    }
}

/// Side effect requested by the controller when an entry is activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Send to the background context.
    Request(PageRequest),
    /// Run locally in the page.
    Command(CommandAction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Empty query: results cleared, nothing to send.
    Cleared,
    Commands { count: usize },
    /// Send `request`; hand the response back with `generation`.
    Search { generation: u64, request: PageRequest },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
    Applied { len: usize },
    NoResults,
    /// A newer query was issued after this one; the response is dropped.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    PassThrough,
    Closed,
    Moved(SelectionChange),
    Dispatched(Dispatch),
    RefocusQuery,
    Ignored,
}

/// Page-context owner of the overlay, the query, and the current selection.
#[derive(Debug)]
pub struct UiController {
    overlay: OverlayState,
    selection: SelectionState<Entry>,
    groups: Vec<ResultGroup>,
    query: String,
    issued_generation: u64,
    awaiting: Option<u64>,
    no_results: bool,
    hover: HoverDebounce,
}

impl UiController {
    pub fn new(hover_delay: Duration) -> Self {
        Self {
            overlay: OverlayState::default(),
            selection: SelectionState::Empty,
            groups: Vec::new(),
            query: String::new(),
            issued_generation: 0,
            awaiting: None,
            no_results: false,
            hover: HoverDebounce::new(hover_delay),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(Duration::from_millis(cfg.hover_debounce_ms))
    }

    pub fn overlay(&self) -> &OverlayState {
        &self.overlay
    }

    pub fn is_open(&self) -> bool {
        self.overlay.is_visible()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selection(&self) -> &SelectionState<Entry> {
        &self.selection
    }

    pub fn groups(&self) -> &[ResultGroup] {
        &self.groups
    }

    /// True when the last applied response had nothing to show; the
    /// placeholder is not a selectable entry.
    pub fn shows_no_results(&self) -> bool {
        self.no_results
    }

    pub fn handle_background_message(&mut self, message: BackgroundMessage) -> OpenAction {
        match message {
            BackgroundMessage::OpenSearch => self.open(),
        }
    }

    /// Reopening keeps the previous query and selection.
    pub fn open(&mut self) -> OpenAction {
        self.overlay.open()
    }

    pub fn close(&mut self) -> bool {
        self.hover.cancel();
        self.overlay.close()
    }

    pub fn on_query_input(&mut self, raw: &str) -> QueryOutcome {
        let query = raw.trim();
        self.query = query.to_string();
        self.hover.cancel();
        // Whatever is in flight no longer matches the field.
        self.awaiting = None;

        if query.is_empty() {
            self.groups.clear();
            self.no_results = false;
            self.selection = SelectionState::Empty;
            return QueryOutcome::Cleared;
        }

        if is_command(query) {
            let entries: Vec<Entry> = find_matching_commands(query, built_in_commands())
                .into_iter()
                .map(|command| Entry::Command(*command))
                .collect();
            let count = entries.len();
            self.groups.clear();
            self.no_results = count == 0;
            self.selection = SelectionState::new(entries);
            return QueryOutcome::Commands { count };
        }

        // The previous results stay listed until the response replaces them.
        self.issued_generation += 1;
        self.awaiting = Some(self.issued_generation);
        QueryOutcome::Search {
            generation: self.issued_generation,
            request: PageRequest::Search {
                query: query.to_string(),
            },
        }
    }

    pub fn on_search_response(&mut self, generation: u64, response: &SearchResponse) -> ResponseOutcome {
        if self.awaiting != Some(generation) {
            tracing::debug!(
                event = "stale_search_response",
                generation,
                latest = self.issued_generation,
            );
            return ResponseOutcome::Stale;
        }
        self.awaiting = None;
        // A pending hover points into the list being replaced.
        self.hover.cancel();

        let ranked = rank(&self.query, response);
        self.groups = ranked.groups().to_vec();
        let entries: Vec<Entry> = ranked.into_results().into_iter().map(Entry::Result).collect();
        let len = entries.len();
        self.selection = SelectionState::new(entries);
        self.no_results = len == 0;

        if len == 0 {
            ResponseOutcome::NoResults
        } else {
            ResponseOutcome::Applied { len }
        }
    }

    pub fn on_key(&mut self, key: &Key) -> KeyOutcome {
        match self.overlay.route_key(key) {
            KeyRoute::PassThrough => KeyOutcome::PassThrough,
            KeyRoute::Close => {
                self.close();
                KeyOutcome::Closed
            }
            KeyRoute::Move(direction) => match self.selection.step(direction) {
                Some(change) => KeyOutcome::Moved(change),
                None => KeyOutcome::Ignored,
            },
            KeyRoute::Submit => match self.selection.selected_index() {
                Some(index) => self
                    .activate(index)
                    .map(KeyOutcome::Dispatched)
                    .unwrap_or(KeyOutcome::Ignored),
                None => KeyOutcome::Ignored,
            },
            KeyRoute::RefocusQuery => KeyOutcome::RefocusQuery,
        }
    }

    /// Pointer click outside the modal.
    pub fn on_backdrop_click(&mut self) -> bool {
        self.close()
    }

    pub fn on_pointer_enter(&mut self, index: usize, now: Instant) {
        self.hover.on_enter(index, now);
    }

    pub fn on_pointer_leave(&mut self, index: usize) {
        self.hover.on_leave(index);
    }

    /// Applies a debounced hover once it is due. Ignored while the document
    /// does not have focus.
    pub fn poll_hover(&mut self, now: Instant, has_focus: bool) -> Option<SelectionChange> {
        let index = self.hover.poll(now)?;
        if !has_focus || !self.is_open() {
            return None;
        }
        self.selection.select(index)
    }

    /// Activates the entry at `index` (Enter or click) and closes the overlay.
    pub fn activate(&mut self, index: usize) -> Option<Dispatch> {
        let dispatch = self.selection.results().get(index)?.activate();
        self.close();
        Some(dispatch)
    }
}

impl Default for UiController {
    fn default() -> Self {
        Self::new(HoverDebounce::DEFAULT_DELAY)
    }
}
