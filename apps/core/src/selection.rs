use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Visual update implied by a selection move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChange {
    pub deselected: Option<usize>,
    pub selected: usize,
}

/// Results of the current query plus the highlighted index.
/// `selected` is always `< results.len()`.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionState<T> {
    Empty,
    HasResults { results: Vec<T>, selected: usize },
}

impl<T> SelectionState<T> {
    pub fn new(results: Vec<T>) -> Self {
        if results.is_empty() {
            Self::Empty
        } else {
            Self::HasResults {
                results,
                selected: 0,
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn len(&self) -> usize {
        self.results().len()
    }

    pub fn results(&self) -> &[T] {
        match self {
            Self::Empty => &[],
            Self::HasResults { results, .. } => results,
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        match self {
            Self::Empty => None,
            Self::HasResults { selected, .. } => Some(*selected),
        }
    }

    pub fn selected(&self) -> Option<&T> {
        match self {
            Self::Empty => None,
            Self::HasResults { results, selected } => results.get(*selected),
        }
    }

    /// Moves one step, wrapping at both ends.
    pub fn step(&mut self, direction: Direction) -> Option<SelectionChange> {
        let Self::HasResults { results, selected } = self else {
            return None;
        };

        let len = results.len();
        let previous = *selected;
        *selected = next_selection_index(previous, len, direction);
        Some(SelectionChange {
            deselected: Some(previous),
            selected: *selected,
        })
    }

    /// Selects an explicit index (pointer hover). Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> Option<SelectionChange> {
        let Self::HasResults { results, selected } = self else {
            return None;
        };
        if index >= results.len() {
            return None;
        }

        let previous = *selected;
        *selected = index;
        Some(SelectionChange {
            deselected: Some(previous),
            selected: index,
        })
    }
}

impl<T> Default for SelectionState<T> {
    fn default() -> Self {
        Self::Empty
    }
}

pub fn next_selection_index(current: usize, len: usize, direction: Direction) -> usize {
    if len == 0 {
        return 0;
    }

    let current = current.min(len - 1);
    match direction {
        Direction::Down => (current + 1) % len,
        Direction::Up => (current + len - 1) % len,
    }
}

/// Scroll state of the result list, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_top: f64,
    pub height: f64,
}

/// Item position relative to the top of the list content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemBounds {
    pub top: f64,
    pub height: f64,
}

impl ItemBounds {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// New `scroll_top` that brings `item` into view, moving only as far as needed.
pub fn scroll_into_view(viewport: Viewport, item: ItemBounds) -> f64 {
    let visible_bottom = viewport.scroll_top + viewport.height;
    if item.bottom() > visible_bottom {
        viewport.scroll_top + (item.bottom() - visible_bottom)
    } else if item.top < viewport.scroll_top {
        item.top
    } else {
        viewport.scroll_top
    }
}

/// Delays hover selection so the pointer resting over the list during the
/// first paint does not steal the selection.
#[derive(Debug, Clone)]
pub struct HoverDebounce {
    delay: Duration,
    pending: Option<(usize, Instant)>,
}

impl HoverDebounce {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(50);

    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn on_enter(&mut self, index: usize, now: Instant) {
        self.pending = Some((index, now + self.delay));
    }

    pub fn on_leave(&mut self, index: usize) {
        if matches!(self.pending, Some((pending, _)) if pending == index) {
            self.pending = None;
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|(_, deadline)| deadline)
    }

    /// Returns the hovered index once its delay has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<usize> {
        let (index, deadline) = self.pending?;
        if now < deadline {
            return None;
        }
        self.pending = None;
        Some(index)
    }
}

impl Default for HoverDebounce {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}
