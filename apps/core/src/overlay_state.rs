use crate::selection::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPhase {
    Closed,
    Open,
}

/// What the page has to do to honor an open request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAction {
    /// First open in this document: build the overlay subtree.
    Mount,
    /// The subtree exists but is hidden: show it and focus the query field.
    Reveal,
    /// Already showing: only refocus the query field.
    FocusExisting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowUp,
    ArrowDown,
    Enter,
    Other(String),
}

impl Key {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" => Self::Escape,
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "Enter" => Self::Enter,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRoute {
    /// Overlay is closed; the host page keeps the key.
    PassThrough,
    Close,
    Move(Direction),
    Submit,
    RefocusQuery,
}

/// Lifecycle of the single overlay instance in a document. Closing hides the
/// subtree; it is never torn down, so at most one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlayState {
    visible: bool,
    mounted: bool,
}

impl OverlayState {
    pub fn phase(&self) -> OverlayPhase {
        if self.visible {
            OverlayPhase::Open
        } else {
            OverlayPhase::Closed
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn open(&mut self) -> OpenAction {
        if self.visible {
            return OpenAction::FocusExisting;
        }

        self.visible = true;
        if self.mounted {
            OpenAction::Reveal
        } else {
            self.mounted = true;
            OpenAction::Mount
        }
    }

    pub fn close(&mut self) -> bool {
        if self.visible {
            self.visible = false;
            return true;
        }
        false
    }

    pub fn on_escape(&mut self) -> bool {
        self.close()
    }

    /// Clicks landing on the backdrop (outside the modal) close the overlay.
    pub fn on_backdrop_click(&mut self) -> bool {
        self.close()
    }

    /// While open every key goes to the overlay first.
    pub fn route_key(&self, key: &Key) -> KeyRoute {
        if !self.visible {
            return KeyRoute::PassThrough;
        }

        match key {
            Key::Escape => KeyRoute::Close,
            Key::ArrowDown => KeyRoute::Move(Direction::Down),
            Key::ArrowUp => KeyRoute::Move(Direction::Up),
            Key::Enter => KeyRoute::Submit,
            Key::Other(_) => KeyRoute::RefocusQuery,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_open_mounts_overlay() {
        let mut state = OverlayState::default();
        assert_eq!(state.open(), OpenAction::Mount);
        assert!(state.is_visible());
        assert_eq!(state.phase(), OverlayPhase::Open);
    }

    #[test]
    fn reopen_reuses_mounted_overlay() {
        let mut state = OverlayState::default();
        state.open();
        assert!(state.on_escape());
        assert_eq!(state.open(), OpenAction::Reveal);
        assert!(state.is_mounted());
    }

    #[test]
    fn open_while_visible_refocuses() {
        let mut state = OverlayState::default();
        state.open();
        assert_eq!(state.open(), OpenAction::FocusExisting);
        assert!(state.is_visible());
    }

    #[test]
    fn escape_hides_only_when_visible() {
        let mut state = OverlayState::default();
        assert!(!state.on_escape());
        state.open();
        assert!(state.on_escape());
        assert!(!state.is_visible());
    }

    #[test]
    fn backdrop_click_closes() {
        let mut state = OverlayState::default();
        state.open();
        assert!(state.on_backdrop_click());
        assert_eq!(state.phase(), OverlayPhase::Closed);
    }

    #[test]
    fn keys_pass_through_while_closed() {
        let state = OverlayState::default();
        assert_eq!(state.route_key(&Key::Enter), KeyRoute::PassThrough);
    }

    #[test]
    fn keys_route_to_overlay_while_open() {
        let mut state = OverlayState::default();
        state.open();
        assert_eq!(state.route_key(&Key::from_name("Escape")), KeyRoute::Close);
        assert_eq!(
            state.route_key(&Key::from_name("ArrowDown")),
            KeyRoute::Move(Direction::Down)
        );
        assert_eq!(
            state.route_key(&Key::from_name("ArrowUp")),
            KeyRoute::Move(Direction::Up)
        );
        assert_eq!(state.route_key(&Key::from_name("Enter")), KeyRoute::Submit);
        assert_eq!(state.route_key(&Key::from_name("a")), KeyRoute::RefocusQuery);
    }
}
