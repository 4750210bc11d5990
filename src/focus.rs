//! Keyboard focus trapping.
//!
//! A [`FocusTrap`] keeps Tab cycling within a bounded container: Tab on the
//! container's last focusable element wraps to the first, Shift+Tab on the
//! first wraps to the last, and every other key passes through for default
//! handling. The trap value itself is the disposer — the caller owns it and
//! drops (or [`FocusTrap::dispose`]s) it to release the container.

use crate::page::{NodeId, Page};

/// Keys the runtime distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    Enter,
    Escape,
}

/// A keydown event.
#[derive(Debug, Clone, Copy)]
pub struct KeyEvent {
    pub key: Key,
    pub shift: bool,
}

impl KeyEvent {
    /// A plain Tab press.
    #[must_use]
    pub const fn tab() -> Self {
        Self {
            key: Key::Tab,
            shift: false,
        }
    }

    /// A Shift+Tab press.
    #[must_use]
    pub const fn shift_tab() -> Self {
        Self {
            key: Key::Tab,
            shift: true,
        }
    }
}

/// What a trap did with a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The trap wrapped focus and consumed the event.
    Consumed,
    /// Not the trap's concern; the host applies default handling.
    Passthrough,
}

/// A focus trap over one container's focusable descendants.
///
/// The focusable sequence is computed once at install time, matching the
/// behavior of the shipped theme.
#[derive(Debug)]
pub struct FocusTrap {
    container: NodeId,
    first: Option<NodeId>,
    last: Option<NodeId>,
}

impl FocusTrap {
    /// Install a trap on `container`.
    ///
    /// A container with no focusable descendants yields a trap whose
    /// handler never consumes anything.
    #[must_use]
    pub fn install(page: &Page, container: NodeId) -> Self {
        let order = page.focusables(container);
        Self {
            container,
            first: order.first().copied(),
            last: order.last().copied(),
        }
    }

    /// The trapped container.
    #[must_use]
    pub const fn container(&self) -> NodeId {
        self.container
    }

    /// Handle a keydown: wrap at the sequence edges, pass everything else
    /// through.
    pub fn handle_keydown(&self, page: &mut Page, event: KeyEvent) -> KeyOutcome {
        if event.key != Key::Tab {
            return KeyOutcome::Passthrough;
        }

        if event.shift {
            if page.active() == self.first
                && let Some(last) = self.last
            {
                page.focus(last);
                return KeyOutcome::Consumed;
            }
        } else if page.active() == self.last
            && let Some(first) = self.first
        {
            page.focus(first);
            return KeyOutcome::Consumed;
        }

        KeyOutcome::Passthrough
    }

    /// Release the trap. Dropping it does the same; this exists for call
    /// sites that want the release to be visible.
    pub fn dispose(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Element;

    /// Container with focusables [A, B, C].
    fn trapped_page() -> (Page, FocusTrap, NodeId, NodeId, NodeId) {
        let mut page = Page::new();
        let root = page.root();
        let dialog = page.append(root, Element::new("div"));
        let a = page.append(dialog, Element::new("button").with_text("A"));
        let b = page.append(dialog, Element::new("a").with_attr("href", "/b"));
        let c = page.append(dialog, Element::new("input"));
        let trap = FocusTrap::install(&page, dialog);
        (page, trap, a, b, c)
    }

    #[test]
    fn test_tab_in_middle_passes_through() {
        let (mut page, trap, a, b, _) = trapped_page();
        page.focus(a);
        assert_eq!(page.active(), Some(a));

        let outcome = trap.handle_keydown(&mut page, KeyEvent::tab());
        assert_eq!(outcome, KeyOutcome::Passthrough);

        // Host applies the default move: A -> B.
        page.advance_focus(false);
        assert_eq!(page.active(), Some(b));
    }

    #[test]
    fn test_tab_at_last_wraps_to_first() {
        let (mut page, trap, a, _, c) = trapped_page();
        page.focus(c);
        let outcome = trap.handle_keydown(&mut page, KeyEvent::tab());
        assert_eq!(outcome, KeyOutcome::Consumed);
        assert_eq!(page.active(), Some(a));
    }

    #[test]
    fn test_shift_tab_at_first_wraps_to_last() {
        let (mut page, trap, a, _, c) = trapped_page();
        page.focus(a);
        let outcome = trap.handle_keydown(&mut page, KeyEvent::shift_tab());
        assert_eq!(outcome, KeyOutcome::Consumed);
        assert_eq!(page.active(), Some(c));
    }

    #[test]
    fn test_non_tab_keys_pass_through() {
        let (mut page, trap, _, _, c) = trapped_page();
        page.focus(c);
        let event = KeyEvent {
            key: Key::Enter,
            shift: false,
        };
        assert_eq!(trap.handle_keydown(&mut page, event), KeyOutcome::Passthrough);
        assert_eq!(page.active(), Some(c));
    }

    #[test]
    fn test_empty_container_never_consumes() {
        let mut page = Page::new();
        let empty = page.append(page.root(), Element::new("div"));
        let trap = FocusTrap::install(&page, empty);

        assert_eq!(
            trap.handle_keydown(&mut page, KeyEvent::tab()),
            KeyOutcome::Passthrough
        );
        assert_eq!(
            trap.handle_keydown(&mut page, KeyEvent::shift_tab()),
            KeyOutcome::Passthrough
        );
        assert_eq!(page.active(), None);
    }
}
