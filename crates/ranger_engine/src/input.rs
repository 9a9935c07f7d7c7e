//! Window input events and listeners
//!
//! Hosts translate their native window events into [`Event`]s and hand them
//! to an [`EventDispatcher`]. Listeners are notified top-most first; an event
//! keeps bubbling down to the next listener until one calls
//! [`Event::prevent_default`].

use bitflags::bitflags;
use log::trace;

/// Source of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Mouse button or motion
    Mouse,
    /// Keyboard key
    Keyboard,
    /// Joystick or gamepad
    Joystick,
}

/// What happened to a key or button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Pressed down
    Press,
    /// Released
    Release,
    /// Held long enough to auto-repeat
    Repeat,
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum KeyCode {
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    Num0, Num1, Num2, Num3, Num4, Num5, Num6, Num7, Num8, Num9,
    Space,
    Escape,
    Enter,
    Left,
    Right,
    Up,
    Down,
    /// Any key without a named variant, by native key code
    Other(i32),
}

bitflags! {
    /// Modifier keys held during an event
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        /// Shift
        const SHIFT = 0b0001;
        /// Control
        const CONTROL = 0b0010;
        /// Alt
        const ALT = 0b0100;
        /// Super, Command or Windows key
        const SUPER = 0b1000;
    }
}

/// An input event travelling through the listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Event source
    pub kind: EventKind,
    /// Press, release or repeat
    pub action: Action,
    /// Key for keyboard events
    pub key: Option<KeyCode>,
    /// Platform specific scan code
    pub scan_code: i32,
    /// Modifier keys held
    pub modifiers: Modifiers,
    bubble: bool,
    handled: bool,
}

impl Event {
    /// Fresh event: bubbling and not handled
    pub fn new(kind: EventKind, action: Action) -> Self {
        Self {
            kind,
            action,
            key: None,
            scan_code: 0,
            modifiers: Modifiers::empty(),
            bubble: true,
            handled: false,
        }
    }

    /// Keyboard event for `key`
    pub fn key(key: KeyCode, action: Action) -> Self {
        Self {
            key: Some(key),
            ..Self::new(EventKind::Keyboard, action)
        }
    }

    /// Stop bubbling and mark the event handled
    pub fn prevent_default(&mut self) {
        self.bubble = false;
        self.handled = true;
    }

    /// Back to bubbling and not handled
    pub fn reset(&mut self) {
        self.bubble = true;
        self.handled = false;
    }

    /// Whether the event continues to lower listeners
    pub fn bubbles(&self) -> bool {
        self.bubble
    }

    /// Whether a listener used the event
    pub fn is_handled(&self) -> bool {
        self.handled
    }

    /// Mark the event used while letting it keep bubbling
    pub fn set_handled(&mut self) {
        self.handled = true;
    }

    /// Whether this is the quit key (Q) being pressed
    pub fn requests_quit(&self) -> bool {
        self.kind == EventKind::Keyboard && self.key == Some(KeyCode::Q) && self.action == Action::Press
    }
}

/// Receives input events.
pub trait EventListener {
    /// Handle `event`; call [`Event::prevent_default`] to consume it
    fn receive(&mut self, event: &mut Event);
}

/// Ordered set of listeners; the last registered is the top-most.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: Vec<Box<dyn EventListener>>,
}

impl EventDispatcher {
    /// No listeners
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` on top
    pub fn register(&mut self, listener: Box<dyn EventListener>) {
        self.listeners.push(listener);
    }

    /// Number of listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listeners are registered
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver `event` top-most first until a listener stops it. Returns
    /// whether any listener handled it.
    pub fn dispatch(&mut self, event: &mut Event) -> bool {
        for listener in self.listeners.iter_mut().rev() {
            listener.receive(event);
            if !event.bubbles() {
                trace!("event {:?} stopped bubbling", event.kind);
                break;
            }
        }
        event.is_handled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        name: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
        consume: bool,
    }

    impl EventListener for Recorder {
        fn receive(&mut self, event: &mut Event) {
            self.log.borrow_mut().push(self.name);
            if self.consume {
                event.prevent_default();
            }
        }
    }

    #[test]
    fn test_prevent_default_and_reset() {
        let mut e = Event::new(EventKind::Mouse, Action::Press);
        assert!(e.bubbles());
        assert!(!e.is_handled());

        e.prevent_default();
        assert!(!e.bubbles());
        assert!(e.is_handled());

        e.reset();
        assert!(e.bubbles());
        assert!(!e.is_handled());
    }

    #[test]
    fn test_dispatch_stops_at_consumer() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();
        for (name, consume) in [("bottom", false), ("middle", true), ("top", false)] {
            dispatcher.register(Box::new(Recorder {
                name,
                log: Rc::clone(&log),
                consume,
            }));
        }

        let mut e = Event::key(KeyCode::Space, Action::Press);
        assert!(dispatcher.dispatch(&mut e));
        assert_eq!(*log.borrow(), ["top", "middle"]);
    }

    #[test]
    fn test_quit_key() {
        assert!(Event::key(KeyCode::Q, Action::Press).requests_quit());
        assert!(!Event::key(KeyCode::Q, Action::Release).requests_quit());
        assert!(!Event::key(KeyCode::A, Action::Press).requests_quit());
    }
}
