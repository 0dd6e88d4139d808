//! Input vocabulary: keys, modifiers and the selection gesture they imply.

/// Keyboard modifier state at the time of a click or key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held.
    pub control: bool,
    /// The Alt key is held (Option on macOS).
    pub alt: bool,
    /// The Meta/Super key is held (Cmd on macOS).
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
        meta: false,
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        shift: false,
        control: true,
        alt: false,
        meta: false,
    };

    /// Meta modifier only.
    pub const META: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: true,
    };

    /// Control + Shift modifiers.
    pub const CTRL_SHIFT: Self = Self {
        shift: true,
        control: true,
        alt: false,
        meta: false,
    };

    /// Whether the platform "command" modifier is held (Control or Meta).
    pub fn command(&self) -> bool {
        self.control || self.meta
    }

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }

    /// Check if no modifiers are pressed.
    pub fn none(&self) -> bool {
        !self.any()
    }

    /// Classify the modifiers into the selection gesture they request.
    ///
    /// Alt carries no selection meaning and is ignored.
    pub fn gesture(&self) -> Gesture {
        match (self.shift, self.command()) {
            (true, true) => Gesture::Conflicting,
            (true, false) => Gesture::Range,
            (false, true) => Gesture::Toggle,
            (false, false) => Gesture::Plain,
        }
    }
}

/// The selection intent derived from a modifier combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// No selection modifier: replace the selection.
    Plain,
    /// Shift: extend from the anchor.
    Range,
    /// Command: toggle membership.
    Toggle,
    /// Shift and command together. Every gesture treats this as a no-op.
    Conflicting,
}

/// Keys the navigator understands. Everything else maps to [`Key::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,
    Enter,
    Other,
}

/// A key press delivered to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPressEvent {
    /// The key that was pressed.
    pub key: Key,
    /// Keyboard modifiers held during the event.
    pub modifiers: KeyboardModifiers,
    /// Whether this is a key repeat event (key held down).
    pub is_repeat: bool,
}

impl KeyPressEvent {
    /// Create a new, non-repeating key press event.
    pub fn new(key: Key, modifiers: KeyboardModifiers) -> Self {
        Self {
            key,
            modifiers,
            is_repeat: false,
        }
    }
}
