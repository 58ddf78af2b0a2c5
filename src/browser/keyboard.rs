//! Keyboard key definitions.
//!
//! Non-printable keys are sent to a WebDriver remote end as code points in
//! the Unicode private use area.
//!
//! # Example
//!
//! ```ignore
//! use webpoll::Key;
//!
//! element.type_text("hello").await?;
//! element.press(Key::Enter).await?;
//! ```

// ============================================================================
// Key Enum
// ============================================================================

/// Common keyboard keys for navigation and control.
///
/// For typing text, use `element.type_text()` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    // ========================================================================
    // Navigation & Control
    // ========================================================================
    /// Enter/Return key
    Enter,
    /// Tab key
    Tab,
    /// Escape key
    Escape,
    /// Backspace key
    Backspace,
    /// Delete key
    Delete,
    /// Space bar
    Space,

    // ========================================================================
    // Arrow Keys
    // ========================================================================
    /// Arrow Up
    ArrowUp,
    /// Arrow Down
    ArrowDown,
    /// Arrow Left
    ArrowLeft,
    /// Arrow Right
    ArrowRight,

    // ========================================================================
    // Page Navigation
    // ========================================================================
    /// Home key
    Home,
    /// End key
    End,
    /// Page Up key
    PageUp,
    /// Page Down key
    PageDown,
}

impl Key {
    /// Returns the WebDriver code point for this key.
    #[must_use]
    pub const fn code_point(self) -> char {
        match self {
            Key::Backspace => '\u{E003}',
            Key::Tab => '\u{E004}',
            Key::Enter => '\u{E007}',
            Key::Escape => '\u{E00C}',
            Key::Space => '\u{E00D}',
            Key::PageUp => '\u{E00E}',
            Key::PageDown => '\u{E00F}',
            Key::End => '\u{E010}',
            Key::Home => '\u{E011}',
            Key::ArrowLeft => '\u{E012}',
            Key::ArrowUp => '\u{E013}',
            Key::ArrowRight => '\u{E014}',
            Key::ArrowDown => '\u{E015}',
            Key::Delete => '\u{E017}',
        }
    }

    /// Returns the key as a keystroke string.
    #[inline]
    #[must_use]
    pub fn as_keys(self) -> String {
        self.code_point().to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
