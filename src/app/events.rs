//! Input events for a search surface.
//!
//! Hosts translate their native gestures (keystrokes, focus changes, clicks
//! outside the dropdown) into these events and feed them to the surface's
//! [`QueryController`]. The enum is deliberately small: it captures intent,
//! not input-device detail.
//!
//! [`QueryController`]: crate::app::QueryController

/// One user gesture on a search surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryEvent {
    /// The input text changed to the contained value.
    ///
    /// Fires on every edit; the controller handles debouncing, so hosts
    /// forward each change as it happens.
    InputChanged(String),

    /// The input gained focus.
    ///
    /// Surfaces the "latest articles" teaser immediately when the cache is
    /// ready, or a loading placeholder when it is not.
    Focused,

    /// The clear affordance was activated.
    ///
    /// Resets the input text and empties the panel.
    Cleared,

    /// An interaction landed outside the search surface's boundary.
    ///
    /// Hides the panel; the input text is left untouched.
    DismissedOutside,

    /// The acceptance gesture (e.g. the Enter key) fired.
    ///
    /// Navigates to the first visible result, if any.
    Submitted,
}
