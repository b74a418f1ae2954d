//! Display-mode domain type.
//!
//! The site runs in one of two display modes, gold or silver, which scope
//! every mode-dependent behavior: which articles the cache retains, which
//! stylesheet the host applies, and what the switch button offers. The mode
//! is persisted as a plain string and read back defensively, so an absent or
//! mangled value always resolves to the gold default.

/// The two display modes of the site.
///
/// Gold is the default: a missing or unrecognized persisted value reads as
/// [`SiteMode::Gold`]. Articles are assigned to a mode through their link
/// field, which carries a `#gold`/`#silver` prefix upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SiteMode {
    /// The default presentation. Stored as `"gold"`.
    #[default]
    Gold,

    /// The alternate presentation. Stored as `"silver"`.
    Silver,
}

impl SiteMode {
    /// Returns the persisted string literal for this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SiteMode::Gold => "gold",
            SiteMode::Silver => "silver",
        }
    }

    /// Resolves a persisted value to a mode.
    ///
    /// Only the exact literal `"silver"` selects silver; every other value,
    /// including garbage left by older versions, resolves to gold. This is a
    /// total function so a corrupt settings file can never wedge startup.
    #[must_use]
    pub fn from_stored(value: &str) -> Self {
        if value == "silver" {
            SiteMode::Silver
        } else {
            SiteMode::Gold
        }
    }

    /// Returns the link prefix that assigns an article to this mode.
    ///
    /// Matching is case-insensitive on the caller's side: the article link is
    /// lower-cased before being compared against this prefix.
    #[must_use]
    pub const fn link_prefix(self) -> &'static str {
        match self {
            SiteMode::Gold => "#gold",
            SiteMode::Silver => "#silver",
        }
    }

    /// Returns the human-facing name of this mode.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            SiteMode::Gold => "Gold",
            SiteMode::Silver => "Silver",
        }
    }

    /// Returns the opposite mode.
    ///
    /// The switch button always advertises the mode a press would move to,
    /// so its label is `mode.other().label()`.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            SiteMode::Gold => SiteMode::Silver,
            SiteMode::Silver => SiteMode::Gold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_literals_round_trip() {
        assert_eq!(SiteMode::from_stored("gold"), SiteMode::Gold);
        assert_eq!(SiteMode::from_stored("silver"), SiteMode::Silver);
        assert_eq!(SiteMode::Gold.as_str(), "gold");
        assert_eq!(SiteMode::Silver.as_str(), "silver");
    }

    #[test]
    fn unrecognized_values_fall_back_to_gold() {
        assert_eq!(SiteMode::from_stored(""), SiteMode::Gold);
        assert_eq!(SiteMode::from_stored("Silver"), SiteMode::Gold);
        assert_eq!(SiteMode::from_stored("platinum"), SiteMode::Gold);
    }

    #[test]
    fn other_flips_and_labels_advertise_the_target() {
        assert_eq!(SiteMode::Gold.other(), SiteMode::Silver);
        assert_eq!(SiteMode::Silver.other(), SiteMode::Gold);
        assert_eq!(SiteMode::Gold.other().label(), "Silver");
        assert_eq!(SiteMode::Silver.other().label(), "Gold");
    }
}
