use crate::quick_look::QuickLookAnchor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandoffError {
    InvalidDocumentUrl { url: String, message: String },
    Navigation(String),
    Dom(String),
}

impl std::fmt::Display for HandoffError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandoffError::InvalidDocumentUrl { url, message } => {
                write!(f, "cannot resolve assets against {url}: {message}")
            }
            HandoffError::Navigation(msg) => write!(f, "navigation failed: {msg}"),
            HandoffError::Dom(msg) => write!(f, "DOM operation failed: {msg}"),
        }
    }
}

impl std::error::Error for HandoffError {}

/// Side effects the handoff needs from the page.
pub trait HandoffHost {
    /// Handle to a mounted anchor element.
    type Anchor;

    /// Absolute URL of the current document.
    fn document_url(&self) -> Result<String, HandoffError>;

    /// Replaces the current page (not a new tab).
    fn navigate(&self, url: &str) -> Result<(), HandoffError>;

    /// Appends a hidden anchor to the document.
    fn mount_anchor(&self, anchor: &QuickLookAnchor) -> Result<Self::Anchor, HandoffError>;

    fn click_anchor(&self, anchor: &Self::Anchor) -> Result<(), HandoffError>;

    /// Removes the anchor once `delay_ms` has elapsed. Fire and forget.
    fn remove_anchor_after(&self, anchor: Self::Anchor, delay_ms: u32);

    /// Asks the platform whether it can show AR itself. `true` means it has
    /// taken over the request.
    fn probe_harmony(&self) -> bool;

    /// Blocking user-facing notice.
    fn notify_unsupported(&self, message: &str);
}
