/// Byte progress of an asset download.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LoadProgress {
    pub loaded: u64,
    /// Unknown when the server sends no content length.
    pub total: Option<u64>,
}

impl LoadProgress {
    pub fn new(loaded: u64, total: Option<u64>) -> Self {
        Self { loaded, total }
    }

    pub fn percent(&self) -> Option<f64> {
        match self.total {
            Some(0) | None => None,
            Some(total) => Some((self.loaded as f64 / total as f64 * 100.0).min(100.0)),
        }
    }
}

impl std::fmt::Display for LoadProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.percent() {
            Some(p) => write!(f, "loading {p:.0}%"),
            None => write!(f, "loading {} bytes", self.loaded),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LoadProgress;

    #[test]
    fn percent_needs_a_known_total() {
        assert_eq!(LoadProgress::new(50, Some(200)).percent(), Some(25.0));
        assert_eq!(LoadProgress::new(50, None).percent(), None);
        assert_eq!(LoadProgress::new(50, Some(0)).percent(), None);
    }

    #[test]
    fn display_matches_console_format() {
        assert_eq!(LoadProgress::new(10, Some(10)).to_string(), "loading 100%");
        assert_eq!(LoadProgress::new(7, None).to_string(), "loading 7 bytes");
    }
}
