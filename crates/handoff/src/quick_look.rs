/// 1×1 transparent PNG. Quick Look only reacts to `rel="ar"` links that
/// wrap an image.
pub const PLACEHOLDER_IMAGE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAACklEQVR4nGMAAQAABQABDQottAAAAABJRU5ErkJggg==";

pub const QUICK_LOOK_REL: &str = "ar";

/// Removal delay for the temporary anchor, in milliseconds.
pub const ANCHOR_REMOVAL_DELAY_MS: u32 = 1000;

/// The temporary `<a rel="ar">` used to open AR Quick Look.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickLookAnchor {
    pub rel: &'static str,
    pub href: String,
    pub image_src: &'static str,
    pub image_alt: &'static str,
}

impl QuickLookAnchor {
    pub fn new(usdz_href: impl Into<String>) -> Self {
        Self {
            rel: QUICK_LOOK_REL,
            href: usdz_href.into(),
            image_src: PLACEHOLDER_IMAGE,
            image_alt: "AR",
        }
    }

    /// Inner markup of the anchor.
    pub fn inner_html(&self) -> String {
        format!(r#"<img src="{}" alt="{}">"#, self.image_src, self.image_alt)
    }
}

#[cfg(test)]
mod tests {
    use super::QuickLookAnchor;

    #[test]
    fn anchor_wraps_placeholder_image() {
        let anchor = QuickLookAnchor::new("models/Salad.usdz");
        assert_eq!(anchor.rel, "ar");
        assert_eq!(anchor.href, "models/Salad.usdz");
        let html = anchor.inner_html();
        assert!(html.starts_with(r#"<img src="data:image/png;base64,"#));
        assert!(html.ends_with(r#"alt="AR">"#));
    }
}
