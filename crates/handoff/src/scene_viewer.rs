use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::Url;

use crate::host::HandoffError;

pub const SCENE_VIEWER_HOST: &str = "arvr.google.com/scene-viewer/1.0";
pub const SCENE_VIEWER_PACKAGE: &str = "com.google.android.googlequicksearchbox";
pub const SCENE_VIEWER_FALLBACK_URL: &str = "https://developers.google.com/ar";

/// Characters `encodeURIComponent` leaves alone.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_uri_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}

/// Resolves an asset path against the page URL.
///
/// Scene Viewer runs in another app, so it needs an absolute URL.
pub fn resolve_asset_url(document_url: &str, asset_path: &str) -> Result<Url, HandoffError> {
    let base = Url::parse(document_url).map_err(|e| HandoffError::InvalidDocumentUrl {
        url: document_url.to_string(),
        message: e.to_string(),
    })?;
    base.join(asset_path)
        .map_err(|e| HandoffError::InvalidDocumentUrl {
            url: document_url.to_string(),
            message: e.to_string(),
        })
}

/// Builds the `intent://` deep link that opens Scene Viewer on `model_url`,
/// falling back to the ARCore info page when the package is missing.
pub fn scene_viewer_intent(model_url: &Url) -> String {
    format!(
        "intent://{SCENE_VIEWER_HOST}?file={}#Intent;scheme=https;package={SCENE_VIEWER_PACKAGE};\
action=android.intent.action.VIEW;S.browser_fallback_url={SCENE_VIEWER_FALLBACK_URL};end;",
        encode_uri_component(model_url.as_str())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn encodes_like_encode_uri_component() {
        assert_eq!(
            encode_uri_component("https://a.b/models/x y.glb?q=1&r=(2)"),
            "https%3A%2F%2Fa.b%2Fmodels%2Fx%20y.glb%3Fq%3D1%26r%3D(2)"
        );
        assert_eq!(encode_uri_component("A-z_0.9!~*'"), "A-z_0.9!~*'");
        assert_eq!(encode_uri_component("é"), "%C3%A9");
    }

    #[test]
    fn resolves_relative_to_document_directory() {
        let url = resolve_asset_url("https://menu.example.com/app/index.html", "models/Salad.glb")
            .expect("url");
        assert_eq!(url.as_str(), "https://menu.example.com/app/models/Salad.glb");

        let url = resolve_asset_url("https://menu.example.com/app/", "models/Salad.glb")
            .expect("url");
        assert_eq!(url.as_str(), "https://menu.example.com/app/models/Salad.glb");
    }

    #[test]
    fn query_and_fragment_of_page_are_dropped() {
        let url = resolve_asset_url(
            "https://menu.example.com/app/index.html?table=4#top",
            "models/Salad.glb",
        )
        .expect("url");
        assert_eq!(url.as_str(), "https://menu.example.com/app/models/Salad.glb");
    }

    #[test]
    fn rejects_unparseable_document_url() {
        let err = resolve_asset_url("not a url", "models/Salad.glb").expect_err("must fail");
        assert!(matches!(err, HandoffError::InvalidDocumentUrl { .. }));
    }

    #[test]
    fn intent_embeds_encoded_model_url() {
        let url = Url::parse("https://menu.example.com/models/Salad.glb").expect("url");
        assert_eq!(
            scene_viewer_intent(&url),
            "intent://arvr.google.com/scene-viewer/1.0?file=https%3A%2F%2Fmenu.example.com%2Fmodels%2FSalad.glb\
#Intent;scheme=https;package=com.google.android.googlequicksearchbox;\
action=android.intent.action.VIEW;S.browser_fallback_url=https://developers.google.com/ar;end;"
        );
    }
}
