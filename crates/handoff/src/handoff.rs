use catalog::AssetLayout;
use foundation::ids::ModelId;

use crate::host::{HandoffError, HandoffHost};
use crate::platform::{Platform, PlatformClassifier, PlatformSignals, UserAgentClassifier};
use crate::quick_look::{ANCHOR_REMOVAL_DELAY_MS, QuickLookAnchor};
use crate::scene_viewer::{resolve_asset_url, scene_viewer_intent};

pub const UNSUPPORTED_MESSAGE: &str =
    "AR viewer is not available on this device. You can view the model in 3D instead.";

/// What to show in AR. Built from the viewer's current model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArRequest {
    pub model: ModelId,
    /// Relative path of the GLB (Scene Viewer).
    pub glb_path: String,
    /// Relative path of the USDZ (Quick Look).
    pub usdz_path: String,
}

impl ArRequest {
    pub fn new(model: &ModelId, layout: &AssetLayout) -> Self {
        Self {
            model: model.clone(),
            glb_path: layout.glb_path(model),
            usdz_path: layout.usdz_path(model),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandoffOutcome {
    SceneViewer { intent_url: String },
    QuickLook { href: String },
    Harmony,
    Unsupported,
}

/// Anchor that is scheduled for removal when dropped, whatever happened
/// between mounting and dropping.
struct MountedAnchor<'h, H: HandoffHost> {
    host: &'h H,
    anchor: Option<H::Anchor>,
    removal_delay_ms: u32,
}

impl<'h, H: HandoffHost> MountedAnchor<'h, H> {
    fn mount(
        host: &'h H,
        spec: &QuickLookAnchor,
        removal_delay_ms: u32,
    ) -> Result<Self, HandoffError> {
        let anchor = host.mount_anchor(spec)?;
        Ok(Self {
            host,
            anchor: Some(anchor),
            removal_delay_ms,
        })
    }

    fn click(&self) -> Result<(), HandoffError> {
        match &self.anchor {
            Some(anchor) => self.host.click_anchor(anchor),
            None => Ok(()),
        }
    }
}

impl<H: HandoffHost> Drop for MountedAnchor<'_, H> {
    fn drop(&mut self) {
        if let Some(anchor) = self.anchor.take() {
            self.host.remove_anchor_after(anchor, self.removal_delay_ms);
        }
    }
}

/// Single-shot AR handoff. Each call classifies the platform again.
#[derive(Debug, Clone)]
pub struct ArHandoff<C = UserAgentClassifier> {
    classifier: C,
    removal_delay_ms: u32,
}

impl Default for ArHandoff<UserAgentClassifier> {
    fn default() -> Self {
        Self::new(UserAgentClassifier)
    }
}

impl<C: PlatformClassifier> ArHandoff<C> {
    pub fn new(classifier: C) -> Self {
        Self {
            classifier,
            removal_delay_ms: ANCHOR_REMOVAL_DELAY_MS,
        }
    }

    pub fn with_removal_delay(mut self, delay_ms: u32) -> Self {
        self.removal_delay_ms = delay_ms;
        self
    }

    pub fn launch<H: HandoffHost>(
        &self,
        request: &ArRequest,
        signals: &PlatformSignals,
        host: &H,
    ) -> Result<HandoffOutcome, HandoffError> {
        let platform = self.classifier.classify(signals);
        log::info!("AR handoff for {} on {platform}", request.model);

        match platform {
            Platform::Android => {
                let model_url = resolve_asset_url(&host.document_url()?, &request.glb_path)?;
                let intent_url = scene_viewer_intent(&model_url);
                host.navigate(&intent_url)?;
                Ok(HandoffOutcome::SceneViewer { intent_url })
            }
            Platform::Ios => {
                let spec = QuickLookAnchor::new(request.usdz_path.clone());
                let mounted = MountedAnchor::mount(host, &spec, self.removal_delay_ms)?;
                log::debug!("AR link appended to body");
                mounted.click()?;
                log::debug!("AR link clicked");
                Ok(HandoffOutcome::QuickLook { href: spec.href })
            }
            Platform::HarmonyCapable if host.probe_harmony() => Ok(HandoffOutcome::Harmony),
            Platform::HarmonyCapable | Platform::Unsupported => {
                log::warn!("AR viewer is not available on this device.");
                host.notify_unsupported(UNSUPPORTED_MESSAGE);
                Ok(HandoffOutcome::Unsupported)
            }
        }
    }
}
