use foundation::bounds::Aabb3;
use foundation::handles::{Generation, GenerationCounter};
use foundation::ids::ModelId;
use foundation::math::Vec3;
use formats::{LoadProgress, ModelAsset, ModelLoadError};
use gpu::{Camera3D, Framing, OrbitControls, RenderFrame, Renderer, frame_bounds};
use handoff::{ArRequest, HandoffError, HandoffOutcome};
use runtime::{EventBus, FrameClock};
use scene::World;
use scene::components::{Mesh, TextureId, Transform, UnlitMaterial};
use scene::entity::EntityId;
use scene::model::Model;

use crate::config::ViewerConfig;

/// A pending model fetch. Hand it back to [`ViewerSession::complete_load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub model: ModelId,
    pub generation: Generation,
    /// Relative URL of the GLB to fetch.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Attached { entity: EntityId, framing: Framing },
    /// A newer switch was requested before this load finished.
    Stale,
    Failed,
}

/// Owns the scene, the camera and the loading state of the viewer.
///
/// Loads are two-phase: `switch_model` clears the scene and hands out a
/// ticket, the host fetches and parses, then `complete_load` attaches the
/// result. Only the most recent ticket can attach; older completions are
/// dropped.
#[derive(Debug)]
pub struct ViewerSession {
    config: ViewerConfig,
    world: World,
    camera: Camera3D,
    controls: OrbitControls,
    loads: GenerationCounter,
    current: Option<ModelId>,
    loading_visible: bool,
    progress: Option<LoadProgress>,
    clock: FrameClock,
    events: EventBus,
}

impl ViewerSession {
    pub fn new(config: ViewerConfig) -> Self {
        let mut controls = OrbitControls::new(config.controls);
        let mut camera = Camera3D::from_settings(&config.camera, controls.target);
        controls.update(&mut camera);
        Self {
            config,
            world: World::new(),
            camera,
            controls,
            loads: GenerationCounter::new(),
            current: None,
            loading_visible: false,
            progress: None,
            clock: FrameClock::new(),
            events: EventBus::new(),
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn camera(&self) -> &Camera3D {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn loading_visible(&self) -> bool {
        self.loading_visible
    }

    /// Download progress of the current load, once the host reported any.
    pub fn load_progress(&self) -> Option<LoadProgress> {
        self.progress
    }

    /// Model most recently requested, whether or not it finished loading.
    pub fn current_model(&self) -> Option<&ModelId> {
        self.current.as_ref()
    }

    /// AR request for the current model, if any.
    pub fn ar_request(&self) -> Option<ArRequest> {
        self.current
            .as_ref()
            .map(|id| ArRequest::new(id, &self.config.assets))
    }

    /// Records how an AR handoff ended.
    pub fn record_handoff(&mut self, result: &Result<HandoffOutcome, HandoffError>) {
        let frame = self.clock.frame_index();
        match result {
            Ok(HandoffOutcome::SceneViewer { intent_url }) => {
                self.events.info(frame, "ar.scene_viewer", intent_url.clone())
            }
            Ok(HandoffOutcome::QuickLook { href }) => {
                self.events.info(frame, "ar.quick_look", href.clone())
            }
            Ok(HandoffOutcome::Harmony) => {
                self.events.info(frame, "ar.harmony", "handled by platform")
            }
            Ok(HandoffOutcome::Unsupported) => {
                self.events.warn(frame, "ar.unsupported", "no AR viewer on this device")
            }
            Err(err) => self.events.error(frame, "ar.failed", err.to_string()),
        }
    }

    pub fn switch_model(&mut self, model: ModelId) -> LoadTicket {
        if let Some(old) = self.world.detach() {
            log::debug!("detached {}", old.id);
        }
        self.loading_visible = true;
        self.progress = None;

        let generation = self.loads.next();
        let url = self.config.assets.glb_path(&model);
        self.events.info(
            self.clock.frame_index(),
            "load.started",
            format!("{model} from {url}"),
        );
        self.current = Some(model.clone());

        LoadTicket {
            model,
            generation,
            url,
        }
    }

    /// Logs download progress of `ticket`. Returns `false` and ignores the
    /// report when a newer switch has superseded the ticket.
    pub fn report_progress(&mut self, ticket: &LoadTicket, progress: LoadProgress) -> bool {
        if !self.loads.is_current(ticket.generation) {
            return false;
        }
        log::info!("{} {progress}", ticket.model);
        self.progress = Some(progress);
        true
    }

    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<ModelAsset, ModelLoadError>,
    ) -> LoadOutcome {
        let frame = self.clock.frame_index();
        if !self.loads.is_current(ticket.generation) {
            self.events.info(
                frame,
                "load.stale",
                format!("discarding {} (superseded)", ticket.model),
            );
            return LoadOutcome::Stale;
        }

        let asset = match result {
            Ok(asset) => asset,
            Err(err) => {
                self.loading_visible = false;
                self.events.error(frame, "load.failed", err.to_string());
                return LoadOutcome::Failed;
            }
        };

        let mut model = build_unlit_model(ticket.model, asset);
        self.fit_to_target(&mut model);

        let (entity, replaced) = self.world.attach(model);
        if replaced.is_some() {
            log::warn!("replaced a model that should have been detached");
        }
        let bounds = self.world.world_bounds().unwrap_or_default();
        let framing = self.frame_camera(&bounds);
        self.loading_visible = false;

        self.events.info(
            frame,
            "load.completed",
            format!("{} framed at distance {:.3}", ticket.url, framing.distance),
        );
        LoadOutcome::Attached { entity, framing }
    }

    /// Places the model at the configured offset and scales it so its
    /// largest bounding dimension equals the target size.
    fn fit_to_target(&self, model: &mut Model) {
        let max_dim = model.local_bounds().max_dimension();
        let scale = if max_dim > 0.0 && max_dim.is_finite() {
            self.config.target_size / max_dim
        } else {
            log::warn!("{} has degenerate bounds; leaving it unscaled", model.id);
            1.0
        };
        model.transform = Transform {
            position: Vec3::from_array(self.config.model_offset),
            scale,
        };
    }

    fn frame_camera(&mut self, bounds: &Aabb3) -> Framing {
        let max_dim = bounds.max_dimension();
        if bounds.is_empty() || !(max_dim > 0.0 && max_dim.is_finite()) {
            log::warn!("nothing to frame; restoring the configured view");
            return self.reset_view();
        }

        let framing = frame_bounds(bounds, self.camera.fov_y_rad, self.config.framing_margin);
        self.camera.position = framing.position;
        self.camera.target = framing.target;
        self.controls.target = framing.target;
        self.controls.allow_distance(framing.distance);
        self.controls.reset_motion();
        self.controls.update(&mut self.camera);
        framing
    }

    /// Puts the camera and orbit limits back where the configuration has them.
    fn reset_view(&mut self) -> Framing {
        let target = Vec3::from_array(self.config.controls.target);
        let aspect = self.camera.aspect;
        self.camera = Camera3D::from_settings(&self.config.camera, target);
        self.camera.aspect = aspect;
        self.controls.target = target;
        self.controls.reset_limits();
        self.controls.reset_motion();
        self.controls.update(&mut self.camera);
        Framing {
            position: self.camera.position,
            target,
            distance: self.camera.distance_to_target(),
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.camera.set_viewport(width, height);
    }

    pub fn orbit(&mut self, delta_x_px: f64, delta_y_px: f64, viewport_height_px: f64) {
        self.controls
            .rotate(delta_x_px, delta_y_px, viewport_height_px);
    }

    pub fn zoom(&mut self, wheel_delta_y: f64) {
        self.controls.dolly(wheel_delta_y);
    }

    /// One render-loop step: advance damping and collect draw commands.
    pub fn tick(&mut self, timestamp_ms: f64) -> RenderFrame {
        self.clock.tick(timestamp_ms);
        self.controls.update(&mut self.camera);
        Renderer::collect(&self.world, &self.camera, self.config.clear_color)
    }
}

/// Keeps only the color map and base color of every surface and turns on
/// shadow casting and receiving.
fn build_unlit_model(id: ModelId, asset: ModelAsset) -> Model {
    let meshes = asset
        .meshes
        .iter()
        .map(|src| {
            let material = asset.material_for(src);
            Mesh {
                positions: src.positions.clone(),
                uvs: src.uvs.clone(),
                indices: src.indices.clone(),
                material: UnlitMaterial::new(
                    material.base_color,
                    material
                        .base_color_texture
                        .filter(|idx| *idx < asset.textures.len())
                        .map(TextureId),
                ),
                cast_shadow: true,
                receive_shadow: true,
            }
        })
        .collect();
    Model::new(id, meshes, asset.textures)
}
