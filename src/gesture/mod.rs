pub mod classifier;
pub mod config;
pub mod notify;
pub mod tracker;
pub mod types;
pub mod validity;

use self::classifier::{GestureEngine, GestureMode};
use self::config::{ConfigError, Thresholds};
use self::notify::GestureNotifier;
use self::types::{GestureOutput, PointerSample};
use self::validity::DragValidity;

/// The host layer the handler sits beneath.
pub trait HostSurface {
    /// Installs the full-screen, input-only background layer that receives pointer
    /// events not consumed by foreground UI.
    fn attach_background_layer(&mut self) -> Result<(), String>;
}

/// Gesture handler for touches falling through the foreground UI.
///
/// Routes host pointer events through the [`GestureEngine`] and fans the resulting
/// notifications out through its [`GestureNotifier`]. A handler whose activation failed
/// stays disabled: every inbound call is a no-op.
pub struct FallThroughHandler {
    engine: Option<GestureEngine>,
    notifier: GestureNotifier,
    activation_error: Option<ConfigError>,
}

impl FallThroughHandler {
    /// Attaches to `surface` and builds the classifier.
    ///
    /// Failures are logged and leave the handler disabled instead of being returned;
    /// use [`FallThroughHandler::try_activate`] to handle them directly.
    pub fn activate<S, V>(surface: Option<&mut S>, thresholds: Thresholds, validity: V) -> Self
    where
        S: HostSurface + ?Sized,
        V: DragValidity + 'static,
    {
        match Self::try_activate(surface, thresholds, validity) {
            Ok(handler) => handler,
            Err(err) => {
                log::error!("failed to initialize gesture handler: {err}");
                Self {
                    engine: None,
                    notifier: GestureNotifier::new(),
                    activation_error: Some(err),
                }
            }
        }
    }

    pub fn try_activate<S, V>(
        surface: Option<&mut S>,
        thresholds: Thresholds,
        validity: V,
    ) -> Result<Self, ConfigError>
    where
        S: HostSurface + ?Sized,
        V: DragValidity + 'static,
    {
        let surface = surface.ok_or(ConfigError::MissingSurface)?;
        thresholds.validate()?;
        surface
            .attach_background_layer()
            .map_err(ConfigError::SurfaceAttach)?;
        log::info!(
            "gesture handler active: flick={} double_click={}ms flick_update={}",
            thresholds.flick_detect_distance,
            thresholds.double_click_interval_ms,
            thresholds.flick_update_range
        );
        Ok(Self {
            engine: Some(GestureEngine::new(thresholds, validity)),
            notifier: GestureNotifier::new(),
            activation_error: None,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.engine.is_some()
    }

    pub fn activation_error(&self) -> Option<&ConfigError> {
        self.activation_error.as_ref()
    }

    /// Registry for the handler's notifications. Clones share the same listeners.
    pub fn notifier(&self) -> &GestureNotifier {
        &self.notifier
    }

    pub fn pointer_down(&mut self, sample: PointerSample) -> GestureOutput {
        self.route(|engine| engine.pointer_down(sample))
    }

    pub fn drag(&mut self, sample: PointerSample) -> GestureOutput {
        self.route(|engine| engine.drag(sample))
    }

    pub fn pointer_up(&mut self, sample: PointerSample) -> GestureOutput {
        self.route(|engine| engine.pointer_up(sample))
    }

    pub fn end_drag(&mut self, sample: PointerSample) -> GestureOutput {
        self.route(|engine| engine.end_drag(sample))
    }

    pub fn is_pressing(&self) -> bool {
        self.engine.as_ref().is_some_and(GestureEngine::is_pressing)
    }

    pub fn is_dragging(&self) -> bool {
        self.mode() == GestureMode::Dragging
    }

    pub fn is_pinching(&self) -> bool {
        self.mode() == GestureMode::Pinching
    }

    pub fn mode(&self) -> GestureMode {
        self.engine
            .as_ref()
            .map_or(GestureMode::Idle, GestureEngine::mode)
    }

    pub fn engine(&self) -> Option<&GestureEngine> {
        self.engine.as_ref()
    }

    fn route(&mut self, handle: impl FnOnce(&mut GestureEngine) -> GestureOutput) -> GestureOutput {
        let Some(engine) = self.engine.as_mut() else {
            return GestureOutput::default();
        };
        let output = handle(engine);
        self.notifier.dispatch(&output);
        output
    }
}
