//! Scene transitions
//!
//! Fade-to-black followed by a scene load, expressed as a timed state
//! machine driven by `tick(dt)` rather than a suspended routine. The
//! actual scene loading is an engine service behind [`SceneLoader`].

/// Engine service that swaps the active scene.
pub trait SceneLoader {
    /// Load the named scene, replacing the current one.
    fn load(&mut self, scene: &str);
}

/// Where the transition currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum FadePhase {
    /// No transition running.
    #[default]
    Idle,
    /// Overlay is fading in; the scene loads when it is opaque.
    FadingOut,
}

/// Fade-out state machine in front of a scene load.
///
/// Requests while a transition is running are ignored, so a goal trigger
/// firing alongside a catch cannot double-load.
#[derive(Debug, Default)]
pub struct SceneFlow {
    fade_duration: f32,
    phase: FadePhase,
    elapsed: f32,
    pending_scene: Option<String>,
}

impl SceneFlow {
    /// Create a flow with the given fade-out length in seconds.
    #[must_use]
    pub fn new(fade_duration: f32) -> Self {
        Self {
            fade_duration,
            ..Default::default()
        }
    }

    /// Whether a fade is currently running.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.phase == FadePhase::FadingOut
    }

    /// Overlay opacity for rendering, 0.0 (clear) to 1.0 (black).
    #[must_use]
    pub fn alpha(&self) -> f32 {
        match self.phase {
            FadePhase::Idle => 0.0,
            FadePhase::FadingOut => {
                if self.fade_duration > 0.0 {
                    (self.elapsed / self.fade_duration).clamp(0.0, 1.0)
                } else {
                    1.0
                }
            }
        }
    }

    /// Start fading toward `scene`. Ignored while a transition is already
    /// running.
    pub fn request(&mut self, scene: impl Into<String>) {
        if self.is_transitioning() {
            return;
        }
        let scene = scene.into();
        log::info!("scene transition to '{scene}' requested");
        self.pending_scene = Some(scene);
        self.elapsed = 0.0;
        self.phase = FadePhase::FadingOut;
    }

    /// Advance the fade; issues the scene load exactly once, when the
    /// overlay reaches full opacity.
    pub fn tick(&mut self, dt: f32, loader: &mut dyn SceneLoader) {
        if self.phase != FadePhase::FadingOut {
            return;
        }

        self.elapsed += dt;
        if self.elapsed < self.fade_duration {
            return;
        }

        if let Some(scene) = self.pending_scene.take() {
            loader.load(&scene);
        }
        self.phase = FadePhase::Idle;
        self.elapsed = 0.0;
    }
}
