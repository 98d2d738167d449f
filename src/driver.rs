use crate::camera::Viewport;
use crate::scene::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DriverState {
    Running,
    Stopped,
}


/// The per-frame task: keeps the camera matched to the viewport and steps
/// the orbit damping. It knows nothing about calculations, so new results
/// never pause or restart it.
#[derive(Debug)]
pub struct FrameDriver {
    state: DriverState,
    frames: u64,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self {
            state: DriverState::Running,
            frames: 0,
        }
    }
}

impl FrameDriver {
    /// Runs one frame. Returns whether the scene should be drawn and another
    /// frame scheduled.
    pub fn frame(&mut self, scene: &mut Scene, viewport: Viewport) -> bool {
        if self.state == DriverState::Stopped {
            return false;
        }
        if scene.viewport() != viewport {
            log::debug!("viewport resized to {}x{}", viewport.width, viewport.height);
            scene.resize(viewport);
        }
        scene.camera_mut().update();
        self.frames += 1;
        true
    }

    pub fn stop(&mut self) {
        if self.state == DriverState::Running {
            log::info!("render loop stopped after {} frames", self.frames);
        }
        self.state = DriverState::Stopped;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
