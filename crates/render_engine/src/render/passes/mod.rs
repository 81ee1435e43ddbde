//! # Render Passes
//!
//! Frame structure and the targets each pass renders into.
//!
//! A frame is a fixed sequence `[Shadow] -> [Geometry] -> Composite`, where
//! the bracketed passes depend on configuration. The plan is fixed when the
//! frame begins; [`PassSequencer`] refuses to run a pass out of that order
//! and refuses to finish a frame with a planned pass left out.

pub mod frame;
pub mod quad;
pub mod targets;

pub use frame::{FrameInputs, FrameRenderer, FrameStats};
pub use quad::FullscreenQuad;
pub use targets::{CubeShadowMap, GBuffer, ShadowMap};

use crate::core::config::{RendererConfig, ShadingMode, ShadowMode};
use crate::render::{RenderError, RenderResult};

/// Stage of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassKind {
    /// Depth from a light's point of view
    Shadow,
    /// G-buffer fill
    Geometry,
    /// Final image into the default framebuffer
    Composite,
}

/// Ordered pass list for a renderer configuration
pub fn plan_for(config: &RendererConfig) -> Vec<PassKind> {
    let mut plan = Vec::with_capacity(3);
    if config.shadows != ShadowMode::Disabled {
        plan.push(PassKind::Shadow);
    }
    if config.shading == ShadingMode::Deferred {
        plan.push(PassKind::Geometry);
    }
    plan.push(PassKind::Composite);
    plan
}

/// Tracks progress through one frame's pass plan
#[derive(Debug, Clone, Default)]
pub struct PassSequencer {
    plan: Vec<PassKind>,
    next: usize,
}

impl PassSequencer {
    /// Sequencer with no frame in flight
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a frame with the given plan, dropping any unfinished one
    pub fn begin_frame(&mut self, plan: Vec<PassKind>) {
        if self.next != 0 && self.next < self.plan.len() {
            log::warn!("Frame abandoned after {:?}", &self.plan[..self.next]);
        }
        self.plan = plan;
        self.next = 0;
    }

    /// Enter `kind`; it must be the next pass of the plan
    pub fn begin_pass(&mut self, kind: PassKind) -> RenderResult<()> {
        if self.plan.get(self.next) != Some(&kind) {
            return Err(RenderError::PassOrder { requested: kind, previous: self.previous() });
        }
        self.next += 1;
        Ok(())
    }

    /// Finish the frame; every planned pass must have run
    pub fn end_frame(&mut self) -> RenderResult<()> {
        let remaining = &self.plan[self.next..];
        if !remaining.is_empty() {
            return Err(RenderError::RenderingFailed(format!("frame ended before passes {:?}", remaining)));
        }
        self.next = 0;
        self.plan.clear();
        Ok(())
    }

    /// Last pass entered in the current frame
    pub fn previous(&self) -> Option<PassKind> {
        self.next.checked_sub(1).and_then(|i| self.plan.get(i).copied())
    }

    /// Passes entered so far in the current frame
    pub fn completed(&self) -> &[PassKind] {
        &self.plan[..self.next]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(shading: ShadingMode, shadows: ShadowMode) -> RendererConfig {
        RendererConfig { shading, shadows, ..RendererConfig::default() }
    }

    #[test]
    fn test_plans_follow_configuration() {
        use PassKind::*;
        assert_eq!(plan_for(&config(ShadingMode::Deferred, ShadowMode::PointCube)), vec![Shadow, Geometry, Composite]);
        assert_eq!(plan_for(&config(ShadingMode::Forward, ShadowMode::Directional)), vec![Shadow, Composite]);
        assert_eq!(plan_for(&config(ShadingMode::Deferred, ShadowMode::Disabled)), vec![Geometry, Composite]);
        assert_eq!(plan_for(&config(ShadingMode::Forward, ShadowMode::Disabled)), vec![Composite]);
    }

    #[test]
    fn test_in_order_frame_completes() {
        let mut sequencer = PassSequencer::new();
        sequencer.begin_frame(vec![PassKind::Shadow, PassKind::Composite]);

        sequencer.begin_pass(PassKind::Shadow).expect("shadow");
        sequencer.begin_pass(PassKind::Composite).expect("composite");

        assert_eq!(sequencer.completed(), &[PassKind::Shadow, PassKind::Composite]);
        assert!(sequencer.end_frame().is_ok());
    }

    #[test]
    fn test_out_of_order_pass_is_rejected() {
        let mut sequencer = PassSequencer::new();
        sequencer.begin_frame(vec![PassKind::Shadow, PassKind::Geometry, PassKind::Composite]);
        sequencer.begin_pass(PassKind::Shadow).expect("shadow");

        let err = sequencer.begin_pass(PassKind::Composite).unwrap_err();

        match err {
            RenderError::PassOrder { requested, previous } => {
                assert_eq!(requested, PassKind::Composite);
                assert_eq!(previous, Some(PassKind::Shadow));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_unplanned_pass_is_rejected() {
        let mut sequencer = PassSequencer::new();
        sequencer.begin_frame(vec![PassKind::Composite]);

        assert!(sequencer.begin_pass(PassKind::Geometry).is_err());
        assert_eq!(sequencer.previous(), None);
    }

    #[test]
    fn test_skipped_pass_fails_frame() {
        let mut sequencer = PassSequencer::new();
        sequencer.begin_frame(vec![PassKind::Geometry, PassKind::Composite]);
        sequencer.begin_pass(PassKind::Geometry).expect("geometry");

        assert!(sequencer.end_frame().is_err());
    }

    #[test]
    fn test_composite_cannot_repeat() {
        let mut sequencer = PassSequencer::new();
        sequencer.begin_frame(vec![PassKind::Composite]);
        sequencer.begin_pass(PassKind::Composite).expect("composite");

        assert!(sequencer.begin_pass(PassKind::Composite).is_err());
    }
}
