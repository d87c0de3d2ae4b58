// lifecycle.rs - Start/stop bookkeeping for the frame loop
//
// The loop may start from two places: the sprite settling (load or error)
// and an explicit `start`. Only the first of those is automatic, and only
// while nobody has called `stop` yet. `Stopped` holds until `start`.

use crate::asset::{AssetFallback, AssetState, SpriteSource};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    /// Not started yet; starts by itself once the sprite settles.
    Idle,
    Running,
    /// Cancelled by `stop`. Only `start` leaves this state.
    Stopped,
}

/// Instructions for the driver when the loop goes live.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Launch {
    pub source: SpriteSource,
    /// First launch: populate the field from scratch. Otherwise resume and
    /// apply any resize that arrived while stopped.
    pub populate: bool,
}

#[derive(Debug)]
pub struct Lifecycle {
    state: LoopState,
    asset: AssetState,
    fallback: AssetFallback,
    populated: bool,
}

impl Lifecycle {
    pub fn new(fallback: AssetFallback) -> Self {
        Self {
            state: LoopState::Idle,
            asset: AssetState::Pending,
            fallback,
            populated: false,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn asset(&self) -> &AssetState {
        &self.asset
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// The sprite finished loading or failed. Launches only from `Idle`.
    pub fn settle(&mut self, asset: AssetState) -> Option<Launch> {
        self.asset = asset;
        match self.state {
            LoopState::Idle => self.launch(),
            _ => None,
        }
    }

    /// Explicit start. A start before the sprite settles re-arms the
    /// automatic launch instead.
    pub fn start(&mut self) -> Option<Launch> {
        match (self.state, &self.asset) {
            (LoopState::Running, _) => None,
            (_, AssetState::Pending) => {
                self.state = LoopState::Idle;
                None
            }
            _ => self.launch(),
        }
    }

    /// Enter `Stopped` from any state. True when a live loop must be cancelled.
    pub fn stop(&mut self) -> bool {
        let was_running = self.state == LoopState::Running;
        self.state = LoopState::Stopped;
        was_running
    }

    /// The scheduler refused a frame; the loop is dead until the next `start`.
    pub fn halt(&mut self) {
        if self.state == LoopState::Running {
            self.state = LoopState::Stopped;
        }
    }

    fn launch(&mut self) -> Option<Launch> {
        let source = self.asset.resolve(self.fallback)?;
        let populate = !self.populated;
        self.populated = true;
        self.state = LoopState::Running;
        Some(Launch { source, populate })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed() -> AssetState {
        AssetState::Failed("sprite".into())
    }

    #[test]
    fn sprite_load_starts_idle_loop() {
        let mut life = Lifecycle::new(AssetFallback::Shape);
        let launch = life.settle(AssetState::Ready);
        assert_eq!(launch, Some(Launch { source: SpriteSource::Image, populate: true }));
        assert!(life.is_running());
    }

    #[test]
    fn stop_before_load_is_terminal() {
        let mut life = Lifecycle::new(AssetFallback::Shape);
        assert!(!life.stop());
        assert_eq!(life.state(), LoopState::Stopped);

        assert_eq!(life.settle(AssetState::Ready), None);
        assert_eq!(life.state(), LoopState::Stopped);

        // The field was never populated, so the first real start does it.
        let launch = life.start();
        assert_eq!(launch, Some(Launch { source: SpriteSource::Image, populate: true }));
    }

    #[test]
    fn start_while_pending_rearms_auto_start() {
        let mut life = Lifecycle::new(AssetFallback::Shape);
        life.stop();
        assert_eq!(life.start(), None);
        assert_eq!(life.state(), LoopState::Idle);
        assert!(life.settle(AssetState::Ready).is_some());
    }

    #[test]
    fn stop_then_start_resumes_without_repopulating() {
        let mut life = Lifecycle::new(AssetFallback::Shape);
        life.settle(AssetState::Ready);
        assert!(life.stop());
        assert!(!life.stop());
        assert_eq!(life.start(), Some(Launch { source: SpriteSource::Image, populate: false }));
    }

    #[test]
    fn start_while_running_is_noop() {
        let mut life = Lifecycle::new(AssetFallback::Shape);
        life.settle(AssetState::Ready);
        assert_eq!(life.start(), None);
        assert!(life.is_running());
    }

    #[test]
    fn failed_sprite_follows_fallback() {
        let mut shape = Lifecycle::new(AssetFallback::Shape);
        assert_eq!(shape.settle(failed()).map(|l| l.source), Some(SpriteSource::Shape));

        let mut skip = Lifecycle::new(AssetFallback::Skip);
        assert_eq!(skip.settle(failed()), None);
        assert_eq!(skip.state(), LoopState::Idle);
        assert_eq!(skip.start(), None);
        assert!(!skip.is_running());
    }

    #[test]
    fn halt_stops_only_a_running_loop() {
        let mut life = Lifecycle::new(AssetFallback::Shape);
        life.halt();
        assert_eq!(life.state(), LoopState::Idle);

        life.settle(AssetState::Ready);
        life.halt();
        assert_eq!(life.state(), LoopState::Stopped);
        assert_eq!(life.start().map(|l| l.populate), Some(false));
    }
}
