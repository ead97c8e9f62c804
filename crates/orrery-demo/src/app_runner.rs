use std::cell::RefCell;
use std::rc::{Rc, Weak};

use anyhow::{Context, Result};
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use orrery_engine::core::{App, AppControl, InitCtx};
use orrery_engine::driver::{LoopCoordinator, LoopMode};
use orrery_engine::render::{GpuRenderer, Renderer};
use orrery_engine::time::FrameClock;
use orrery_engine::viewport::ViewportSource;

use crate::animation::{container_values, scene_sheet, SequencePlayer};
use crate::stage::{Stage, CONTAINER};

/// Everything that only exists once a renderer and clock are available.
struct Session<R> {
    stage: Rc<RefCell<Stage<R>>>,
    coordinator: LoopCoordinator,
}

/// Stage the container listener writes into. Empty between sessions.
type StageSlot<R> = Rc<RefCell<Weak<RefCell<Stage<R>>>>>;

/// The demo application.
///
/// Owns the timeline player for its whole life; the stage and loop
/// coordinator are created by [`attach`](Self::attach) and dropped by
/// [`dispose`](Self::dispose). The container listener is registered once
/// and follows whichever stage is attached.
pub struct AppRunner<R> {
    player: Rc<RefCell<SequencePlayer>>,
    bound: StageSlot<R>,
    session: Option<Session<R>>,
}

impl<R: Renderer + 'static> AppRunner<R> {
    pub fn new() -> Result<Self> {
        let sheet = scene_sheet().context("failed to author the scene sheet")?;
        let runner = Self {
            player: Rc::new(RefCell::new(SequencePlayer::new(sheet))),
            bound: Rc::new(RefCell::new(Weak::new())),
            session: None,
        };
        runner.bind_container()?;
        Ok(runner)
    }

    /// Builds the stage around `renderer`, points the container animation at
    /// it and starts the timeline-driven loop.
    pub fn attach(&mut self, clock: &Rc<FrameClock>, renderer: R) -> Result<()> {
        self.dispose();

        let stage = Rc::new(RefCell::new(Stage::new(renderer)));
        *self.bound.borrow_mut() = Rc::downgrade(&stage);
        if let Some(values) = self.player.borrow().sheet().values(CONTAINER) {
            stage.borrow_mut().apply_container(&container_values(values));
        }

        let coordinator = LoopCoordinator::new(clock, Rc::clone(&stage));
        self.session = Some(Session { stage, coordinator });

        self.player
            .borrow_mut()
            .play_loop()
            .context("failed to start the container animation")?;
        self.drive()
    }

    fn bind_container(&self) -> Result<()> {
        let bound = Rc::clone(&self.bound);
        self.player
            .borrow_mut()
            .sheet_mut()
            .on_values_change(CONTAINER, move |values| {
                let Some(stage) = bound.borrow().upgrade() else {
                    return;
                };
                match stage.try_borrow_mut() {
                    Ok(mut stage) => stage.apply_container(&container_values(values)),
                    Err(_) => log::warn!("container update skipped: stage is busy"),
                };
            })
            .context("failed to bind the container")
    }

    pub fn stage(&self) -> Option<&Rc<RefCell<Stage<R>>>> {
        self.session.as_ref().map(|s| &s.stage)
    }

    pub fn player(&self) -> &Rc<RefCell<SequencePlayer>> {
        &self.player
    }

    pub fn mode(&self) -> LoopMode {
        self.session
            .as_ref()
            .map_or(LoopMode::Halted, |s| s.coordinator.mode())
    }

    /// Standalone loop: scene cycle only, the timeline holds still.
    pub fn play(&mut self) -> Result<()> {
        Ok(self.session_mut()?.coordinator.run_standalone()?)
    }

    /// Timeline-driven loop: the sequence advances before every cycle.
    pub fn drive(&mut self) -> Result<()> {
        let player = Rc::clone(&self.player);
        Ok(self.session_mut()?.coordinator.run_driven(&player)?)
    }

    pub fn stop(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.coordinator.halt();
        }
    }

    /// Follows the host viewport. Returns whether anything changed.
    pub fn resize_to(&mut self, source: &dyn ViewportSource) -> Result<bool> {
        match self.session.as_ref() {
            Some(session) => session.stage.borrow_mut().resize(source),
            None => Ok(false),
        }
    }

    /// Stops the loop and releases the stage. Safe to call more than once.
    pub fn dispose(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.coordinator.halt();
            *self.bound.borrow_mut() = Weak::new();
            log::debug!("stage released");
        }
    }

    fn session_mut(&mut self) -> Result<&mut Session<R>> {
        self.session
            .as_mut()
            .context("app runner has no stage; attach a renderer first")
    }

    /// Keyboard controls: P plays standalone, S stops, D resumes the
    /// timeline, Escape quits.
    fn on_key(&mut self, code: KeyCode) -> AppControl {
        let result = match code {
            KeyCode::KeyP => self.play(),
            KeyCode::KeyS => {
                self.stop();
                Ok(())
            }
            KeyCode::KeyD => self.drive(),
            KeyCode::Escape => return AppControl::Exit,
            _ => return AppControl::Continue,
        };

        match result {
            Ok(()) => log::info!("loop mode: {:?}", self.mode()),
            Err(e) => log::error!("{e:#}"),
        }
        AppControl::Continue
    }
}

impl App for AppRunner<GpuRenderer> {
    fn init(&mut self, ctx: InitCtx) -> Result<()> {
        let renderer = GpuRenderer::new(ctx.gpu);
        self.attach(&ctx.clock, renderer)
    }

    fn resize(&mut self, viewport: &dyn ViewportSource) -> Result<()> {
        self.resize_to(viewport).map(|_| ())
    }

    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !event.repeat =>
            {
                match event.physical_key {
                    PhysicalKey::Code(code) => self.on_key(code),
                    PhysicalKey::Unidentified(_) => AppControl::Continue,
                }
            }
            _ => AppControl::Continue,
        }
    }

    fn dispose(&mut self) {
        AppRunner::dispose(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use orrery_engine::driver::TimelineDriver;
    use orrery_engine::render::RenderOutput;
    use orrery_engine::scene::Scene;
    use orrery_engine::time::{FrameTime, ManualHost};
    use orrery_engine::viewport::{PerspectiveCamera, Viewport};

    #[derive(Default)]
    struct RecordingRenderer {
        frames: usize,
        sizes: Vec<(u32, u32)>,
        container_y: Vec<f32>,
    }

    impl RenderOutput for RecordingRenderer {
        fn set_output_size(&mut self, width: u32, height: u32) -> Result<()> {
            self.sizes.push((width, height));
            Ok(())
        }
    }

    impl Renderer for RecordingRenderer {
        fn render(&mut self, scene: &Scene, _camera: &PerspectiveCamera) -> Result<()> {
            // Zero extent means suspended, as with the GPU renderer.
            if self.sizes.last() == Some(&(0, 0)) {
                return Ok(());
            }
            self.frames += 1;
            if let Some(id) = scene.find(CONTAINER) {
                let y = scene.node(id).map_or(0.0, |n| n.transform.position.y);
                self.container_y.push(y);
            }
            Ok(())
        }
    }

    struct Rig {
        host: Rc<ManualHost>,
        clock: Rc<FrameClock>,
        runner: AppRunner<RecordingRenderer>,
    }

    fn rig() -> Rig {
        let host = Rc::new(ManualHost::new());
        let clock = Rc::new(FrameClock::new(host.clone()));
        let mut runner = AppRunner::new().unwrap();
        runner.attach(&clock, RecordingRenderer::default()).unwrap();
        Rig { host, clock, runner }
    }

    fn tick(rig: &Rig, ms: f64) {
        rig.clock.tick(FrameTime::at(ms, 0)).unwrap();
    }

    fn frames(rig: &Rig) -> usize {
        rig.runner.stage().unwrap().borrow().renderer().frames
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn attach_starts_the_driven_loop() {
        let rig = rig();
        assert_eq!(rig.runner.mode(), LoopMode::Driven);
        assert!(rig.host.is_pending());
        assert!(rig.runner.player().borrow().sheet().is_playing());
    }

    #[test]
    fn driven_ticks_animate_the_container() {
        let rig = rig();
        tick(&rig, 0.0);
        tick(&rig, 1000.0);
        tick(&rig, 2000.0);

        let stage = rig.runner.stage().unwrap().borrow();
        assert_eq!(stage.renderer().frames, 3);
        assert_eq!(stage.renderer().container_y, vec![0.0, 1.0, 2.0]);
        assert_eq!(stage.container_transform().unwrap().position.z, 20.0);
    }

    #[test]
    fn standalone_play_freezes_the_timeline() {
        let mut rig = rig();
        tick(&rig, 0.0);
        tick(&rig, 1000.0);
        rig.runner.play().unwrap();
        tick(&rig, 2000.0);
        tick(&rig, 3000.0);

        assert_eq!(rig.runner.mode(), LoopMode::Standalone);
        assert_eq!(frames(&rig), 4);
        assert_eq!(rig.runner.player().borrow().sheet().position(), 1.0);
    }

    #[test]
    fn stop_then_drive_resumes() {
        let mut rig = rig();
        tick(&rig, 0.0);
        rig.runner.stop();
        tick(&rig, 16.0);
        assert_eq!(frames(&rig), 1);
        assert_eq!(rig.runner.mode(), LoopMode::Halted);

        rig.runner.drive().unwrap();
        tick(&rig, 32.0);
        assert_eq!(frames(&rig), 2);
        assert_eq!(rig.runner.mode(), LoopMode::Driven);
    }

    #[test]
    fn dispose_is_idempotent_and_releases_the_stage() {
        let mut rig = rig();
        rig.runner.dispose();
        rig.runner.dispose();
        assert!(rig.runner.stage().is_none());
        assert!(!rig.clock.is_running());
        assert!(rig.runner.play().is_err());
    }

    #[test]
    fn reattach_keeps_a_single_container_listener() {
        let mut rig = rig();
        rig.runner.attach(&rig.clock, RecordingRenderer::default()).unwrap();
        rig.runner.attach(&rig.clock, RecordingRenderer::default()).unwrap();

        let listeners = rig.runner.player().borrow().sheet().listener_count(CONTAINER);
        assert_eq!(listeners, 1);

        tick(&rig, 0.0);
        tick(&rig, 1000.0);
        let stage = rig.runner.stage().unwrap().borrow();
        assert_eq!(stage.renderer().container_y, vec![0.0, 1.0]);
    }

    #[test]
    fn disposed_stage_no_longer_receives_values() {
        let mut rig = rig();
        let stage = Rc::clone(rig.runner.stage().unwrap());
        rig.runner.dispose();

        let mut player = rig.runner.player().borrow_mut();
        player.play_loop().unwrap();
        player.advance(0.0).unwrap();
        player.advance(1000.0).unwrap();
        drop(player);

        assert_eq!(stage.borrow().container_transform().unwrap().position.y, 0.0);
    }

    // ── resize & keys ─────────────────────────────────────────────────────

    #[test]
    fn resize_updates_camera_and_output() {
        let mut rig = rig();
        assert!(rig.runner.resize_to(&Viewport::new(1920.0, 1080.0)).unwrap());
        assert!(!rig.runner.resize_to(&Viewport::new(1920.0, 1080.0)).unwrap());

        let stage = rig.runner.stage().unwrap().borrow();
        assert!((stage.camera().aspect - 16.0 / 9.0).abs() < 1e-4);
        assert_eq!(stage.renderer().sizes, vec![(1920, 1080)]);
    }

    #[test]
    fn minimized_window_suspends_the_renderer() {
        let mut rig = rig();
        rig.runner.resize_to(&Viewport::new(1280.0, 720.0)).unwrap();
        assert!(rig.runner.resize_to(&Viewport::new(0.0, 0.0)).unwrap());
        tick(&rig, 0.0);
        assert_eq!(frames(&rig), 0);

        rig.runner.resize_to(&Viewport::new(1280.0, 720.0)).unwrap();
        tick(&rig, 16.0);
        assert_eq!(frames(&rig), 1);

        let stage = rig.runner.stage().unwrap().borrow();
        assert_eq!(stage.renderer().sizes, vec![(1280, 720), (0, 0), (1280, 720)]);
        assert!((stage.camera().aspect - 16.0 / 9.0).abs() < 1e-4);
    }

    #[test]
    fn keys_switch_loop_modes() {
        let mut rig = rig();
        assert_eq!(rig.runner.on_key(KeyCode::KeyP), AppControl::Continue);
        assert_eq!(rig.runner.mode(), LoopMode::Standalone);
        rig.runner.on_key(KeyCode::KeyS);
        assert_eq!(rig.runner.mode(), LoopMode::Halted);
        rig.runner.on_key(KeyCode::KeyD);
        assert_eq!(rig.runner.mode(), LoopMode::Driven);
        assert_eq!(rig.runner.on_key(KeyCode::Escape), AppControl::Exit);
    }
}
