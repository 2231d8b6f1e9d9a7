//! Page-level wiring: one `Stage`, its canvases, timers and listeners.

use crate::canvas::CanvasSurface;
use crate::constants::*;
use crate::controls::{command_for_key, Command};
use crate::dom::{canvas_by_id, Listener};
use crate::timer::{FrameLoop, Interval};
use crate::transport;
use explainer_core::{
    ExplainerResult, SceneId, Stage, StageConfig, Surface, SystemClock, TickOutcome,
};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct Player {
    document: web::Document,
    stage: RefCell<Stage<SystemClock>>,
    ambient: RefCell<Option<CanvasSurface>>,
    scenes: RefCell<Vec<Option<CanvasSurface>>>,
    ticker: RefCell<Option<Interval>>,
    ambient_loop: RefCell<Option<FrameLoop>>,
    scene_loops: RefCell<Vec<FrameLoop>>,
    listeners: RefCell<Vec<Listener>>,
    measured_scene: Cell<Option<usize>>,
}

fn surface_for(document: &web::Document, id: &str) -> Option<CanvasSurface> {
    let Some(canvas) = canvas_by_id(document, id) else {
        log::warn!("[player] missing canvas #{}", id);
        return None;
    };
    match CanvasSurface::new(canvas) {
        Ok(s) => Some(s),
        Err(e) => {
            log::error!("[player] canvas #{} unusable: {}", id, e);
            None
        }
    }
}

fn as_surface(slot: Option<&mut CanvasSurface>) -> Option<&mut dyn Surface> {
    slot.map(|s| s as &mut dyn Surface)
}

impl Player {
    pub fn mount(document: web::Document, config: StageConfig) -> anyhow::Result<Rc<Self>> {
        let tick_ms = config.timeline.tick_interval_ms;
        let stage = Stage::new(config, SystemClock::new())?;

        let ambient = surface_for(&document, AMBIENT_CANVAS_ID);
        let scenes = SceneId::ALL
            .iter()
            .map(|scene| {
                let id = format!("{}{}", SCENE_CANVAS_PREFIX, scene.index());
                surface_for(&document, &id)
            })
            .collect();

        let player = Rc::new(Self {
            document,
            stage: RefCell::new(stage),
            ambient: RefCell::new(ambient),
            scenes: RefCell::new(scenes),
            ticker: RefCell::new(None),
            ambient_loop: RefCell::new(None),
            scene_loops: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
            measured_scene: Cell::new(None),
        });
        player.wire(tick_ms);
        player.resize();
        player.sync();
        log::info!("[player] mounted");
        Ok(player)
    }

    fn wire(self: &Rc<Self>, tick_ms: u32) {
        let weak = Rc::downgrade(self);
        let with = move |f: fn(&Player)| {
            let weak: Weak<Player> = weak.clone();
            move || {
                if let Some(p) = weak.upgrade() {
                    f(&p);
                }
            }
        };

        *self.ticker.borrow_mut() = Some(Interval::new(tick_ms, with(Player::on_tick)));
        *self.ambient_loop.borrow_mut() = Some(FrameLoop::new(with(Player::frame_ambient)));
        *self.scene_loops.borrow_mut() = SceneId::ALL
            .iter()
            .map(|scene| {
                let index = scene.index();
                let weak = Rc::downgrade(self);
                FrameLoop::new(move || {
                    if let Some(p) = weak.upgrade() {
                        p.frame_scene(index);
                    }
                })
            })
            .collect();

        let mut listeners = Vec::new();
        listeners.extend(Listener::on_click(
            &self.document,
            PAUSE_BUTTON_ID,
            with(|p| {
                p.toggle_pause();
            }),
        ));
        listeners.extend(Listener::on_click(
            &self.document,
            REPLAY_BUTTON_ID,
            with(Player::replay),
        ));
        for scene in SceneId::ALL {
            let weak = Rc::downgrade(self);
            let id = format!("{}{}", SCENE_DOT_PREFIX, scene.index());
            listeners.extend(Listener::on_click(&self.document, &id, move || {
                if let Some(p) = weak.upgrade() {
                    p.run(Command::Seek(scene.index()));
                }
            }));
        }
        if let Some(window) = web::window() {
            let resize = with(Player::resize);
            listeners.extend(Listener::new(&window, "resize", move |_| resize()));
            let weak = Rc::downgrade(self);
            listeners.extend(Listener::new(&window, "keydown", move |ev: web::Event| {
                let Some(p) = weak.upgrade() else {
                    return;
                };
                let Some(kev) = ev.dyn_ref::<web::KeyboardEvent>() else {
                    return;
                };
                if kev.repeat() {
                    return;
                }
                if let Some(cmd) = command_for_key(&kev.key(), SceneId::ALL.len()) {
                    if cmd == Command::TogglePause {
                        ev.prevent_default();
                    }
                    p.run(cmd);
                }
            }));
        }
        *self.listeners.borrow_mut() = listeners;
    }

    pub fn run(&self, cmd: Command) {
        match cmd {
            Command::TogglePause => {
                self.toggle_pause();
            }
            Command::Replay => self.replay(),
            Command::Seek(index) => {
                if let Err(e) = self.seek(index) {
                    log::warn!("[player] {}", e);
                }
            }
        }
    }

    pub fn toggle_pause(&self) -> bool {
        let paused = self.stage.borrow_mut().toggle_pause();
        self.sync();
        paused
    }

    pub fn replay(&self) {
        self.stage.borrow_mut().replay();
        self.sync();
    }

    pub fn seek(&self, index: usize) -> ExplainerResult<()> {
        self.stage.borrow_mut().seek(index)?;
        self.sync();
        Ok(())
    }

    pub fn with_stage<R>(&self, f: impl FnOnce(&Stage<SystemClock>) -> R) -> R {
        f(&*self.stage.borrow())
    }

    fn on_tick(&self) {
        let outcome = self.stage.borrow_mut().tick();
        if outcome != TickOutcome::Idle {
            self.sync();
        }
    }

    fn frame_ambient(&self) {
        let mut stage = self.stage.borrow_mut();
        let mut ambient = self.ambient.borrow_mut();
        stage.frame_ambient(as_surface(ambient.as_mut()));
    }

    fn frame_scene(&self, index: usize) {
        let mut stage = self.stage.borrow_mut();
        let mut scenes = self.scenes.borrow_mut();
        let slot = scenes.get_mut(index).and_then(|s| s.as_mut());
        stage.frame_scene(index, as_surface(slot));
    }

    fn measure_scene(&self, index: usize) {
        let viewport = match self.scenes.borrow_mut().get_mut(index) {
            Some(Some(surface)) => surface.sync_backing_size(),
            _ => return,
        };
        if let Err(e) = self.stage.borrow_mut().resize_scene(index, viewport) {
            log::warn!("[player] {}", e);
        }
    }

    fn resize(&self) {
        if let Some(surface) = self.ambient.borrow_mut().as_mut() {
            let viewport = surface.sync_backing_size();
            self.stage.borrow_mut().resize_ambient(viewport);
        }
        for index in 0..SceneId::ALL.len() {
            self.measure_scene(index);
        }
    }

    /// Push the current state to the DOM and start or stop every timer to match it.
    fn sync(&self) {
        let (snapshot, signals, wants_ticks, ambient_active) = {
            let stage = self.stage.borrow();
            (
                stage.snapshot(),
                *stage.signals(),
                stage.playback().wants_ticks(),
                stage.ambient().is_active(),
            )
        };
        transport::render(&self.document, &snapshot, &signals);

        // hidden containers measure as zero, so re-measure once a scene is shown
        if self.measured_scene.get() != Some(snapshot.scene) {
            self.measure_scene(snapshot.scene);
            self.measured_scene.set(Some(snapshot.scene));
        }

        let scenes = self.scenes.borrow();
        for (index, frame_loop) in self.scene_loops.borrow().iter().enumerate() {
            let has_surface = matches!(scenes.get(index), Some(Some(_)));
            frame_loop.set_running(signals[index].is_active && has_surface);
        }
        if let Some(l) = self.ambient_loop.borrow().as_ref() {
            l.set_running(ambient_active && self.ambient.borrow().is_some());
        }
        if let Some(t) = self.ticker.borrow().as_ref() {
            t.set_running(wants_ticks);
        }
    }

    /// Cancel every timer and loop, remove every listener, release every engine.
    pub fn teardown(&self) {
        if let Some(t) = self.ticker.borrow_mut().take() {
            t.stop();
        }
        if let Some(l) = self.ambient_loop.borrow_mut().take() {
            l.stop();
        }
        for l in self.scene_loops.borrow_mut().drain(..) {
            l.stop();
        }
        self.listeners.borrow_mut().clear();
        self.stage.borrow_mut().teardown();
        log::info!("[player] destroyed");
    }
}
