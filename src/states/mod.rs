//! State machine core
//!
//! A registry of the four game states with an enter/execute/exit
//! lifecycle. Transitions requested from inside a state's `execute` are
//! deferred: the machine applies at most one after the call returns, so a
//! state never runs against half-switched assumptions and the swap is
//! never reentrant.
//!
//! States own no scene data; everything shared (entities, camera, input,
//! window surface, audio) is lent to the active state through
//! [`StateContext`] for exactly one call at a time.

pub mod menu;
pub mod pause;
pub mod play;
pub mod win;

pub use menu::MenuState;
pub use pause::PauseState;
pub use play::PlayState;
pub use win::WinState;

use std::collections::HashMap;

use crate::audio::AudioSink;
use crate::platform::{InputSnapshot, WindowControl};
use crate::renderer::SceneFrame;
use crate::sim::{Scene, Side};

/// The closed set of registered state names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateId {
    Menu,
    Play,
    Pause,
    Win,
}

/// How a play session ended. Produced by the play state the moment a side
/// reaches the win threshold and carried in the shared context, so the win
/// state never has to inspect another state's internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOutcome {
    pub winner: Side,
    pub left_points: u32,
    pub right_points: u32,
}

/// Everything the active state may read or mutate during one call
pub struct StateContext<'a> {
    pub input: &'a mut InputSnapshot,
    pub window: &'a mut WindowControl,
    pub scene: &'a mut Scene,
    pub audio: &'a mut dyn AudioSink,
    pub outcome: &'a mut Option<MatchOutcome>,
    /// MSAA reconfigure request for the renderer, applied after the frame
    pub requested_sample_count: &'a mut Option<u32>,

    previous_state: Option<StateId>,
    pending_transition: Option<StateId>,
}

impl<'a> StateContext<'a> {
    pub fn new(
        input: &'a mut InputSnapshot,
        window: &'a mut WindowControl,
        scene: &'a mut Scene,
        audio: &'a mut dyn AudioSink,
        outcome: &'a mut Option<MatchOutcome>,
        requested_sample_count: &'a mut Option<u32>,
    ) -> Self {
        Self {
            input,
            window,
            scene,
            audio,
            outcome,
            requested_sample_count,
            previous_state: None,
            pending_transition: None,
        }
    }

    /// The state that was active before the current one entered
    pub fn previous_state(&self) -> Option<StateId> {
        self.previous_state
    }

    /// Ask the machine to switch states once the current call returns
    pub fn request_transition(&mut self, id: StateId) {
        self.pending_transition = Some(id);
    }
}

/// One game state: menu, play, pause or win
pub trait State {
    /// Called once when the state becomes active
    fn enter(&mut self, ctx: &mut StateContext);

    /// Called once per frame while active; returns the frame to draw
    fn execute(&mut self, ctx: &mut StateContext, delta_time: f32) -> SceneFrame;

    /// Called once when the state stops being active
    fn exit(&mut self, ctx: &mut StateContext);
}

pub struct StateMachine {
    states: HashMap<StateId, Box<dyn State>>,
    current: StateId,
    previous: Option<StateId>,
}

impl StateMachine {
    pub fn new(initial: StateId) -> Self {
        Self {
            states: HashMap::new(),
            current: initial,
            previous: None,
        }
    }

    /// Store a state under its id. Re-registering an id replaces the old
    /// instance.
    pub fn register_state(&mut self, id: StateId, state: Box<dyn State>) {
        self.states.insert(id, state);
    }

    pub fn current_state(&self) -> StateId {
        self.current
    }

    pub fn previous_state(&self) -> Option<StateId> {
        self.previous
    }

    /// Enter the initial state. Call once before the first frame.
    pub fn start(&mut self, ctx: &mut StateContext) {
        ctx.previous_state = self.previous;
        match self.states.get_mut(&self.current) {
            Some(state) => state.enter(ctx),
            None => {
                debug_assert!(false, "initial state {:?} is not registered", self.current);
                log::warn!("Initial state {:?} is not registered", self.current);
            }
        }
    }

    /// Run one frame of the active state, then apply at most one deferred
    /// transition.
    pub fn frame(&mut self, ctx: &mut StateContext, delta_time: f32) -> SceneFrame {
        ctx.previous_state = self.previous;

        let frame = match self.states.get_mut(&self.current) {
            Some(state) => state.execute(ctx, delta_time),
            None => {
                debug_assert!(false, "current state {:?} is not registered", self.current);
                log::warn!("Current state {:?} is not registered", self.current);
                SceneFrame::empty()
            }
        };

        if let Some(next) = ctx.pending_transition.take() {
            self.change_state(ctx, next);
        }

        frame
    }

    /// Exit the active state and enter `id`. A transition to the already
    /// active state still runs exactly one exit and one enter. An
    /// unregistered id is a logic error: it asserts in debug builds and is
    /// a logged no-op in release.
    pub fn change_state(&mut self, ctx: &mut StateContext, id: StateId) {
        if !self.states.contains_key(&id) {
            debug_assert!(false, "transition to unregistered state {id:?}");
            log::warn!("Ignoring transition to unregistered state {id:?}");
            return;
        }

        if let Some(state) = self.states.get_mut(&self.current) {
            state.exit(ctx);
        }

        self.previous = Some(self.current);
        self.current = id;
        ctx.previous_state = self.previous;
        log::info!("State transition: {:?} -> {:?}", self.previous, id);

        if let Some(state) = self.states.get_mut(&id) {
            state.enter(ctx);
        }
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;
    use crate::audio::CueRecorder;

    /// Owns everything a `StateContext` borrows, so state tests can build
    /// contexts without a window or GPU.
    pub struct Harness {
        pub input: InputSnapshot,
        pub window: WindowControl,
        pub scene: Scene,
        pub audio: CueRecorder,
        pub outcome: Option<MatchOutcome>,
        pub sample_request: Option<u32>,
        pub previous: Option<StateId>,
    }

    impl Harness {
        pub fn new() -> Self {
            Self {
                input: InputSnapshot::new(),
                window: WindowControl::new(1280, 720),
                scene: Scene::new(),
                audio: CueRecorder::default(),
                outcome: None,
                sample_request: None,
                previous: None,
            }
        }

        pub fn ctx(&mut self) -> StateContext<'_> {
            let mut ctx = StateContext::new(
                &mut self.input,
                &mut self.window,
                &mut self.scene,
                &mut self.audio,
                &mut self.outcome,
                &mut self.sample_request,
            );
            ctx.previous_state = self.previous;
            ctx
        }

        /// Run `enter` on a state with this harness's context
        pub fn enter(&mut self, state: &mut dyn State) {
            let mut ctx = self.ctx();
            state.enter(&mut ctx);
        }

        /// Run one `execute` and return any requested transition
        pub fn step(&mut self, state: &mut dyn State, dt: f32) -> (SceneFrame, Option<StateId>) {
            let mut ctx = self.ctx();
            let frame = state.execute(&mut ctx, dt);
            (frame, ctx.pending_transition)
        }

        /// Press a key for one event (press without release)
        pub fn press(&mut self, key: crate::platform::Key) {
            self.input.set_key_pressed(key, true);
        }

        pub fn release(&mut self, key: crate::platform::Key) {
            self.input.set_key_pressed(key, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testutil::Harness;
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Test state that records its lifecycle calls
    struct Probe {
        name: &'static str,
        events: Rc<RefCell<Vec<String>>>,
        transition_on_execute: Option<StateId>,
    }

    impl Probe {
        fn new(name: &'static str, events: &Rc<RefCell<Vec<String>>>) -> Box<Self> {
            Box::new(Self {
                name,
                events: Rc::clone(events),
                transition_on_execute: None,
            })
        }

        fn with_transition(
            name: &'static str,
            events: &Rc<RefCell<Vec<String>>>,
            next: StateId,
        ) -> Box<Self> {
            Box::new(Self {
                name,
                events: Rc::clone(events),
                transition_on_execute: Some(next),
            })
        }
    }

    impl State for Probe {
        fn enter(&mut self, _ctx: &mut StateContext) {
            self.events.borrow_mut().push(format!("{}:enter", self.name));
        }

        fn execute(&mut self, ctx: &mut StateContext, _dt: f32) -> SceneFrame {
            self.events
                .borrow_mut()
                .push(format!("{}:execute", self.name));
            if let Some(next) = self.transition_on_execute {
                ctx.request_transition(next);
            }
            SceneFrame::empty()
        }

        fn exit(&mut self, _ctx: &mut StateContext) {
            self.events.borrow_mut().push(format!("{}:exit", self.name));
        }
    }

    #[test]
    fn test_deferred_transition_order() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut harness = Harness::new();
        let mut machine = StateMachine::new(StateId::Menu);
        machine.register_state(
            StateId::Menu,
            Probe::with_transition("menu", &events, StateId::Play),
        );
        machine.register_state(StateId::Play, Probe::new("play", &events));

        let mut ctx = harness.ctx();
        machine.start(&mut ctx);
        machine.frame(&mut ctx, 0.016);

        // The requesting state finishes its execute before the swap runs.
        assert_eq!(
            *events.borrow(),
            vec!["menu:enter", "menu:execute", "menu:exit", "play:enter"]
        );
        assert_eq!(machine.current_state(), StateId::Play);
        assert_eq!(machine.previous_state(), Some(StateId::Menu));
    }

    #[test]
    fn test_self_transition_runs_one_exit_one_enter() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut harness = Harness::new();
        let mut machine = StateMachine::new(StateId::Play);
        machine.register_state(StateId::Play, Probe::new("play", &events));

        let mut ctx = harness.ctx();
        machine.start(&mut ctx);
        events.borrow_mut().clear();

        machine.change_state(&mut ctx, StateId::Play);
        assert_eq!(*events.borrow(), vec!["play:exit", "play:enter"]);
        assert_eq!(machine.previous_state(), Some(StateId::Play));
    }

    #[test]
    fn test_reregistration_overwrites() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut harness = Harness::new();
        let mut machine = StateMachine::new(StateId::Menu);
        machine.register_state(StateId::Menu, Probe::new("old", &events));
        machine.register_state(StateId::Menu, Probe::new("new", &events));

        let mut ctx = harness.ctx();
        machine.start(&mut ctx);
        assert_eq!(*events.borrow(), vec!["new:enter"]);
    }

    #[test]
    fn test_previous_state_visible_to_entered_state() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut harness = Harness::new();
        let mut machine = StateMachine::new(StateId::Play);
        machine.register_state(StateId::Play, Probe::new("play", &events));
        machine.register_state(StateId::Pause, Probe::new("pause", &events));

        let mut ctx = harness.ctx();
        machine.start(&mut ctx);
        machine.change_state(&mut ctx, StateId::Pause);

        assert_eq!(ctx.previous_state(), Some(StateId::Play));
        machine.change_state(&mut ctx, StateId::Play);
        assert_eq!(ctx.previous_state(), Some(StateId::Pause));
    }

    // In debug builds an unknown transition asserts; in release it must be
    // a logged no-op that leaves the current state running.
    #[test]
    #[cfg_attr(debug_assertions, should_panic)]
    fn test_unknown_transition_is_no_op_in_release() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut harness = Harness::new();
        let mut machine = StateMachine::new(StateId::Menu);
        machine.register_state(StateId::Menu, Probe::new("menu", &events));

        let mut ctx = harness.ctx();
        machine.start(&mut ctx);
        machine.change_state(&mut ctx, StateId::Win);

        assert_eq!(machine.current_state(), StateId::Menu);
        assert_eq!(machine.previous_state(), None);
        assert_eq!(*events.borrow(), vec!["menu:enter"]);
    }
}
