//! Processor control states.
//!
//! The processor moves through one state per machine cycle. `Control`
//! requests (reset, run, pause) pick the next state and whether the
//! processor must tick right away to apply its entry effect.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum State {
    /// Held in reset
    Reset,
    /// One-shot initialization between reset and the first fetch
    Init,
    /// S0: read the opcode at R(P)
    Fetch,
    /// S1: apply the latched opcode
    Execute,
    /// Extra machine cycle of three-cycle instructions
    ForceExecute,
    /// Frozen, resumes into the saved state
    Pause(Box<State>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Reset,
    Run,
    Pause,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Transition {
    pub next: State,
    pub tick: bool,
}

impl Transition {
    fn tick(next: State) -> Self {
        Self { next, tick: true }
    }

    fn stay(next: State) -> Self {
        Self { next, tick: false }
    }
}

impl State {
    pub fn on_control(self, control: Control) -> Transition {
        use State::*;

        match (self, control) {
            (_, Control::Reset) => Transition::tick(Reset),

            (Reset, Control::Run) => Transition::tick(Init),
            // Init is only entered from Reset and leaves on the next tick
            (Init, Control::Run) => Transition::stay(Init),
            (Pause(previous), Control::Run) => Transition::tick(*previous),
            (state, Control::Run) => Transition::tick(state),

            (Pause(previous), Control::Pause) => Transition::tick(Pause(previous)),
            (state, Control::Pause) => Transition::tick(Pause(Box::new(state))),
        }
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, State::Pause(_))
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Reset => write!(f, "Reset"),
            State::Init => write!(f, "Init"),
            State::Fetch => write!(f, "Fetch"),
            State::Execute => write!(f, "Execute"),
            State::ForceExecute => write!(f, "ForceExecute"),
            State::Pause(previous) => write!(f, "Pause({previous})"),
        }
    }
}
