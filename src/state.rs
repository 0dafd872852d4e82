//! Checked-state machine.
//!
//! Off/On are the rest states; AnimatingToOn/AnimatingToOff own the sweep.
//! Set requests arriving mid-sweep are dropped (not queued), and a request
//! matching the current value is a no-op. Effects never fire from inside the
//! handlers; they are collected in the dispatch context and applied by the
//! widget facade.

use statig::{blocking::IntoStateMachineExt as _, prelude::*};

/// Externally observable switch state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwitchState {
    Off,
    On,
    AnimatingToOn,
    AnimatingToOff,
}

/// What the facade must do after a dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SweepCommand {
    /// Run the animated transition.
    Start,
    /// Jump straight to the terminal state, progress reset to zero.
    Snap,
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct DispatchContext {
    /// New checked value to broadcast, at most one per dispatch.
    pub changed: Option<bool>,
    pub command: Option<SweepCommand>,
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum SwitchHsmEvent {
    Set { checked: bool, live: bool },
    Finished,
}

pub(crate) struct SwitchHsm {
    checked: bool,
}

impl SwitchHsm {
    fn begin(&mut self, context: &mut DispatchContext, checked: bool, live: bool) {
        self.checked = checked;
        context.changed = Some(checked);
        context.command = Some(if live {
            SweepCommand::Start
        } else {
            SweepCommand::Snap
        });
    }
}

#[state_machine(
    initial = "State::off()",
    state(derive(Clone, Copy, Debug, PartialEq, Eq))
)]
impl SwitchHsm {
    #[state]
    fn off(&mut self, context: &mut DispatchContext, event: &SwitchHsmEvent) -> Outcome<State> {
        match event {
            SwitchHsmEvent::Set {
                checked: true,
                live,
            } => {
                self.begin(context, true, *live);
                if *live {
                    Transition(State::animating_to_on())
                } else {
                    Transition(State::on())
                }
            }
            _ => Handled,
        }
    }

    #[state]
    fn on(&mut self, context: &mut DispatchContext, event: &SwitchHsmEvent) -> Outcome<State> {
        match event {
            SwitchHsmEvent::Set {
                checked: false,
                live,
            } => {
                self.begin(context, false, *live);
                if *live {
                    Transition(State::animating_to_off())
                } else {
                    Transition(State::off())
                }
            }
            _ => Handled,
        }
    }

    #[state]
    fn animating_to_on(
        &mut self,
        context: &mut DispatchContext,
        event: &SwitchHsmEvent,
    ) -> Outcome<State> {
        let _ = context;
        match event {
            SwitchHsmEvent::Finished => Transition(State::on()),
            // In-flight Set requests are dropped, not queued.
            SwitchHsmEvent::Set { .. } => Handled,
        }
    }

    #[state]
    fn animating_to_off(
        &mut self,
        context: &mut DispatchContext,
        event: &SwitchHsmEvent,
    ) -> Outcome<State> {
        let _ = context;
        match event {
            SwitchHsmEvent::Finished => Transition(State::off()),
            SwitchHsmEvent::Set { .. } => Handled,
        }
    }
}

/// Owning wrapper around the statig machine, mirroring its state into
/// [`SwitchState`] for callers.
pub(crate) struct SwitchCore {
    machine: statig::blocking::StateMachine<SwitchHsm>,
}

impl SwitchCore {
    pub fn new(checked: bool) -> Self {
        let mut core = Self {
            machine: SwitchHsm { checked: false }.state_machine(),
        };
        if checked {
            // Seed the initial value without animating or notifying.
            let _ = core.set(true, false);
        }
        core
    }

    pub fn set(&mut self, checked: bool, live: bool) -> DispatchContext {
        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&SwitchHsmEvent::Set { checked, live }, &mut context);
        context
    }

    pub fn finished(&mut self) -> DispatchContext {
        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&SwitchHsmEvent::Finished, &mut context);
        context
    }

    pub fn state(&self) -> SwitchState {
        match self.machine.state() {
            State::Off {} => SwitchState::Off,
            State::On {} => SwitchState::On,
            State::AnimatingToOn {} => SwitchState::AnimatingToOn,
            State::AnimatingToOff {} => SwitchState::AnimatingToOff,
        }
    }

    pub fn is_checked(&self) -> bool {
        self.machine.inner().checked
    }

    pub fn is_moving(&self) -> bool {
        matches!(
            self.state(),
            SwitchState::AnimatingToOn | SwitchState::AnimatingToOff
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_transition_passes_through_animation() {
        let mut core = SwitchCore::new(false);
        assert_eq!(core.state(), SwitchState::Off);

        let ctx = core.set(true, true);
        assert_eq!(ctx.changed, Some(true));
        assert_eq!(ctx.command, Some(SweepCommand::Start));
        assert_eq!(core.state(), SwitchState::AnimatingToOn);
        assert!(core.is_checked());

        let ctx = core.finished();
        assert_eq!(ctx.changed, None);
        assert_eq!(core.state(), SwitchState::On);
    }

    #[test]
    fn detached_transition_snaps() {
        let mut core = SwitchCore::new(false);
        let ctx = core.set(true, false);
        assert_eq!(ctx.changed, Some(true));
        assert_eq!(ctx.command, Some(SweepCommand::Snap));
        assert_eq!(core.state(), SwitchState::On);
    }

    #[test]
    fn redundant_set_is_silent() {
        let mut core = SwitchCore::new(false);
        let ctx = core.set(false, true);
        assert_eq!(ctx.changed, None);
        assert_eq!(ctx.command, None);
        assert_eq!(core.state(), SwitchState::Off);
    }

    #[test]
    fn set_mid_sweep_is_dropped() {
        let mut core = SwitchCore::new(false);
        let _ = core.set(true, true);
        assert!(core.is_moving());

        let ctx = core.set(false, true);
        assert_eq!(ctx.changed, None);
        assert_eq!(ctx.command, None);
        assert_eq!(core.state(), SwitchState::AnimatingToOn);
        assert!(core.is_checked());
    }

    #[test]
    fn initial_checked_seeds_on_without_event() {
        let core = SwitchCore::new(true);
        assert_eq!(core.state(), SwitchState::On);
        assert!(core.is_checked());
    }

    #[test]
    fn off_sweep_mirrors_on_sweep() {
        let mut core = SwitchCore::new(true);
        let ctx = core.set(false, true);
        assert_eq!(ctx.changed, Some(false));
        assert_eq!(core.state(), SwitchState::AnimatingToOff);
        assert!(!core.is_checked());
        let _ = core.finished();
        assert_eq!(core.state(), SwitchState::Off);
    }
}
