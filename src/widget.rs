//! The checkable switch control.
//!
//! `SwitchButton` glues the state machine, sweep driver and renderer to a host
//! framework's lifecycle: the host attaches the control, measures it, pumps
//! `tick` with a millisecond clock, and draws whenever a redraw was requested.
//! Everything runs on the host's UI thread; nothing here blocks.

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

use crate::anim::{Sweep, SweepFrame};
use crate::color::Argb;
use crate::config::{Metrics, VisualConfig, INTRINSIC_HEIGHT_DP, INTRINSIC_WIDTH_DP};
use crate::geometry::{Fx, FX_ONE, FX_ZERO};
use crate::render;
use crate::sprite::CloudArt;
use crate::state::{SweepCommand, SwitchCore, SwitchState};

/// Host layout constraint for one axis, MeasureSpec style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Constraint {
    Unspecified,
    Exactly(u32),
    AtMost(u32),
}

/// Outer padding around the intrinsic switch body, in px.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Insets {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

/// Fired once per actual state flip, never for redundant sets.
pub type ChangeListener = Box<dyn FnMut(&mut SwitchButton, bool)>;
/// Host click handler; its presence marks the interaction as consumed.
pub type ClickHandler = Box<dyn FnMut(&mut SwitchButton)>;
/// Platform click-sound pass-through.
pub type SoundHook = Box<dyn FnMut()>;

pub struct SwitchButton {
    config: VisualConfig,
    core: SwitchCore,
    sweep: Option<Sweep>,
    progress: Fx,
    padding: Insets,
    listener: Option<ChangeListener>,
    on_click: Option<ClickHandler>,
    click_sound: Option<SoundHook>,
    attached: bool,
    measured: Option<Size>,
    notifying: bool,
    needs_redraw: bool,
}

impl Default for SwitchButton {
    fn default() -> Self {
        Self::new(VisualConfig::default(), false)
    }
}

impl SwitchButton {
    pub fn new(config: VisualConfig, checked: bool) -> Self {
        Self {
            config,
            core: SwitchCore::new(checked),
            sweep: None,
            progress: FX_ZERO,
            padding: Insets::default(),
            listener: None,
            on_click: None,
            click_sound: None,
            attached: false,
            measured: None,
            notifying: false,
            needs_redraw: false,
        }
    }

    pub fn is_checked(&self) -> bool {
        self.core.is_checked()
    }

    pub fn is_moving(&self) -> bool {
        self.core.is_moving()
    }

    pub fn state(&self) -> SwitchState {
        self.core.state()
    }

    pub fn progress(&self) -> Fx {
        self.progress
    }

    pub fn toggle(&mut self) {
        self.set_checked(!self.is_checked());
    }

    /// Flip the checked value. Dropped while a sweep is in flight and while a
    /// change notification is being delivered; a matching value is a no-op.
    pub fn set_checked(&mut self, checked: bool) {
        if self.is_moving() || self.notifying {
            return;
        }

        let live = self.attached && self.measured.is_some();
        let outcome = self.core.set(checked, live);

        if let Some(new_value) = outcome.changed {
            log::debug!("switch flips to {new_value} (live: {live})");
            self.notify(new_value);
        }

        match outcome.command {
            Some(SweepCommand::Start) => {
                // Replaces any prior sweep; the old one never completes.
                self.sweep = Some(Sweep::new(self.config.duration_ms));
                self.progress = FX_ZERO;
                self.request_redraw();
            }
            Some(SweepCommand::Snap) => {
                self.sweep = None;
                self.progress = FX_ZERO;
                self.request_redraw();
            }
            None => {}
        }
    }

    fn notify(&mut self, new_value: bool) {
        self.notifying = true;
        if let Some(mut listener) = self.listener.take() {
            listener(self, new_value);
            // Replace-on-set: keep a listener installed during the callback.
            if self.listener.is_none() {
                self.listener = Some(listener);
            }
        }
        self.notifying = false;
    }

    /// Advance the active sweep. Call once per frame with a monotonic
    /// millisecond clock; completion finalizes the terminal state exactly once.
    pub fn tick(&mut self, now_ms: u64) {
        let Some(sweep) = self.sweep.as_mut() else {
            return;
        };
        match sweep.tick(now_ms) {
            SweepFrame::Running(progress) => {
                self.progress = progress;
            }
            SweepFrame::Finished => {
                self.sweep = None;
                self.progress = FX_ONE;
                let _ = self.core.finished();
                log::debug!("sweep settled at {:?}", self.core.state());
            }
        }
        self.request_redraw();
    }

    /// Draw the current frame, centering the intrinsic switch inside the
    /// target's bounding box minus the outer padding.
    pub fn draw<D>(&mut self, target: &mut D, cloud: &CloudArt<'_>) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let m = Metrics::from_config(&self.config);
        let bounds = target.bounding_box();
        let inner_w = bounds.size.width as i32 - self.padding.left - self.padding.right;
        let inner_h = bounds.size.height as i32 - self.padding.top - self.padding.bottom;
        let dx = bounds.top_left.x + self.padding.left + (inner_w - m.width) / 2;
        let dy = bounds.top_left.y + self.padding.top + (inner_h - m.height) / 2;

        let mut shifted = target.translated(Point::new(dx, dy));
        render::render(
            &mut shifted,
            &self.config,
            &m,
            self.core.state(),
            self.progress,
            cloud,
        )?;
        self.needs_redraw = false;
        Ok(())
    }

    /// Size negotiation: the intrinsic 120x60dp body plus outer padding,
    /// stretched when the host hands down a larger exact or unbounded size.
    pub fn measure(&mut self, width: Constraint, height: Constraint) -> Size {
        let m = Metrics::from_config(&self.config);
        let intrinsic_w = m.dp(INTRINSIC_WIDTH_DP) + self.padding.left + self.padding.right;
        let intrinsic_h = m.dp(INTRINSIC_HEIGHT_DP) + self.padding.top + self.padding.bottom;
        let size = Size::new(
            resolve_axis(intrinsic_w.max(0) as u32, width),
            resolve_axis(intrinsic_h.max(0) as u32, height),
        );
        self.measured = Some(size);
        size
    }

    pub fn on_attach(&mut self) {
        self.attached = true;
    }

    /// Detach from the display. An in-flight sweep is cancelled and the state
    /// machine settles on its terminal state without a second completion.
    pub fn on_detach(&mut self) {
        self.attached = false;
        if self.sweep.take().is_some() {
            self.progress = FX_ZERO;
            let _ = self.core.finished();
            log::debug!("sweep cancelled on detach");
        }
    }

    /// Host click entry point: toggles, then either defers to the installed
    /// click handler or plays the platform click sound. Returns whether a
    /// handler consumed the click.
    pub fn perform_click(&mut self) -> bool {
        self.toggle();
        if let Some(mut handler) = self.on_click.take() {
            handler(self);
            if self.on_click.is_none() {
                self.on_click = Some(handler);
            }
            true
        } else {
            if let Some(sound) = self.click_sound.as_mut() {
                sound();
            }
            false
        }
    }

    pub fn set_on_checked_change_listener(&mut self, listener: Option<ChangeListener>) {
        self.listener = listener;
    }

    pub fn set_on_click_handler(&mut self, handler: Option<ClickHandler>) {
        self.on_click = handler;
    }

    pub fn set_click_sound_hook(&mut self, hook: Option<SoundHook>) {
        self.click_sound = hook;
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// The host's redraw coalescing reads and clears this between frames.
    pub fn take_redraw_request(&mut self) -> bool {
        core::mem::take(&mut self.needs_redraw)
    }

    fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    pub fn config(&self) -> &VisualConfig {
        &self.config
    }

    pub fn duration(&self) -> u32 {
        self.config.duration_ms
    }

    pub fn set_duration(&mut self, duration_ms: u32) {
        self.config.duration_ms = duration_ms;
    }

    pub fn padding(&self) -> Insets {
        self.padding
    }

    pub fn set_padding(&mut self, padding: Insets) {
        self.padding = padding;
        self.request_redraw();
    }

    pub fn spot_padding(&self) -> i32 {
        self.config.spot_padding
    }

    pub fn set_spot_padding(&mut self, dp: i32) {
        self.config.spot_padding = dp;
        self.request_redraw();
    }

    pub fn switch_on_color(&self) -> Argb {
        self.config.switch_on_color
    }

    pub fn set_switch_on_color(&mut self, color: Argb) {
        self.config.switch_on_color = color;
        self.request_redraw();
    }

    pub fn switch_off_color(&self) -> Argb {
        self.config.switch_off_color
    }

    pub fn set_switch_off_color(&mut self, color: Argb) {
        self.config.switch_off_color = color;
        self.request_redraw();
    }

    pub fn switch_on_stroke_color(&self) -> Argb {
        self.config.switch_on_stroke_color
    }

    pub fn set_switch_on_stroke_color(&mut self, color: Argb) {
        self.config.switch_on_stroke_color = color;
        self.request_redraw();
    }

    pub fn switch_off_stroke_color(&self) -> Argb {
        self.config.switch_off_stroke_color
    }

    pub fn set_switch_off_stroke_color(&mut self, color: Argb) {
        self.config.switch_off_stroke_color = color;
        self.request_redraw();
    }

    pub fn spot_on_color(&self) -> Argb {
        self.config.spot_on_color
    }

    pub fn set_spot_on_color(&mut self, color: Argb) {
        self.config.spot_on_color = color;
        self.request_redraw();
    }

    pub fn spot_off_color(&self) -> Argb {
        self.config.spot_off_color
    }

    pub fn set_spot_off_color(&mut self, color: Argb) {
        self.config.spot_off_color = color;
        self.request_redraw();
    }
}

fn resolve_axis(intrinsic: u32, constraint: Constraint) -> u32 {
    match constraint {
        // AT_MOST keeps the intrinsic size; larger windows don't stretch it.
        Constraint::AtMost(_) => intrinsic,
        Constraint::Exactly(size) => intrinsic.max(size),
        Constraint::Unspecified => intrinsic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn live_switch() -> SwitchButton {
        let mut switch = SwitchButton::default();
        switch.on_attach();
        switch.measure(Constraint::Unspecified, Constraint::Unspecified);
        switch
    }

    fn run_sweep(switch: &mut SwitchButton) {
        let duration = switch.duration() as u64;
        let mut now = 0;
        while switch.is_moving() {
            now += 20;
            switch.tick(now);
            assert!(now <= duration + 40, "sweep never settled");
        }
    }

    #[test]
    fn defaults_are_off_and_intrinsically_sized() {
        let mut switch = SwitchButton::default();
        assert!(!switch.is_checked());
        assert_eq!(switch.state(), SwitchState::Off);
        let size = switch.measure(Constraint::Unspecified, Constraint::Unspecified);
        assert_eq!(size, Size::new(120, 60));
    }

    #[test]
    fn density_scales_the_measured_size() {
        let config = VisualConfig {
            density: Fx::from_num(2),
            ..VisualConfig::default()
        };
        let mut switch = SwitchButton::new(config, false);
        let size = switch.measure(Constraint::Unspecified, Constraint::Unspecified);
        assert_eq!(size, Size::new(240, 120));
    }

    #[test]
    fn exact_constraints_stretch_but_at_most_does_not() {
        let mut switch = SwitchButton::default();
        let size = switch.measure(Constraint::Exactly(400), Constraint::AtMost(400));
        assert_eq!(size, Size::new(400, 60));
        let size = switch.measure(Constraint::Exactly(80), Constraint::Unspecified);
        assert_eq!(size, Size::new(120, 60));
    }

    #[test]
    fn live_set_checked_animates_to_on_with_one_event() {
        let mut switch = live_switch();
        let events = Rc::new(Cell::new(0u32));
        let seen = Rc::new(Cell::new(false));
        let (e, s) = (events.clone(), seen.clone());
        switch.set_on_checked_change_listener(Some(Box::new(move |_, value| {
            e.set(e.get() + 1);
            s.set(value);
        })));

        switch.set_checked(true);
        assert_eq!(switch.state(), SwitchState::AnimatingToOn);
        assert!(switch.is_moving());
        run_sweep(&mut switch);
        assert_eq!(switch.state(), SwitchState::On);
        assert_eq!(events.get(), 1);
        assert!(seen.get());

        // Already on: nothing fires, nothing moves.
        switch.set_checked(true);
        assert_eq!(events.get(), 1);
        assert_eq!(switch.state(), SwitchState::On);
    }

    #[test]
    fn detached_set_checked_snaps_with_one_event() {
        let mut switch = SwitchButton::default();
        let events = Rc::new(Cell::new(0u32));
        let e = events.clone();
        switch.set_on_checked_change_listener(Some(Box::new(move |_, _| e.set(e.get() + 1))));

        switch.set_checked(true);
        assert_eq!(switch.state(), SwitchState::On);
        assert!(!switch.is_moving());
        assert_eq!(switch.progress(), FX_ZERO);
        assert_eq!(events.get(), 1);
    }

    #[test]
    fn set_checked_mid_sweep_is_dropped() {
        let mut switch = live_switch();
        switch.set_checked(true);
        switch.tick(0);
        switch.tick(50);
        assert!(switch.is_moving());

        switch.set_checked(false);
        assert!(switch.is_checked());
        assert_eq!(switch.state(), SwitchState::AnimatingToOn);
    }

    #[test]
    fn reentrant_listener_calls_are_suppressed() {
        let mut switch = live_switch();
        let events = Rc::new(Cell::new(0u32));
        let e = events.clone();
        switch.set_on_checked_change_listener(Some(Box::new(move |s, _| {
            e.set(e.get() + 1);
            // A listener fighting the change must not re-enter.
            s.set_checked(false);
        })));

        switch.set_checked(true);
        assert_eq!(events.get(), 1);
        assert!(switch.is_checked());
        assert_eq!(switch.state(), SwitchState::AnimatingToOn);
    }

    #[test]
    fn toggle_flips_and_perform_click_reports_consumption() {
        let mut switch = SwitchButton::default();
        let sounded = Rc::new(Cell::new(0u32));
        let s = sounded.clone();
        switch.set_click_sound_hook(Some(Box::new(move || s.set(s.get() + 1))));

        assert!(!switch.perform_click());
        assert!(switch.is_checked());
        assert_eq!(sounded.get(), 1);

        switch.set_on_click_handler(Some(Box::new(|_| {})));
        assert!(switch.perform_click());
        assert!(!switch.is_checked());
        // Handler consumed the click, no second sound.
        assert_eq!(sounded.get(), 1);
    }

    #[test]
    fn detach_cancels_the_sweep_once() {
        let mut switch = live_switch();
        switch.set_checked(true);
        switch.tick(0);
        assert!(switch.is_moving());

        switch.on_detach();
        assert!(!switch.is_moving());
        assert_eq!(switch.state(), SwitchState::On);
        assert_eq!(switch.progress(), FX_ZERO);

        // No sweep left, ticking is inert.
        switch.tick(10_000);
        assert_eq!(switch.state(), SwitchState::On);
    }

    #[test]
    fn setters_request_redraw_without_animating() {
        let mut switch = SwitchButton::default();
        assert!(!switch.needs_redraw());
        switch.set_switch_on_color(Argb::new(0xFF123456));
        assert!(switch.needs_redraw());
        assert!(switch.take_redraw_request());
        assert!(!switch.needs_redraw());
        assert!(!switch.is_moving());
    }

    #[test]
    fn ticking_updates_progress_monotonically() {
        let mut switch = live_switch();
        switch.set_checked(true);
        let mut prev = FX_ZERO;
        for now in (0..=300u64).step_by(30) {
            switch.tick(now);
            assert!(switch.progress() >= prev);
            prev = switch.progress();
        }
        assert_eq!(switch.progress(), FX_ONE);
        assert_eq!(switch.state(), SwitchState::On);
    }
}
