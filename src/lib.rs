//! Day/night toggle switch for `embedded-graphics` targets.
//!
//! A two-state checkable control drawn as a rounded track with a sliding
//! sun/moon spot: the on side shows a cloud, the off side a star field with
//! orbiting dots. Transitions run as an eased 0..1 sweep driving every shape
//! and color through pure per-frame geometry.
//!
//! The host framework owns layout, input dispatch, resources and the frame
//! clock; it attaches and measures a [`SwitchButton`], feeds `tick` with
//! milliseconds, and calls `draw` against any `DrawTarget<Color = Rgb888>`.

pub mod anim;
pub mod color;
pub mod config;
pub mod geometry;
mod render;
pub mod sprite;
mod state;
pub mod widget;

pub use color::Argb;
pub use config::VisualConfig;
pub use geometry::Fx;
pub use sprite::{CloudArt, SpriteError};
pub use state::SwitchState;
pub use widget::{ChangeListener, Constraint, Insets, SwitchButton};
