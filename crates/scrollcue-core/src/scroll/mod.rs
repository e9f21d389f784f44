//! Teleprompter scrolling
//!
//! Layered from pure pieces up to the stateful controller:
//!
//! - L4 Atomic: `timing`, `calc`, `state`
//! - L3 Molecular: `animation`
//! - L2 Organism: `controller`

pub mod animation;
pub mod calc;
pub mod controller;
pub mod state;
pub mod timing;

pub use animation::ScrollAnimation;
pub use calc::{calculate, clamp_speed, CalcInput, CalculationResult, SAFETY_MARGIN, START_POSITION};
pub use controller::{ControllerStep, ScrollController, ScrollInputs, ScrollTimer};
pub use state::{reduce, AnimationHandle, ScrollAction, ScrollState, ScrollStateStore};
