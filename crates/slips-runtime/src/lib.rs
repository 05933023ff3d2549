#![forbid(unsafe_code)]

//! Runtime for horizontally scrolled slip stacks.
//!
//! This crate orchestrates the pure model from `slips-core`: a
//! [`SlipMachine`] owns the panel collection and visibility states and
//! answers every external event with plain-data [`Effect`] instructions,
//! a [`ViewportSensor`] throttles raw scroll/resize observations, and a
//! [`SlipSession`] wires the machine to an injected [`PanelLoader`]
//! capability for hosts that want the loading pipeline run inline.
//!
//! Everything is single-threaded and event-driven: no call blocks, and
//! fetch batches apply atomically under a generation counter so a
//! superseded batch can never overwrite a newer view.

pub mod effect;
pub mod loader;
pub mod machine;
pub mod sensor;
pub mod session;

pub use effect::Effect;
pub use loader::{LoadError, PanelLoader};
pub use machine::{FetchBatch, SlipMachine};
pub use sensor::ViewportSensor;
pub use session::{PanelTransform, SessionError, SlipSession};

pub use slips_core::panel::{Panel, PanelCollection};
pub use slips_core::visibility::{ScrollSample, VisibilityState};
pub use slips_core::{SlipConfig, OBSTRUCTED_OFFSET, THROTTLE_TIME};
