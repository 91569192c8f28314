mod controller;
mod messages;
mod worker;

pub use controller::{
    Begin, FadeController, FadeOutcome, FadeState, FollowUp, Ramp, Step, VOLUME_STEP, step_count,
    step_delay,
};
pub use messages::{FadeCommand, RequestId};
pub use worker::{FadeHandle, FadeTicket, spawn_fade_worker};
