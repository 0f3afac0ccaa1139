//! Static game data tables

pub mod actions;
pub mod jobs;

pub use actions::{ActionInfo, TRACKED_ACTIONS, cast_category, get_action_info};
pub use jobs::{JOB_CAPABILITIES, JobCapability, get_job_capability, is_capable};
