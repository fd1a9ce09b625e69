use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct StageTriggerParams {
    /// Re-run the stage even when its output already exists.
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
pub struct TriggerResult {
    /// `false` means an equivalent stage job was already queued or running.
    pub enqueued: bool,
}
