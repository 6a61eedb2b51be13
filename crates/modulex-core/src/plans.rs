//! The fixed instruction plans launched by each kind of submission.

use crate::dispatch::DispatchPlan;
use crate::notifier::{CallbackPayload, Signal};
use std::time::Duration;

/// Status reported to the callback endpoint once annotations are accepted.
pub const READY_FOR_VIDEO: &str = "ready_for_video";

/// Sent synchronously for every client acknowledgment.
pub const ACK_INSTRUCTION: &str = "Acknowledgment received - continuing navigation";

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

/// One-step plan carrying the `ready_for_video` callback, 2s after submission.
///
/// Launched as its own run so a slow or failing callback endpoint never
/// delays the turn-by-turn instructions.
pub fn annotation_callback(annotations_received: usize) -> DispatchPlan {
    DispatchPlan::new("annotation_callback").then(
        secs(2),
        Signal::Callback(CallbackPayload {
            status: READY_FOR_VIDEO.to_string(),
            annotations_received,
        }),
    )
}

/// Processing notice and three turn-by-turn directions at 3s, 6s, 11s and
/// 16s from submission.
pub fn annotation_plan() -> DispatchPlan {
    DispatchPlan::new("annotations")
        .then(secs(3), Signal::instruction("Processing your annotations..."))
        .then(secs(3), Signal::instruction("Turn left at the intersection"))
        .then(secs(5), Signal::instruction("Continue straight for 200 meters"))
        .then(
            secs(5),
            Signal::instruction("Your destination is ahead on the right"),
        )
}

pub fn image_plan() -> DispatchPlan {
    DispatchPlan::new("image")
        .then(secs(2), Signal::instruction("Image received - analyzing scene..."))
        .then(secs(3), Signal::instruction("Detected object in view"))
        .then(
            secs(4),
            Signal::instruction("Analysis complete - proceeding with navigation"),
        )
}
