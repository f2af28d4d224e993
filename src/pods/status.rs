use chrono::{DateTime, Utc};

use crate::extensions::option::OptionExt;
use crate::pods::model::{ContainerState, PodRecord, PrimaryContainer};

pub const WRONG_HASH: &str = "WrongHash";
pub const RUNNING: &str = "Running";
pub const UNKNOWN_STATE: &str = "Unknown state";

/// Status label of a pod's primary container.
///
/// A non-empty `desired_image_tag` that differs from the running tag wins over
/// any container state. An empty one disables the check, so plain status
/// listings (which do not know the tag) still work.
pub fn classify_status(container: &PrimaryContainer, desired_image_tag: &str) -> String {
    if !desired_image_tag.is_empty() && desired_image_tag != extract_image_tag(&container.image) {
        return WRONG_HASH.to_string();
    }

    match &container.state {
        Some(ContainerState::Running { .. }) => RUNNING.to_string(),
        Some(ContainerState::Waiting { reason }) => reason.clone(),
        None => UNKNOWN_STATE.to_string(),
    }
}

pub fn format_summary_line(pod: &PodRecord, now: DateTime<Utc>, desired_image_tag: &str) -> String {
    match &pod.primary_container {
        Some(container) => format!(
            "• `{}` image has been *{}* for {:.1} hours.",
            extract_image_tag(&container.image),
            classify_status(container, desired_image_tag),
            elapsed_hours(pod.creation_timestamp, now),
        ),
        None => format!(
            "• *No containers found for {:?} deployment.* Phase `{}`.",
            pod.name, pod.phase
        ),
    }
}

/// Tag of an image reference shaped `host:port/path:tag`.
///
/// Anything not splitting into exactly three `:` segments yields an empty tag.
pub fn extract_image_tag(raw: &str) -> String {
    let segments: Vec<&str> = raw.split(':').collect();
    Option::when(segments.len() == 3, || segments[2].to_string()).unwrap_or_default()
}

fn elapsed_hours(created: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - created).num_milliseconds() as f64 / 3_600_000.0
}
