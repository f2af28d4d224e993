use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Pods of a namespace, in the order the cluster returned them.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "RawPodList")]
pub struct PodList {
    pub items: Vec<PodRecord>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PodRecord {
    pub name: String,
    pub creation_timestamp: DateTime<Utc>,
    pub phase: String,
    /// First container status; `None` for pods reported without any (e.g. evicted).
    pub primary_container: Option<PrimaryContainer>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PrimaryContainer {
    pub image: String,
    pub state: Option<ContainerState>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ContainerState {
    Running { started_at: Option<DateTime<Utc>> },
    Waiting { reason: String },
}

/// Summary of a single pod as shown by `overview`.
#[derive(Clone, Debug, PartialEq)]
pub struct PodItem {
    pub name: String,
    pub status: String,
    pub created: DateTime<Utc>,
    pub tag: String,
}

impl PodRecord {
    pub fn container_image(&self) -> Option<&str> {
        self.primary_container.as_ref().map(|c| c.image.as_str())
    }
}

// Wire shape of the pod collection endpoint. Unknown fields are ignored.

#[derive(Deserialize)]
struct RawPodList {
    #[serde(default)]
    items: Vec<RawPod>,
}

#[derive(Deserialize)]
struct RawPod {
    metadata: RawPodMetadata,
    #[serde(default)]
    status: RawPodStatus,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPodMetadata {
    name: String,
    creation_timestamp: DateTime<Utc>,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPodStatus {
    #[serde(default)]
    phase: String,
    #[serde(default)]
    container_statuses: Vec<RawContainerStatus>,
}

#[derive(Deserialize)]
struct RawContainerStatus {
    #[serde(default)]
    image: String,
    #[serde(default)]
    state: RawContainerState,
}

#[derive(Default, Deserialize)]
struct RawContainerState {
    running: Option<RawRunning>,
    waiting: Option<RawWaiting>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRunning {
    started_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct RawWaiting {
    #[serde(default)]
    reason: String,
}

impl From<RawPodList> for PodList {
    fn from(raw: RawPodList) -> Self {
        PodList {
            items: raw.items.into_iter().map(PodRecord::from).collect(),
        }
    }
}

impl From<RawPod> for PodRecord {
    fn from(raw: RawPod) -> Self {
        let primary_container = raw
            .status
            .container_statuses
            .into_iter()
            .next()
            .map(PrimaryContainer::from);

        PodRecord {
            name: raw.metadata.name,
            creation_timestamp: raw.metadata.creation_timestamp,
            phase: raw.status.phase,
            primary_container,
        }
    }
}

impl From<RawContainerStatus> for PrimaryContainer {
    fn from(raw: RawContainerStatus) -> Self {
        // waiting wins when the cluster reports both
        let state = match (raw.state.running, raw.state.waiting) {
            (_, Some(waiting)) => Some(ContainerState::Waiting {
                reason: waiting.reason,
            }),
            (Some(running), None) => Some(ContainerState::Running {
                started_at: running.started_at,
            }),
            (None, None) => None,
        };

        PrimaryContainer {
            image: raw.image,
            state,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::PodList;

    pub const POD_LIST: &str = include_str!("fixtures/pod_list.json");
    pub const POD_LIST_WITHOUT_CONTAINER_STATUSES: &str =
        include_str!("fixtures/pod_list_without_container_statuses.json");

    pub fn pod_list() -> PodList {
        serde_json::from_str(POD_LIST).unwrap()
    }

    pub fn pod_list_without_container_statuses() -> PodList {
        serde_json::from_str(POD_LIST_WITHOUT_CONTAINER_STATUSES).unwrap()
    }
}
