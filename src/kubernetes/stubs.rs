use std::sync::Mutex;

use async_trait::async_trait;

use crate::kubernetes::error::{ClusterError, ClusterResult};
use crate::kubernetes::model::{DeploymentUpdateRequest, DeploymentUpdater, Namespace, PodListRetriever};
use crate::pods::model::PodList;

/// Serves a fixed pod list and records the namespaces it was asked for.
pub struct FixedPodList {
    pod_list: PodList,
    pub requested: Mutex<Vec<Namespace>>,
}

impl FixedPodList {
    pub fn new(pod_list: PodList) -> FixedPodList {
        FixedPodList {
            pod_list,
            requested: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PodListRetriever for FixedPodList {
    async fn fetch(&self, namespace: &Namespace) -> ClusterResult<PodList> {
        self.requested.lock().unwrap().push(namespace.clone());
        Ok(self.pod_list.clone())
    }
}

/// Accepts every patch and records it.
#[derive(Default)]
pub struct RecordingDeployer {
    pub requests: Mutex<Vec<DeploymentUpdateRequest>>,
}

#[async_trait]
impl DeploymentUpdater for RecordingDeployer {
    async fn update_image(&self, request: &DeploymentUpdateRequest) -> ClusterResult<()> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(())
    }
}

/// Rejects every call with the given status code.
pub struct AlwaysFail(pub u16);

#[async_trait]
impl PodListRetriever for AlwaysFail {
    async fn fetch(&self, _namespace: &Namespace) -> ClusterResult<PodList> {
        Err(ClusterError::Status { code: self.0 })
    }
}

#[async_trait]
impl DeploymentUpdater for AlwaysFail {
    async fn update_image(&self, _request: &DeploymentUpdateRequest) -> ClusterResult<()> {
        Err(ClusterError::Status { code: self.0 })
    }
}
