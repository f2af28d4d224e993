use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::extensions::option::OptionExt;
use crate::kubernetes::error::{ClusterError, ClusterResult};
use crate::kubernetes::model::{
    DeploymentTarget, DeploymentUpdateRequest, DeploymentUpdater, Namespace, PodListRetriever,
};
use crate::pods::model::PodList;
use crate::pods::status::format_summary_line;

pub type NamespacePodRetriever = Arc<dyn PodListRetriever + Send + Sync + 'static>;
pub type NamespaceDeployer = Arc<dyn DeploymentUpdater + Send + Sync + 'static>;

/// One deployment in one namespace of a cluster.
///
/// Holds no state between calls; each `list` or `deploy` is a single request
/// through the configured collaborator. Either collaborator may be left unset,
/// in which case the matching operation fails with a configuration error
/// before anything is sent.
pub struct ClusterNamespace {
    description: String,
    namespace: Namespace,
    target: DeploymentTarget,
    pod_retriever: Option<NamespacePodRetriever>,
    deployer: Option<NamespaceDeployer>,
}

impl ClusterNamespace {
    pub fn new(description: String, namespace: Namespace, target: DeploymentTarget) -> ClusterNamespace {
        ClusterNamespace {
            description,
            namespace,
            target,
            pod_retriever: None,
            deployer: None,
        }
    }

    pub fn with_pod_retriever(mut self, pod_retriever: NamespacePodRetriever) -> ClusterNamespace {
        self.pod_retriever = Some(pod_retriever);
        self
    }

    pub fn with_deployer(mut self, deployer: NamespaceDeployer) -> ClusterNamespace {
        self.deployer = Some(deployer);
        self
    }

    pub async fn list(&self) -> ClusterResult<PodList> {
        let retriever = self.pod_retriever.as_ref().or_misconfigured("pod retriever")?;
        self.require_namespace()?;

        retriever.fetch(&self.namespace).await
    }

    /// Pods whose name starts with the deployment name.
    pub async fn deployment_pods(&self) -> ClusterResult<PodList> {
        let pod_list = self.list().await?;
        Ok(pod_list.filter_by_name_prefix(&self.target.deployment.0))
    }

    /// Patches the deployment's container to `image_repository:tag`.
    ///
    /// Success means the API server accepted the patch; the rollout itself is
    /// only observable by listing pods afterwards.
    pub async fn deploy(&self, tag: &str) -> ClusterResult<()> {
        let deployer = self.deployer.as_ref().or_misconfigured("deployer")?;
        self.require_namespace()?;
        if self.target.deployment.0.is_empty() {
            return Err(ClusterError::configuration("missing deployment name"));
        }
        if self.target.container.0.is_empty() {
            return Err(ClusterError::configuration("missing container name"));
        }
        if self.target.image_repository.0.is_empty() {
            return Err(ClusterError::configuration("missing image repository"));
        }

        let request = DeploymentUpdateRequest {
            namespace: self.namespace.clone(),
            target: self.target.clone(),
            tag: tag.to_string(),
        };
        deployer.update_image(&request).await?;

        tracing::info!(namespace = %self.namespace.0, deployment = %self.target.deployment.0, "deployed {}", request.image());
        Ok(())
    }

    pub fn summary(&self, pod_list: &PodList, now: DateTime<Utc>, desired_image_tag: &str) -> String {
        let mut lines = Vec::with_capacity(pod_list.items.len() + 1);
        if !self.description.is_empty() {
            lines.push(format!("*{}*", self.description));
        }
        if pod_list.is_empty() {
            lines.push(format!(
                "• *No pods found for {:?} deployment.*",
                self.target.deployment.0
            ));
        }
        lines.extend(
            pod_list
                .items
                .iter()
                .map(|pod| format_summary_line(pod, now, desired_image_tag)),
        );
        lines.join("\n")
    }

    fn require_namespace(&self) -> ClusterResult<()> {
        if self.namespace.0.is_empty() {
            return Err(ClusterError::configuration("missing namespace"));
        }
        Ok(())
    }
}
