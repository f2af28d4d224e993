use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use http::header::AUTHORIZATION;
use http::HeaderValue;
use kube_client::api::{ListParams, Patch, PatchParams};
use kube_client::core::Request;
use kube_client::{Client, Config};
use serde::{Deserialize, Serialize};

use crate::kubernetes::error::{ClusterError, ClusterResult};
use crate::kubernetes::model::{
    BearerTokenProvider, DeploymentUpdateRequest, DeploymentUpdater, Namespace, PodListRetriever,
};
use crate::pods::model::PodList;

pub const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

pub type SharedTokenProvider = Arc<dyn BearerTokenProvider + Send + Sync + 'static>;

/// kube-rs client bound to one API server, authenticating every request with
/// the token provider's current token.
#[derive(Clone)]
pub struct KubeRsConnection {
    client: Client,
    token_provider: SharedTokenProvider,
}

impl KubeRsConnection {
    /// Connects to `https://{endpoint}`. Server certificates are not verified.
    pub fn new(endpoint: &str, token_provider: SharedTokenProvider) -> ClusterResult<KubeRsConnection> {
        let cluster_url = format!("https://{endpoint}")
            .parse::<http::Uri>()
            .map_err(|err| ClusterError::configuration(format!("invalid endpoint {endpoint:?}: {err}")))?;

        let mut config = Config::new(cluster_url);
        config.accept_invalid_certs = true;
        config.connect_timeout = Some(CLIENT_TIMEOUT);
        config.read_timeout = Some(CLIENT_TIMEOUT);
        let client = Client::try_from(config)?;

        Ok(KubeRsConnection {
            client,
            token_provider,
        })
    }

    async fn send<T>(&self, mut request: http::Request<Vec<u8>>) -> ClusterResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let token = self.token_provider.retrieve_token().await?;
        let header = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|err| {
            ClusterError::Token {
                message: err.to_string(),
            }
        })?;
        request.headers_mut().insert(AUTHORIZATION, header);

        tracing::debug!(method = %request.method(), uri = %request.uri(), "sending request");
        Ok(self.client.request::<T>(request).await?)
    }
}

pub struct KubeRsPodRetriever {
    connection: KubeRsConnection,
}

impl KubeRsPodRetriever {
    pub fn new(connection: KubeRsConnection) -> KubeRsPodRetriever {
        KubeRsPodRetriever { connection }
    }
}

#[async_trait]
impl PodListRetriever for KubeRsPodRetriever {
    async fn fetch(&self, namespace: &Namespace) -> ClusterResult<PodList> {
        let request = Request::new(pods_path(namespace))
            .list(&ListParams::default())
            .map_err(ClusterError::transport)?;

        let pod_list: PodList = self.connection.send(request).await?;
        tracing::debug!(namespace = %namespace.0, pods = pod_list.items.len(), "retrieved pods");
        Ok(pod_list)
    }
}

pub struct KubeRsDeployer {
    connection: KubeRsConnection,
}

impl KubeRsDeployer {
    pub fn new(connection: KubeRsConnection) -> KubeRsDeployer {
        KubeRsDeployer { connection }
    }
}

#[async_trait]
impl DeploymentUpdater for KubeRsDeployer {
    async fn update_image(&self, request: &DeploymentUpdateRequest) -> ClusterResult<()> {
        let patch = Patch::Strategic(ImagePatch::for_request(request));
        let http_request = Request::new(deployments_path(&request.namespace))
            .patch(
                &request.target.deployment.0,
                &PatchParams::default(),
                &patch,
            )
            .map_err(ClusterError::transport)?;

        let response: DeploymentPatchResponse = self.connection.send(http_request).await?;
        // Only tells that the patch was accepted, not that the rollout finished.
        tracing::debug!(
            deployment = %request.target.deployment.0,
            available_replicas = response.status.available_replicas,
            "patch accepted"
        );
        Ok(())
    }
}

fn pods_path(namespace: &Namespace) -> String {
    format!("/api/v1/namespaces/{}/pods", namespace.0)
}

fn deployments_path(namespace: &Namespace) -> String {
    format!("/apis/apps/v1/namespaces/{}/deployments", namespace.0)
}

// {"spec":{"template":{"spec":{"containers":[{"name":..,"image":..}]}}}}

#[derive(Debug, Serialize, PartialEq)]
pub struct ImagePatch {
    spec: DeploymentSpecPatch,
}

#[derive(Debug, Serialize, PartialEq)]
struct DeploymentSpecPatch {
    template: PodTemplatePatch,
}

#[derive(Debug, Serialize, PartialEq)]
struct PodTemplatePatch {
    spec: PodSpecPatch,
}

#[derive(Debug, Serialize, PartialEq)]
struct PodSpecPatch {
    containers: Vec<ContainerPatch>,
}

#[derive(Debug, Serialize, PartialEq)]
struct ContainerPatch {
    name: String,
    image: String,
}

impl ImagePatch {
    pub fn for_request(request: &DeploymentUpdateRequest) -> ImagePatch {
        ImagePatch {
            spec: DeploymentSpecPatch {
                template: PodTemplatePatch {
                    spec: PodSpecPatch {
                        containers: vec![ContainerPatch {
                            name: request.target.container.0.clone(),
                            image: request.image(),
                        }],
                    },
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct DeploymentPatchResponse {
    status: DeploymentPatchStatus,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentPatchStatus {
    #[serde(default)]
    available_replicas: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kubernetes::model::{ContainerName, DeploymentName, DeploymentTarget, ImageRepository};
    use serde_json::json;

    fn update_request(tag: &str) -> DeploymentUpdateRequest {
        DeploymentUpdateRequest {
            namespace: Namespace("myapp-development".to_string()),
            target: DeploymentTarget {
                deployment: DeploymentName("myapp-deployment".to_string()),
                container: ContainerName("myapp-container".to_string()),
                image_repository: ImageRepository(
                    "artifactory.myorg.com:5010/myapp-docker-image".to_string(),
                ),
            },
            tag: tag.to_string(),
        }
    }

    #[test]
    fn image_patch_touches_only_the_container_image() {
        let patch = serde_json::to_value(ImagePatch::for_request(&update_request("tag123"))).unwrap();

        assert_eq!(
            patch,
            json!({"spec": {"template": {"spec": {"containers": [{
                "name": "myapp-container",
                "image": "artifactory.myorg.com:5010/myapp-docker-image:tag123"
            }]}}}})
        );
    }

    #[test]
    fn empty_tag_is_passed_through() {
        let patch = serde_json::to_value(ImagePatch::for_request(&update_request(""))).unwrap();

        assert_eq!(
            patch["spec"]["template"]["spec"]["containers"][0]["image"],
            "artifactory.myorg.com:5010/myapp-docker-image:"
        );
    }

    #[test]
    fn patch_request_targets_deployment_with_strategic_merge() {
        let request = update_request("tag123");
        let http_request = Request::new(deployments_path(&request.namespace))
            .patch(
                &request.target.deployment.0,
                &PatchParams::default(),
                &Patch::Strategic(ImagePatch::for_request(&request)),
            )
            .unwrap();

        assert_eq!(http_request.method(), &http::Method::PATCH);
        assert!(http_request
            .uri()
            .to_string()
            .starts_with("/apis/apps/v1/namespaces/myapp-development/deployments/myapp-deployment"));
        assert_eq!(
            http_request.headers()[http::header::CONTENT_TYPE],
            "application/strategic-merge-patch+json"
        );
    }

    #[test]
    fn list_request_targets_namespace_pods() {
        let http_request = Request::new(pods_path(&Namespace("myapp-development".to_string())))
            .list(&ListParams::default())
            .unwrap();

        assert_eq!(http_request.method(), &http::Method::GET);
        assert!(http_request
            .uri()
            .to_string()
            .starts_with("/api/v1/namespaces/myapp-development/pods"));
    }

    #[test]
    fn patch_response_decodes_replica_count() {
        let response: DeploymentPatchResponse =
            serde_json::from_str(r#"{"kind":"Deployment","status":{"availableReplicas":3,"replicas":4}}"#)
                .unwrap();
        assert_eq!(response.status.available_replicas, 3);

        let response: DeploymentPatchResponse = serde_json::from_str(r#"{"status":{}}"#).unwrap();
        assert_eq!(response.status.available_replicas, 0);
    }

    #[test]
    fn patch_response_without_status_is_rejected() {
        assert!(serde_json::from_str::<DeploymentPatchResponse>(r#"{"kind":"Status"}"#).is_err());
    }
}
