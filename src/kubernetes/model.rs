use async_trait::async_trait;
use serde::Deserialize;

use crate::kubernetes::error::ClusterResult;
use crate::pods::model::PodList;

#[derive(Clone, Debug, Default, Hash, Eq, PartialEq, Deserialize)]
pub struct Namespace(pub String);

#[derive(Clone, Debug, Default, Hash, Eq, PartialEq, Deserialize)]
pub struct DeploymentName(pub String);

#[derive(Clone, Debug, Default, Hash, Eq, PartialEq, Deserialize)]
pub struct ContainerName(pub String);

#[derive(Clone, Debug, Default, Hash, Eq, PartialEq, Deserialize)]
pub struct ImageRepository(pub String);

/// The deployment and container whose image is rolled by `deploy`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
pub struct DeploymentTarget {
    pub deployment: DeploymentName,
    pub container: ContainerName,
    pub image_repository: ImageRepository,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeploymentUpdateRequest {
    pub namespace: Namespace,
    pub target: DeploymentTarget,
    pub tag: String,
}

impl DeploymentUpdateRequest {
    /// Full image reference the container is patched to.
    pub fn image(&self) -> String {
        format!("{}:{}", self.target.image_repository.0, self.tag)
    }
}

#[async_trait]
pub trait BearerTokenProvider {
    async fn retrieve_token(&self) -> ClusterResult<String>;
}

#[async_trait]
pub trait PodListRetriever {
    async fn fetch(&self, namespace: &Namespace) -> ClusterResult<PodList>;
}

#[async_trait]
pub trait DeploymentUpdater {
    async fn update_image(&self, request: &DeploymentUpdateRequest) -> ClusterResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_joins_repository_and_tag() {
        let request = DeploymentUpdateRequest {
            namespace: Namespace("myapp-development".to_string()),
            target: DeploymentTarget {
                deployment: DeploymentName("myapp-deployment".to_string()),
                container: ContainerName("myapp-container".to_string()),
                image_repository: ImageRepository(
                    "artifactory.myorg.com:5010/myapp-docker-image".to_string(),
                ),
            },
            tag: "tag123".to_string(),
        };

        assert_eq!(
            request.image(),
            "artifactory.myorg.com:5010/myapp-docker-image:tag123"
        );
    }
}
