use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use serde::Deserialize;

use crate::kubernetes::error::ClusterResult;
use crate::kubernetes::kubers::{KubeRsConnection, KubeRsDeployer, KubeRsPodRetriever, SharedTokenProvider};
use crate::kubernetes::model::{ContainerName, DeploymentName, DeploymentTarget, ImageRepository, Namespace};
use crate::kubernetes::token::{EnvToken, FileToken, StaticToken};
use crate::namespace::ClusterNamespace;

pub const DESCRIPTION: &str = "DESCRIPTION";
pub const ENDPOINT: &str = "KUBERNETES_ENDPOINT";
pub const NAMESPACE: &str = "KUBERNETES_NAMESPACE";
pub const DEPLOYMENT_NAME: &str = "KUBERNETES_DEPLOYMENT_NAME";
pub const CONTAINER_NAME: &str = "KUBERNETES_DEPLOYMENT_CONTAINERNAME";
pub const IMAGE_PREFIX: &str = "KUBERNETES_DEPLOYMENT_IMAGE_PREFIX";
pub const BEARER_TOKEN: &str = "KUBERNETES_ENDPOINT_BEARER_TOKEN";
pub const BEARER_TOKEN_FILE: &str = "KUBERNETES_ENDPOINT_BEARER_TOKEN_FILE";

#[derive(Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TokenSource {
    Static { value: String },
    Env { var: String },
    File { path: PathBuf },
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub description: String,
    pub endpoint: String,
    pub namespace: Namespace,
    #[serde(flatten)]
    pub target: DeploymentTarget,
    pub token: TokenSource,
}

impl Settings {
    /// Reads the `KUBERNETES_*` keys through `lookup`. Only the endpoint is
    /// required here; the rest is checked by the operations that need it.
    pub fn from_env<F>(lookup: F) -> anyhow::Result<Settings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).unwrap_or_default();

        let endpoint = lookup(ENDPOINT)
            .filter(|endpoint| !endpoint.is_empty())
            .with_context(|| format!("{ENDPOINT} is not set"))?;
        let token = match lookup(BEARER_TOKEN_FILE) {
            Some(path) if !path.is_empty() => TokenSource::File { path: path.into() },
            _ => TokenSource::Env {
                var: BEARER_TOKEN.to_string(),
            },
        };

        Ok(Settings {
            description: value(DESCRIPTION),
            endpoint,
            namespace: Namespace(value(NAMESPACE)),
            target: DeploymentTarget {
                deployment: DeploymentName(value(DEPLOYMENT_NAME)),
                container: ContainerName(value(CONTAINER_NAME)),
                image_repository: ImageRepository(value(IMAGE_PREFIX)),
            },
            token,
        })
    }

    pub fn token_provider(&self) -> SharedTokenProvider {
        match &self.token {
            TokenSource::Static { value } => Arc::new(StaticToken::new(value.clone())),
            TokenSource::Env { var } => Arc::new(EnvToken::new(var.clone())),
            TokenSource::File { path } => Arc::new(FileToken::new(path.clone())),
        }
    }

    /// Wires kube-rs backed collaborators into the namespace facade.
    pub fn into_cluster_namespace(self) -> ClusterResult<ClusterNamespace> {
        let connection = KubeRsConnection::new(&self.endpoint, self.token_provider())?;

        Ok(ClusterNamespace::new(self.description, self.namespace, self.target)
            .with_pod_retriever(Arc::new(KubeRsPodRetriever::new(connection.clone())))
            .with_deployer(Arc::new(KubeRsDeployer::new(connection))))
    }
}

pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> anyhow::Result<Settings> {
    let path = path.as_ref();
    let conf_file = std::fs::File::open(path)
        .with_context(|| format!("unable to open {}", path.display()))?;
    Ok(serde_yaml::from_reader(conf_file)?)
}
