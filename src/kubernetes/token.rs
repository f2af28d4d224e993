use std::path::PathBuf;

use async_trait::async_trait;

use crate::kubernetes::error::{ClusterError, ClusterResult};
use crate::kubernetes::model::BearerTokenProvider;

/// Token fixed at startup.
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> StaticToken {
        StaticToken(token.into())
    }
}

#[async_trait]
impl BearerTokenProvider for StaticToken {
    async fn retrieve_token(&self) -> ClusterResult<String> {
        Ok(self.0.clone())
    }
}

/// Reads the named environment variable on every request.
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> EnvToken {
        EnvToken { var: var.into() }
    }
}

#[async_trait]
impl BearerTokenProvider for EnvToken {
    async fn retrieve_token(&self) -> ClusterResult<String> {
        std::env::var(&self.var).map_err(|err| ClusterError::Token {
            message: format!("{}: {err}", self.var),
        })
    }
}

/// Re-reads a token file on every request, so rotated service account tokens are picked up.
pub struct FileToken {
    path: PathBuf,
}

impl FileToken {
    pub fn new(path: impl Into<PathBuf>) -> FileToken {
        FileToken { path: path.into() }
    }
}

#[async_trait]
impl BearerTokenProvider for FileToken {
    async fn retrieve_token(&self) -> ClusterResult<String> {
        let token = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| ClusterError::Token {
                message: format!("{}: {err}", self.path.display()),
            })?;
        Ok(token.trim().to_string())
    }
}
