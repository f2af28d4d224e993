use thiserror::Error;

pub type ClusterResult<T> = Result<T, ClusterError>;

/// Failures surfaced by the cluster collaborators and the namespace facade.
#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("configuration error: {message}")]
    Configuration { message: String },

    #[error("transport error: {message}")]
    Transport { message: String },

    #[error("received {code}")]
    Status { code: u16 },

    #[error("unable to decode response: {message}")]
    Decode { message: String },

    #[error("unable to retrieve bearer token: {message}")]
    Token { message: String },
}

impl ClusterError {
    pub fn configuration(message: impl Into<String>) -> ClusterError {
        ClusterError::Configuration {
            message: message.into(),
        }
    }

    pub fn transport(message: impl ToString) -> ClusterError {
        ClusterError::Transport {
            message: message.to_string(),
        }
    }
}

impl From<kube_client::Error> for ClusterError {
    fn from(err: kube_client::Error) -> Self {
        match err {
            kube_client::Error::Api(response) => ClusterError::Status {
                code: response.code,
            },
            kube_client::Error::SerdeError(err) => ClusterError::Decode {
                message: err.to_string(),
            },
            other => ClusterError::transport(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ClusterError;
    use kube_client::error::ErrorResponse;

    #[test]
    fn api_error_keeps_status_code() {
        let err: ClusterError = kube_client::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: "Unauthorized".to_string(),
            reason: "Unauthorized".to_string(),
            code: 401,
        })
        .into();

        assert!(matches!(err, ClusterError::Status { code: 401 }));
        assert_eq!(err.to_string(), "received 401");
    }

    #[test]
    fn serde_error_is_a_decode_error() {
        let serde_err = serde_json::from_str::<u8>("not json").unwrap_err();
        let err: ClusterError = kube_client::Error::SerdeError(serde_err).into();

        assert!(matches!(err, ClusterError::Decode { .. }));
    }
}
