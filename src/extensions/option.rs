use crate::kubernetes::error::{ClusterError, ClusterResult};

pub trait OptionExt<T> {
    fn when<F>(cond: bool, fa: F) -> Option<T>
    where
        F: FnOnce() -> T;

    /// Turns a missing collaborator or setting into a configuration error naming `what`.
    fn or_misconfigured(self, what: &str) -> ClusterResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn when<F>(cond: bool, fa: F) -> Option<T>
    where
        F: FnOnce() -> T,
    {
        if cond {
            Some(fa())
        } else {
            None
        }
    }

    fn or_misconfigured(self, what: &str) -> ClusterResult<T> {
        match self {
            Some(v) => Ok(v),
            None => Err(ClusterError::configuration(format!("missing {what}"))),
        }
    }
}
