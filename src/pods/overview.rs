use crate::pods::model::{PodItem, PodList};
use crate::pods::status::extract_image_tag;

impl PodList {
    /// One item per pod, reporting the pod phase and its primary image tag.
    pub fn overview(&self) -> Vec<PodItem> {
        self.items
            .iter()
            .map(|pod| PodItem {
                name: pod.name.clone(),
                status: pod.phase.clone(),
                created: pod.creation_timestamp,
                tag: pod
                    .container_image()
                    .map(extract_image_tag)
                    .unwrap_or_default(),
            })
            .collect()
    }

    pub fn filter_by_name_prefix(&self, prefix: &str) -> PodList {
        PodList {
            items: self
                .items
                .iter()
                .filter(|pod| pod.name.starts_with(prefix))
                .cloned()
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
