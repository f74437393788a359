mod simulate;

use crate::error::Error;
use k8s_openapi::api::core::v1::{Pod, PodStatus};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use k8s_openapi::chrono::Utc;
use kube::{Resource, ResourceExt};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

pub use simulate::simulate_running;

/// The key of a pod in the registry.
///
/// Built from namespace and name, and not meant to be split up again.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct PodKey(String);

impl PodKey {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self(format!("{namespace}-{name}"))
    }
}

impl Deref for PodKey {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for PodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// In-memory registry of all pods submitted to this node.
///
/// Cloning is cheap, all clones share the same state.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    pods: HashMap<PodKey, Pod>,
}

impl Inner {
    fn insert(&mut self, pod: Pod) {
        self.pods.insert(to_key(&pod), pod);
    }

    fn get(&self, namespace: &str, name: &str) -> Result<&Pod, Error> {
        self.pods
            .get(&PodKey::new(namespace, name))
            .ok_or_else(|| Error::pod_not_found(namespace, name))
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a new pod, pretending all of its containers started right now.
    ///
    /// An existing pod with the same namespace and name gets overwritten.
    pub fn admit(&self, pod: Pod) -> Pod {
        let pod = simulate_running(pod, Time(Utc::now()));
        self.inner.write().insert(pod.clone());
        pod
    }

    /// Store the pod exactly as provided, including whatever status it carries.
    ///
    /// Unlike [`Registry::admit`], no status is simulated.
    pub fn replace(&self, pod: Pod) {
        self.inner.write().insert(pod);
    }

    /// Remove a pod, returning it if it was present.
    pub fn remove(&self, namespace: &str, name: &str) -> Option<Pod> {
        self.inner.write().pods.remove(&PodKey::new(namespace, name))
    }

    pub fn status(&self, namespace: &str, name: &str) -> Result<PodStatus, Error> {
        Ok(self
            .inner
            .read()
            .get(namespace, name)?
            .status
            .clone()
            .unwrap_or_default())
    }

    /// All pods, in no particular order.
    pub fn list(&self) -> Vec<Pod> {
        self.inner.read().pods.values().cloned().collect()
    }

    /// Fake log output of a container, which must be part of the pod's spec.
    pub fn container_log(
        &self,
        namespace: &str,
        pod_name: &str,
        container_name: &str,
    ) -> Result<String, Error> {
        let inner = self.inner.read();
        let pod = inner.get(namespace, pod_name)?;

        pod.spec
            .iter()
            .flat_map(|spec| spec.containers.iter())
            .find(|container| container.name == container_name)
            .map(|_| {
                format!(
                    "Simulated log content for {namespace}, {pod_name}, {container_name}\n\
                     If this provider actually ran the containers then the logs would appear here ;-)\n"
                )
            })
            .ok_or_else(|| Error::container_not_found(namespace, pod_name, container_name))
    }

    pub fn len(&self) -> usize {
        self.inner.read().pods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().pods.is_empty()
    }
}

/// create a key for a pod, missing parts count as empty
pub fn to_key(pod: &Pod) -> PodKey {
    let namespace = pod.namespace().unwrap_or_default();
    let name = pod.meta().name.as_deref().unwrap_or_default();
    PodKey::new(&namespace, name)
}

#[cfg(test)]
mod test {
    use super::*;
    use k8s_openapi::api::core::v1::{Container, PodSpec};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::thread;

    fn pod(namespace: &str, name: &str, containers: &[(&str, &str)]) -> Pod {
        Pod {
            metadata: ObjectMeta {
                namespace: Some(namespace.to_string()),
                name: Some(name.to_string()),
                ..Default::default()
            },
            spec: Some(PodSpec {
                containers: containers
                    .iter()
                    .map(|(name, image)| Container {
                        name: name.to_string(),
                        image: Some(image.to_string()),
                        ..Default::default()
                    })
                    .collect(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn started_at(status: &PodStatus) -> Vec<Option<Time>> {
        status
            .container_statuses
            .iter()
            .flatten()
            .map(|s| {
                s.state
                    .as_ref()
                    .and_then(|s| s.running.as_ref())
                    .and_then(|r| r.started_at.clone())
            })
            .collect()
    }

    #[test]
    fn key_joins_namespace_and_name() {
        assert_eq!(*PodKey::new("default", "nginx"), "default-nginx");
        assert_eq!(to_key(&pod("a", "b", &[])), PodKey::new("a", "b"));
        assert_eq!(to_key(&Pod::default()).to_string(), "-");
    }

    #[test]
    fn admit_then_status() {
        let registry = Registry::new();
        registry.admit(pod("a", "b", &[("c1", "img1")]));

        let status = registry.status("a", "b").unwrap();
        assert_eq!(status.phase.as_deref(), Some("Running"));
        let containers = status.container_statuses.unwrap();
        assert_eq!(containers.len(), 1);
        assert_eq!(containers[0].name, "c1");
        assert!(containers[0].ready);
    }

    #[test]
    fn admit_uses_one_instant() {
        let registry = Registry::new();
        let before = Utc::now();
        let admitted = registry.admit(pod("a", "b", &[("c1", "i1"), ("c2", "i2"), ("c3", "i3")]));
        let after = Utc::now();

        let times = started_at(admitted.status.as_ref().unwrap());
        assert_eq!(times.len(), 3);
        let first = times[0].clone().unwrap();
        assert!(first.0 >= before && first.0 <= after);
        assert!(times.iter().all(|t| t.as_ref() == Some(&first)));
    }

    #[test]
    fn admit_twice_keeps_last() {
        let registry = Registry::new();
        registry.admit(pod("a", "b", &[("c1", "img1")]));
        registry.admit(pod("a", "b", &[("x", "y"), ("z", "w")]));

        assert_eq!(registry.len(), 1);
        let names: Vec<_> = registry
            .status("a", "b")
            .unwrap()
            .container_statuses
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["x", "z"]);
    }

    #[test]
    fn replace_keeps_status_verbatim() {
        let registry = Registry::new();
        registry.admit(pod("a", "b", &[("c1", "img1")]));

        let mut replacement = pod("a", "b", &[("c1", "img2")]);
        replacement.status = Some(PodStatus {
            phase: Some("Failed".into()),
            message: Some("custom".into()),
            ..Default::default()
        });
        registry.replace(replacement.clone());

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.status("a", "b").unwrap(), replacement.status.unwrap());
    }

    #[test]
    fn replace_creates_missing() {
        let registry = Registry::new();
        registry.replace(pod("a", "b", &[]));

        assert_eq!(registry.len(), 1);
        // stored without any status
        assert_eq!(registry.status("a", "b").unwrap(), PodStatus::default());
    }

    #[test]
    fn remove_is_idempotent() {
        let registry = Registry::new();
        registry.admit(pod("a", "b", &[("c1", "img1")]));

        assert!(registry.remove("x", "y").is_none());
        assert_eq!(registry.len(), 1);

        assert!(registry.remove("a", "b").is_some());
        assert!(registry.list().is_empty());
        assert!(registry.remove("a", "b").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn missing_status() {
        let registry = Registry::new();
        assert!(matches!(
            registry.status("missing", "pod"),
            Err(Error::PodNotFound { .. })
        ));
    }

    #[test]
    fn list_all() {
        let registry = Registry::new();
        registry.admit(pod("ns1", "p1", &[]));
        registry.admit(pod("ns2", "p1", &[]));
        registry.replace(pod("ns1", "p2", &[]));

        let mut keys: Vec<_> = registry.list().iter().map(to_key).collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                PodKey::new("ns1", "p1"),
                PodKey::new("ns1", "p2"),
                PodKey::new("ns2", "p1"),
            ]
        );
    }

    #[test]
    fn container_log() {
        let registry = Registry::new();
        registry.admit(pod("a", "b", &[("c0", "img0"), ("c1", "img1")]));

        let log = registry.container_log("a", "b", "c1").unwrap();
        assert!(log.contains("a, b, c1"));
        assert!(log.starts_with("Simulated log content"));

        assert!(matches!(
            registry.container_log("a", "b", "nope"),
            Err(Error::ContainerNotFound { .. })
        ));
        assert!(matches!(
            registry.container_log("a", "missing", "c1"),
            Err(Error::PodNotFound { .. })
        ));
    }

    #[test]
    fn container_log_looks_at_spec_only() {
        let registry = Registry::new();
        let mut replacement = pod("a", "b", &[]);
        replacement.status = Some(PodStatus {
            container_statuses: Some(vec![k8s_openapi::api::core::v1::ContainerStatus {
                name: "ghost".into(),
                ..Default::default()
            }]),
            ..Default::default()
        });
        registry.replace(replacement);

        assert!(matches!(
            registry.container_log("a", "b", "ghost"),
            Err(Error::ContainerNotFound { .. })
        ));
    }

    #[test]
    fn concurrent_admissions() {
        let registry = Registry::new();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = registry.clone();
                thread::spawn(move || {
                    for j in 0..50 {
                        registry.admit(pod("ns", &format!("p{i}-{j}"), &[("c", "img")]));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 400);
    }
}
