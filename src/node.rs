use k8s_openapi::api::core::v1::{NodeAddress, NodeCondition};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use k8s_openapi::chrono::Utc;
use std::collections::BTreeMap;

/// Facts the fake node reports about itself.
///
/// Nothing here is measured, everything is either constant or taken from the configuration.
#[derive(Clone, Debug, Default)]
pub struct Node {
    pod_ip: Option<String>,
}

impl Node {
    pub fn new(pod_ip: Option<String>) -> Self {
        Self { pod_ip }
    }

    pub fn capacity(&self) -> BTreeMap<String, Quantity> {
        [("cpu", "50"), ("memory", "100Gi"), ("pods", "20")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), Quantity(v.to_string())))
            .collect()
    }

    pub fn addresses(&self) -> Vec<NodeAddress> {
        self.pod_ip
            .iter()
            .map(|ip| NodeAddress {
                address: ip.clone(),
                type_: "InternalIP".to_string(),
            })
            .collect()
    }

    /// A single "Ready" condition, stamped with the time of the call.
    pub fn conditions(&self) -> Vec<NodeCondition> {
        let now = Time(Utc::now());
        vec![NodeCondition {
            type_: "Ready".to_string(),
            status: "True".to_string(),
            last_heartbeat_time: Some(now.clone()),
            last_transition_time: Some(now),
            reason: Some("KubeletReady".to_string()),
            message: Some("At your service".to_string()),
        }]
    }
}
