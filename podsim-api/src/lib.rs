//! Request types of the fake node endpoint, shared with clients.

/// Identifies a pod by namespace and name.
///
/// Missing parameters decode as empty strings.
#[derive(
    Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd, serde::Serialize, serde::Deserialize,
)]
#[serde(default, rename_all = "camelCase")]
pub struct PodQuery {
    pub namespace: String,
    pub name: String,
}

/// Identifies a single container of a pod, for log retrieval.
#[derive(
    Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd, serde::Serialize, serde::Deserialize,
)]
#[serde(default, rename_all = "camelCase")]
pub struct LogQuery {
    pub namespace: String,
    pub pod_name: String,
    pub container_name: String,
}
