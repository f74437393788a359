use k8s_openapi::api::core::v1::{
    ContainerState, ContainerStateRunning, ContainerStatus, Pod, PodCondition,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;

const CONDITIONS: [&str; 3] = ["PodScheduled", "Initialized", "Ready"];

/// Turn a freshly submitted pod into one that looks like it is up and running.
///
/// Every container of the spec gets a ready status, all started at `now`. Status fields other
/// than phase, conditions and container statuses are kept as submitted.
pub fn simulate_running(mut pod: Pod, now: Time) -> Pod {
    let container_statuses = pod
        .spec
        .iter()
        .flat_map(|spec| spec.containers.iter())
        .map(|container| ContainerStatus {
            name: container.name.clone(),
            image: container.image.clone().unwrap_or_default(),
            ready: true,
            restart_count: 0,
            state: Some(ContainerState {
                running: Some(ContainerStateRunning {
                    started_at: Some(now.clone()),
                }),
                ..Default::default()
            }),
            ..Default::default()
        })
        .collect();

    let status = pod.status.get_or_insert_with(Default::default);
    status.phase = Some("Running".to_string());
    status.conditions = Some(
        CONDITIONS
            .into_iter()
            .map(|type_| PodCondition {
                type_: type_.to_string(),
                status: "True".to_string(),
                ..Default::default()
            })
            .collect(),
    );
    status.container_statuses = Some(container_statuses);

    pod
}
