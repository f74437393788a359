use crate::error::Error;
use crate::node::Node;
use crate::store::{to_key, Registry};
use actix_cors::Cors;
use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{
    delete, get, post, put, web, App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use k8s_openapi::api::core::v1::Pod;
use kube::{Resource, ResourceExt};
use podsim_api::{LogQuery, PodQuery};
use tracing::{debug, info, warn};

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,
}

#[get("/capacity")]
async fn get_capacity(node: web::Data<Node>) -> impl Responder {
    info!("GetCapacity");
    HttpResponse::Ok().json(node.capacity())
}

#[get("/nodeAddresses")]
async fn get_node_addresses(node: web::Data<Node>) -> impl Responder {
    info!("GetNodeAddresses");
    HttpResponse::Ok().json(node.addresses())
}

#[get("/nodeConditions")]
async fn get_node_conditions(node: web::Data<Node>) -> impl Responder {
    info!("GetNodeConditions");
    HttpResponse::Ok().json(node.conditions())
}

#[get("/getPods")]
async fn get_pods(registry: web::Data<Registry>) -> impl Responder {
    info!("GetPods");
    HttpResponse::Ok().json(registry.list())
}

#[get("/getPodStatus")]
async fn get_pod_status(
    query: web::Query<PodQuery>,
    registry: web::Data<Registry>,
) -> Result<HttpResponse, Error> {
    info!(namespace = %query.namespace, name = %query.name, "GetPodStatus");
    let status = registry
        .status(&query.namespace, &query.name)
        .inspect_err(|err| debug!("{err}"))?;
    Ok(HttpResponse::Ok().json(status))
}

#[post("/createPod")]
async fn create_pod(pod: web::Json<Pod>, registry: web::Data<Registry>) -> impl Responder {
    let pod = pod.into_inner();
    info!(key = %to_key(&pod), "CreatePod");
    registry.admit(pod);
    debug!(pods = registry.len(), "Pod admitted");
    HttpResponse::Ok().finish()
}

#[put("/updatePod")]
async fn update_pod(pod: web::Json<Pod>, registry: web::Data<Registry>) -> impl Responder {
    let pod = pod.into_inner();
    info!(key = %to_key(&pod), "UpdatePod");
    registry.replace(pod);
    HttpResponse::Ok().finish()
}

#[delete("/deletePod")]
async fn delete_pod(pod: web::Json<Pod>, registry: web::Data<Registry>) -> impl Responder {
    let namespace = pod.namespace().unwrap_or_default();
    let name = pod.meta().name.clone().unwrap_or_default();
    info!(%namespace, %name, "DeletePod");
    registry.remove(&namespace, &name);
    HttpResponse::Ok().finish()
}

#[get("/getContainerLogs")]
async fn get_container_logs(
    query: web::Query<LogQuery>,
    registry: web::Data<Registry>,
) -> Result<HttpResponse, Error> {
    info!(
        namespace = %query.namespace,
        pod = %query.pod_name,
        container = %query.container_name,
        "GetContainerLogs"
    );
    let log = registry
        .container_log(&query.namespace, &query.pod_name, &query.container_name)
        .inspect_err(|err| debug!("{err}"))?;
    Ok(HttpResponse::Ok().content_type("text/plain").body(log))
}

/// Reject bodies which don't decode into a pod, before anything touches the registry.
fn json_error(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    warn!(path = req.path(), "Failed to decode pod: {err}");
    let response = HttpResponse::BadRequest().body(err.to_string());
    InternalError::from_response(err, response).into()
}

fn cors() -> Cors {
    Cors::default()
        .send_wildcard()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}

fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .content_type_required(false)
            .error_handler(json_error),
    )
    .service(get_capacity)
    .service(get_node_addresses)
    .service(get_node_conditions)
    .service(get_pods)
    .service(get_pod_status)
    .service(create_pod)
    .service(update_pod)
    .service(delete_pod)
    .service(get_container_logs);
}

pub async fn run(config: ServerConfig, registry: Registry, node: Node) -> anyhow::Result<()> {
    let registry = web::Data::new(registry);
    let node = web::Data::new(node);

    HttpServer::new(move || {
        App::new()
            .app_data(registry.clone())
            .app_data(node.clone())
            .wrap(cors())
            .configure(configure)
    })
    .bind(&config.bind_addr)?
    .run()
    .await?;

    Ok(())
}
