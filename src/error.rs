use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Pod not found: {namespace} - {name}")]
    PodNotFound { namespace: String, name: String },
    #[error("Container not found: {namespace} - {pod} - {container}")]
    ContainerNotFound {
        namespace: String,
        pod: String,
        container: String,
    },
}

impl Error {
    pub(crate) fn pod_not_found(namespace: &str, name: &str) -> Self {
        Self::PodNotFound {
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    pub(crate) fn container_not_found(namespace: &str, pod: &str, container: &str) -> Self {
        Self::ContainerNotFound {
            namespace: namespace.to_string(),
            pod: pod.to_string(),
            container: container.to_string(),
        }
    }
}

/// Both flavors of "not found" look the same to a client: a bare 404.
impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::PodNotFound { .. } | Self::ContainerNotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::new(self.status_code())
    }
}
