use std::env;

const DEFAULT_BIND_ADDR: &str = "[::]:3000";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub bind_addr: String,
    /// The address the node reports as its internal IP, if any.
    pub pod_ip: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        // an empty value counts as "not set"
        let pod_ip = lookup("VKUBELET_POD_IP").filter(|ip| !ip.is_empty());

        Self { bind_addr, pod_ip }
    }
}
