use std::env;

pub const DEFAULT_USER_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_RESOURCE_ADDR: &str = "0.0.0.0:6060";

/// Listen addresses of the two routers.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub user_addr: String,
    pub resource_addr: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            user_addr: env::var("USER_HTTP_ADDR").unwrap_or_else(|_| DEFAULT_USER_ADDR.to_string()),
            resource_addr: env::var("RESOURCE_HTTP_ADDR")
                .unwrap_or_else(|_| DEFAULT_RESOURCE_ADDR.to_string()),
        }
    }
}
