use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
};

/// 限流使用的调用方标识
///
/// 优先使用 `x-user-id`, 否则依次取 `x-real-ip`、`x-forwarded-for` 与连接地址。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity(pub String);

impl ClientIdentity {
    pub fn from_parts(parts: &Parts) -> Self {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|h| h.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        // x-user-id 由上游网关在鉴权后写入, 服务不能直接暴露给客户端
        if let Some(user_id) = header("x-user-id") {
            return Self(format!("user:{}", user_id));
        }

        // 从连接信息获取原始IP
        let remote_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ci| ci.0.ip().to_string());

        let ip = header("x-real-ip")
            .or_else(|| {
                header("x-forwarded-for")
                    .and_then(|s| s.split(',').map(str::trim).find(|ip| !ip.is_empty()))
            })
            .or(remote_ip.as_deref())
            .unwrap_or("unknown")
            .to_string();
        tracing::debug!("client ip: {}", ip);

        Self(format!("ip:{}", ip))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for ClientIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}
