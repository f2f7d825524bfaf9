//! Listener settings for the HTTP server.

use crate::{ConfigError, FromEnv};
use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    str::FromStr,
};

/// Port the users API listens on when `PORT` is unset
pub const DEFAULT_PORT: u16 = 3001;

/// Interface bound when `HOST` is unset (all IPv4 interfaces)
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Where the HTTP listener binds.
///
/// `HOST` must be a literal IP address; hostnames are rejected at startup
/// rather than at bind time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::ParseError {
            key: key.to_string(),
            details: format!("'{}': {}", raw, e),
        }),
        Err(_) => Ok(default),
    }
}

impl FromEnv for ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: parse_var("HOST", DEFAULT_HOST)?,
            port: parse_var("PORT", DEFAULT_PORT)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv6Addr;

    #[test]
    fn test_defaults_bind_all_interfaces_on_3001() {
        temp_env::with_vars_unset(["HOST", "PORT"], || {
            let config = ServerConfig::from_env().unwrap();
            assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3001");
        });
    }

    #[test]
    fn test_loopback_host() {
        temp_env::with_vars([("HOST", Some("127.0.0.1")), ("PORT", Some("8080"))], || {
            let config = ServerConfig::from_env().unwrap();
            assert_eq!(config.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
            assert_eq!(config.socket_addr().port(), 8080);
        });
    }

    #[test]
    fn test_ipv6_host() {
        temp_env::with_vars([("HOST", Some("::1")), ("PORT", None)], || {
            let config = ServerConfig::from_env().unwrap();
            assert_eq!(config.host, IpAddr::V6(Ipv6Addr::LOCALHOST));
            assert_eq!(config.socket_addr().to_string(), "[::1]:3001");
        });
    }

    #[test]
    fn test_hostname_rejected() {
        temp_env::with_vars([("HOST", Some("localhost")), ("PORT", None)], || {
            let err = ServerConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("HOST"));
            assert!(err.to_string().contains("localhost"));
        });
    }

    #[test]
    fn test_port_out_of_range_rejected() {
        temp_env::with_vars([("HOST", None), ("PORT", Some("70000"))], || {
            let err = ServerConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("PORT"));
        });
    }
}
