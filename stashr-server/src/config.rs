//! Command-line and environment configuration.

use clap::Parser;
use stashr_core::StoreConfig;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::error::ServerError;

/// In-memory key/value store with per-key TTL, served over HTTP and gRPC.
///
/// Every flag can also be set through the environment variable listed in
/// `--help`. A flag given more than once takes its last value.
#[derive(Debug, Clone, Parser)]
#[command(name = "stashr", version, about, args_override_self = true)]
pub struct Config {
    /// Address to bind both listeners to
    #[arg(long, env = "STASHR_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// HTTP port to listen on
    #[arg(long = "hport", env = "STASHR_HTTP_PORT", default_value_t = 8080)]
    pub http_port: u16,

    /// gRPC port to listen on
    #[arg(long = "gport", env = "STASHR_GRPC_PORT", default_value_t = 9090)]
    pub grpc_port: u16,

    /// Disable the HTTP server
    #[arg(long, alias = "disableHTTP", env = "STASHR_DISABLE_HTTP")]
    pub disable_http: bool,

    /// Disable the gRPC server
    #[arg(long, alias = "disableGRPC", env = "STASHR_DISABLE_GRPC")]
    pub disable_grpc: bool,

    /// Milliseconds between sweeps of expired keys
    #[arg(long = "sweep-interval-ms", env = "STASHR_SWEEP_INTERVAL_MS", default_value_t = 1000)]
    pub sweep_interval_ms: u64,
}

impl Config {
    /// Rejects configurations that would serve nothing
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.disable_http && self.disable_grpc {
            return Err(ServerError::NothingToServe);
        }
        Ok(())
    }

    /// Address for the HTTP listener, or `None` when HTTP is disabled
    pub fn http_addr(&self) -> Option<SocketAddr> {
        (!self.disable_http).then(|| SocketAddr::new(self.host, self.http_port))
    }

    /// Address for the gRPC listener, or `None` when gRPC is disabled
    pub fn grpc_addr(&self) -> Option<SocketAddr> {
        (!self.disable_grpc).then(|| SocketAddr::new(self.host, self.grpc_port))
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::default().with_sweep_interval(Duration::from_millis(self.sweep_interval_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let argv = std::iter::once("stashr").chain(args.iter().copied());
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);

        assert_eq!(config.http_addr(), Some("0.0.0.0:8080".parse().unwrap()));
        assert_eq!(config.grpc_addr(), Some("0.0.0.0:9090".parse().unwrap()));
        assert_eq!(config.store_config().sweep_interval, Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_ports_and_host() {
        let config = parse(&["--host", "127.0.0.1", "--hport", "8081", "--gport", "9091"]);

        assert_eq!(config.http_addr(), Some("127.0.0.1:8081".parse().unwrap()));
        assert_eq!(config.grpc_addr(), Some("127.0.0.1:9091".parse().unwrap()));
    }

    #[test]
    fn test_disable_one_server() {
        let config = parse(&["--disable-http"]);

        assert_eq!(config.http_addr(), None);
        assert!(config.grpc_addr().is_some());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_disable_both_servers_is_rejected() {
        let config = parse(&["--disable-http", "--disable-grpc"]);

        assert!(matches!(config.validate(), Err(ServerError::NothingToServe)));
    }

    #[test]
    fn test_camel_case_disable_aliases() {
        let config = parse(&["--disableHTTP"]);
        assert_eq!(config.http_addr(), None);
        assert!(config.grpc_addr().is_some());

        let config = parse(&["--disableGRPC"]);
        assert!(config.http_addr().is_some());
        assert_eq!(config.grpc_addr(), None);
    }

    #[test]
    fn test_repeated_flag_takes_last_value() {
        let config = parse(&["--hport", "1", "--hport", "2", "--disable-grpc", "--disable-grpc"]);

        assert_eq!(config.http_port, 2);
        assert_eq!(config.grpc_addr(), None);
    }

    #[test]
    fn test_sweep_interval() {
        let config = parse(&["--sweep-interval-ms", "250"]);
        assert_eq!(config.store_config().sweep_interval, Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = Config::try_parse_from(["stashr", "--hport", "70000"]);
        assert!(result.is_err());
    }
}
