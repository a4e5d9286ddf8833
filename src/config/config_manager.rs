use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// 默认请求体上限：2 MiB
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

#[derive(Parser, Debug, Clone)]
#[command(author = "whiteCcinn", version = "1.0", about = "An OpenRTB bid request extension server")]
pub struct CliArgs {
    #[arg(long, env = "BIDEXT_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,
    #[arg(short, long, env = "BIDEXT_PORT", default_value_t = 8080)]
    pub port: u16,
    #[arg(long, env = "BIDEXT_LOG_DIR", default_value = "logs")]
    pub log_dir: String,
    /// cb token 随机源的种子，不指定则使用系统熵
    #[arg(long, env = "BIDEXT_SEED")]
    pub seed: Option<u64>,
    #[arg(long, env = "BIDEXT_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,
    #[arg(long, env = "BIDEXT_LOG_RETENTION_HOURS", default_value_t = 72)]
    pub log_retention_hours: u64,
}

/// 运行时配置
#[derive(Clone, Debug)]
pub struct ConfigManager {
    pub host: IpAddr,
    pub port: u16,
    pub log_dir: String,
    pub seed: Option<u64>,
    pub max_body_bytes: usize,
    pub log_retention_hours: u64,
}

impl ConfigManager {
    pub fn from_args(args: &CliArgs) -> Self {
        ConfigManager {
            host: args.host,
            port: args.port,
            log_dir: args.log_dir.clone(),
            seed: args.seed,
            max_body_bytes: args.max_body_bytes,
            log_retention_hours: args.log_retention_hours,
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        ConfigManager {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            log_dir: "logs".to_string(),
            seed: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            log_retention_hours: 72,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = CliArgs::try_parse_from(["rust-bidext"]).unwrap();
        let config = ConfigManager::from_args(&args);
        assert_eq!(config.listen_addr(), "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.log_dir, "logs");
        assert_eq!(config.seed, None);
        assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
    }

    #[test]
    fn flags_override_defaults() {
        let args = CliArgs::try_parse_from([
            "rust-bidext",
            "--host",
            "127.0.0.1",
            "-p",
            "9090",
            "--seed",
            "7",
            "--log-dir",
            "/tmp/bidext",
        ])
        .unwrap();
        let config = ConfigManager::from_args(&args);
        assert_eq!(config.listen_addr(), "127.0.0.1:9090".parse::<SocketAddr>().unwrap());
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.log_dir, "/tmp/bidext");
    }

    #[test]
    fn invalid_port_is_rejected() {
        assert!(CliArgs::try_parse_from(["rust-bidext", "--port", "70000"]).is_err());
    }
}
