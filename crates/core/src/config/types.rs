use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    5000
}

/// Storage configuration for the upload holding area and the public
/// output area.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Upload size ceiling in bytes; larger requests are rejected
    /// before conversion is attempted.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            uploads_dir: default_uploads_dir(),
            output_dir: default_output_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_max_upload_bytes() -> u64 {
    10 * 1024 * 1024
}

/// External tool configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolsConfig {
    /// Path to the ffmpeg binary (resolved via PATH by default).
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,
    /// Deadline for a single backend invocation in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_timeout() -> u64 {
    300
}
