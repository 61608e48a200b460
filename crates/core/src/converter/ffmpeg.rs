//! FFmpeg-based backend for audio and video conversions.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::debug;

use crate::catalog::{ConversionRule, Tool};
use crate::config::ToolsConfig;

use super::error::BackendError;
use super::traits::ConversionBackend;

/// Backend that shells out to an external ffmpeg binary.
///
/// The target format is inferred by ffmpeg from the output file
/// extension, which the artifact store derives from the rule's target
/// format. A transcode either completes fully or is treated as fully
/// failed; there is no partial-success state.
pub struct FfmpegBackend {
    ffmpeg_path: PathBuf,
    timeout_secs: u64,
}

impl FfmpegBackend {
    pub fn new(config: &ToolsConfig) -> Self {
        Self {
            ffmpeg_path: config.ffmpeg_path.clone(),
            timeout_secs: config.timeout_secs,
        }
    }

    fn map_spawn_error(&self, e: std::io::Error) -> BackendError {
        if e.kind() == std::io::ErrorKind::NotFound {
            BackendError::ToolNotFound {
                path: self.ffmpeg_path.clone(),
            }
        } else {
            BackendError::Io(e)
        }
    }
}

#[async_trait]
impl ConversionBackend for FfmpegBackend {
    fn name(&self) -> &'static str {
        "ffmpeg"
    }

    fn tool(&self) -> Tool {
        Tool::Ffmpeg
    }

    async fn probe(&self) -> Result<(), BackendError> {
        let output = Command::new(&self.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.map_spawn_error(e))?;

        if !output.status.success() {
            return Err(BackendError::failed(
                format!("ffmpeg -version exited with {:?}", output.status.code()),
                Some(String::from_utf8_lossy(&output.stderr).into_owned()),
            ));
        }
        Ok(())
    }

    async fn convert(
        &self,
        input: &Path,
        output: &Path,
        rule: &ConversionRule,
    ) -> Result<(), BackendError> {
        debug!(
            from = rule.from,
            to = rule.to,
            input = %input.display(),
            output = %output.display(),
            "starting ffmpeg transcode"
        );

        let mut child = Command::new(&self.ffmpeg_path)
            .arg("-y")
            .arg("-i")
            .arg(input)
            .args(["-loglevel", "error"])
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.map_spawn_error(e))?;

        let deadline = Duration::from_secs(self.timeout_secs);
        let waited = timeout(deadline, child.wait_with_output()).await;

        let output_result = match waited {
            Ok(result) => result.map_err(BackendError::Io)?,
            Err(_) => {
                // Cancelling wait_with_output drops the child, which
                // kills the process via kill_on_drop.
                return Err(BackendError::Timeout {
                    timeout_secs: self.timeout_secs,
                });
            }
        };

        if !output_result.status.success() {
            let stderr = String::from_utf8_lossy(&output_result.stderr).into_owned();
            return Err(BackendError::failed(
                format!("ffmpeg exited with code {:?}", output_result.status.code()),
                if stderr.is_empty() { None } else { Some(stderr) },
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend_with_path(path: &str) -> FfmpegBackend {
        let config = ToolsConfig {
            ffmpeg_path: PathBuf::from(path),
            timeout_secs: 5,
        };
        FfmpegBackend::new(&config)
    }

    #[tokio::test]
    async fn test_probe_missing_binary() {
        let backend = backend_with_path("/nonexistent/ffmpeg-binary");
        let err = backend.probe().await.unwrap_err();
        assert!(matches!(err, BackendError::ToolNotFound { .. }));
        assert!(err.is_tool_unusable());
    }

    #[tokio::test]
    async fn test_convert_missing_binary() {
        let backend = backend_with_path("/nonexistent/ffmpeg-binary");
        let rule = crate::catalog::Catalog::builtin()
            .find_rule("mp4", "avi")
            .copied()
            .unwrap();
        let err = backend
            .convert(Path::new("/tmp/in.mp4"), Path::new("/tmp/out.avi"), &rule)
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::ToolNotFound { .. }));
    }
}
