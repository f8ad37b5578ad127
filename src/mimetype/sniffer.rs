use std::path::{Path, PathBuf};
use std::process::Stdio;
use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use crate::diff::builtin::{is_binary, BINARY_SNIFF_LEN};
use crate::errors::MatchError;

/// Content-type sniffer consulted by the mimetype cache.
#[async_trait]
pub trait MimeSniffer: Send + Sync {
    /// Short content type such as `text/plain`.
    async fn sniff(&self, path: &Path) -> Result<String, MatchError>;

    /// Sniffer name for logging
    fn sniffer_name(&self) -> &str;
}

/// Asks `file -b --mime-type`.
pub struct FileCommandSniffer {
    program: PathBuf,
}

impl FileCommandSniffer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }
}

impl Default for FileCommandSniffer {
    fn default() -> Self {
        Self::new("file")
    }
}

#[async_trait]
impl MimeSniffer for FileCommandSniffer {
    async fn sniff(&self, path: &Path) -> Result<String, MatchError> {
        let failed = |reason: String| MatchError::SniffFailed {
            path: path.to_path_buf(),
            reason,
        };

        let output = Command::new(&self.program)
            .args(["-b", "--mime-type"])
            .arg(path)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| failed(format!("cannot run {}: {}", self.program.display(), e)))?;

        if !output.status.success() {
            return Err(failed(format!("{} exited with {}", self.program.display(), output.status)));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mime = stdout.split(';').next().unwrap_or_default().trim();
        if mime.is_empty() {
            return Err(failed("empty answer".to_string()));
        }
        Ok(mime.to_string())
    }

    fn sniffer_name(&self) -> &str {
        "file"
    }
}

/// Coarse in-process classification: empty, binary, or plain text.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinSniffer;

pub const MIME_EMPTY: &str = "inode/x-empty";
pub const MIME_BINARY: &str = "application/octet-stream";
pub const MIME_TEXT: &str = "text/plain";

#[async_trait]
impl MimeSniffer for BuiltinSniffer {
    async fn sniff(&self, path: &Path) -> Result<String, MatchError> {
        let failed = |e: std::io::Error| MatchError::SniffFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        let file = tokio::fs::File::open(path).await.map_err(failed)?;
        let mut head = Vec::with_capacity(BINARY_SNIFF_LEN);
        file.take(BINARY_SNIFF_LEN as u64)
            .read_to_end(&mut head)
            .await
            .map_err(failed)?;

        let mime = if head.is_empty() {
            MIME_EMPTY
        } else if is_binary(&head) {
            MIME_BINARY
        } else {
            MIME_TEXT
        };
        Ok(mime.to_string())
    }

    fn sniffer_name(&self) -> &str {
        "builtin"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_builtin_classification() {
        let dir = TempDir::new().unwrap();
        let empty = dir.path().join("empty");
        let text = dir.path().join("text");
        let binary = dir.path().join("binary");
        std::fs::write(&empty, b"").unwrap();
        std::fs::write(&text, b"hello\n").unwrap();
        std::fs::write(&binary, b"\x7fELF\x00\x00").unwrap();

        let sniffer = BuiltinSniffer;
        assert_eq!(sniffer.sniff(&empty).await.unwrap(), MIME_EMPTY);
        assert_eq!(sniffer.sniff(&text).await.unwrap(), MIME_TEXT);
        assert_eq!(sniffer.sniff(&binary).await.unwrap(), MIME_BINARY);
    }

    #[tokio::test]
    async fn test_builtin_missing_file() {
        let err = BuiltinSniffer.sniff(Path::new("/nonexistent/file")).await.unwrap_err();
        assert!(matches!(err, MatchError::SniffFailed { .. }));
    }

    #[tokio::test]
    async fn test_file_command_missing_program() {
        let sniffer = FileCommandSniffer::new("/nonexistent/file-binary");
        let err = sniffer.sniff(Path::new("whatever")).await.unwrap_err();
        assert!(matches!(err, MatchError::SniffFailed { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_command_strips_parameters() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        let program = dir.path().join("file");
        std::fs::write(&program, "#!/bin/sh\necho 'text/x-python; charset=us-ascii'\n").unwrap();
        std::fs::set_permissions(&program, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mime = FileCommandSniffer::new(&program).sniff(Path::new("x.py")).await.unwrap();
        assert_eq!(mime, "text/x-python");
    }
}
