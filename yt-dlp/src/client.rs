use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Output;

use serde_json::Value;
use tokio::process::Command;

use crate::command::CommandBuilder;
use crate::error::{Error, Result};
use crate::types::{Cookies, FlatEntry};

#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: PathBuf,
    cookies: Option<Cookies>,
    extra_args: Vec<String>,
    env_vars: HashMap<String, String>
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new()
    }
}

impl YtDlp {
    pub fn new() -> Self {
        Self::with_binary("yt-dlp")
    }

    pub fn with_binary(path: impl Into<PathBuf>) -> Self {
        Self {
            binary: path.into(),
            cookies: None,
            extra_args: Vec::new(),
            env_vars: HashMap::new()
        }
    }

    pub fn binary(&self) -> &PathBuf {
        &self.binary
    }

    pub fn set_cookies(&mut self, cookies: Option<Cookies>) {
        self.cookies = cookies;
    }

    pub fn set_extra_args(&mut self, args: Vec<String>) {
        self.extra_args = args;
    }

    pub fn set_env(&mut self, key: String, value: String) {
        self.env_vars.insert(key, value);
    }

    pub async fn check_binary(&self) -> Result<String> {
        let output = Command::new(&self.binary)
            .arg("--version")
            .output()
            .await?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(Error::BinaryNotExecutable(self.binary.clone()))
        }
    }

    /// Runs a metadata-only extraction of a single video and returns the
    /// info document exactly as yt-dlp printed it.
    pub async fn extract_info(&self, url: &str) -> Result<Value> {
        let builder = self
            .command()
            .single_json()
            .skip_download()
            .no_playlist()
            .url(url);

        let output = self.run(&builder).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        if stdout.trim().is_empty() {
            return Err(Error::EmptyOutput(url.to_string()));
        }

        let info: Value = serde_json::from_str(stdout.trim())?;
        if info.is_null() {
            return Err(Error::EmptyOutput(url.to_string()));
        }

        Ok(info)
    }

    /// Lists the entries of a playlist, channel tab or `ytsearchN:` query
    /// without resolving each video.
    pub async fn extract_flat(&self, url: &str, limit: Option<usize>) -> Result<Vec<FlatEntry>> {
        let mut builder = self.command().json_lines().flat_playlist();
        if let Some(limit) = limit {
            builder = builder.playlist_end(limit);
        }
        let builder = builder.url(url);

        let output = self.run(&builder).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        let mut entries = Vec::new();
        for line in stdout.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<FlatEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::debug!(error = %e, "skipping unparsable flat entry")
            }
        }

        Ok(entries)
    }

    async fn run(&self, builder: &CommandBuilder) -> Result<Output> {
        tracing::debug!(
            binary = %self.binary.display(),
            args = ?builder.get_args(),
            "spawning yt-dlp"
        );

        let output = builder.build_with_env(&self.env_vars).output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(Error::CommandFailed {
                code: output.status.code().unwrap_or(-1),
                stderr
            });
        }

        Ok(output)
    }

    fn command(&self) -> CommandBuilder {
        CommandBuilder::new(&self.binary)
            .geo_bypass()
            .ignore_errors()
            .quiet()
            .cookies(self.cookies.as_ref())
            .args(self.extra_args.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CookieBrowser;

    #[test]
    fn test_ytdlp_default() {
        let client = YtDlp::default();
        assert_eq!(client.binary, PathBuf::from("yt-dlp"));
        assert!(client.cookies.is_none());
        assert!(client.extra_args.is_empty());
    }

    #[test]
    fn test_ytdlp_command_carries_settings() {
        let mut client = YtDlp::with_binary("/usr/local/bin/yt-dlp");
        client.set_cookies(Some(Cookies::Browser(CookieBrowser::Chrome)));
        client.set_extra_args(vec![
            "--extractor-args".to_string(),
            "youtube:player-client=mweb".to_string()
        ]);

        let builder = client.command();
        let args = builder.get_args();
        assert!(args.contains(&"--geo-bypass".to_string()));
        assert!(args.contains(&"--cookies-from-browser".to_string()));
        assert_eq!(args.last().unwrap(), "youtube:player-client=mweb");
    }

    #[test]
    fn test_ytdlp_env_vars() {
        let mut client = YtDlp::new();
        client.set_env("PATH_PREPEND".to_string(), "/opt/bin".to_string());
        assert_eq!(client.env_vars.get("PATH_PREPEND"), Some(&"/opt/bin".to_string()));
    }

    #[tokio::test]
    async fn test_missing_binary_is_execution_error() {
        let client = YtDlp::with_binary("/nonexistent/yt-dlp-binary");
        let result = client.extract_info("https://youtu.be/dQw4w9WgXcQ").await;
        assert!(matches!(result, Err(Error::ExecutionFailed(_))));
    }
}
