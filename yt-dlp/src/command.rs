use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::types::Cookies;

pub struct CommandBuilder {
    binary: PathBuf,
    args: Vec<String>
}

impl CommandBuilder {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            args: Vec::new()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn url(self, url: impl Into<String>) -> Self {
        self.arg("--").arg(url)
    }

    pub fn single_json(self) -> Self {
        self.arg("--dump-single-json")
    }

    pub fn json_lines(self) -> Self {
        self.arg("--dump-json")
    }

    pub fn skip_download(self) -> Self {
        self.arg("--skip-download")
    }

    pub fn no_playlist(self) -> Self {
        self.arg("--no-playlist")
    }

    pub fn flat_playlist(self) -> Self {
        self.arg("--flat-playlist")
    }

    pub fn playlist_end(self, count: usize) -> Self {
        self.arg("--playlist-end").arg(count.to_string())
    }

    pub fn geo_bypass(self) -> Self {
        self.arg("--geo-bypass")
    }

    pub fn ignore_errors(self) -> Self {
        self.arg("--ignore-errors")
    }

    pub fn quiet(self) -> Self {
        self.arg("--quiet").arg("--no-warnings")
    }

    pub fn cookies(self, cookies: Option<&Cookies>) -> Self {
        match cookies {
            Some(Cookies::File(path)) => self.cookies_file(path),
            Some(Cookies::Browser(browser)) => {
                self.arg("--cookies-from-browser").arg(browser.as_str())
            }
            None => self
        }
    }

    pub fn cookies_file(self, path: impl AsRef<Path>) -> Self {
        self.arg("--cookies").arg(path.as_ref().to_string_lossy().to_string())
    }

    pub fn build_with_env(&self, env_vars: &HashMap<String, String>) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(&self.args);

        if let Some(path_prepend) = env_vars.get("PATH_PREPEND") {
            let current_path = std::env::var("PATH").unwrap_or_default();
            cmd.env("PATH", format!("{path_prepend}:{current_path}"));
        }

        for (key, value) in env_vars {
            if key != "PATH_PREPEND" {
                cmd.env(key, value);
            }
        }

        cmd
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }
}
