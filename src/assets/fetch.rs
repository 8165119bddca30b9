use std::path::{Path, PathBuf};

use tempfile::TempPath;

use crate::foundation::error::{OverlayError, OverlayResult};

/// A readable local copy of the asset. Temporary copies are deleted by
/// [`FetchedAsset::release`], or on drop if release never runs.
#[derive(Debug)]
pub struct FetchedAsset {
    path: PathBuf,
    temp: Option<TempPath>,
}

impl FetchedAsset {
    /// A caller-owned file that must never be deleted.
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            temp: None,
        }
    }

    /// A file created by the fetcher; removed on release.
    pub fn temporary(temp: TempPath) -> Self {
        Self {
            path: temp.to_path_buf(),
            temp: Some(temp),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_temporary(&self) -> bool {
        self.temp.is_some()
    }

    /// Deletes the file if the fetcher created it.
    pub fn release(self) -> OverlayResult<()> {
        match self.temp {
            Some(temp) => temp.close().map_err(|e| {
                OverlayError::Other(anyhow::Error::new(e).context(format!(
                    "remove downloaded asset '{}'",
                    self.path.display()
                )))
            }),
            None => Ok(()),
        }
    }
}

/// Turns a source locator into a local file.
pub trait AssetFetcher {
    fn fetch(&mut self, locator: &str) -> OverlayResult<FetchedAsset>;
}

/// True for locators that need a network fetch.
pub fn is_remote(locator: &str) -> bool {
    let l = locator.trim_start().to_ascii_lowercase();
    l.starts_with("http://") || l.starts_with("https://")
}

/// Serves plain filesystem paths without copying them.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalFileFetcher;

impl AssetFetcher for LocalFileFetcher {
    fn fetch(&mut self, locator: &str) -> OverlayResult<FetchedAsset> {
        let path = PathBuf::from(locator);
        let meta = std::fs::metadata(&path)
            .map_err(|e| OverlayError::fetch(format!("open '{}': {e}", path.display())))?;
        if !meta.is_file() {
            return Err(OverlayError::fetch(format!(
                "'{}' is not a regular file",
                path.display()
            )));
        }
        Ok(FetchedAsset::local(path))
    }
}

#[cfg(feature = "http")]
pub use http::HttpFetcher;

#[cfg(feature = "http")]
mod http {
    use std::{io::Write as _, path::PathBuf, time::Duration};

    use super::{AssetFetcher, FetchedAsset};
    use crate::foundation::error::{OverlayError, OverlayResult};

    /// Downloads over HTTP(S) into a temporary file.
    #[derive(Debug)]
    pub struct HttpFetcher {
        client: reqwest::blocking::Client,
        temp_dir: Option<PathBuf>,
    }

    impl HttpFetcher {
        pub fn new(timeout: Duration) -> OverlayResult<Self> {
            let client = reqwest::blocking::Client::builder()
                .user_agent(concat!("bouncegif/", env!("CARGO_PKG_VERSION")))
                .timeout(timeout)
                .build()
                .map_err(|e| OverlayError::fetch(format!("build http client: {e}")))?;
            Ok(Self {
                client,
                temp_dir: None,
            })
        }

        /// Download into `dir` instead of the system temp directory.
        pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
            self.temp_dir = Some(dir.into());
            self
        }
    }

    impl AssetFetcher for HttpFetcher {
        #[tracing::instrument(skip(self))]
        fn fetch(&mut self, url: &str) -> OverlayResult<FetchedAsset> {
            let mut resp = self
                .client
                .get(url)
                .send()
                .map_err(|e| OverlayError::fetch(format!("GET {url}: {e}")))?;
            let status = resp.status();
            if !status.is_success() {
                return Err(OverlayError::fetch(format!("GET {url}: HTTP {status}")));
            }

            let mut builder = tempfile::Builder::new();
            builder.prefix("bouncegif").suffix(".tmp");
            let mut tmp = match &self.temp_dir {
                Some(dir) => builder.tempfile_in(dir),
                None => builder.tempfile(),
            }
            .map_err(|e| OverlayError::fetch(format!("create temp file: {e}")))?;

            // On any error below `tmp` is dropped and the partial file goes with it.
            let written = std::io::copy(&mut resp, tmp.as_file_mut())
                .map_err(|e| OverlayError::fetch(format!("download {url}: {e}")))?;
            tmp.as_file_mut()
                .flush()
                .map_err(|e| OverlayError::fetch(format!("flush download: {e}")))?;
            if written == 0 {
                return Err(OverlayError::fetch(format!("GET {url}: empty body")));
            }

            tracing::info!(bytes = written, path = %tmp.path().display(), "downloaded asset");
            Ok(FetchedAsset::temporary(tmp.into_temp_path()))
        }
    }
}

/// Routes `http(s)://` locators to the HTTP fetcher and everything else to the local one.
#[derive(Debug)]
pub struct AutoFetcher {
    local: LocalFileFetcher,
    #[cfg(feature = "http")]
    http: HttpFetcher,
}

impl AutoFetcher {
    pub fn new() -> OverlayResult<Self> {
        Ok(Self {
            local: LocalFileFetcher,
            #[cfg(feature = "http")]
            http: HttpFetcher::new(std::time::Duration::from_secs(30))?,
        })
    }
}

impl AssetFetcher for AutoFetcher {
    fn fetch(&mut self, locator: &str) -> OverlayResult<FetchedAsset> {
        if is_remote(locator) {
            #[cfg(feature = "http")]
            return self.http.fetch(locator.trim());
            #[cfg(not(feature = "http"))]
            return Err(OverlayError::fetch(format!(
                "'{locator}' needs the `http` feature"
            )));
        }
        self.local.fetch(locator)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;
