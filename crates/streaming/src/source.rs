use std::path::PathBuf;

use formats::GeoJsonError;

/// Where a feature collection is fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureSource {
    File(PathBuf),
    Http(String),
}

impl FeatureSource {
    /// `http://` and `https://` locations are fetched over the network;
    /// anything else is a filesystem path.
    pub fn parse(location: &str) -> Self {
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            FeatureSource::Http(location.to_string())
        } else {
            FeatureSource::File(PathBuf::from(location))
        }
    }

    pub async fn fetch(&self, http: &reqwest::Client) -> Result<String, SourceError> {
        match self {
            FeatureSource::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| SourceError::Io {
                        path: path.clone(),
                        source,
                    })
            }
            FeatureSource::Http(url) => {
                let resp = http.get(url).send().await.map_err(|source| SourceError::Http {
                    url: url.clone(),
                    source,
                })?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(SourceError::Status {
                        url: url.clone(),
                        status: status.as_u16(),
                    });
                }
                resp.text().await.map_err(|source| SourceError::Http {
                    url: url.clone(),
                    source,
                })
            }
        }
    }
}

impl std::str::FromStr for FeatureSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FeatureSource::parse(s))
    }
}

impl std::fmt::Display for FeatureSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureSource::File(path) => write!(f, "{}", path.display()),
            FeatureSource::Http(url) => f.write_str(url),
        }
    }
}

#[derive(Debug)]
pub enum SourceError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Http {
        url: String,
        source: reqwest::Error,
    },
    Status {
        url: String,
        status: u16,
    },
    Decode(GeoJsonError),
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            SourceError::Http { url, source } => write!(f, "request to {url} failed: {source}"),
            SourceError::Status { url, status } => write!(f, "{url} answered HTTP {status}"),
            SourceError::Decode(e) => write!(f, "invalid feature collection: {e}"),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::Io { source, .. } => Some(source),
            SourceError::Http { source, .. } => Some(source),
            SourceError::Status { .. } => None,
            SourceError::Decode(e) => Some(e),
        }
    }
}
