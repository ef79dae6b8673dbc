use reqwest::Client;
use url::Url;

use crate::args::{DEFAULT_USER_AGENT, TesterArgs};
use crate::error::HttpError;

/// Builds the client shared by every simulated user.
///
/// # Errors
///
/// Returns an error when reqwest cannot build the client (for example when
/// the TLS backend fails to initialize).
pub fn build_client(args: &TesterArgs) -> Result<Client, HttpError> {
    let mut client_builder = Client::builder()
        .timeout(args.request_timeout)
        .connect_timeout(args.connect_timeout)
        .user_agent(DEFAULT_USER_AGENT);

    if args.disable_keepalive {
        client_builder = client_builder
            .pool_max_idle_per_host(0)
            .pool_idle_timeout(Some(std::time::Duration::from_secs(0)));
    }

    client_builder
        .build()
        .map_err(|source| HttpError::BuildClientFailed { source })
}

/// Resolved `/albums` location under the configured host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumsEndpoint {
    collection: Url,
}

impl AlbumsEndpoint {
    /// Validates `host` and resolves the albums collection beneath it. A path
    /// on the host (`http://gateway/api`) is kept as a prefix.
    ///
    /// # Errors
    ///
    /// Returns an error when the host is not an absolute http(s) URL.
    pub fn parse(host: &str) -> Result<Self, HttpError> {
        let host = host.trim();
        let mut base = Url::parse(host).map_err(|source| HttpError::InvalidHost {
            url: host.to_owned(),
            source,
        })?;
        match base.scheme() {
            "http" | "https" => {}
            other => {
                return Err(HttpError::UnsupportedScheme {
                    scheme: other.to_owned(),
                });
            }
        }
        if base.cannot_be_a_base() || base.host_str().is_none() {
            return Err(HttpError::HostNotBase {
                url: host.to_owned(),
            });
        }
        base.set_query(None);
        base.set_fragment(None);
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let collection = base
            .join("albums")
            .map_err(|source| HttpError::JoinUrlFailed {
                path: "albums".to_owned(),
                source,
            })?;
        Ok(Self { collection })
    }

    #[must_use]
    pub const fn collection(&self) -> &Url {
        &self.collection
    }

    /// URL of a single album. The id is percent-encoded as one path segment.
    ///
    /// # Errors
    ///
    /// Returns an error when the collection URL cannot take path segments.
    pub fn item(&self, id: &str) -> Result<Url, HttpError> {
        let mut url = self.collection.clone();
        url.path_segments_mut()
            .map_err(|()| HttpError::HostNotBase {
                url: self.collection.to_string(),
            })?
            .push(id);
        Ok(url)
    }
}
