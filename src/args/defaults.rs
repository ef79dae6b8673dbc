pub(crate) const DEFAULT_USER_AGENT: &str = concat!("albums-load/", env!("CARGO_PKG_VERSION"));

/// Config files picked up from the working directory when `--config` is absent.
pub(crate) const DEFAULT_CONFIG_FILES: [&str; 2] = ["albums-load.toml", "albums-load.json"];

pub(super) const DEFAULT_HOST: &str = "http://localhost:8080";
