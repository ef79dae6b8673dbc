use std::time::Duration;

use serde::Deserialize;

use crate::args::parsers::parse_duration;
use crate::error::ValidationError;
use crate::user::UserProfile;

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub host: Option<String>,
    pub users: Option<usize>,
    pub spawn_rate: Option<usize>,
    #[serde(alias = "run_time")]
    pub duration: Option<DurationValue>,
    pub requests: Option<u64>,
    pub profile: Option<UserProfile>,
    pub wait: Option<WaitConfig>,
    pub tasks: Option<TaskWeightsConfig>,
    pub album_ids: Option<Vec<String>>,
    pub timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub disable_keepalive: Option<bool>,
    pub seed: Option<u64>,
    pub export_json: Option<String>,
    pub quiet: Option<bool>,
    pub no_color: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WaitConfig {
    pub min: Option<DurationValue>,
    pub max: Option<DurationValue>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TaskWeightsConfig {
    pub list_albums: Option<u32>,
    pub get_album: Option<u32>,
    pub create_album: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self, allow_zero: bool) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => {
                if *secs == 0 && !allow_zero {
                    Err(ValidationError::DurationZero)
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            DurationValue::Text(text) => parse_duration(text, allow_zero),
        }
    }
}
