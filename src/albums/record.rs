use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Album body posted to `POST /albums`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub price: Price,
}

/// Lenient view of an album returned by the API. Only the fields that are
/// logged are read; anything else in the payload is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlbumView {
    #[serde(default)]
    pub title: Option<String>,
}

impl AlbumView {
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Unknown")
    }
}

/// Price in whole cents. Serialized as a JSON number with at most two
/// decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(u32);

impl Price {
    #[must_use]
    pub const fn from_cents(cents: u32) -> Self {
        Self(cents)
    }

    #[must_use]
    pub const fn cents(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Price {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
        let digits_only = |part: &str| part.bytes().all(|byte| byte.is_ascii_digit());
        if whole.is_empty() || fraction.len() > 2 || !digits_only(whole) || !digits_only(fraction)
        {
            return Err(format!("Invalid price '{}'.", value));
        }
        let whole: u32 = whole
            .parse()
            .map_err(|err| format!("Invalid price '{}': {}", value, err))?;
        let fraction_cents: u32 = match fraction.len() {
            0 => 0,
            1 => fraction
                .parse::<u32>()
                .map(|tenths| tenths.saturating_mul(10))
                .map_err(|err| format!("Invalid price '{}': {}", value, err))?,
            _ => fraction
                .parse()
                .map_err(|err| format!("Invalid price '{}': {}", value, err))?,
        };
        whole
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(fraction_cents))
            .map(Price)
            .ok_or_else(|| format!("Price '{}' is too large.", value))
    }
}

impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let value: f64 = self
            .to_string()
            .parse()
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_f64(value)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        if !value.is_finite() || value.is_sign_negative() {
            return Err(D::Error::custom(format!("Invalid price {}.", value)));
        }
        format!("{:.2}", value).parse().map_err(D::Error::custom)
    }
}
