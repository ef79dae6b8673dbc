use std::ops::RangeInclusive;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::record::{Album, Price};

/// Ids handed out to created albums. Kept clear of the seeded ids 1-3.
pub const ALBUM_ID_RANGE: RangeInclusive<u32> = 1000..=9999;
/// 15.99 through 89.99.
pub const PRICE_RANGE_CENTS: RangeInclusive<u32> = 1599..=8999;
pub const FIXED_PRICE: Price = Price::from_cents(2999);
pub const FIXED_ARTIST: &str = "Test Artist";

pub const TITLES: [&str; 5] = [
    "Cool Jazz",
    "Bebop Blues",
    "Smooth Sax",
    "Piano Dreams",
    "Vocal Magic",
];
pub const ARTISTS: [&str; 5] = [
    "Miles Davis",
    "Charlie Parker",
    "Billie Holiday",
    "Duke Ellington",
    "Ella Fitzgerald",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadStyle {
    /// Title/artist drawn from the jazz catalogue, price in 15.99..=89.99.
    Random,
    /// "Test Album {id}" by "Test Artist" at 29.99.
    Fixed,
}

#[derive(Debug, Clone, Copy)]
pub struct AlbumGenerator {
    style: PayloadStyle,
}

impl AlbumGenerator {
    #[must_use]
    pub const fn new(style: PayloadStyle) -> Self {
        Self { style }
    }

    pub fn generate<R>(self, rng: &mut R) -> Album
    where
        R: Rng + ?Sized,
    {
        let id = rng.gen_range(ALBUM_ID_RANGE).to_string();
        match self.style {
            PayloadStyle::Random => {
                let title = TITLES.choose(rng).copied().unwrap_or_default();
                let artist = ARTISTS.choose(rng).copied().unwrap_or_default();
                let price = Price::from_cents(rng.gen_range(PRICE_RANGE_CENTS));
                Album {
                    title: format!("{} #{}", title, id),
                    artist: artist.to_owned(),
                    price,
                    id,
                }
            }
            PayloadStyle::Fixed => Album {
                title: format!("Test Album {}", id),
                artist: FIXED_ARTIST.to_owned(),
                price: FIXED_PRICE,
                id,
            },
        }
    }
}
