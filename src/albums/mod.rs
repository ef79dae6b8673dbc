//! Album records sent to and read back from the albums API.
mod generator;
mod record;


pub use generator::{
    ALBUM_ID_RANGE, ARTISTS, AlbumGenerator, FIXED_ARTIST, FIXED_PRICE, PRICE_RANGE_CENTS,
    PayloadStyle, TITLES,
};
pub use record::{Album, AlbumView, Price};
