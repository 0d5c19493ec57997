use chrono::NaiveDate;
use std::path::Path;

/// Tag values derived from one filename. Built here, written once by the
/// tag writer, never mutated in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMetadata {
    pub title: String,
    pub album: String,
    pub year: String,
}

/// Derive metadata from a filename like `FavoriteThings_2024-1122.mp3`.
///
/// The stem must split on a single underscore into a title part and a
/// `YYYY-MMDD` date part. Returns `None` for anything else; this never
/// panics, whatever the input string looks like.
///
/// The title is deliberately the whole stem (date suffix included), not
/// just the part before the underscore. Existing libraries were tagged
/// that way and retagging must not change titles under users' feet.
pub fn parse_filename(filename: &str) -> Option<TrackMetadata> {
    let stem = Path::new(filename).file_stem()?.to_str()?;

    let parts: Vec<&str> = stem.split('_').collect();
    if parts.len() != 2 {
        return None;
    }

    let (album, year) = format_recording_date(parts[1])?;

    Some(TrackMetadata {
        title: stem.to_string(),
        album,
        year,
    })
}

/// Convert a `YYYY-MMDD` date string into the album name (`22 Nov 2024`)
/// and the four-digit year.
fn format_recording_date(date_str: &str) -> Option<(String, String)> {
    // chrono alone is laxer than the filename convention: %Y takes short
    // or signed years and %m/%d take one digit or padding. Pin the fixed
    // nine-character digit shape first, keep chrono for calendar validity.
    let bytes = date_str.as_bytes();
    if bytes.len() != 9 || bytes[4] != b'-' {
        return None;
    }
    if !bytes[..4].iter().chain(&bytes[5..]).all(u8::is_ascii_digit) {
        return None;
    }

    let date = NaiveDate::parse_from_str(date_str, "%Y-%m%d").ok()?;
    Some((
        date.format("%d %b %Y").to_string(),
        date.format("%Y").to_string(),
    ))
}
