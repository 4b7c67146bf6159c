//! Decoder for the compact relative-offset path encoding.
//!
//! The encoded form is the map provider's `rl` parameter:
//! `startLon,startLat~dLon1,dLat1~dLon2,dLat2~...` — the first segment is an
//! absolute longitude/latitude pair, every later segment is an offset added
//! cumulatively to a running position. Note the lon-first order in the
//! encoding; output points are lat-first.

use tracing::warn;
use url::Url;

use crate::error::FormatError;
use crate::models::{GeoPath, GeoPoint};

/// Decode an encoded path string into an ordered sequence of coordinates.
///
/// A malformed delta segment (wrong field count or non-numeric value) is
/// skipped with a warning: it drops one vertex but does not abort decoding
/// and does not reset the running position, so subsequent vertices are
/// unaffected. This matches the observed source behavior; an abort would be
/// defensible, but callers rely on partial paths surviving one bad segment.
pub fn decode(encoded: &str) -> Result<GeoPath, FormatError> {
    if encoded.trim().is_empty() {
        return Err(FormatError::Empty);
    }

    let mut segments = encoded.split('~');

    // First segment is absolute (lon, lat); a parse failure here is fatal.
    let head = segments.next().unwrap_or_default();
    let (mut lon, mut lat) = parse_pair(head).ok_or_else(|| FormatError::InvalidHead {
        segment: head.to_string(),
    })?;

    let mut points = vec![GeoPoint::new(lat, lon)];

    for (index, segment) in segments.enumerate() {
        match parse_pair(segment) {
            Some((dlon, dlat)) => {
                lon += dlon;
                lat += dlat;
                points.push(GeoPoint::new(lat, lon));
            }
            None => {
                warn!("Skipping invalid delta segment {}: '{}'", index + 1, segment);
            }
        }
    }

    Ok(GeoPath::new(points))
}

/// Decode the path from a full map URL by extracting its `rl` query
/// parameter (percent-decoded).
pub fn decode_url(url: &str) -> Result<GeoPath, FormatError> {
    let parsed = Url::parse(url)?;

    let rl = parsed
        .query_pairs()
        .find(|(key, _)| key == "rl")
        .map(|(_, value)| value.into_owned())
        .ok_or(FormatError::MissingParam)?;

    decode(&rl)
}

/// Parse a segment as exactly two comma-separated finite numbers.
fn parse_pair(segment: &str) -> Option<(f64, f64)> {
    let mut fields = segment.split(',');
    let first: f64 = fields.next()?.trim().parse().ok()?;
    let second: f64 = fields.next()?.trim().parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    if !first.is_finite() || !second.is_finite() {
        return None;
    }
    Some((first, second))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_swaps_to_lat_first() {
        let path = decode("30.0,60.0").unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path.points()[0], GeoPoint::new(60.0, 30.0));
    }

    #[test]
    fn test_decode_accumulates_deltas() {
        let path = decode("30.0,60.0~0.1,0.0~0.0,0.1").unwrap();
        let points = path.points();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], GeoPoint::new(60.0, 30.0));
        assert!((points[1].lat - 60.0).abs() < 1e-12);
        assert!((points[1].lon - 30.1).abs() < 1e-12);
        assert!((points[2].lat - 60.1).abs() < 1e-12);
        assert!((points[2].lon - 30.1).abs() < 1e-12);
    }

    #[test]
    fn test_decode_deterministic() {
        let encoded = "29.688385,59.984650~-0.025369,-0.064075~0.0417,0.0122";
        assert_eq!(decode(encoded).unwrap(), decode(encoded).unwrap());
    }

    #[test]
    fn test_decode_empty_fails() {
        assert!(matches!(decode(""), Err(FormatError::Empty)));
        assert!(matches!(decode("   "), Err(FormatError::Empty)));
    }

    #[test]
    fn test_decode_bad_head_fails() {
        assert!(matches!(
            decode("30.0"),
            Err(FormatError::InvalidHead { .. })
        ));
        assert!(matches!(
            decode("x,60.0~0.1,0.0"),
            Err(FormatError::InvalidHead { .. })
        ));
        assert!(matches!(
            decode("NaN,60.0"),
            Err(FormatError::InvalidHead { .. })
        ));
    }

    #[test]
    fn test_decode_skips_malformed_delta() {
        // A corrupted delta drops exactly one vertex; the accumulator is
        // untouched, so the result equals the string with that segment removed.
        let corrupted = decode("30.0,60.0~0.1,0.0~garbage~0.0,0.1").unwrap();
        let without = decode("30.0,60.0~0.1,0.0~0.0,0.1").unwrap();
        let full = decode("30.0,60.0~0.1,0.0~0.2,0.2~0.0,0.1").unwrap();

        assert_eq!(corrupted, without);
        assert_eq!(corrupted.len(), full.len() - 1);
        // Vertices before the corruption are identical to the valid decode
        assert_eq!(corrupted.points()[..2], full.points()[..2]);
    }

    #[test]
    fn test_decode_skips_wrong_field_count() {
        let path = decode("30.0,60.0~0.1~0.0,0.1,0.2~0.0,0.1").unwrap();
        // Both "0.1" and "0.0,0.1,0.2" are skipped
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_decode_skips_non_finite_delta() {
        let path = decode("30.0,60.0~inf,0.0~0.0,0.1").unwrap();
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_decode_url_extracts_rl() {
        let url =
            "https://maps.example.com/?ll=30.3%2C59.9&rl=30.0%2C60.0~0.1%2C0.0&z=10";
        let path = decode_url(url).unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path.points()[0], GeoPoint::new(60.0, 30.0));
    }

    #[test]
    fn test_decode_url_missing_rl_fails() {
        assert!(matches!(
            decode_url("https://maps.example.com/?z=10"),
            Err(FormatError::MissingParam)
        ));
    }

    #[test]
    fn test_decode_url_unparseable_fails() {
        assert!(matches!(
            decode_url("not a url"),
            Err(FormatError::InvalidUrl(_))
        ));
    }
}
