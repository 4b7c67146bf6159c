//! Canonical ring-road centerline.
//!
//! The encoded form mirrors the map provider's route-line (`rl`) parameter;
//! see [`crate::decode`] for the grammar. Decoded once at startup — a decode
//! failure here is fatal, there is no fallback ring road.

use crate::decode;
use crate::error::FormatError;
use crate::models::GeoPath;

/// Delta-encoded ring-road centerline, a closed 29-vertex loop.
pub const ENCODED_PATH: &str = "30.639982,59.951000~0.007093,0.038282~-0.034877,0.033929~-0.053146,0.025767~-0.050654,0.023710~-0.058302,0.018119~-0.067253,0.004994~-0.064844,0.001210~-0.068169,0.006215~-0.074065,-0.001690~-0.061627,-0.020244~-0.045321,-0.029010~-0.040212,-0.030250~-0.021415,-0.034875~0.012791,-0.036157~0.022638,-0.032035~0.010978,-0.032862~0.020720,-0.034149~0.047518,-0.026326~0.059253,-0.019529~0.063792,-0.018377~0.073119,-0.006713~0.069794,0.014138~0.056980,0.021681~0.055929,0.017404~0.052851,0.021026~0.033654,0.029665~0.024440,0.031916~0.028336,0.034160";

/// Decode the built-in centerline.
pub fn canonical_path() -> Result<GeoPath, FormatError> {
    decode::decode(ENCODED_PATH)
}
