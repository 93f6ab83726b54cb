use tracing::warn;

const FALLBACK_RGB: &str = "ffffff";

/// Converts a web color (`#RRGGBB`) and an opacity in `0.0..=1.0` to the
/// `aabbggrr` notation KML uses.
///
/// Anything that is not six hex digits after the leading `#` is replaced by
/// white, so a bad color never fails an export.
///
/// # Example
///
/// ```
/// use parcel_export::color::to_kml_color;
///
/// assert_eq!(to_kml_color("#FF0000", 0.5), "7f0000ff");
/// assert_eq!(to_kml_color("not a color", 1.0), "ffffffff");
/// ```
pub fn to_kml_color(hex: &str, opacity: f64) -> String {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    let rgb = if digits.len() == 6 && digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        digits
    } else {
        warn!(color = hex, "invalid hex color, using white");
        FALLBACK_RGB
    };
    let (r, g, b) = (&rgb[0..2], &rgb[2..4], &rgb[4..6]);
    format!("{:02x}{}{}{}", alpha(opacity), b, g, r).to_ascii_lowercase()
}

// float to int casts truncate toward zero and saturate, NaN becomes 0
fn alpha(opacity: f64) -> u8 {
    (opacity * 255.0) as u8
}
