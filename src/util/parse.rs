use url::Url;

/// Parses a Discord snowflake stored or received as a string.
///
/// # Returns
/// - `Some(u64)` - Successfully parsed id
/// - `None` - The string is not a non-zero unsigned integer
pub fn parse_u64_from_str(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok().filter(|id| *id != 0)
}

/// Parses a `#RRGGBB` colour into its RGB value.
///
/// The leading `#` is optional.
pub fn parse_hex_color(value: &str) -> Option<u32> {
    let hex = value.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

/// Whether `value` is an absolute http(s) URL usable as an image.
pub fn is_valid_image_url(value: &str) -> bool {
    match Url::parse(value.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host().is_some(),
        Err(_) => false,
    }
}
