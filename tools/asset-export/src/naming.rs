//! Output file naming

/// Characters that are not allowed in file names on common platforms
const RESERVED: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replace reserved and control characters with `_`.
///
/// An empty name becomes `"unnamed"` so the output always has a stem.
///
/// ```
/// use asset_export::naming::sanitize_file_name;
///
/// assert_eq!(sanitize_file_name("Hero:LOD0"), "Hero_LOD0");
/// ```
pub fn sanitize_file_name(name: &str) -> String {
    if name.is_empty() {
        return "unnamed".to_string();
    }
    name.chars()
        .map(|c| {
            if RESERVED.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect()
}
