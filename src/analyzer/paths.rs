//! Module path-identifier splitting
//!
//! Module records carry path-like identifiers such as `./src/a.js` or, with
//! loader chains, `css-loader!./styles/app.css`. Only the trailing real path
//! participates in tree placement.

/// Split a module's path-like identifier into tree segments.
///
/// The portion after the last `!` (loader chains) is kept, split on `/`,
/// and `.` plus empty segments are dropped. Returns `None` when nothing
/// usable remains; callers skip such records silently.
pub fn module_path_parts(name: &str) -> Option<Vec<String>> {
    let actual = name.rsplit('!').next().unwrap_or(name);

    let parts: Vec<String> = actual
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .map(str::to_string)
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts)
    }
}
