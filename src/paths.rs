// Path resolution for the virtual file system. Every path handed to the
// file system is absolute and normalized: no `.` or `..` segments, no
// repeated separators and no trailing separator except on the root.

pub const SEPARATOR: char = '/';
pub const ROOT: &str = "/";

/// Resolve `input` against `current_dir`, producing a normalized absolute path.
///
/// Absolute inputs ignore `current_dir`. `..` above the root stays at the root,
/// so this never fails.
pub fn resolve(current_dir: &str, input: &str) -> String {
    if input.starts_with(SEPARATOR) {
        normalize(input)
    } else {
        normalize(&format!("{}{}{}", current_dir, SEPARATOR, input))
    }
}

pub fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split(SEPARATOR) {
        match part {
            "" | "." => (),
            ".." => {
                parts.pop();
            }
            p => parts.push(p),
        }
    }
    if parts.is_empty() {
        return ROOT.to_string();
    }
    let mut normalized = String::with_capacity(path.len());
    for part in parts {
        normalized.push(SEPARATOR);
        normalized.push_str(part);
    }
    normalized
}
