// ABOUTME: Substring matching of known_hosts lines against the host part of each record
// ABOUTME: Backs both the CLI search/rm commands and the interactive filter and delete

/// The text before the first whitespace, i.e. `[name][,address]`.
pub fn host_part(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}

/// Lines whose host part contains `pattern`, in file order. Case-sensitive;
/// an empty pattern keeps every line that has a host part.
pub fn search(lines: &[String], pattern: &str) -> Vec<String> {
    lines
        .iter()
        .filter(|line| host_part(line).is_some_and(|host| host.contains(pattern)))
        .cloned()
        .collect()
}

/// Drops every line equal to `pattern` or whose host part contains it.
/// Empty lines are always dropped.
pub fn delete(lines: &[String], pattern: &str) -> Vec<String> {
    lines
        .iter()
        .filter(|line| {
            if line.is_empty() || line.as_str() == pattern {
                return false;
            }
            !host_part(line).is_some_and(|host| host.contains(pattern))
        })
        .cloned()
        .collect()
}

/// Drops only lines whose content is exactly `line`.
pub fn remove_line(lines: &[String], line: &str) -> Vec<String> {
    lines
        .iter()
        .filter(|candidate| !candidate.is_empty() && candidate.as_str() != line)
        .cloned()
        .collect()
}
