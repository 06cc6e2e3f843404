//! Page merge: keep the hand-authored top of an existing reference page.
//!
//! A page is front matter, an optional hand-written prefix ending at the
//! `## File Info` marker, then the generated body. Regenerating a page
//! replaces everything after the marker and nothing before it.

/// Line that separates the hand-written prefix from the generated body.
pub const FILE_INFO_MARKER: &str = "## File Info";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Preserved {
    pub prefix: String,
    /// The prefix already ends with the marker line
    pub has_marker: bool,
}

/// Everything after the front matter of `existing`, up to and including the
/// first line containing the marker.
pub fn preserved_prefix(existing: &str) -> Preserved {
    let mut lines = existing.lines().peekable();

    if lines.peek().is_some_and(|l| l.trim() == "---") {
        lines.next();
        for line in lines.by_ref() {
            if line.trim() == "---" {
                break;
            }
        }
    }

    let mut preserved = Preserved::default();
    for line in lines {
        preserved.prefix.push_str(line);
        preserved.prefix.push('\n');
        if line.contains(FILE_INFO_MARKER) {
            preserved.has_marker = true;
            break;
        }
    }
    preserved
}

/// Assemble the final page for the file `name`.
pub fn compose(name: &str, existing: Option<&str>, body: &str) -> String {
    let preserved = existing.map(preserved_prefix).unwrap_or_default();

    let mut page = format!(
        "---\ntitle: {}\ndescription: Reference page for {}\n---\n",
        name, name
    );
    page.push_str(&preserved.prefix);
    if !preserved.has_marker {
        page.push('\n');
        page.push_str(FILE_INFO_MARKER);
        page.push('\n');
    }
    page.push_str(body);
    page
}
