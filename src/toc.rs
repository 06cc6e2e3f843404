//! Markdown anchor links for declaration headings.

/// Link to the `## \`Name\`` heading of a declaration.
pub fn render_toc_link(name: &str) -> String {
    format!("[`{}`](#{})", name, heading_slug(name))
}

/// A bracketed, ` | `-separated list of links, e.g. `[ [`EA`](#ea) | [`EB`](#eb) ]`.
pub fn render_toc_list<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let links: Vec<String> = names.into_iter().map(render_toc_link).collect();
    format!("[ {} ]", links.join(" | "))
}

/// Heading anchor slug.
///
/// - lowercase
/// - keep alphanumerics, spaces, hyphens and underscores
/// - replace spaces with hyphens
fn heading_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' {
            slug.push(c);
        }
    }
    slug.replace(' ', "-")
}
