//! Declaration extractors — names, parents and comment text from single lines.

/// Name reported for a function line that has no `(`.
pub const INVALID_NAME: &str = "INVALID METHOD NAME";

const SKIPPED_HEADER_WORDS: &[&str] = &[
    "class", "struct", "public", "protected", "private", "virtual", "final",
];

/// Naming convention used to pick type names out of header lines.
///
/// A type name starts with one of the prefixes followed by an ASCII
/// uppercase letter: `UObject`, `FVector`, `IInterface`, `EColor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Naming {
    pub type_prefixes: Vec<char>,
    pub enum_prefixes: Vec<char>,
}

impl Default for Naming {
    fn default() -> Self {
        Self {
            type_prefixes: vec!['U', 'A', 'I', 'F', 'T', 'S'],
            enum_prefixes: vec!['E'],
        }
    }
}

impl Naming {
    pub fn is_type_name(&self, token: &str) -> bool {
        matches_convention(token, &self.type_prefixes)
    }

    pub fn is_enum_name(&self, token: &str) -> bool {
        matches_convention(token, &self.enum_prefixes)
    }
}

fn matches_convention(token: &str, prefixes: &[char]) -> bool {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) => prefixes.contains(&first) && second.is_ascii_uppercase(),
        _ => false,
    }
}

/// Name and ordered parent list from a class or struct header.
///
/// `class MYMODULE_API UFoo : public UBar` → `("UFoo", ["UBar"])`
pub fn extract_type_info(line: &str, naming: &Naming) -> (String, Vec<String>) {
    let mut name = String::new();
    let mut parents = Vec::new();
    let mut in_parents = false;

    for raw in line.split_whitespace() {
        if raw.starts_with('{') {
            break;
        }
        if raw.contains("_API") {
            continue;
        }

        let mut token = raw;
        if let Some(rest) = token.strip_prefix(':') {
            if !rest.starts_with(':') {
                in_parents = true;
                token = rest;
            }
        }
        let closes_name = token.ends_with(':') && !token.ends_with("::");
        let token = token.trim_end_matches(':').trim_end_matches([',', '{']);

        if !token.is_empty() && !SKIPPED_HEADER_WORDS.contains(&token) && naming.is_type_name(token) {
            if in_parents {
                parents.push(token.to_string());
            } else if name.is_empty() {
                name = token.to_string();
            }
        }

        if closes_name {
            in_parents = true;
        }
        if raw.ends_with('{') {
            break;
        }
    }

    (name, parents)
}

/// Parents listed on a header continuation line such as `: public UBar`.
pub fn extract_parents(line: &str, naming: &Naming) -> Vec<String> {
    line.split_whitespace()
        .map(|t| t.trim_start_matches(':').trim_end_matches([',', '{']))
        .filter(|t| !SKIPPED_HEADER_WORDS.contains(t) && naming.is_type_name(t))
        .map(str::to_string)
        .collect()
}

/// Name from an enum header; empty when nothing matches the convention.
///
/// `enum class EColor : uint8` → `"EColor"`
pub fn extract_enum_name(line: &str, naming: &Naming) -> String {
    for raw in line.split_whitespace() {
        if raw.starts_with(':') || raw.starts_with('{') {
            break;
        }
        let token = raw.split(':').next().unwrap_or(raw);
        if matches!(token, "enum" | "class" | "struct") {
            continue;
        }
        if naming.is_enum_name(token) {
            return token.trim_end_matches('{').to_string();
        }
    }
    String::new()
}

/// Short name of a function: the token right before the first `(`.
pub fn extract_function_name(line: &str) -> String {
    let Some(open) = line.find('(') else {
        return INVALID_NAME.to_string();
    };
    line[..open]
        .split_whitespace()
        .last()
        .map(|t| t.trim_start_matches(['*', '&']))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| INVALID_NAME.to_string())
}

/// Comment text without its delimiters.
pub fn clean_comment(line: &str) -> String {
    let mut text = line.trim();
    if let Some(rest) = text.strip_suffix("*/") {
        text = rest.trim_end_matches('*');
    }
    text = text.trim_start_matches('/');
    text = text.trim_start_matches(['*', '!']);
    text.trim().to_string()
}
