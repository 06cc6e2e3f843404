//! Markdown (mdx) renderer.
//!
//! Produces the generated section of a reference page: the file name, link
//! lists per declaration kind, then one section per enum and per documented
//! struct and class. The front matter and hand-authored prefix are added by
//! [`crate::merge`].

use crate::model::*;
use crate::parser::extract::clean_comment;
use crate::render::Renderer;
use crate::toc;
use anyhow::Result;
use std::borrow::Cow;

#[derive(Default)]
pub struct MarkdownRenderer {
    /// Leave private properties and functions off the page
    pub hide_private: bool,
}

impl Renderer for MarkdownRenderer {
    fn render(&self, file: &FileInfo) -> Result<String> {
        let file = if self.hide_private {
            Cow::Owned(without_private(file))
        } else {
            Cow::Borrowed(file)
        };
        let mut lines: Vec<String> = Vec::new();

        lines.push(String::new());
        lines.push(format!("__FileName:__ `{}`", file.name));

        let named = |d: &&Declaration| !d.name.is_empty();
        let enums: Vec<&Declaration> = file.of_kind(DeclKind::Enum).filter(named).collect();
        let structs: Vec<&Declaration> = file
            .of_kind(DeclKind::Struct)
            .filter(named)
            .filter(|d| d.has_documentation())
            .collect();
        let classes: Vec<&Declaration> = file
            .of_kind(DeclKind::Class)
            .filter(named)
            .filter(|d| d.has_documentation())
            .collect();

        render_index(&mut lines, "Enum", &enums);
        render_index(&mut lines, "Struct", &structs);
        render_index(&mut lines, "Class", &classes);

        for decl in &enums {
            render_enum(&mut lines, decl);
        }
        for decl in structs.iter().chain(classes.iter()) {
            render_declaration(&mut lines, decl);
        }

        let mut output = lines.join("\n");
        output.push('\n');
        Ok(output)
    }

    fn file_extension(&self) -> &str {
        "mdx"
    }

    fn merges_existing(&self) -> bool {
        true
    }
}

/// Copy of `file` without private properties and functions.
/// Enum members are always public.
fn without_private(file: &FileInfo) -> FileInfo {
    let mut visible = file.clone();
    for decl in &mut visible.declarations {
        decl.properties.retain(|p| p.access != Access::Private);
        decl.functions.retain(|f| f.access != Access::Private);
    }
    visible
}

/// `- __Enum List:__` followed by the link list, omitted when empty.
fn render_index(lines: &mut Vec<String>, label: &str, decls: &[&Declaration]) {
    if decls.is_empty() {
        return;
    }
    lines.push(format!("- __{} List:__ ", label));
    lines.push(toc::render_toc_list(decls.iter().map(|d| d.name.as_str())));
}

fn render_heading(lines: &mut Vec<String>, decl: &Declaration) {
    lines.push(String::new());
    lines.push(format!("## `{}`", decl.name));
}

fn render_enum(lines: &mut Vec<String>, decl: &Declaration) {
    render_heading(lines, decl);
    render_description(lines, &decl.comments, "");

    if decl.properties.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push("### Values".to_string());
    lines.push(String::new());
    lines.push("```cpp".to_string());
    for member in &decl.properties {
        render_code_comments(lines, &member.comments);
        lines.push(member.declaration.clone());
    }
    lines.push("```".to_string());
}

/// A documented struct or class.
fn render_declaration(lines: &mut Vec<String>, decl: &Declaration) {
    render_heading(lines, decl);

    if !decl.parents.is_empty() {
        let parents: Vec<String> = decl.parents.iter().map(|p| format!("`{}`", p)).collect();
        lines.push(String::new());
        lines.push("__Parent Classes:__".to_string());
        lines.push(format!("[ {} ]", parents.join(", ")));
    }

    render_description(lines, &decl.comments, "");

    if decl.has_documented_properties() {
        lines.push(String::new());
        lines.push("### Properties".to_string());
        lines.push(String::new());
        lines.push("```cpp".to_string());
        for prop in decl.properties.iter().filter(|p| !p.comments.is_empty()) {
            render_code_comments(lines, &prop.comments);
            if let Some(ref macro_text) = prop.macro_text {
                lines.push(macro_text.clone());
            }
            lines.push(prop.declaration.clone());
            lines.push(String::new());
        }
        lines.push("```".to_string());
    }

    if decl.has_documented_functions() {
        lines.push(String::new());
        lines.push("### Functions".to_string());
        for func in decl.functions.iter().filter(|f| !f.comments.is_empty()) {
            lines.push(String::new());
            lines.push(render_function_heading(func));
            render_description(lines, &func.comments, "> ");
            lines.push("```cpp".to_string());
            if let Some(ref macro_text) = func.macro_text {
                lines.push(macro_text.clone());
            }
            lines.push(func.declaration.clone());
            lines.push("```".to_string());
        }
    }
}

/// `#### \`Name\``, with an access badge for anything not public.
fn render_function_heading(func: &Function) -> String {
    match func.access {
        Access::Public => format!("#### `{}`", func.name),
        other => format!("#### `{}` *`{}`*", func.name, other.label().to_lowercase()),
    }
}

/// Cleaned comment lines joined with markdown hard breaks.
///
/// Blank lines left over from comment decoration (`/**`, ` */`) are dropped.
fn render_description(lines: &mut Vec<String>, comments: &[String], quote: &str) {
    let text: Vec<String> = comments
        .iter()
        .map(|c| clean_comment(c))
        .filter(|c| !c.is_empty())
        .collect();
    if text.is_empty() {
        return;
    }

    if quote.is_empty() {
        lines.push(String::new());
    }
    let last = text.len() - 1;
    for (i, line) in text.iter().enumerate() {
        let brk = if i == last { "" } else { " \\" };
        lines.push(format!("{}{}{}", quote, line, brk));
    }
}

/// Comments re-emitted as `//` lines inside a code block.
fn render_code_comments(lines: &mut Vec<String>, comments: &[String]) {
    for comment in comments {
        let text = clean_comment(comment);
        if !text.is_empty() {
            lines.push(format!("// {}", text));
        }
    }
}
