//! Data model for a scanned header — format-agnostic.
//!
//! A scan produces one [`FileInfo`] holding its declarations in source order.
//! Nested declarations are not owned by their parents: they are appended to
//! the same flat list and addressed by index while the scan is running.

use serde::Serialize;

/// Complete parsed model of a single header file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub path: String,
    pub name: String,
    pub declarations: Vec<Declaration>,
}

impl FileInfo {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            declarations: Vec::new(),
        }
    }

    /// Declarations of one kind, in source order.
    pub fn of_kind(&self, kind: DeclKind) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter().filter(move |d| d.kind == kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Class,
    Struct,
    Enum,
}

/// A class, struct or enum. Enumerators are stored as properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub kind: DeclKind,
    pub name: String,
    /// Always empty for enums
    pub parents: Vec<String>,
    pub comments: Vec<String>,
    pub properties: Vec<Property>,
    pub functions: Vec<Function>,
}

impl Declaration {
    pub fn new(kind: DeclKind, name: String, parents: Vec<String>, comments: Vec<String>) -> Self {
        Self {
            kind,
            name,
            parents,
            comments,
            properties: Vec::new(),
            functions: Vec::new(),
        }
    }

    pub fn has_documented_properties(&self) -> bool {
        self.properties.iter().any(|p| !p.comments.is_empty())
    }

    pub fn has_documented_functions(&self) -> bool {
        self.functions.iter().any(|f| !f.comments.is_empty())
    }

    /// True when anything in this declaration carries a comment.
    pub fn has_documentation(&self) -> bool {
        !self.comments.is_empty() || self.has_documented_properties() || self.has_documented_functions()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    pub macro_text: Option<String>,
    pub declaration: String,
    pub comments: Vec<String>,
    pub access: Access,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Function {
    pub name: String,
    pub macro_text: Option<String>,
    pub declaration: String,
    pub comments: Vec<String>,
    pub access: Access,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Public,
    Protected,
    #[default]
    Private,
}

impl Access {
    /// Parse an access specifier line such as `protected:`.
    pub fn from_specifier(line: &str) -> Option<Self> {
        let word = line.split(':').next()?.trim();
        match word {
            "public" => Some(Access::Public),
            "protected" => Some(Access::Protected),
            "private" => Some(Access::Private),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Access::Public => "Public",
            Access::Protected => "Protected",
            Access::Private => "Private",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_from_specifier() {
        assert_eq!(Access::from_specifier("public:"), Some(Access::Public));
        assert_eq!(Access::from_specifier("protected:"), Some(Access::Protected));
        assert_eq!(Access::from_specifier("private: // internal"), Some(Access::Private));
        assert_eq!(Access::from_specifier("publicity:"), None);
    }

    #[test]
    fn documentation_requires_a_comment_somewhere() {
        let mut decl = Declaration::new(DeclKind::Class, "UFoo".into(), vec![], vec![]);
        assert!(!decl.has_documentation());

        decl.functions.push(Function {
            name: "Tick".into(),
            macro_text: None,
            declaration: "void Tick();".into(),
            comments: vec!["// Ticks".into()],
            access: Access::Public,
        });
        assert!(decl.has_documentation());
        assert!(decl.has_documented_functions());
        assert!(!decl.has_documented_properties());
    }

    #[test]
    fn of_kind_keeps_source_order() {
        let mut file = FileInfo::new("a/B.h", "B.h");
        file.declarations.push(Declaration::new(DeclKind::Struct, "FOne".into(), vec![], vec![]));
        file.declarations.push(Declaration::new(DeclKind::Class, "UTwo".into(), vec![], vec![]));
        file.declarations.push(Declaration::new(DeclKind::Struct, "FThree".into(), vec![], vec![]));
        let names: Vec<_> = file.of_kind(DeclKind::Struct).map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["FOne", "FThree"]);
    }
}
