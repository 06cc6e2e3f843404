//! Line classifier — maps one trimmed header line to a [`Kind`].
//!
//! Rules are evaluated in a fixed priority and the first match wins. The only
//! context is the previous line ([`Lookback`]) and whether an enum body is
//! open, which is enough to treat block comments and split declarations as
//! runs without a tokenizer.

use regex::Regex;
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

static RE_FORWARD_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(class|struct|enum)\b.*;$").unwrap());

static RE_OPEN_SKIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\s*(if|ifdef|ifndef)\b").unwrap());

static RE_CLOSE_SKIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\s*endif\b").unwrap());

static RE_CLASS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^class\b").unwrap());

static RE_STRUCT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^struct\b").unwrap());

static RE_ENUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^enum\b").unwrap());

static RE_ACCESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(public|protected|private)\s*:").unwrap());

const COPYRIGHT_MARKER: &str = "Copyright";

const CLASS_MACROS: &[&str] = &["UCLASS", "UINTERFACE"];
const STRUCT_MACROS: &[&str] = &["USTRUCT"];
const ENUM_MACROS: &[&str] = &["UENUM"];
const PROPERTY_MACROS: &[&str] = &["UPROPERTY"];
const FUNCTION_MACROS: &[&str] = &["UFUNCTION"];

/// Semantic kind of a single line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Kind {
    #[default]
    Empty,
    Comment,
    /// `*/` closing a block comment: ends the run without adding to it
    CommentEnd,
    OpenSkip,
    CloseSkip,
    ClassHeader,
    StructHeader,
    EnumHeader,
    EnumMember,
    PropertyMacro,
    Property,
    FunctionMacro,
    Function,
    AccessModifier,
    OpenScope,
    CloseScope,
    /// Bare `}` closing an inline body
    CloseBlock,
}

impl Kind {
    pub fn is_scope_token(self) -> bool {
        matches!(self, Kind::OpenScope | Kind::CloseScope | Kind::CloseBlock)
    }

    fn continues_runs(self) -> bool {
        matches!(
            self,
            Kind::PropertyMacro | Kind::Property | Kind::FunctionMacro | Kind::Function
        )
    }
}

/// What the classifier remembers about the previous line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lookback {
    pub kind: Kind,
    /// The previous line left something unfinished: a block comment, a macro
    /// argument list or a declaration without its terminator.
    pub open: bool,
    /// Unclosed `(` count of an open macro run
    pub parens: isize,
}

impl Lookback {
    /// Lookback for `line` once it has been classified as `kind`.
    pub fn after(line: &str, kind: Kind, previous: Lookback) -> Self {
        let continued = previous.open && previous.kind == kind;
        let parens = match kind {
            Kind::PropertyMacro | Kind::FunctionMacro if continued => {
                previous.parens + paren_balance(line)
            }
            Kind::PropertyMacro | Kind::FunctionMacro => paren_balance(line),
            _ => 0,
        };
        let open = match kind {
            Kind::Comment if continued => !line.contains("*/"),
            Kind::Comment => match line.strip_prefix("/*") {
                Some(rest) => !rest.contains("*/"),
                None => false,
            },
            Kind::PropertyMacro | Kind::FunctionMacro => parens > 0,
            Kind::Property | Kind::Function => !is_terminated(line),
            _ => false,
        };
        Self { kind, open, parens }
    }

    /// True when `kind` would extend the run the previous line left open.
    pub fn continues(&self, kind: Kind) -> bool {
        self.open && self.kind == kind && kind.continues_runs()
    }
}

/// Classify one trimmed line.
pub fn classify(line: &str, previous: Lookback, inside_enum: bool) -> Kind {
    // 1. Blank or copyright banner
    if line.is_empty() || line.contains(COPYRIGHT_MARKER) {
        return Kind::Empty;
    }

    // 2. Forward declaration
    if RE_FORWARD_DECL.is_match(line) {
        return Kind::Empty;
    }

    // 3. Conditional compilation, ahead of comments
    if RE_OPEN_SKIP.is_match(line) {
        return Kind::OpenSkip;
    }
    if RE_CLOSE_SKIP.is_match(line) {
        return Kind::CloseSkip;
    }

    // 4. Inside a block comment nothing else applies
    if previous.kind == Kind::Comment && previous.open {
        if line.starts_with("*/") {
            return Kind::CommentEnd;
        }
        return Kind::Comment;
    }

    // 5. Scope tokens, before `};` can pass for a property
    match strip_trailing_comment(line) {
        "{" => return Kind::OpenScope,
        "};" => return Kind::CloseScope,
        "}" => return Kind::CloseBlock,
        _ => {}
    }

    if line.starts_with("//") || line.starts_with("/*") {
        return Kind::Comment;
    }

    // 6. Type headers, macro form first
    if starts_with_macro(line, CLASS_MACROS) || RE_CLASS.is_match(line) {
        return Kind::ClassHeader;
    }
    if starts_with_macro(line, STRUCT_MACROS) || RE_STRUCT.is_match(line) {
        return Kind::StructHeader;
    }
    if starts_with_macro(line, ENUM_MACROS) || RE_ENUM.is_match(line) {
        return Kind::EnumHeader;
    }

    // 7. Enumerators, only once the header rules had their chance
    if inside_enum {
        return Kind::EnumMember;
    }

    // 8-9. Declaration runs, then macros, then bare declarations
    if previous.continues(previous.kind) {
        return previous.kind;
    }
    if starts_with_macro(line, PROPERTY_MACROS) {
        return Kind::PropertyMacro;
    }
    if is_property(line) {
        return Kind::Property;
    }
    if starts_with_macro(line, FUNCTION_MACROS) {
        return Kind::FunctionMacro;
    }
    if is_function(line) {
        return Kind::Function;
    }

    // 10. Access specifier
    if RE_ACCESS.is_match(line) {
        return Kind::AccessModifier;
    }

    Kind::Empty
}

/// True for `UCLASS(...)`, `USTRUCT(...)`, `UENUM(...)` and `UINTERFACE(...)`.
pub fn is_reflection_header(line: &str) -> bool {
    starts_with_macro(line, CLASS_MACROS)
        || starts_with_macro(line, STRUCT_MACROS)
        || starts_with_macro(line, ENUM_MACROS)
}

/// Net `{` minus `}` on a line.
pub fn brace_balance(line: &str) -> isize {
    count_balance(line, '{', '}')
}

fn paren_balance(line: &str) -> isize {
    count_balance(line, '(', ')')
}

fn count_balance(line: &str, open: char, close: char) -> isize {
    line.chars().fold(0, |acc, c| {
        if c == open {
            acc + 1
        } else if c == close {
            acc - 1
        } else {
            acc
        }
    })
}

/// `}; // EColor` → `};`
fn strip_trailing_comment(line: &str) -> &str {
    match line.find("//") {
        Some(at) => line[..at].trim_end(),
        None => line,
    }
}

fn starts_with_macro(line: &str, macros: &[&str]) -> bool {
    macros.iter().any(|m| {
        line.strip_prefix(m)
            .is_some_and(|rest| rest.trim_start().starts_with('('))
    })
}

fn is_terminated(line: &str) -> bool {
    line.ends_with(';') || line.ends_with('}')
}

fn is_property(line: &str) -> bool {
    !line.contains('(') && line.ends_with(';')
}

fn is_function(line: &str) -> bool {
    let Some(open) = line.find('(') else {
        return false;
    };
    let words = line.split_whitespace().count();
    if line[open..].contains(')') {
        line.ends_with(';') || words >= 2
    } else {
        // `void Foo(int32 A,` opens a declaration run
        words >= 2
    }
}
