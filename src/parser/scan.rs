//! Scope stack and assembly switch — line-by-line state machine.
//!
//! A [`Scanner`] owns every piece of per-file state: the growing declaration
//! list, the stack of open scopes (indices into that list), the pending
//! comment run and macro stashes, the skipper and the one-line lookback.
//! Nothing is shared between files.

use super::classify::{self, Kind, Lookback};
use super::extract;
use super::skip::Skipper;
use super::ScanOptions;
use crate::model::*;

/// One open class/struct/enum body.
#[derive(Debug)]
struct Frame {
    index: usize,
    access: Access,
    /// Brace depth inside this declaration: 0 before its `{`, 1 in the body,
    /// 2 and more inside inline function bodies.
    depth: usize,
}

/// The record a declaration run keeps appending to.
#[derive(Debug, Clone, Copy)]
enum RunTarget {
    Property { decl: usize, slot: usize },
    Function { decl: usize, slot: usize },
}

pub struct Scanner<'a> {
    options: &'a ScanOptions,
    declarations: Vec<Declaration>,
    scopes: Vec<Frame>,
    comments: Vec<String>,
    property_macro: Option<String>,
    function_macro: Option<String>,
    run: Option<RunTarget>,
    skipper: Skipper,
    lookback: Lookback,
}

impl<'a> Scanner<'a> {
    pub fn new(options: &'a ScanOptions) -> Self {
        Self {
            options,
            declarations: Vec::new(),
            scopes: Vec::new(),
            comments: Vec::new(),
            property_macro: None,
            function_macro: None,
            run: None,
            skipper: Skipper::default(),
            lookback: Lookback::default(),
        }
    }

    /// Declarations collected so far, in encounter order.
    pub fn finish(self) -> Vec<Declaration> {
        self.declarations
    }

    pub fn feed(&mut self, raw: &str) {
        let line = raw.trim();
        if self.options.ignores_line(line) {
            return;
        }

        let kind = classify::classify(line, self.lookback, self.inside_enum());

        if self.skipper.consume(line, kind) {
            if kind == Kind::OpenSkip {
                self.comments.clear();
            }
            return;
        }

        // Inline bodies only matter for their braces
        if self.in_nested_body() && !kind.is_scope_token() {
            self.adjust_depth(line);
            self.comments.clear();
            self.lookback = Lookback::default();
            self.run = None;
            return;
        }

        let continues = self.lookback.continues(kind);

        match kind {
            Kind::Empty => {
                if self.awaiting_body() && (line.starts_with(':') || line.starts_with(',')) {
                    self.extend_parents(line);
                }
                self.comments.clear();
            }
            Kind::Comment => self.comments.push(line.to_string()),
            Kind::CommentEnd => {}
            Kind::OpenSkip | Kind::CloseSkip => {}
            Kind::ClassHeader => self.open_declaration(line, DeclKind::Class),
            Kind::StructHeader => self.open_declaration(line, DeclKind::Struct),
            Kind::EnumHeader => self.open_declaration(line, DeclKind::Enum),
            Kind::EnumMember => self.record_enum_member(line),
            Kind::PropertyMacro => stash(&mut self.property_macro, line, continues),
            Kind::FunctionMacro => stash(&mut self.function_macro, line, continues),
            Kind::Property | Kind::Function if continues => self.continue_run(line),
            Kind::Property => self.record_property(line),
            Kind::Function => self.record_function(line),
            Kind::AccessModifier => {
                if let (Some(frame), Some(access)) =
                    (self.scopes.last_mut(), Access::from_specifier(line))
                {
                    frame.access = access;
                }
            }
            Kind::OpenScope => {
                self.comments.clear();
                if let Some(frame) = self.scopes.last_mut() {
                    frame.depth += 1;
                }
            }
            Kind::CloseBlock => {
                if let Some(frame) = self.scopes.last_mut() {
                    frame.depth = frame.depth.saturating_sub(1);
                }
            }
            Kind::CloseScope => {
                self.comments.clear();
                self.close_scope();
            }
        }

        self.lookback = Lookback::after(line, kind, self.lookback);
        if !self.lookback.open {
            self.run = None;
        }
    }

    fn inside_enum(&self) -> bool {
        self.scopes
            .last()
            .is_some_and(|f| self.declarations[f.index].kind == DeclKind::Enum)
    }

    fn in_nested_body(&self) -> bool {
        self.scopes.last().is_some_and(|f| f.depth >= 2)
    }

    /// Header seen, `{` not yet.
    fn awaiting_body(&self) -> bool {
        self.scopes
            .last()
            .is_some_and(|f| f.depth == 0 && self.declarations[f.index].kind != DeclKind::Enum)
    }

    fn open_declaration(&mut self, line: &str, kind: DeclKind) {
        // UCLASS(...) and friends: the real header follows
        if classify::is_reflection_header(line) {
            return;
        }

        let naming = &self.options.naming;
        let (name, parents) = match kind {
            DeclKind::Enum => (extract::extract_enum_name(line, naming), Vec::new()),
            DeclKind::Class | DeclKind::Struct => extract::extract_type_info(line, naming),
        };
        let comments = std::mem::take(&mut self.comments);
        self.property_macro = None;
        self.function_macro = None;

        self.declarations
            .push(Declaration::new(kind, name, parents, comments));
        let access = match kind {
            DeclKind::Enum => Access::Public,
            DeclKind::Class | DeclKind::Struct => Access::Private,
        };
        self.scopes.push(Frame {
            index: self.declarations.len() - 1,
            access,
            depth: classify::brace_balance(line).max(0) as usize,
        });
    }

    fn extend_parents(&mut self, line: &str) {
        let parents = extract::extract_parents(line, &self.options.naming);
        if let Some(frame) = self.scopes.last() {
            self.declarations[frame.index].parents.extend(parents);
        }
    }

    fn close_scope(&mut self) {
        match self.scopes.last_mut() {
            Some(frame) if frame.depth >= 2 => frame.depth -= 1,
            Some(_) => {
                self.scopes.pop();
            }
            None => {}
        }
    }

    fn record_enum_member(&mut self, line: &str) {
        let Some(frame) = self.scopes.last() else {
            return;
        };
        let property = Property {
            macro_text: None,
            declaration: line.to_string(),
            comments: std::mem::take(&mut self.comments),
            access: Access::Public,
        };
        self.property_macro = None;
        self.declarations[frame.index].properties.push(property);
    }

    fn record_property(&mut self, line: &str) {
        let Some(frame) = self.scopes.last() else {
            self.drop_pending();
            return;
        };
        let (decl, access) = (frame.index, frame.access);

        let property = Property {
            macro_text: self.property_macro.take(),
            declaration: line.to_string(),
            comments: std::mem::take(&mut self.comments),
            access,
        };
        self.function_macro = None;

        let properties = &mut self.declarations[decl].properties;
        properties.push(property);
        self.run = Some(RunTarget::Property {
            decl,
            slot: properties.len() - 1,
        });
        self.adjust_depth(line);
    }

    fn record_function(&mut self, line: &str) {
        let Some(frame) = self.scopes.last() else {
            self.drop_pending();
            return;
        };
        let (decl, access) = (frame.index, frame.access);

        let function = Function {
            name: extract::extract_function_name(line),
            macro_text: self.function_macro.take(),
            declaration: line.to_string(),
            comments: std::mem::take(&mut self.comments),
            access,
        };
        self.property_macro = None;

        let functions = &mut self.declarations[decl].functions;
        functions.push(function);
        self.run = Some(RunTarget::Function {
            decl,
            slot: functions.len() - 1,
        });
        self.adjust_depth(line);
    }

    /// Join a continuation line onto the record its run started.
    fn continue_run(&mut self, line: &str) {
        let declaration = match self.run {
            Some(RunTarget::Property { decl, slot }) => {
                &mut self.declarations[decl].properties[slot].declaration
            }
            Some(RunTarget::Function { decl, slot }) => {
                &mut self.declarations[decl].functions[slot].declaration
            }
            None => return,
        };
        declaration.push('\n');
        declaration.push_str(line);
        self.adjust_depth(line);
    }

    /// `void Tick() {` opens an inline body on the declaration line itself.
    fn adjust_depth(&mut self, line: &str) {
        let balance = classify::brace_balance(line);
        if let Some(frame) = self.scopes.last_mut() {
            frame.depth = (frame.depth as isize + balance).max(0) as usize;
        }
    }

    fn drop_pending(&mut self) {
        self.comments.clear();
        self.property_macro = None;
        self.function_macro = None;
    }
}

fn stash(slot: &mut Option<String>, line: &str, continues: bool) {
    if continues {
        if let Some(text) = slot.as_mut() {
            text.push('\n');
            text.push_str(line);
            return;
        }
    }
    *slot = Some(line.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(input: &str) -> Vec<Declaration> {
        let options = ScanOptions::default();
        let mut scanner = Scanner::new(&options);
        for line in input.lines() {
            scanner.feed(line);
        }
        scanner.finish()
    }

    #[test]
    fn consecutive_comments_form_one_block() {
        let decls = scan(
            "class UFoo : public UObject\n{\n// First line\n// Second line\nvoid Run();\n};\n",
        );
        assert_eq!(decls[0].functions[0].comments, ["// First line", "// Second line"]);
    }

    #[test]
    fn block_close_line_is_excluded_but_run_survives() {
        let decls = scan(
            "/**\n * Base class for tasks\n * Tickable\n */\nUCLASS(Abstract)\nclass MYMODULE_API UTask : public UObject\n{\n};\n",
        );
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "UTask");
        assert_eq!(
            decls[0].comments,
            ["/**", "* Base class for tasks", "* Tickable"]
        );
    }

    #[test]
    fn comment_run_does_not_survive_blank_line() {
        let decls = scan("class UFoo\n{\n// Orphaned\n\nvoid Run();\n};\n");
        assert!(decls[0].functions[0].comments.is_empty());
    }

    #[test]
    fn comment_run_dropped_by_unclassifiable_line() {
        let decls = scan("class UFoo\n{\n// About the body\nGENERATED_BODY()\nvoid Run();\n};\n");
        assert!(decls[0].functions[0].comments.is_empty());
    }

    #[test]
    fn class_header_with_export_macro() {
        let decls = scan("class MYMODULE_API UFoo : public UBar\n{\n};\n");
        assert_eq!(decls[0].kind, DeclKind::Class);
        assert_eq!(decls[0].name, "UFoo");
        assert_eq!(decls[0].parents, ["UBar"]);
    }

    #[test]
    fn struct_with_two_parents() {
        let decls = scan("struct FExample : public FBase1, public FBase2\n{\n};\n");
        assert_eq!(decls[0].kind, DeclKind::Struct);
        assert_eq!(decls[0].parents, ["FBase1", "FBase2"]);
    }

    #[test]
    fn parents_on_following_line() {
        let decls = scan("class UFoo\n: public UBar, public IBaz\n{\n};\n");
        assert_eq!(decls[0].parents, ["UBar", "IBaz"]);
    }

    #[test]
    fn enum_members_are_public_properties() {
        let decls = scan(
            "UENUM(BlueprintType)\nenum class EColor : uint8\n{\n// Warm\nRed,\nGreen UMETA(DisplayName = \"Green\"),\nBlue\n};\nclass UAfter\n{\n};\n",
        );
        assert_eq!(decls.len(), 2);
        let color = &decls[0];
        assert_eq!(color.kind, DeclKind::Enum);
        assert_eq!(color.name, "EColor");
        assert!(color.parents.is_empty());
        let members: Vec<_> = color.properties.iter().map(|p| p.declaration.as_str()).collect();
        assert_eq!(members, ["Red,", "Green UMETA(DisplayName = \"Green\"),", "Blue"]);
        assert!(color.properties.iter().all(|p| p.access == Access::Public));
        assert!(color.properties.iter().all(|p| p.macro_text.is_none()));
        assert_eq!(color.properties[0].comments, ["// Warm"]);
        assert!(color.functions.is_empty());

        assert_eq!(decls[1].kind, DeclKind::Class);
    }

    #[test]
    fn property_macro_merges_with_declaration() {
        let decls = scan(
            "class UFoo\n{\npublic:\n// How fast\nUPROPERTY(EditAnywhere, Category = \"Task\")\nfloat Speed = 1.f;\n};\n",
        );
        let speed = &decls[0].properties[0];
        assert_eq!(speed.macro_text.as_deref(), Some("UPROPERTY(EditAnywhere, Category = \"Task\")"));
        assert_eq!(speed.declaration, "float Speed = 1.f;");
        assert_eq!(speed.comments, ["// How fast"]);
        assert_eq!(speed.access, Access::Public);
    }

    #[test]
    fn multi_line_macro_is_stashed_whole() {
        let decls = scan(
            "class UFoo\n{\nUPROPERTY(EditAnywhere,\nCategory = \"Task\")\nint32 Count;\n};\n",
        );
        let count = &decls[0].properties[0];
        assert_eq!(
            count.macro_text.as_deref(),
            Some("UPROPERTY(EditAnywhere,\nCategory = \"Task\")")
        );
        assert_eq!(count.declaration, "int32 Count;");
    }

    #[test]
    fn function_macro_and_name() {
        let decls = scan(
            "class UFoo\n{\n// Runs it\nUFUNCTION(BlueprintCallable)\nvirtual bool Enter();\n};\n",
        );
        let enter = &decls[0].functions[0];
        assert_eq!(enter.name, "Enter");
        assert_eq!(enter.macro_text.as_deref(), Some("UFUNCTION(BlueprintCallable)"));
        assert_eq!(enter.declaration, "virtual bool Enter();");
        assert_eq!(enter.access, Access::Private);
    }

    #[test]
    fn declaration_run_is_joined() {
        let decls = scan(
            "class UFoo\n{\nvoid Configure(int32 A,\nint32 B);\nint32 C;\n};\n",
        );
        assert_eq!(decls[0].functions.len(), 1);
        assert_eq!(decls[0].functions[0].name, "Configure");
        assert_eq!(decls[0].functions[0].declaration, "void Configure(int32 A,\nint32 B);");
        assert_eq!(decls[0].properties.len(), 1);
        assert_eq!(decls[0].properties[0].declaration, "int32 C;");
    }

    #[test]
    fn function_inside_skip_region_is_dropped() {
        let decls = scan(
            "class UFoo\n{\n#if WITH_EDITOR\nvoid EditorOnly();\n#endif\nvoid Runtime();\n};\n",
        );
        let names: Vec<_> = decls[0].functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Runtime"]);
    }

    #[test]
    fn skip_region_hides_scope_tokens() {
        let decls = scan(
            "#if WITH_EDITOR\nstruct FEditorData\n{\nbool bExpanded = false;\n};\n#endif\nclass UFoo\n{\nint32 X;\n};\n",
        );
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "UFoo");
        assert_eq!(decls[0].properties.len(), 1);
    }

    #[test]
    fn access_levels_follow_specifiers() {
        let decls = scan(
            "class UFoo\n{\nint32 Hidden;\npublic:\nvoid Open();\nprotected:\nvoid Guarded();\n};\n",
        );
        let foo = &decls[0];
        assert_eq!(foo.properties[0].access, Access::Private);
        assert_eq!(foo.functions[0].access, Access::Public);
        assert_eq!(foo.functions[1].access, Access::Protected);
    }

    #[test]
    fn nested_scope_restores_outer_access() {
        let decls = scan(
            "class UOuter\n{\npublic:\nstruct FInner\n{\nint32 A;\n};\nvoid AfterInner();\n};\n",
        );
        assert_eq!(decls.len(), 2);
        let (outer, inner) = (&decls[0], &decls[1]);
        assert_eq!(inner.name, "FInner");
        assert_eq!(inner.properties[0].access, Access::Private);
        assert_eq!(outer.functions[0].name, "AfterInner");
        assert_eq!(outer.functions[0].access, Access::Public);
        assert!(outer.properties.is_empty());
    }

    #[test]
    fn inline_bodies_produce_no_records() {
        let decls = scan(
            "class UFoo\n{\npublic:\nvoid Tick()\n{\nDoStuff();\nint32 Local = 0;\n}\nvoid Inline() {\nOther();\n}\nvoid After();\n};\n",
        );
        let names: Vec<_> = decls[0].functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Tick", "Inline", "After"]);
        assert!(decls[0].properties.is_empty());
    }

    #[test]
    fn inline_body_braces_on_code_lines() {
        let decls = scan(
            "class UFoo\n{\npublic:\nvoid Tick()\n{\nif (bReady) {\nRun();\n}\nint32 Local = 0;\n}\nvoid After();\n};\n",
        );
        let names: Vec<_> = decls[0].functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Tick", "After"]);
        assert!(decls[0].properties.is_empty());
    }

    #[test]
    fn macro_with_nested_parens_keeps_comment() {
        let decls = scan(
            "class UFoo\n{\n// Speed doc\nUPROPERTY(EditAnywhere, meta = (\nClampMin = \"0\"),\nCategory = \"Task\")\nfloat Speed;\n};\n",
        );
        let speed = &decls[0].properties[0];
        assert_eq!(
            speed.macro_text.as_deref(),
            Some("UPROPERTY(EditAnywhere, meta = (\nClampMin = \"0\"),\nCategory = \"Task\")")
        );
        assert_eq!(speed.declaration, "float Speed;");
        assert_eq!(speed.comments, ["// Speed doc"]);
    }

    #[test]
    fn enum_close_with_trailing_comment() {
        let decls = scan("enum class EColor\n{\nRed,\nBlue\n}; // EColor\nclass UAfter\n{\nint32 X;\n};\n");
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].properties.len(), 2);
        assert_eq!(decls[1].name, "UAfter");
        assert_eq!(decls[1].properties.len(), 1);
    }

    #[test]
    fn close_scope_with_empty_stack_is_harmless() {
        let decls = scan("};\n}\nclass UFoo\n{\nvoid Run();\n};\n};\nstruct FBar\n{\nint32 X;\n};\n");
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].functions.len(), 1);
        assert_eq!(decls[1].name, "FBar");
        assert_eq!(decls[1].properties.len(), 1);
    }

    #[test]
    fn declarations_outside_scopes_are_dropped() {
        let decls = scan("// Free function\nvoid Free();\nint32 GlobalCount;\nclass UFoo\n{\n};\n");
        assert_eq!(decls.len(), 1);
        assert!(decls[0].comments.is_empty());
        assert!(decls[0].functions.is_empty());
    }

    #[test]
    fn macro_form_header_keeps_comment_for_real_header() {
        let decls = scan("// A struct\nUSTRUCT(BlueprintType)\nstruct FData\n{\n};\n");
        assert_eq!(decls[0].comments, ["// A struct"]);
    }

    #[test]
    fn ignored_prefix_lines_are_invisible() {
        let decls = scan("class UFoo\n{\n// Setup\n//~ Begin UObject Interface\nvoid Setup();\n};\n");
        assert_eq!(decls[0].functions[0].comments, ["// Setup"]);
    }

    #[test]
    fn records_keep_source_order() {
        let decls = scan("class UFoo\n{\nint32 B;\nvoid Z();\nint32 A;\nvoid Y();\n};\n");
        let props: Vec<_> = decls[0].properties.iter().map(|p| p.declaration.as_str()).collect();
        let funcs: Vec<_> = decls[0].functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(props, ["int32 B;", "int32 A;"]);
        assert_eq!(funcs, ["Z", "Y"]);
    }
}
