//! Conditional-compilation skipper.
//!
//! Everything between `#if`/`#ifdef`/`#ifndef` and the matching `#endif` is
//! left out of the model. Regions nest. An `#ifndef X` immediately followed by
//! `#define X` is an include guard and does not hide the file.

use super::classify::Kind;
use regex::Regex;
use std::sync::LazyLock;

static RE_IFNDEF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\s*ifndef\s+(\w+)").unwrap());

static RE_DEFINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\s*define\s+(\w+)\s*$").unwrap());

#[derive(Debug, Default)]
pub struct Skipper {
    depth: usize,
    /// Symbol of an outermost `#ifndef` that may turn out to be a guard
    guard: Option<String>,
}

impl Skipper {
    /// Feed one classified line. Returns true when the line must not reach
    /// the assembly switch.
    pub fn consume(&mut self, line: &str, kind: Kind) -> bool {
        if let Some(symbol) = self.guard.take() {
            let defines_guard = RE_DEFINE
                .captures(line)
                .is_some_and(|caps| caps[1] == symbol);
            if self.depth == 1 && defines_guard {
                self.depth = 0;
                return true;
            }
        }

        match kind {
            Kind::OpenSkip => {
                self.depth += 1;
                if self.depth == 1 {
                    self.guard = RE_IFNDEF.captures(line).map(|caps| caps[1].to_string());
                }
                true
            }
            Kind::CloseSkip => {
                self.depth = self.depth.saturating_sub(1);
                true
            }
            _ => self.is_skipping(),
        }
    }

    pub fn is_skipping(&self) -> bool {
        self.depth > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(skipper: &mut Skipper, lines: &[(&str, Kind)]) -> Vec<bool> {
        lines
            .iter()
            .map(|(line, kind)| skipper.consume(line, *kind))
            .collect()
    }

    #[test]
    fn simple_region() {
        let mut s = Skipper::default();
        let out = feed(
            &mut s,
            &[
                ("#if WITH_EDITOR", Kind::OpenSkip),
                ("void EditorOnly();", Kind::Function),
                ("#endif", Kind::CloseSkip),
                ("void Runtime();", Kind::Function),
            ],
        );
        assert_eq!(out, [true, true, true, false]);
        assert!(!s.is_skipping());
    }

    #[test]
    fn nested_regions_count_depth() {
        let mut s = Skipper::default();
        let out = feed(
            &mut s,
            &[
                ("#if WITH_EDITOR", Kind::OpenSkip),
                ("#if WITH_EDITORONLY_DATA", Kind::OpenSkip),
                ("#endif", Kind::CloseSkip),
                ("void StillHidden();", Kind::Function),
                ("#endif", Kind::CloseSkip),
                ("void Visible();", Kind::Function),
            ],
        );
        assert_eq!(out, [true, true, true, true, true, false]);
    }

    #[test]
    fn unmatched_close_is_ignored() {
        let mut s = Skipper::default();
        assert!(s.consume("#endif", Kind::CloseSkip));
        assert!(!s.is_skipping());
        assert!(!s.consume("int32 X;", Kind::Property));
    }

    #[test]
    fn include_guard_is_not_a_region() {
        let mut s = Skipper::default();
        let out = feed(
            &mut s,
            &[
                ("#ifndef MY_HEADER_H", Kind::OpenSkip),
                ("#define MY_HEADER_H", Kind::Empty),
                ("class UFoo", Kind::ClassHeader),
                ("#endif // MY_HEADER_H", Kind::CloseSkip),
            ],
        );
        assert_eq!(out, [true, true, false, true]);
        assert!(!s.is_skipping());
    }

    #[test]
    fn ifndef_without_define_still_skips() {
        let mut s = Skipper::default();
        let out = feed(
            &mut s,
            &[
                ("#ifndef UE_BUILD_SHIPPING", Kind::OpenSkip),
                ("void Debug();", Kind::Function),
                ("#define UE_BUILD_SHIPPING", Kind::Empty),
                ("#endif", Kind::CloseSkip),
            ],
        );
        assert_eq!(out, [true, true, true, true]);
    }
}
