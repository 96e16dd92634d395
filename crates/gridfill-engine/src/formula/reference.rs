//! Cell and range reference tokens inside formula text.
//!
//! Only reference tokens are recognized; everything else in a formula is
//! copied through byte for byte. Handles:
//! - Cell references with optional `$` markers: `A1`, `$B$2`, `C$3`
//! - Ranges: `A1:B5`
//! - Sheet prefixes: `Data!A1`, `'Q1 Sales'!B2:B9`
//! - Ignores text inside string literals and function names such as `LOG10(`

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use crate::engine::CellCoord;

/// One `[$]COL[$]ROW` token.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct CellToken {
    pub row: usize,
    pub col: usize,
    pub row_abs: bool,
    pub col_abs: bool,
}

impl CellToken {
    pub fn relative(coord: CellCoord) -> Self {
        Self {
            row: coord.row,
            col: coord.col,
            row_abs: false,
            col_abs: false,
        }
    }

    pub fn coord(&self) -> CellCoord {
        CellCoord::new(self.row, self.col)
    }

    /// Same markers, new position.
    pub fn at(&self, row: usize, col: usize) -> Self {
        Self { row, col, ..*self }
    }

    pub fn is_relative(&self) -> bool {
        !self.row_abs && !self.col_abs
    }

    fn parse(text: &str) -> Option<Self> {
        let caps = cell_token_re().captures(text)?;
        let col = CellCoord::letters_to_col(&caps[2])?;
        let row = caps[4].parse::<usize>().ok()?.checked_sub(1)?;
        Some(Self {
            row,
            col,
            col_abs: !caps[1].is_empty(),
            row_abs: !caps[3].is_empty(),
        })
    }
}

impl fmt::Display for CellToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            if self.col_abs { "$" } else { "" },
            CellCoord::col_to_letters(self.col),
            if self.row_abs { "$" } else { "" },
            self.row + 1
        )
    }
}

/// Which sheet a reference points into.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum SheetScope {
    /// No prefix: the sheet holding the formula.
    Local,
    /// Explicit prefix; the name is stored unquoted.
    Sheet(String),
}

impl SheetScope {
    fn from_prefix(prefix: Option<&str>) -> Self {
        match prefix {
            None => SheetScope::Local,
            Some(raw) => match raw.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
                Some(quoted) => SheetScope::Sheet(quoted.replace("''", "'")),
                None => SheetScope::Sheet(raw.to_string()),
            },
        }
    }
}

impl fmt::Display for SheetScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetScope::Local => Ok(()),
            SheetScope::Sheet(name) => write!(f, "{}!", quote_sheet_name(name)),
        }
    }
}

/// Quote a sheet name when it is not a plain identifier.
pub fn quote_sheet_name(name: &str) -> String {
    let plain = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if plain {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "''"))
    }
}

/// A reference token found in a formula.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum Reference {
    Cell {
        sheet: SheetScope,
        cell: CellToken,
    },
    Range {
        sheet: SheetScope,
        start: CellToken,
        end: CellToken,
    },
}

/// Position of a cell token within its reference.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum RefPart {
    Single,
    Start,
    End,
}

impl Reference {
    pub fn sheet(&self) -> &SheetScope {
        match self {
            Reference::Cell { sheet, .. } | Reference::Range { sheet, .. } => sheet,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self.sheet(), SheetScope::Local)
    }

    /// Apply `f` to every cell token of a same-sheet reference. Returns the
    /// new text when something changed; foreign-sheet references are never
    /// touched.
    pub(crate) fn rewrite_local(
        &self,
        mut f: impl FnMut(RefPart, CellToken) -> CellToken,
    ) -> Option<String> {
        let rewritten = match self {
            Reference::Cell {
                sheet: SheetScope::Local,
                cell,
            } => Reference::Cell {
                sheet: SheetScope::Local,
                cell: f(RefPart::Single, *cell),
            },
            Reference::Range {
                sheet: SheetScope::Local,
                start,
                end,
            } => Reference::Range {
                sheet: SheetScope::Local,
                start: f(RefPart::Start, *start),
                end: f(RefPart::End, *end),
            },
            _ => return None,
        };
        (rewritten != *self).then(|| rewritten.to_string())
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Cell { sheet, cell } => write!(f, "{}{}", sheet, cell),
            Reference::Range { sheet, start, end } => write!(f, "{}{}:{}", sheet, start, end),
        }
    }
}

fn reference_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?:(?<sheet>'(?:[^']|'')+'|[A-Za-z_][A-Za-z0-9_.]*)!)?(?<start>\$?[A-Za-z]{1,3}\$?[0-9]+)(?::(?<end>\$?[A-Za-z]{1,3}\$?[0-9]+))?",
        )
        .expect("formula reference regex must compile")
    })
}

fn cell_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\$?)([A-Za-z]{1,3})(\$?)([0-9]+)$").expect("cell token regex must compile")
    })
}

/// A match is only a reference when it is not glued to surrounding
/// identifier text (`LOG10(`, `A1B`, `_A1`).
fn is_standalone(segment: &str, start: usize, end: usize) -> bool {
    let before = segment[..start].chars().next_back();
    let after = segment[end..].chars().next();
    let glued_before =
        before.is_some_and(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '$' | '!' | '\''));
    let glued_after =
        after.is_some_and(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '$' | '!' | '('));
    !glued_before && !glued_after
}

fn parse_match(caps: &regex::Captures<'_>) -> Option<Reference> {
    let sheet = SheetScope::from_prefix(caps.name("sheet").map(|m| m.as_str()));
    let start = CellToken::parse(caps.name("start")?.as_str())?;
    match caps.name("end") {
        Some(end) => Some(Reference::Range {
            sheet,
            start,
            end: CellToken::parse(end.as_str())?,
        }),
        None => Some(Reference::Cell { sheet, cell: start }),
    }
}

fn rewrite_segment<F>(segment: &str, rewrite: &mut F, out: &mut String)
where
    F: FnMut(&Reference) -> Option<String>,
{
    let mut last = 0;
    for caps in reference_re().captures_iter(segment) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if !is_standalone(segment, whole.start(), whole.end()) {
            continue;
        }
        let Some(reference) = parse_match(&caps) else {
            continue;
        };
        if let Some(replacement) = rewrite(&reference) {
            out.push_str(&segment[last..whole.start()]);
            out.push_str(&replacement);
            last = whole.end();
        }
    }
    out.push_str(&segment[last..]);
}

/// Rewrite every reference outside string literals. `rewrite` returns the
/// replacement text, or `None` to keep the token as written.
pub(crate) fn rewrite_references<F>(formula: &str, mut rewrite: F) -> String
where
    F: FnMut(&Reference) -> Option<String>,
{
    let bytes = formula.as_bytes();
    let mut out = String::with_capacity(formula.len());
    let mut seg_start = 0;
    let mut in_string = false;

    // Spreadsheet strings escape quotes by doubling them, so toggling on
    // every quote keeps `"a""b"` inside the literal.
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'"' {
            continue;
        }
        if in_string {
            out.push_str(&formula[seg_start..=i]);
            seg_start = i + 1;
        } else {
            rewrite_segment(&formula[seg_start..i], &mut rewrite, &mut out);
            seg_start = i;
        }
        in_string = !in_string;
    }

    if seg_start < formula.len() {
        if in_string {
            out.push_str(&formula[seg_start..]);
        } else {
            rewrite_segment(&formula[seg_start..], &mut rewrite, &mut out);
        }
    }

    out
}

/// Every reference in a formula, in order of appearance.
pub fn parse_references(formula: &str) -> Vec<Reference> {
    let mut refs = Vec::new();
    rewrite_references(formula, |reference| {
        refs.push(reference.clone());
        None
    });
    refs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cells_ranges_and_sheets() {
        let refs = parse_references("=SUM(A1:B$5)+Data!$C3+'Q1 ''Sales'''!D4:D9");
        assert_eq!(refs.len(), 3);
        assert_eq!(
            refs[0],
            Reference::Range {
                sheet: SheetScope::Local,
                start: CellToken::relative(CellCoord::new(0, 0)),
                end: CellToken {
                    row: 4,
                    col: 1,
                    row_abs: true,
                    col_abs: false
                },
            }
        );
        assert_eq!(refs[1].sheet(), &SheetScope::Sheet("Data".to_string()));
        assert_eq!(refs[2].sheet(), &SheetScope::Sheet("Q1 'Sales'".to_string()));
        assert_eq!(refs[2].to_string(), "'Q1 ''Sales'''!D4:D9");
    }

    #[test]
    fn test_function_names_and_identifiers_are_not_references() {
        assert!(parse_references("=LOG10(100)").is_empty());
        assert!(parse_references("=ATAN2(1, 2) + my_A1").is_empty());
        assert_eq!(parse_references("=LOG10(A2)").len(), 1);
    }

    #[test]
    fn test_string_literals_are_skipped() {
        let refs = parse_references(r#"=IF(A1="B2 and ""C3""", D4, "E5")"#);
        let text: Vec<String> = refs.iter().map(|r| r.to_string()).collect();
        assert_eq!(text, vec!["A1", "D4"]);
    }

    #[test]
    fn test_rewrite_keeps_untouched_text() {
        let out = rewrite_references(r#"=A1 & "A1" & B2"#, |r| match r {
            Reference::Cell { cell, .. } if cell.col == 0 => Some("Z9".to_string()),
            _ => None,
        });
        assert_eq!(out, r#"=Z9 & "A1" & B2"#);
    }

    #[test]
    fn test_rewrite_local_ignores_foreign_sheets() {
        let refs = parse_references("=Other!A1+A1");
        let shifted: Vec<Option<String>> = refs
            .iter()
            .map(|r| r.rewrite_local(|_, c| c.at(c.row + 1, c.col)))
            .collect();
        assert_eq!(shifted, vec![None, Some("A2".to_string())]);
    }

    #[test]
    fn test_quote_sheet_name() {
        assert_eq!(quote_sheet_name("Sheet1"), "Sheet1");
        assert_eq!(quote_sheet_name("Q1 Sales"), "'Q1 Sales'");
        assert_eq!(quote_sheet_name("2024"), "'2024'");
        assert_eq!(quote_sheet_name("O'Brien"), "'O''Brien'");
    }
}
