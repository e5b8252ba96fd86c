//! Source parsing on top of swc
//!
//! Each input file is parsed into its own source map. The resulting spans are
//! converted back into file-relative offsets and `line:column` positions for
//! call graph output.

use std::sync::OnceLock;

use swc_common::sync::Lrc;
use swc_common::{BytePos, FileName, SourceMap, Span, Spanned};
use swc_ecma_parser::{EsSyntax, Syntax, TsSyntax, parse_file_as_module};

pub use swc_ecma_ast::{EsVersion, Module};

use crate::program::Position;

/// Source dialect, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    JavaScript,
    TypeScript,
    Jsx,
    Tsx,
}

impl Language {
    pub fn is_typescript(self) -> bool {
        matches!(self, Language::TypeScript | Language::Tsx)
    }

    /// Plain `.js` files accept JSX too, since React code rarely uses `.jsx`.
    fn syntax(self) -> Syntax {
        match self {
            Language::JavaScript | Language::Jsx => Syntax::Es(EsSyntax {
                jsx: true,
                decorators: true,
                ..Default::default()
            }),
            Language::TypeScript => Syntax::Typescript(TsSyntax {
                decorators: true,
                ..Default::default()
            }),
            Language::Tsx => Syntax::Typescript(TsSyntax {
                tsx: true,
                decorators: true,
                ..Default::default()
            }),
        }
    }
}

pub fn detect_language(filename: &str) -> Language {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();

    match ext.as_str() {
        "ts" | "mts" | "cts" => Language::TypeScript,
        "tsx" => Language::Tsx,
        "jsx" => Language::Jsx,
        _ => Language::JavaScript,
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message} at {line}:{column}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    /// File-relative byte range of the offending token.
    pub range: std::ops::Range<u32>,
    pub message: String,
}

impl ParseError {
    fn at(source_map: &SourceMap, start: BytePos, span: Span, message: String) -> Self {
        let loc = source_map.lookup_char_pos(span.lo);
        Self {
            line: loc.line,
            column: loc.col_display,
            range: span.lo.0.saturating_sub(start.0)..span.hi.0.saturating_sub(start.0),
            message,
        }
    }
}

/// Output of a single parse. `module` is `None` when the parser could not
/// recover; `errors` then ends with the fatal error.
#[derive(Debug)]
pub struct ParseResult {
    pub module: Option<Module>,
    pub errors: Vec<ParseError>,
    /// Byte position of the file's first character in the source map the
    /// module's spans refer to.
    pub start_pos: BytePos,
}

#[derive(Debug, Clone, Copy)]
pub struct Parser {
    language: Language,
}

impl Parser {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn for_file(filename: &str) -> Self {
        Self::new(detect_language(filename))
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn parse(&self, filename: &str, code: &str) -> ParseResult {
        let source_map: Lrc<SourceMap> = Default::default();
        let fm = source_map.new_source_file(
            FileName::Custom(filename.to_string()).into(),
            code.to_string(),
        );
        let start_pos = fm.start_pos;

        let mut recovered = Vec::new();
        let result = parse_file_as_module(
            &fm,
            self.language.syntax(),
            EsVersion::latest(),
            None,
            &mut recovered,
        );

        let mut errors: Vec<ParseError> = recovered
            .iter()
            .map(|e| ParseError::at(&source_map, start_pos, e.span(), e.kind().msg().to_string()))
            .collect();

        let module = match result {
            Ok(module) => Some(module),
            Err(fatal) => {
                errors.push(ParseError::at(
                    &source_map,
                    start_pos,
                    fatal.span(),
                    fatal.kind().msg().to_string(),
                ));
                None
            }
        };

        ParseResult {
            module,
            errors,
            start_pos,
        }
    }
}

/// A parsed input file together with the source it came from.
pub struct ParsedFile {
    filename: String,
    language: Language,
    source: String,
    module: Option<Module>,
    errors: Vec<ParseError>,
    start_pos: BytePos,
    line_starts: OnceLock<Vec<u32>>,
}

impl std::fmt::Debug for ParsedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedFile")
            .field("filename", &self.filename)
            .field("language", &self.language)
            .field("has_module", &self.module.is_some())
            .field("error_count", &self.errors.len())
            .finish()
    }
}

impl ParsedFile {
    pub fn from_source(filename: &str, source: &str) -> Self {
        let parser = Parser::for_file(filename);
        let result = parser.parse(filename, source);

        Self {
            filename: filename.to_string(),
            language: parser.language(),
            source: source.to_string(),
            module: result.module,
            errors: result.errors,
            start_pos: result.start_pos,
            line_starts: OnceLock::new(),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn module(&self) -> Option<&Module> {
        self.module.as_ref()
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Byte offset of a span position from the start of this file.
    pub fn offset(&self, pos: BytePos) -> u32 {
        pos.0.saturating_sub(self.start_pos.0)
    }

    /// Line (1-based) and column (0-based) of a byte offset. Columns count
    /// UTF-16 code units, as JavaScript tooling does.
    pub fn position(&self, offset: u32) -> Position {
        let starts = self.line_starts.get_or_init(|| line_starts(&self.source));
        let line_index = starts.partition_point(|&start| start <= offset).max(1) - 1;
        let line_start = starts[line_index];
        let column = self
            .source
            .get(line_start as usize..offset as usize)
            .map(|prefix| prefix.encode_utf16().count())
            .unwrap_or((offset - line_start) as usize);
        Position {
            line: line_index + 1,
            column,
        }
    }
}

fn line_starts(source: &str) -> Vec<u32> {
    std::iter::once(0)
        .chain(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i as u32 + 1),
        )
        .collect()
}
