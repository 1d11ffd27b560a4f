//! Lexer boundary: token streams and semantic class resolution
//!
//! The pipeline consumes a token stream through the [`Lexer`] trait and never
//! performs lexical analysis itself. The one hard contract is that the
//! concatenated token texts reconstruct the input exactly, including
//! newlines; the splitter checks this before trusting any offsets.
//!
//! [`SyntectLexer`] binds syntect to the trait, tokenizing the whole file
//! with persistent parse state so multi-line tokens (strings, block
//! comments) keep their scope across newlines.

use syntect::parsing::{ParseState, ScopeStack, SyntaxSet};
use syntect::util::LinesWithEndings;

/// A lexer token: a semantic type tag plus the exact source text it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Dotted scope tag, e.g. `keyword.control.rust`. Resolved to a short
    /// class name via [`classify`].
    pub ttype: String,
    pub text: String,
}

impl Token {
    pub fn new(ttype: &str, text: impl Into<String>) -> Self {
        Self {
            ttype: ttype.to_string(),
            text: text.into(),
        }
    }
}

/// External lexer contract consumed by the pipeline.
pub trait Lexer {
    /// Tokenize the full text. Concatenating the returned token texts must
    /// equal `text` exactly.
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

/// Read-only scope-prefix table mapping token type tags to short semantic
/// class names. Constructed once; lookup collapses a dotted hierarchy to its
/// nearest known ancestor.
const CLASS_TABLE: &[(&str, &str)] = &[
    ("comment", "c"),
    ("string", "s"),
    ("constant.numeric", "m"),
    ("constant.language", "kc"),
    ("constant.character", "sc"),
    ("constant", "no"),
    ("keyword.operator", "o"),
    ("keyword", "k"),
    ("storage.type", "kt"),
    ("storage", "k"),
    ("entity.name.function", "nf"),
    ("entity.name.type", "nc"),
    ("entity.name.tag", "nt"),
    ("entity.name", "n"),
    ("variable.parameter", "nv"),
    ("variable", "nv"),
    ("support.function", "nb"),
    ("support.type", "kt"),
    ("punctuation", "p"),
    ("text", "n"),
];

/// Resolve a token type tag to its semantic class name.
///
/// Strips trailing `.segment`s until a known prefix matches; unrecognized
/// leaf types fall back to the generic name class `"n"`.
pub fn classify(ttype: &str) -> &'static str {
    let mut scope = ttype;
    loop {
        if let Some(&(_, class)) = CLASS_TABLE.iter().find(|&&(prefix, _)| prefix == scope) {
            return class;
        }
        match scope.rfind('.') {
            Some(idx) => scope = &scope[..idx],
            None => return "n",
        }
    }
}

/// Syntect-backed lexer
pub struct SyntectLexer {
    syntax_set: SyntaxSet,
    syntax_name: String,
}

impl SyntectLexer {
    /// Select a syntax by file extension, falling back to plain text.
    pub fn for_file(file_path: &str) -> Self {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let syntax_name = std::path::Path::new(file_path)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| syntax_set.find_syntax_by_extension(ext))
            .unwrap_or_else(|| syntax_set.find_syntax_plain_text())
            .name
            .clone();
        Self {
            syntax_set,
            syntax_name,
        }
    }

    /// Select a syntax by name or alias (e.g. "rust", "py").
    pub fn by_name(token: &str) -> Self {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let syntax_name = syntax_set
            .find_syntax_by_token(token)
            .unwrap_or_else(|| syntax_set.find_syntax_plain_text())
            .name
            .clone();
        Self {
            syntax_set,
            syntax_name,
        }
    }

    /// Plain-text lexer: every line is a single generic token.
    pub fn plain() -> Self {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let syntax_name = syntax_set.find_syntax_plain_text().name.clone();
        Self {
            syntax_set,
            syntax_name,
        }
    }

    fn top_scope(stack: &ScopeStack) -> String {
        stack
            .as_slice()
            .last()
            .map(|scope| scope.build_string())
            .unwrap_or_else(|| "text".to_string())
    }
}

impl Lexer for SyntectLexer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let syntax = self
            .syntax_set
            .find_syntax_by_name(&self.syntax_name)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut parse_state = ParseState::new(syntax);
        let mut stack = ScopeStack::new();
        let mut tokens: Vec<Token> = Vec::new();

        for line in LinesWithEndings::from(text) {
            let ops = match parse_state.parse_line(line, &self.syntax_set) {
                Ok(ops) => ops,
                Err(_) => {
                    // Keep the reconstruction contract even when parsing
                    // chokes on a line: emit it as one generic token.
                    tokens.push(Token::new("text", line));
                    continue;
                }
            };

            let mut last = 0usize;
            for (offset, op) in &ops {
                if *offset > last {
                    tokens.push(Token::new(&Self::top_scope(&stack), &line[last..*offset]));
                    last = *offset;
                }
                let _ = stack.apply(op);
            }
            if last < line.len() {
                tokens.push(Token::new(&Self::top_scope(&stack), &line[last..]));
            }
        }

        tokens
    }
}
