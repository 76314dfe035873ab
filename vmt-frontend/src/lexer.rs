//! VM line lexer
//! 
//! VM code has no multi-line constructs, so lexing works one line at a time:
//! everything after `//` is dropped and the rest is split on whitespace.

/// A whitespace-delimited word together with its 1-based column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub column: u32,
}

/// Splits source text into non-empty token lines
pub struct Lexer<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines().enumerate(),
        }
    }

    /// Tokenize a single line, ignoring any trailing comment
    pub fn tokenize_line(line: &'a str) -> Vec<Token<'a>> {
        let code = match line.find("//") {
            Some(pos) => &line[..pos],
            None => line,
        };

        let mut tokens = Vec::new();
        let mut start: Option<usize> = None;
        for (i, ch) in code.char_indices() {
            if ch.is_whitespace() {
                if let Some(s) = start.take() {
                    tokens.push(Token { text: &code[s..i], column: s as u32 + 1 });
                }
            } else if start.is_none() {
                start = Some(i);
            }
        }
        if let Some(s) = start {
            tokens.push(Token { text: &code[s..], column: s as u32 + 1 });
        }
        tokens
    }
}

impl<'a> Iterator for Lexer<'a> {
    /// (1-based line number, tokens)
    type Item = (u32, Vec<Token<'a>>);

    fn next(&mut self) -> Option<Self::Item> {
        for (idx, line) in self.lines.by_ref() {
            let tokens = Self::tokenize_line(line);
            if !tokens.is_empty() {
                return Some((idx as u32 + 1, tokens));
            }
        }
        None
    }
}
