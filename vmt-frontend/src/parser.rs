//! VM command parser
//! 
//! Classifies each token line produced by the lexer into a `Command`,
//! checking arity and numeric operands. Any malformed line is reported as a
//! `CompilerError::ParseError` pointing at the offending token.

use crate::lexer::{Lexer, Token};
use log::trace;
use vmt_common::{ArithmeticOp, Command, CompilerError, Segment, SourceLocation};

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    filename: String,
    failed: bool,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, filename: &str) -> Self {
        Self {
            lexer: Lexer::new(source),
            filename: filename.to_string(),
            failed: false,
        }
    }

    fn location(&self, line: u32, column: u32) -> SourceLocation {
        SourceLocation::new(&self.filename, line, column)
    }

    /// Classify one non-empty token line
    pub fn parse_line(&self, line: u32, tokens: &[Token<'_>]) -> Result<Command, CompilerError> {
        let Some((head, args)) = tokens.split_first() else {
            return Err(CompilerError::parse_error("empty command", self.location(line, 1)));
        };

        if let Some(op) = ArithmeticOp::from_name(head.text) {
            self.expect_arity(line, head, args, 0)?;
            return Ok(Command::Arithmetic(op));
        }

        match head.text {
            "push" | "pop" => {
                self.expect_arity(line, head, args, 2)?;
                let segment = Segment::from_name(args[0].text).ok_or_else(|| {
                    CompilerError::parse_error(
                        format!("unknown segment '{}'", args[0].text),
                        self.location(line, args[0].column),
                    )
                })?;
                let index = self.parse_number(line, &args[1])?;
                if head.text == "push" {
                    Ok(Command::Push { segment, index })
                } else if segment == Segment::Constant {
                    Err(CompilerError::parse_error(
                        "cannot pop into the constant segment",
                        self.location(line, args[0].column),
                    ))
                } else {
                    Ok(Command::Pop { segment, index })
                }
            }
            "label" => {
                self.expect_arity(line, head, args, 1)?;
                Ok(Command::Label(self.parse_name(line, &args[0])?))
            }
            "goto" => {
                self.expect_arity(line, head, args, 1)?;
                Ok(Command::Goto(self.parse_name(line, &args[0])?))
            }
            "if-goto" => {
                self.expect_arity(line, head, args, 1)?;
                Ok(Command::IfGoto(self.parse_name(line, &args[0])?))
            }
            "function" => {
                self.expect_arity(line, head, args, 2)?;
                Ok(Command::Function {
                    name: self.parse_name(line, &args[0])?,
                    n_locals: self.parse_number(line, &args[1])?,
                })
            }
            "call" => {
                self.expect_arity(line, head, args, 2)?;
                Ok(Command::Call {
                    name: self.parse_name(line, &args[0])?,
                    n_args: self.parse_number(line, &args[1])?,
                })
            }
            "return" => {
                self.expect_arity(line, head, args, 0)?;
                Ok(Command::Return)
            }
            other => Err(CompilerError::parse_error(
                format!("unknown command '{}'", other),
                self.location(line, head.column),
            )),
        }
    }

    fn expect_arity(
        &self,
        line: u32,
        head: &Token<'_>,
        args: &[Token<'_>],
        expected: usize,
    ) -> Result<(), CompilerError> {
        if args.len() == expected {
            return Ok(());
        }
        let column = args.get(expected).map_or(head.column, |t| t.column);
        Err(CompilerError::parse_error(
            format!(
                "'{}' expects {} operand{}, found {}",
                head.text,
                expected,
                if expected == 1 { "" } else { "s" },
                args.len()
            ),
            self.location(line, column),
        ))
    }

    /// Label and function names; `$` is left for generated labels
    fn parse_name(&self, line: u32, token: &Token<'_>) -> Result<String, CompilerError> {
        if token.text.contains('$') {
            return Err(CompilerError::parse_error(
                format!("'$' is not allowed in name '{}'", token.text),
                self.location(line, token.column),
            ));
        }
        Ok(token.text.to_string())
    }

    fn parse_number(&self, line: u32, token: &Token<'_>) -> Result<u16, CompilerError> {
        token.text.parse::<u16>().map_err(|_| {
            CompilerError::parse_error(
                format!("expected a non-negative 16-bit integer, found '{}'", token.text),
                self.location(line, token.column),
            )
        })
    }
}

impl<'a> Iterator for Parser<'a> {
    type Item = Result<Command, CompilerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let (line, tokens) = self.lexer.next()?;
        let result = self.parse_line(line, &tokens);
        match &result {
            Ok(cmd) => trace!("{}:{}: {}", self.filename, line, cmd),
            Err(_) => self.failed = true,
        }
        Some(result)
    }
}
