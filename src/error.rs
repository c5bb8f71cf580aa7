//! Error types for markup parsing

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Parse error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },
}

impl ParseError {
    /// Byte range the error points at
    pub fn span(&self) -> &Span {
        match self {
            ParseError::Syntax { span, .. } => span,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        match self {
            ParseError::Syntax {
                span,
                message,
                expected,
            } => {
                let expected_str = if expected.is_empty() {
                    String::new()
                } else {
                    format!("\nExpected: {}", expected.join(", "))
                };

                let written = Report::build(ReportKind::Error, filename, span.start)
                    .with_message(message)
                    .with_label(
                        Label::new((filename, span.clone()))
                            .with_message(format!("{}{}", message, expected_str))
                            .with_color(Color::Red),
                    )
                    .finish()
                    .write((filename, Source::from(source)), &mut buf);
                if written.is_err() {
                    return self.to_string();
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl<'a> From<chumsky::error::Rich<'a, crate::html::lexer::Token>> for ParseError {
    fn from(err: chumsky::error::Rich<'a, crate::html::lexer::Token>) -> Self {
        use chumsky::error::RichReason;

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => {
                let found_str = match found {
                    Some(tok) => format_token(tok),
                    None => "end of input".to_string(),
                };
                format!("Unexpected {}", found_str)
            }
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                chumsky::error::RichPattern::Token(tok) => Some(format_token(tok)),
                chumsky::error::RichPattern::Label(label) => Some(label.to_string()),
                chumsky::error::RichPattern::EndOfInput => Some("end of input".to_string()),
                _ => None,
            })
            .collect();

        ParseError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &crate::html::lexer::Token) -> String {
    use crate::html::lexer::Token;
    match tok {
        Token::StartTag(tag) => format!("start tag <{}>", tag.name),
        Token::EndTag(name) => format!("end tag </{}>", name),
        Token::Text(t) if t.trim().is_empty() => "whitespace".to_string(),
        Token::Text(t) => format!("text \"{}\"", t.trim()),
        Token::Comment(_) => "comment".to_string(),
        Token::Doctype => "doctype".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_includes_message() {
        let err = ParseError::Syntax {
            span: 5..11,
            message: "Unexpected end tag </div>".to_string(),
            expected: vec!["end tag </span>".to_string()],
        };
        let rendered = err.format("<div></div>", "page.html");
        assert!(rendered.contains("Unexpected end tag </div>"));
        assert!(rendered.contains("page.html"));
    }

    #[test]
    fn test_grammar_errors_convert_with_span() {
        let source = "<div></span>";
        let errs = crate::html::parse(source).unwrap_err();
        assert!(errs[0].span().end <= source.len());
    }
}
