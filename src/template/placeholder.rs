//! Placeholder holes inside prototype markup
//!
//! The label token `__name__label__` starts with the name token `__name__`.
//! The lexer always takes the longest token, so both holes are recognized in
//! one pass and the order of substitution never matters.

use logos::Logos;

/// Token replaced with a human-readable label for the new entry
pub const LABEL_PLACEHOLDER: &str = "__name__label__";

/// Token replaced with the raw entry index
pub const NAME_PLACEHOLDER: &str = "__name__";

/// Prefix shown in front of the index wherever the label hole appears
pub const NEW_ENTRY_MARKER: &str = "!New!";

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum Token {
    #[token("__name__label__")]
    Label,
    #[token("__name__")]
    Name,
    #[regex(r"[^_]+")]
    Literal,
    #[token("_")]
    Underscore,
}

/// A named hole in a prototype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Label,
    Name,
}

impl Placeholder {
    /// The literal token as written in prototype markup
    pub fn token(self) -> &'static str {
        match self {
            Placeholder::Label => LABEL_PLACEHOLDER,
            Placeholder::Name => NAME_PLACEHOLDER,
        }
    }

    /// Text that replaces this hole for the entry at `index`
    pub fn resolve(self, index: usize) -> String {
        match self {
            Placeholder::Label => format!("{} {}", NEW_ENTRY_MARKER, index),
            Placeholder::Name => index.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Hole(Placeholder),
}

/// Prototype text split into literals and holes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderTemplate {
    segments: Vec<Segment>,
}

impl PlaceholderTemplate {
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut lexer = Token::lexer(source);

        while let Some(token) = lexer.next() {
            let hole = match token {
                Ok(Token::Label) => Placeholder::Label,
                Ok(Token::Name) => Placeholder::Name,
                _ => {
                    literal.push_str(lexer.slice());
                    continue;
                }
            };
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Hole(hole));
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn contains(&self, placeholder: Placeholder) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Hole(p) if *p == placeholder))
    }

    /// Fill every hole for the entry at `index`
    pub fn render(&self, index: usize) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Hole(placeholder) => out.push_str(&placeholder.resolve(index)),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_label_and_name_resolved_independently() {
        let template = PlaceholderTemplate::parse("<div>__name__label__ / __name__</div>");
        assert_eq!(template.render(3), "<div>!New! 3 / 3</div>");
    }

    #[test]
    fn test_segments() {
        let template = PlaceholderTemplate::parse("a__name__label__b__name__");
        assert_eq!(
            template.segments(),
            &[
                Segment::Literal("a".to_string()),
                Segment::Hole(Placeholder::Label),
                Segment::Literal("b".to_string()),
                Segment::Hole(Placeholder::Name),
            ]
        );
    }

    #[test]
    fn test_symfony_style_names() {
        let template = PlaceholderTemplate::parse(
            r#"<input name="form[items][__name__][city]" id="form_items___name___city">"#,
        );
        assert_eq!(
            template.render(12),
            r#"<input name="form[items][12][city]" id="form_items_12_city">"#
        );
    }

    #[test]
    fn test_partial_tokens_stay_literal() {
        let template = PlaceholderTemplate::parse("__nam__ __name__labe _name_");
        assert_eq!(template.render(7), "__nam__ 7labe _name_");
        assert!(template.contains(Placeholder::Name));
        assert!(!template.contains(Placeholder::Label));
    }

    #[test]
    fn test_no_placeholders() {
        let template = PlaceholderTemplate::parse("<p>static</p>");
        assert_eq!(template.segments().len(), 1);
        assert_eq!(template.render(0), "<p>static</p>");
    }
}
