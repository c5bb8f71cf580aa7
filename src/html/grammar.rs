//! Tree construction for HTML fragments using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::html::ast::{Fragment, Markup, Spanned};
use crate::html::lexer::Token;

/// Parse markup into a fragment of top-level nodes
///
/// The input must be well-formed: every non-void element needs a matching
/// end tag. Optional end tags and implied elements are not inferred.
pub fn parse(input: &str) -> Result<Fragment, Vec<crate::ParseError>> {
    let len = input.len();

    let token_iter = crate::html::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    fragment_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn fragment_parser<'a, I>() -> impl Parser<'a, I, Fragment, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let node = recursive(|node| {
        let text = select! { Token::Text(s) => Markup::Text(s) };

        let comment = select! { Token::Comment(c) => Markup::Comment(c) };

        // Void and self-closing tags stand alone
        let childless = select! {
            Token::StartTag(tag) if !tag.takes_children() => tag,
        }
        .map(|tag| Markup::Element {
            tag,
            children: Vec::new(),
        });

        let open = select! {
            Token::StartTag(tag) if tag.takes_children() => tag,
        };

        let close = select! { Token::EndTag(name) => name };

        let element = open
            .then(node.repeated().collect::<Vec<_>>())
            .then(close)
            .try_map(|((tag, children), closing), span: SimpleSpan| {
                if closing == tag.name {
                    Ok(Markup::Element { tag, children })
                } else {
                    Err(Rich::custom(
                        span,
                        format!(
                            "Mismatched end tag: <{}> is closed by </{}>",
                            tag.name, closing
                        ),
                    ))
                }
            });

        choice((text, comment, childless, element))
            .map_with(|m, e| Spanned::new(m, span_range(&e.span())))
            .boxed()
    });

    node.repeated()
        .collect()
        .then_ignore(end())
        .map(|nodes| Fragment { nodes })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element_name(node: &Spanned<Markup>) -> Option<&str> {
        match &node.node {
            Markup::Element { tag, .. } => Some(tag.name.as_str()),
            _ => None,
        }
    }

    #[test]
    fn test_parse_single_element() {
        let fragment = parse("<div>hello</div>").expect("Should parse");
        assert_eq!(fragment.nodes.len(), 1);
        assert_eq!(element_name(&fragment.nodes[0]), Some("div"));
        assert_eq!(fragment.nodes[0].span, 0..16);
    }

    #[test]
    fn test_parse_nested() {
        let fragment =
            parse(r#"<fieldset><label for="a">A</label><input id="a"></fieldset>"#)
                .expect("Should parse");
        let Markup::Element { children, .. } = &fragment.nodes[0].node else {
            panic!("expected element");
        };
        let names: Vec<_> = children.iter().filter_map(element_name).collect();
        assert_eq!(names, vec!["label", "input"]);
    }

    #[test]
    fn test_parse_void_without_end_tag() {
        let fragment = parse("<p><br>line<img src=x></p>").expect("Should parse");
        let Markup::Element { children, .. } = &fragment.nodes[0].node else {
            panic!("expected element");
        };
        assert_eq!(children.len(), 3);
    }

    #[test]
    fn test_parse_multiple_top_level() {
        let fragment = parse("<a></a> <b></b>").expect("Should parse");
        assert_eq!(fragment.nodes.len(), 3);
        assert_eq!(fragment.significant_nodes().count(), 2);
    }

    #[test]
    fn test_parse_empty_input() {
        let fragment = parse("").expect("Should parse");
        assert!(fragment.nodes.is_empty());
    }

    #[test]
    fn test_mismatched_end_tag_is_error() {
        let errs = parse("<div><span></div></span>").unwrap_err();
        assert!(!errs.is_empty());
    }

    #[test]
    fn test_unclosed_element_is_error() {
        assert!(parse("<div><span>text</span>").is_err());
    }

    #[test]
    fn test_stray_end_tag_is_error() {
        assert!(parse("text</div>").is_err());
    }
}
