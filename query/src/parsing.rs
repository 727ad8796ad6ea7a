use crate::prelude::*;
use pest::{
    error::InputLocation,
    iterators::{Pair, Pairs},
    Parser,
};
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "query.pest"]
struct QueryGrammar;

/// Deepest parenthesis nesting accepted in a query.
pub const MAX_DEPTH: usize = 32;

/// Parse a raw SEARCH query.
///
/// The whole input must match: trailing garbage is a [`SyntaxError`] just like a malformed term.
pub fn parse(raw: &str) -> Result<ParseTree, QueryError> {
    check_depth(raw)?;

    let mut pairs = QueryGrammar::parse(Rule::query, raw).map_err(syntax_error)?;
    let query = pairs.next().ok_or_else(|| SyntaxError::new(0, "empty parse"))?;
    let term_list = query
        .into_inner()
        .find(|pair| pair.as_rule() == Rule::term_list)
        .ok_or_else(|| SyntaxError::new(0, "query without terms"))?;

    let nodes = build_term_list(term_list)?;
    trace!("Parsed {raw:?} into {nodes:?}");
    Ok(ParseTree { nodes })
}

/// Reject deeply nested input before handing it to the recursive grammar.
/// Balance itself is left to the grammar.
fn check_depth(raw: &str) -> Result<(), SyntaxError> {
    let mut depth = 0usize;
    let mut quoted = false;
    for (i, c) in raw.char_indices() {
        match c {
            '"' => quoted = !quoted,
            '(' if !quoted => {
                depth += 1;
                if depth > MAX_DEPTH {
                    return Err(SyntaxError::new(i, format!("parentheses nested deeper than {MAX_DEPTH}")));
                }
            }
            ')' if !quoted => depth = depth.saturating_sub(1),
            _ => (),
        }
    }
    Ok(())
}

fn syntax_error(e: pest::error::Error<Rule>) -> SyntaxError {
    let position = match e.location {
        InputLocation::Pos(pos) => pos,
        InputLocation::Span((start, _)) => start,
    };
    SyntaxError::new(position, e.variant.message())
}

fn unexpected(pair: &Pair<Rule>) -> SyntaxError {
    SyntaxError::new(pair.as_span().start(), format!("unexpected {:?}", pair.as_rule()))
}

fn next_child<'i>(children: &mut Pairs<'i, Rule>, rule: Rule, at: usize) -> Result<Pair<'i, Rule>, SyntaxError> {
    match children.next() {
        Some(child) if child.as_rule() == rule => Ok(child),
        Some(child) => Err(unexpected(&child)),
        None => Err(SyntaxError::new(at, format!("missing {rule:?}"))),
    }
}

fn build_term_list(pair: Pair<Rule>) -> Result<Vec<Node>, SyntaxError> {
    pair.into_inner()
        .map(|child| match child.as_rule() {
            Rule::term => build_term(child).map(Node::Term),
            Rule::boolean_infix => build_infix(&child).map(Node::BooleanOp),
            _ => Err(unexpected(&child)),
        })
        .collect()
}

fn build_term(pair: Pair<Rule>) -> Result<Term, SyntaxError> {
    let span = pair.as_span().start()..pair.as_span().end();
    let mut prefix = None;
    let mut body = None;

    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::boolean_singleton => prefix = Some(build_prefix(&child)?),
            Rule::named_field => {
                let at = child.as_span().start();
                let mut parts = child.into_inner();
                let name = next_child(&mut parts, Rule::field_name, at)?.as_str().to_string();
                let value = build_field_value(next_child(&mut parts, Rule::field_value, at)?)?;
                body = Some(TermBody::NamedField { name, value });
            }
            Rule::default_field => {
                let at = child.as_span().start();
                let mut parts = child.into_inner();
                let value = build_field_value(next_child(&mut parts, Rule::field_value, at)?)?;
                body = Some(TermBody::DefaultField(value));
            }
            _ => return Err(unexpected(&child)),
        }
    }

    let body = body.ok_or_else(|| SyntaxError::new(span.start, "term without a field"))?;
    Ok(Term { prefix, body, span })
}

fn build_field_value(pair: Pair<Rule>) -> Result<FieldValue, SyntaxError> {
    let at = pair.as_span().start();
    let Some(child) = pair.into_inner().next() else {
        return Err(SyntaxError::new(at, "empty field value"));
    };
    match child.as_rule() {
        Rule::text | Rule::quoted_text => Ok(FieldValue::Literal(child.as_str().to_string())),
        Rule::grouped_term_list => {
            let mut parts = child.into_inner();
            let term_list = next_child(&mut parts, Rule::term_list, at)?;
            Ok(FieldValue::Group(build_term_list(term_list)?))
        }
        _ => Err(unexpected(&child)),
    }
}

fn build_prefix(pair: &Pair<Rule>) -> Result<Prefix, SyntaxError> {
    match pair.as_str() {
        "!" => Ok(Prefix::Bang),
        "+" => Ok(Prefix::Plus),
        "-" => Ok(Prefix::Minus),
        _ => Err(unexpected(pair)),
    }
}

fn build_infix(pair: &Pair<Rule>) -> Result<BooleanOp, SyntaxError> {
    match pair.as_str() {
        "AND" => Ok(BooleanOp::And),
        "OR" => Ok(BooleanOp::Or),
        "NOT" => Ok(BooleanOp::Not),
        "&&" => Ok(BooleanOp::DoubleAmpersand),
        "||" => Ok(BooleanOp::DoublePipe),
        _ => Err(unexpected(pair)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parses(query: &str) -> bool {
        parse(query).is_ok()
    }

    fn literal(text: &str) -> FieldValue {
        FieldValue::Literal(text.to_string())
    }

    #[test]
    fn single_terms() {
        assert!(parses("asdf"));
        assert!(parses("\"asdf\""));
        assert!(parses("\"as df\""));
        assert!(parses("key:value"));
        assert!(parses("key:\"value\""));
        assert!(parses("key:\"val ue\""));
        assert!(parses("  padded  "));

        assert!(!parses("\"key\":\"value\""));
        assert!(!parses("\"ke y\":value"));
        assert!(!parses("key:\"value"));
        assert!(!parses(":value\""));
        assert!(!parses(":value"));
        assert!(!parses("key:"));
        assert!(!parses(""));
        assert!(!parses("   "));
    }

    #[test]
    fn many_terms() {
        assert!(parses("as df"));
        assert!(parses("one:two three:four"));
        assert!(parses("one:\"tw o\" three:\"fo ur\""));
        assert!(parses("as two:five one:\"four teen\" df"));

        assert!(!parses("one: two:three"));
        assert!(!parses("feast: genre:Absalon"));
    }

    #[test]
    fn booleans() {
        assert!(parses("genre:antiphon AND incipit:Deus*"));
        assert!(parses("a OR b NOT c"));
        assert!(parses("a && b || c"));
        assert!(parses("a&&b"));
        assert!(parses("!a +b -c"));
        assert!(parses("ANDROID"));
        assert!(parses("NOTE OR ORacle"));

        assert!(!parses("AND"));
        assert!(!parses("a AND"));
        assert!(!parses("OR b"));
        assert!(!parses("a AND OR b"));
        assert!(!parses("- a"));
        assert!(!parses("Kyrie-eleison"));
        assert!(!parses("a(b)"));
        assert!(!parses("\"a\"\"b\""));
        assert!(parses("Kyrie -eleison"));
        assert!(parses("(a)||(b)"));
    }

    #[test]
    fn groups() {
        assert!(parses("(a)"));
        assert!(parses("( a OR b )"));
        assert!(parses("genre:antiphon AND (incipit:Deus* OR incipit:Gloria*)"));
        assert!(parses("century:(20th OR 21st)"));
        assert!(parses("-(a OR b)"));
        assert!(parses("((a))"));

        assert!(!parses("(a"));
        assert!(!parses("a)"));
        assert!(!parses("(a))"));
        assert!(!parses("()"));
        assert!(!parses("century: (20th)"));
    }

    #[test]
    fn wildcards() {
        assert!(parses("Deus*"));
        assert!(parses("*"));
        assert!(parses("De*us"));
        assert!(parses("Gl?ria"));
        assert!(parses("Gl??ia"));
        assert!(parses("incipit:\"in tab*\""));

        assert!(!parses("**"));
        assert!(!parses("Deus**"));
        assert!(!parses("De*us*"));
        assert!(!parses("a*?"));
        assert!(!parses("\"a**\""));
    }

    #[test]
    fn accented_characters() {
        assert!(parses("drink:Dunkelweiß"));
        assert!(parses("Çà ÉTÉ"));
        assert!(parses("\"Noël élève\""));
        assert!(!parses("size: drink:Dunkelweiß"));
        assert!(!parses("naïve€"));
    }

    #[test]
    fn depth_limit() {
        let nested = |depth: usize| format!("{}a{}", "(".repeat(depth), ")".repeat(depth));
        assert!(parses(&nested(MAX_DEPTH)));
        match parse(&nested(MAX_DEPTH + 1)) {
            Err(QueryError::Syntax(e)) => assert_eq!(e.position, MAX_DEPTH),
            other => panic!("expected a syntax error, got {other:?}"),
        }
        // Parentheses inside quotes do not count
        assert!(check_depth(&format!("\"{}\"", "(".repeat(MAX_DEPTH + 1))).is_ok());
    }

    #[test]
    fn tree_shape() {
        let tree = parse("genre:antiphon AND -(incipit:Deus* \"in taberna\")").unwrap();
        assert_eq!(tree.nodes.len(), 3);

        let Node::Term(first) = &tree.nodes[0] else { panic!("expected a term") };
        assert_eq!(first.prefix, None);
        assert_eq!(first.span, 0..14);
        assert_eq!(first.body, TermBody::NamedField { name: "genre".to_string(), value: literal("antiphon") });

        assert_eq!(tree.nodes[1], Node::BooleanOp(BooleanOp::And));

        let Node::Term(last) = &tree.nodes[2] else { panic!("expected a term") };
        assert_eq!(last.prefix, Some(Prefix::Minus));
        let TermBody::DefaultField(FieldValue::Group(inner)) = &last.body else { panic!("expected a group") };
        assert_eq!(inner.len(), 2);
        let Node::Term(quoted) = &inner[1] else { panic!("expected a term") };
        assert_eq!(quoted.body, TermBody::DefaultField(literal("\"in taberna\"")));
    }

    #[test]
    fn syntax_error_position() {
        match parse("genre:antiphon key:") {
            Err(QueryError::Syntax(e)) => assert!(e.position >= 14, "position {} too early", e.position),
            other => panic!("expected a syntax error, got {other:?}"),
        }
    }
}
