//! Recursive-descent parser for the tag-rule grammar.
//!
//! Grammar:
//!
//! ```text
//! tag    := rule ('|' rule)*
//! rule   := name ['=' params]
//! params := param (',' param)*
//! ```
//!
//! A separator inside a parameter list is ambiguous: in
//! `"min=5,max=100"` the comma starts a new rule, while in
//! `"between=10,20"` it separates parameters of the same rule. The parser
//! scans ahead to the next separator and classifies the intervening text.
//! At a `,`, only a chunk containing `=` unambiguously reads as a rule and
//! ends the current one; a bare name like the `US` in
//! `"required_if=country,US"` is ambiguous — it could be a no-parameter
//! rule or a string parameter — and defaults to staying in the parameter
//! list. At a `|`, the dedicated rule separator, a chunk containing `=` or
//! looking like a rule name (starts with a letter, letters/underscores
//! only) ends the rule; anything else continues the current parameter
//! literally (regex-style parameters rely on this).

use super::lexer::{tokenize, Token};

/// A parsed validation rule: name plus raw (uncoerced) parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRule {
    /// Rule name as written in the tag.
    pub name: String,
    /// Raw parameter strings, in order.
    pub params: Vec<String>,
}

impl TagRule {
    /// Convenience constructor, mostly for tests.
    pub fn new(name: impl Into<String>, params: &[&str]) -> Self {
        Self {
            name: name.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Parse a tag string into an ordered rule list.
///
/// Lenient like the grammar it implements: empty rules and empty parameters
/// are skipped, surrounding whitespace is trimmed. The empty tag parses to
/// an empty list.
pub fn parse_rule_list(tag: &str) -> Vec<TagRule> {
    Parser::new(tag).parse()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tag: &str) -> Self {
        Self {
            tokens: tokenize(tag),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn parse(mut self) -> Vec<TagRule> {
        let mut rules = Vec::new();

        loop {
            // Leading/duplicate separators produce empty rules; skip them.
            while matches!(self.peek(), Some(Token::Pipe | Token::Comma)) {
                self.advance();
            }

            let name = match self.peek() {
                Some(Token::Text(t)) => {
                    let name = t.trim().to_string();
                    self.advance();
                    name
                }
                Some(_) => {
                    // Stray '=' with no rule name; drop it.
                    self.advance();
                    continue;
                }
                None => break,
            };

            let mut rule = TagRule {
                name,
                params: Vec::new(),
            };
            if matches!(self.peek(), Some(Token::Eq)) {
                self.advance();
                self.parse_params(&mut rule.params);
            }
            if !rule.name.is_empty() {
                rules.push(rule);
            }
        }

        rules
    }

    /// Consume the parameter list of the current rule. Leaves the separator
    /// that starts the next rule (if any) for the outer loop.
    fn parse_params(&mut self, params: &mut Vec<String>) {
        let mut current = String::new();

        loop {
            match self.peek() {
                Some(Token::Text(t)) => {
                    current.push_str(t);
                    self.advance();
                }
                Some(Token::Eq) => {
                    // '=' past the first one is literal parameter text.
                    current.push('=');
                    self.advance();
                }
                Some(Token::Comma) => {
                    // Only an unambiguous rule chunk (one carrying '=')
                    // ends the rule here; bare names default to parameters.
                    if self.next_chunk_has_eq(self.pos + 1) {
                        break;
                    }
                    push_param(params, &mut current);
                    self.advance();
                }
                Some(Token::Pipe) => {
                    if self.next_chunk_has_eq(self.pos + 1)
                        || is_rule_name(self.next_chunk_text(self.pos + 1).trim())
                    {
                        break;
                    }
                    current.push('|');
                    self.advance();
                }
                None => break,
            }
        }

        push_param(params, &mut current);
    }

    /// Whether the text between `from` and the next separator carries an
    /// `=` — the unambiguous mark of a rule.
    fn next_chunk_has_eq(&self, from: usize) -> bool {
        for tok in &self.tokens[from.min(self.tokens.len())..] {
            match tok {
                Token::Pipe | Token::Comma => return false,
                Token::Eq => return true,
                Token::Text(_) => {}
            }
        }
        false
    }

    /// The literal text between `from` and the next separator.
    fn next_chunk_text(&self, from: usize) -> String {
        let mut chunk = String::new();
        for tok in &self.tokens[from.min(self.tokens.len())..] {
            match tok {
                Token::Pipe | Token::Comma | Token::Eq => break,
                Token::Text(t) => chunk.push_str(t),
            }
        }
        chunk
    }
}

fn push_param(params: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        params.push(trimmed.to_string());
    }
    current.clear();
}

/// Whether a string looks like a rule name: starts with an ASCII letter and
/// contains only letters and underscores.
fn is_rule_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphabetic() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_rules() {
        assert_eq!(
            parse_rule_list("required|email"),
            vec![TagRule::new("required", &[]), TagRule::new("email", &[])]
        );
    }

    #[test]
    fn comma_starts_a_new_rule_when_chunk_has_eq() {
        assert_eq!(
            parse_rule_list("required|min=5,max=100"),
            vec![
                TagRule::new("required", &[]),
                TagRule::new("min", &["5"]),
                TagRule::new("max", &["100"]),
            ]
        );
    }

    #[test]
    fn comma_separates_params_when_chunk_is_not_a_rule() {
        assert_eq!(
            parse_rule_list("between=10,20"),
            vec![TagRule::new("between", &["10", "20"])]
        );
    }

    #[test]
    fn bare_name_after_comma_defaults_to_parameter() {
        assert_eq!(
            parse_rule_list("oneof=red,green,blue"),
            vec![TagRule::new("oneof", &["red", "green", "blue"])]
        );
        assert_eq!(
            parse_rule_list("required_if=country,US"),
            vec![TagRule::new("required_if", &["country", "US"])]
        );
    }

    #[test]
    fn comma_separates_rules_outside_a_parameter_list() {
        assert_eq!(
            parse_rule_list("required,min=5"),
            vec![TagRule::new("required", &[]), TagRule::new("min", &["5"])]
        );
    }

    #[test]
    fn pipe_stays_literal_when_chunk_is_not_a_rule() {
        assert_eq!(
            parse_rule_list("matches=^a|b$"),
            vec![TagRule::new("matches", &["^a|b$"])]
        );
    }

    #[test]
    fn multi_param_then_next_rule() {
        assert_eq!(
            parse_rule_list("between=10,20|required"),
            vec![
                TagRule::new("between", &["10", "20"]),
                TagRule::new("required", &[]),
            ]
        );
    }

    #[test]
    fn whitespace_is_trimmed() {
        assert_eq!(
            parse_rule_list(" min = 5 | required "),
            vec![TagRule::new("min", &["5"]), TagRule::new("required", &[])]
        );
    }

    #[test]
    fn empty_and_degenerate_tags() {
        assert!(parse_rule_list("").is_empty());
        assert!(parse_rule_list("||").is_empty());
        assert_eq!(
            parse_rule_list("|required|"),
            vec![TagRule::new("required", &[])]
        );
    }

    #[test]
    fn literal_eq_inside_param() {
        assert_eq!(
            parse_rule_list("eq=a=b"),
            vec![TagRule::new("eq", &["a=b"])]
        );
    }

    #[test]
    fn rule_name_heuristic() {
        assert!(is_rule_name("required"));
        assert!(is_rule_name("min_items"));
        assert!(!is_rule_name("20"));
        assert!(!is_rule_name("2fa"));
        assert!(!is_rule_name(""));
        assert!(!is_rule_name("has-dash"));
    }

    #[test]
    fn dive_parses_as_ordinary_rule() {
        assert_eq!(
            parse_rule_list("min_items=1|dive|url"),
            vec![
                TagRule::new("min_items", &["1"]),
                TagRule::new("dive", &[]),
                TagRule::new("url", &[]),
            ]
        );
    }
}
