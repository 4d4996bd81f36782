use super::ident::{GeneId, IdPattern};
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Ident(GeneId),
    And,
    Or,
    LParen,
    RParen,
}

/// Split a rule into tokens.
///
/// Words are separated by whitespace and parentheses. `and`/`or` match
/// case-insensitively; any other word that is not a valid identifier is dropped.
pub fn tokenize(rule: &str, pattern: &IdPattern) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = String::new();

    for c in rule.chars() {
        match c {
            '(' | ')' => {
                push_word(&mut word, &mut tokens, pattern);
                tokens.push(if c == '(' {
                    Token::LParen
                } else {
                    Token::RParen
                });
            }
            c if c.is_whitespace() => push_word(&mut word, &mut tokens, pattern),
            c => word.push(c),
        }
    }
    push_word(&mut word, &mut tokens, pattern);

    tokens
}

fn push_word(word: &mut String, tokens: &mut Vec<Token>, pattern: &IdPattern) {
    if word.is_empty() {
        return;
    }
    if word.eq_ignore_ascii_case("and") {
        tokens.push(Token::And);
    } else if word.eq_ignore_ascii_case("or") {
        tokens.push(Token::Or);
    } else if let Some(id) = pattern.extract(word) {
        tokens.push(Token::Ident(id));
    } else {
        trace!("Ignoring unrecognized word {word:?}");
    }
    word.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Token {
        Token::Ident(GeneId::from(s))
    }

    #[test]
    fn parenthesised_rule() {
        let tokens = tokenize("(PP_0001 or PP_0002) and PP_0003", &IdPattern::default());
        assert_eq!(
            tokens,
            vec![
                Token::LParen,
                id("PP_0001"),
                Token::Or,
                id("PP_0002"),
                Token::RParen,
                Token::And,
                id("PP_0003"),
            ]
        );
    }

    #[test]
    fn operators_are_case_insensitive() {
        let tokens = tokenize("PP_0001 AND pWW0_12 Or PP_0003", &IdPattern::default());
        assert_eq!(
            tokens,
            vec![id("PP_0001"), Token::And, id("pWW0_12"), Token::Or, id("PP_0003")]
        );
    }

    #[test]
    fn unknown_words_are_dropped() {
        let tokens = tokenize("foo123 or PP_0001 or s0001", &IdPattern::default());
        assert_eq!(tokens, vec![Token::Or, id("PP_0001"), Token::Or]);
    }

    #[test]
    fn tight_parentheses() {
        let tokens = tokenize("((PP_0001))", &IdPattern::default());
        assert_eq!(
            tokens,
            vec![
                Token::LParen,
                Token::LParen,
                id("PP_0001"),
                Token::RParen,
                Token::RParen
            ]
        );
    }
}
