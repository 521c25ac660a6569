//! Tokenizer for transform expression strings.

/// Tokens produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    Str(String),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Dot,
    Comma,
    Question,
    Colon,
    Bang,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    AndAnd,
    OrOr,
}

/// Tokenize an expression string. Errors are plain reason strings; the
/// public parser entry point attaches the offending expression.
pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' => {
                let mut text = String::new();
                while let Some(&(_, d)) = chars.peek() {
                    if d.is_ascii_digit() {
                        text.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                // A dot is part of the number only when a digit follows;
                // otherwise it belongs to a field access.
                if let Some(&(_, '.')) = chars.peek() {
                    let mut lookahead = chars.clone();
                    lookahead.next();
                    if matches!(lookahead.peek(), Some(&(_, d)) if d.is_ascii_digit()) {
                        text.push('.');
                        chars.next();
                        while let Some(&(_, d)) = chars.peek() {
                            if d.is_ascii_digit() {
                                text.push(d);
                                chars.next();
                            } else {
                                break;
                            }
                        }
                    }
                }
                let number: f64 = text
                    .parse()
                    .map_err(|_| format!("invalid number '{}' at byte {}", text, pos))?;
                tokens.push(Token::Number(number));
            }
            '"' | '\'' => {
                let quote = ch;
                chars.next();
                let mut text = String::new();
                let mut closed = false;
                while let Some((_, c)) = chars.next() {
                    match c {
                        c if c == quote => {
                            closed = true;
                            break;
                        }
                        '\\' => match chars.next() {
                            Some((_, 'n')) => text.push('\n'),
                            Some((_, 't')) => text.push('\t'),
                            Some((_, escaped)) => text.push(escaped),
                            None => return Err("unterminated escape in string".to_string()),
                        },
                        other => text.push(other),
                    }
                }
                if !closed {
                    return Err(format!("unterminated string starting at byte {}", pos));
                }
                tokens.push(Token::Str(text));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '%' => {
                chars.next();
                tokens.push(Token::Percent);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '[' => {
                chars.next();
                tokens.push(Token::LBracket);
            }
            ']' => {
                chars.next();
                tokens.push(Token::RBracket);
            }
            '.' => {
                chars.next();
                tokens.push(Token::Dot);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '?' => {
                chars.next();
                tokens.push(Token::Question);
            }
            ':' => {
                chars.next();
                tokens.push(Token::Colon);
            }
            '!' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, '='))) {
                    chars.next();
                    // Accept the strict `!==` spelling as well.
                    if matches!(chars.peek(), Some(&(_, '='))) {
                        chars.next();
                    }
                    tokens.push(Token::NotEq);
                } else {
                    tokens.push(Token::Bang);
                }
            }
            '=' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, '='))) {
                    chars.next();
                    if matches!(chars.peek(), Some(&(_, '='))) {
                        chars.next();
                    }
                    tokens.push(Token::Eq);
                } else {
                    return Err(format!("unexpected '=' at byte {}; did you mean '=='?", pos));
                }
            }
            '<' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, '='))) {
                    chars.next();
                    tokens.push(Token::LtEq);
                } else {
                    tokens.push(Token::Lt);
                }
            }
            '>' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, '='))) {
                    chars.next();
                    tokens.push(Token::GtEq);
                } else {
                    tokens.push(Token::Gt);
                }
            }
            '&' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, '&'))) {
                    chars.next();
                    tokens.push(Token::AndAnd);
                } else {
                    return Err(format!("unexpected '&' at byte {}; did you mean '&&'?", pos));
                }
            }
            '|' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, '|'))) {
                    chars.next();
                    tokens.push(Token::OrOr);
                } else {
                    return Err(format!("unexpected '|' at byte {}; did you mean '||'?", pos));
                }
            }
            other => {
                return Err(format!("unexpected character '{}' at byte {}", other, pos));
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_arithmetic() {
        let tokens = tokenize("1 + 2.5 * value").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Number(1.0),
                Token::Plus,
                Token::Number(2.5),
                Token::Star,
                Token::Ident("value".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_string_quoting_styles() {
        assert_eq!(
            tokenize(r#""a" + 'b'"#).unwrap(),
            vec![
                Token::Str("a".to_string()),
                Token::Plus,
                Token::Str("b".to_string()),
            ]
        );
        assert_eq!(
            tokenize(r#"'it\'s'"#).unwrap(),
            vec![Token::Str("it's".to_string())]
        );
    }

    #[test]
    fn test_tokenize_distinguishes_decimal_from_field_access() {
        assert_eq!(
            tokenize("1.5").unwrap(),
            vec![Token::Number(1.5)]
        );
        assert_eq!(
            tokenize("source.dept").unwrap(),
            vec![
                Token::Ident("source".to_string()),
                Token::Dot,
                Token::Ident("dept".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_comparison_operators() {
        let tokens = tokenize("a == b != c <= d >= e === f !== g").unwrap();
        assert!(tokens.contains(&Token::Eq));
        assert!(tokens.contains(&Token::NotEq));
        assert!(tokens.contains(&Token::LtEq));
        assert!(tokens.contains(&Token::GtEq));
    }

    #[test]
    fn test_tokenize_rejects_bad_input() {
        assert!(tokenize("value @ 1").is_err());
        assert!(tokenize("'unterminated").is_err());
        assert!(tokenize("a = b").is_err());
        assert!(tokenize("a & b").is_err());
    }
}
