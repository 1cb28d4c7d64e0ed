//! Restricted arithmetic over decimal literals
//!
//! Grammar: numbers, `+ - * /`, unary sign and parentheses. Anything else is
//! rejected at tokenization, so descriptions are never executed as code. A `$`
//! directly in front of a number is read as a currency sign.

use crate::error::{ExpressionError, Result};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Deepest parenthesis/sign nesting accepted
pub const MAX_DEPTH: usize = 32;

/// Result of a successful evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    /// Computed value, unrounded
    pub value: Decimal,
    /// Number of binary operators applied
    pub binary_operations: usize,
}

/// Evaluate `input` and return its value
///
/// ```
/// use description_decoder::expression::evaluate;
/// use rust_decimal::Decimal;
///
/// assert_eq!(evaluate("45.00 + 12.99 - 5").unwrap(), Decimal::new(5299, 2));
/// assert!(evaluate("1 / 0").is_err());
/// ```
pub fn evaluate(input: &str) -> Result<Decimal> {
    evaluate_detailed(input).map(|evaluation| evaluation.value)
}

/// Evaluate `input`, also reporting how many binary operators it used
pub fn evaluate_detailed(input: &str) -> Result<Evaluation> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        depth: 0,
        binary_operations: 0,
    };

    let value = parser.expression()?;
    if let Some(token) = parser.peek() {
        return Err(ExpressionError::TrailingInput(token.to_string()));
    }

    Ok(Evaluation {
        value,
        binary_operations: parser.binary_operations,
    })
}

/// Contents of every top-level balanced `( ... )` group, outer parentheses
/// stripped, in order of appearance
pub fn parenthesized_groups(text: &str) -> Vec<&str> {
    let mut groups = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;

    for (offset, ch) in text.char_indices() {
        match ch {
            '(' => {
                if depth == 0 {
                    start = offset + 1;
                }
                depth += 1;
            }
            ')' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    groups.push(&text[start..offset]);
                }
            }
            _ => {}
        }
    }

    groups
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Number(Decimal),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Plus => f.write_str("+"),
            Token::Minus => f.write_str("-"),
            Token::Star => f.write_str("*"),
            Token::Slash => f.write_str("/"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(offset, ch)) = chars.peek() {
        let token = match ch {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '$' => {
                chars.next();
                match chars.peek() {
                    Some(&(_, next)) if next.is_ascii_digit() || next == '.' => continue,
                    _ => {
                        return Err(ExpressionError::UnexpectedCharacter {
                            character: '$',
                            offset,
                        })
                    }
                }
            }
            '0'..='9' | '.' => {
                let start = offset;
                let mut end = offset;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        end = i + c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let literal = &input[start..end];
                if literal.matches('.').count() > 1 || literal == "." {
                    return Err(ExpressionError::InvalidNumber(literal.to_string()));
                }
                let value = Decimal::from_str(literal)
                    .map_err(|_| ExpressionError::InvalidNumber(literal.to_string()))?;
                tokens.push(Token::Number(value));
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            other => {
                return Err(ExpressionError::UnexpectedCharacter {
                    character: other,
                    offset,
                })
            }
        };
        chars.next();
        tokens.push(token);
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    binary_operations: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ExpressionError::TooDeep(MAX_DEPTH));
        }
        Ok(())
    }

    // expression := term (('+' | '-') term)*
    fn expression(&mut self) -> Result<Decimal> {
        let mut value = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = match op {
                Token::Plus => value.checked_add(rhs),
                _ => value.checked_sub(rhs),
            }
            .ok_or(ExpressionError::Overflow)?;
            self.binary_operations += 1;
        }
        Ok(value)
    }

    // term := factor (('*' | '/') factor)*
    fn term(&mut self) -> Result<Decimal> {
        let mut value = self.factor()?;
        while let Some(op @ (Token::Star | Token::Slash)) = self.peek() {
            self.pos += 1;
            let rhs = self.factor()?;
            value = match op {
                Token::Star => value.checked_mul(rhs).ok_or(ExpressionError::Overflow)?,
                _ => {
                    if rhs.is_zero() {
                        return Err(ExpressionError::DivisionByZero);
                    }
                    value.checked_div(rhs).ok_or(ExpressionError::Overflow)?
                }
            };
            self.binary_operations += 1;
        }
        Ok(value)
    }

    // factor := ('+' | '-') factor | number | '(' expression ')'
    fn factor(&mut self) -> Result<Decimal> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::Minus) => {
                self.enter()?;
                let value = -self.factor()?;
                self.depth -= 1;
                Ok(value)
            }
            Some(Token::Plus) => {
                self.enter()?;
                let value = self.factor()?;
                self.depth -= 1;
                Ok(value)
            }
            Some(Token::LParen) => {
                self.enter()?;
                let value = self.expression()?;
                match self.advance() {
                    Some(Token::RParen) => {}
                    Some(other) => return Err(ExpressionError::UnexpectedToken(other.to_string())),
                    None => return Err(ExpressionError::UnexpectedEnd),
                }
                self.depth -= 1;
                Ok(value)
            }
            Some(other) => Err(ExpressionError::UnexpectedToken(other.to_string())),
            None => Err(ExpressionError::UnexpectedEnd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_precedence_and_parentheses() {
        assert_eq!(evaluate("2 + 3 * 4").unwrap(), dec("14"));
        assert_eq!(evaluate("(2 + 3) * 4").unwrap(), dec("20"));
        assert_eq!(evaluate("10 - 4 - 3").unwrap(), dec("3"));
        assert_eq!(evaluate("100 / 4 / 5").unwrap(), dec("5"));
    }

    #[test]
    fn test_unary_sign() {
        assert_eq!(evaluate("-5 + 8").unwrap(), dec("3"));
        assert_eq!(evaluate("--2").unwrap(), dec("2"));
        assert_eq!(evaluate("+7").unwrap(), dec("7"));
    }

    #[test]
    fn test_currency_sign() {
        assert_eq!(evaluate("$45.00 + $12.99").unwrap(), dec("57.99"));
        assert!(matches!(
            evaluate("$ + 1"),
            Err(ExpressionError::UnexpectedCharacter { character: '$', .. })
        ));
    }

    #[test]
    fn test_binary_operation_count() {
        let evaluation = evaluate_detailed("45.00 + 12.99 - 5").unwrap();
        assert_eq!(evaluation.value, dec("52.99"));
        assert_eq!(evaluation.binary_operations, 2);

        assert_eq!(evaluate_detailed("(-5)").unwrap().binary_operations, 0);
    }

    #[test]
    fn test_rejects_anything_but_arithmetic() {
        assert!(matches!(
            evaluate("__import__('os')"),
            Err(ExpressionError::UnexpectedCharacter { character: '_', offset: 0 })
        ));
        assert!(evaluate("2 ** 3").is_err());
        assert!(evaluate("abs(3)").is_err());
        assert!(evaluate("1.2.3 + 1").is_err());
    }

    #[test]
    fn test_structural_errors() {
        assert_eq!(evaluate(""), Err(ExpressionError::UnexpectedEnd));
        assert_eq!(evaluate("1 +"), Err(ExpressionError::UnexpectedEnd));
        assert_eq!(evaluate("(1 + 2"), Err(ExpressionError::UnexpectedEnd));
        assert!(matches!(evaluate("1 2"), Err(ExpressionError::TrailingInput(_))));
        assert!(matches!(evaluate("* 2"), Err(ExpressionError::UnexpectedToken(_))));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(evaluate("5 / 0"), Err(ExpressionError::DivisionByZero));
        assert_eq!(evaluate("5 / (2 - 2)"), Err(ExpressionError::DivisionByZero));
    }

    #[test]
    fn test_overflow() {
        let huge = "79228162514264337593543950335";
        assert_eq!(
            evaluate(&format!("{} * 10", huge)),
            Err(ExpressionError::Overflow)
        );
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert_eq!(evaluate(&deep), Err(ExpressionError::TooDeep(MAX_DEPTH)));

        let ok = format!("{}1{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert_eq!(evaluate(&ok).unwrap(), dec("1"));
    }

    #[test]
    fn test_parenthesized_groups() {
        assert_eq!(
            parenthesized_groups("Target (45.00 + 12.99 - 5) and (x)"),
            vec!["45.00 + 12.99 - 5", "x"]
        );
        assert_eq!(parenthesized_groups("a ((1+2)*3) b"), vec!["(1+2)*3"]);
        assert!(parenthesized_groups("unbalanced (1 + 2").is_empty());
        assert!(parenthesized_groups(") stray").is_empty());
    }
}
