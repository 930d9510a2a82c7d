//! Parses numeric input fields. Besides plain numbers, short arithmetic expressions are
//! accepted so that values like `-pi/2` or `0.1*3` can be typed directly into the DH table.
//!
//! Only a small whitelist grammar is evaluated: numbers, the constant `pi`, `+ - * / **`,
//! unary signs and parentheses. Anything else is rejected with
//! [ParameterError::ParseError], it is never executed.
//!
//! ```
//! use rs_dh_kinematics::expression::parse_input;
//! assert_eq!(parse_input("2+2").unwrap(), 4.0);
//! assert_eq!(parse_input("").unwrap(), 0.0);
//! assert_eq!(parse_input("0,5").unwrap(), 0.5); // Decimal comma
//! assert!((parse_input("-pi/2").unwrap() + std::f64::consts::FRAC_PI_2).abs() < 1E-15);
//! assert!(parse_input("__import__('os')").is_err());
//! ```

use std::f64::consts::PI;
use crate::parameter_error::ParameterError;

/// Nesting of parentheses and unary signs allowed in one expression.
const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Pi,
    Plus,
    Minus,
    Star,
    Slash,
    Power,
    LParen,
    RParen,
}

/// Converts input text into the floating point value. Empty text is zero, decimal comma
/// is accepted in place of the decimal point.
pub fn parse_input(text: &str) -> Result<f64, ParameterError> {
    let trimmed = text.trim();
    let normalized = if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.replace(',', ".")
    };

    let tokens = tokenize(&normalized).map_err(|reason| ParameterError::parse(text, reason))?;
    let mut parser = Parser { tokens: &tokens, pos: 0, depth: 0 };
    let value = parser
        .expression()
        .and_then(|value| match parser.peek() {
            None => Ok(value),
            Some(token) => Err(format!("unexpected {:?} after the end of expression", token)),
        })
        .map_err(|reason| ParameterError::parse(text, reason))?;

    if !value.is_finite() {
        return Err(ParameterError::parse(text, "result is not a finite number"));
    }
    Ok(value)
}

fn tokenize(text: &str) -> Result<Vec<Token>, String> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' => {
                i += 1;
            }
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    tokens.push(Token::Power);
                    i += 2;
                } else {
                    tokens.push(Token::Star);
                    i += 1;
                }
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '0'..='9' | '.' => {
                let (value, next) = lex_number(&chars, i)?;
                tokens.push(Token::Number(value));
                i = next;
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                if word == "pi" {
                    tokens.push(Token::Pi);
                } else {
                    return Err(format!("unknown name '{}', only 'pi' is supported", word));
                }
            }
            other => return Err(format!("unexpected character '{}'", other)),
        }
    }
    Ok(tokens)
}

/// Reads digits [. digits] [e [+-] digits] starting at `start`.
fn lex_number(chars: &[char], start: usize) -> Result<(f64, usize), String> {
    let mut i = start;
    let digits = |i: &mut usize| {
        let from = *i;
        while *i < chars.len() && chars[*i].is_ascii_digit() {
            *i += 1;
        }
        *i - from
    };

    let mut mantissa = digits(&mut i);
    if i < chars.len() && chars[i] == '.' {
        i += 1;
        mantissa += digits(&mut i);
    }
    if mantissa == 0 {
        return Err("decimal point without digits".to_string());
    }

    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
        }
        if digits(&mut j) == 0 {
            return Err("exponent without digits".to_string());
        }
        i = j;
    }

    let literal: String = chars[start..i].iter().collect();
    literal
        .parse::<f64>()
        .map(|value| (value, i))
        .map_err(|_| format!("malformed number '{}'", literal))
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    // expr := term (('+' | '-') term)*
    fn expression(&mut self) -> Result<f64, String> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    // term := unary (('*' | '/') unary)*
    fn term(&mut self) -> Result<f64, String> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    value *= self.unary()?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err("division by zero".to_string());
                    }
                    value /= divisor;
                }
                _ => return Ok(value),
            }
        }
    }

    // Every recursive path of the grammar passes through here
    fn unary(&mut self) -> Result<f64, String> {
        if self.depth >= MAX_DEPTH {
            return Err(format!("expression nested deeper than {} levels", MAX_DEPTH));
        }
        self.depth += 1;
        let value = self.signed();
        self.depth -= 1;
        value
    }

    // unary := ('+' | '-') unary | power
    fn signed(&mut self) -> Result<f64, String> {
        match self.peek() {
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(-self.unary()?)
            }
            _ => self.power(),
        }
    }

    // power := primary ('**' unary)?, so -2**2 is -4 and 2**-1 is 0.5
    fn power(&mut self) -> Result<f64, String> {
        let base = self.primary()?;
        if self.peek() == Some(Token::Power) {
            self.pos += 1;
            let exponent = self.unary()?;
            if base == 0.0 && exponent < 0.0 {
                return Err("zero raised to a negative power".to_string());
            }
            let value = base.powf(exponent);
            if value.is_nan() {
                return Err(format!("{} ** {} is not a real number", base, exponent));
            }
            return Ok(value);
        }
        Ok(base)
    }

    // primary := NUMBER | 'pi' | '(' expr ')'
    fn primary(&mut self) -> Result<f64, String> {
        match self.next() {
            Some(Token::Number(value)) => Ok(value),
            Some(Token::Pi) => Ok(PI),
            Some(Token::LParen) => {
                let value = self.expression()?;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err("missing closing parenthesis".to_string()),
                }
            }
            Some(token) => Err(format!("unexpected {:?}", token)),
            None => Err("unexpected end of expression".to_string()),
        }
    }
}
