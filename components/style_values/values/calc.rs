/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! `calc()` expression folding.
//! <https://drafts.csswg.org/css-values-4/#calc-notation>
//!
//! A `calc()` argument list parses into a sum/product tree, simplifies by
//! unit-aware constant folding, and serializes back. Anything the parser
//! does not fully understand (a pending `var()` substitution, a misplaced
//! operator, a number that will not round-trip through its shortest decimal
//! form) leaves the original tokens untouched.
//!
//! Serialization deviates from the literal CSS Values 4 algorithm in two
//! deliberate ways: a product directly inside a sum is not parenthesized
//! (precedence already binds it), and a multiplication prints as a division
//! by the exact reciprocal when that is shorter.

use crate::tokens::{contains_var, Token, TokenKind, Whitespace};

#[derive(Clone, Debug, PartialEq)]
enum CalcTerm {
    Sum(Vec<CalcTerm>),
    Product(Vec<CalcTerm>),
    Negate(Box<CalcTerm>),
    Invert(Box<CalcTerm>),
    Number { value: f64, unit: String },
    Value(Token),
}

/// Folds every `calc()` in the token tree, innermost first.
pub fn minify_calc_in_tokens(tokens: &mut [Token]) {
    for token in tokens {
        if let Some(children) = &mut token.children {
            minify_calc_in_tokens(children);
        }
        if token.is_function("calc") {
            minify_calc(token);
        }
    }
}

/// Folds one `calc()` function token in place; returns whether it changed.
pub fn minify_calc(token: &mut Token) -> bool {
    let Some(children) = token.children.as_deref() else {
        return false;
    };
    if children.iter().any(contains_var) {
        return false;
    }
    let Some(term) = parse_sum(children) else {
        return false;
    };
    let Some(mut tokens) = serialize(&simplify(term)) else {
        return false;
    };
    if tokens.len() == 1 && tokens[0].kind.is_numeric() {
        // The whole expression folded to one number; the wrapper can go.
        let mut replacement = tokens.swap_remove(0);
        replacement.whitespace = token.whitespace;
        replacement.location = token.location;
        *token = replacement;
    } else {
        token.children = Some(tokens);
    }
    true
}

/// Serializes `value` in its shortest decimal form, declining when the text
/// would not parse back to the identical float.
pub fn serialize_number(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    let text = value.to_string();
    if text.parse::<f64>().ok() != Some(value) {
        return None;
    }
    Some(if let Some(fraction) = text.strip_prefix("0.") {
        format!(".{}", fraction)
    } else if let Some(fraction) = text.strip_prefix("-0.") {
        format!("-.{}", fraction)
    } else {
        text
    })
}

fn number_token(value: f64, unit: &str) -> Option<Token> {
    let text = serialize_number(value)?;
    Some(if unit.is_empty() {
        Token::number(text)
    } else if unit == "%" {
        Token::percentage(text)
    } else {
        Token::dimension(&text, unit)
    })
}

/// An operator delimiter. `+` and `-` carry mandatory whitespace.
fn op(c: char) -> Token {
    Token::delim(c).with_whitespace(Whitespace::BEFORE | Whitespace::AFTER)
}

/// Whether the token at `i` has whitespace on the given side, counting the
/// neighbor's adjacent bit as well.
fn spaced(tokens: &[Token], i: usize) -> (bool, bool) {
    let before = tokens[i].whitespace.contains(Whitespace::BEFORE) ||
        (i > 0 && tokens[i - 1].whitespace.contains(Whitespace::AFTER));
    let after = tokens[i].whitespace.contains(Whitespace::AFTER) ||
        tokens
            .get(i + 1)
            .is_some_and(|t| t.whitespace.contains(Whitespace::BEFORE));
    (before, after)
}

enum Item {
    Term(CalcTerm),
    Op(char),
}

fn parse_term(token: &Token) -> Option<CalcTerm> {
    Some(match token.kind {
        TokenKind::Number => CalcTerm::Number {
            value: token.number_value()?,
            unit: String::new(),
        },
        TokenKind::Percentage => CalcTerm::Number {
            value: token.percentage_value()?,
            unit: "%".to_owned(),
        },
        TokenKind::Dimension => CalcTerm::Number {
            value: token.dimension_value()?,
            unit: token.dimension_unit().to_owned(),
        },
        TokenKind::ParenthesisBlock => parse_sum(token.children.as_deref()?)?,
        TokenKind::Function if token.text.eq_ignore_ascii_case("calc") => {
            parse_sum(token.children.as_deref()?)?
        },
        // Opaque to the folder, but a legitimate operand.
        _ => CalcTerm::Value(token.clone()),
    })
}

fn parse_sum(tokens: &[Token]) -> Option<CalcTerm> {
    let mut items = Vec::with_capacity(tokens.len());
    for (i, token) in tokens.iter().enumerate() {
        let operator = if token.kind == TokenKind::Delim {
            match token.text.as_str() {
                "*" => Some('*'),
                "/" => Some('/'),
                // Additive operators require whitespace on both sides; a
                // bare plus or minus is not an operator here.
                "+" | "-" => match spaced(tokens, i) {
                    (true, true) => token.text.chars().next(),
                    _ => None,
                },
                _ => None,
            }
        } else {
            None
        };
        items.push(match operator {
            Some(operator) => Item::Op(operator),
            None => Item::Term(parse_term(token)?),
        });
    }

    // Multiplicative pass: fuse `a * b / c …` runs into products.
    let mut items = items.into_iter().peekable();
    let mut reduced: Vec<Item> = Vec::new();
    loop {
        let first = match items.next() {
            Some(Item::Term(term)) => term,
            _ => return None,
        };
        let mut product = vec![first];
        while let Some(Item::Op(operator @ ('*' | '/'))) = items.peek() {
            let operator = *operator;
            items.next();
            let rhs = match items.next() {
                Some(Item::Term(term)) => term,
                _ => return None,
            };
            product.push(if operator == '/' {
                CalcTerm::Invert(Box::new(rhs))
            } else {
                rhs
            });
        }
        reduced.push(Item::Term(if product.len() == 1 {
            product.swap_remove(0)
        } else {
            CalcTerm::Product(product)
        }));
        match items.next() {
            None => break,
            Some(Item::Op(operator @ ('+' | '-'))) => {
                if items.peek().is_none() {
                    return None;
                }
                reduced.push(Item::Op(operator));
            },
            // Two adjacent operands: the expression is not understood.
            Some(_) => return None,
        }
    }

    // Additive pass over the now strictly alternating items.
    let mut reduced = reduced.into_iter();
    let mut terms = match reduced.next() {
        Some(Item::Term(term)) => vec![term],
        _ => return None,
    };
    while let Some(item) = reduced.next() {
        let Item::Op(operator) = item else { return None };
        let Some(Item::Term(rhs)) = reduced.next() else {
            return None;
        };
        terms.push(if operator == '-' {
            CalcTerm::Negate(Box::new(rhs))
        } else {
            rhs
        });
    }
    Some(if terms.len() == 1 {
        terms.swap_remove(0)
    } else {
        CalcTerm::Sum(terms)
    })
}

fn simplify(term: CalcTerm) -> CalcTerm {
    match term {
        CalcTerm::Sum(terms) => {
            let mut flat: Vec<CalcTerm> = Vec::with_capacity(terms.len());
            for term in terms {
                match simplify(term) {
                    CalcTerm::Sum(inner) => flat.extend(inner),
                    other => flat.push(other),
                }
            }
            // Combine numeric terms sharing a unit, left to right.
            let mut i = 0;
            while i < flat.len() {
                if let CalcTerm::Number { unit, .. } = &flat[i] {
                    let unit = unit.clone();
                    let mut j = i + 1;
                    while j < flat.len() {
                        let addend = match &flat[j] {
                            CalcTerm::Number { value, unit: other }
                                if unit.eq_ignore_ascii_case(other) =>
                            {
                                Some(*value)
                            },
                            _ => None,
                        };
                        match addend {
                            Some(addend) => {
                                flat.remove(j);
                                if let CalcTerm::Number { value, .. } = &mut flat[i] {
                                    *value += addend;
                                }
                            },
                            None => j += 1,
                        }
                    }
                }
                i += 1;
            }
            collapse_single(flat, CalcTerm::Sum)
        },
        CalcTerm::Product(terms) => {
            let mut flat: Vec<CalcTerm> = Vec::with_capacity(terms.len());
            for term in terms {
                match simplify(term) {
                    CalcTerm::Product(inner) => flat.extend(inner),
                    other => flat.push(other),
                }
            }
            // Multiply the unitless factors together…
            let mut factor = 1.0;
            let mut folded_any = false;
            flat.retain(|term| match term {
                CalcTerm::Number { value, unit } if unit.is_empty() => {
                    factor *= *value;
                    folded_any = true;
                    false
                },
                _ => true,
            });
            if folded_any {
                // …then into a lone unit-bearing numeric factor if that is
                // all that remains, else back in as a trailing factor, where
                // serialization can flip it into a division. A factor of
                // exactly 1 is the multiplicative identity and vanishes
                // unless it is the whole product.
                match &mut flat[..] {
                    [CalcTerm::Number { value, .. }] => *value *= factor,
                    [] => flat.push(CalcTerm::Number {
                        value: factor,
                        unit: String::new(),
                    }),
                    _ if factor == 1.0 => {},
                    _ => flat.push(CalcTerm::Number {
                        value: factor,
                        unit: String::new(),
                    }),
                }
            }
            collapse_single(flat, CalcTerm::Product)
        },
        CalcTerm::Negate(inner) => match simplify(*inner) {
            CalcTerm::Number { value, unit } => CalcTerm::Number { value: -value, unit },
            CalcTerm::Negate(inner) => *inner,
            other => CalcTerm::Negate(Box::new(other)),
        },
        CalcTerm::Invert(inner) => match simplify(*inner) {
            CalcTerm::Number { value, unit } if unit.is_empty() => CalcTerm::Number {
                value: 1.0 / value,
                unit,
            },
            CalcTerm::Invert(inner) => *inner,
            other => CalcTerm::Invert(Box::new(other)),
        },
        leaf => leaf,
    }
}

fn collapse_single(mut terms: Vec<CalcTerm>, wrap: fn(Vec<CalcTerm>) -> CalcTerm) -> CalcTerm {
    if terms.len() == 1 {
        terms.swap_remove(0)
    } else {
        wrap(terms)
    }
}

fn serialize(term: &CalcTerm) -> Option<Vec<Token>> {
    match term {
        CalcTerm::Number { value, unit } => Some(vec![number_token(*value, unit)?]),
        CalcTerm::Value(token) => Some(vec![token.clone()]),
        CalcTerm::Sum(terms) => serialize_sum(terms),
        CalcTerm::Product(terms) => serialize_product(terms),
        CalcTerm::Negate(inner) => {
            let mut tokens = vec![number_token(-1.0, "")?, op('*')];
            tokens.extend(product_operand(inner, false)?);
            Some(tokens)
        },
        CalcTerm::Invert(inner) => {
            let mut tokens = vec![number_token(1.0, "")?, op('/')];
            tokens.extend(product_operand(inner, true)?);
            Some(tokens)
        },
    }
}

fn paren_block(tokens: Vec<Token>) -> Vec<Token> {
    vec![Token::parenthesis_block(tokens)]
}

fn sum_operand(term: &CalcTerm) -> Option<Vec<Token>> {
    match term {
        CalcTerm::Sum(_) => Some(paren_block(serialize(term)?)),
        // Products (and anything serialized in product shape) stay bare:
        // multiplicative precedence already binds tighter.
        _ => serialize(term),
    }
}

fn serialize_sum(terms: &[CalcTerm]) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    for (i, term) in terms.iter().enumerate() {
        if i == 0 {
            tokens.extend(sum_operand(term)?);
            continue;
        }
        match term {
            CalcTerm::Number { value, unit } if value.is_sign_negative() => {
                tokens.push(op('-'));
                tokens.push(number_token(-*value, unit)?);
            },
            CalcTerm::Negate(inner) => {
                tokens.push(op('-'));
                tokens.extend(sum_operand(inner)?);
            },
            _ => {
                tokens.push(op('+'));
                tokens.extend(sum_operand(term)?);
            },
        }
    }
    Some(tokens)
}

fn product_operand(term: &CalcTerm, after_division: bool) -> Option<Vec<Token>> {
    match term {
        CalcTerm::Sum(_) => Some(paren_block(serialize(term)?)),
        // `a / -1 * x` would rebind; keep the divisor grouped.
        CalcTerm::Product(_) | CalcTerm::Negate(_) | CalcTerm::Invert(_) if after_division => {
            Some(paren_block(serialize(term)?))
        },
        _ => serialize(term),
    }
}

fn serialize_product(terms: &[CalcTerm]) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    for (i, term) in terms.iter().enumerate() {
        let (mut operator, operand) = match term {
            CalcTerm::Invert(inner) => ('/', &**inner),
            _ => ('*', term),
        };
        if i == 0 && operator == '*' {
            tokens.extend(product_operand(operand, false)?);
            continue;
        }
        if i == 0 {
            // A leading reciprocal prints as `1 / x`.
            tokens.push(number_token(1.0, "")?);
        }
        if let CalcTerm::Number { value, unit } = operand {
            if unit.is_empty() {
                // Print whichever of `n` and its exact reciprocal is
                // shorter, flipping the operator to match.
                let mut text = serialize_number(*value)?;
                let reciprocal = 1.0 / *value;
                if reciprocal.is_finite() && 1.0 / reciprocal == *value {
                    if let Some(flipped) = serialize_number(reciprocal) {
                        if flipped.len() < text.len() {
                            operator = if operator == '*' { '/' } else { '*' };
                            text = flipped;
                        }
                    }
                }
                tokens.push(op(operator));
                tokens.push(Token::number(text));
                continue;
            }
        }
        tokens.push(op(operator));
        tokens.extend(product_operand(operand, operator == '/')?);
    }
    Some(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortest_form_numbers() {
        assert_eq!(serialize_number(26.0).as_deref(), Some("26"));
        assert_eq!(serialize_number(0.5).as_deref(), Some(".5"));
        assert_eq!(serialize_number(-0.25).as_deref(), Some("-.25"));
        assert_eq!(serialize_number(f64::NAN), None);
        assert_eq!(serialize_number(f64::INFINITY), None);
    }

    #[test]
    fn simplify_merges_matching_units() {
        let term = CalcTerm::Sum(vec![
            CalcTerm::Number { value: 1.0, unit: "px".into() },
            CalcTerm::Number { value: 2.0, unit: "PX".into() },
            CalcTerm::Number { value: 3.0, unit: "em".into() },
        ]);
        let CalcTerm::Sum(terms) = simplify(term) else {
            panic!("expected a sum");
        };
        assert_eq!(terms.len(), 2);
        assert_eq!(terms[0], CalcTerm::Number { value: 3.0, unit: "px".into() });
    }

    #[test]
    fn unit_factor_is_not_reinserted() {
        let opaque = CalcTerm::Value(Token::ident("x"));
        let term = CalcTerm::Product(vec![
            CalcTerm::Number { value: 2.0, unit: String::new() },
            opaque.clone(),
            CalcTerm::Invert(Box::new(CalcTerm::Number {
                value: 2.0,
                unit: String::new(),
            })),
        ]);
        assert_eq!(simplify(term), opaque);
    }

    #[test]
    fn negate_of_negate_collapses() {
        let inner = CalcTerm::Value(Token::ident("x"));
        let term = CalcTerm::Negate(Box::new(CalcTerm::Negate(Box::new(inner.clone()))));
        assert_eq!(simplify(term), inner);
    }
}
