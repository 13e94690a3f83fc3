// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP record tokenizer using nom combinators
//!
//! Parses `#id=TYPE(...)` instance records and `NAME(...)` header records
//! into tokens, then lowers tokens to model [`Value`]s.

use ifc_export_model::{EntityId, Value};
use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{opt, recognize},
    multi::separated_list0,
    sequence::{delimited, pair},
    IResult, Parser,
};

/// Raw token from a STEP record
#[derive(Clone, Debug, PartialEq)]
pub enum Token<'a> {
    /// Entity reference (#123)
    EntityRef(u32),
    /// String body between the quotes, still escaped
    String(&'a str),
    Integer(i64),
    Float(f64),
    /// Enumeration (.VALUE.)
    Enum(&'a str),
    List(Vec<Token<'a>>),
    /// Typed value like IFCLABEL('text')
    TypedValue(&'a str, Vec<Token<'a>>),
    /// Null value ($)
    Null,
    /// Derived value (*)
    Derived,
}

impl Token<'_> {
    /// Lower to an owned model value
    ///
    /// `.T.` and `.F.` become booleans, `*` reads back as unset.
    pub fn to_value(&self) -> Value {
        match self {
            Token::EntityRef(id) => Value::Reference(EntityId(*id)),
            Token::String(s) => Value::Text(decode_string(s)),
            Token::Integer(i) => Value::Integer(*i),
            Token::Float(f) => Value::Real(*f),
            Token::Enum("T") => Value::Bool(true),
            Token::Enum("F") => Value::Bool(false),
            Token::Enum(s) => Value::Enum((*s).to_string()),
            Token::List(items) => Value::List(items.iter().map(Token::to_value).collect()),
            Token::TypedValue(name, args) => {
                let inner = match args.as_slice() {
                    [single] => single.to_value(),
                    many => Value::List(many.iter().map(Token::to_value).collect()),
                };
                Value::typed(*name, inner)
            }
            Token::Null | Token::Derived => Value::Unset,
        }
    }
}

/// Decode the ISO 10303-21 escapes of a string body
///
/// Handles `''`, `\\`, `\S\`, `\X\HH`, `\X2\...\X0\` and `\X4\...\X0\`.
/// Malformed directives are kept verbatim.
pub fn decode_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix("''") {
            out.push('\'');
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("\\\\") {
            out.push('\\');
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("\\S\\") {
            match tail.chars().next() {
                Some(c) if c.is_ascii() => {
                    out.push(char::from(c as u8 + 0x80));
                    rest = &tail[1..];
                }
                _ => {
                    out.push_str("\\S\\");
                    rest = tail;
                }
            }
        } else if let Some(tail) = rest.strip_prefix("\\X2\\") {
            rest = decode_wide(tail, 4, &mut out).unwrap_or_else(|| {
                out.push_str("\\X2\\");
                tail
            });
        } else if let Some(tail) = rest.strip_prefix("\\X4\\") {
            rest = decode_wide(tail, 8, &mut out).unwrap_or_else(|| {
                out.push_str("\\X4\\");
                tail
            });
        } else if let Some(tail) = rest.strip_prefix("\\X\\") {
            match tail.get(..2).and_then(|hex| u8::from_str_radix(hex, 16).ok()) {
                Some(byte) => {
                    out.push(char::from(byte));
                    rest = &tail[2..];
                }
                None => {
                    out.push_str("\\X\\");
                    rest = tail;
                }
            }
        } else {
            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                out.push(c);
            }
            rest = chars.as_str();
        }
    }

    out
}

/// Decode hex groups of `width` digits up to `\X0\`, returning the remainder
fn decode_wide<'a>(input: &'a str, width: usize, out: &mut String) -> Option<&'a str> {
    let end = input.find("\\X0\\")?;
    let hex = &input[..end];
    if hex.is_empty() || hex.len() % width != 0 {
        return None;
    }

    let mut decoded = String::with_capacity(hex.len() / width);
    for chunk in hex.as_bytes().chunks(width) {
        let digits = std::str::from_utf8(chunk).ok()?;
        let code = u32::from_str_radix(digits, 16).ok()?;
        decoded.push(char::from_u32(code)?);
    }

    out.push_str(&decoded);
    Some(&input[end + 4..])
}

// ============================================================================
// Parsing Primitives
// ============================================================================

fn ws(input: &str) -> IResult<&str, ()> {
    let (input, _) = multispace0(input)?;
    Ok((input, ()))
}

/// Parse an entity reference (#123)
fn entity_ref(input: &str) -> IResult<&str, Token> {
    let (input, _) = char('#')(input)?;
    let (input, digits) = take_while1(|c: char| c.is_ascii_digit())(input)?;
    let id = lexical_core::parse::<u32>(digits.as_bytes()).map_err(|_| {
        nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Digit))
    })?;
    Ok((input, Token::EntityRef(id)))
}

/// Parse a STEP string ('text' with '' for escaped quotes)
fn step_string(input: &str) -> IResult<&str, Token> {
    let (input, _) = char('\'')(input)?;

    let bytes = input.as_bytes();
    let mut end = 0;
    while end < bytes.len() {
        if bytes[end] == b'\'' {
            if end + 1 < bytes.len() && bytes[end + 1] == b'\'' {
                end += 2;
                continue;
            }
            break;
        }
        end += 1;
    }

    if end >= bytes.len() {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )));
    }

    Ok((&input[end + 1..], Token::String(&input[..end])))
}

/// Parse a number (integer or float)
fn number(input: &str) -> IResult<&str, Token> {
    let (input, num_str) = recognize((
        opt(alt((char('-'), char('+')))),
        take_while1(|c: char| c.is_ascii_digit()),
        opt(pair(char('.'), take_while(|c: char| c.is_ascii_digit()))),
        opt((
            alt((char('e'), char('E'))),
            opt(alt((char('+'), char('-')))),
            take_while1(|c: char| c.is_ascii_digit()),
        )),
    ))
    .parse(input)?;

    let invalid = || nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Float));

    if num_str.contains(['.', 'e', 'E']) {
        let normalized = normalize_real(num_str);
        let f: f64 = lexical_core::parse(normalized.as_bytes()).map_err(|_| invalid())?;
        Ok((input, Token::Float(f)))
    } else {
        let i: i64 = lexical_core::parse(num_str.as_bytes()).map_err(|_| invalid())?;
        Ok((input, Token::Integer(i)))
    }
}

/// Rewrite Part-21 reals like `1.` and `1.E5` into `1.0` and `1.0E5`
fn normalize_real(num: &str) -> String {
    let mut out = num.replace(".E", ".0E").replace(".e", ".0e");
    if out.ends_with('.') {
        out.push('0');
    }
    out
}

/// Parse an enumeration (.VALUE.)
fn enumeration(input: &str) -> IResult<&str, Token> {
    let (input, _) = char('.')(input)?;
    let (input, name) = take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)?;
    let (input, _) = char('.')(input)?;
    Ok((input, Token::Enum(name)))
}

fn null_value(input: &str) -> IResult<&str, Token> {
    let (input, _) = char('$')(input)?;
    Ok((input, Token::Null))
}

fn derived_value(input: &str) -> IResult<&str, Token> {
    let (input, _) = char('*')(input)?;
    Ok((input, Token::Derived))
}

/// Parenthesised, comma separated tokens
fn token_list(input: &str) -> IResult<&str, Vec<Token>> {
    delimited(
        pair(char('('), ws),
        separated_list0((ws, char(','), ws), token),
        pair(ws, char(')')),
    )
    .parse(input)
}

fn list(input: &str) -> IResult<&str, Token> {
    let (input, items) = token_list(input)?;
    Ok((input, Token::List(items)))
}

/// Parse a typed value like IFCLABEL('text')
fn typed_value(input: &str) -> IResult<&str, Token> {
    let (input, type_name) = keyword(input)?;
    let (input, _) = ws(input)?;
    let (input, args) = token_list(input)?;
    Ok((input, Token::TypedValue(type_name, args)))
}

fn keyword(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

/// Parse any token
fn token(input: &str) -> IResult<&str, Token> {
    alt((
        entity_ref,
        step_string,
        null_value,
        derived_value,
        enumeration,
        number,
        list,
        typed_value,
    ))
    .parse(input)
}

// ============================================================================
// Record Parsing
// ============================================================================

/// Parse a `NAME(args);` record as found in the HEADER section
pub fn parse_record(input: &str) -> Result<(&str, Vec<Token>), String> {
    let input = input.trim_start();
    let (input, name) = keyword(input).map_err(|_| "Expected record keyword".to_string())?;
    let (input, _) = ws(input).map_err(|e| format!("{:?}", e))?;
    let (_, tokens) = token_list(input).map_err(|e| format!("Failed to parse arguments: {:?}", e))?;
    Ok((name, tokens))
}

/// Parse a complete instance record
///
/// Format: `#123=IFCWALL(attr1,attr2,...);`
pub fn parse_entity(input: &str) -> Result<(u32, &str, Vec<Value>), String> {
    let input = input.trim_start();

    let (input, _) = char::<&str, nom::error::Error<&str>>('#')
        .parse(input)
        .map_err(|_| "Expected # at start of entity")?;

    let (input, id_str) =
        take_while1::<_, &str, nom::error::Error<&str>>(|c: char| c.is_ascii_digit())
            .parse(input)
            .map_err(|_| "Expected entity ID")?;
    let id: u32 = id_str.parse().map_err(|_| "Invalid entity ID")?;

    let (input, _) = (ws, char('='), ws)
        .parse(input)
        .map_err(|_: nom::Err<nom::error::Error<&str>>| "Expected = after entity ID")?;

    let (name, tokens) = parse_record(input)?;
    let values = tokens.iter().map(Token::to_value).collect();

    Ok((id, name, values))
}
