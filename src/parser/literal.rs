use nom::digit;
use nom::IResult::Done;
use std::num::{ParseFloatError, ParseIntError};
use std::str::{self, FromStr};

use super::super::expressions::Literal;

named!(pub string_literal (&[u8]) -> Literal, do_parse!(
    tag!("'") >>
    str: map!(many0!(none_of!("'\r\n")), |chars: Vec<char>| {
        let result: String = chars.into_iter().collect();
        result
    }) >>
    tag!("'") >>
    (Literal::String(str))
));

fn to_float((ipart, dpart, float): (&str, &str, bool)) -> Result<Literal, ParseFloatError> {
    let string = format!("{}.{}", ipart, dpart);
    if float {
        f32::from_str(&string).map(Literal::Float)
    } else {
        f64::from_str(&string).map(Literal::Double)
    }
}

fn to_integer((ipart, long): (&str, bool)) -> Result<Literal, ParseIntError> {
    if long {
        i64::from_str(ipart).map(Literal::Long)
    } else {
        i32::from_str(ipart).map(Literal::Int)
    }
}

named!(num_literal (&[u8]) -> Literal, alt_complete!(
// Floats or Doubles
    map_res!(do_parse!(
        ipart: opt!(complete!(map_res!(digit, str::from_utf8))) >>
        tag!(".") >>
        dpart: opt!(complete!(map_res!(digit, str::from_utf8))) >>
        float: opt!(complete!(tag_no_case!("F"))) >>
        (ipart.unwrap_or("0"), dpart.unwrap_or("0"), float.is_some())
    ), to_float) |
// Int or Long
    map_res!(do_parse!(
        ipart: map_res!(digit, str::from_utf8) >>
        long: opt!(complete!(tag!("L"))) >>
        (ipart, long.is_some())
    ), to_integer)
));

fn negate(literal: Literal) -> Option<Literal> {
    match literal {
        Literal::Int(i) => Some(Literal::Int(-i)),
        Literal::Long(l) => Some(Literal::Long(-l)),
        Literal::Float(f) => Some(Literal::Float(-f)),
        Literal::Double(d) => Some(Literal::Double(-d)),
        _ => None,
    }
}

/// Reads a whole atom as an optionally signed number. Returns `None` unless every byte of the atom
/// is part of the number.
pub fn signed_number(token: &[u8]) -> Option<Literal> {
    let (negative, digits) = match token.first() {
        Some(&b'-') => (true, &token[1..]),
        Some(&b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    match num_literal(digits) {
        Done(rest, literal) if rest.is_empty() => {
            if negative { negate(literal) } else { Some(literal) }
        }
        _ => None,
    }
}
