use nom::multispace;

/// Whether the byte can appear in a bare atom. Atoms run until whitespace, a parenthesis, a quote
/// or a statement separator.
pub fn is_atom_char(c: u8) -> bool {
    match c {
        b' ' | b'\t' | b'\r' | b'\n' | b'(' | b')' | b'\'' | b';' => false,
        _ => true,
    }
}

/// Whether an atom should be read as a number rather than a symbol. A lone `+` or `-` is the
/// arithmetic operator, not a sign.
pub fn looks_numeric(token: &[u8]) -> bool {
    let starts_number = |c: &u8| c.is_ascii_digit() || *c == b'.';
    match token.first() {
        Some(&b'-') | Some(&b'+') => token.get(1).map_or(false, starts_number),
        Some(c) => starts_number(c),
        None => false,
    }
}

named!(pub token (&[u8]) -> &[u8], take_while1!(is_atom_char));

named!(pub skip_space (&[u8]) -> (), map!(opt!(complete!(multispace)), |_| ()));

named!(pub separator (&[u8]) -> (), do_parse!(
    skip_space >>
    complete!(tag!(";")) >>
    ()
));
