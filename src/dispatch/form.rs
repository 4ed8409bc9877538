//! Splitting of `name=value&name=value` bodies.
//!
//! Values are taken verbatim: no percent-decoding and no `+` to space.

/// One `name=value` field. A field without `=` has an empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

/// Splits `body` on `&`, then each piece on its first `=`.
///
/// Empty pieces (`a=1&&b=2`) are skipped; order is preserved.
pub fn fields(body: &str) -> Vec<Field<'_>> {
    body.split('&')
        .filter(|piece| !piece.is_empty())
        .map(|piece| match piece.split_once('=') {
            Some((name, value)) => Field { name, value },
            None => Field {
                name: piece,
                value: "",
            },
        })
        .collect()
}

/// Extracts the `(key, value)` pair from a PUT body.
///
/// The first field carries the value and the second carries the key, so
/// `val=5&key=foo` yields `("foo", "5")`. Returns `None` when there is no
/// second field or the key is empty.
pub fn key_value(body: &str) -> Option<(&str, &str)> {
    let fields = fields(body.trim_end_matches(['\r', '\n']));

    let value = fields.first()?.value;
    let key = fields.get(1)?.value;

    if key.is_empty() {
        return None;
    }

    Some((key, value))
}
