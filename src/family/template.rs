//! `{param}` token templates

use crate::{Error, InstanceKey, Result};

enum Piece<'a> {
    Literal(&'a str),
    Param(&'a str),
}

fn parse(template: &str) -> Result<Vec<Piece<'_>>> {
    let mut pieces = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find(['{', '}']) {
        if rest[open..].starts_with('}') {
            return Err(Error::Config(format!("unmatched '}}' in template {template:?}")));
        }
        if open > 0 {
            pieces.push(Piece::Literal(&rest[..open]));
        }
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| Error::Config(format!("unclosed '{{' in template {template:?}")))?;
        let name = &after[..close];
        if name.is_empty() || name.contains('{') {
            return Err(Error::Config(format!(
                "invalid placeholder {{{name}}} in template {template:?}"
            )));
        }
        pieces.push(Piece::Param(name));
        rest = &after[close + 1..];
    }

    if !rest.is_empty() {
        pieces.push(Piece::Literal(rest));
    }
    Ok(pieces)
}

/// Parameter names referenced by `template`, in order of appearance.
pub(crate) fn placeholders(template: &str) -> Result<Vec<&str>> {
    Ok(parse(template)?
        .into_iter()
        .filter_map(|piece| match piece {
            Piece::Param(name) => Some(name),
            Piece::Literal(_) => None,
        })
        .collect())
}

/// Substitute the key's parameter values into `template`.
pub(crate) fn render(template: &str, key: &InstanceKey) -> Result<String> {
    let mut out = String::with_capacity(template.len() + 8);
    for piece in parse(template)? {
        match piece {
            Piece::Literal(text) => out.push_str(text),
            Piece::Param(name) => {
                let value = key.get(name).ok_or_else(|| {
                    Error::Config(format!(
                        "template {template:?} needs parameter {name}, instance {key} lacks it"
                    ))
                })?;
                out.push_str(&value.to_string());
            }
        }
    }
    Ok(out)
}
