use std::fmt;
use std::str::FromStr;

use crate::foundation::error::TweenreelError;
use crate::scene::element::Element;

/// Compound selector such as `rect.card#hero`; every present part must match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    name: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn matches(&self, el: &Element) -> bool {
        if let Some(tag) = &self.tag
            && tag != "*"
            && *tag != el.tag
        {
            return false;
        }
        if let Some(name) = &self.name
            && el.name.as_deref() != Some(name.as_str())
        {
            return false;
        }
        self.classes.iter().all(|c| el.classes.iter().any(|e| e == c))
    }
}

/// Comma-separated list of compound selectors, matched against scope descendants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Compound>,
}

impl Selector {
    pub fn matches(&self, el: &Element) -> bool {
        self.alternatives.iter().any(|c| c.matches(el))
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

fn is_ident(s: &str) -> bool {
    s.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

fn parse_compound(src: &str) -> Result<Compound, TweenreelError> {
    let bad = |why: &str| TweenreelError::config(format!("invalid selector '{src}': {why}"));
    let mut out = Compound::default();
    let mut rest = src;

    let tag_end = rest.find(['#', '.']).unwrap_or(rest.len());
    if tag_end > 0 {
        let tag = &rest[..tag_end];
        if tag != "*" && !is_ident(tag) {
            return Err(bad("unsupported character"));
        }
        out.tag = Some(tag.to_string());
    }
    rest = &rest[tag_end..];

    while let Some(sigil) = rest.chars().next() {
        let body = &rest[1..];
        let end = body.find(['#', '.']).unwrap_or(body.len());
        let ident = &body[..end];
        if ident.is_empty() {
            return Err(bad("empty identifier"));
        }
        if !is_ident(ident) {
            return Err(bad("unsupported character"));
        }
        match sigil {
            '#' if out.name.is_some() => return Err(bad("more than one #name")),
            '#' => out.name = Some(ident.to_string()),
            _ => out.classes.push(ident.to_string()),
        }
        rest = &body[end..];
    }

    if out == Compound::default() {
        return Err(bad("empty selector"));
    }
    Ok(out)
}

impl FromStr for Selector {
    type Err = TweenreelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let alternatives = s
            .split(',')
            .map(|part| {
                let part = part.trim();
                if part.contains(char::is_whitespace) {
                    return Err(TweenreelError::config(format!(
                        "descendant combinators are not supported: '{part}'"
                    )));
                }
                parse_compound(part)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            source: s.trim().to_string(),
            alternatives,
        })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/selector.rs"]
mod tests;
