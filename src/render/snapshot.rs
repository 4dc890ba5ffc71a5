use std::collections::BTreeMap;

use crate::{
    animation::value::PropValue,
    foundation::core::{Affine, FrameIndex},
    foundation::math::Fnv1a64,
};

/// State of one mounted element on one frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ElementSnapshot {
    /// Child indices from the composition root, e.g. `"0.2.1"`; the root itself is `""`.
    pub path: String,
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub props: BTreeMap<String, PropValue>,
    /// Local affine from `x`/`y`/`rotation`/`scale*`, as kurbo coefficients.
    pub transform: [f64; 6],
}

impl ElementSnapshot {
    pub fn affine(&self) -> Affine {
        Affine::new(self.transform)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.props.get(key).and_then(PropValue::as_number)
    }
}

/// Everything a painter needs for one frame, in document order.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameSnapshot {
    pub frame: FrameIndex,
    pub elements: Vec<ElementSnapshot>,
}

impl FrameSnapshot {
    pub fn element(&self, name: &str) -> Option<&ElementSnapshot> {
        self.elements
            .iter()
            .find(|e| e.name.as_deref() == Some(name))
    }

    /// Hash of the visual state, ignoring the frame number. Equal snapshots hash equal.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_u64(self.elements.len() as u64);
        for e in &self.elements {
            h.write_str(&e.path);
            h.write_str(&e.tag);
            write_opt_str(&mut h, e.name.as_deref());
            write_opt_str(&mut h, e.text.as_deref());
            h.write_u64(e.props.len() as u64);
            for (k, v) in &e.props {
                h.write_str(k);
                write_value(&mut h, v);
            }
            for c in e.transform {
                h.write_f64(c);
            }
        }
        h.finish()
    }
}

fn write_opt_str(h: &mut Fnv1a64, s: Option<&str>) {
    match s {
        Some(s) => {
            h.write_u8(1);
            h.write_str(s);
        }
        None => h.write_u8(0),
    }
}

fn write_value(h: &mut Fnv1a64, v: &PropValue) {
    match v {
        PropValue::Number(n) => {
            h.write_u8(0);
            h.write_f64(*n);
        }
        PropValue::Color(c) => {
            h.write_u8(1);
            h.write_bytes(&[c.r, c.g, c.b, c.a]);
        }
        PropValue::Text(s) => {
            h.write_u8(2);
            h.write_str(s);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/snapshot.rs"]
mod tests;
