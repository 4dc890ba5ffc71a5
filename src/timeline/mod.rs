pub(crate) mod bound;
pub(crate) mod builder;
pub(crate) mod position;
pub(crate) mod tween;
