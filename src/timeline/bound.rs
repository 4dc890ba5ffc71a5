use std::collections::BTreeMap;

use crate::{
    animation::ease::Ease,
    animation::value::{Lerp, PropValue},
    foundation::error::{TweenreelError, TweenreelResult},
    scene::element::{ElementId, Scene},
    scene::selector::Selector,
    timeline::builder::{Timeline, TimelineOp, TweenOp},
    timeline::position::Cursor,
    timeline::tween::{Targets, TweenKind},
};

#[derive(Clone, Copy, Debug, PartialEq)]
struct Timing {
    start: f64,
    duration: f64,
    repeat: u32,
    yoyo: bool,
    repeat_delay: f64,
    ease: Ease,
}

impl Timing {
    fn total(&self) -> f64 {
        let repeats = f64::from(self.repeat);
        self.duration * (repeats + 1.0) + self.repeat_delay * repeats
    }

    fn final_ratio(&self) -> f64 {
        if self.yoyo && self.repeat % 2 == 1 {
            0.0
        } else {
            1.0
        }
    }

    /// Eased progress at absolute time `t`, clamped to the tween's own span.
    fn ratio_at(&self, t: f64) -> f64 {
        let local = t - self.start;
        if local < 0.0 {
            return 0.0;
        }
        if self.duration <= 0.0 || local >= self.total() {
            return self.final_ratio();
        }
        let cycle = self.duration + self.repeat_delay;
        let iteration = ((local / cycle).floor() as u64).min(u64::from(self.repeat));
        let within = local - (iteration as f64) * cycle;
        let raw = (within / self.duration).min(1.0);
        if self.yoyo && iteration % 2 == 1 {
            self.ease.apply(1.0 - raw)
        } else {
            self.ease.apply(raw)
        }
    }
}

#[derive(Clone, Debug)]
struct Segment {
    timing: Timing,
    from: PropValue,
    to: PropValue,
    immediate: bool,
}

impl Segment {
    fn value_at(&self, t: f64) -> PropValue {
        PropValue::lerp(&self.from, &self.to, self.timing.ratio_at(t))
    }
}

/// Every tween touching one property of one element, sorted by `(start, insertion order)`.
#[derive(Clone, Debug)]
struct Track {
    element: ElementId,
    prop: String,
    /// Value before the timeline touched it; `None` if the property was absent.
    base: Option<PropValue>,
    segments: Vec<Segment>,
}

impl Track {
    /// The latest-starting tween that has started wins; before any start, the first
    /// immediate-render tween shows its from value; otherwise the base value.
    fn value_at(&self, t: f64) -> Option<PropValue> {
        if let Some(seg) = self.segments.iter().rev().find(|s| s.timing.start <= t) {
            return Some(seg.value_at(t));
        }
        match self.segments.iter().find(|s| s.immediate) {
            Some(seg) => Some(seg.from.clone()),
            None => self.base.clone(),
        }
    }
}

#[derive(Clone, Debug)]
struct RawSegment {
    element: ElementId,
    prop: String,
    from: Option<PropValue>,
    to: Option<PropValue>,
    timing: Timing,
    immediate: bool,
    order: usize,
}

struct Layout<'a> {
    scene: &'a Scene,
    scope: ElementId,
    next_order: usize,
    tweens: usize,
    raw: Vec<RawSegment>,
}

impl Layout<'_> {
    /// Places `tl` at absolute `offset`; returns its local duration and labels.
    fn place(
        &mut self,
        tl: &Timeline,
        offset: f64,
    ) -> TweenreelResult<(f64, BTreeMap<String, f64>)> {
        tl.defaults.validate()?;
        let mut cursor = Cursor::default();
        let mut labels: BTreeMap<String, f64> = BTreeMap::new();

        for op in &tl.ops {
            match op {
                TimelineOp::Label { name, position } => {
                    let t = position.resolve(cursor, |n| labels.get(n).copied())?;
                    labels.insert(name.clone(), t);
                }
                TimelineOp::Tween(tween) => {
                    let start = tween
                        .position
                        .resolve(cursor, |n| labels.get(n).copied())?;
                    let end = self.place_tween(tl, tween, offset, start)?;
                    cursor.prev_start = start;
                    cursor.prev_end = end;
                    cursor.end = cursor.end.max(end);
                }
                TimelineOp::Nested { child, position } => {
                    let start = position.resolve(cursor, |n| labels.get(n).copied())?;
                    let (len, _) = self.place(child, offset + start)?;
                    cursor.prev_start = start;
                    cursor.prev_end = start + len;
                    cursor.end = cursor.end.max(start + len);
                }
            }
        }
        Ok((cursor.end, labels))
    }

    /// Returns the local end time of the whole (possibly staggered) tween.
    fn place_tween(
        &mut self,
        tl: &Timeline,
        tween: &TweenOp,
        offset: f64,
        start: f64,
    ) -> TweenreelResult<f64> {
        let targets = self.resolve_targets(&tween.targets)?;
        let vars = &tween.vars;
        let immediate = vars
            .immediate_render
            .unwrap_or_else(|| tween.kind.immediate_render_default());

        let mut keys: Vec<&String> = vars.props.keys().chain(tween.from_props.keys()).collect();
        keys.sort();
        keys.dedup();

        let mut end = start;
        for (i, element) in targets.iter().enumerate() {
            let local_start = start + vars.stagger.map_or(0.0, |s| s.offset(i, targets.len()));
            let timing = Timing {
                start: offset + local_start,
                duration: vars.duration.unwrap_or(tl.defaults.duration),
                repeat: vars.repeat,
                yoyo: vars.yoyo,
                repeat_delay: vars.repeat_delay,
                ease: vars.ease.unwrap_or(tl.defaults.ease),
            };
            end = end.max(local_start + timing.total());
            let order = self.next_order;
            self.next_order += 1;

            for key in &keys {
                let given = vars.props.get(*key).cloned();
                let (from, to) = match tween.kind {
                    TweenKind::To | TweenKind::Set => (None, given),
                    TweenKind::From => (given, None),
                    TweenKind::FromTo => (tween.from_props.get(*key).cloned(), given),
                };
                self.raw.push(RawSegment {
                    element: *element,
                    prop: (*key).clone(),
                    from,
                    to,
                    timing,
                    immediate,
                    order,
                });
            }
        }
        self.tweens += targets.len();
        Ok(end)
    }

    fn resolve_targets(&self, targets: &Targets) -> TweenreelResult<Vec<ElementId>> {
        let mut out = match targets {
            Targets::Handles(ids) => {
                for id in ids {
                    if !self.scene.contains(*id) {
                        return Err(TweenreelError::config(
                            "tween target handle does not refer to a live element",
                        ));
                    }
                    if !self.scene.is_within(self.scope, *id) {
                        return Err(TweenreelError::config(
                            "tween target lies outside the timeline scope",
                        ));
                    }
                }
                ids.clone()
            }
            Targets::Selector(src) => {
                let selector: Selector = src.parse()?;
                self.scene.select(self.scope, &selector)
            }
        };
        if out.is_empty() {
            let what = match targets {
                Targets::Selector(src) => format!("selector '{src}' matched no element in scope"),
                Targets::Handles(_) => "tween has no targets".to_string(),
            };
            return Err(TweenreelError::config(what));
        }
        let mut seen = std::collections::HashSet::new();
        out.retain(|id| seen.insert(*id));
        Ok(out)
    }
}

/// GSAP-style implicit start value for numeric properties missing from an element.
fn implicit_default(prop: &str, explicit: Option<&PropValue>) -> Option<PropValue> {
    match explicit {
        Some(PropValue::Number(_)) => {
            let v = match prop {
                "opacity" | "autoAlpha" | "scale" | "scaleX" | "scaleY" => 1.0,
                _ => 0.0,
            };
            Some(PropValue::Number(v))
        }
        _ => None,
    }
}

fn build_track(
    scene: &Scene,
    element: ElementId,
    prop: String,
    mut raw: Vec<RawSegment>,
) -> TweenreelResult<Track> {
    raw.sort_by(|a, b| {
        a.timing
            .start
            .total_cmp(&b.timing.start)
            .then(a.order.cmp(&b.order))
    });
    let base = scene.prop(element, &prop).cloned();

    let mut segments: Vec<Segment> = Vec::with_capacity(raw.len());
    for r in raw {
        let current = match segments.last() {
            Some(prev) => Some(prev.value_at(r.timing.start)),
            None => base
                .clone()
                .or_else(|| implicit_default(&prop, r.to.as_ref().or(r.from.as_ref()))),
        };
        let missing = || {
            TweenreelError::animation(format!(
                "property '{prop}' has no starting value; set it on the element or tween it with from_to"
            ))
        };
        let to = r.to.or_else(|| current.clone()).ok_or_else(missing)?;
        let from = match r.from.or(current) {
            Some(v) => v,
            // Instant jumps never show their start value.
            None if r.timing.duration <= 0.0 => to.clone(),
            None => return Err(missing()),
        };
        from.check_compatible(&to, &prop)?;
        segments.push(Segment {
            timing: r.timing,
            from,
            to,
            immediate: r.immediate,
        });
    }

    Ok(Track {
        element,
        prop,
        base,
        segments,
    })
}

/// A timeline resolved against a scope: targets fixed, start values captured.
///
/// Immutable once built. [`BoundTimeline::seek`] recomputes every tracked property from
/// scratch, so the result depends on the seek time only, never on earlier seeks.
#[derive(Clone, Debug)]
pub struct BoundTimeline {
    scope: ElementId,
    tracks: Vec<Track>,
    duration: f64,
    labels: BTreeMap<String, f64>,
    tween_count: usize,
}

impl BoundTimeline {
    #[tracing::instrument(skip(timeline, scene))]
    pub fn bind(timeline: &Timeline, scope: ElementId, scene: &Scene) -> TweenreelResult<Self> {
        if !scene.contains(scope) {
            return Err(TweenreelError::config(
                "timeline scope is not attached to a live element",
            ));
        }

        let mut layout = Layout {
            scene,
            scope,
            next_order: 0,
            tweens: 0,
            raw: Vec::new(),
        };
        let (duration, labels) = layout.place(timeline, 0.0)?;

        let mut grouped: BTreeMap<(ElementId, String), Vec<RawSegment>> = BTreeMap::new();
        for r in layout.raw {
            grouped
                .entry((r.element, r.prop.clone()))
                .or_default()
                .push(r);
        }
        let tracks = grouped
            .into_iter()
            .map(|((element, prop), raw)| build_track(scene, element, prop, raw))
            .collect::<TweenreelResult<Vec<_>>>()?;

        tracing::debug!(
            tweens = layout.tweens,
            tracks = tracks.len(),
            duration,
            "timeline bound"
        );
        Ok(Self {
            scope,
            tracks,
            duration,
            labels,
            tween_count: layout.tweens,
        })
    }

    pub fn scope(&self) -> ElementId {
        self.scope
    }

    /// End of the last tween, in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn label_time(&self, name: &str) -> Option<f64> {
        self.labels.get(name).copied()
    }

    /// Number of per-target tweens (a staggered tween over three elements counts three).
    pub fn tween_count(&self) -> usize {
        self.tween_count
    }

    /// Value `prop` of `element` would have at `time`; `None` if untracked or absent.
    pub fn value_at(&self, element: ElementId, prop: &str, time: f64) -> Option<PropValue> {
        self.tracks
            .iter()
            .find(|t| t.element == element && t.prop == prop)
            .and_then(|t| t.value_at(clamp_time(time)))
    }

    /// Write every tracked property as of `time`. Returns the number of properties written.
    pub fn seek(&self, scene: &mut Scene, time: f64) -> usize {
        let t = clamp_time(time);
        let mut written = 0;
        for track in &self.tracks {
            let ok = match track.value_at(t) {
                Some(v) => scene.set_prop(track.element, &track.prop, v),
                None => {
                    scene.remove_prop(track.element, &track.prop);
                    scene.contains(track.element)
                }
            };
            written += usize::from(ok);
        }
        written
    }

    /// Restore every tracked property to its pre-timeline state.
    pub fn revert(&self, scene: &mut Scene) {
        for track in &self.tracks {
            match &track.base {
                Some(v) => {
                    scene.set_prop(track.element, &track.prop, v.clone());
                }
                None => {
                    scene.remove_prop(track.element, &track.prop);
                }
            }
        }
    }
}

fn clamp_time(t: f64) -> f64 {
    if t.is_nan() { 0.0 } else { t.max(0.0) }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/bound.rs"]
mod tests;
