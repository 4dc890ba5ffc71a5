use super::*;

#[test]
fn ops_are_recorded_in_call_order() {
    let mut tl = Timeline::new();
    tl.to(".a", TweenVars::new().prop("x", 10.0), "+=0")
        .unwrap()
        .add_label("mid", ">")
        .unwrap()
        .set(".b", TweenVars::new().prop("opacity", 0.0), "mid")
        .unwrap();
    assert_eq!(tl.len(), 3);
    assert!(matches!(tl.ops[1], TimelineOp::Label { .. }));
    match &tl.ops[2] {
        TimelineOp::Tween(op) => {
            assert_eq!(op.kind, TweenKind::Set);
            assert_eq!(op.vars.duration, Some(0.0));
        }
        other => panic!("unexpected op {other:?}"),
    }
}

#[test]
fn from_to_keeps_from_values_separately() {
    let mut tl = Timeline::new();
    tl.from_to(
        "#dot",
        TweenVars::new().prop("x", 0.0).duration(99.0),
        TweenVars::new().prop("x", 100.0).duration(2.0),
        0.0,
    )
    .unwrap();
    match &tl.ops[0] {
        TimelineOp::Tween(op) => {
            assert_eq!(op.from_props["x"], PropValue::Number(0.0));
            assert_eq!(op.vars.props["x"], PropValue::Number(100.0));
            assert_eq!(op.vars.duration, Some(2.0));
        }
        other => panic!("unexpected op {other:?}"),
    }
}

#[test]
fn invalid_inputs_fail_at_authoring_time() {
    let mut tl = Timeline::new();
    assert!(tl.to(".a", TweenVars::new().duration(-1.0), "+=0").is_err());
    assert!(tl.to(".a", TweenVars::new(), "<nope").is_err());
    assert!(tl.add_label("two words", 0.0).is_err());
    assert!(tl.is_empty());
}

#[test]
fn nested_timelines_are_single_children() {
    let mut child = Timeline::new();
    child.to(".a", TweenVars::new().prop("x", 1.0), "+=0").unwrap();
    child.to(".b", TweenVars::new().prop("x", 1.0), "+=0").unwrap();
    let mut parent = Timeline::new();
    parent.add(child, 1.0).unwrap();
    assert_eq!(parent.len(), 1);
}
