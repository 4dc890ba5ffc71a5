use super::*;

fn comp(json: &str) -> CompositionDef {
    serde_json::from_str(json).unwrap()
}

fn fade_comp() -> CompositionDef {
    comp(
        r##"{
  "id": "fade", "fps": 30, "width": 320, "height": 180, "duration_in_frames": 61,
  "root": {
    "tag": "div",
    "children": [ { "tag": "text", "name": "title", "text": "Hi", "props": { "opacity": 0 } } ],
    "timeline": { "steps": [
      { "op": "to", "targets": "#title", "vars": { "opacity": 1, "duration": 1, "ease": "none" } }
    ] }
  }
}"##,
    )
}

fn sequenced_comp() -> CompositionDef {
    comp(
        r##"{
  "id": "seq", "fps": 30, "width": 320, "height": 180, "duration_in_frames": 60,
  "root": {
    "tag": "div",
    "children": [
      { "tag": "rect", "name": "dot0", "classes": ["dot"], "props": { "x": 0 } },
      { "tag": "rect", "name": "dot1", "classes": ["dot"], "props": { "x": 0 },
        "sequence": { "from": 10, "duration_in_frames": 20 } },
      { "tag": "g", "name": "group", "sequence": { "from": 30, "duration_in_frames": 20 },
        "children": [
          { "tag": "text", "name": "caption", "text": "Hello", "props": { "opacity": 0 } }
        ],
        "timeline": { "steps": [
          { "op": "to", "targets": "#caption", "vars": { "opacity": 1, "duration": 0.5, "ease": "none" } }
        ] } }
    ],
    "timeline": { "steps": [
      { "op": "to", "targets": ".dot", "vars": { "x": 100, "duration": 1, "stagger": 0.25, "ease": "none" } }
    ] }
  }
}"##,
    )
}

fn opacity(s: &FrameSnapshot, name: &str) -> f64 {
    s.element(name).and_then(|e| e.number("opacity")).unwrap()
}

#[test]
fn opacity_follows_frame_over_fps() {
    let mut inst = Instance::new(&fade_comp()).unwrap();
    for (frame, want) in [(0, 0.0), (15, 0.5), (30, 1.0), (60, 1.0)] {
        let s = inst.render_frame(FrameIndex(frame)).unwrap();
        assert_eq!(opacity(&s, "title"), want, "frame {frame}");
    }
    assert_eq!(inst.build_count(), 1);
}

#[test]
fn frames_outside_duration_are_rejected() {
    let mut inst = Instance::new(&fade_comp()).unwrap();
    assert!(matches!(
        inst.render_frame(FrameIndex(61)),
        Err(TweenreelError::Validation(_))
    ));
}

#[test]
fn sequence_mounts_and_unmounts_its_subtree() {
    let mut inst = Instance::new(&sequenced_comp()).unwrap();

    let s = inst.render_frame(FrameIndex(5)).unwrap();
    assert!(s.element("caption").is_none());
    assert!(s.element("dot1").is_none());
    assert_eq!(inst.mounted_bridges(), 1);

    let s = inst.render_frame(FrameIndex(36)).unwrap();
    assert!((opacity(&s, "caption") - 0.4).abs() < 1e-9);
    assert_eq!(inst.mounted_bridges(), 2);

    let s = inst.render_frame(FrameIndex(50)).unwrap();
    assert!(s.element("caption").is_none());
    assert_eq!(inst.mounted_bridges(), 1);

    let builds = inst.build_count();
    let s = inst.render_frame(FrameIndex(45)).unwrap();
    assert_eq!(opacity(&s, "caption"), 1.0);
    // The group's own timeline plus the root's, rebound for the new subtree.
    assert_eq!(inst.build_count(), builds + 2);
}

#[test]
fn remounted_subtree_keeps_document_order() {
    let mut inst = Instance::new(&sequenced_comp()).unwrap();
    inst.render_frame(FrameIndex(0)).unwrap();
    let s = inst.render_frame(FrameIndex(35)).unwrap();
    let paths: Vec<&str> = s.elements.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["", "0", "2", "2.0"]);

    let s = inst.render_frame(FrameIndex(12)).unwrap();
    let paths: Vec<&str> = s.elements.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["", "0", "1"]);
}

#[test]
fn ancestor_timeline_rebinds_when_descendants_change() {
    let mut inst = Instance::new(&sequenced_comp()).unwrap();
    let before = inst.render_frame(FrameIndex(0)).unwrap();
    assert_eq!(before.element("dot0").and_then(|e| e.number("x")), Some(0.0));

    // dot1 joins the stagger as the second target: starts at 0.25s.
    let s = inst.render_frame(FrameIndex(15)).unwrap();
    assert_eq!(s.element("dot0").and_then(|e| e.number("x")), Some(50.0));
    assert_eq!(s.element("dot1").and_then(|e| e.number("x")), Some(25.0));
}

#[test]
fn snapshots_do_not_depend_on_render_history() {
    let def = sequenced_comp();
    let mut warm = Instance::new(&def).unwrap();
    for f in [0u64, 12, 25, 29, 30, 5, 40, 12, 59, 0, 31, 31, 9] {
        let got = warm.render_frame(FrameIndex(f)).unwrap();
        let fresh = Instance::new(&def)
            .unwrap()
            .render_frame(FrameIndex(f))
            .unwrap();
        assert_eq!(got, fresh, "frame {f}");
    }
}

#[test]
fn unmatched_selector_fails_the_render() {
    let mut def = fade_comp();
    if let Some(tl) = &mut def.root.timeline
        && let crate::composition::model::StepDef::To { targets, .. } = &mut tl.steps[0]
    {
        *targets = "#nobody".into();
    }
    let mut inst = Instance::new(&def).unwrap();
    assert!(matches!(
        inst.render_frame(FrameIndex(0)),
        Err(TweenreelError::Config(_))
    ));
}

#[test]
fn unmount_clears_scene_and_next_render_rebuilds() {
    let mut inst = Instance::new(&fade_comp()).unwrap();
    inst.render_frame(FrameIndex(10)).unwrap();
    inst.unmount();
    assert!(inst.scene().is_empty());
    assert_eq!(inst.mounted_bridges(), 0);

    let s = inst.render_frame(FrameIndex(15)).unwrap();
    assert_eq!(opacity(&s, "title"), 0.5);
    assert_eq!(inst.build_count(), 2);
}
