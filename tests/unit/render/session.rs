use super::*;
use crate::encode::sink::InMemorySink;

fn def() -> CompositionDef {
    serde_json::from_str(
        r#"{
  "id": "bars", "fps": 24, "width": 64, "height": 64, "duration_in_frames": 48,
  "root": {
    "tag": "div",
    "children": [
      { "tag": "rect", "classes": ["bar"], "props": { "y": 10 } },
      { "tag": "rect", "classes": ["bar"], "props": { "y": 10 } },
      { "tag": "rect", "classes": ["bar"], "props": { "y": 10 },
        "sequence": { "from": 12 } }
    ],
    "timeline": { "steps": [
      { "op": "from", "targets": ".bar", "vars": { "y": 60, "opacity": 0, "stagger": 0.1 } },
      { "op": "to", "targets": ".bar", "vars": { "rotation": 90, "ease": "back.out(2)" }, "position": ">" }
    ] }
  }
}"#,
    )
    .unwrap()
}

fn render_all(opts: RenderSessionOpts) -> (RenderStats, InMemorySink) {
    let mut sess = RenderSession::new(&def(), opts).unwrap();
    let mut sink = InMemorySink::new();
    let stats = sess.render_range(sess.full_range(), &mut sink).unwrap();
    (stats, sink)
}

#[test]
fn sequential_range_reaches_sink_in_order() {
    let (stats, sink) = render_all(RenderSessionOpts {
        chunk_size: 5,
        ..RenderSessionOpts::default()
    });
    assert_eq!(stats.frames_total, 48);
    assert!(sink.is_ended());
    let frames: Vec<u64> = sink.frames.iter().map(|s| s.frame.0).collect();
    assert_eq!(frames, (0..48).collect::<Vec<_>>());
}

#[test]
fn parallel_matches_sequential() {
    let (seq_stats, seq) = render_all(RenderSessionOpts::default());
    let (par_stats, par) = render_all(RenderSessionOpts {
        parallel: true,
        chunk_size: 7,
        threads: Some(3),
    });
    assert_eq!(seq_stats, par_stats);
    assert_eq!(seq.frames, par.frames);
}

#[test]
fn settled_frames_count_as_static() {
    let (stats, _) = render_all(RenderSessionOpts::default());
    // The last tween ends well before frame 47.
    assert!(stats.frames_static > 0);
    assert!(stats.frames_static < stats.frames_total);
}

#[test]
fn render_frame_matches_range_output() {
    let (_, sink) = render_all(RenderSessionOpts::default());
    let mut sess = RenderSession::new(&def(), RenderSessionOpts::default()).unwrap();
    for f in [40u64, 3, 17] {
        assert_eq!(sess.render_frame(FrameIndex(f)).unwrap(), sink.frames[f as usize]);
    }
}

#[test]
fn invalid_ranges_and_threads_are_rejected() {
    let mut sess = RenderSession::new(&def(), RenderSessionOpts::default()).unwrap();
    let mut sink = InMemorySink::new();
    let empty = FrameRange::new(FrameIndex(3), FrameIndex(3)).unwrap();
    assert!(sess.render_range(empty, &mut sink).is_err());
    let too_long = FrameRange::new(FrameIndex(0), FrameIndex(49)).unwrap();
    assert!(sess.render_range(too_long, &mut sink).is_err());

    let mut sess = RenderSession::new(
        &def(),
        RenderSessionOpts {
            parallel: true,
            threads: Some(0),
            ..RenderSessionOpts::default()
        },
    )
    .unwrap();
    assert!(sess.render_range(sess.full_range(), &mut sink).is_err());
}
