use super::*;

fn p(s: &str) -> Position {
    s.parse().unwrap()
}

#[test]
fn parses_relative_forms() {
    assert_eq!(p(""), Position::End(0.0));
    assert_eq!(p("+=1"), Position::End(1.0));
    assert_eq!(p("-=0.25"), Position::End(-0.25));
    assert_eq!(p("<"), Position::PrevStart(0.0));
    assert_eq!(p("<0.2"), Position::PrevStart(0.2));
    assert_eq!(p("<+=0.2"), Position::PrevStart(0.2));
    assert_eq!(p(">-0.1"), Position::PrevEnd(-0.1));
    assert_eq!(p("2.5"), Position::At(2.5));
}

#[test]
fn parses_labels_with_offsets() {
    assert_eq!(
        p("intro"),
        Position::Label {
            name: "intro".to_string(),
            offset: 0.0
        }
    );
    assert_eq!(
        p("outro-=0.5"),
        Position::Label {
            name: "outro".to_string(),
            offset: -0.5
        }
    );
}

#[test]
fn rejects_garbage() {
    assert!("<abc".parse::<Position>().is_err());
    assert!("+=".parse::<Position>().is_err());
    assert!("two words".parse::<Position>().is_err());
}

#[test]
fn resolve_uses_cursor_and_clamps_negative() {
    let cursor = Cursor {
        end: 3.0,
        prev_start: 1.0,
        prev_end: 2.0,
    };
    let no_labels = |_: &str| None;
    assert_eq!(p("").resolve(cursor, no_labels).unwrap(), 3.0);
    assert_eq!(p("-=0.5").resolve(cursor, no_labels).unwrap(), 2.5);
    assert_eq!(p("<0.5").resolve(cursor, no_labels).unwrap(), 1.5);
    assert_eq!(p(">").resolve(cursor, no_labels).unwrap(), 2.0);
    assert_eq!(p("<-5").resolve(cursor, no_labels).unwrap(), 0.0);
}

#[test]
fn unknown_label_is_config_error() {
    let err = p("missing")
        .resolve(Cursor::default(), |_: &str| None)
        .unwrap_err();
    assert!(matches!(err, TweenreelError::Config(_)));

    let t = p("intro+=1")
        .resolve(Cursor::default(), |name: &str| (name == "intro").then_some(2.0))
        .unwrap();
    assert_eq!(t, 3.0);
}

#[test]
fn json_accepts_numbers_and_strings() {
    let ps: Vec<Position> = serde_json::from_str(r#"[1.5, "<0.1", "+=0"]"#).unwrap();
    assert_eq!(
        ps,
        vec![
            Position::At(1.5),
            Position::PrevStart(0.1),
            Position::End(0.0)
        ]
    );
    assert_eq!(serde_json::to_string(&ps[1]).unwrap(), "\"<+=0.1\"");
}
