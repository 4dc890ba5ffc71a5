use super::*;

#[test]
fn numbers_are_exact_at_endpoints() {
    let a = PropValue::Number(0.1);
    let b = PropValue::Number(0.7);
    assert_eq!(PropValue::lerp(&a, &b, 0.0), a);
    assert_eq!(PropValue::lerp(&a, &b, 1.0), b);
}

#[test]
fn numbers_and_colors_extrapolate_past_the_endpoints() {
    let a = PropValue::Number(0.0);
    let b = PropValue::Number(100.0);
    assert_eq!(PropValue::lerp(&a, &b, 1.25), PropValue::Number(125.0));
    assert_eq!(PropValue::lerp(&a, &b, -0.5), PropValue::Number(-50.0));

    let dark = PropValue::Color(Rgba8::new(0, 0, 0, 255));
    let mid = PropValue::Color(Rgba8::new(100, 100, 100, 255));
    assert_eq!(
        PropValue::lerp(&dark, &mid, 3.0),
        PropValue::Color(Rgba8::new(255, 255, 255, 255))
    );

    let x = PropValue::Text("a".into());
    let y = PropValue::Text("b".into());
    assert_eq!(PropValue::lerp(&x, &y, 1.2), x);
}

#[test]
fn colors_lerp_per_channel() {
    let a = PropValue::Color(Rgba8::new(0, 0, 0, 255));
    let b = PropValue::Color(Rgba8::new(255, 100, 10, 255));
    assert_eq!(
        PropValue::lerp(&a, &b, 0.5),
        PropValue::Color(Rgba8::new(128, 50, 5, 255))
    );
}

#[test]
fn text_switches_only_at_completion() {
    let a = PropValue::Text("3".to_string());
    let b = PropValue::Text("10".to_string());
    assert_eq!(PropValue::lerp(&a, &b, 0.99), a);
    assert_eq!(PropValue::lerp(&a, &b, 1.0), b);
}

#[test]
fn hex_color_forms_parse() {
    assert_eq!("#fff".parse::<Rgba8>().unwrap(), Rgba8::new(255, 255, 255, 255));
    assert_eq!(
        "#ff336680".parse::<Rgba8>().unwrap(),
        Rgba8::new(255, 0x33, 0x66, 0x80)
    );
    assert!("ff3366".parse::<Rgba8>().is_err());
    assert!("#ff33".parse::<Rgba8>().is_err());
    assert!("#gg0000".parse::<Rgba8>().is_err());
}

#[test]
fn json_form_distinguishes_numbers_colors_and_text() {
    let vals: Vec<PropValue> = serde_json::from_str(r##"[0.5, "#00ff00", "#hashtag", "Hello"]"##).unwrap();
    assert_eq!(vals[0], PropValue::Number(0.5));
    assert_eq!(vals[1], PropValue::Color(Rgba8::new(0, 255, 0, 255)));
    assert_eq!(vals[2], PropValue::Text("#hashtag".to_string()));
    assert_eq!(vals[3], PropValue::Text("Hello".to_string()));

    let out = serde_json::to_string(&vals[1]).unwrap();
    assert_eq!(out, "\"#00ff00\"");
}

#[test]
fn mismatched_kinds_are_rejected() {
    let n = PropValue::Number(1.0);
    let c = PropValue::Color(Rgba8::transparent());
    assert!(n.check_compatible(&c, "fill").is_err());
    assert!(n.check_compatible(&PropValue::Number(2.0), "x").is_ok());
}
