use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TweenreelError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        TweenreelError::config("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(
        TweenreelError::animation("x")
            .to_string()
            .contains("animation error:")
    );
    assert!(
        TweenreelError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        TweenreelError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TweenreelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn serde_json_errors_map_to_serde_variant() {
    let err: TweenreelError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, TweenreelError::Serde(_)));
}
