use super::*;

fn all_eases() -> Vec<Ease> {
    let mut out = vec![Ease::Linear, Ease::Steps(4)];
    for dir in [EaseDir::In, EaseDir::Out, EaseDir::InOut] {
        for power in 1..=4 {
            out.push(Ease::Power { power, dir });
        }
        out.push(Ease::Sine(dir));
        out.push(Ease::Expo(dir));
        out.push(Ease::Circ(dir));
        out.push(Ease::Back {
            dir,
            overshoot: 1.70158,
        });
        out.push(Ease::Bounce(dir));
        out.push(Ease::Elastic(dir));
    }
    out
}

#[test]
fn endpoints_are_exact_for_every_curve() {
    for ease in all_eases() {
        assert_eq!(ease.apply(0.0), 0.0, "{ease}");
        assert_eq!(ease.apply(1.0), 1.0, "{ease}");
        assert_eq!(ease.apply(-3.0), 0.0, "{ease}");
        assert_eq!(ease.apply(7.0), 1.0, "{ease}");
    }
}

#[test]
fn linear_midpoint_is_half() {
    assert_eq!(Ease::Linear.apply(0.5), 0.5);
}

#[test]
fn power_curves_match_closed_forms() {
    let quad_in = Ease::Power {
        power: 1,
        dir: EaseDir::In,
    };
    assert_eq!(quad_in.apply(0.5), 0.25);

    let cubic_out = Ease::Power {
        power: 2,
        dir: EaseDir::Out,
    };
    assert!((cubic_out.apply(0.5) - 0.875).abs() < 1e-12);

    let quad_in_out = Ease::Power {
        power: 1,
        dir: EaseDir::InOut,
    };
    assert_eq!(quad_in_out.apply(0.5), 0.5);
    assert!((quad_in_out.apply(0.25) - 0.125).abs() < 1e-12);
}

#[test]
fn back_in_overshoots_below_zero() {
    let back = Ease::Back {
        dir: EaseDir::In,
        overshoot: 1.70158,
    };
    assert!(back.apply(0.2) < 0.0);
}

#[test]
fn steps_quantize_progress() {
    let steps = Ease::Steps(4);
    assert_eq!(steps.apply(0.2), 0.0);
    assert_eq!(steps.apply(0.3), 0.25);
    assert_eq!(steps.apply(0.99), 0.75);
}

#[test]
fn parses_dotted_names() {
    assert_eq!("none".parse::<Ease>().unwrap(), Ease::Linear);
    assert_eq!(
        "power2.inOut".parse::<Ease>().unwrap(),
        Ease::Power {
            power: 2,
            dir: EaseDir::InOut
        }
    );
    assert_eq!(
        "quad".parse::<Ease>().unwrap(),
        Ease::Power {
            power: 1,
            dir: EaseDir::Out
        }
    );
    assert_eq!(
        "back.out(2.5)".parse::<Ease>().unwrap(),
        Ease::Back {
            dir: EaseDir::Out,
            overshoot: 2.5
        }
    );
    assert_eq!("steps(5)".parse::<Ease>().unwrap(), Ease::Steps(5));
}

#[test]
fn rejects_unknown_names() {
    assert!("wobble".parse::<Ease>().is_err());
    assert!("sine.sideways".parse::<Ease>().is_err());
    assert!("steps(0)".parse::<Ease>().is_err());
    assert!("back.out(2".parse::<Ease>().is_err());
}

#[test]
fn serde_uses_string_names() {
    let e: Ease = serde_json::from_str("\"expo.in\"").unwrap();
    assert_eq!(e, Ease::Expo(EaseDir::In));
    assert_eq!(serde_json::to_string(&e).unwrap(), "\"expo.in\"");
}

#[test]
fn default_is_power1_out() {
    assert_eq!(Ease::default().to_string(), "power1.out");
}
