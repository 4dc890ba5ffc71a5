use super::*;
use crate::scene::element::{ElementDesc, Scene};

fn el(desc: ElementDesc) -> Element {
    let mut scene = Scene::new();
    let id = scene.insert(None, desc).unwrap();
    scene.get(id).unwrap().clone()
}

#[test]
fn compound_parts_must_all_match() {
    let card = el(ElementDesc::new("rect").named("hero").class("card").class("big"));
    assert!("rect".parse::<Selector>().unwrap().matches(&card));
    assert!("#hero".parse::<Selector>().unwrap().matches(&card));
    assert!(".card.big".parse::<Selector>().unwrap().matches(&card));
    assert!("rect.card#hero".parse::<Selector>().unwrap().matches(&card));
    assert!("*".parse::<Selector>().unwrap().matches(&card));
    assert!(!"text.card".parse::<Selector>().unwrap().matches(&card));
    assert!(!".card.small".parse::<Selector>().unwrap().matches(&card));
}

#[test]
fn comma_lists_match_any_alternative() {
    let dot = el(ElementDesc::new("circle").class("dot"));
    let sel: Selector = "#title, .dot".parse().unwrap();
    assert!(sel.matches(&dot));
    assert_eq!(sel.as_str(), "#title, .dot");
}

#[test]
fn malformed_selectors_are_config_errors() {
    for bad in ["", ".", "#a#b", "div .x", ".a,", "a[b]"] {
        let err = bad.parse::<Selector>().unwrap_err();
        assert!(
            matches!(err, TweenreelError::Config(_)),
            "{bad:?} gave {err}"
        );
    }
}
