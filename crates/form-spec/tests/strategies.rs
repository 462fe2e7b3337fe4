#![allow(dead_code)]

use form_spec::{Expr, Field, Form, FormChild, MultiField, Screen, Section, SectionChild, SubSection};
use proptest::prelude::*;
use serde_json::{Map, Value, json};

// Answer keys are drawn from a fixed pool so generated conditions and
// answer maps overlap.
pub const KEYS: &[&str] = &["k0", "k1", "k2", "k3", "k4", "k5", "k6", "k7"];

fn arb_condition() -> impl Strategy<Value = Option<Expr>> {
    prop_oneof![
        3 => Just(None),
        1 => any::<bool>().prop_map(|value| Some(Expr::literal(value))),
        1 => prop::sample::select(KEYS).prop_map(|key| Some(Expr::answered(key))),
    ]
}

/// Screens with ids unique within the generated form.
fn arb_screen(prefix: String) -> impl Strategy<Value = Screen> {
    (0u8..3, arb_condition(), 1usize..4).prop_map(move |(kind, condition, width)| match kind {
        0 => {
            let mut multi = MultiField::new(
                prefix.clone(),
                prefix.clone(),
                (0..width)
                    .map(|n| Field::text(format!("{}.f{}", prefix, n)))
                    .collect(),
            );
            multi.condition = condition;
            Screen::MultiField(multi)
        }
        _ => {
            let mut field = Field::text(prefix.clone());
            field.condition = condition;
            Screen::Field(field)
        }
    })
}

fn into_section_child(screen: Screen) -> SectionChild {
    match screen {
        Screen::MultiField(multi) => SectionChild::MultiField(multi),
        Screen::Repeater(repeater) => SectionChild::Repeater(repeater),
        Screen::Field(field) => SectionChild::Field(field),
    }
}

fn into_form_child(screen: Screen) -> FormChild {
    match screen {
        Screen::MultiField(multi) => FormChild::MultiField(multi),
        Screen::Repeater(repeater) => FormChild::Repeater(repeater),
        Screen::Field(field) => FormChild::Field(field),
    }
}

fn arb_sub_section(prefix: String) -> impl Strategy<Value = SubSection> {
    (arb_condition(), 0usize..3).prop_flat_map(move |(condition, count)| {
        let prefix = prefix.clone();
        let screens: Vec<_> = (0..count)
            .map(|n| arb_screen(format!("{}s{}", prefix, n)))
            .collect();
        screens.prop_map(move |children| SubSection {
            id: prefix.clone(),
            title: prefix.clone(),
            condition: condition.clone(),
            children,
        })
    })
}

fn arb_section(prefix: String) -> impl Strategy<Value = Section> {
    (arb_condition(), 0usize..3, 0usize..3).prop_flat_map(move |(condition, direct, subs)| {
        let prefix = prefix.clone();
        let screens: Vec<_> = (0..direct)
            .map(|n| arb_screen(format!("{}d{}", prefix, n)))
            .collect();
        let sub_sections: Vec<_> = (0..subs)
            .map(|n| arb_sub_section(format!("{}u{}", prefix, n)))
            .collect();
        (screens, sub_sections).prop_map(move |(screens, sub_sections)| Section {
            id: prefix.clone(),
            title: prefix.clone(),
            condition: condition.clone(),
            children: screens
                .into_iter()
                .map(into_section_child)
                .chain(sub_sections.into_iter().map(SectionChild::SubSection))
                .collect(),
        })
    })
}

/// A form mixing orphan screens and sections.
pub fn arb_form() -> impl Strategy<Value = Form> {
    prop::collection::vec(any::<bool>(), 0..6).prop_flat_map(|layout| {
        let children: Vec<BoxedStrategy<FormChild>> = layout
            .iter()
            .enumerate()
            .map(|(n, is_section)| {
                if *is_section {
                    arb_section(format!("S{}", n))
                        .prop_map(FormChild::Section)
                        .boxed()
                } else {
                    arb_screen(format!("o{}", n))
                        .prop_map(into_form_child)
                        .boxed()
                }
            })
            .collect();
        children.prop_map(|children| Form {
            children,
            ..Form::new("generated", "Generated")
        })
    })
}

/// Answers over the key pool; every generated field id may also be answered.
pub fn arb_answers(ids: Vec<String>) -> impl Strategy<Value = Value> {
    let pool: Vec<String> = KEYS.iter().map(|key| key.to_string()).chain(ids).collect();
    prop::collection::vec(any::<bool>(), pool.len()).prop_map(move |mask| {
        let mut map = Map::new();
        for (key, answered) in pool.iter().zip(mask) {
            if answered {
                map.insert(key.clone(), json!("x"));
            }
        }
        Value::Object(map)
    })
}
