//! Browser-facing API tests. Run with `wasm-pack test --node`.

#![cfg(target_arch = "wasm32")]

use js_sys::{Array, Object, Reflect};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

use netcoord_wasm::{force_directed_layout, layout_positions, node_order, random_layout};

fn pair(source: &str, target: &str) -> JsValue {
    let edge = Array::new();
    edge.push(&JsValue::from_str(source));
    edge.push(&JsValue::from_str(target));
    edge.into()
}

fn edges(pairs: &[(&str, &str)]) -> JsValue {
    let list = Array::new();
    for (source, target) in pairs {
        list.push(&pair(source, target));
    }
    list.into()
}

fn location(result: &JsValue, id: &str) -> Vec<f64> {
    let node = Reflect::get(result, &JsValue::from_str(id)).unwrap();
    let location = Reflect::get(&node, &JsValue::from_str("location")).unwrap();
    Array::from(&location)
        .iter()
        .map(|value| value.as_f64().unwrap())
        .collect()
}

#[wasm_bindgen_test]
fn force_directed_returns_location_per_node() {
    let config = Object::new();
    Reflect::set(&config, &"iterations".into(), &JsValue::from_f64(0.0)).unwrap();

    let result = force_directed_layout(edges(&[("a", "b"), ("b", "c")]), config.into(), Some(1.0))
        .map_err(JsValue::from)
        .unwrap();

    for id in ["a", "b", "c"] {
        assert_eq!(location(&result, id), vec![0.0, 0.0, 0.0]);
    }
}

#[wasm_bindgen_test]
fn random_layout_places_root_at_origin() {
    let result = random_layout(edges(&[("A", "B")]), JsValue::UNDEFINED, Some(3.0))
        .map_err(JsValue::from)
        .unwrap();
    assert_eq!(location(&result, "B"), vec![0.0, 0.0, 0.0]);
    assert_eq!(location(&result, "A").len(), 3);
}

#[wasm_bindgen_test]
fn random_layout_throws_when_exhausted() {
    let config = Object::new();
    Reflect::set(&config, &"edgeLength".into(), &JsValue::from_f64(1.0)).unwrap();
    Reflect::set(&config, &"separation".into(), &JsValue::from_f64(5.0)).unwrap();

    assert!(random_layout(edges(&[("A", "B")]), config.into(), Some(0.0)).is_err());
}

#[wasm_bindgen_test]
fn flat_positions_follow_node_order() {
    let input = edges(&[("x", "y"), ("y", "z")]);
    let order = Array::from(&node_order(input.clone()).map_err(JsValue::from).unwrap());
    let flat = layout_positions(input, JsValue::NULL, Some(5.0))
        .map_err(JsValue::from)
        .unwrap();

    assert_eq!(order.length(), 3);
    assert_eq!(flat.length(), 9);
}
