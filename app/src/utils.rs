use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// Set a property on a JS object, ignoring failures.
pub fn js_set(target: &JsValue, key: &str, value: &JsValue) {
    let _ = js_sys::Reflect::set(target, &JsValue::from_str(key), value);
}

/// Call `target[name](...args)` with `this` bound to `target`.
pub fn call_method(target: &JsValue, name: &str, args: &[&JsValue]) -> Result<JsValue, JsValue> {
    let func: js_sys::Function = js_sys::Reflect::get(target, &JsValue::from_str(name))?.dyn_into()?;
    let js_args = js_sys::Array::new();
    for arg in args {
        js_args.push(arg);
    }
    func.apply(target, &js_args)
}
