use engine::api::{simulate_many, simulate_round, RoundConfig};
use jni::objects::{JClass, JString};
use jni::sys::jstring;
use jni::JNIEnv;
use serde_json::json;

const DEFAULT_SAMPLES: u32 = 100;

fn ok_payload(value: serde_json::Value) -> String {
    json!({ "ok": true, "result": value }).to_string()
}

fn err_payload(e: impl std::fmt::Display) -> String {
    json!({ "ok": false, "error": e.to_string() }).to_string()
}

fn to_jstring(env: &JNIEnv, payload: String) -> jstring {
    match env.new_string(payload) {
        Ok(s) => s.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

fn read_input(env: &mut JNIEnv, json: &JString) -> Result<String, String> {
    env.get_string(json)
        .map(Into::into)
        .map_err(|e| e.to_string())
}

#[no_mangle]
pub extern "system" fn Java_com_quickdraw_Ffi_version<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
) -> jstring {
    to_jstring(&env, "quickdraw-ffi 0.1.0".to_string())
}

#[no_mangle]
pub extern "system" fn Java_com_quickdraw_Ffi_simulateRoundJson(
    mut env: JNIEnv,
    _class: JClass,
    json: JString,
) -> jstring {
    let payload = match read_input(&mut env, &json) {
        Ok(input) => simulate_round_json(&input),
        Err(e) => err_payload(e),
    };
    to_jstring(&env, payload)
}

#[no_mangle]
pub extern "system" fn Java_com_quickdraw_Ffi_simulateManyJson(
    mut env: JNIEnv,
    _class: JClass,
    json: JString,
) -> jstring {
    let payload = match read_input(&mut env, &json) {
        Ok(input) => simulate_many_json(&input),
        Err(e) => err_payload(e),
    };
    to_jstring(&env, payload)
}

// Internal functions for testing without JNI overhead
pub fn simulate_round_json(input: &str) -> String {
    let cfg: RoundConfig = match serde_json::from_str(input) {
        Ok(c) => c,
        Err(e) => return err_payload(format!("invalid_config: {}", e)),
    };
    match simulate_round(cfg).and_then(|r| Ok(serde_json::to_value(r)?)) {
        Ok(value) => ok_payload(value),
        Err(e) => err_payload(e),
    }
}

/// Same as [`simulate_round_json`] plus an optional top-level `samples`.
pub fn simulate_many_json(input: &str) -> String {
    let mut root: serde_json::Value = match serde_json::from_str(input) {
        Ok(v) => v,
        Err(e) => return err_payload(format!("invalid_config: {}", e)),
    };
    let samples = root
        .get("samples")
        .and_then(|v| v.as_u64())
        .map(|n| n.min(u32::MAX as u64) as u32)
        .unwrap_or(DEFAULT_SAMPLES);
    if let Some(obj) = root.as_object_mut() {
        obj.remove("samples");
    }
    let cfg: RoundConfig = match serde_json::from_value(root) {
        Ok(c) => c,
        Err(e) => return err_payload(format!("invalid_config: {}", e)),
    };
    match simulate_many(cfg, samples).and_then(|s| Ok(serde_json::to_value(s)?)) {
        Ok(value) => ok_payload(value),
        Err(e) => err_payload(e),
    }
}
