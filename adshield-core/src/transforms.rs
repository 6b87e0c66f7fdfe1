//! Sanitizing transformations for individual gateway endpoints
//!
//! Every transform only clears, nulls or filters what is already there.
//! A container that is missing (or falsy, in the gateway's loose sense) is
//! left alone, so a body without ad fields passes through unchanged.

use serde_json::{json, Map, Value};

/// `ret[0]` value the mtop gateway uses for a successful call
pub const SUCCESS_MARKER: &str = "SUCCESS::调用成功";

/// Whether a field counts as present: not null, `false`, `0` or `""`.
///
/// Empty arrays and empty objects are present.
pub fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Mutable access to `value[key]` when it is set
pub fn field_mut<'a>(value: &'a mut Value, key: &str) -> Option<&'a mut Value> {
    value
        .as_object_mut()
        .and_then(|map| map.get_mut(key))
        .filter(|child| is_set(child))
}

/// The `data` envelope of a gateway response, when set
fn data_mut(body: &mut Value) -> Option<&mut Value> {
    field_mut(body, "data")
}

/// Replace each of `keys` under `container` with a fresh `replacement`, where set.
fn replace_fields(container: &mut Value, keys: &[&str], replacement: fn() -> Value) {
    for key in keys {
        if let Some(slot) = field_mut(container, key) {
            *slot = replacement();
        }
    }
}

fn empty_array() -> Value {
    Value::Array(Vec::new())
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

fn null() -> Value {
    Value::Null
}

/// Lower-cased string tag of a list item; absent or non-string tags read as "".
fn tag(item: &Value, field: &str) -> String {
    item.get(field)
        .and_then(Value::as_str)
        .map(str::to_lowercase)
        .unwrap_or_default()
}

/// Keep only the items of `container[key]` that satisfy `keep`, when it is an array.
fn retain_items(container: &mut Value, key: &str, keep: impl Fn(&Value) -> bool) {
    if let Some(Value::Array(items)) = field_mut(container, key) {
        items.retain(|item| keep(item));
    }
}

fn is_success(body: &Value) -> bool {
    body.get("ret")
        .and_then(Value::as_array)
        .and_then(|ret| ret.first())
        .and_then(Value::as_str)
        == Some(SUCCESS_MARKER)
}

/// Canonical empty success envelope
pub fn success_envelope() -> Value {
    json!({ "ret": [SUCCESS_MARKER], "data": {} })
}

/// Splash screen: clear ad containers, and drop `data` entirely on a successful call.
pub fn clear_splash(body: &mut Value) {
    if let Some(data) = data_mut(body) {
        replace_fields(data, &["ads", "adList", "splashAds"], empty_array);
        replace_fields(data, &["splash"], null);
        if let Some(result) = field_mut(data, "result") {
            replace_fields(result, &["ads", "adList"], empty_array);
        }
    }

    if is_success(body) {
        if let Some(data) = data_mut(body) {
            *data = empty_object();
        }
    }
}

/// Launch report: answer with an empty success regardless of what the server sent.
pub fn acknowledge_launch_report(body: &mut Value) {
    *body = success_envelope();
}

/// Ad scene restore: empty `data`.
pub fn clear_scene_restore(body: &mut Value) {
    if let Some(data) = data_mut(body) {
        *data = empty_object();
    }
}

/// User strategy: remove float balls, popups and bubbles.
pub fn clear_user_strategy(body: &mut Value) {
    if let Some(data) = data_mut(body) {
        replace_fields(data, &["strategyList", "list"], empty_array);
        replace_fields(data, &["floatBall", "popup", "bubble"], null);
    }
}

/// Home circles: drop circles tagged as ads or promotions.
pub fn filter_circle_list(body: &mut Value) {
    if let Some(data) = data_mut(body) {
        retain_items(data, "list", |item| {
            let kind = tag(item, "type");
            let biz = tag(item, "bizType");
            !kind.contains("ad")
                && !biz.contains("ad")
                && !kind.contains("promotion")
                && !biz.contains("promotion")
        });
    }
}

/// Home feed refresh: clear feed ad slots and drop ad items from the feed.
pub fn clean_feed(body: &mut Value) {
    if let Some(data) = data_mut(body) {
        replace_fields(data, &["ads", "adList"], empty_array);
        replace_fields(data, &["bannerAd", "insertAd"], null);
        retain_items(data, "list", |item| {
            let kind = tag(item, "type");
            !kind.contains("ad")
                && !tag(item, "bizType").contains("ad")
                && !tag(item, "itemType").contains("ad")
                && !kind.contains("promotion")
        });
    }
}

/// Activity query: drop ad and promotion activities.
pub fn filter_activities(body: &mut Value) {
    fn keep(item: &Value) -> bool {
        let kind = tag(item, "type");
        !kind.contains("ad") && !kind.contains("promotion")
    }

    if let Some(data) = data_mut(body) {
        retain_items(data, "activityList", keep);
        retain_items(data, "list", keep);
    }
}

/// Home config: blank out ad, splash, float and popup configuration.
pub fn clear_home_config(body: &mut Value) {
    if let Some(data) = data_mut(body) {
        replace_fields(
            data,
            &["adConfig", "splashConfig", "floatConfig", "popupConfig"],
            empty_object,
        );
    }
}
