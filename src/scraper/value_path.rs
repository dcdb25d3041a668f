//! Safe navigation over loosely-shaped JSON.
//!
//! Every step returns an `Option`, so a missing key or a value of the wrong
//! kind anywhere along the path collapses to `None` instead of panicking the
//! way `value["a"]["b"]` indexing plus `unwrap()` would.

use serde_json::Value;

/// Walk `path` down through nested objects.
pub fn lookup<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(root, |node, key| node.as_object()?.get(*key))
}

pub fn lookup_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    lookup(root, path)?.as_str()
}

/// Integers only; floats with a fractional part are rejected.
pub fn lookup_i64(root: &Value, path: &[&str]) -> Option<i64> {
    let v = lookup(root, path)?;
    v.as_i64().or_else(|| {
        v.as_f64()
            .filter(|f| f.fract() == 0.0 && f.is_finite())
            .map(|f| f as i64)
    })
}

pub fn lookup_f64(root: &Value, path: &[&str]) -> Option<f64> {
    lookup(root, path)?.as_f64()
}
