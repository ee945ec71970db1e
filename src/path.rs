//! Slash-delimited access into nested objects.
//!
//! A path such as `/server/tls/port` names one object key per segment. There
//! is no escaping: every character between two slashes is part of the key, so
//! `/a//b` walks through the empty key. The empty path names the root value.
//! Array elements are not addressable here; use [`Value::get_index`].

use crate::error::AccessError;
use crate::value::Value;
use log::debug;

/// A parsed path, borrowing its segments from the original string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path<'p> {
    raw: &'p str,
    segments: Vec<&'p str>,
}

impl<'p> Path<'p> {
    /// # Errors
    /// `InvalidPath` for a non-empty path that does not start with `/`.
    pub fn parse(raw: &'p str) -> Result<Self, AccessError> {
        let segments = match raw.strip_prefix('/') {
            Some(rest) => rest.split('/').collect(),
            None if raw.is_empty() => Vec::new(),
            None => {
                return Err(AccessError::InvalidPath {
                    path: raw.to_string(),
                })
            }
        };
        Ok(Self { raw, segments })
    }

    #[must_use]
    pub fn segments(&self) -> &[&'p str] {
        &self.segments
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The failure for a walk that could not get past segment `depth`.
    fn not_found(&self, depth: usize) -> AccessError {
        let at: String = self.segments[..=depth]
            .iter()
            .flat_map(|segment| ["/", *segment])
            .collect();
        AccessError::PathNotFound {
            path: self.raw.to_string(),
            at,
        }
    }
}

/// Follows `path` from `root` through nested objects.
///
/// # Errors
/// `PathNotFound` as soon as a key is missing or the value reached is not an
/// object; `InvalidPath` if `path` is malformed.
pub fn get_path<'v>(root: &'v Value, path: &str) -> Result<&'v Value, AccessError> {
    let path = Path::parse(path)?;
    let mut current = root;
    for (depth, key) in path.segments().iter().enumerate() {
        current = match current {
            Value::Object(map) => map.get(*key),
            _ => None,
        }
        .ok_or_else(|| path.not_found(depth))?;
    }
    Ok(current)
}

/// Mutable version of [`get_path`].
///
/// # Errors
/// Same as [`get_path`].
pub fn get_path_mut<'v>(root: &'v mut Value, path: &str) -> Result<&'v mut Value, AccessError> {
    let path = Path::parse(path)?;
    let mut current = root;
    for (depth, key) in path.segments().iter().enumerate() {
        current = match current {
            Value::Object(map) => map.get_mut(*key),
            _ => None,
        }
        .ok_or_else(|| path.not_found(depth))?;
    }
    Ok(current)
}

/// Stores `value` at `path`, overwriting whatever is there.
///
/// With `create_intermediate`, every missing segment before the last becomes
/// an empty object. Existing values that are not objects are never replaced.
/// Setting the empty path replaces the root.
///
/// # Errors
/// `PathNotFound` if an intermediate segment is missing (and may not be
/// created) or is not an object; `InvalidPath` if `path` is malformed.
pub fn set_path(
    root: &mut Value,
    path: &str,
    value: Value,
    create_intermediate: bool,
) -> Result<(), AccessError> {
    let path = Path::parse(path)?;
    let Some((last, parents)) = path.segments().split_last() else {
        *root = value;
        return Ok(());
    };

    let mut current = root;
    for (depth, key) in parents.iter().enumerate() {
        let Value::Object(map) = current else {
            return Err(path.not_found(depth));
        };
        current = if create_intermediate {
            map.entry((*key).to_string()).or_insert_with(|| {
                debug!("creating missing object at segment `{key}` of `{}`", path.raw);
                Value::object()
            })
        } else {
            map.get_mut(*key).ok_or_else(|| path.not_found(depth))?
        };
    }

    let Value::Object(map) = current else {
        return Err(path.not_found(parents.len()));
    };
    map.insert((*last).to_string(), value);
    Ok(())
}

/// Removes and returns the value at `path`. Removing the empty path takes the
/// root and leaves `null` behind.
///
/// # Errors
/// `PathNotFound` if nothing is stored there; `InvalidPath` if `path` is malformed.
pub fn remove_path(root: &mut Value, path: &str) -> Result<Value, AccessError> {
    let path = Path::parse(path)?;
    let Some((last, parents)) = path.segments().split_last() else {
        return Ok(std::mem::take(root));
    };

    let mut current = root;
    for (depth, key) in parents.iter().enumerate() {
        current = match current {
            Value::Object(map) => map.get_mut(*key),
            _ => None,
        }
        .ok_or_else(|| path.not_found(depth))?;
    }

    match current {
        Value::Object(map) => map.remove(*last),
        _ => None,
    }
    .ok_or_else(|| path.not_found(parents.len()))
}
