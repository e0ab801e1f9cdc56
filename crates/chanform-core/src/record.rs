//! The `Editable` contract and baseline snapshots.

use std::fmt::Debug;

use crate::error::{Error, Result};
use crate::patch::Patch;
use crate::value::Value;

/// A record whose fields a settings form can edit.
///
/// Implementations list their fields once, in declaration order; that order is
/// the order of every diff and patch produced for the record.
///
/// # Example
///
/// ```ignore
/// impl Editable for ChannelFields {
///     fn fields() -> &'static [&'static str] {
///         &["name", "permissions"]
///     }
///     // get / set by field name ...
/// }
/// ```
pub trait Editable: Clone + Default + Debug {
    /// Field names in declaration order.
    fn fields() -> &'static [&'static str];

    /// Current value of `field`, or `None` for an unknown field.
    fn get(&self, field: &str) -> Option<Value>;

    /// Overwrite `field` with `value`.
    ///
    /// Fails with `Error::UnknownField` or `Error::TypeMismatch`.
    fn set(&mut self, field: &str, value: Value) -> Result<()>;

    /// Position of `field` in declaration order.
    fn field_index(field: &str) -> Option<usize> {
        Self::fields().iter().position(|f| *f == field)
    }

    /// Resolve a field name to its `'static` declaration.
    fn field_name(field: &str) -> Result<&'static str> {
        Self::fields()
            .iter()
            .copied()
            .find(|f| *f == field)
            .ok_or_else(|| Error::UnknownField(field.to_string()))
    }

    /// Fields of `self` that differ from `baseline`, with `self`'s values.
    fn diff_against(&self, baseline: &Self) -> Patch {
        let mut patch = Patch::new();
        for &field in Self::fields() {
            let current = self.get(field);
            if current != baseline.get(field) {
                if let Some(value) = current {
                    patch.push(field, value);
                }
            }
        }
        patch
    }
}

/// The last-known-committed fields of one entity, tagged with its identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Baseline<K, R> {
    /// Identity of the entity the fields were projected from.
    pub key: K,
    /// Projected field values.
    pub fields: R,
}

impl<K, R> Baseline<K, R> {
    /// Pair a key with its projected fields.
    pub fn new(key: K, fields: R) -> Self {
        Self { key, fields }
    }
}

/// Recomputes the current baseline for one entity on demand.
///
/// Implemented for plain closures and for store-backed projectors. Returning
/// `None` means the entity no longer exists.
pub trait Projector<K, R> {
    /// Project the current committed fields.
    fn project(&self) -> Option<Baseline<K, R>>;
}

impl<K, R, F> Projector<K, R> for F
where
    F: Fn() -> Option<Baseline<K, R>>,
{
    fn project(&self) -> Option<Baseline<K, R>> {
        self()
    }
}
