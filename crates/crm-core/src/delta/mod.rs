//! Partial-update container ("delta") and change classification
//!
//! A [`Delta`] represents the subset of fields a caller wants to change,
//! independent of the full record shape. It is typically built from an
//! untrusted JSON body, filtered of server-managed fields, classified
//! against the existing record, and finally applied.
//!
//! ## Field identity
//!
//! Fields are identified by a per-record enum implementing [`RecordField`].
//! Tracking a name that is not a field of the target type is therefore
//! unrepresentable; unknown names arriving in a JSON body are tolerated and
//! ignored. Name resolution is case-insensitive and underscore-insensitive,
//! so `addressType`, `address_type` and `ADDRESSTYPE` all resolve to the
//! same field.
//!
//! ## Raw vs. canonical values
//!
//! Tracked values are stored raw, exactly as supplied. Coercion to the
//! field's canonical form (enum names parsed case-insensitively, numeric
//! enum indexes resolved, null folded to the text default, null preserved
//! for optional enum fields) happens on apply and on classification, via
//! [`DeltaModel::coerce`].

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::ops::{BitOr, BitOrAssign};

use serde_json::Value;

use crate::error::{Error, Result};

/// Compile-time field descriptor for a record type
///
/// Implemented by a small enum per record (one variant per field). This is
/// the seam that replaces runtime reflection: field existence and spelling
/// are checked by the compiler.
pub trait RecordField: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// All fields of the record, in declaration order
    fn all() -> &'static [Self];

    /// Canonical snake_case name of the field
    fn name(self) -> &'static str;

    /// Alternate accepted names (e.g. the wire name of a renamed field)
    fn aliases(self) -> &'static [&'static str] {
        &[]
    }

    /// Resolve a client-supplied name to a field
    ///
    /// Matching ignores ASCII case and underscores. Returns `None` for
    /// names that are not fields of the record.
    fn resolve(name: &str) -> Option<Self> {
        let wanted = normalize(name);
        Self::all().iter().copied().find(|field| {
            normalize(field.name()) == wanted
                || field.aliases().iter().any(|alias| normalize(alias) == wanted)
        })
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// A record shape that deltas can be built for
///
/// The three operations together give [`Delta`] everything it needs: turn a
/// raw tracked value into canonical form, write a canonical value onto a
/// record, and read a record's current canonical value back for diffing.
pub trait DeltaModel: Default {
    /// Field descriptor enum for this record
    type Field: RecordField;

    /// Coerce a raw tracked value into canonical form for `field`
    ///
    /// Fails with [`Error::InvalidInput`] when the value cannot represent
    /// the field's type (e.g. a number supplied for a text field, or an
    /// unknown enum name).
    fn coerce(field: Self::Field, raw: &Value) -> Result<Value>;

    /// Assign a canonical value to `field` on this record
    fn assign(&mut self, field: Self::Field, value: Value) -> Result<()>;

    /// Read the current canonical value of `field`
    fn fetch(&self, field: Self::Field) -> Value;
}

/// Flag set describing the net effect of a delta on a record
///
/// Multiple fields contribute independently, so a single delta can carry
/// e.g. `ADDITION | UPDATE` at once. `Delta::change_state` returns `None`
/// instead of an empty set when no tracked field actually differs.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChangeState(u8);

impl ChangeState {
    /// A field went from its type default to a meaningful value
    pub const ADDITION: ChangeState = ChangeState(1 << 0);
    /// A field went from a meaningful value to its type default
    pub const DELETION: ChangeState = ChangeState(1 << 1);
    /// A field went from one meaningful value to another
    pub const UPDATE: ChangeState = ChangeState(1 << 2);

    /// Check whether all flags in `flags` are set
    pub fn contains(self, flags: ChangeState) -> bool {
        self.0 & flags.0 == flags.0
    }

    /// Whether the addition flag is set
    pub fn has_addition(self) -> bool {
        self.contains(Self::ADDITION)
    }

    /// Whether the deletion flag is set
    pub fn has_deletion(self) -> bool {
        self.contains(Self::DELETION)
    }

    /// Whether the update flag is set
    pub fn has_update(self) -> bool {
        self.contains(Self::UPDATE)
    }
}

impl BitOr for ChangeState {
    type Output = ChangeState;

    fn bitor(self, rhs: ChangeState) -> ChangeState {
        ChangeState(self.0 | rhs.0)
    }
}

impl BitOrAssign for ChangeState {
    fn bitor_assign(&mut self, rhs: ChangeState) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for ChangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.has_addition() {
            names.push("ADDITION");
        }
        if self.has_deletion() {
            names.push("DELETION");
        }
        if self.has_update() {
            names.push("UPDATE");
        }
        write!(f, "ChangeState({})", names.join(" | "))
    }
}

/// Emptiness test used by classification
///
/// A value counts as the type default when it is null, an empty string,
/// zero, or false. A deliberately empty string and a never-set string are
/// therefore indistinguishable here; see the classification contract
/// tests for the observable consequences.
pub fn value_is_default(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !*b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Sparse partial-update payload over a record of type `T`
///
/// A delta is created empty (or from a JSON object body), mutated only by
/// explicit field sets, and consumed by [`Delta::apply_to`] or
/// [`Delta::materialize`]. It holds no relationship to the record it was
/// applied to afterwards.
pub struct Delta<T: DeltaModel> {
    /// Raw tracked values, keyed by field; last write wins
    values: HashMap<T::Field, Value>,
    /// Fields removed from apply and classification
    excluded: HashSet<T::Field>,
}

impl<T: DeltaModel> Delta<T> {
    /// Create an empty delta
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            excluded: HashSet::new(),
        }
    }

    /// Build a delta from a JSON object body
    ///
    /// Keys that do not resolve to a field of `T` are ignored. Values are
    /// kept raw; coercion errors surface on apply or classification.
    pub fn from_json(body: &Value) -> Result<Self> {
        let object = body
            .as_object()
            .ok_or_else(|| Error::invalid_input("delta body must be a JSON object"))?;

        let mut delta = Self::new();
        for (key, value) in object {
            if let Some(field) = T::Field::resolve(key) {
                delta.values.insert(field, value.clone());
            }
        }
        Ok(delta)
    }

    /// Track `field` with the given raw value, overwriting any prior value
    pub fn set_value(&mut self, field: T::Field, value: impl Into<Value>) {
        self.values.insert(field, value.into());
    }

    /// The raw tracked value of `field`, distinguishing "never set" from
    /// "explicitly set to null"
    ///
    /// Exclusion does not affect this accessor: an excluded field's value
    /// stays readable, it just no longer participates in apply or
    /// classification.
    pub fn try_get_value(&self, field: T::Field) -> Option<&Value> {
        self.values.get(&field)
    }

    /// The canonical value of `field`, or `Value::Null` when untracked
    pub fn get_value(&self, field: T::Field) -> Result<Value> {
        match self.values.get(&field) {
            Some(raw) => T::coerce(field, raw),
            None => Ok(Value::Null),
        }
    }

    /// Remove fields from apply and classification entirely
    ///
    /// Used to protect server-managed fields (identifiers, relationship
    /// back-references) from client-supplied overwrite. Order relative to
    /// `set_value` does not matter; exclusion always wins.
    pub fn exclude(&mut self, fields: &[T::Field]) {
        for field in fields {
            self.excluded.insert(*field);
        }
    }

    /// Whether `field` is tracked and not excluded
    pub fn is_tracked(&self, field: T::Field) -> bool {
        self.values.contains_key(&field) && !self.excluded.contains(&field)
    }

    /// Number of tracked fields (excluded ones included)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no fields are tracked
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build a fresh `T` with defaults and apply all tracked fields onto it
    pub fn materialize(&self) -> Result<T> {
        let mut record = T::default();
        self.apply_to(&mut record)?;
        Ok(record)
    }

    /// Coerce and assign every tracked, non-excluded field onto `target`
    pub fn apply_to(&self, target: &mut T) -> Result<()> {
        for (&field, raw) in &self.values {
            if self.excluded.contains(&field) {
                continue;
            }
            let value = T::coerce(field, raw)?;
            target.assign(field, value)?;
        }
        Ok(())
    }

    /// Classify the net effect of this delta against an existing record
    ///
    /// Per tracked, non-excluded field: coerce the new value, compare to the
    /// record's current value, and discard fields that would not change.
    /// Each remaining field contributes `DELETION` when its new value is the
    /// type default, `ADDITION` when the original was the default, and
    /// `UPDATE` otherwise. Returns `None` when no field contributes — the
    /// caller's signal to skip the write entirely.
    pub fn change_state(&self, original: &T) -> Result<Option<ChangeState>> {
        let mut state: Option<ChangeState> = None;

        for (&field, raw) in &self.values {
            if self.excluded.contains(&field) {
                continue;
            }
            let new_value = T::coerce(field, raw)?;
            let old_value = original.fetch(field);
            if new_value == old_value {
                continue;
            }

            let contribution = if value_is_default(&new_value) {
                ChangeState::DELETION
            } else if value_is_default(&old_value) {
                ChangeState::ADDITION
            } else {
                ChangeState::UPDATE
            };

            state = Some(match state {
                Some(existing) => existing | contribution,
                None => contribution,
            });
        }

        Ok(state)
    }
}

impl<T: DeltaModel> Default for Delta<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeltaModel> Clone for Delta<T> {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
            excluded: self.excluded.clone(),
        }
    }
}

impl<T: DeltaModel> fmt::Debug for Delta<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delta")
            .field("values", &self.values)
            .field("excluded", &self.excluded)
            .finish()
    }
}

/// Coerce a raw value for a plain text field
///
/// Accepts strings and explicit null; anything else is a type mismatch.
/// Null folds to the empty string, the field's canonical default, so
/// classification compares like with like: null written over an
/// already-empty field is no change, not a deletion.
pub(crate) fn coerce_text(field_name: &str, raw: &Value) -> Result<Value> {
    match raw {
        Value::Null => Ok(Value::String(String::new())),
        Value::String(_) => Ok(raw.clone()),
        other => Err(Error::invalid_input(format!(
            "{field_name} expects a string, got {other}"
        ))),
    }
}

/// Extract a string from a canonical text value, mapping null to empty
pub(crate) fn text_or_empty(value: Value) -> String {
    match value {
        Value::String(s) => s,
        _ => String::new(),
    }
}
