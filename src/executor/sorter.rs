//! Ordering of loaded records
//!
//! Builds a total order from an `OrderSpec`: listed properties first, then
//! ascending key. Keys are unique within a collection, so no two records
//! ever compare equal.

use std::borrow::Cow;
use std::cmp::Ordering;

use serde_json::{Number, Value};

use super::result::LoadedRecord;
use crate::planner::{OrderSpec, SortDirection, KEY_PROPERTY};

/// Compares loaded records by an ordering, then by key
#[derive(Debug, Clone)]
pub struct RecordComparator {
    order: OrderSpec,
    id_property: &'static str,
}

impl RecordComparator {
    /// `id_property` and `KEY_PROPERTY` resolve to the record key when the
    /// record does not carry them as fields.
    pub fn new(order: OrderSpec, id_property: &'static str) -> Self {
        Self { order, id_property }
    }

    pub fn compare(&self, a: &LoadedRecord, b: &LoadedRecord) -> Ordering {
        for spec in self.order.iter() {
            let ordering = compare_values(
                self.property(a, &spec.property),
                self.property(b, &spec.property),
            );
            let ordering = match spec.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        a.key.cmp(&b.key)
    }

    fn property<'r>(&self, record: &'r LoadedRecord, name: &str) -> Option<Cow<'r, Value>> {
        match record.fields.get(name) {
            Some(value) => Some(Cow::Borrowed(value)),
            None if name == self.id_property || name == KEY_PROPERTY => {
                Some(Cow::Owned(Value::String(record.key.clone())))
            }
            None => None,
        }
    }
}

/// Sorts loaded records
pub struct ResultSorter;

impl ResultSorter {
    pub fn sort(records: &mut [LoadedRecord], comparator: &RecordComparator) {
        records.sort_by(|a, b| comparator.compare(a, b));
    }
}

/// Ordering rules:
/// - missing < null < bool < number < string < array < object
/// - booleans false < true, numbers by value, strings by codepoint
/// - arrays and objects of the same kind tie
fn compare_values(a: Option<Cow<'_, Value>>, b: Option<Cow<'_, Value>>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => {
            let rank = type_rank(&a).cmp(&type_rank(&b));
            if rank != Ordering::Equal {
                return rank;
            }
            match (a.as_ref(), b.as_ref()) {
                (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
                (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
                (Value::String(x), Value::String(y)) => x.cmp(y),
                _ => Ordering::Equal,
            }
        }
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Exact numeric value: integers widen to `i128`, so no `u64` or `i64`
/// value is ever rounded through `f64`
#[derive(Debug, Clone, Copy)]
enum Numeric {
    Int(i128),
    Float(f64),
}

impl Numeric {
    fn of(number: &Number) -> Self {
        if let Some(n) = number.as_i64() {
            Numeric::Int(i128::from(n))
        } else if let Some(n) = number.as_u64() {
            Numeric::Int(i128::from(n))
        } else {
            Numeric::Float(number.as_f64().unwrap_or(0.0))
        }
    }
}

fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    match (Numeric::of(a), Numeric::of(b)) {
        (Numeric::Int(x), Numeric::Int(y)) => x.cmp(&y),
        (Numeric::Int(x), Numeric::Float(y)) => compare_int_float(x, y),
        (Numeric::Float(x), Numeric::Int(y)) => compare_int_float(y, x).reverse(),
        // -0.0 and 0.0 are the same value
        (Numeric::Float(x), Numeric::Float(y)) => {
            x.partial_cmp(&y).unwrap_or_else(|| x.total_cmp(&y))
        }
    }
}

/// Compares an integer with a float by value, without rounding either
fn compare_int_float(int: i128, float: f64) -> Ordering {
    // 2^127: every i128 lies in [-2^127, 2^127)
    const BOUND: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

    if float.is_nan() {
        return Ordering::Less;
    }
    if float >= BOUND {
        return Ordering::Less;
    }
    if float < -BOUND {
        return Ordering::Greater;
    }

    // in range and integral, so the cast is exact
    let whole = float.trunc();
    match int.cmp(&(whole as i128)) {
        Ordering::Equal if float > whole => Ordering::Less,
        Ordering::Equal if float < whole => Ordering::Greater,
        other => other,
    }
}
