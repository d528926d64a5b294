//! The arbitrary algebra: generator + shrinker pairs.
//!
//! An `Arbitrary` is a cloneable description of a value space. It carries
//! everything needed both to generate a value from a sub-stream and to
//! re-shrink a previously generated value without consulting randomness
//! again, which is what makes shrink paths replayable.
//!
//! Shrink sequences are finite, never contain the input value, and are
//! ordered simplest-intent-first. Composite arbitraries emit "drop a
//! sub-part" candidates before "shrink a sub-part in place" candidates.
//! Contradictory bounds are rejected at construction time, never at
//! generation time.

use rand::rngs::StdRng;
use rand::Rng;

use crate::error::Error;
use crate::value::Value;

/// Printable ASCII range used by `char_any` and `string`.
const CHAR_LO: char = ' ';
const CHAR_HI: char = '~';
/// Canonical simplest character that char and string shrinking converge on.
const CHAR_TARGET: char = 'a';

/// A generator/shrinker pair over a value space.
#[derive(Debug, Clone, PartialEq)]
pub enum Arbitrary {
    Integer {
        min: i64,
        max: i64,
        target: i64,
    },
    Boolean,
    Constant(Value),
    Char,
    Symbol {
        min_len: usize,
        max_len: usize,
    },
    String {
        min_len: usize,
        max_len: Option<usize>,
    },
    Array {
        elem: Box<Arbitrary>,
        min_len: usize,
        max_len: Option<usize>,
    },
    Tuple(Vec<Arbitrary>),
    Record(Vec<(String, Arbitrary)>),
    Map {
        keys: Box<Arbitrary>,
        values: Box<Arbitrary>,
        min_pairs: usize,
        max_pairs: Option<usize>,
    },
    OneOf(Vec<Arbitrary>),
}

/// Integers over the full `i32` range, shrinking toward zero.
pub fn integer() -> Arbitrary {
    Arbitrary::Integer {
        min: i64::from(i32::MIN),
        max: i64::from(i32::MAX),
        target: 0,
    }
}

/// Integers in `[min, max]`, shrinking toward zero clamped into the range.
pub fn integer_in(min: i64, max: i64) -> Result<Arbitrary, Error> {
    if min > max {
        return Err(Error::Config(format!(
            "integer bounds are contradictory: min {min} > max {max}"
        )));
    }
    Ok(Arbitrary::Integer {
        min,
        max,
        target: 0.clamp(min, max),
    })
}

/// Integers in `[min, max]` shrinking toward an explicit target.
pub fn integer_toward(min: i64, max: i64, target: i64) -> Result<Arbitrary, Error> {
    if min > max {
        return Err(Error::Config(format!(
            "integer bounds are contradictory: min {min} > max {max}"
        )));
    }
    if target < min || target > max {
        return Err(Error::Config(format!(
            "shrink target {target} lies outside [{min}, {max}]"
        )));
    }
    Ok(Arbitrary::Integer { min, max, target })
}

pub fn boolean() -> Arbitrary {
    Arbitrary::Boolean
}

/// An arbitrary that always produces `value` and never shrinks.
pub fn constant(value: impl Into<Value>) -> Arbitrary {
    Arbitrary::Constant(value.into())
}

/// Printable ASCII characters, shrinking toward `'a'`.
pub fn char_any() -> Arbitrary {
    Arbitrary::Char
}

/// Short lowercase identifiers rendered as symbols.
pub fn symbol() -> Arbitrary {
    Arbitrary::Symbol {
        min_len: 1,
        max_len: 8,
    }
}

/// Printable ASCII strings with size-driven length.
pub fn string() -> Arbitrary {
    Arbitrary::String {
        min_len: 0,
        max_len: None,
    }
}

/// Printable ASCII strings with explicit length bounds.
pub fn string_with(min_len: usize, max_len: usize) -> Result<Arbitrary, Error> {
    check_len_bounds("string", min_len, max_len)?;
    Ok(Arbitrary::String {
        min_len,
        max_len: Some(max_len),
    })
}

/// Arrays of `elem` with size-driven length, empty allowed.
pub fn array(elem: Arbitrary) -> Arbitrary {
    Arbitrary::Array {
        elem: Box::new(elem),
        min_len: 0,
        max_len: None,
    }
}

/// Arrays of `elem` with explicit length bounds.
pub fn array_with(elem: Arbitrary, min_len: usize, max_len: usize) -> Result<Arbitrary, Error> {
    check_len_bounds("array", min_len, max_len)?;
    Ok(Arbitrary::Array {
        elem: Box::new(elem),
        min_len,
        max_len: Some(max_len),
    })
}

/// A fixed-arity tuple of heterogeneous components.
pub fn tuple(components: Vec<Arbitrary>) -> Result<Arbitrary, Error> {
    if components.is_empty() {
        return Err(Error::Config("tuple needs at least one component".to_string()));
    }
    Ok(Arbitrary::Tuple(components))
}

/// A fixed-shape record: named fields, keys never removed by shrinking.
pub fn record(fields: Vec<(&str, Arbitrary)>) -> Result<Arbitrary, Error> {
    if fields.is_empty() {
        return Err(Error::Config("record needs at least one field".to_string()));
    }
    for (i, (name, _)) in fields.iter().enumerate() {
        if fields[..i].iter().any(|(seen, _)| seen == name) {
            return Err(Error::Config(format!("record field {name:?} declared twice")));
        }
    }
    Ok(Arbitrary::Record(
        fields
            .into_iter()
            .map(|(name, arb)| (name.to_string(), arb))
            .collect(),
    ))
}

/// A dynamic-keyed map with size-driven pair count.
pub fn map_of(keys: Arbitrary, values: Arbitrary) -> Result<Arbitrary, Error> {
    check_key_arbitrary(&keys)?;
    Ok(Arbitrary::Map {
        keys: Box::new(keys),
        values: Box::new(values),
        min_pairs: 0,
        max_pairs: None,
    })
}

/// A dynamic-keyed map with explicit pair-count bounds.
pub fn map_with(
    keys: Arbitrary,
    values: Arbitrary,
    min_pairs: usize,
    max_pairs: usize,
) -> Result<Arbitrary, Error> {
    check_len_bounds("map", min_pairs, max_pairs)?;
    check_key_arbitrary(&keys)?;
    Ok(Arbitrary::Map {
        keys: Box::new(keys),
        values: Box::new(values),
        min_pairs,
        max_pairs: Some(max_pairs),
    })
}

/// Choice between alternatives; shrinking falls back to earlier alternatives.
pub fn one_of(alternatives: Vec<Arbitrary>) -> Result<Arbitrary, Error> {
    if alternatives.is_empty() {
        return Err(Error::Config("one_of needs at least one alternative".to_string()));
    }
    Ok(Arbitrary::OneOf(alternatives))
}

/// Choice between constant values.
pub fn one_of_values(values: Vec<Value>) -> Result<Arbitrary, Error> {
    one_of(values.into_iter().map(Arbitrary::Constant).collect())
}

fn check_len_bounds(what: &str, min: usize, max: usize) -> Result<(), Error> {
    if min > max {
        return Err(Error::Config(format!(
            "{what} bounds are contradictory: min {min} > max {max}"
        )));
    }
    Ok(())
}

fn check_key_arbitrary(keys: &Arbitrary) -> Result<(), Error> {
    if keys.yields_keys() {
        Ok(())
    } else {
        Err(Error::Config(
            "map key arbitrary must produce strings or symbols".to_string(),
        ))
    }
}

/// Bisection toward `target`: each candidate halves the remaining distance,
/// starting at the target itself. Never yields `n`.
fn shrink_int(n: i64, target: i64) -> Vec<i64> {
    let mut out = Vec::new();
    let mut d = i128::from(n) - i128::from(target);
    while d != 0 {
        out.push((i128::from(n) - d) as i64);
        d /= 2;
    }
    out
}

fn shrink_char(c: char) -> Vec<char> {
    shrink_int(c as i64, CHAR_TARGET as i64)
        .into_iter()
        .filter_map(|code| char::from_u32(code as u32))
        .filter(|shrunk| (CHAR_LO..=CHAR_HI).contains(shrunk))
        .collect()
}

/// Shared element-sequence shrinker for arrays, strings, and symbols:
/// single removals front-to-back, adjacent-pair removals, then per-element
/// in-place shrinks.
fn shrink_elements<T: Clone>(
    items: &[T],
    min_len: usize,
    shrink_one: impl Fn(&T) -> Vec<T>,
) -> Vec<Vec<T>> {
    let mut out = Vec::new();
    if items.len() > min_len {
        for i in 0..items.len() {
            let mut candidate = items.to_vec();
            candidate.remove(i);
            out.push(candidate);
        }
    }
    if items.len() >= 2 && items.len() - 2 >= min_len {
        for i in 0..items.len() - 1 {
            let mut candidate = items.to_vec();
            candidate.drain(i..i + 2);
            out.push(candidate);
        }
    }
    for i in 0..items.len() {
        for shrunk in shrink_one(&items[i]) {
            let mut candidate = items.to_vec();
            candidate[i] = shrunk;
            out.push(candidate);
        }
    }
    out
}

fn shrink_text(s: &str, min_len: usize, charset_min: char) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    shrink_elements(&chars, min_len, |c| {
        shrink_char(*c)
            .into_iter()
            .filter(|shrunk| *shrunk >= charset_min)
            .collect()
    })
    .into_iter()
    .map(|candidate| candidate.into_iter().collect())
    .collect()
}

/// Deterministic distinct map keys for `simplest`: "a", "aa", "aaa", ...
fn synthetic_key(i: usize) -> String {
    "a".repeat(i + 1)
}

impl Arbitrary {
    /// Generate one value from the given sub-stream. Pure in the rng state
    /// and the size hint: replaying a seed reproduces identical values.
    pub fn generate(&self, rng: &mut StdRng, size: usize) -> Value {
        match self {
            Arbitrary::Integer { min, max, .. } => Value::Int(rng.gen_range(*min..=*max)),
            Arbitrary::Boolean => Value::Bool(rng.gen_bool(0.5)),
            Arbitrary::Constant(v) => v.clone(),
            Arbitrary::Char => Value::Char(rng.gen_range(CHAR_LO..=CHAR_HI)),
            Arbitrary::Symbol { min_len, max_len } => {
                let len = rng.gen_range(*min_len..=*max_len);
                Value::Sym((0..len).map(|_| rng.gen_range('a'..='z')).collect())
            }
            Arbitrary::String { min_len, max_len } => {
                let hi = max_len.unwrap_or(min_len + size);
                let len = rng.gen_range(*min_len..=hi);
                Value::Str((0..len).map(|_| rng.gen_range(CHAR_LO..=CHAR_HI)).collect())
            }
            Arbitrary::Array { elem, min_len, max_len } => {
                let hi = max_len.unwrap_or(min_len + size);
                let len = rng.gen_range(*min_len..=hi);
                Value::Array((0..len).map(|_| elem.generate(rng, size)).collect())
            }
            Arbitrary::Tuple(components) => {
                Value::Tuple(components.iter().map(|c| c.generate(rng, size)).collect())
            }
            Arbitrary::Record(fields) => Value::Map(
                fields
                    .iter()
                    .map(|(name, arb)| (name.clone(), arb.generate(rng, size)))
                    .collect(),
            ),
            Arbitrary::Map { keys, values, min_pairs, max_pairs } => {
                let hi = max_pairs.unwrap_or(min_pairs + size);
                let wanted = rng.gen_range(*min_pairs..=hi);
                let mut pairs: Vec<(String, Value)> = Vec::with_capacity(wanted);
                // Duplicate keys are redrawn a bounded number of times so a
                // narrow key space cannot loop forever.
                let mut attempts = 0;
                while pairs.len() < wanted && attempts < wanted + 10 {
                    attempts += 1;
                    let key = match keys.generate(rng, size).as_key() {
                        Some(k) => k.to_string(),
                        None => continue,
                    };
                    if pairs.iter().any(|(seen, _)| *seen == key) {
                        continue;
                    }
                    let value = values.generate(rng, size);
                    pairs.push((key, value));
                }
                // A key space narrower than min_pairs cannot satisfy the
                // lower bound by redrawing; top up with synthetic keys so the
                // map always honors its own bounds.
                let mut filler = 0;
                while pairs.len() < *min_pairs {
                    let key = synthetic_key(filler);
                    filler += 1;
                    if pairs.iter().any(|(seen, _)| *seen == key) {
                        continue;
                    }
                    pairs.push((key, values.generate(rng, size)));
                }
                Value::Map(pairs)
            }
            Arbitrary::OneOf(alternatives) => {
                let pick = rng.gen_range(0..alternatives.len());
                alternatives[pick].generate(rng, size)
            }
        }
    }

    /// Ordered shrink candidates for a value this arbitrary produced.
    ///
    /// Finite, simplest-first, never contains `value` itself, and every
    /// candidate satisfies the arbitrary's own bounds. A value whose shape
    /// does not match the arbitrary yields no candidates.
    pub fn shrink(&self, value: &Value) -> Vec<Value> {
        match (self, value) {
            (Arbitrary::Integer { target, .. }, Value::Int(n)) => {
                shrink_int(*n, *target).into_iter().map(Value::Int).collect()
            }
            (Arbitrary::Boolean, Value::Bool(true)) => vec![Value::Bool(false)],
            (Arbitrary::Char, Value::Char(c)) => {
                shrink_char(*c).into_iter().map(Value::Char).collect()
            }
            (Arbitrary::Symbol { min_len, .. }, Value::Sym(s)) => {
                shrink_text(s, *min_len, 'a').into_iter().map(Value::Sym).collect()
            }
            (Arbitrary::String { min_len, .. }, Value::Str(s)) => {
                shrink_text(s, *min_len, CHAR_LO).into_iter().map(Value::Str).collect()
            }
            (Arbitrary::Array { elem, min_len, .. }, Value::Array(items)) => {
                shrink_elements(items, *min_len, |item| elem.shrink(item))
                    .into_iter()
                    .map(Value::Array)
                    .collect()
            }
            (Arbitrary::Tuple(components), Value::Tuple(items))
                if components.len() == items.len() =>
            {
                // Exactly one component moves per candidate, in declared order.
                let mut out = Vec::new();
                for (i, component) in components.iter().enumerate() {
                    for shrunk in component.shrink(&items[i]) {
                        let mut candidate = items.clone();
                        candidate[i] = shrunk;
                        out.push(Value::Tuple(candidate));
                    }
                }
                out
            }
            (Arbitrary::Record(fields), Value::Map(pairs)) if fields.len() == pairs.len() => {
                let mut out = Vec::new();
                for (i, (_, arb)) in fields.iter().enumerate() {
                    for shrunk in arb.shrink(&pairs[i].1) {
                        let mut candidate = pairs.clone();
                        candidate[i].1 = shrunk;
                        out.push(Value::Map(candidate));
                    }
                }
                out
            }
            (Arbitrary::Map { values, min_pairs, .. }, Value::Map(pairs)) => {
                let mut out = Vec::new();
                if pairs.len() > *min_pairs {
                    for i in 0..pairs.len() {
                        let mut candidate = pairs.clone();
                        candidate.remove(i);
                        out.push(Value::Map(candidate));
                    }
                }
                for i in 0..pairs.len() {
                    for shrunk in values.shrink(&pairs[i].1) {
                        let mut candidate = pairs.clone();
                        candidate[i].1 = shrunk;
                        out.push(Value::Map(candidate));
                    }
                }
                out
            }
            (Arbitrary::OneOf(alternatives), v) => {
                let Some(matched) = alternatives.iter().position(|alt| alt.permits(v)) else {
                    return Vec::new();
                };
                let mut out: Vec<Value> = Vec::new();
                for alt in &alternatives[..matched] {
                    let fallback = alt.simplest();
                    if fallback != *v && !out.contains(&fallback) {
                        out.push(fallback);
                    }
                }
                for candidate in alternatives[matched].shrink(v) {
                    if !out.contains(&candidate) {
                        out.push(candidate);
                    }
                }
                out
            }
            _ => Vec::new(),
        }
    }

    /// The canonical simplest member of this value space, used when `one_of`
    /// falls back to an earlier-declared alternative during shrinking.
    pub fn simplest(&self) -> Value {
        match self {
            Arbitrary::Integer { target, .. } => Value::Int(*target),
            Arbitrary::Boolean => Value::Bool(false),
            Arbitrary::Constant(v) => v.clone(),
            Arbitrary::Char => Value::Char(CHAR_TARGET),
            Arbitrary::Symbol { min_len, .. } => {
                Value::Sym("a".repeat((*min_len).max(1)))
            }
            Arbitrary::String { min_len, .. } => Value::Str("a".repeat(*min_len)),
            Arbitrary::Array { elem, min_len, .. } => {
                Value::Array((0..*min_len).map(|_| elem.simplest()).collect())
            }
            Arbitrary::Tuple(components) => {
                Value::Tuple(components.iter().map(Arbitrary::simplest).collect())
            }
            Arbitrary::Record(fields) => Value::Map(
                fields
                    .iter()
                    .map(|(name, arb)| (name.clone(), arb.simplest()))
                    .collect(),
            ),
            Arbitrary::Map { values, min_pairs, .. } => Value::Map(
                (0..*min_pairs)
                    .map(|i| (synthetic_key(i), values.simplest()))
                    .collect(),
            ),
            Arbitrary::OneOf(alternatives) => alternatives[0].simplest(),
        }
    }

    /// Whether `value` lies inside this arbitrary's value space. Used by
    /// `one_of` shrinking to locate the producing alternative and by callers
    /// checking the bounds invariant.
    pub fn permits(&self, value: &Value) -> bool {
        match (self, value) {
            (Arbitrary::Integer { min, max, .. }, Value::Int(n)) => n >= min && n <= max,
            (Arbitrary::Boolean, Value::Bool(_)) => true,
            (Arbitrary::Constant(c), v) => c == v,
            (Arbitrary::Char, Value::Char(c)) => (CHAR_LO..=CHAR_HI).contains(c),
            (Arbitrary::Symbol { min_len, max_len }, Value::Sym(s)) => {
                let len = s.chars().count();
                len >= *min_len && len <= *max_len && s.chars().all(|c| c.is_ascii_lowercase())
            }
            (Arbitrary::String { min_len, max_len }, Value::Str(s)) => {
                let len = s.chars().count();
                len >= *min_len
                    && max_len.map_or(true, |hi| len <= hi)
                    && s.chars().all(|c| (CHAR_LO..=CHAR_HI).contains(&c))
            }
            (Arbitrary::Array { elem, min_len, max_len }, Value::Array(items)) => {
                items.len() >= *min_len
                    && max_len.map_or(true, |hi| items.len() <= hi)
                    && items.iter().all(|item| elem.permits(item))
            }
            (Arbitrary::Tuple(components), Value::Tuple(items)) => {
                components.len() == items.len()
                    && components.iter().zip(items).all(|(c, v)| c.permits(v))
            }
            (Arbitrary::Record(fields), Value::Map(pairs)) => {
                fields.len() == pairs.len()
                    && fields
                        .iter()
                        .zip(pairs)
                        .all(|((name, arb), (key, v))| name == key && arb.permits(v))
            }
            (Arbitrary::Map { values, min_pairs, max_pairs, .. }, Value::Map(pairs)) => {
                pairs.len() >= *min_pairs
                    && max_pairs.map_or(true, |hi| pairs.len() <= hi)
                    && pairs.iter().all(|(_, v)| values.permits(v))
            }
            (Arbitrary::OneOf(alternatives), v) => alternatives.iter().any(|alt| alt.permits(v)),
            _ => false,
        }
    }

    /// Whether this arbitrary only produces key-capable values.
    fn yields_keys(&self) -> bool {
        match self {
            Arbitrary::Symbol { .. } | Arbitrary::String { .. } => true,
            Arbitrary::Constant(v) => v.as_key().is_some(),
            Arbitrary::OneOf(alternatives) => alternatives.iter().all(Arbitrary::yields_keys),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::substream;

    fn rng() -> StdRng {
        substream(99, 0)
    }

    #[test]
    fn contradictory_bounds_fail_at_composition_time() {
        assert!(matches!(integer_in(5, 2), Err(Error::Config(_))));
        assert!(matches!(string_with(3, 1), Err(Error::Config(_))));
        assert!(matches!(array_with(integer(), 5, 2), Err(Error::Config(_))));
        assert!(matches!(
            map_with(symbol(), integer(), 4, 1),
            Err(Error::Config(_))
        ));
        assert!(matches!(integer_toward(0, 10, 99), Err(Error::Config(_))));
        assert!(matches!(one_of(vec![]), Err(Error::Config(_))));
        assert!(matches!(tuple(vec![]), Err(Error::Config(_))));
    }

    #[test]
    fn map_keys_must_be_key_capable() {
        assert!(matches!(map_of(integer(), integer()), Err(Error::Config(_))));
        assert!(map_of(symbol(), integer()).is_ok());
        assert!(map_of(constant("fixed"), integer()).is_ok());
    }

    #[test]
    fn integer_shrink_bisects_toward_target() {
        assert_eq!(shrink_int(100, 0), vec![0, 50, 75, 88, 94, 97, 99]);
        assert_eq!(shrink_int(-10, 0), vec![0, -5, -8, -9]);
        assert!(shrink_int(0, 0).is_empty());
    }

    #[test]
    fn integer_candidates_respect_bounds() {
        let arb = integer_in(10, 1000).unwrap();
        for candidate in arb.shrink(&Value::Int(600)) {
            assert!(arb.permits(&candidate), "out of bounds: {candidate}");
        }
    }

    #[test]
    fn generated_values_respect_bounds() {
        let arb = array_with(integer_in(-5, 5).unwrap(), 2, 6).unwrap();
        let mut rng = rng();
        for _ in 0..200 {
            let v = arb.generate(&mut rng, 10);
            assert!(arb.permits(&v), "generated out of bounds: {v}");
        }
    }

    #[test]
    fn boolean_shrinks_to_false_only() {
        assert_eq!(boolean().shrink(&Value::Bool(true)), vec![Value::Bool(false)]);
        assert!(boolean().shrink(&Value::Bool(false)).is_empty());
    }

    #[test]
    fn shrink_never_yields_the_original() {
        let arbs = vec![
            integer(),
            boolean(),
            char_any(),
            string(),
            array(integer()),
            one_of_values(vec![1.into(), 2.into(), 3.into()]).unwrap(),
        ];
        let mut rng = rng();
        for arb in arbs {
            for _ in 0..50 {
                let v = arb.generate(&mut rng, 8);
                assert!(!arb.shrink(&v).contains(&v), "{v} shrank to itself");
            }
        }
    }

    #[test]
    fn array_drops_elements_before_shrinking_them() {
        let arb = array(integer_in(0, 100).unwrap());
        let v = Value::Array(vec![Value::Int(7), Value::Int(9)]);
        let candidates = arb.shrink(&v);
        // Single removals, then the pair removal, then in-place shrinks.
        assert_eq!(candidates[0], Value::Array(vec![Value::Int(9)]));
        assert_eq!(candidates[1], Value::Array(vec![Value::Int(7)]));
        assert_eq!(candidates[2], Value::Array(vec![]));
        assert!(candidates[3..]
            .iter()
            .all(|c| matches!(c, Value::Array(items) if items.len() == 2)));
    }

    #[test]
    fn array_shrink_respects_min_len() {
        let arb = array_with(integer_in(0, 9).unwrap(), 2, 4).unwrap();
        let v = Value::Array(vec![Value::Int(3), Value::Int(4)]);
        for candidate in arb.shrink(&v) {
            assert!(arb.permits(&candidate), "violated min length: {candidate}");
        }
    }

    #[test]
    fn tuple_shrinks_one_component_at_a_time() {
        let arb = tuple(vec![integer_in(0, 10).unwrap(), integer_in(0, 10).unwrap()]).unwrap();
        let v = Value::Tuple(vec![Value::Int(4), Value::Int(6)]);
        for candidate in arb.shrink(&v) {
            let Value::Tuple(items) = &candidate else { panic!() };
            let moved = items
                .iter()
                .zip([Value::Int(4), Value::Int(6)])
                .filter(|(got, orig)| **got != *orig)
                .count();
            assert_eq!(moved, 1, "candidate moved {moved} components: {candidate}");
        }
    }

    #[test]
    fn record_keeps_its_shape_while_shrinking() {
        let arb = record(vec![("id", integer_in(0, 99).unwrap()), ("flag", boolean())]).unwrap();
        let v = Value::Map(vec![
            ("id".to_string(), Value::Int(42)),
            ("flag".to_string(), Value::Bool(true)),
        ]);
        for candidate in arb.shrink(&v) {
            let Value::Map(pairs) = &candidate else { panic!() };
            assert_eq!(pairs.len(), 2);
            assert_eq!(pairs[0].0, "id");
            assert_eq!(pairs[1].0, "flag");
        }
    }

    #[test]
    fn map_removes_pairs_before_shrinking_values() {
        let arb = map_of(symbol(), integer_in(0, 50).unwrap()).unwrap();
        let v = Value::Map(vec![
            ("x".to_string(), Value::Int(30)),
            ("y".to_string(), Value::Int(20)),
        ]);
        let candidates = arb.shrink(&v);
        let first_inplace = candidates
            .iter()
            .position(|c| matches!(c, Value::Map(pairs) if pairs.len() == 2))
            .unwrap();
        assert!(candidates[..first_inplace]
            .iter()
            .all(|c| matches!(c, Value::Map(pairs) if pairs.len() < 2)));
    }

    #[test]
    fn map_generation_never_duplicates_keys() {
        let arb = map_with(symbol(), integer(), 0, 6).unwrap();
        let mut rng = rng();
        for _ in 0..100 {
            let Value::Map(pairs) = arb.generate(&mut rng, 6) else { panic!() };
            for (i, (key, _)) in pairs.iter().enumerate() {
                assert!(!pairs[..i].iter().any(|(seen, _)| seen == key));
            }
        }
    }

    #[test]
    fn narrow_key_space_still_satisfies_min_pairs() {
        // A constant key can never yield two distinct pairs on its own; the
        // generator must still honor the lower bound.
        let arb = map_with(constant("k"), integer(), 2, 5).unwrap();
        let mut rng = rng();
        for _ in 0..50 {
            let v = arb.generate(&mut rng, 6);
            let Value::Map(pairs) = &v else { panic!() };
            assert!(pairs.len() >= 2, "lower bound violated: {v}");
            assert!(arb.permits(&v), "generated out of bounds: {v}");
        }
    }

    #[test]
    fn one_of_falls_back_to_earlier_alternatives_first() {
        let arb = one_of_values(vec![1.into(), 2.into(), 3.into(), 4.into(), 5.into()]).unwrap();
        assert_eq!(
            arb.shrink(&Value::Int(4)),
            vec![Value::Int(1), Value::Int(2), Value::Int(3)]
        );
        assert_eq!(arb.shrink(&Value::Int(1)), Vec::<Value>::new());
    }

    #[test]
    fn string_shrinks_by_shortening_and_by_character() {
        let arb = string_with(1, 4).unwrap();
        let v = Value::Str("zb".to_string());
        let candidates = arb.shrink(&v);
        assert_eq!(candidates[0], Value::Str("b".to_string()));
        assert_eq!(candidates[1], Value::Str("z".to_string()));
        // Per-character shrinks move 'z' toward 'a'.
        assert!(candidates.contains(&Value::Str("ab".to_string())));
        for candidate in &candidates {
            assert!(arb.permits(candidate), "out of bounds: {candidate}");
        }
    }

    #[test]
    fn simplest_members_are_permitted() {
        let arbs = vec![
            integer_in(3, 9).unwrap(),
            boolean(),
            char_any(),
            symbol(),
            string_with(2, 5).unwrap(),
            array_with(integer_in(0, 4).unwrap(), 1, 3).unwrap(),
            record(vec![("n", integer())]).unwrap(),
            map_with(symbol(), boolean(), 2, 4).unwrap(),
            one_of(vec![integer_in(1, 2).unwrap(), boolean()]).unwrap(),
        ];
        for arb in arbs {
            let s = arb.simplest();
            assert!(arb.permits(&s), "simplest not permitted: {s}");
        }
    }

    #[test]
    fn generation_is_a_pure_function_of_the_substream() {
        let arb = tuple(vec![integer(), array(char_any()), symbol()]).unwrap();
        let a = arb.generate(&mut substream(7, 3), 12);
        let b = arb.generate(&mut substream(7, 3), 12);
        assert_eq!(a, b);
    }
}
