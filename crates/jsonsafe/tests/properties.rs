use std::sync::Arc;

use jsonsafe::{BigInt, Instant, Object, Value, sanitize};
use rand::{Rng, SeedableRng, rngs::StdRng};

// Years 0001..=9999 in epoch milliseconds.
const MIN_MS: i64 = -62_135_596_800_000;
const MAX_MS: i64 = 253_402_300_799_999;

fn random_leaf(rng: &mut StdRng) -> Value {
    match rng.gen_range(0..7) {
        0 => Value::Null,
        1 => Value::Undefined,
        2 => Value::Bool(rng.gen_bool(0.5)),
        3 => Value::Number(rng.gen_range(-1.0e9..1.0e9)),
        4 => {
            let len = rng.gen_range(0..12);
            Value::String((0..len).map(|_| rng.gen_range('a'..='z')).collect())
        }
        5 => Value::BigInt(BigInt::from(rng.r#gen::<i128>()) * BigInt::from(rng.r#gen::<u64>())),
        _ => {
            if rng.gen_bool(0.2) {
                Value::Instant(Instant::invalid())
            } else {
                Value::Instant(Instant::from_millis(rng.gen_range(MIN_MS..=MAX_MS) as f64))
            }
        }
    }
}

fn random_value(rng: &mut StdRng, depth: usize) -> Value {
    let branches = if depth >= 4 { 7 } else { 9 };
    match rng.gen_range(0..branches) {
        7 => {
            let len = rng.gen_range(0..5);
            Value::Array((0..len).map(|_| random_value(rng, depth + 1)).collect())
        }
        8 => {
            let len = rng.gen_range(0..5);
            let mut obj = if rng.gen_bool(0.3) {
                let proto: Object = [("inherited", random_leaf(rng))].into_iter().collect();
                Object::with_prototype(Arc::new(proto))
            } else {
                Object::new()
            };
            for i in 0..len {
                obj.insert(format!("k{i}"), random_value(rng, depth + 1));
            }
            Value::Object(obj)
        }
        _ => random_leaf(rng),
    }
}

fn check(input: &Value, output: &Value) {
    match (input, output) {
        (Value::BigInt(n), Value::String(s)) => {
            assert_eq!(*s, n.to_string());
            assert_eq!(s.parse::<BigInt>().unwrap(), *n);
        }
        (Value::Instant(i), out) => match i.timestamp_millis() {
            Some(ms) => {
                let s = out.as_str().expect("valid instant becomes a string");
                assert!(s.ends_with('Z'), "{s}");
                assert_eq!(Instant::parse(s).timestamp_millis(), Some(ms));
            }
            None => assert_eq!(out, &Value::Null),
        },
        (Value::Array(a), Value::Array(b)) => {
            assert_eq!(a.len(), b.len());
            for (x, y) in a.iter().zip(b) {
                check(x, y);
            }
        }
        (Value::Object(a), Value::Object(b)) => {
            assert!(b.prototype().is_none());
            assert!(!b.contains_own("inherited"));
            assert_eq!(a.keys().collect::<Vec<_>>(), b.keys().collect::<Vec<_>>());
            for ((_, x), (_, y)) in a.own_entries().zip(b.own_entries()) {
                check(x, y);
            }
        }
        (a, b) => assert_eq!(a, b),
    }
}

fn contains_unsafe(v: &Value) -> bool {
    match v {
        Value::BigInt(_) | Value::Instant(_) => true,
        Value::Array(items) => items.iter().any(contains_unsafe),
        Value::Object(obj) => obj.own_entries().any(|(_, v)| contains_unsafe(v)),
        _ => false,
    }
}

#[test]
fn sanitized_structure_matches_input() {
    for seed in 0..300 {
        let mut rng = StdRng::seed_from_u64(seed);
        let input = random_value(&mut rng, 0);
        let out = sanitize(&input);
        check(&input, &out);
        assert!(!contains_unsafe(&out), "seed {seed}");
    }
}

#[test]
fn sanitize_is_idempotent() {
    for seed in 0..300 {
        let mut rng = StdRng::seed_from_u64(seed);
        let once = sanitize(&random_value(&mut rng, 0));
        assert_eq!(sanitize(&once), once, "seed {seed}");
    }
}

#[test]
fn bigint_strings_round_trip() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..1_000 {
        let digits = rng.gen_range(1..80);
        let mut s: String = (0..digits).map(|_| rng.gen_range('0'..='9')).collect();
        let n: BigInt = s.parse().unwrap();
        if rng.gen_bool(0.5) {
            s.insert(0, '-');
        }
        let n = if s.starts_with('-') { -n } else { n };
        let out = sanitize(&Value::BigInt(n.clone()));
        let text = out.as_str().unwrap();
        assert_eq!(text.parse::<BigInt>().unwrap(), n);
        let unsigned = text.strip_prefix('-').unwrap_or(text);
        assert!(unsigned == "0" || !unsigned.starts_with('0'), "{text}");
        assert_ne!(text, "-0");
    }
}

#[test]
fn json_output_is_always_encodable() -> Result<(), Box<dyn std::error::Error>> {
    for seed in 0..100 {
        let mut rng = StdRng::seed_from_u64(seed);
        let input = random_value(&mut rng, 0);
        let text = jsonsafe::to_string(&input, &jsonsafe::Options::default())?;
        let _: serde_json::Value = serde_json::from_str(&text)?;
    }
    Ok(())
}
