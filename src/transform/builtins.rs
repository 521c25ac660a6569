//! Built-in functions for the transform expression language.
//!
//! Each builtin is a pure function from argument values to a result value.
//! Failures are plain reason strings; the interpreter wraps them into
//! evaluation errors.

use std::collections::HashMap;

use serde_json::Value;

use super::interpreter::{number_value, truthy};

/// A built-in transform function.
pub type TransformFunction = fn(Vec<Value>) -> Result<Value, String>;

/// Returns the registry of built-in functions.
pub fn builtin_functions() -> HashMap<String, TransformFunction> {
    let mut functions: HashMap<String, TransformFunction> = HashMap::new();
    functions.insert("Boolean".to_string(), boolean_fn);
    functions.insert("Number".to_string(), number_fn);
    functions.insert("String".to_string(), string_fn);
    functions.insert("split".to_string(), split_fn);
    functions.insert("join".to_string(), join_fn);
    functions.insert("lower".to_string(), lower_fn);
    functions.insert("upper".to_string(), upper_fn);
    functions.insert("trim".to_string(), trim_fn);
    functions.insert("replace".to_string(), replace_fn);
    functions.insert("concat".to_string(), concat_fn);
    functions.insert("len".to_string(), len_fn);
    functions.insert("contains".to_string(), contains_fn);
    functions.insert("coalesce".to_string(), coalesce_fn);
    functions.insert("min".to_string(), min_fn);
    functions.insert("max".to_string(), max_fn);
    functions.insert("clamp".to_string(), clamp_fn);
    functions.insert("round".to_string(), round_fn);
    functions.insert("floor".to_string(), floor_fn);
    functions.insert("ceil".to_string(), ceil_fn);
    functions.insert("abs".to_string(), abs_fn);
    functions
}

/// String form of a scalar value. Arrays and objects have no scalar form.
pub(crate) fn stringify_scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some("null".to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn arity(args: &[Value], expected: usize, name: &str) -> Result<(), String> {
    if args.len() != expected {
        return Err(format!(
            "{} expects {} argument(s), got {}",
            name,
            expected,
            args.len()
        ));
    }
    Ok(())
}

fn string_arg(args: &[Value], index: usize, name: &str) -> Result<String, String> {
    match args.get(index) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(format!(
            "{} expects a string argument at position {}, got {}",
            name,
            index + 1,
            other
        )),
        None => Err(format!("{} is missing argument {}", name, index + 1)),
    }
}

fn number_arg(args: &[Value], index: usize, name: &str) -> Result<f64, String> {
    args.get(index).and_then(Value::as_f64).ok_or_else(|| {
        format!(
            "{} expects a numeric argument at position {}",
            name,
            index + 1
        )
    })
}

fn boolean_fn(args: Vec<Value>) -> Result<Value, String> {
    arity(&args, 1, "Boolean")?;
    Ok(Value::Bool(truthy(&args[0])))
}

fn number_fn(args: Vec<Value>) -> Result<Value, String> {
    arity(&args, 1, "Number")?;
    let n = match &args[0] {
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => n.as_f64().ok_or("Number: unrepresentable input")?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("Number: cannot parse '{}'", s))?,
        other => return Err(format!("Number: cannot coerce {}", other)),
    };
    number_value(n).map_err(|e| e.to_string())
}

fn string_fn(args: Vec<Value>) -> Result<Value, String> {
    arity(&args, 1, "String")?;
    stringify_scalar(&args[0])
        .map(Value::String)
        .ok_or_else(|| format!("String: cannot coerce {}", args[0]))
}

fn split_fn(args: Vec<Value>) -> Result<Value, String> {
    arity(&args, 2, "split")?;
    let s = string_arg(&args, 0, "split")?;
    let separator = string_arg(&args, 1, "split")?;
    let parts: Vec<Value> = if separator.is_empty() {
        s.chars().map(|c| Value::String(c.to_string())).collect()
    } else {
        s.split(&separator)
            .map(|part| Value::String(part.to_string()))
            .collect()
    };
    Ok(Value::Array(parts))
}

fn join_fn(args: Vec<Value>) -> Result<Value, String> {
    arity(&args, 2, "join")?;
    let separator = string_arg(&args, 1, "join")?;
    match &args[0] {
        Value::Array(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                parts.push(
                    stringify_scalar(item)
                        .ok_or_else(|| format!("join: cannot stringify element {}", item))?,
                );
            }
            Ok(Value::String(parts.join(&separator)))
        }
        other => Err(format!("join expects an array, got {}", other)),
    }
}

fn lower_fn(args: Vec<Value>) -> Result<Value, String> {
    arity(&args, 1, "lower")?;
    Ok(Value::String(string_arg(&args, 0, "lower")?.to_lowercase()))
}

fn upper_fn(args: Vec<Value>) -> Result<Value, String> {
    arity(&args, 1, "upper")?;
    Ok(Value::String(string_arg(&args, 0, "upper")?.to_uppercase()))
}

fn trim_fn(args: Vec<Value>) -> Result<Value, String> {
    arity(&args, 1, "trim")?;
    Ok(Value::String(string_arg(&args, 0, "trim")?.trim().to_string()))
}

fn replace_fn(args: Vec<Value>) -> Result<Value, String> {
    arity(&args, 3, "replace")?;
    let s = string_arg(&args, 0, "replace")?;
    let from = string_arg(&args, 1, "replace")?;
    let to = string_arg(&args, 2, "replace")?;
    Ok(Value::String(s.replace(&from, &to)))
}

fn concat_fn(args: Vec<Value>) -> Result<Value, String> {
    let mut out = String::new();
    for arg in &args {
        out.push_str(
            &stringify_scalar(arg)
                .ok_or_else(|| format!("concat: cannot stringify {}", arg))?,
        );
    }
    Ok(Value::String(out))
}

fn len_fn(args: Vec<Value>) -> Result<Value, String> {
    arity(&args, 1, "len")?;
    let length = match &args[0] {
        Value::String(s) => s.chars().count(),
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        other => return Err(format!("len: cannot measure {}", other)),
    };
    Ok(Value::from(length as i64))
}

fn contains_fn(args: Vec<Value>) -> Result<Value, String> {
    arity(&args, 2, "contains")?;
    match &args[0] {
        Value::String(s) => {
            let needle = string_arg(&args, 1, "contains")?;
            Ok(Value::Bool(s.contains(&needle)))
        }
        Value::Array(items) => Ok(Value::Bool(items.contains(&args[1]))),
        other => Err(format!("contains: cannot search {}", other)),
    }
}

fn coalesce_fn(args: Vec<Value>) -> Result<Value, String> {
    for arg in args {
        if !matches!(arg, Value::Null) {
            return Ok(arg);
        }
    }
    Ok(Value::Null)
}

fn min_fn(args: Vec<Value>) -> Result<Value, String> {
    fold_numbers(args, "min", f64::min)
}

fn max_fn(args: Vec<Value>) -> Result<Value, String> {
    fold_numbers(args, "max", f64::max)
}

fn fold_numbers(args: Vec<Value>, name: &str, op: fn(f64, f64) -> f64) -> Result<Value, String> {
    if args.is_empty() {
        return Err(format!("{} expects at least one argument", name));
    }
    let mut best = number_arg(&args, 0, name)?;
    for index in 1..args.len() {
        best = op(best, number_arg(&args, index, name)?);
    }
    number_value(best).map_err(|e| e.to_string())
}

fn clamp_fn(args: Vec<Value>) -> Result<Value, String> {
    arity(&args, 3, "clamp")?;
    let x = number_arg(&args, 0, "clamp")?;
    let lo = number_arg(&args, 1, "clamp")?;
    let hi = number_arg(&args, 2, "clamp")?;
    if lo > hi {
        return Err(format!("clamp: lower bound {} exceeds upper bound {}", lo, hi));
    }
    number_value(x.clamp(lo, hi)).map_err(|e| e.to_string())
}

fn round_fn(args: Vec<Value>) -> Result<Value, String> {
    arity(&args, 1, "round")?;
    number_value(number_arg(&args, 0, "round")?.round()).map_err(|e| e.to_string())
}

fn floor_fn(args: Vec<Value>) -> Result<Value, String> {
    arity(&args, 1, "floor")?;
    number_value(number_arg(&args, 0, "floor")?.floor()).map_err(|e| e.to_string())
}

fn ceil_fn(args: Vec<Value>) -> Result<Value, String> {
    arity(&args, 1, "ceil")?;
    number_value(number_arg(&args, 0, "ceil")?.ceil()).map_err(|e| e.to_string())
}

fn abs_fn(args: Vec<Value>) -> Result<Value, String> {
    arity(&args, 1, "abs")?;
    number_value(number_arg(&args, 0, "abs")?.abs()).map_err(|e| e.to_string())
}
