//! math - numeric helpers preloaded into every session
//!
//! Accepts mixed int/float arrays; everything computes in `f64`.

use rhai::plugin::*;
use rhai::{Array, Dynamic};

fn as_number(value: &Dynamic) -> Option<f64> {
    value
        .clone()
        .as_int()
        .map(|i| i as f64)
        .or_else(|_| value.clone().as_float())
        .ok()
}

fn numbers(values: &Array, who: &str) -> Result<Vec<f64>, Box<EvalAltResult>> {
    values
        .iter()
        .map(|v| as_number(v).ok_or_else(|| format!("{who}() expects a list of numbers").into()))
        .collect()
}

pub fn create_module() -> rhai::Module {
    let mut module = rhai::Module::new();

    module.set_native_fn("sum", |values: Array| -> Result<f64, Box<EvalAltResult>> {
        Ok(numbers(&values, "sum")?.iter().sum())
    });

    module.set_native_fn("mean", |values: Array| -> Result<f64, Box<EvalAltResult>> {
        let nums = numbers(&values, "mean")?;
        if nums.is_empty() {
            return Err("mean() of an empty list".into());
        }
        Ok(nums.iter().sum::<f64>() / nums.len() as f64)
    });

    module.set_native_fn(
        "median",
        |values: Array| -> Result<f64, Box<EvalAltResult>> {
            let mut nums = numbers(&values, "median")?;
            if nums.is_empty() {
                return Err("median() of an empty list".into());
            }
            nums.sort_by(|a, b| a.total_cmp(b));
            let mid = nums.len() / 2;
            Ok(if nums.len() % 2 == 0 {
                (nums[mid - 1] + nums[mid]) / 2.0
            } else {
                nums[mid]
            })
        },
    );

    // Population standard deviation.
    module.set_native_fn(
        "stddev",
        |values: Array| -> Result<f64, Box<EvalAltResult>> {
            let nums = numbers(&values, "stddev")?;
            if nums.is_empty() {
                return Err("stddev() of an empty list".into());
            }
            let mean = nums.iter().sum::<f64>() / nums.len() as f64;
            let variance =
                nums.iter().map(|n| (n - mean).powi(2)).sum::<f64>() / nums.len() as f64;
            Ok(variance.sqrt())
        },
    );

    module.set_native_fn(
        "round_to",
        |value: f64, digits: i64| -> Result<f64, Box<EvalAltResult>> {
            let factor = 10f64.powi(digits.clamp(0, 12) as i32);
            Ok((value * factor).round() / factor)
        },
    );

    module
}
