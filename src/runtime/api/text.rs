//! text - string helpers preloaded into every session

use rhai::plugin::*;
use rhai::{Array, Dynamic};

pub fn create_module() -> rhai::Module {
    let mut module = rhai::Module::new();

    module.set_native_fn(
        "repeat",
        |s: &str, count: i64| -> Result<String, Box<EvalAltResult>> {
            Ok(s.repeat(count.max(0) as usize))
        },
    );

    module.set_native_fn(
        "pad_left",
        |s: &str, width: i64| -> Result<String, Box<EvalAltResult>> {
            let width = width.max(0) as usize;
            Ok(format!("{s:>width$}"))
        },
    );

    module.set_native_fn(
        "pad_right",
        |s: &str, width: i64| -> Result<String, Box<EvalAltResult>> {
            let width = width.max(0) as usize;
            Ok(format!("{s:<width$}"))
        },
    );

    module.set_native_fn("lines", |s: &str| -> Result<Array, Box<EvalAltResult>> {
        Ok(s.lines().map(|line| Dynamic::from(line.to_string())).collect())
    });

    module
}

#[cfg(test)]
mod tests {
    use rhai::Engine;

    use super::*;

    fn engine() -> Engine {
        let mut engine = Engine::new();
        engine.register_static_module("text", create_module().into());
        engine
    }

    #[test]
    fn repeat_builds_separators() {
        assert_eq!(
            engine().eval::<String>(r#"text::repeat("=-", 3)"#).unwrap(),
            "=-=-=-"
        );
    }

    #[test]
    fn repeat_with_negative_count_is_empty() {
        assert_eq!(
            engine().eval::<String>(r#"text::repeat("x", -1)"#).unwrap(),
            ""
        );
    }

    #[test]
    fn padding_aligns_columns() {
        assert_eq!(
            engine().eval::<String>(r#"text::pad_left("7", 3)"#).unwrap(),
            "  7"
        );
        assert_eq!(
            engine()
                .eval::<String>(r#"text::pad_right("ab", 4)"#)
                .unwrap(),
            "ab  "
        );
    }

    #[test]
    fn lines_splits_on_newlines() {
        assert_eq!(
            engine()
                .eval::<i64>(r#"text::lines("a\nb\nc").len()"#)
                .unwrap(),
            3
        );
    }
}
