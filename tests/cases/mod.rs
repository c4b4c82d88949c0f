use once_cell::sync::Lazy;
use quickbind::{EvalType, Runtime, ScriptError};

/// What evaluating a case should produce.
pub enum Expected {
    /// The completion value's string form.
    Value(&'static str),
    /// An exception with this name.
    Throws(&'static str),
}

pub struct ScriptCase {
    pub name: &'static str,
    pub source: &'static str,
    pub eval_type: EvalType,
    pub expected: Expected,
}

/// Evaluate `source` on a fresh runtime and stringify the outcome.
pub fn run(source: &str, eval_type: EvalType) -> Result<String, ScriptError> {
    let runtime = Runtime::new().unwrap();
    let ctx = runtime.new_context().unwrap();
    let value = ctx.eval(source, "case.js", eval_type)?;
    Ok(value.to_string()?)
}

pub static SCRIPT_CASES: Lazy<Vec<ScriptCase>> = Lazy::new(|| {
    vec![
        ScriptCase {
            name: "integer_arithmetic",
            source: "6 * 7",
            eval_type: EvalType::Global,
            expected: Expected::Value("42"),
        },
        ScriptCase {
            name: "float_arithmetic",
            source: "0.1 + 0.2",
            eval_type: EvalType::Global,
            expected: Expected::Value("0.30000000000000004"),
        },
        ScriptCase {
            name: "string_concat",
            source: "'quick' + 'bind'",
            eval_type: EvalType::Global,
            expected: Expected::Value("quickbind"),
        },
        ScriptCase {
            name: "template_literal",
            source: "const n = 3; `${n} items`",
            eval_type: EvalType::Global,
            expected: Expected::Value("3 items"),
        },
        ScriptCase {
            name: "array_join",
            source: "[1, 2, 3].map(x => x * 2)",
            eval_type: EvalType::Global,
            expected: Expected::Value("2,4,6"),
        },
        ScriptCase {
            name: "json_roundtrip",
            source: "JSON.stringify(JSON.parse('{\"a\":[1,null]}'))",
            eval_type: EvalType::Global,
            expected: Expected::Value("{\"a\":[1,null]}"),
        },
        ScriptCase {
            name: "bigint_power",
            source: "2n ** 64n",
            eval_type: EvalType::Global,
            expected: Expected::Value("18446744073709551616"),
        },
        ScriptCase {
            name: "symbol_description",
            source: "Symbol('tag').description",
            eval_type: EvalType::Global,
            expected: Expected::Value("tag"),
        },
        ScriptCase {
            name: "module_completion",
            source: "export default 1;",
            eval_type: EvalType::Module,
            expected: Expected::Value("undefined"),
        },
        ScriptCase {
            name: "undefined_identifier",
            source: "test",
            eval_type: EvalType::Global,
            expected: Expected::Throws("ReferenceError"),
        },
        ScriptCase {
            name: "call_non_function",
            source: "const x = 1; x()",
            eval_type: EvalType::Global,
            expected: Expected::Throws("TypeError"),
        },
        ScriptCase {
            name: "syntax_error",
            source: "function (",
            eval_type: EvalType::Global,
            expected: Expected::Throws("SyntaxError"),
        },
        ScriptCase {
            name: "invalid_array_length",
            source: "new Array(-1)",
            eval_type: EvalType::Global,
            expected: Expected::Throws("RangeError"),
        },
        ScriptCase {
            name: "symbol_result_to_string",
            source: "Symbol('x')",
            eval_type: EvalType::Global,
            expected: Expected::Throws("TypeError"),
        },
        ScriptCase {
            name: "thrown_primitive",
            source: "throw 7",
            eval_type: EvalType::Global,
            expected: Expected::Throws("Uncaught"),
        },
    ]
});
