use pretty_assertions::assert_eq;

use crate::api::{EvalFlags, EvalOptions, EvalType, Runtime};
use crate::test_utils::{init_test_logging, with_context};
use crate::values::Tag;

#[test]
fn test_eval_returns_completion_value() {
    init_test_logging();
    with_context(|ctx| {
        let value = ctx.eval("let x = 20; x + 22", "<test>", EvalType::Global).unwrap();
        assert_eq!(value.as_int32(), Some(42));

        let empty = ctx.eval("", "<test>", EvalType::Global).unwrap();
        assert!(empty.is_undefined());
    });
}

#[test]
fn test_eval_shares_global_state() {
    with_context(|ctx| {
        ctx.eval("var counter = 1", "<test>", EvalType::Global).unwrap();
        ctx.eval("counter += 1", "<test>", EvalType::Global).unwrap();
        let global = ctx.global_object();
        assert_eq!(global.get_prop("counter").unwrap().as_int32(), Some(2));
    });
}

#[test]
fn test_eval_reference_error() {
    with_context(|ctx| {
        let err = ctx.eval("test", "<test>", EvalType::Global).unwrap_err();
        assert!(err.is_error());
        assert_eq!(err.name().as_deref(), Some("ReferenceError"));
        assert!(err.message().unwrap().contains("test"));
        assert!(ctx.exception().is_undefined());
    });
}

#[test]
fn test_eval_syntax_error() {
    with_context(|ctx| {
        let err = ctx.eval("let = ;", "<test>", EvalType::Global).unwrap_err();
        assert_eq!(err.name().as_deref(), Some("SyntaxError"));
    });
}

#[test]
fn test_strict_flag() {
    with_context(|ctx| {
        assert!(ctx.eval("undeclared = 1", "<test>", EvalType::Global).is_ok());

        let strict = EvalOptions::new(EvalType::Global).with_flags(EvalFlags::STRICT);
        let err = ctx.eval("also_undeclared = 1", "<test>", strict).unwrap_err();
        assert_eq!(err.name().as_deref(), Some("ReferenceError"));
    });
}

#[test]
fn test_module_eval() {
    with_context(|ctx| {
        let value = ctx
            .eval("export const x = 1;", "m.js", EvalType::Module)
            .unwrap();
        assert!(value.is_undefined());

        let err = ctx
            .eval("throw new Error('in module')", "n.js", EvalType::Module)
            .unwrap_err();
        assert_eq!(err.message().as_deref(), Some("in module"));

        // Modules are always strict.
        let err = ctx.eval("implicit = 1", "o.js", EvalType::Module).unwrap_err();
        assert_eq!(err.name().as_deref(), Some("ReferenceError"));
    });
}

#[test]
fn test_compile_only_then_eval_function() {
    with_context(|ctx| {
        let options = EvalOptions::from(EvalFlags::COMPILE_ONLY);
        let compiled = ctx.eval("1 + 2", "<test>", options).unwrap();
        assert_eq!(compiled.tag(), Tag::FunctionBytecode);

        let value = ctx.eval_function(compiled).unwrap();
        assert_eq!(value.as_int32(), Some(3));

        // Compiled but never run.
        let unused = ctx.eval("sideEffect = true", "<test>", options).unwrap();
        drop(unused);
        let global = ctx.global_object();
        assert!(global.get_prop("sideEffect").unwrap().is_undefined());
    });
}

#[test]
fn test_eval_function_propagates_throw() {
    with_context(|ctx| {
        let compiled = ctx
            .eval("throw new RangeError('late')", "<test>", EvalFlags::COMPILE_ONLY)
            .unwrap();
        let err = ctx.eval_function(compiled).unwrap_err();
        assert_eq!(err.name().as_deref(), Some("RangeError"));
    });
}

#[test]
fn test_filename_with_nul_is_type_error() {
    with_context(|ctx| {
        let err = ctx.eval("1", "bad\0name.js", EvalType::Global).unwrap_err();
        assert_eq!(err.name().as_deref(), Some("TypeError"));
        assert!(ctx.exception().is_undefined());
    });
}

#[test]
fn test_source_is_not_required_to_be_terminated() {
    with_context(|ctx| {
        let source = "1 + 1; 2 + 2";
        let value = ctx.eval(&source[..5], "<test>", EvalType::Global).unwrap();
        assert_eq!(value.as_int32(), Some(2));
    });
}

#[test]
fn test_throw_then_exception_returns_same_object() {
    with_context(|ctx| {
        let object = ctx.new_object().unwrap();
        let alias = object.dup();

        let marker = ctx.throw(object);
        assert!(marker.is_exception());

        let caught = ctx.exception();
        assert!(caught.is_same(&alias));
        assert_eq!(alias.ref_count(), Some(2));
        assert!(ctx.exception().is_undefined());
    });
}

#[test]
fn test_throw_replaces_pending_exception() {
    with_context(|ctx| {
        let first = ctx.new_object().unwrap();
        let watcher = first.dup();
        ctx.throw(first);
        ctx.throw(ctx.new_int32(2));
        assert_eq!(watcher.ref_count(), Some(1));
        assert_eq!(ctx.exception().as_int32(), Some(2));
    });
}

#[test]
fn test_exception_when_nothing_pending() {
    with_context(|ctx| {
        assert!(ctx.exception().is_undefined());
    });
}

#[test]
fn test_throw_helpers() {
    with_context(|ctx| {
        ctx.throw_type_error("bad type");
        let err = ctx.exception();
        assert!(err.is_error());
        assert_eq!(err.get_prop("name").unwrap().to_string().unwrap(), "TypeError");
        assert_eq!(err.get_prop("message").unwrap().to_string().unwrap(), "bad type");

        ctx.throw_range_error("100% out of range");
        let err = ctx.exception();
        assert_eq!(
            err.get_prop("message").unwrap().to_string().unwrap(),
            "100% out of range"
        );

        let marker = ctx.throw_out_of_memory();
        assert!(marker.is_exception());
        let err = ctx.exception();
        assert_eq!(err.get_prop("name").unwrap().to_string().unwrap(), "InternalError");
        assert_eq!(err.get_prop("message").unwrap().to_string().unwrap(), "out of memory");
    });
}

#[test]
fn test_new_error_is_not_thrown() {
    with_context(|ctx| {
        let error = ctx.new_error().unwrap();
        assert!(error.is_error());
        assert!(ctx.exception().is_undefined());
    });
}

#[test]
fn test_object_and_array_constructors() {
    with_context(|ctx| {
        let array = ctx.new_array().unwrap();
        assert!(array.is_array());
        assert_eq!(array.get_prop("length").unwrap().as_int32(), Some(0));

        let text = ctx.new_string("hi").unwrap();
        assert!(text.is_string());
        assert_eq!(text.to_string().unwrap(), "hi");

        assert!(ctx.global_object().is_object());
    });
}

#[test]
fn test_contexts_share_heap_but_not_globals() {
    let runtime = Runtime::new().unwrap();
    let first = runtime.new_context().unwrap();
    let second = runtime.new_context().unwrap();

    first.eval("var shared = 1", "<a>", EvalType::Global).unwrap();
    let err = second.eval("shared", "<b>", EvalType::Global).unwrap_err();
    assert_eq!(err.name().as_deref(), Some("ReferenceError"));

    let object = first.new_object().unwrap();
    second.throw(object);
    assert!(second.exception().is_object());
}

#[test]
fn test_direct_eval_from_host_is_type_error() {
    with_context(|ctx| {
        let err = ctx.eval("1 + 1", "<test>", EvalType::Direct).unwrap_err();
        assert_eq!(err.name().as_deref(), Some("TypeError"));
        assert!(ctx.exception().is_undefined());

        // The context is unaffected.
        let value = ctx.eval("1 + 1", "<test>", EvalType::Global).unwrap();
        assert_eq!(value.as_int32(), Some(2));
    });
}

#[test]
fn test_indirect_eval_runs_in_global_scope() {
    with_context(|ctx| {
        let value = ctx.eval("var shared = 3; shared * 2", "<test>", EvalType::Indirect).unwrap();
        assert_eq!(value.as_int32(), Some(6));

        let global = ctx.global_object();
        assert_eq!(global.get_prop("shared").unwrap().as_int32(), Some(3));
    });
}

#[test]
fn test_strip_drops_function_source() {
    with_context(|ctx| {
        let source = "(function named() { return 1; }).toString()";

        let kept = ctx.eval(source, "<test>", EvalType::Global).unwrap();
        assert_eq!(kept.to_string().unwrap(), "function named() { return 1; }");

        let stripped = ctx.eval(source, "<test>", EvalFlags::STRIP).unwrap();
        assert_eq!(
            stripped.to_string().unwrap(),
            "function named() {\n    [native code]\n}"
        );
    });
}

#[test]
fn test_backtrace_barrier_keeps_own_frames() {
    with_context(|ctx| {
        let options = EvalOptions::new(EvalType::Global).with_flags(EvalFlags::BACKTRACE_BARRIER);
        let err = ctx
            .eval("function inner() { throw new Error('deep'); }\ninner();", "b.js", options)
            .unwrap_err();
        let stack = err.stack().unwrap();
        assert!(stack.contains("at inner (b.js:1)"), "{}", stack);
        assert!(stack.trim_end().ends_with("(b.js:2)"), "{}", stack);
    });
}
