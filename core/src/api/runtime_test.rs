use pretty_assertions::assert_eq;

use crate::api::{DEFAULT_STACK_SIZE, EvalType, Runtime, RuntimeOptions, ScriptError};

#[test]
fn test_default_options() {
    let runtime = Runtime::new().unwrap();
    assert_eq!(runtime.options(), RuntimeOptions::default());
    assert_eq!(runtime.options().max_stack_size, DEFAULT_STACK_SIZE);
}

#[test]
fn test_setters_update_options() {
    let runtime = Runtime::with_options(RuntimeOptions {
        gc_threshold: Some(1 << 20),
        ..RuntimeOptions::default()
    })
    .unwrap();
    assert_eq!(runtime.options().gc_threshold, Some(1 << 20));

    runtime.set_max_stack_size(512 * 1024);
    runtime.set_memory_limit(Some(64 << 20));
    runtime.set_gc_threshold(2 << 20);
    assert_eq!(
        runtime.options(),
        RuntimeOptions {
            max_stack_size: 512 * 1024,
            memory_limit: Some(64 << 20),
            gc_threshold: Some(2 << 20),
        }
    );

    runtime.set_memory_limit(None);
    assert_eq!(runtime.options().memory_limit, None);
}

#[test]
fn test_stack_overflow_is_an_exception() {
    let runtime = Runtime::new().unwrap();
    let ctx = runtime.new_context().unwrap();

    let err = ctx
        .eval("function f() { return f() + 1; } f()", "<test>", EvalType::Global)
        .unwrap_err();
    let err = ScriptError::from(err);
    assert!(err.message.contains("stack overflow"), "{}", err);

    // The context is still usable.
    let value = ctx.eval("1 + 1", "<test>", EvalType::Global).unwrap();
    assert_eq!(value.as_int32(), Some(2));
}

#[test]
fn test_memory_limit_is_an_exception() {
    let runtime = Runtime::new().unwrap();
    let ctx = runtime.new_context().unwrap();
    runtime.set_memory_limit(Some(16 << 20));

    let err = ctx
        .eval(
            "const chunks = []; for (;;) chunks.push(new Array(20000).fill(1.5));",
            "<test>",
            EvalType::Global,
        )
        .unwrap_err();
    let err = ScriptError::from(err);
    assert!(err.message.contains("out of memory"), "{}", err);

    runtime.set_memory_limit(None);
    runtime.run_gc();
}

#[test]
fn test_run_gc_collects_cycles() {
    let runtime = Runtime::new().unwrap();
    let ctx = runtime.new_context().unwrap();
    ctx.eval(
        "for (let i = 0; i < 1000; i++) { const a = {}; const b = { a }; a.b = b; }",
        "<test>",
        EvalType::Global,
    )
    .unwrap();
    runtime.run_gc();
}

#[test]
fn test_many_contexts() {
    let runtime = Runtime::new().unwrap();
    for i in 0..8 {
        let ctx = runtime.new_context().unwrap();
        let value = ctx.eval(&format!("{} * 2", i), "<test>", EvalType::Global).unwrap();
        assert_eq!(value.as_int32(), Some(i * 2));
    }
}

/// Create a runtime `depth` frames below the caller, each frame padded.
#[inline(never)]
fn runtime_built_deep(depth: usize) -> Runtime {
    let pad = std::hint::black_box([0u8; 4096]);
    let runtime = if depth == 0 {
        Runtime::new().unwrap()
    } else {
        runtime_built_deep(depth - 1)
    };
    std::hint::black_box(&pad);
    runtime
}

#[test]
fn test_runtime_built_in_deeper_frame() {
    let runtime = runtime_built_deep(8);
    let ctx = runtime.new_context().unwrap();

    let value = ctx.eval("1 + 1", "<test>", EvalType::Global).unwrap();
    assert_eq!(value.as_int32(), Some(2));

    let err = ctx
        .eval("throw new RangeError('nope')", "<test>", EvalType::Global)
        .unwrap_err();
    assert_eq!(err.name().as_deref(), Some("RangeError"));
}

#[test]
fn test_runtime_built_in_deeper_frame_still_limits_recursion() {
    let runtime = runtime_built_deep(8);
    let ctx = runtime.new_context().unwrap();

    let err = ctx
        .eval("function f() { return f() + 1; } f()", "<test>", EvalType::Global)
        .unwrap_err();
    let err = ScriptError::from(err);
    assert!(err.message.contains("stack overflow"), "{}", err);
}

#[test]
fn test_zero_stack_size_disables_the_check() {
    let runtime = Runtime::with_options(RuntimeOptions {
        max_stack_size: 0,
        ..RuntimeOptions::default()
    })
    .unwrap();
    assert_eq!(runtime.options().max_stack_size, 0);
    let ctx = runtime.new_context().unwrap();

    let value = ctx
        .eval("function f(n) { return n ? f(n - 1) + 1 : 0; } f(100)", "<test>", EvalType::Global)
        .unwrap();
    assert_eq!(value.as_int32(), Some(100));
}
