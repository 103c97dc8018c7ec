pub mod live {
    //! Live JavaScript evaluation.
    //!
    //! Every evaluation gets a brand new QuickJS runtime and context, so no
    //! state leaks between runs. The context only has the ECMAScript
    //! intrinsics plus a `console` object whose methods write to the collector
    //! passed to [`LiveScript::evaluate`]; there is no DOM, network, filesystem
    //! or timer API to reach.
    use crate::util::error::error::EvaluationFault;
    use rquickjs::convert::Coerced;
    use rquickjs::prelude::Rest;
    use rquickjs::{CatchResultExt, CaughtError, Context, Ctx, Function, Object, Runtime, Value};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::{Duration, Instant};
    use tracing::debug;

    const CONSOLE_METHODS: [&str; 5] = ["log", "info", "warn", "error", "debug"];

    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
    pub const DEFAULT_MEMORY_LIMIT: usize = 64 * 1024 * 1024;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EvalLimits {
        /// Wall-clock budget; the script is interrupted once it runs out.
        pub timeout: Option<Duration>,
        /// Heap limit in bytes for the QuickJS runtime.
        pub memory_limit: Option<usize>,
    }

    impl Default for EvalLimits {
        fn default() -> Self {
            Self {
                timeout: Some(DEFAULT_TIMEOUT),
                memory_limit: Some(DEFAULT_MEMORY_LIMIT),
            }
        }
    }

    impl EvalLimits {
        pub fn unlimited() -> Self {
            Self {
                timeout: None,
                memory_limit: None,
            }
        }
    }

    pub struct LiveScript {
        limits: EvalLimits,
    }

    impl LiveScript {
        pub fn new(limits: EvalLimits) -> Self {
            Self { limits }
        }

        /// Evaluate `source`, handing every console line to `emit` as it is
        /// produced. Lines emitted before a fault are not taken back.
        pub fn evaluate<F>(&self, source: &str, emit: F) -> Result<(), EvaluationFault>
        where
            F: FnMut(String) + 'static,
        {
            let runtime = Runtime::new().map_err(engine_fault)?;
            if let Some(limit) = self.limits.memory_limit {
                runtime.set_memory_limit(limit);
            }
            if let Some(timeout) = self.limits.timeout {
                let deadline = Instant::now() + timeout;
                runtime.set_interrupt_handler(Some(Box::new(move || Instant::now() >= deadline)));
            }
            let context = Context::full(&runtime).map_err(engine_fault)?;

            let emit = Rc::new(RefCell::new(emit));
            context.with(|ctx| {
                install_console(&ctx, emit.clone()).map_err(engine_fault)?;
                ctx.eval::<Value, _>(source)
                    .catch(&ctx)
                    .map(|_| ())
                    .map_err(|caught| fault_from_caught(&ctx, caught))
            })?;

            // Promise callbacks queued by the script run before we report back.
            loop {
                match runtime.execute_pending_job() {
                    Ok(true) => {}
                    Ok(false) => return Ok(()),
                    Err(job) => {
                        return Err(job.0.with(|ctx| {
                            let thrown = ctx.catch();
                            fault_from_value(&ctx, &thrown)
                        }));
                    }
                }
            }
        }
    }

    fn install_console<'js, F>(ctx: &Ctx<'js>, emit: Rc<RefCell<F>>) -> rquickjs::Result<()>
    where
        F: FnMut(String) + 'static,
    {
        let console = Object::new(ctx.clone())?;
        for method in CONSOLE_METHODS {
            let emit = emit.clone();
            let func = Function::new(ctx.clone(), move |ctx: Ctx<'js>, args: Rest<Value<'js>>| {
                // Render first: JSON.stringify may call back into console.
                let line = render_args(&ctx, &args.0);
                debug!(method, line = %line, "console");
                (&mut *emit.borrow_mut())(line);
            })?;
            console.set(method, func)?;
        }
        ctx.globals().set("console", console)?;
        Ok(())
    }

    fn render_args<'js>(ctx: &Ctx<'js>, args: &[Value<'js>]) -> String {
        args.iter()
            .map(|value| render_value(ctx, value))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Objects and arrays print as two-space indented JSON, everything else
    /// the way `String(value)` would.
    fn render_value<'js>(ctx: &Ctx<'js>, value: &Value<'js>) -> String {
        if value.is_object() && !value.is_function() {
            if let Some(json) = pretty_json(ctx, value) {
                return json;
            }
        }
        coerce(ctx, value)
    }

    fn pretty_json<'js>(ctx: &Ctx<'js>, value: &Value<'js>) -> Option<String> {
        let json: Object = ctx.globals().get("JSON").ok()?;
        let stringify: Function = json.get("stringify").ok()?;
        match stringify.call::<_, Option<String>>((value.clone(), Value::new_null(ctx.clone()), 2)) {
            Ok(text) => text,
            Err(_) => {
                // Circular structures throw; clear it and fall back to String().
                let _ = ctx.catch();
                None
            }
        }
    }

    /// `String(value)`. Symbols refuse implicit conversion, so they go
    /// through the `String` function explicitly. A throwing `toString` is
    /// cleared and replaced by the type name.
    fn coerce<'js>(ctx: &Ctx<'js>, value: &Value<'js>) -> String {
        if value.is_symbol() {
            if let Some(text) = call_string(ctx, value) {
                return text;
            }
        }
        match value.get::<Coerced<String>>() {
            Ok(text) => text.0,
            Err(_) => {
                let _ = ctx.catch();
                format!("[{}]", value.type_name())
            }
        }
    }

    fn call_string<'js>(ctx: &Ctx<'js>, value: &Value<'js>) -> Option<String> {
        let string: Function = ctx.globals().get("String").ok()?;
        match string.call::<_, String>((value.clone(),)) {
            Ok(text) => Some(text),
            Err(_) => {
                let _ = ctx.catch();
                None
            }
        }
    }

    fn fault_from_caught<'js>(ctx: &Ctx<'js>, caught: CaughtError<'js>) -> EvaluationFault {
        match caught {
            CaughtError::Exception(exception) => match exception.message() {
                Some(message) => EvaluationFault::new(message),
                None => fault_from_value(ctx, exception.as_value()),
            },
            CaughtError::Value(value) => fault_from_value(ctx, &value),
            CaughtError::Error(error) => {
                let _ = ctx.catch();
                engine_fault(error)
            }
        }
    }

    fn fault_from_value<'js>(ctx: &Ctx<'js>, value: &Value<'js>) -> EvaluationFault {
        if let Some(message) = value
            .as_object()
            .and_then(|obj| obj.get::<_, Option<String>>("message").ok().flatten())
        {
            return EvaluationFault::new(message);
        }
        EvaluationFault::new(coerce(ctx, value))
    }

    fn engine_fault(error: rquickjs::Error) -> EvaluationFault {
        EvaluationFault::new(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::live::{EvalLimits, LiveScript};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn run(source: &str) -> (Vec<String>, Result<(), String>) {
        run_with(EvalLimits::default(), source)
    }

    fn run_with(limits: EvalLimits, source: &str) -> (Vec<String>, Result<(), String>) {
        let lines = Rc::new(RefCell::new(Vec::new()));
        let sink = lines.clone();
        let result = LiveScript::new(limits)
            .evaluate(source, move |line| sink.borrow_mut().push(line))
            .map_err(|fault| fault.message);
        let collected = lines.borrow().clone();
        (collected, result)
    }

    #[test]
    fn console_log_captures_computed_value() {
        let (lines, result) = run("console.log(1+1)");
        assert_eq!(result, Ok(()));
        assert_eq!(lines, vec!["2"]);
    }

    #[test]
    fn arguments_are_space_joined() {
        let (lines, _) = run(r#"console.log("Sum:", 5 + 3); console.info("a", true, null, undefined)"#);
        assert_eq!(lines, vec!["Sum: 8", "a true null undefined"]);
    }

    #[test]
    fn objects_are_pretty_printed() {
        let (lines, _) = run(r#"console.log({ a: 1, b: [2, 3] })"#);
        assert_eq!(lines, vec!["{\n  \"a\": 1,\n  \"b\": [\n    2,\n    3\n  ]\n}"]);
    }

    #[test]
    fn thrown_error_message_is_reported() {
        let (lines, result) = run(r#"console.log("before"); throw new Error("boom");"#);
        assert_eq!(lines, vec!["before"]);
        assert_eq!(result, Err("boom".to_string()));
    }

    #[test]
    fn thrown_string_is_reported() {
        let (_, result) = run(r#"throw "plain""#);
        assert_eq!(result, Err("plain".to_string()));
    }

    #[test]
    fn syntax_error_is_a_fault() {
        let (lines, result) = run("console.log(");
        assert!(lines.is_empty());
        assert!(result.is_err());
    }

    #[test]
    fn runs_do_not_share_globals() {
        let (_, first) = run("globalThis.leaked = 1; const x = 1;");
        assert_eq!(first, Ok(()));
        let (lines, second) = run("const x = 2; console.log(typeof leaked)");
        assert_eq!(second, Ok(()));
        assert_eq!(lines, vec!["undefined"]);
    }

    #[test]
    fn no_host_capabilities_are_exposed() {
        let (lines, _) = run("console.log(typeof require, typeof fetch, typeof setTimeout)");
        assert_eq!(lines, vec!["undefined undefined undefined"]);
    }

    #[test]
    fn promise_callbacks_run_before_returning() {
        let (lines, result) = run(r#"Promise.resolve(3).then(v => console.log("then", v)); console.log("sync");"#);
        assert_eq!(result, Ok(()));
        assert_eq!(lines, vec!["sync", "then 3"]);
    }

    #[test]
    fn runaway_loop_is_interrupted() {
        let limits = EvalLimits {
            timeout: Some(Duration::from_millis(100)),
            memory_limit: None,
        };
        let (_, result) = run_with(limits, "while (true) {}");
        assert!(result.is_err());
    }

    #[test]
    fn symbols_print_like_string_conversion() {
        let (lines, result) = run(r#"console.log(Symbol("x")); console.log("after")"#);
        assert_eq!(result, Ok(()));
        assert_eq!(lines, vec!["Symbol(x)", "after"]);
    }

    #[test]
    fn throwing_to_string_does_not_poison_later_calls() {
        let (lines, result) = run(
            r#"const odd = { toJSON() { return undefined; }, toString() { throw new Error("no"); } };
               console.log(odd);
               console.log("after");"#,
        );
        assert_eq!(result, Ok(()));
        assert_eq!(lines, vec!["[object]", "after"]);
    }
}
