//! QuickJS runtime and context for one REPL session.
//!
//! `JsEngine` owns the runtime/context pair, the lazy global table, and the
//! `console.log` output queue. Construction either yields a fully installed
//! engine or nothing: a failure at any step drops what was already built.

use std::{
    cell::{Ref, RefCell},
    fmt,
    rc::Rc,
};

use rquickjs::{
    CatchResultExt, Context, Ctx, Function, Object, Persistent, Runtime, Value, convert::Coerced, function::Rest,
};

use crate::{
    bindings::{self, GlobalBindings, LOOKUP_FUNCTION},
    config::ReplConfig,
    error::{JsException, ReplError},
};

/// Replaces the global object's prototype with a proxy that routes reads of
/// unknown string keys to the lookup function passed as the only argument.
const INTERCEPT_GLOBALS: &str = r#"
(function (lookup) {
    const fallback = Object.getPrototypeOf(globalThis);
    Object.setPrototypeOf(globalThis, new Proxy(fallback, {
        get(target, key, receiver) {
            if (typeof key !== "string" || Reflect.has(target, key)) {
                return Reflect.get(target, key, receiver);
            }
            return lookup(key);
        },
    }));
})
"#;

/// Runs its argument through an indirect `eval`. Each call is a fresh eval
/// scope: top-level `let`, `const` and `class` stay local to the call, while
/// `var` and function declarations land on the global object.
const EVALUATE_BLOCK: &str = r#"
(function (source) {
    return (0, eval)(source);
})
"#;

/// Lines written by `console.log` that the console has not seen yet.
type OutputQueue = Rc<RefCell<Vec<String>>>;

/// One QuickJS runtime + context with the REPL bridges installed.
pub struct JsEngine {
    // Field order is drop order: the evaluator handle goes first, the table
    // is cleared in `Drop`, then the context is released, then the runtime.
    evaluator: Persistent<Function<'static>>,
    bindings: Rc<RefCell<GlobalBindings>>,
    output: OutputQueue,
    context: Context,
    runtime: Runtime,
}

impl JsEngine {
    /// Creates a runtime with the configured ceilings, a full context, and the
    /// `__lookupGlobal` / `console.log` bridges.
    pub fn new(config: &ReplConfig) -> Result<Self, ReplError> {
        let runtime = Runtime::new().map_err(|err| ReplError::EngineInit(format!("runtime: {err}")))?;
        runtime.set_memory_limit(config.limits.memory_limit);
        runtime.set_max_stack_size(config.limits.max_stack_size);

        let context = Context::full(&runtime).map_err(|err| ReplError::EngineInit(format!("context: {err}")))?;

        let bindings = Rc::new(RefCell::new(GlobalBindings::new(config.reserved_global.clone())));
        let output: OutputQueue = Rc::new(RefCell::new(Vec::new()));
        let evaluator = context.with(|ctx| {
            install(&ctx, Rc::clone(&bindings), Rc::clone(&output))
                .catch(&ctx)
                .map(|evaluator| Persistent::save(&ctx, evaluator))
                .map_err(|err| ReplError::EngineInit(format!("installing bridges: {err}")))
        })?;
        log::debug!(
            "engine ready (memory limit {} bytes, stack limit {} bytes)",
            config.limits.memory_limit,
            config.limits.max_stack_size
        );
        Ok(Self {
            evaluator,
            bindings,
            output,
            context,
            runtime,
        })
    }

    /// Evaluates `source` in a fresh eval scope.
    ///
    /// A `ReferenceError` for an undefined identifier materializes that name and
    /// evaluates the same source once more; whatever the second attempt does is
    /// final. Returns the rendered completion value, or `None` for `undefined`.
    pub fn evaluate(&self, source: &str) -> Result<Option<String>, ReplError> {
        let result = self.context.with(|ctx| {
            let evaluator = self.evaluator.clone().restore(&ctx).map_err(|err| caught_error(&ctx, err))?;
            let first = run_block(&ctx, &evaluator, source);
            let value = match first {
                Err(ReplError::Exception(exc)) => match exc.undefined_identifier() {
                    Some(name) => {
                        log::debug!("`{name}` is not defined, materializing it and retrying");
                        bindings::materialize(&ctx, &self.bindings, name).map_err(|err| caught_error(&ctx, err))?;
                        run_block(&ctx, &evaluator, source)?
                    }
                    None => return Err(ReplError::Exception(exc)),
                },
                other => other?,
            };
            Ok((!value.is_undefined()).then(|| render_value(&value)))
        });
        self.run_pending_jobs();
        result
    }

    /// Runs queued promise jobs until the queue is empty.
    fn run_pending_jobs(&self) {
        while self.runtime.is_job_pending() {
            match self.runtime.execute_pending_job() {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) => {
                    let exc = err.0.with(|ctx| exception_from_value(&ctx.catch()));
                    log::warn!("a pending promise job threw: {exc}");
                    break;
                }
            }
        }
    }

    /// Takes the `console.log` lines queued since the last call.
    pub fn take_output(&self) -> Vec<String> {
        std::mem::take(&mut *self.output.borrow_mut())
    }

    /// The lazy global table.
    ///
    /// # Panics
    /// Panics if called from inside a bridge invocation.
    #[must_use]
    pub fn bindings(&self) -> Ref<'_, GlobalBindings> {
        self.bindings.borrow()
    }
}

impl fmt::Debug for JsEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsEngine")
            .field("bindings", &*self.bindings.borrow())
            .field("queued_output", &self.output.borrow().len())
            .finish_non_exhaustive()
    }
}

impl Drop for JsEngine {
    fn drop(&mut self) {
        self.bindings.borrow_mut().clear();
        self.output.borrow_mut().clear();
        log::debug!("releasing engine context and runtime");
    }
}

/// Defines `__lookupGlobal` and `console`, hooks the global prototype, and
/// returns the block evaluator.
///
/// The lookup function reaches the interception script as a call argument.
fn install<'js>(
    ctx: &Ctx<'js>,
    bindings: Rc<RefCell<GlobalBindings>>,
    output: OutputQueue,
) -> rquickjs::Result<Function<'js>> {
    let globals = ctx.globals();
    let lookup = bindings::lookup_function(ctx, bindings)?;
    globals.set(LOOKUP_FUNCTION, lookup.clone())?;

    let console = Object::new(ctx.clone())?;
    console.set("log", console_log_function(ctx, output)?)?;
    globals.set("console", console)?;

    let intercept: Function = ctx.eval(INTERCEPT_GLOBALS)?;
    intercept.call::<_, ()>((lookup,))?;
    ctx.eval(EVALUATE_BLOCK)
}

/// Builds `console.log`: arguments are stringified, joined by single spaces,
/// logged, and queued for the console.
fn console_log_function<'js>(ctx: &Ctx<'js>, output: OutputQueue) -> rquickjs::Result<Function<'js>> {
    Function::new(ctx.clone(), move |args: Rest<Value<'js>>| {
        let line = args.0.iter().map(render_value).collect::<Vec<_>>().join(" ");
        log::info!(target: "consolejs::console", "{line}");
        output.borrow_mut().push(line);
    })?
    .with_name("log")
}

/// Passes `source` to the evaluator as an argument. Code runs in sloppy mode
/// unless it starts with a `"use strict"` directive.
fn run_block<'js>(ctx: &Ctx<'js>, evaluator: &Function<'js>, source: &str) -> Result<Value<'js>, ReplError> {
    evaluator
        .call::<_, Value>((source,))
        .map_err(|err| caught_error(ctx, err))
}

/// Converts an engine error into a `ReplError`, taking the pending exception
/// off the context when there is one.
fn caught_error(ctx: &Ctx<'_>, err: rquickjs::Error) -> ReplError {
    if err.is_exception() {
        ReplError::Exception(exception_from_value(&ctx.catch()))
    } else {
        ReplError::Engine(err.to_string())
    }
}

fn exception_from_value(thrown: &Value<'_>) -> JsException {
    if let Some(object) = thrown.as_object() {
        let message = object.get::<_, Option<String>>("message").ok().flatten();
        if let Some(message) = message {
            return JsException {
                name: object.get::<_, Option<String>>("name").ok().flatten(),
                message,
                stack: object.get::<_, Option<String>>("stack").ok().flatten(),
            };
        }
    }
    JsException {
        name: None,
        message: render_value(thrown),
        stack: None,
    }
}

/// Renders a value the way `String(value)` would.
///
/// Values whose conversion throws, such as symbols, render as their type name.
pub(crate) fn render_value(value: &Value<'_>) -> String {
    match value.get::<Coerced<String>>() {
        Ok(Coerced(text)) => text,
        Err(err) => {
            if err.is_exception() {
                let _ = value.ctx().catch();
            }
            format!("[{}]", value.type_name())
        }
    }
}
