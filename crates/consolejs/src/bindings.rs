//! Lazily materialized global bindings.
//!
//! `GlobalBindings` is a memo table from identifier name to engine value. A name
//! gets an entry the first time evaluated code reads it while it is not defined
//! anywhere else; afterwards every read returns that same stored value. Entries
//! are never removed while the engine context lives, and the table must be
//! cleared before the runtime that owns the values is freed.

use std::{cell::RefCell, fmt, rc::Rc};

use ahash::AHashMap;
use rquickjs::{Ctx, Function, IntoJs, Persistent, Value, function::Rest};

use crate::config::ReservedGlobal;

/// Name of the host function exposed to evaluated code.
pub const LOOKUP_FUNCTION: &str = "__lookupGlobal";

/// Name to value table for globals created on demand.
pub struct GlobalBindings {
    table: AHashMap<String, Persistent<Value<'static>>>,
    reserved: ReservedGlobal,
}

impl fmt::Debug for GlobalBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalBindings")
            .field("names", &self.names())
            .field("reserved", &self.reserved)
            .finish()
    }
}

impl GlobalBindings {
    #[must_use]
    pub fn new(reserved: ReservedGlobal) -> Self {
        Self {
            table: AHashMap::new(),
            reserved,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// Names of all materialized bindings, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.table.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Returns the stored binding for `name`, without removing it from the table.
    pub(crate) fn get<'js>(&self, ctx: &Ctx<'js>, name: &str) -> rquickjs::Result<Option<Value<'js>>> {
        self.table
            .get(name)
            .map(|stored| stored.clone().restore(ctx))
            .transpose()
    }

    pub(crate) fn insert<'js>(&mut self, ctx: &Ctx<'js>, name: String, value: Value<'js>) {
        self.table.insert(name, Persistent::save(ctx, value));
    }

    /// The value a new binding for `name` starts with.
    fn initial_value<'js>(&self, ctx: &Ctx<'js>, name: &str) -> rquickjs::Result<Value<'js>> {
        if name == self.reserved.name {
            self.reserved.value.as_str().into_js(ctx)
        } else {
            Ok(Value::new_undefined(ctx.clone()))
        }
    }

    /// Releases every stored value.
    pub(crate) fn clear(&mut self) {
        self.table.clear();
    }
}

/// Builds the `__lookupGlobal(name)` host function over a shared table.
pub(crate) fn lookup_function<'js>(
    ctx: &Ctx<'js>,
    bindings: Rc<RefCell<GlobalBindings>>,
) -> rquickjs::Result<Function<'js>> {
    Function::new(
        ctx.clone(),
        move |ctx: Ctx<'js>, args: Rest<Value<'js>>| -> rquickjs::Result<Value<'js>> {
            lookup_global(&ctx, &bindings, args.0.first())
        },
    )?
    .with_name(LOOKUP_FUNCTION)
}

/// Returns the binding for the name in `arg`, creating it on first use.
///
/// A missing or non-string argument yields `undefined` and stores nothing.
pub(crate) fn lookup_global<'js>(
    ctx: &Ctx<'js>,
    bindings: &RefCell<GlobalBindings>,
    arg: Option<&Value<'js>>,
) -> rquickjs::Result<Value<'js>> {
    match arg.and_then(|value| value.as_string()).and_then(|s| s.to_string().ok()) {
        Some(name) => materialize(ctx, bindings, &name),
        None => Ok(Value::new_undefined(ctx.clone())),
    }
}

/// Returns the stored binding for `name`, or creates, stores, and defines it
/// on the global object.
///
/// The table borrow is never held across a call back into the engine.
pub(crate) fn materialize<'js>(
    ctx: &Ctx<'js>,
    bindings: &RefCell<GlobalBindings>,
    name: &str,
) -> rquickjs::Result<Value<'js>> {
    let existing = bindings.borrow().get(ctx, name)?;
    if let Some(value) = existing {
        return Ok(value);
    }

    let value = bindings.borrow().initial_value(ctx, name)?;
    ctx.globals().set(name, value.clone())?;
    log::debug!("materialized global binding `{name}`");
    bindings.borrow_mut().insert(ctx, name.to_owned(), value.clone());
    Ok(value)
}
