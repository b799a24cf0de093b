//! Name resolution: the definition table, the live binding types and the
//! two resolution strategies.
//!
//! Both strategies answer the same question - "which stack entry does this
//! name denote?" - over either stack (variables or active definitions),
//! through the [`Scoped`] trait:
//!
//! - [`DynamicScope`]: nearest binding wins. Scan the stack newest-first
//!   and return the first name match, regardless of who created it.
//! - [`StaticScope`]: lexical structure wins. Walk the lexical-parent chain
//!   of the definition enclosing the usage site, and at each ancestor accept
//!   only entries owned by exactly that ancestor. The dynamic caller chain
//!   plays no part.
//!
//! The strategy is picked once at startup; the interpreter is generic over
//! it, so no per-lookup mode check happens.

use super::value::Value;

/// Handle into the definition table. Definitions are registered every time
/// an enclosing body executes their `def` line, so recursion produces fresh
/// ids for re-registered inner definitions while the table itself only
/// grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuncId(usize);

/// A registered function definition.
///
/// `start` is the first line of the body (the line after `def`); `end` is
/// the line carrying the matching `end`, i.e. the exclusive bound of the
/// body, unresolved until that line is reached. `parent` is the definition
/// lexically enclosing this one, fixed at registration.
#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub name: String,
    pub start: usize,
    pub end: Option<usize>,
    pub parent: Option<FuncId>,
}

/// Append-only table of every definition registered during the run.
///
/// The table serves lexical lookups only; which definitions are currently
/// *active* is tracked separately by the interpreter's function stack, and
/// the dynamic call chain by its activation stack.
#[derive(Debug, Default)]
pub struct Definitions {
    defs: Vec<FunctionDef>,
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        start: usize,
        parent: Option<FuncId>,
    ) -> FuncId {
        self.defs.push(FunctionDef {
            name: name.into(),
            start,
            end: None,
            parent,
        });
        FuncId(self.defs.len() - 1)
    }

    pub fn get(&self, id: FuncId) -> &FunctionDef {
        &self.defs[id.0]
    }

    /// Fix the end line of the most recently registered definition that is
    /// still open.
    pub fn close_latest(&mut self, end: usize) {
        if let Some(def) = self.defs.iter_mut().rev().find(|d| d.end.is_none()) {
            def.end = Some(end);
        }
    }
}

/// A live variable binding. `owner` is the definition whose body textually
/// contains the `var` statement that created it.
#[derive(Debug, Clone)]
pub struct Binding {
    pub name: String,
    pub value: Value,
    pub owner: FuncId,
}

/// Anything a resolution strategy can search: it has a name, and an owning
/// definition that static resolution matches against the lexical chain.
pub trait Scoped {
    fn name(&self) -> &str;
    fn owner(&self) -> Option<FuncId>;
}

impl Scoped for Binding {
    fn name(&self) -> &str {
        &self.name
    }

    fn owner(&self) -> Option<FuncId> {
        Some(self.owner)
    }
}

/// View over an entry of the active function stack; a definition's "owner"
/// for resolution purposes is its lexical parent.
#[derive(Debug, Clone, Copy)]
pub struct ActiveFunction<'a> {
    pub id: FuncId,
    pub def: &'a FunctionDef,
}

impl Scoped for ActiveFunction<'_> {
    fn name(&self) -> &str {
        &self.def.name
    }

    fn owner(&self) -> Option<FuncId> {
        self.def.parent
    }
}

/// An identifier resolution discipline, fixed for the whole run.
pub trait ScopeStrategy {
    /// Find the stack entry `name` denotes, returning its index so callers
    /// can mutate in place. `ctx` is the definition lexically enclosing the
    /// usage site; `defs` supplies the parent chain.
    fn resolve<T: Scoped>(
        items: &[T],
        name: &str,
        ctx: FuncId,
        defs: &Definitions,
    ) -> Option<usize>;
}

/// Most-recent-binding-wins resolution over the whole stack.
pub struct DynamicScope;

impl ScopeStrategy for DynamicScope {
    fn resolve<T: Scoped>(
        items: &[T],
        name: &str,
        _ctx: FuncId,
        _defs: &Definitions,
    ) -> Option<usize> {
        items.iter().rposition(|item| item.name() == name)
    }
}

/// Lexical-parent-chain resolution from the definition site outward.
pub struct StaticScope;

impl ScopeStrategy for StaticScope {
    fn resolve<T: Scoped>(
        items: &[T],
        name: &str,
        ctx: FuncId,
        defs: &Definitions,
    ) -> Option<usize> {
        let mut step = Some(ctx);
        while let Some(current) = step {
            let found = items
                .iter()
                .position(|item| item.name() == name && item.owner() == Some(current));
            if found.is_some() {
                return found;
            }
            step = defs.get(current).parent;
        }
        None
    }
}

/// Which discipline to run under; used once at startup to pick the
/// strategy the interpreter is instantiated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeMode {
    Static,
    Dynamic,
}
