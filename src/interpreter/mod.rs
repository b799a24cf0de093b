//! The block/call interpreter.
//!
//! A run walks the top-level body (the whole file, wrapped in a `global`
//! pseudo-function) one line at a time. Each invocation keeps its own walk
//! state: a nesting counter for same-named inner definitions, and a pair of
//! depth counters for conditional-block skipping. Calls re-enter
//! [`Interpreter::interpret`] recursively.
//!
//! Two stacks are shared across the whole call chain: the active definition
//! stack and the live variable stack. Every invocation is stack-neutral -
//! it truncates both stacks back to their entry-time lengths before
//! returning - so callers can rely on stack position to delimit their own
//! live bindings.

mod eval;
mod scope;
mod step;
mod value;

pub use eval::evaluate;
pub use scope::{
    ActiveFunction, Binding, Definitions, DynamicScope, FuncId, FunctionDef, ScopeMode,
    ScopeStrategy, Scoped, StaticScope,
};
pub use step::{Frame, StepEvent, StepHook};
pub use value::Value;

use std::marker::PhantomData;

use log::debug;

use crate::error::{EvalError, ParseError, RuntimeError};

/// Per-invocation walk state.
struct BlockState {
    /// Depth of `def`/`end` nesting below the current body. Statements are
    /// only meaningful at depth 0; deeper lines belong to a definition
    /// being registered, not executed. May go negative on a stray `end`,
    /// which (as in the original language) makes the rest of the body
    /// inert.
    nesting: i32,
    /// Open `if` blocks whose condition was true.
    true_depth: i32,
    /// Open `if` blocks currently being skipped. While positive, nested
    /// conditions are counted but never evaluated.
    false_depth: i32,
}

/// Line-oriented interpreter over a fixed source, generic over the
/// resolution strategy so that no mode check happens per lookup.
pub struct Interpreter<'h, S: ScopeStrategy> {
    lines: Vec<String>,
    defs: Definitions,
    func_stack: Vec<FuncId>,
    var_stack: Vec<Binding>,
    /// Activation frames of the dynamic call chain, outermost first.
    call_stack: Vec<FuncId>,
    hook: Option<&'h mut dyn StepHook>,
    _strategy: PhantomData<S>,
}

impl<S: ScopeStrategy> std::fmt::Debug for Interpreter<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter").finish_non_exhaustive()
    }
}

impl<'h, S: ScopeStrategy> Interpreter<'h, S> {
    pub fn new(lines: Vec<String>) -> Self {
        Self {
            lines,
            defs: Definitions::new(),
            func_stack: Vec::new(),
            var_stack: Vec::new(),
            call_stack: Vec::new(),
            hook: None,
            _strategy: PhantomData,
        }
    }

    pub fn with_hook(lines: Vec<String>, hook: &'h mut dyn StepHook) -> Self {
        let mut interpreter = Self::new(lines);
        interpreter.hook = Some(hook);
        interpreter
    }

    /// Live variable bindings, oldest first.
    pub fn bindings(&self) -> &[Binding] {
        &self.var_stack
    }

    /// Active definitions, oldest first.
    pub fn active_functions(&self) -> &[FuncId] {
        &self.func_stack
    }

    pub fn definitions(&self) -> &Definitions {
        &self.defs
    }

    /// Interpret the whole source as the body of a `global`
    /// pseudo-function.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        let global = self.defs.register("global", 0, None);
        self.defs.close_latest(self.lines.len());
        self.func_stack.push(global);
        self.call_stack.push(global);
        let result = self.interpret(global);
        self.call_stack.pop();
        result
    }

    /// Walk one function body end-to-end.
    fn interpret(&mut self, func: FuncId) -> Result<(), RuntimeError> {
        let def = self.defs.get(func);
        let name = def.name.clone();
        let start = def.start;
        let end = def.end.ok_or_else(|| RuntimeError::UnclosedDef {
            function: name.clone(),
        })?;

        let vars_at_entry = self.var_stack.len();
        let funcs_at_entry = self.func_stack.len();
        let mut state = BlockState {
            nesting: 0,
            true_depth: 0,
            false_depth: 0,
        };

        for line_no in start..end {
            let executed = self.execute_line(line_no, func, &mut state)?;
            if executed {
                self.emit_step(line_no);
            }
        }

        if state.nesting > 0 {
            return Err(RuntimeError::UnclosedDef { function: name });
        }
        if state.true_depth > 0 || state.false_depth > 0 {
            return Err(RuntimeError::UnclosedIf { function: name });
        }

        self.var_stack.truncate(vars_at_entry);
        self.func_stack.truncate(funcs_at_entry);
        Ok(())
    }

    /// Classify and execute a single line. Returns whether the line was
    /// actually acted on (skipped lines produce no step event).
    fn execute_line(
        &mut self,
        line_no: usize,
        func: FuncId,
        state: &mut BlockState,
    ) -> Result<bool, RuntimeError> {
        let line = self.lines[line_no].trim().to_string();

        if let Some(rest) = line.strip_prefix("def ") {
            state.nesting += 1;
            // Only the outermost occurrence registers; deeper ones are
            // placeholders counted so their `end` is attributed correctly.
            if state.nesting == 1 {
                let name = rest.trim();
                let id = self.defs.register(name, line_no + 1, Some(func));
                self.func_stack.push(id);
                debug!("line {}: registered `{}`", line_no, name);
                return Ok(true);
            }
            return Ok(false);
        }

        if line.strip_prefix("end ").is_some() {
            state.nesting -= 1;
            if state.nesting == 0 {
                self.defs.close_latest(line_no);
                return Ok(true);
            }
            return Ok(false);
        }

        if state.nesting != 0 {
            return Ok(false);
        }

        if let Some(condition) = line.strip_prefix("if ") {
            if state.false_depth > 0 {
                // Inside a skipped branch the condition must not be
                // evaluated; it is only counted.
                state.false_depth += 1;
                return Ok(false);
            }
            let value = self.eval_expr(condition, func, line_no)?;
            debug!("line {}: condition `{}` -> {}", line_no, condition, value);
            if value.truthy() {
                state.true_depth += 1;
            } else {
                state.false_depth += 1;
            }
            return Ok(true);
        }

        if line == "endif" {
            if state.false_depth > 0 {
                state.false_depth -= 1;
                return Ok(state.false_depth == 0);
            }
            state.true_depth -= 1;
            return Ok(true);
        }

        if state.false_depth > 0 {
            return Ok(false);
        }

        if let Some(rest) = line.strip_prefix("var ") {
            let (name, expr) = split_assignment(rest).ok_or_else(|| {
                RuntimeError::parse(line_no, ParseError::new("malformed `var` statement"))
            })?;
            let value = self.eval_expr(expr, func, line_no)?;
            debug!("line {}: var {} = {}", line_no, name, value);
            self.var_stack.push(Binding {
                name: name.to_string(),
                value,
                owner: func,
            });
            return Ok(true);
        }

        if is_call(&line) {
            let open = line.find('(').expect("call shape contains `(`");
            let name = line[..open].trim();
            let callee = {
                let view: Vec<ActiveFunction> = self
                    .func_stack
                    .iter()
                    .map(|&id| ActiveFunction {
                        id,
                        def: self.defs.get(id),
                    })
                    .collect();
                let index = S::resolve(&view, name, func, &self.defs)
                    .ok_or_else(|| RuntimeError::unresolved(line_no, name))?;
                view[index].id
            };
            debug!("line {}: calling `{}`", line_no, name);
            self.call_stack.push(callee);
            let result = self.interpret(callee);
            self.call_stack.pop();
            result?;
            return Ok(true);
        }

        if let Some((name, expr)) = split_assignment(&line) {
            let value = self.eval_expr(expr, func, line_no)?;
            let index = S::resolve(&self.var_stack, name, func, &self.defs)
                .ok_or_else(|| RuntimeError::unresolved(line_no, name))?;
            debug!("line {}: {} = {}", line_no, name, value);
            self.var_stack[index].value = value;
            return Ok(true);
        }

        // Anything else is inert but still advances (and shows) the line.
        Ok(true)
    }

    fn eval_expr(&self, text: &str, ctx: FuncId, line_no: usize) -> Result<Value, RuntimeError> {
        let mut resolver = |name: &str| {
            S::resolve(&self.var_stack, name, ctx, &self.defs).map(|i| self.var_stack[i].value)
        };
        evaluate(text, &mut resolver).map_err(|err| match err {
            EvalError::Parse(error) => RuntimeError::parse(line_no, error),
            EvalError::Unresolved(name) => RuntimeError::unresolved(line_no, name),
        })
    }

    fn emit_step(&mut self, line: usize) {
        let Some(hook) = self.hook.as_mut() else {
            return;
        };
        let frames: Vec<Frame> = self
            .call_stack
            .iter()
            .rev()
            .map(|&id| Frame {
                def: self.defs.get(id),
                bindings: self
                    .var_stack
                    .iter()
                    .filter(|binding| binding.owner == id)
                    .map(|binding| (binding.name.as_str(), binding.value))
                    .collect(),
            })
            .collect();
        hook.on_step(&StepEvent { line, frames });
    }
}

/// Split `<name> = <rest>` at the first `=`. Returns `None` when there is
/// no `=` at all.
fn split_assignment(line: &str) -> Option<(&str, &str)> {
    let index = line.find('=')?;
    Some((line[..index].trim(), &line[index + 1..]))
}

/// Call shape: ends with `)` and any `=` appears only inside the
/// parentheses (argument text is ignored entirely - the language has no
/// parameter passing).
fn is_call(line: &str) -> bool {
    if !line.ends_with(')') {
        return false;
    }
    match (line.find('('), line.find('=')) {
        (Some(open), Some(eq)) => open < eq,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Interpret `lines` under `mode`, reporting each step to `hook`. The mode
/// is resolved to a strategy exactly once, here.
pub fn run_program(
    lines: Vec<String>,
    mode: ScopeMode,
    hook: &mut dyn StepHook,
) -> Result<(), RuntimeError> {
    match mode {
        ScopeMode::Static => Interpreter::<StaticScope>::with_hook(lines, hook).run(),
        ScopeMode::Dynamic => Interpreter::<DynamicScope>::with_hook(lines, hook).run(),
    }
}
