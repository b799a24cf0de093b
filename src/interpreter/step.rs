//! Step notifications from the interpreter to an external visualizer.

use super::scope::FunctionDef;
use super::value::Value;

/// One frame of the dynamic call chain at the moment a line executed.
#[derive(Debug)]
pub struct Frame<'a> {
    pub def: &'a FunctionDef,
    /// Live bindings owned by this frame's definition, oldest first.
    pub bindings: Vec<(&'a str, Value)>,
}

/// Snapshot emitted after each executed (non-skipped) line.
#[derive(Debug)]
pub struct StepEvent<'a> {
    /// 0-based index of the line just executed.
    pub line: usize,
    /// The dynamic call chain, innermost frame first; the last entry is
    /// always the global pseudo-function.
    pub frames: Vec<Frame<'a>>,
}

/// Consumer of step events. The hook owns all presentation concerns; it may
/// terminate the process between steps, which the interpreter does not need
/// to survive.
pub trait StepHook {
    fn on_step(&mut self, event: &StepEvent<'_>);
}
