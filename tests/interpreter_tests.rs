//! End-to-end tests for the block/call interpreter: stack discipline,
//! conditional skipping, recursion and error surfacing.

use scopesim::error::RuntimeError;
use scopesim::interpreter::{
    DynamicScope, Interpreter, ScopeStrategy, StaticScope, StepEvent, StepHook, Value,
};

fn lines(src: &str) -> Vec<String> {
    src.lines().map(str::to_string).collect()
}

fn run<S: ScopeStrategy>(src: &str) -> Result<Interpreter<'static, S>, RuntimeError> {
    let mut interpreter = Interpreter::<S>::new(lines(src));
    interpreter.run()?;
    Ok(interpreter)
}

/// Records every step event as owned data.
#[derive(Default)]
struct Recorder {
    steps: Vec<(usize, Vec<(String, Vec<(String, Value)>)>)>,
}

impl StepHook for Recorder {
    fn on_step(&mut self, event: &StepEvent<'_>) {
        let frames = event
            .frames
            .iter()
            .map(|frame| {
                let bindings = frame
                    .bindings
                    .iter()
                    .map(|(name, value)| (name.to_string(), *value))
                    .collect();
                (frame.def.name.clone(), bindings)
            })
            .collect();
        self.steps.push((event.line, frames));
    }
}

/// The most recently observed value of `name`, across all steps.
fn final_value(recorder: &Recorder, name: &str) -> Option<Value> {
    recorder.steps.iter().rev().find_map(|(_, frames)| {
        frames.iter().find_map(|(_, bindings)| {
            bindings
                .iter()
                .rev()
                .find(|(n, _)| n == name)
                .map(|(_, v)| *v)
        })
    })
}

fn run_with<S: ScopeStrategy>(src: &str, recorder: &mut Recorder) -> Result<(), RuntimeError> {
    Interpreter::<S>::with_hook(lines(src), recorder).run()
}

#[test]
fn run_is_stack_neutral() {
    let src = "\
var a = 1
def f
var b = 2
def inner
end inner
end f
f()
f()
";
    let interpreter = run::<DynamicScope>(src).unwrap();
    // Global bindings are popped when the top-level body finishes; only the
    // global pseudo-function itself stays active.
    assert_eq!(interpreter.bindings().len(), 0);
    assert_eq!(interpreter.active_functions().len(), 1);
}

#[test]
fn calls_clean_up_their_own_bindings() {
    let src = "\
def f
var b = 2
end f
f()
var a = 1
";
    let mut recorder = Recorder::default();
    run_with::<DynamicScope>(src, &mut recorder).unwrap();

    // On the last step (line 4) f's binding is gone again.
    let (line, frames) = recorder.steps.last().unwrap();
    assert_eq!(*line, 4);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].0, "global");
    assert_eq!(frames[0].1, vec![("a".to_string(), Value::Int(1))]);
}

#[test]
fn true_branch_executes() {
    let src = "\
var x = 1
if x == 1
x = 5
endif
";
    let mut recorder = Recorder::default();
    run_with::<DynamicScope>(src, &mut recorder).unwrap();
    assert_eq!(final_value(&recorder, "x"), Some(Value::Int(5)));
}

#[test]
fn false_branch_is_skipped_without_evaluation() {
    // Everything inside the false branch would fail if executed: the inner
    // condition and both statements reference an undefined name.
    let src = "\
var x = 0
if x == 1
if missing
var y = missing
endif
x = missing
endif
var z = 2
";
    let mut recorder = Recorder::default();
    run_with::<DynamicScope>(src, &mut recorder).unwrap();
    assert_eq!(final_value(&recorder, "z"), Some(Value::Int(2)));
    assert_eq!(final_value(&recorder, "y"), None);
    assert_eq!(final_value(&recorder, "x"), Some(Value::Int(0)));
}

#[test]
fn skipped_lines_emit_no_step_events() {
    let src = "\
if 1 > 2
var y = 1
endif
";
    let mut recorder = Recorder::default();
    run_with::<DynamicScope>(src, &mut recorder).unwrap();

    let visited: Vec<usize> = recorder.steps.iter().map(|(line, _)| *line).collect();
    // The `if` is evaluated and the closing `endif` restores visibility;
    // the body line in between is never reported.
    assert_eq!(visited, vec![0, 2]);
}

#[test]
fn recursion_terminates_and_reports_the_call_chain() {
    let src = "\
def f
n = n - 1
if n > 0
f()
endif
end f
var n = 3
f()
";
    let mut recorder = Recorder::default();
    run_with::<DynamicScope>(src, &mut recorder).unwrap();

    assert_eq!(final_value(&recorder, "n"), Some(Value::Int(0)));

    // At maximum depth the dynamic chain is f, f, f, global - innermost
    // first.
    let deepest = recorder
        .steps
        .iter()
        .map(|(_, frames)| frames)
        .max_by_key(|frames| frames.len())
        .unwrap();
    let names: Vec<&str> = deepest.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["f", "f", "f", "global"]);
}

#[test]
fn call_arguments_are_ignored() {
    let src = "\
def f
var x = 1
end f
f(anything ~= goes, even !! garbage)
";
    let mut recorder = Recorder::default();
    run_with::<DynamicScope>(src, &mut recorder).unwrap();
    assert_eq!(final_value(&recorder, "x"), Some(Value::Int(1)));
}

#[test]
fn unrecognized_lines_are_noops() {
    let src = "\
hello world
???
var x = 1
";
    let interpreter = run::<StaticScope>(src).unwrap();
    assert_eq!(interpreter.bindings().len(), 0);
}

#[test]
fn assignment_to_undeclared_name_fails() {
    let err = run::<DynamicScope>("x = 1").unwrap_err();
    if let RuntimeError::Unresolved { line, name } = err {
        assert_eq!(line, 0);
        assert_eq!(name, "x");
    } else {
        panic!("expected a resolution failure, got {:?}", err);
    }
}

#[test]
fn calling_an_unknown_function_fails() {
    let err = run::<DynamicScope>("nothing()").unwrap_err();
    assert!(matches!(err, RuntimeError::Unresolved { name, .. } if name == "nothing"));
}

#[test]
fn unclosed_def_is_fatal() {
    let src = "\
def f
var x = 1
";
    let err = run::<DynamicScope>(src).unwrap_err();
    assert!(matches!(err, RuntimeError::UnclosedDef { .. }));
}

#[test]
fn unclosed_if_is_fatal() {
    let err = run::<DynamicScope>("if 1").unwrap_err();
    assert!(matches!(err, RuntimeError::UnclosedIf { .. }));
}

#[test]
fn malformed_expression_is_fatal() {
    let err = run::<DynamicScope>("var x = (1 + 2").unwrap_err();
    assert!(matches!(err, RuntimeError::Parse { line: 0, .. }));
}

#[test]
fn same_named_nested_definitions_are_counted_not_duplicated() {
    let src = "\
def outer
def inner
end inner
end outer
outer()
";
    let interpreter = run::<DynamicScope>(src).unwrap();
    assert_eq!(interpreter.active_functions().len(), 1);
}

#[test]
fn inner_definitions_are_not_visible_outside_their_body() {
    let src = "\
def outer
def inner
end inner
end outer
outer()
inner()
";
    let err = run::<DynamicScope>(src).unwrap_err();
    assert!(matches!(err, RuntimeError::Unresolved { name, .. } if name == "inner"));
}

#[test]
fn definitions_register_even_inside_a_false_branch() {
    // `def`/`end` are tracked before conditional skipping is considered,
    // so the definition exists once the branch closes.
    let src = "\
if 1 > 2
def f
var x = 1
end f
endif
f()
";
    let mut recorder = Recorder::default();
    run_with::<DynamicScope>(src, &mut recorder).unwrap();
    assert_eq!(final_value(&recorder, "x"), Some(Value::Int(1)));
}

#[test]
fn declarations_use_expressions() {
    let src = "\
var x = 2
var y = x * 3 + 1
y = y - x
";
    let mut recorder = Recorder::default();
    run_with::<StaticScope>(src, &mut recorder).unwrap();
    assert_eq!(final_value(&recorder, "y"), Some(Value::Int(5)));
}
