#![allow(dead_code)]

use rx_reactivity::{DebuggerEvent, EffectOptions, Result, Runtime, Value};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn runtime() -> Runtime {
    init_tracing();
    Runtime::new()
}

/// Numeric view of a value; ints and floats compare alike.
pub fn num(v: Value) -> f64 {
    v.as_number().expect("expected a number")
}

pub fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().map(|v| Value::from_i64(*v)).collect()
}

/// Run counter shared between a test and its effects.
#[derive(Clone, Default)]
pub struct Counter(Rc<Cell<usize>>);

impl Counter {
    pub fn hit(&self) {
        self.0.set(self.0.get() + 1);
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }
}

pub type EventLog = Rc<RefCell<Vec<DebuggerEvent>>>;

/// Register an effect that counts its runs and records trigger events.
pub fn watch<F>(rt: &mut Runtime, f: F) -> (Counter, EventLog)
where
    F: Fn(&mut Runtime) -> Result<()> + 'static,
{
    let runs = Counter::default();
    let log = EventLog::default();
    let counter = runs.clone();
    let events = log.clone();
    let options = EffectOptions {
        on_trigger: Some(Rc::new(move |e: &DebuggerEvent| {
            events.borrow_mut().push(e.clone())
        })),
        ..Default::default()
    };
    rt.effect_with(
        move |rt| {
            counter.hit();
            f(rt)
        },
        options,
    )
    .expect("effect should run");
    (runs, log)
}
