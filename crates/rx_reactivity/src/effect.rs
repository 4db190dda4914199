//! Dependency graph: effects, read tracking and write triggering.
//!
//! Dependencies are stored per target identity and property key. An effect
//! re-runs synchronously when one of the keys it read is written, unless it
//! provides a scheduler.

use crate::operations::{TrackOp, TriggerOp};
use crate::runtime::Runtime;
use ahash::RandomState;
use indexmap::IndexSet;
use rx_core::{FastHashMap, ITERATE_KEY, ManagedObject, ObjectId, PropKey, Result, Value, fast_hasher};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Handle to a registered effect. Stopping an effect retires its id; a
/// reused slot comes back under a new generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectId {
    index: usize,
    generation: u32,
}

/// Effects depending on one (target, key) pair, in subscription order.
pub type Dep = IndexSet<EffectId, RandomState>;
pub(crate) type KeyToDepMap = FastHashMap<PropKey, Dep>;
pub(crate) type TargetMap = FastHashMap<ObjectId, KeyToDepMap>;

pub type EffectFn = Rc<dyn Fn(&mut Runtime) -> Result<()>>;
pub type SchedulerFn = Rc<dyn Fn(&mut Runtime, EffectId) -> Result<()>>;
pub type DebuggerHook = Rc<dyn Fn(&DebuggerEvent)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugOp {
    Track(TrackOp),
    Trigger(TriggerOp),
}

#[derive(Debug, Clone)]
pub struct DebuggerEvent {
    pub effect: EffectId,
    pub target: ObjectId,
    pub op: DebugOp,
    pub key: Option<PropKey>,
    pub new_value: Option<Value>,
    pub old_value: Option<Value>,
}

#[derive(Clone, Default)]
pub struct EffectOptions {
    /// Register without running.
    pub lazy: bool,
    /// Let the effect re-trigger itself while running.
    pub allow_recurse: bool,
    /// Called instead of re-running the effect.
    pub scheduler: Option<SchedulerFn>,
    pub on_track: Option<DebuggerHook>,
    pub on_trigger: Option<DebuggerHook>,
}

pub(crate) struct EffectSlot {
    func: EffectFn,
    deps: Vec<(ObjectId, PropKey)>,
    options: EffectOptions,
}

struct SlotEntry {
    generation: u32,
    slot: Option<EffectSlot>,
}

/// Registered effects. Stopped effects release their closure and their
/// slot goes on a free list.
#[derive(Default)]
pub(crate) struct EffectSlots {
    entries: Vec<SlotEntry>,
    free: Vec<usize>,
}

impl EffectSlots {
    fn insert(&mut self, slot: EffectSlot) -> EffectId {
        if let Some(index) = self.free.pop() {
            let entry = &mut self.entries[index];
            entry.slot = Some(slot);
            return EffectId {
                index,
                generation: entry.generation,
            };
        }
        self.entries.push(SlotEntry {
            generation: 0,
            slot: Some(slot),
        });
        EffectId {
            index: self.entries.len() - 1,
            generation: 0,
        }
    }

    fn get(&self, id: EffectId) -> Option<&EffectSlot> {
        self.entries
            .get(id.index)
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.slot.as_ref())
    }

    fn get_mut(&mut self, id: EffectId) -> Option<&mut EffectSlot> {
        self.entries
            .get_mut(id.index)
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.slot.as_mut())
    }

    fn remove(&mut self, id: EffectId) -> Option<EffectSlot> {
        let entry = self
            .entries
            .get_mut(id.index)
            .filter(|entry| entry.generation == id.generation)?;
        let slot = entry.slot.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(slot)
    }

    fn len(&self) -> usize {
        self.entries.len() - self.free.len()
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut EffectSlot> {
        self.entries.iter_mut().filter_map(|entry| entry.slot.as_mut())
    }
}

/// Effects currently running, innermost last.
#[derive(Clone, Default)]
pub(crate) struct EffectStack(Rc<RefCell<Vec<EffectId>>>);

impl EffectStack {
    fn contains(&self, id: EffectId) -> bool {
        self.0.borrow().contains(&id)
    }

    fn current(&self) -> Option<EffectId> {
        self.0.borrow().last().copied()
    }

    fn enter(&self, id: EffectId, tracking: &TrackingState) -> RunningEffect {
        self.0.borrow_mut().push(id);
        tracking.enable();
        RunningEffect {
            stack: self.clone(),
            tracking: tracking.clone(),
        }
    }
}

/// Leaves the running effect on drop, including during unwinding.
struct RunningEffect {
    stack: EffectStack,
    tracking: TrackingState,
}

impl Drop for RunningEffect {
    fn drop(&mut self) {
        self.stack.0.borrow_mut().pop();
        self.tracking.reset();
    }
}

struct TrackingInner {
    enabled: Cell<bool>,
    saved: RefCell<Vec<bool>>,
}

/// Process-wide "should reads be tracked" flag with a save/restore stack.
///
/// Every `pause`/`enable` pushes the previous mode; `reset` pops it, so
/// nested suspensions restore whatever was active before them.
#[derive(Clone)]
pub struct TrackingState(Rc<TrackingInner>);

impl Default for TrackingState {
    fn default() -> Self {
        TrackingState(Rc::new(TrackingInner {
            enabled: Cell::new(true),
            saved: RefCell::new(Vec::new()),
        }))
    }
}

impl TrackingState {
    pub fn is_enabled(&self) -> bool {
        self.0.enabled.get()
    }

    /// Number of saved modes waiting to be restored.
    pub fn depth(&self) -> usize {
        self.0.saved.borrow().len()
    }

    pub fn pause(&self) {
        self.0.saved.borrow_mut().push(self.0.enabled.get());
        self.0.enabled.set(false);
    }

    pub fn enable(&self) {
        self.0.saved.borrow_mut().push(self.0.enabled.get());
        self.0.enabled.set(true);
    }

    pub fn reset(&self) {
        let last = self.0.saved.borrow_mut().pop();
        self.0.enabled.set(last.unwrap_or(true));
    }

    /// Suspend tracking until the returned guard is dropped.
    pub fn paused(&self) -> PauseGuard {
        self.pause();
        PauseGuard {
            state: self.clone(),
        }
    }
}

/// Restores the previous tracking mode on drop, including during unwinding.
#[must_use = "tracking resumes as soon as the guard is dropped"]
pub struct PauseGuard {
    state: TrackingState,
}

impl Drop for PauseGuard {
    fn drop(&mut self) {
        self.state.reset();
    }
}

impl Runtime {
    /// Register `f` as an effect and run it once.
    pub fn effect<F>(&mut self, f: F) -> Result<EffectId>
    where
        F: Fn(&mut Runtime) -> Result<()> + 'static,
    {
        self.effect_with(f, EffectOptions::default())
    }

    pub fn effect_with<F>(&mut self, f: F, options: EffectOptions) -> Result<EffectId>
    where
        F: Fn(&mut Runtime) -> Result<()> + 'static,
    {
        let lazy = options.lazy;
        let id = self.effects.insert(EffectSlot {
            func: Rc::new(f),
            deps: Vec::new(),
            options,
        });
        if !lazy {
            self.run_effect(id)?;
        }
        Ok(id)
    }

    /// Run an effect, re-collecting its dependencies. Running a stopped
    /// effect does nothing.
    pub fn run_effect(&mut self, id: EffectId) -> Result<()> {
        let Some(slot) = self.effects.get(id) else {
            return Ok(());
        };
        if self.effect_stack.contains(id) {
            return Ok(());
        }
        let func = slot.func.clone();
        self.cleanup_effect(id);
        tracing::trace!(target: "rx_reactivity", effect = id.index, "run effect");
        let _running = self.effect_stack.enter(id, &self.tracking);
        func(self)
    }

    /// Detach an effect from everything it depends on and release it. It
    /// will never run again.
    pub fn stop(&mut self, id: EffectId) {
        if self.effects.get(id).is_some() {
            self.cleanup_effect(id);
            self.effects.remove(id);
        }
    }

    pub fn is_effect_active(&self, id: EffectId) -> bool {
        self.effects.get(id).is_some()
    }

    /// Number of effects registered and not yet stopped.
    pub fn effect_count(&self) -> usize {
        self.effects.len()
    }

    pub fn active_effect(&self) -> Option<EffectId> {
        self.effect_stack.current()
    }

    /// Effects currently subscribed to `key` on the raw form of `target`.
    pub fn dependents_of(&self, target: Value, key: impl Into<PropKey>) -> Vec<EffectId> {
        let Some(id) = self.to_raw(target).object_id() else {
            return Vec::new();
        };
        let key = key.into();
        self.deps
            .get(&id)
            .and_then(|deps| deps.get(&key))
            .map(|dep| dep.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn tracking(&self) -> &TrackingState {
        &self.tracking
    }

    pub fn pause_tracking(&self) {
        self.tracking.pause();
    }

    pub fn enable_tracking(&self) {
        self.tracking.enable();
    }

    pub fn reset_tracking(&self) {
        self.tracking.reset();
    }

    /// Run `f` with read tracking suspended.
    pub fn untracked<R>(&mut self, f: impl FnOnce(&mut Runtime) -> R) -> R {
        let _paused = self.tracking.paused();
        f(self)
    }

    /// Record that the running effect read `key` on `target`.
    pub fn track(&mut self, target: ObjectId, op: TrackOp, key: &PropKey) {
        if !self.tracking.is_enabled() {
            return;
        }
        let Some(effect) = self.active_effect() else {
            return;
        };
        if self.effects.get(effect).is_none() {
            return;
        }
        let dep = self
            .deps
            .entry(target)
            .or_insert_with(|| FastHashMap::with_hasher(fast_hasher()))
            .entry(key.clone())
            .or_insert_with(|| IndexSet::with_hasher(fast_hasher()));
        if !dep.insert(effect) {
            return;
        }
        let Some(slot) = self.effects.get_mut(effect) else {
            return;
        };
        slot.deps.push((target, key.clone()));
        if let Some(on_track) = &slot.options.on_track {
            on_track(&DebuggerEvent {
                effect,
                target,
                op: DebugOp::Track(op),
                key: Some(key.clone()),
                new_value: None,
                old_value: None,
            });
        }
    }

    /// Notify everything that depends on `key` of `target`.
    pub fn trigger(
        &mut self,
        target: ObjectId,
        op: TriggerOp,
        key: Option<&PropKey>,
        new_value: Option<Value>,
        old_value: Option<Value>,
    ) -> Result<()> {
        let queued = self.collect_dependents(target, op, key, new_value);
        if queued.is_empty() {
            return Ok(());
        }
        let key_name = key.map(ToString::to_string).unwrap_or_default();
        tracing::trace!(
            target: "rx_reactivity",
            ?op,
            key = %key_name,
            effects = queued.len(),
            "trigger"
        );
        for effect in queued {
            let Some(slot) = self.effects.get(effect) else {
                continue;
            };
            if self.active_effect() == Some(effect) && !slot.options.allow_recurse {
                continue;
            }
            if let Some(on_trigger) = &slot.options.on_trigger {
                on_trigger(&DebuggerEvent {
                    effect,
                    target,
                    op: DebugOp::Trigger(op),
                    key: key.cloned(),
                    new_value,
                    old_value,
                });
            }
            let scheduler = slot.options.scheduler.clone();
            match scheduler {
                Some(scheduler) => scheduler(self, effect)?,
                None => self.run_effect(effect)?,
            }
        }
        Ok(())
    }

    fn collect_dependents(
        &self,
        target: ObjectId,
        op: TriggerOp,
        key: Option<&PropKey>,
        new_value: Option<Value>,
    ) -> Dep {
        let mut queued: Dep = IndexSet::with_hasher(fast_hasher());
        let Some(deps) = self.deps.get(&target) else {
            return queued;
        };
        let is_list = matches!(self.heap.get(target), Ok(ManagedObject::List(_)));
        let mut add = |dep: Option<&Dep>| {
            if let Some(dep) = dep {
                queued.extend(dep.iter().copied());
            }
        };

        if is_list && key.is_some_and(PropKey::is_length) {
            let new_len = new_value
                .and_then(|v| v.as_number())
                .map_or(0, |n| n.max(0.0) as u64);
            for (k, dep) in deps {
                let truncated = k.as_index().is_some_and(|i| i as u64 >= new_len);
                if k.is_length() || truncated {
                    add(Some(dep));
                }
            }
            return queued;
        }

        if let Some(key) = key {
            add(deps.get(key));
        }
        match op {
            TriggerOp::Add => {
                if !is_list {
                    add(deps.get(&ITERATE_KEY));
                } else if key.is_some_and(PropKey::is_index) {
                    add(deps.get(&PropKey::length()));
                }
            }
            TriggerOp::Delete => {
                if !is_list {
                    add(deps.get(&ITERATE_KEY));
                }
            }
            TriggerOp::Set => {}
        }
        queued
    }

    fn cleanup_effect(&mut self, id: EffectId) {
        let Some(slot) = self.effects.get_mut(id) else {
            return;
        };
        let deps = std::mem::take(&mut slot.deps);
        for (target, key) in deps {
            if let Some(key_map) = self.deps.get_mut(&target) {
                if let Some(dep) = key_map.get_mut(&key) {
                    dep.shift_remove(&id);
                    if dep.is_empty() {
                        key_map.remove(&key);
                    }
                }
                if key_map.is_empty() {
                    self.deps.remove(&target);
                }
            }
        }
    }

    /// Drop dependency records for targets that no longer exist.
    pub(crate) fn prune_dependencies(&mut self) {
        let heap = &self.heap;
        self.deps.retain(|target, _| heap.contains(*target));
        for slot in self.effects.iter_mut() {
            slot.deps.retain(|(target, _)| heap.contains(*target));
        }
    }
}
