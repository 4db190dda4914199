//! Collection across the heap, the dependency graph and the proxy maps.
//!
//! Proxy maps behave like weak maps: an entry never keeps its target alive,
//! but a live target keeps its canonical proxies alive. Values captured only
//! by effect closures are not roots.

use crate::runtime::Runtime;
use rx_core::Value;

impl Runtime {
    /// Free everything unreachable from `roots` and return the number of
    /// objects freed.
    pub fn collect_garbage(&mut self, roots: &[Value]) -> usize {
        self.heap.start_marking();
        self.heap.mark_from(roots);
        loop {
            let heap = &self.heap;
            let pending: Vec<Value> = self
                .proxies
                .entries()
                .filter(|(target, proxy)| {
                    heap.is_marked(*target)
                        && proxy.object_id().is_some_and(|id| !heap.is_marked(id))
                })
                .map(|(_, proxy)| proxy)
                .collect();
            if pending.is_empty() {
                break;
            }
            self.heap.mark_from(&pending);
        }
        let freed = self.heap.sweep();

        let heap = &self.heap;
        self.proxies.retain(|target, proxy| {
            heap.contains(target) && proxy.object_id().is_some_and(|id| heap.contains(id))
        });
        self.prune_dependencies();
        tracing::debug!(
            target: "rx_reactivity",
            freed,
            live = self.heap.live_count(),
            "collected garbage"
        );
        freed
    }

    /// Collect only once enough allocations happened since the last cycle.
    pub fn maybe_collect(&mut self, roots: &[Value]) -> Option<usize> {
        if self.heap.should_collect() {
            Some(self.collect_garbage(roots))
        } else {
            None
        }
    }
}
