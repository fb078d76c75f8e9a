use std::collections::HashMap;

/// Simple counter/gauge registry, owned by whoever runs the scheduler rather
/// than a process-wide global — the scheduler itself is synchronous and
/// single-threaded, so there is no shared state to guard.
#[derive(Clone, Default)]
pub struct MetricsRegistry {
    counters: HashMap<String, u64>,
    gauges: HashMap<String, f64>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_counter(&mut self, name: &str) {
        *self.counters.entry(name.to_string()).or_insert(0) += 1;
    }

    pub fn set_gauge(&mut self, name: &str, val: f64) {
        self.gauges.insert(name.to_string(), val);
    }

    pub fn snapshot(&self) -> (&HashMap<String, u64>, &HashMap<String, f64>) {
        (&self.counters, &self.gauges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_and_gauges_accumulate() {
        let mut m = MetricsRegistry::new();
        m.inc_counter("scheduled");
        m.inc_counter("scheduled");
        m.set_gauge("avail_txn_cnt", 12.0);
        let (counters, gauges) = m.snapshot();
        assert_eq!(counters["scheduled"], 2);
        assert_eq!(gauges["avail_txn_cnt"], 12.0);
    }
}
