use std::collections::BTreeMap;

/// Counters and histograms for the sync loop.
///
/// Sorted maps keep snapshots in stable order for logs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Metrics {
    counters: BTreeMap<&'static str, u64>,
    histograms: BTreeMap<&'static str, Histogram>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Histogram {
    pub count: u64,
    pub sum: i64,
    pub min: i64,
    pub max: i64,
}

impl Histogram {
    pub fn record(&mut self, value: i64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        self.sum += value;
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum as f64 / self.count as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub counters: Vec<(&'static str, u64)>,
    pub histograms: Vec<(&'static str, Histogram)>,
}

impl std::fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (name, value) in &self.counters {
            if !first {
                write!(f, " ")?;
            }
            first = false;
            write!(f, "{name}={value}")?;
        }
        for (name, h) in &self.histograms {
            if !first {
                write!(f, " ")?;
            }
            first = false;
            write!(f, "{name}[n={} min={} max={}]", h.count, h.min, h.max)?;
        }
        Ok(())
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn inc(&mut self, name: &'static str) {
        self.inc_counter(name, 1);
    }

    pub fn inc_counter(&mut self, name: &'static str, by: u64) {
        *self.counters.entry(name).or_insert(0) += by;
    }

    pub fn record_histogram(&mut self, name: &'static str, value: i64) {
        self.histograms.entry(name).or_default().record(value);
    }

    pub fn histogram(&self, name: &str) -> Option<Histogram> {
        self.histograms.get(name).copied()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            counters: self.counters.iter().map(|(k, v)| (*k, *v)).collect(),
            histograms: self.histograms.iter().map(|(k, v)| (*k, *v)).collect(),
        }
    }
}
