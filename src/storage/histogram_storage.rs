use rand::{Rng, RngCore};

use crate::core::{ExplainError, FeatureVector};
use crate::storage::Storage;

pub const DEFAULT_HISTOGRAM_BINS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Bin {
    centroid: f64,
    count: u64,
}

/// Streaming histogram of one feature with at most `max_bins` bins.
///
/// Repeated values share a bin, so categorical features with no more
/// categories than bins are counted exactly. Past the limit the two
/// closest bins are merged into their weighted centroid.
#[derive(Debug, Clone, Default)]
struct FeatureHistogram {
    bins: Vec<Bin>,
    total: u64,
}

impl FeatureHistogram {
    fn insert(&mut self, v: f64, max_bins: usize) {
        self.total += 1;
        let pos = self.bins.partition_point(|b| b.centroid < v);
        match self.bins.get_mut(pos) {
            Some(bin) if bin.centroid == v => bin.count += 1,
            _ => {
                self.bins.insert(pos, Bin { centroid: v, count: 1 });
                if self.bins.len() > max_bins {
                    self.merge_closest();
                }
            }
        }
    }

    fn merge_closest(&mut self) {
        let gap = |i: usize| self.bins[i + 1].centroid - self.bins[i].centroid;
        let Some(i) = (0..self.bins.len().saturating_sub(1))
            .min_by(|&a, &b| gap(a).total_cmp(&gap(b)))
        else {
            return;
        };
        let right = self.bins.remove(i + 1);
        let left = &mut self.bins[i];
        let count = left.count + right.count;
        left.centroid = (left.centroid * left.count as f64 + right.centroid * right.count as f64)
            / count as f64;
        left.count = count;
    }

    fn sample(&self, rng: &mut dyn RngCore) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        let mut r = rng.random_range(0..self.total);
        for bin in &self.bins {
            if r < bin.count {
                return Some(bin.centroid);
            }
            r -= bin.count;
        }
        None
    }
}

/// Background store keeping one bounded histogram per feature instead of
/// whole examples.
///
/// Memory does not grow with the stream and every example seen contributes
/// to the counts. Rows are not kept, so features are drawn independently
/// from their own histograms; [`sample`](Storage::sample) synthesizes rows
/// that way. `len` is the number of examples summarized.
#[derive(Debug, Clone)]
pub struct HistogramStorage {
    max_bins: usize,
    store_targets: bool,
    template: Option<FeatureVector>,
    histograms: Vec<FeatureHistogram>,
    target_histogram: FeatureHistogram,
    seen: u64,
}

impl HistogramStorage {
    pub fn new(max_bins: usize, store_targets: bool) -> Result<Self, ExplainError> {
        if max_bins == 0 {
            return Err(ExplainError::invalid("histogram max_bins must be > 0"));
        }
        Ok(Self {
            max_bins,
            store_targets,
            template: None,
            histograms: Vec::new(),
            target_histogram: FeatureHistogram::default(),
            seen: 0,
        })
    }

    pub fn max_bins(&self) -> usize {
        self.max_bins
    }

    /// `(centroid, count)` pairs of feature `index`, by increasing centroid.
    pub fn bins(&self, index: usize) -> Vec<(f64, u64)> {
        self.histograms
            .get(index)
            .map(|h| h.bins.iter().map(|b| (b.centroid, b.count)).collect())
            .unwrap_or_default()
    }
}

impl Storage for HistogramStorage {
    fn update(&mut self, x: FeatureVector, y: Option<f64>, _rng: &mut dyn RngCore) {
        self.seen += 1;
        if self.histograms.len() < x.values().len() {
            self.histograms
                .resize_with(x.values().len(), FeatureHistogram::default);
        }
        for (hist, &v) in self.histograms.iter_mut().zip(x.values()) {
            if v.is_finite() {
                hist.insert(v, self.max_bins);
            }
        }
        if self.store_targets {
            if let Some(y) = y.filter(|y| y.is_finite()) {
                self.target_histogram.insert(y, self.max_bins);
            }
        }
        if self.template.is_none() {
            self.template = Some(x);
        }
    }

    fn len(&self) -> usize {
        self.seen as usize
    }

    fn seen(&self) -> u64 {
        self.seen
    }

    fn features(&self) -> &[FeatureVector] {
        &[]
    }

    fn targets(&self) -> &[f64] {
        &[]
    }

    fn stores_targets(&self) -> bool {
        self.store_targets
    }

    /// Synthesizes `min(k, len)` rows, each feature drawn from its own
    /// histogram.
    fn sample(&self, k: usize, rng: &mut dyn RngCore) -> (Vec<FeatureVector>, Vec<f64>) {
        let Some(template) = &self.template else {
            return (Vec::new(), Vec::new());
        };
        let n = k.min(self.len());
        let mut xs = Vec::with_capacity(n);
        let mut ys = Vec::with_capacity(if self.store_targets { n } else { 0 });
        for _ in 0..n {
            let mut row = template.clone();
            for (slot, hist) in row.values_mut().iter_mut().zip(&self.histograms) {
                *slot = hist.sample(rng).unwrap_or(f64::NAN);
            }
            xs.push(row);
            if self.store_targets {
                ys.push(self.target_histogram.sample(rng).unwrap_or(f64::NAN));
            }
        }
        (xs, ys)
    }

    fn sample_marginal(&self, index: usize, rng: &mut dyn RngCore) -> Result<f64, ExplainError> {
        let hist = self
            .histograms
            .get(index)
            .ok_or_else(|| ExplainError::invalid(format!("feature index {index} out of bounds")))?;
        hist.sample(rng).ok_or(ExplainError::EmptyStorage)
    }
}
