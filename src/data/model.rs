// ---------------------------------------------------------------------------
// Sample – one parsed line of the portrait file
// ---------------------------------------------------------------------------

/// A single `(z, v)` point taken from one non-comment line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Position along the axis (x in the plot).
    pub z: f64,
    /// Velocity (y in the plot).
    pub v: f64,
}

impl Sample {
    pub fn new(z: f64, v: f64) -> Self {
        Self { z, v }
    }
}

// ---------------------------------------------------------------------------
// Extent – data bounds used for auto-scaling
// ---------------------------------------------------------------------------

/// Min/max of both axes over the finite samples of a set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub z: [f64; 2],
    pub v: [f64; 2],
}

// ---------------------------------------------------------------------------
// SampleSet – the complete loaded file
// ---------------------------------------------------------------------------

/// All samples of one file, in file order. Never mutated after construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSet {
    samples: Vec<Sample>,
}

impl SampleSet {
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The `z` sequence, in file order.
    pub fn z(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.z).collect()
    }

    /// The `v` sequence, in file order.
    pub fn v(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.v).collect()
    }

    /// Samples as `[z, v]` pairs, ready for the plot.
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.samples.iter().map(|s| [s.z, s.v]).collect()
    }

    /// Bounds over samples whose coordinates are both finite.
    /// `None` if no such sample exists.
    pub fn extent(&self) -> Option<Extent> {
        let mut finite = self
            .samples
            .iter()
            .filter(|s| s.z.is_finite() && s.v.is_finite());
        let first = finite.next()?;
        let init = Extent {
            z: [first.z, first.z],
            v: [first.v, first.v],
        };
        Some(finite.fold(init, |acc, s| Extent {
            z: [acc.z[0].min(s.z), acc.z[1].max(s.z)],
            v: [acc.v[0].min(s.v), acc.v[1].max(s.v)],
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallel_sequences_keep_order() {
        let set = SampleSet::from_samples(vec![
            Sample::new(0.0, 1.0),
            Sample::new(0.5, 0.9),
            Sample::new(1.0, 0.0),
        ]);
        assert_eq!(set.z(), vec![0.0, 0.5, 1.0]);
        assert_eq!(set.v(), vec![1.0, 0.9, 0.0]);
        assert_eq!(set.points()[1], [0.5, 0.9]);
    }

    #[test]
    fn extent_skips_non_finite() {
        let set = SampleSet::from_samples(vec![
            Sample::new(f64::NAN, 3.0),
            Sample::new(-1.0, 2.0),
            Sample::new(4.0, f64::INFINITY),
            Sample::new(2.0, -5.0),
        ]);
        let ext = set.extent().unwrap();
        assert_eq!(ext.z, [-1.0, 2.0]);
        assert_eq!(ext.v, [-5.0, 2.0]);
    }

    #[test]
    fn empty_set_has_no_extent() {
        assert!(SampleSet::default().extent().is_none());
        assert!(SampleSet::default().is_empty());
    }
}
