/// The four SEA concepts; each labels `attrib1 + attrib2` against its own
/// threshold, `attrib3` is irrelevant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeaFunction {
    F1 = 1,
    F2 = 2,
    F3 = 3,
    F4 = 4,
}

impl SeaFunction {
    pub fn threshold(self) -> f64 {
        match self {
            SeaFunction::F1 => 8.0,
            SeaFunction::F2 => 9.0,
            SeaFunction::F3 => 7.0,
            SeaFunction::F4 => 9.5,
        }
    }

    /// Noise-free label of a point under this concept.
    #[inline]
    pub fn label(self, a1: f64, a2: f64) -> f64 {
        label_with_threshold(self.threshold(), a1, a2)
    }
}

#[inline]
pub(crate) fn label_with_threshold(threshold: f64, a1: f64, a2: f64) -> f64 {
    if a1 + a2 <= threshold { 0.0 } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_follows_threshold() {
        assert_eq!(SeaFunction::F1.label(4.0, 4.0), 0.0);
        assert_eq!(SeaFunction::F1.label(4.0, 4.1), 1.0);
        assert_eq!(SeaFunction::F4.label(5.0, 4.5), 0.0);
        assert_eq!(SeaFunction::F3.label(5.0, 2.5), 1.0);
    }
}
