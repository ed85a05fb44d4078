use crate::preview::SageSnapshot;
use std::fmt::Write;

pub enum CurveFormat {
    Csv,
    Tsv,
    Json,
}

/// Time series of SAGE snapshots taken during a run.
#[derive(Debug, Clone, Default)]
pub struct ExplanationCurve {
    entries: Vec<SageSnapshot>,
}

impl ExplanationCurve {
    pub fn push(&mut self, snapshot: SageSnapshot) {
        self.entries.push(snapshot)
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn latest(&self) -> Option<SageSnapshot> {
        self.entries.last().cloned()
    }
    pub fn iter(&self) -> impl Iterator<Item = &SageSnapshot> {
        self.entries.iter()
    }

    /// Renders the curve; feature columns follow the first snapshot's
    /// feature order.
    pub fn render(&self, fmt: CurveFormat) -> Result<String, serde_json::Error> {
        match fmt {
            CurveFormat::Csv => Ok(self.render_with_delimiter(',')),
            CurveFormat::Tsv => Ok(self.render_with_delimiter('\t')),
            CurveFormat::Json => serde_json::to_string(&self.entries),
        }
    }

    fn render_with_delimiter(&self, d: char) -> String {
        let features: Vec<&str> = self
            .entries
            .first()
            .map(|s| s.feature_names().collect())
            .unwrap_or_default();

        let mut out = String::new();
        out.push_str("instances_seen");
        out.push(d);
        out.push_str("seconds");
        for name in &features {
            out.push(d);
            out.push_str(name);
        }
        out.push('\n');

        for s in &self.entries {
            let _ = write!(out, "{}{d}{:.6}", s.instances_seen, s.seconds);
            for name in &features {
                let v = s.value(name).unwrap_or(f64::NAN);
                let _ = write!(out, "{d}{v:.12}");
            }
            out.push('\n');
        }
        out
    }
}
