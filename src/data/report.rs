use super::model::{PcaPoint, PcaResponse};
use super::timestep::{ColorAxis, TimeUnit, extract_timestep, generate_label, to_fixed};

// ---------------------------------------------------------------------------
// Summary cards
// ---------------------------------------------------------------------------

/// Headline numbers shown above the charts, in percent.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub n_points: usize,
    pub pc1_variance: f64,
    pub pc2_variance: f64,
    pub pc1_pc2_cumulative: f64,
}

impl Summary {
    fn from_response(resp: &PcaResponse) -> Self {
        let explained = &resp.explained_variance_ratio_all;
        let cumulative = &resp.cumulative_variance_ratio_all;
        let pct = |v: Option<&f64>| v.copied().unwrap_or(0.0) * 100.0;
        Summary {
            n_points: resp.points.len(),
            pc1_variance: pct(explained.first()),
            pc2_variance: pct(explained.get(1)),
            // single component: the only cumulative value covers PC1 alone
            pc1_pc2_cumulative: pct(cumulative.get(1).or(cumulative.last())),
        }
    }
}

// ---------------------------------------------------------------------------
// PcaReport – response plus everything derived for display
// ---------------------------------------------------------------------------

/// A validated response with per-point labels and colours resolved.
#[derive(Debug, Clone)]
pub struct PcaReport {
    pub response: PcaResponse,
    /// Timestep size the labels were computed with.
    pub timestep_size_fs: f64,
    /// Recovered timestep per point (same order as `response.points`).
    pub timesteps: Vec<Option<f64>>,
    /// Improved label per point.
    pub labels: Vec<String>,
    pub color_axis: ColorAxis,
    pub summary: Summary,
}

impl PcaReport {
    pub fn build(response: PcaResponse, timestep_size_fs: f64) -> Self {
        let timesteps: Vec<Option<f64>> = response
            .points
            .iter()
            .map(|p| extract_timestep(&p.label))
            .collect();
        let summary = Summary::from_response(&response);
        let mut report = PcaReport {
            response,
            timestep_size_fs,
            timesteps,
            labels: Vec::new(),
            color_axis: ColorAxis {
                values: Vec::new(),
                unit: TimeUnit::Ps,
            },
            summary,
        };
        report.relabel(timestep_size_fs);
        report
    }

    /// Recompute labels and colours for a new timestep size.
    pub fn relabel(&mut self, timestep_size_fs: f64) {
        self.timestep_size_fs = timestep_size_fs;
        self.labels = self
            .response
            .points
            .iter()
            .zip(&self.timesteps)
            .map(|(p, ts)| generate_label(*ts, &p.label, timestep_size_fs))
            .collect();
        self.color_axis = ColorAxis::from_timesteps(&self.timesteps, timestep_size_fs);
    }

    pub fn points(&self) -> &[PcaPoint] {
        &self.response.points
    }

    /// Explained variance of component `i` (0-based), 0 when absent.
    fn explained(&self, i: usize) -> f64 {
        self.response
            .explained_variance_ratio_all
            .get(i)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn x_axis_title(&self) -> String {
        format!("PC1 ({}%)", to_fixed(self.explained(0) * 100.0, 2))
    }

    pub fn y_axis_title(&self) -> String {
        format!("PC2 ({}%)", to_fixed(self.explained(1) * 100.0, 2))
    }

    /// Multi-line description used by the details window.
    pub fn describe_point(&self, idx: usize) -> Option<String> {
        let p = self.response.points.get(idx)?;
        let label = self.labels.get(idx)?;
        Some(format!(
            "Point {}:\n{}\nPC1: {}\nPC2: {}",
            idx + 1,
            label,
            to_fixed(p.x, 3),
            to_fixed(p.y, 3)
        ))
    }
}
