use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

// ---------------------------------------------------------------------------
// Filename → timestep
// ---------------------------------------------------------------------------

/// Filename patterns, most specific first. Group 1 is the timestep.
static TIMESTEP_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"output_timestep_(\d+)(?:_.*)?\.xyz$",
        r"timestep_(\d+)\.xyz$",
        r"step_(\d+)\.xyz$",
        r"frame_(\d+)\.xyz$",
        r"_(\d+)\.xyz$",
        r"(\d+)\.xyz$",
    ]
    .iter()
    .filter_map(|p| match Regex::new(p) {
        Ok(re) => Some(re),
        Err(e) => {
            log::error!("invalid timestep pattern {p}: {e}");
            None
        }
    })
    .collect()
});

/// Recover the simulation timestep embedded in a trajectory filename.
///
/// Returns `None` when no pattern matches. Digits are read as `f64`, so a
/// huge number still matches; past `f64::MAX` it becomes infinite and
/// [`generate_label`] falls back to the filename.
pub fn extract_timestep(filename: &str) -> Option<f64> {
    for re in TIMESTEP_PATTERNS.iter() {
        let Some(caps) = re.captures(filename) else {
            continue;
        };
        if let Some(step) = caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok()) {
            log::debug!("Extracted timestep {step} from {filename}");
            return Some(step);
        }
    }
    log::warn!("Could not extract timestep from {filename}");
    None
}

// ---------------------------------------------------------------------------
// Time units
// ---------------------------------------------------------------------------

/// Display unit for elapsed simulation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimeUnit {
    Fs,
    Ps,
    Ns,
}

impl TimeUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            TimeUnit::Fs => "fs",
            TimeUnit::Ps => "ps",
            TimeUnit::Ns => "ns",
        }
    }

    /// Femtoseconds per one of this unit.
    pub fn fs_per_unit(self) -> f64 {
        match self {
            TimeUnit::Fs => 1.0,
            TimeUnit::Ps => 1e3,
            TimeUnit::Ns => 1e6,
        }
    }

    /// Unit a label uses for a duration given in femtoseconds.
    pub fn for_label(time_fs: f64) -> Self {
        if time_fs < 1e3 {
            TimeUnit::Fs
        } else if time_fs < 1e6 {
            TimeUnit::Ps
        } else {
            TimeUnit::Ns
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Label of the starting frame.
pub const BASELINE_LABEL: &str = "100 K, 0 fs";

/// Temperature of the production run, shown on every later frame.
pub const RUN_TEMPERATURE_K: u32 = 40;

/// Format with `digits` decimals, rounding ties away from zero.
///
/// Plain `format!` can round an exact tie down: `1.125` prints `1.12`.
pub fn to_fixed(value: f64, digits: usize) -> String {
    let scale = 10f64.powi(digits as i32);
    let rounded = (value * scale).round() / scale;
    if rounded.is_finite() {
        format!("{rounded:.digits$}")
    } else {
        format!("{value:.digits$}")
    }
}

/// Human-readable label for a frame.
///
/// Falls back to `filename` when no finite timestep was found.
pub fn generate_label(timestep: Option<f64>, filename: &str, timestep_size_fs: f64) -> String {
    let Some(step) = timestep.filter(|s| s.is_finite()) else {
        return filename.to_string();
    };
    if step == 0.0 {
        return BASELINE_LABEL.to_string();
    }

    let time_fs = step * timestep_size_fs;
    let unit = TimeUnit::for_label(time_fs);
    let value = time_fs / unit.fs_per_unit();
    let digits = match unit {
        TimeUnit::Fs => 0,
        TimeUnit::Ps | TimeUnit::Ns => 2,
    };
    format!("{RUN_TEMPERATURE_K} K, {} {unit}", to_fixed(value, digits))
}

// ---------------------------------------------------------------------------
// Colour axis
// ---------------------------------------------------------------------------

/// Per-point colour values and the unit they are expressed in.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorAxis {
    pub values: Vec<f64>,
    pub unit: TimeUnit,
}

impl ColorAxis {
    /// Build from per-point timesteps. Points without a finite timestep use
    /// their index.
    ///
    /// Values start in picoseconds; the whole axis is rescaled to fs when
    /// everything is below 1 ps, or to ns when anything exceeds 1000 ps.
    pub fn from_timesteps(timesteps: &[Option<f64>], timestep_size_fs: f64) -> Self {
        let ps: Vec<f64> = timesteps
            .iter()
            .enumerate()
            .map(|(i, ts)| match ts {
                Some(step) if step.is_finite() => step * timestep_size_fs / 1e3,
                _ => i as f64,
            })
            .collect();

        let max = ps.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let unit = if max < 1.0 {
            TimeUnit::Fs
        } else if max > 1e3 {
            TimeUnit::Ns
        } else {
            TimeUnit::Ps
        };
        let values = match unit {
            TimeUnit::Fs => ps.into_iter().map(|v| v * 1e3).collect(),
            TimeUnit::Ps => ps,
            TimeUnit::Ns => ps.into_iter().map(|v| v / 1e3).collect(),
        };

        ColorAxis { values, unit }
    }

    pub fn title(&self) -> String {
        format!("Time ({})", self.unit)
    }

    /// `(min, max)` of the values, `None` when empty.
    pub fn range(&self) -> Option<(f64, f64)> {
        if self.values.is_empty() {
            return None;
        }
        let min = self.values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = self.values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_each_known_pattern() {
        let cases = [
            ("output_timestep_1200.xyz", 1200),
            ("output_timestep_15_relaxed.xyz", 15),
            ("timestep_42.xyz", 42),
            ("step_7.xyz", 7),
            ("frame_0031.xyz", 31),
            ("water_box_88.xyz", 88),
            ("500.xyz", 500),
            ("md500.xyz", 500),
        ];
        for (name, expected) in cases {
            assert_eq!(extract_timestep(name), Some(expected as f64), "{name}");
        }
    }

    #[test]
    fn non_matching_names_return_none() {
        for name in ["traj.xyz", "frame_3.pdb", "step_.xyz", "frame_12.xyz.gz"] {
            assert_eq!(extract_timestep(name), None, "{name}");
        }
    }

    #[test]
    fn oversized_number_still_labels_in_ns() {
        let step = extract_timestep("frame_99999999999999999999999.xyz").unwrap();
        assert_eq!(step, 1e23);
        let label = generate_label(Some(step), "frame_99999999999999999999999.xyz", 1.0);
        assert!(label.starts_with("40 K, "), "{label}");
        assert!(label.ends_with(" ns"), "{label}");
    }

    #[test]
    fn infinite_timestep_falls_back_to_filename() {
        let name = format!("step_{}.xyz", "9".repeat(400));
        let step = extract_timestep(&name).unwrap();
        assert!(step.is_infinite());
        assert_eq!(generate_label(Some(step), &name, 1.0), name);

        let axis = ColorAxis::from_timesteps(&[Some(step), Some(2000.0)], 1.0);
        assert_eq!(axis.values, vec![0.0, 2.0]);
    }

    #[test]
    fn label_falls_back_to_filename() {
        assert_eq!(generate_label(None, "traj.xyz", 1.0), "traj.xyz");
    }

    #[test]
    fn zero_timestep_is_baseline() {
        assert_eq!(generate_label(Some(0.0), "frame_0.xyz", 2.0), BASELINE_LABEL);
    }

    #[test]
    fn label_units_escalate_at_thresholds() {
        assert_eq!(generate_label(Some(999.0), "", 1.0), "40 K, 999 fs");
        assert_eq!(generate_label(Some(1000.0), "", 1.0), "40 K, 1.00 ps");
        assert_eq!(generate_label(Some(2500.0), "", 0.5), "40 K, 1.25 ps");
        assert_eq!(generate_label(Some(999_999.0), "", 1.0), "40 K, 1000.00 ps");
        assert_eq!(generate_label(Some(1_000_000.0), "", 1.0), "40 K, 1.00 ns");
        assert_eq!(generate_label(Some(3.0), "", 2.0e6), "40 K, 6.00 ns");
    }

    #[test]
    fn label_ties_round_away_from_zero() {
        assert_eq!(generate_label(Some(5.0), "", 0.5), "40 K, 3 fs");
        assert_eq!(generate_label(Some(1.0), "", 0.5), "40 K, 1 fs");
        assert_eq!(generate_label(Some(1125.0), "", 1.0), "40 K, 1.13 ps");
        assert_eq!(generate_label(Some(1_125_000.0), "", 1.0), "40 K, 1.13 ns");
    }

    #[test]
    fn to_fixed_rounds_half_up() {
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(0.5, 0), "1");
        assert_eq!(to_fixed(1.125, 2), "1.13");
        assert_eq!(to_fixed(-2.5, 0), "-3");
        assert_eq!(to_fixed(12.345678, 3), "12.346");
        assert_eq!(to_fixed(60.0, 2), "60.00");
    }

    #[test]
    fn label_unit_is_monotonic() {
        let mut last = TimeUnit::Fs;
        for exp in 0..9 {
            let unit = TimeUnit::for_label(10f64.powi(exp));
            assert!(unit >= last);
            last = unit;
        }
        assert_eq!(last, TimeUnit::Ns);
    }

    #[test]
    fn color_axis_picks_fs_for_short_runs() {
        let axis = ColorAxis::from_timesteps(&[Some(100.0), Some(500.0)], 1.0);
        assert_eq!(axis.unit, TimeUnit::Fs);
        assert_eq!(axis.values, vec![100.0, 500.0]);
        assert_eq!(axis.title(), "Time (fs)");
    }

    #[test]
    fn color_axis_picks_ps_and_ns() {
        let axis = ColorAxis::from_timesteps(&[Some(1000.0), Some(20_000.0)], 1.0);
        assert_eq!(axis.unit, TimeUnit::Ps);
        assert_eq!(axis.values, vec![1.0, 20.0]);

        let axis = ColorAxis::from_timesteps(&[Some(0.0), Some(2_000_000.0)], 1.0);
        assert_eq!(axis.unit, TimeUnit::Ns);
        assert_eq!(axis.values, vec![0.0, 2.0]);
    }

    #[test]
    fn color_axis_uses_index_without_timestep() {
        let axis = ColorAxis::from_timesteps(&[None, None, Some(3000.0)], 1.0);
        assert_eq!(axis.unit, TimeUnit::Ps);
        assert_eq!(axis.values, vec![0.0, 1.0, 3.0]);
        assert_eq!(axis.range(), Some((0.0, 3.0)));
    }
}
