use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One water molecule at the origin, Å.
const WATER: [(&str, [f64; 3]); 3] = [
    ("O", [0.0, 0.0, 0.0]),
    ("H", [0.757, 0.586, 0.0]),
    ("H", [-0.757, 0.586, 0.0]),
];

/// Water molecules on a cubic grid with 3.1 Å spacing.
fn lattice(n_side: usize) -> Vec<(&'static str, [f64; 3])> {
    let spacing = 3.1;
    let mut atoms = Vec::new();
    for i in 0..n_side {
        for j in 0..n_side {
            for k in 0..n_side {
                let origin = [i as f64 * spacing, j as f64 * spacing, k as f64 * spacing];
                for (el, p) in WATER {
                    atoms.push((el, [origin[0] + p[0], origin[1] + p[1], origin[2] + p[2]]));
                }
            }
        }
    }
    atoms
}

/// Render one frame: the cluster quenches from 100 K to 40 K and slowly shears.
fn render_frame(
    base: &[(&str, [f64; 3])],
    timestep: u64,
    total: u64,
    rng: &mut SimpleRng,
) -> Result<String, std::fmt::Error> {
    let progress = timestep as f64 / total.max(1) as f64;
    let temperature = 100.0 - 60.0 * progress.min(1.0);
    let jitter = 0.02 * (temperature / 40.0).sqrt();
    let shear = 0.4 * progress;

    let mut out = String::new();
    writeln!(out, "{}", base.len())?;
    writeln!(out, "timestep={timestep} T={temperature:.1}K")?;
    for (el, [x, y, z]) in base {
        let x = x + shear * z + rng.gauss(0.0, jitter);
        let y = y + rng.gauss(0.0, jitter);
        let z = z + rng.gauss(0.0, jitter);
        writeln!(out, "{el:<2} {x:>12.6} {y:>12.6} {z:>12.6}")?;
    }
    Ok(out)
}

fn write_frames(dir: &Path, n_frames: u64, stride: u64) -> Result<usize> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let base = lattice(2);
    let total = (n_frames.saturating_sub(1)) * stride;

    for frame in 0..n_frames {
        let timestep = frame * stride;
        let path = dir.join(format!("output_timestep_{timestep}.xyz"));
        let text = render_frame(&base, timestep, total, &mut rng)
            .with_context(|| format!("formatting frame {timestep}"))?;
        std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(base.len())
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let dir = PathBuf::from(args.next().unwrap_or_else(|| "sample_frames".into()));
    let n_frames: u64 = match args.next() {
        Some(s) => s.parse().with_context(|| format!("frame count `{s}`"))?,
        None => 20,
    };
    // 500 steps of 1 fs: labels run 0 fs → 9.50 ps for 20 frames
    let stride = 500;

    let n_atoms = write_frames(&dir, n_frames, stride)?;
    println!(
        "Wrote {n_frames} frames ({n_atoms} atoms each) to {}",
        dir.display()
    );
    Ok(())
}
