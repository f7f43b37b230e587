use std::path::{Path, PathBuf};

const HEADER: &str = "Structural element\tNode\tLocal number\tX\tY\tu_x\tu_y\tN\tQ\tM";
const UNITS: &str = "[-]\t[-]\t[-]\t[m]\t[m]\t[m]\t[m]\t[kN/m]\t[kN/m]\t[kN m/m]";
/// Line index of the units row in every export.
const UNITS_ROW: usize = 3;

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

    /// Uniform noise in `[-amplitude, amplitude)`.
    fn jitter(&mut self, amplitude: f64) -> f64 {
        (self.next_f64() * 2.0 - 1.0) * amplitude
    }
}

/// One construction stage: name and how far the excavation has progressed.
struct StageSpec {
    label: &'static str,
    severity: f64,
}

const STAGES: [StageSpec; 5] = [
    StageSpec { label: "Initial phase", severity: 0.0 },
    StageSpec { label: "Wall installation", severity: 0.1 },
    StageSpec { label: "Excavation to RL 5", severity: 0.45 },
    StageSpec { label: "Anchor installation", severity: 0.5 },
    StageSpec { label: "Excavation to RL 0", severity: 1.0 },
];

const WALL_TOP: f64 = 10.0;
const WALL_TOE: f64 = -12.0;
const NODES: usize = 45;

/// Tab-separated lines of one stage export (header, units row, data).
fn stage_lines(spec: &StageSpec, rng: &mut SimpleRng) -> Vec<String> {
    let height = WALL_TOP - WALL_TOE;
    let mut rows: Vec<String> = (0..NODES)
        .map(|i| {
            let t = i as f64 / (NODES - 1) as f64;
            let y = WALL_TOP - t * height;
            let s = spec.severity;

            let u_x = -s * 0.035 * (1.0 - t).powi(2) + rng.jitter(1e-5);
            let u_y = -s * 0.004 * (1.0 - t) + rng.jitter(1e-6);
            let m = s * 180.0 * (std::f64::consts::PI * t).sin() * (1.0 - 0.6 * t);
            let q = s * 95.0 * (std::f64::consts::PI * t).cos() + rng.jitter(0.5);
            let n = -(15.0 * t * height) - s * 20.0;

            format!("Plate_1\t{}\t{}\t0.000\t{y:.4}\t{u_x:.6}\t{u_y:.6}\t{n:.3}\t{q:.3}\t{m:.3}", 100 + i, i + 1)
        })
        .collect();

    rows.insert(0, HEADER.to_string());
    rows.insert(UNITS_ROW, UNITS.to_string());
    rows
}

/// Stage exports are ISO-8859-1 text; characters outside it become `?`.
fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

fn write_stage(dir: &Path, index: usize, spec: &StageSpec, rng: &mut SimpleRng) -> PathBuf {
    let name = format!("Plate_1-{:02}-{}[Phase_{index}].txt", index + 1, spec.label);
    let path = dir.join(name);
    let text = stage_lines(spec, rng).join("\r\n") + "\r\n";
    std::fs::write(&path, encode_latin1(&text)).expect("Failed to write stage export");
    path
}

fn main() {
    let output_dir = PathBuf::from(
        std::env::args()
            .nth(1)
            .unwrap_or_else(|| "sample_stages".to_string()),
    );
    std::fs::create_dir_all(&output_dir).expect("Failed to create output folder");

    let mut rng = SimpleRng::new(42);
    for (index, spec) in STAGES.iter().enumerate() {
        let path = write_stage(&output_dir, index, spec, &mut rng);
        println!("wrote {}", path.display());
    }

    println!(
        "Wrote {} stage exports ({NODES} nodes each) to {}",
        STAGES.len(),
        output_dir.display()
    );
}
