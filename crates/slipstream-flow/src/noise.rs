//! 3D simplex noise over two spatial axes and time.

use rand::Rng;

/// Gradient directions: the midpoints of a cube's edges.
const GRAD3: [[f32; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

/// Skew factor into simplex space.
const F3: f32 = 1.0 / 3.0;
/// Unskew factor back out of it.
const G3: f32 = 1.0 / 6.0;
/// Squared radius of a corner's kernel.
const RADIUS_SQ: f32 = 0.6;
/// Brings the summed kernels to roughly `[-1, 1]`.
const SCALE: f32 = 32.0;

/// Smooth, deterministic pseudo-random field.
///
/// The permutation is shuffled once at construction and never reseeded, so
/// two fields agree only if they were built from identical random streams.
#[derive(Debug, Clone)]
pub struct NoiseField {
    perm: [u8; 512],
}

impl NoiseField {
    /// Build a field from a Fisher-Yates shuffle of `0..=255`.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut p: [u8; 256] = std::array::from_fn(|i| i as u8);
        for i in (1..p.len()).rev() {
            let j = rng.gen_range(0..=i);
            p.swap(i, j);
        }
        // Doubled so corner lookups never need to wrap.
        let perm = std::array::from_fn(|i| p[i & 255]);
        Self { perm }
    }

    /// The doubled permutation table.
    pub fn permutation(&self) -> &[u8; 512] {
        &self.perm
    }

    /// Sample the field. The result lies in roughly `[-1, 1]`.
    ///
    /// Callers scale coordinates themselves to pick a frequency per axis.
    pub fn sample(&self, x: f32, y: f32, z: f32) -> f32 {
        let s = (x + y + z) * F3;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let k = (z + s).floor();
        let t = (i + j + k) * G3;

        // Offsets from the cell origin, unskewed.
        let x0 = x - (i - t);
        let y0 = y - (j - t);
        let z0 = z - (k - t);

        // Which of the six tetrahedra are we in?
        let ((i1, j1, k1), (i2, j2, k2)) = if x0 >= y0 {
            if y0 >= z0 {
                ((1, 0, 0), (1, 1, 0))
            } else if x0 >= z0 {
                ((1, 0, 0), (1, 0, 1))
            } else {
                ((0, 0, 1), (1, 0, 1))
            }
        } else if y0 < z0 {
            ((0, 0, 1), (0, 1, 1))
        } else if x0 < z0 {
            ((0, 1, 0), (0, 1, 1))
        } else {
            ((0, 1, 0), (1, 1, 0))
        };

        let x1 = x0 - i1 as f32 + G3;
        let y1 = y0 - j1 as f32 + G3;
        let z1 = z0 - k1 as f32 + G3;
        let x2 = x0 - i2 as f32 + 2.0 * G3;
        let y2 = y0 - j2 as f32 + 2.0 * G3;
        let z2 = z0 - k2 as f32 + 2.0 * G3;
        let x3 = x0 - 1.0 + 3.0 * G3;
        let y3 = y0 - 1.0 + 3.0 * G3;
        let z3 = z0 - 1.0 + 3.0 * G3;

        let ii = (i as i64 & 255) as usize;
        let jj = (j as i64 & 255) as usize;
        let kk = (k as i64 & 255) as usize;

        let g0 = self.gradient(ii, jj, kk);
        let g1 = self.gradient(ii + i1, jj + j1, kk + k1);
        let g2 = self.gradient(ii + i2, jj + j2, kk + k2);
        let g3 = self.gradient(ii + 1, jj + 1, kk + 1);

        let n0 = corner(g0, x0, y0, z0);
        let n1 = corner(g1, x1, y1, z1);
        let n2 = corner(g2, x2, y2, z2);
        let n3 = corner(g3, x3, y3, z3);

        SCALE * (n0 + n1 + n2 + n3)
    }

    fn gradient(&self, i: usize, j: usize, k: usize) -> &'static [f32; 3] {
        let p = &self.perm;
        let index = p[i + p[j + p[k] as usize] as usize] as usize;
        &GRAD3[index % GRAD3.len()]
    }
}

/// Contribution of one simplex corner at offset (`x`, `y`, `z`).
fn corner(g: &[f32; 3], x: f32, y: f32, z: f32) -> f32 {
    let t = RADIUS_SQ - x * x - y * y - z * z;
    if t < 0.0 {
        return 0.0;
    }
    let t2 = t * t;
    t2 * t2 * (g[0] * x + g[1] * y + g[2] * z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn field(seed: u64) -> NoiseField {
        NoiseField::new(&mut StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_permutation_is_bijection() {
        let noise = field(7);
        let perm = noise.permutation();
        let mut seen = [false; 256];
        for &v in &perm[..256] {
            assert!(!seen[v as usize], "value {v} appears twice");
            seen[v as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(perm[..256], perm[256..]);
    }

    #[test]
    fn test_permutation_modulo_256_is_bijection() {
        let noise = field(99);
        let mut counts = [0u32; 256];
        for &v in &noise.permutation()[..256] {
            counts[(v as usize) % 256] += 1;
        }
        assert!(counts.iter().all(|&c| c == 1));
    }

    #[test]
    fn test_bounds() {
        let noise = field(1);
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..10_000 {
            let x = rng.gen_range(-1000.0..1000.0);
            let y = rng.gen_range(-1000.0..1000.0);
            let z = rng.gen_range(-1000.0..1000.0);
            let v = noise.sample(x, y, z);
            assert!((-1.05..=1.05).contains(&v), "noise({x}, {y}, {z}) = {v}");
        }
    }

    #[test]
    fn test_deterministic_for_fixed_input() {
        let noise = field(3);
        let a = noise.sample(0.3, -4.2, 17.5);
        let b = noise.sample(0.3, -4.2, 17.5);
        assert_eq!(a, b);
        assert_eq!(field(3).sample(0.3, -4.2, 17.5), a);
    }

    #[test]
    fn test_continuous() {
        let noise = field(4);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..1_000 {
            let x = rng.gen_range(-50.0..50.0);
            let y = rng.gen_range(-50.0..50.0);
            let z = rng.gen_range(-50.0..50.0);
            let d = (noise.sample(x, y, z) - noise.sample(x + 1e-3, y, z)).abs();
            assert!(d < 0.05, "jump of {d} at ({x}, {y}, {z})");
        }
    }

    #[test]
    fn test_not_constant() {
        let noise = field(6);
        let values: Vec<f32> = (0..64).map(|i| noise.sample(i as f32 * 0.37, 1.1, 0.5)).collect();
        assert!(values.iter().any(|&v| v.abs() > 0.05));
    }
}
