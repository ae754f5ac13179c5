//! Deterministic 2D coherent noise.
//!
//! [`OpenSimplex2d`] reproduces the classic OpenSimplex construction used by the
//! `open-simplex-noise` family of libraries: a seeded byte permutation, a
//! stretched/squished simplex lattice, and lookup tables of lattice
//! contributions keyed by the position inside the rhombus. The same seed always
//! yields the same field, so a render can be repeated frame-for-frame.

/// A pure 2D scalar field sampled by the animation driver.
pub trait NoiseSource {
    /// Returns the field value at `(x, y)`, nominally in `[-1, 1]`.
    fn sample(&self, x: f64, y: f64) -> f64;
}

impl<N: NoiseSource + ?Sized> NoiseSource for &N {
    fn sample(&self, x: f64, y: f64) -> f64 {
        (**self).sample(x, y)
    }
}

/// `(1 / sqrt(3) - 1) / 2`
const STRETCH_2D: f64 = -0.211_324_865_405_187_08;
/// `(sqrt(3) - 1) / 2`
const SQUISH_2D: f64 = 0.366_025_403_784_438_6;
const NORM_2D: f64 = 1.0 / 47.0;

const GRADIENTS_2D: [f64; 16] = [
    5.0, 2.0, 2.0, 5.0, -5.0, 2.0, -2.0, 5.0, 5.0, -2.0, 2.0, -5.0, -5.0, -2.0, -2.0, -5.0,
];

/// Base vertex sets as `(multiplier, xsb, ysb)` triples.
const BASE_2D: [&[i32]; 2] = [
    &[1, 1, 0, 1, 0, 1, 0, 0, 0],
    &[1, 1, 0, 1, 0, 1, 2, 1, 1],
];

/// Each group of four: base set index followed by one extra `(multiplier, xsb, ysb)`.
const P_2D: [i32; 24] = [
    0, 0, 1, -1, 0, 0, -1, 1, 0, 2, 1, 1, 1, 2, 2, 0, 1, 2, 0, 2, 1, 0, 0, 0,
];

/// `(hash, contribution set)` pairs.
const LOOKUP_PAIRS_2D: [usize; 24] = [
    0, 1, 1, 0, 4, 1, 17, 0, 20, 2, 21, 2, 22, 5, 23, 5, 26, 4, 39, 3, 42, 4, 43, 3,
];

const LOOKUP_SIZE: usize = 64;

#[derive(Clone, Copy, Debug)]
struct Contribution {
    dx: f64,
    dy: f64,
    xsb: i64,
    ysb: i64,
}

impl Contribution {
    fn new(multiplier: i32, xsb: i32, ysb: i32) -> Self {
        let multiplier = f64::from(multiplier);
        Self {
            dx: -f64::from(xsb) - multiplier * SQUISH_2D,
            dy: -f64::from(ysb) - multiplier * SQUISH_2D,
            xsb: i64::from(xsb),
            ysb: i64::from(ysb),
        }
    }
}

/// Seeded 2D OpenSimplex noise.
#[derive(Clone, Debug)]
pub struct OpenSimplex2d {
    perm: [u8; 256],
    perm_2d: [u8; 256],
    contributions: Vec<Vec<Contribution>>,
    lookup: [Option<usize>; LOOKUP_SIZE],
}

impl OpenSimplex2d {
    pub fn new(seed: u32) -> Self {
        let contributions: Vec<Vec<Contribution>> = P_2D
            .chunks_exact(4)
            .map(|group| {
                let base = BASE_2D[group[0] as usize];
                let mut set: Vec<Contribution> = base
                    .chunks_exact(3)
                    .map(|triple| Contribution::new(triple[0], triple[1], triple[2]))
                    .collect();
                set.push(Contribution::new(group[1], group[2], group[3]));
                set
            })
            .collect();

        let mut lookup = [None; LOOKUP_SIZE];
        for pair in LOOKUP_PAIRS_2D.chunks_exact(2) {
            lookup[pair[0]] = Some(pair[1]);
        }

        let (perm, perm_2d) = permutation(seed);
        Self {
            perm,
            perm_2d,
            contributions,
            lookup,
        }
    }

    pub fn get(&self, x: f64, y: f64) -> f64 {
        let stretch_offset = (x + y) * STRETCH_2D;
        let xs = x + stretch_offset;
        let ys = y + stretch_offset;
        let xsb = xs.floor();
        let ysb = ys.floor();
        let squish_offset = (xsb + ysb) * SQUISH_2D;
        let dx0 = x - (xsb + squish_offset);
        let dy0 = y - (ysb + squish_offset);
        let xins = xs - xsb;
        let yins = ys - ysb;
        let in_sum = xins + yins;

        // Truncating casts mirror the integer coercion of the reference hash.
        let hash = ((xins - yins + 1.0) as i32)
            | ((in_sum as i32) << 1)
            | (((in_sum + yins) as i32) << 2)
            | (((in_sum + xins) as i32) << 4);

        let Some(set) = usize::try_from(hash)
            .ok()
            .and_then(|hash| self.lookup.get(hash).copied().flatten())
        else {
            return 0.0;
        };

        let xsb = xsb as i64;
        let ysb = ysb as i64;
        let mut value = 0.0;
        for contribution in &self.contributions[set] {
            let dx = dx0 + contribution.dx;
            let dy = dy0 + contribution.dy;
            let attn = 2.0 - dx * dx - dy * dy;
            if attn > 0.0 {
                let px = xsb + contribution.xsb;
                let py = ysb + contribution.ysb;
                let part_a = i64::from(self.perm[(px & 0xff) as usize]);
                let index = self.perm_2d[((part_a + py) & 0xff) as usize] as usize;
                let gradient = GRADIENTS_2D[index] * dx + GRADIENTS_2D[index + 1] * dy;
                value += attn * attn * attn * attn * gradient;
            }
        }
        value * NORM_2D
    }
}

impl NoiseSource for OpenSimplex2d {
    fn sample(&self, x: f64, y: f64) -> f64 {
        self.get(x, y)
    }
}

fn shuffle_seed(seed: u32) -> u32 {
    seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223)
}

fn permutation(seed: u32) -> ([u8; 256], [u8; 256]) {
    let mut perm = [0u8; 256];
    let mut perm_2d = [0u8; 256];
    let mut source: [u8; 256] = std::array::from_fn(|i| i as u8);

    let mut seed = shuffle_seed(shuffle_seed(shuffle_seed(seed)));
    for i in (0..256usize).rev() {
        seed = shuffle_seed(seed);
        let r = ((u64::from(seed) + 31) % (i as u64 + 1)) as usize;
        perm[i] = source[r];
        perm_2d[i] = perm[i] & 0x0e;
        source[r] = source[i];
    }
    (perm, perm_2d)
}
