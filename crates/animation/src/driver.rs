use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::noise::NoiseSource;
use crate::params::FrameParams;

/// Time value of the frame before the first one.
pub const DEFAULT_TIME_START: f64 = 5.5;
/// Time covered by the whole sequence.
pub const DEFAULT_TIME_SPAN: f64 = 5.3;

/// Noise x-offsets for the four channels of `c`. Distinct rows keep the
/// channels from moving in lock-step.
const CHANNEL_OFFSETS: [f64; 4] = [10.0, 20.0, 30.0, 40.0];

/// How noise samples are mapped onto the fractal constant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FractalVariant {
    /// Burning Ship Julia set.
    #[default]
    BurningShip,
    /// Regular quaternion Julia set.
    Julia,
}

impl FractalVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            FractalVariant::BurningShip => "burning-ship",
            FractalVariant::Julia => "julia",
        }
    }
}

impl fmt::Display for FractalVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FractalVariant {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "burning-ship" | "burningship" | "ship" => Ok(FractalVariant::BurningShip),
            "julia" => Ok(FractalVariant::Julia),
            other => Err(format!(
                "unknown fractal variant '{other}' (expected 'burning-ship' or 'julia')"
            )),
        }
    }
}

/// Linear sweep of the noise time coordinate across a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeRange {
    pub start: f64,
    pub span: f64,
}

impl Default for TimeRange {
    fn default() -> Self {
        Self {
            start: DEFAULT_TIME_START,
            span: DEFAULT_TIME_SPAN,
        }
    }
}

/// Produces the scene parameters of every frame in a sequence.
///
/// The driver holds no mutable state: [`AnimationDriver::frame`] is a pure
/// function of the frame index.
#[derive(Clone, Debug)]
pub struct AnimationDriver<N> {
    noise: N,
    frames: u32,
    time: TimeRange,
    variant: FractalVariant,
    base: FrameParams,
}

impl<N: NoiseSource> AnimationDriver<N> {
    pub fn new(noise: N, frames: u32, time: TimeRange, variant: FractalVariant) -> Self {
        Self {
            noise,
            frames,
            time,
            variant,
            base: FrameParams::default(),
        }
    }

    /// Overrides the parameters that are not animated (anti-aliasing, rotation, camera).
    pub fn with_base(mut self, base: FrameParams) -> Self {
        self.base = base;
        self
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Noise time for a 1-based frame index.
    pub fn time_at(&self, index: u32) -> f64 {
        let frames = f64::from(self.frames.max(1));
        self.time.start + f64::from(index) / frames * self.time.span
    }

    pub fn frame(&self, index: u32) -> FrameParams {
        let time = self.time_at(index);
        FrameParams {
            c: self.fractal_constant(time),
            ..self.base
        }
    }

    pub fn fractal_constant(&self, time: f64) -> [f64; 4] {
        match self.variant {
            FractalVariant::BurningShip => burning_ship(&self.noise, time),
            FractalVariant::Julia => julia(&self.noise, time),
        }
    }
}

fn burning_ship<N: NoiseSource>(noise: &N, time: f64) -> [f64; 4] {
    let [x0, x1, x2, x3] = CHANNEL_OFFSETS;
    [
        noise.sample(x0, time) * 0.33 - 0.5,
        noise.sample(x1, time) * 0.75 - 0.5,
        noise.sample(x2, time) * 0.5 - 0.5,
        noise.sample(x3, time * 0.5) * 0.5,
    ]
}

fn julia<N: NoiseSource>(noise: &N, time: f64) -> [f64; 4] {
    let [x0, x1, x2, _] = CHANNEL_OFFSETS;

    let raw = noise.sample(x0, time);
    let angle = PI + raw.abs().sqrt() * if raw < 0.0 { -1.0 } else { 1.0 };
    let real = angle.cos() * (1.0 - angle.cos()) * 0.5 + 0.25;
    let radius = angle.sin() * (1.0 - angle.cos()) * 0.5;

    let angle = (noise.sample(x1, time) + 1.0) * PI;
    let i = angle.cos() * radius;
    let j = angle.sin() * radius;

    let angle = (noise.sample(x2, time * 0.5) * 0.5 + 0.5).powi(2) * PI;
    let k = angle.sin();

    [real, i * k, j * k, k]
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::noise::OpenSimplex2d;

    /// Returns a fixed value and records every coordinate it was asked for.
    struct RecordingNoise {
        value: f64,
        calls: RefCell<Vec<(f64, f64)>>,
    }

    impl RecordingNoise {
        fn new(value: f64) -> Self {
            Self {
                value,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl NoiseSource for RecordingNoise {
        fn sample(&self, x: f64, y: f64) -> f64 {
            self.calls.borrow_mut().push((x, y));
            self.value
        }
    }

    #[test]
    fn time_sweeps_from_start_to_start_plus_span() {
        let driver = AnimationDriver::new(
            OpenSimplex2d::new(6666),
            1200,
            TimeRange::default(),
            FractalVariant::BurningShip,
        );
        assert_eq!(driver.time_at(1), 5.5 + 1.0 / 1200.0 * 5.3);
        assert!((driver.time_at(1) - 5.504_416_666).abs() < 1e-8);
        assert!((driver.time_at(1200) - 10.8).abs() < 1e-12);
        assert!(driver.time_at(600) > driver.time_at(599));
    }

    #[test]
    fn burning_ship_samples_decorrelated_rows() {
        let noise = RecordingNoise::new(0.0);
        let driver = AnimationDriver::new(&noise, 100, TimeRange::default(), FractalVariant::BurningShip);
        let t = driver.time_at(10);
        let c = driver.frame(10).c;

        assert_eq!(c, [-0.5, -0.5, -0.5, 0.0]);
        assert_eq!(
            *noise.calls.borrow(),
            vec![(10.0, t), (20.0, t), (30.0, t), (40.0, t * 0.5)]
        );
    }

    #[test]
    fn burning_ship_scales_each_channel() {
        let noise = RecordingNoise::new(1.0);
        let driver = AnimationDriver::new(&noise, 10, TimeRange::default(), FractalVariant::BurningShip);
        let c = driver.frame(3).c;
        assert!((c[0] - (0.33 - 0.5)).abs() < 1e-15);
        assert!((c[1] - 0.25).abs() < 1e-15);
        assert_eq!(c[2], 0.0);
        assert_eq!(c[3], 0.5);
    }

    #[test]
    fn julia_mapping_at_zero_noise() {
        let noise = RecordingNoise::new(0.0);
        let driver = AnimationDriver::new(&noise, 10, TimeRange::default(), FractalVariant::Julia);
        let c = driver.frame(1).c;
        // angle = π: cos = -1, sin ≈ 0 → real = -1 * 2 * 0.5 + 0.25
        assert!((c[0] - -0.75).abs() < 1e-12);
        // (0.5)² · π → sin(π/4)
        assert!((c[3] - (PI / 4.0).sin()).abs() < 1e-12);
        assert!(c[1].abs() < 1e-12);
        assert!(c[2].abs() < 1e-12);
        let t = driver.time_at(1);
        assert_eq!(
            *noise.calls.borrow(),
            vec![(10.0, t), (20.0, t), (30.0, t * 0.5)]
        );
    }

    #[test]
    fn frames_are_pure_functions_of_index() {
        let driver = AnimationDriver::new(
            OpenSimplex2d::new(6666),
            1200,
            TimeRange::default(),
            FractalVariant::BurningShip,
        );
        for index in [1, 2, 599, 1200] {
            let a = driver.frame(index);
            let b = driver.frame(index);
            assert_eq!(a.c.map(f64::to_bits), b.c.map(f64::to_bits));
        }
        // Out-of-order evaluation does not disturb later frames.
        let late = driver.frame(900);
        let _ = driver.frame(3);
        assert_eq!(driver.frame(900), late);
    }

    #[test]
    fn first_frame_matches_direct_noise_samples() {
        let noise = OpenSimplex2d::new(6666);
        let driver = AnimationDriver::new(
            noise.clone(),
            1200,
            TimeRange::default(),
            FractalVariant::BurningShip,
        );
        let t = 5.5 + 1.0 / 1200.0 * 5.3;
        let expected = [
            noise.get(10.0, t) * 0.33 - 0.5,
            noise.get(20.0, t) * 0.75 - 0.5,
            noise.get(30.0, t) * 0.5 - 0.5,
            noise.get(40.0, t * 0.5) * 0.5,
        ];
        assert_eq!(driver.frame(1).c, expected);
    }

    #[test]
    fn first_frame_constant_is_pinned() {
        let driver = AnimationDriver::new(
            OpenSimplex2d::new(6666),
            1200,
            TimeRange::default(),
            FractalVariant::BurningShip,
        );
        assert_eq!(driver.time_at(1), 5.504416666666667);
        let expected = [
            -0.4660625474837739,
            -0.40962232762876305,
            -0.6414633030653328,
            0.23309111562746335,
        ];
        for (actual, expected) in driver.frame(1).c.iter().zip(expected) {
            assert!((actual - expected).abs() <= 1e-15, "{actual} != {expected}");
        }
    }

    #[test]
    fn base_parameters_pass_through() {
        let base = FrameParams {
            aa_level: 3,
            rotation: 0.25,
            cam_pos: [1.0, 2.0, 3.0],
            ..FrameParams::default()
        };
        let driver = AnimationDriver::new(
            OpenSimplex2d::new(1),
            10,
            TimeRange::default(),
            FractalVariant::BurningShip,
        )
        .with_base(base);
        let frame = driver.frame(5);
        assert_eq!(frame.aa_level, 3);
        assert_eq!(frame.rotation, 0.25);
        assert_eq!(frame.cam_pos, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn variant_parses_from_cli_text() {
        assert_eq!("julia".parse::<FractalVariant>(), Ok(FractalVariant::Julia));
        assert_eq!(
            "Burning-Ship".parse::<FractalVariant>(),
            Ok(FractalVariant::BurningShip)
        );
        assert!("mandelbrot".parse::<FractalVariant>().is_err());
    }
}
