use rand::{rngs::StdRng, Rng, SeedableRng};

/// Azimuth and elevation in whole degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orientation {
    pub azimuth: i32,
    pub elevation: i32,
}

impl Orientation {
    pub const fn new(azimuth: i32, elevation: i32) -> Self {
        Orientation { azimuth, elevation }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "az {} el {}", self.azimuth, self.elevation)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("Invalid bounds: min {min} is greater than max {max}")]
    InvalidBounds { min: i32, max: i32 },
}

/// An inclusive range of degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(try_from = "RawBounds")]
pub struct Bounds {
    min: i32,
    max: i32,
}

#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBounds {
    min: i32,
    max: i32,
}

impl TryFrom<RawBounds> for Bounds {
    type Error = TargetError;

    fn try_from(value: RawBounds) -> Result<Self, Self::Error> {
        Bounds::new(value.min, value.max)
    }
}

impl Bounds {
    pub fn new(min: i32, max: i32) -> Result<Self, TargetError> {
        if min > max {
            return Err(TargetError::InvalidBounds { min, max });
        }
        Ok(Bounds { min, max })
    }

    /// Unchecked constructor for constants
    pub(crate) const fn limits(min: i32, max: i32) -> Self {
        Bounds { min, max }
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Returns true if this range lies completely inside `outer`
    pub fn is_within(&self, outer: &Bounds) -> bool {
        outer.contains(self.min) && outer.contains(self.max)
    }

    fn sample(&self, rng: &mut impl Rng) -> i32 {
        rng.random_range(self.min..=self.max)
    }
}

/// Draws random targets inside the configured azimuth and elevation ranges
pub struct TargetGenerator<R: Rng = StdRng> {
    azimuth: Bounds,
    elevation: Bounds,
    rng: R,
}

impl TargetGenerator<StdRng> {
    /// Uses a fixed seed if one is given, so that a run can be reproduced. Otherwise the
    /// generator is seeded from the thread local rng.
    pub fn from_seed(azimuth: Bounds, elevation: Bounds, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self::new(azimuth, elevation, rng)
    }
}

impl<R: Rng> TargetGenerator<R> {
    pub fn new(azimuth: Bounds, elevation: Bounds, rng: R) -> Self {
        TargetGenerator { azimuth, elevation, rng }
    }

    pub fn next_target(&mut self) -> Orientation {
        let azimuth = self.azimuth.sample(&mut self.rng);
        let elevation = self.elevation.sample(&mut self.rng);
        Orientation { azimuth, elevation }
    }
}
