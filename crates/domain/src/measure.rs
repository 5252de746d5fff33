use std::{fmt, ops::Mul};

use derive_more::{Display, Into};

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Reps(u32);

impl Reps {
    pub fn new(value: u32) -> Result<Self, RepsError> {
        if !(0..1000).contains(&value) {
            return Err(RepsError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Reps {
    type Error = RepsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<u32>() {
            Ok(parsed_value) => Reps::new(parsed_value),
            Err(_) => Err(RepsError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RepsError {
    #[error("Reps must be in the range 0 to 999")]
    OutOfRange,
    #[error("Reps must be an integer")]
    ParseError,
}

/// Duration of a timed set in seconds.
#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Time(u32);

impl Time {
    pub fn new(value: u32) -> Result<Self, TimeError> {
        if !(0..86_400).contains(&value) {
            return Err(TimeError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Time {
    type Error = TimeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<u32>() {
            Ok(parsed_value) => Time::new(parsed_value),
            Err(_) => Err(TimeError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TimeError {
    #[error("Time must be in the range 0 to 86399 s")]
    OutOfRange,
    #[error("Time must be an integer")]
    ParseError,
}

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Weight(f32);

impl Weight {
    pub fn new(value: f32) -> Result<Self, WeightError> {
        if !(0.0..1000.0).contains(&value) {
            return Err(WeightError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Weight {
    type Error = WeightError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<f32>() {
            Ok(parsed_value) => Weight::new(parsed_value),
            Err(_) => Err(WeightError::ParseError),
        }
    }
}

impl Mul<Reps> for Weight {
    type Output = f32;

    #[allow(clippy::cast_precision_loss)]
    fn mul(self, rhs: Reps) -> Self::Output {
        self.0 * rhs.0 as f32
    }
}

impl Mul<Time> for Weight {
    type Output = f32;

    #[allow(clippy::cast_precision_loss)]
    fn mul(self, rhs: Time) -> Self::Output {
        self.0 * rhs.0 as f32
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WeightError {
    #[error("Weight must be in the range 0.0 to 999.9 kg")]
    OutOfRange,
    #[error("Weight must be a decimal")]
    ParseError,
}

/// Perceived effort of a set on a scale from 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Effort(u8);

impl Effort {
    pub const ONE: Effort = Effort(1);
    pub const TWO: Effort = Effort(2);
    pub const THREE: Effort = Effort(3);
    pub const FOUR: Effort = Effort(4);
    pub const FIVE: Effort = Effort(5);

    pub fn new(value: u8) -> Result<Self, EffortError> {
        if !(1..=5).contains(&value) {
            return Err(EffortError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl From<Effort> for f32 {
    fn from(value: Effort) -> Self {
        f32::from(value.0)
    }
}

impl TryFrom<&str> for Effort {
    type Error = EffortError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<u8>() {
            Ok(parsed_value) => Effort::new(parsed_value),
            Err(_) => Err(EffortError::ParseError),
        }
    }
}

impl fmt::Display for Effort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum EffortError {
    #[error("Effort must be in the range 1 to 5")]
    OutOfRange,
    #[error("Effort must be an integer")]
    ParseError,
}
