use anyhow::{bail, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum RangeOp {
    LessThan(f64),
    LessEqual(f64),
    GreaterThan(f64),
    GreaterEqual(f64),
    Equal(f64),
    Between(f64, f64), // Inclusive range: N-M
}

impl RangeOp {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(val) = s.strip_prefix(">=") {
            Ok(RangeOp::GreaterEqual(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix("<=") {
            Ok(RangeOp::LessEqual(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix('>') {
            Ok(RangeOp::GreaterThan(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix('<') {
            Ok(RangeOp::LessThan(val.trim().parse()?))
        } else if s.contains('-') && !s.starts_with('-') {
            // Range format: "15-50"
            let parts: Vec<&str> = s.split('-').collect();
            if parts.len() == 2 {
                let low: f64 = parts[0].trim().parse()?;
                let high: f64 = parts[1].trim().parse()?;
                if low > high {
                    bail!("Range start {} is above range end {}", low, high)
                }
                Ok(RangeOp::Between(low, high))
            } else {
                bail!("Invalid range format: {}", s)
            }
        } else {
            Ok(RangeOp::Equal(s.parse()?))
        }
    }

    pub fn matches(&self, value: f64) -> bool {
        match self {
            RangeOp::LessThan(n) => value < *n,
            RangeOp::LessEqual(n) => value <= *n,
            RangeOp::GreaterThan(n) => value > *n,
            RangeOp::GreaterEqual(n) => value >= *n,
            RangeOp::Equal(n) => value == *n,
            RangeOp::Between(low, high) => value >= *low && value <= *high,
        }
    }
}

/// A raw-value to score mapping.
///
/// Curves are written in config as `linear A..B` or `inverse A..B`. Bucket
/// curves come from a `buckets` list instead of a string. The returned score
/// is not clamped; the engine clamps it to 0-100.
#[derive(Debug, Clone, PartialEq)]
pub enum Curve {
    /// `A` scores 0, `B` scores 100, linear in between and beyond.
    Linear { from: f64, to: f64 },
    /// `A` scores 100, `B` scores 0.
    Inverse { from: f64, to: f64 },
    /// First matching range wins; no match scores 0.
    Buckets(Vec<(RangeOp, f64)>),
}

impl Curve {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let (kind, bounds) = match s.split_once(char::is_whitespace) {
            Some((kind, bounds)) => (kind, bounds.trim()),
            None => bail!("Curve must look like 'linear A..B' or 'inverse A..B': {}", s),
        };

        let Some((from, to)) = bounds.split_once("..") else {
            bail!("Curve bounds must be written as A..B: {}", bounds)
        };
        let from: f64 = from.trim().parse()?;
        let to: f64 = to.trim().parse()?;
        if from == to {
            bail!("Curve bounds must differ: {}", bounds)
        }

        match kind {
            "linear" => Ok(Curve::Linear { from, to }),
            "inverse" => Ok(Curve::Inverse { from, to }),
            other => bail!("Unknown curve kind '{}' (expected linear or inverse)", other),
        }
    }

    /// Build a bucket curve from `(range, score)` pairs as written in config.
    pub fn buckets<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut buckets = Vec::new();
        for (range, score) in pairs {
            if !score.is_finite() {
                bail!("Bucket score for '{}' must be a finite number", range)
            }
            buckets.push((RangeOp::parse(range)?, score));
        }
        if buckets.is_empty() {
            bail!("Bucket curve needs at least one bucket")
        }
        Ok(Curve::Buckets(buckets))
    }

    pub fn score(&self, value: f64) -> f64 {
        match self {
            Curve::Linear { from, to } => (value - from) / (to - from) * 100.0,
            Curve::Inverse { from, to } => 100.0 - (value - from) / (to - from) * 100.0,
            Curve::Buckets(buckets) => buckets
                .iter()
                .find(|(range, _)| range.matches(value))
                .map(|(_, score)| *score)
                .unwrap_or(0.0),
        }
    }
}
