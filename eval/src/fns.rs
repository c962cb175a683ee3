//! Standard mathematical functions shared by the bundled evaluators.

use num_traits::{Float, NumCast};

use core::fmt;

use crate::{alloc::ToOwned, ErrorKind};
use shunt_parser::{FnArity, Function};

/// Standard mathematical function.
///
/// Functions operate on floating-point numbers. A `NaN` result is treated as an error
/// (e.g., `ln(-1)` or `asin(2)`); infinite results are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum MathFn {
    /// Absolute value.
    Abs,
    /// Arc cosine.
    Acos,
    /// Arc sine.
    Asin,
    /// Arc tangent.
    Atan,
    /// Average of one or more args.
    Avg,
    /// Smallest integer greater than or equal to the arg.
    Ceil,
    /// Cosine of an angle in radians.
    Cos,
    /// Hyperbolic cosine.
    Cosh,
    /// Largest integer less than or equal to the arg.
    Floor,
    /// Natural logarithm.
    Ln,
    /// Decimal logarithm.
    Log,
    /// Maximum of one or more args.
    Max,
    /// Minimum of one or more args.
    Min,
    /// Closest integer, with halves rounded up (`round(-2.5) == -2`).
    Round,
    /// Sine of an angle in radians.
    Sin,
    /// Hyperbolic sine.
    Sinh,
    /// Sum of one or more args.
    Sum,
    /// Tangent of an angle in radians.
    Tan,
    /// Hyperbolic tangent.
    Tanh,
    /// Pseudo-random number in `[0, 1)`.
    #[cfg(feature = "random")]
    #[cfg_attr(docsrs, doc(cfg(feature = "random")))]
    Random,
}

impl fmt::Display for MathFn {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

impl MathFn {
    /// All functions, in the order they are registered by the bundled evaluators.
    pub const ALL: &'static [Self] = &[
        Self::Sin,
        Self::Cos,
        Self::Tan,
        Self::Asin,
        Self::Acos,
        Self::Atan,
        Self::Sinh,
        Self::Cosh,
        Self::Tanh,
        Self::Min,
        Self::Max,
        Self::Sum,
        Self::Avg,
        Self::Ln,
        Self::Log,
        Self::Round,
        Self::Ceil,
        Self::Floor,
        Self::Abs,
        #[cfg(feature = "random")]
        Self::Random,
    ];

    /// Returns the canonical name of this function.
    pub fn name(self) -> &'static str {
        match self {
            Self::Abs => "abs",
            Self::Acos => "acos",
            Self::Asin => "asin",
            Self::Atan => "atan",
            Self::Avg => "avg",
            Self::Ceil => "ceil",
            Self::Cos => "cos",
            Self::Cosh => "cosh",
            Self::Floor => "floor",
            Self::Ln => "ln",
            Self::Log => "log",
            Self::Max => "max",
            Self::Min => "min",
            Self::Round => "round",
            Self::Sin => "sin",
            Self::Sinh => "sinh",
            Self::Sum => "sum",
            Self::Tan => "tan",
            Self::Tanh => "tanh",
            #[cfg(feature = "random")]
            Self::Random => "random",
        }
    }

    /// Returns the accepted number of args.
    pub fn arity(self) -> FnArity {
        match self {
            Self::Avg | Self::Max | Self::Min | Self::Sum => FnArity::at_least(1),
            #[cfg(feature = "random")]
            Self::Random => FnArity::exact(0),
            _ => FnArity::exact(1),
        }
    }

    /// Creates a function descriptor with the canonical name and arity, tagged with `kind`.
    pub fn definition<K>(self, kind: K) -> Function<K> {
        Function::new(self.name(), self.arity(), kind)
    }

    /// Applies this function to `args`.
    pub fn apply<T: Float>(self, args: &[T]) -> Result<T, ErrorKind> {
        let arity = self.arity();
        if !arity.accepts(args.len()) {
            return Err(ErrorKind::ArityMismatch {
                name: self.name().to_owned(),
                expected: arity,
                actual: args.len(),
            });
        }

        let result = match self {
            Self::Abs => args[0].abs(),
            Self::Acos => args[0].acos(),
            Self::Asin => args[0].asin(),
            Self::Atan => args[0].atan(),
            Self::Ceil => args[0].ceil(),
            Self::Cos => args[0].cos(),
            Self::Cosh => args[0].cosh(),
            Self::Floor => args[0].floor(),
            Self::Ln => args[0].ln(),
            Self::Log => args[0].log10(),
            Self::Round => round_half_up(args[0]),
            Self::Sin => args[0].sin(),
            Self::Sinh => args[0].sinh(),
            Self::Tan => args[0].tan(),
            Self::Tanh => args[0].tanh(),

            Self::Max => args.iter().copied().fold(args[0], T::max),
            Self::Min => args.iter().copied().fold(args[0], T::min),
            Self::Sum => args.iter().copied().fold(T::zero(), |acc, x| acc + x),
            Self::Avg => {
                let sum = args.iter().copied().fold(T::zero(), |acc, x| acc + x);
                sum / cast(args.len())?
            }

            #[cfg(feature = "random")]
            Self::Random => cast(rand::random::<f64>())?,
        };

        if result.is_nan() {
            Err(ErrorKind::host_message(format!(
                "Invalid argument passed to `{}`",
                self.name()
            )))
        } else {
            Ok(result)
        }
    }
}

fn cast<T: Float, U: NumCast>(value: U) -> Result<T, ErrorKind> {
    T::from(value).ok_or_else(|| ErrorKind::host_message("Numeric value is out of range"))
}

fn round_half_up<T: Float>(value: T) -> T {
    if value.is_infinite() {
        value
    } else {
        let half = T::one() / (T::one() + T::one());
        let floor = value.floor();
        if value - floor >= half {
            floor + T::one()
        } else {
            floor
        }
    }
}
