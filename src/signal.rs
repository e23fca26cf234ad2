/*!
The IEEE 754 exception taxonomy and the handler kinds a [`crate::context::Context`]
can register against it.

Signal classes form a linear hierarchy (each class has at most one parent,
walked towards the root [`SignalClass::IEEEError`]); handler lookup walks
from the most specific class raised towards the root and uses the first
registered handler it finds.
*/

/// An IEEE 754 exception class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignalClass {
    /// Root of the hierarchy; never raised directly.
    IEEEError,

    Invalid,
    SignallingNaNOperand,
    InvalidAdd,
    InvalidMultiply,
    InvalidDivide,
    InvalidFMA,
    InvalidRemainder,
    InvalidSqrt,
    InvalidToString,
    InvalidConvertToInteger,
    InvalidComparison,
    InvalidLogBIntegral,

    DivisionByZero,
    DivideByZero,
    LogBZero,

    Inexact,

    Overflow,

    Underflow,
    UnderflowExact,
    UnderflowInexact,
}

impl SignalClass {
    /// The immediate parent in the hierarchy, or `None` at the root.
    pub fn parent(self) -> Option<SignalClass> {
        use SignalClass::*;
        match self {
            IEEEError => None,

            Invalid => Some(IEEEError),
            SignallingNaNOperand | InvalidAdd | InvalidMultiply | InvalidDivide | InvalidFMA
            | InvalidRemainder | InvalidSqrt | InvalidToString | InvalidConvertToInteger
            | InvalidComparison | InvalidLogBIntegral => Some(Invalid),

            DivisionByZero => Some(IEEEError),
            DivideByZero | LogBZero => Some(DivisionByZero),

            Inexact => Some(IEEEError),
            Overflow => Some(IEEEError),

            Underflow => Some(IEEEError),
            UnderflowExact | UnderflowInexact => Some(Underflow),
        }
    }

    /// Walk this class and its ancestors, most specific first.
    pub fn ancestors(self) -> impl Iterator<Item = SignalClass> {
        std::iter::successors(Some(self), |c| c.parent())
    }

    /// The status flag this class (or an ancestor) raises by default, if any.
    /// `Underflow`'s flag is only raised by the *inexact* subclass; the
    /// exact subclass raises nothing (see `ieee754.py`'s underflow_pre/post
    /// split, collapsed here into `UnderflowExact`/`UnderflowInexact`).
    pub fn default_flag(self) -> Option<StatusFlag> {
        use SignalClass::*;
        match self {
            UnderflowExact => None,
            UnderflowInexact => Some(StatusFlag::Underflow),
            Underflow => None,
            c if c.ancestors().any(|a| a == Invalid) || c == Invalid => Some(StatusFlag::Invalid),
            c if c.ancestors().any(|a| a == DivisionByZero) || c == DivisionByZero => {
                Some(StatusFlag::DivisionByZero)
            }
            Inexact => Some(StatusFlag::Inexact),
            Overflow => Some(StatusFlag::Overflow),
            IEEEError => None,
        }
    }
}

/// The five IEEE 754 status flags, recorded as a sticky bit each in a
/// [`crate::context::Context`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusFlag {
    Invalid,
    DivisionByZero,
    Overflow,
    Underflow,
    Inexact,
}

/// How a [`crate::context::Context`] reacts when a particular [`SignalClass`]
/// is raised.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum HandlerKind {
    /// Raise the flag and return the signal's default result. The initial
    /// state of every signal class.
    #[default]
    Default,
    /// Return the default result without raising the flag.
    NoFlag,
    /// Equivalent to `Default` for this crate (some IEEE bindings
    /// distinguish the two for hardware trap semantics; this crate does
    /// not implement hardware traps, so they coincide).
    MaybeFlag,
    /// Raise the flag, return the default result, and additionally append
    /// the signal to `Context`'s exception log.
    RecordException,
    /// Only valid for leaf classes with a substitutable numeric result.
    /// The callback replaces the default result.
    SubstituteValue,
    /// Only valid for `InvalidMultiply`/`InvalidDivide` and their kin: the
    /// callback's result sign is XORed with the operands' unless the
    /// callback itself produced a NaN.
    SubstituteValueXor,
    /// Only valid for `Underflow`'s subclasses: substitute +/-0 or the
    /// smallest normal, depending on rounding mode, then cascade into
    /// `Inexact`.
    AbruptUnderflow,
    /// Propagate the signal to the caller as `Err(SignalRaised)` instead of
    /// returning a value.
    Raise,
}

impl HandlerKind {
    /// Whether this handler kind is a legal registration for `class`.
    /// Mirrors `ieee754.py`'s eager `TypeError`/`ValueError` checks at
    /// handler-registration time rather than deferring to first use.
    pub fn compatible_with(&self, class: SignalClass) -> bool {
        use SignalClass::*;
        match self {
            HandlerKind::SubstituteValueXor => matches!(class, InvalidMultiply | InvalidDivide),
            HandlerKind::AbruptUnderflow => matches!(class, Underflow | UnderflowExact | UnderflowInexact),
            _ => true,
        }
    }
}

/// A raised exception: which class, and a short description of the
/// condition (operands are not retained, matching `ieee754.py`'s
/// exceptions, which carry only the name of the failing operation).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signal {
    pub class: SignalClass,
    pub message: String,
}

impl Signal {
    pub fn new(class: SignalClass, message: impl Into<String>) -> Self {
        Signal {
            class,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.class, self.message)
    }
}

/// The error returned when a signal's handler kind is [`HandlerKind::Raise`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalRaised(pub Signal);

impl std::fmt::Display for SignalRaised {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "signal raised: {}", self.0)
    }
}

impl std::error::Error for SignalRaised {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ancestors_walk_to_root() {
        let chain: Vec<_> = SignalClass::InvalidAdd.ancestors().collect();
        assert_eq!(
            chain,
            vec![SignalClass::InvalidAdd, SignalClass::Invalid, SignalClass::IEEEError]
        );
    }

    #[test]
    fn divide_by_zero_flag() {
        assert_eq!(SignalClass::DivideByZero.default_flag(), Some(StatusFlag::DivisionByZero));
    }

    #[test]
    fn xor_handler_only_compatible_with_mul_div() {
        assert!(HandlerKind::SubstituteValueXor.compatible_with(SignalClass::InvalidMultiply));
        assert!(!HandlerKind::SubstituteValueXor.compatible_with(SignalClass::InvalidAdd));
    }

    #[test]
    fn abrupt_underflow_only_compatible_with_underflow() {
        assert!(HandlerKind::AbruptUnderflow.compatible_with(SignalClass::UnderflowInexact));
        assert!(!HandlerKind::AbruptUnderflow.compatible_with(SignalClass::Overflow));
    }
}
