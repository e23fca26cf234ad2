/*!
[`Context`]: rounding mode, sticky status flags, and the per-signal-class
handler table that arithmetic operations consult when they raise a signal.

Grounded on `ieee754.py`'s `Context` class and the module-level
`get_context`/`set_context`/`LocalContext` (thread-local current context
and scoped-acquisition guard).
*/

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ProgrammerError;
use crate::round::RoundingMode;
use crate::signal::{HandlerKind, Signal, SignalClass, SignalRaised, StatusFlag};
use crate::value::Binary;

/// Whether tininess (tracked separately from tie-breaking any `Inexact`
/// signal) is computed by inspecting the significand before or after
/// rounding. The two choices can disagree for the one input that rounds
/// exactly up to the smallest normal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TininessDetection {
    BeforeRounding,
    AfterRounding,
}

impl Default for TininessDetection {
    fn default() -> Self {
        TininessDetection::AfterRounding
    }
}

/// The five sticky IEEE 754 status flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Flags {
    pub invalid: bool,
    pub division_by_zero: bool,
    pub overflow: bool,
    pub underflow: bool,
    pub inexact: bool,
}

impl Flags {
    fn raise(&mut self, flag: StatusFlag) {
        match flag {
            StatusFlag::Invalid => self.invalid = true,
            StatusFlag::DivisionByZero => self.division_by_zero = true,
            StatusFlag::Overflow => self.overflow = true,
            StatusFlag::Underflow => self.underflow = true,
            StatusFlag::Inexact => self.inexact = true,
        }
    }
}

/// A substitution callback registered for `HandlerKind::SubstituteValue`
/// or `HandlerKind::SubstituteValueXor`.
pub type SubstituteFn = Arc<dyn Fn(&Signal) -> Binary + Send + Sync>;

#[derive(Clone, Default)]
struct Registration {
    kind: HandlerKind,
    callback: Option<SubstituteFn>,
}

/// The mutable execution context arithmetic operations round and signal
/// under.
#[derive(Clone)]
pub struct Context {
    rounding: RoundingMode,
    flags: Flags,
    tininess: TininessDetection,
    handlers: HashMap<SignalClass, Registration>,
    exceptions: Vec<Signal>,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            rounding: RoundingMode::default(),
            flags: Flags::default(),
            tininess: TininessDetection::default(),
            handlers: HashMap::new(),
            exceptions: Vec::new(),
        }
    }
}

impl Context {
    pub fn new() -> Self {
        Context::default()
    }

    pub fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn tininess_detection(&self) -> TininessDetection {
        self.tininess
    }

    pub fn with_tininess_detection(mut self, tininess: TininessDetection) -> Self {
        self.tininess = tininess;
        self
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn clear_flags(&mut self) {
        self.flags = Flags::default();
    }

    pub fn exceptions(&self) -> &[Signal] {
        &self.exceptions
    }

    /// Register a handler kind (and, where applicable, a substitution
    /// callback) for a signal class. Rejects incompatible
    /// (class, kind) pairs eagerly, matching `ieee754.py`'s registration-time
    /// `TypeError`/`ValueError`.
    pub fn set_handler(
        &mut self,
        class: SignalClass,
        kind: HandlerKind,
        callback: Option<SubstituteFn>,
    ) -> Result<(), ProgrammerError> {
        if !kind.compatible_with(class) {
            return Err(ProgrammerError::bad_argument(format!(
                "handler kind {:?} is not valid for signal class {:?}",
                kind, class
            )));
        }
        let needs_callback = matches!(kind, HandlerKind::SubstituteValue | HandlerKind::SubstituteValueXor);
        if needs_callback && callback.is_none() {
            return Err(ProgrammerError::bad_argument(
                "SubstituteValue/SubstituteValueXor handlers require a callback",
            ));
        }
        self.handlers.insert(class, Registration { kind, callback });
        Ok(())
    }

    fn lookup(&self, class: SignalClass) -> Registration {
        for ancestor in class.ancestors() {
            if let Some(reg) = self.handlers.get(&ancestor) {
                return reg.clone();
            }
        }
        Registration::default()
    }

    /// Raise a signal, returning either the resolved value (default or
    /// substituted) or an error if the registered handler kind is `Raise`.
    ///
    /// `xor_sign` is consulted only for `SubstituteValueXor`: the
    /// substituted value's sign is flipped when it disagrees with the
    /// operand-derived sign, unless the substitute is itself a NaN.
    ///
    /// Not valid for `Underflow`'s subclasses; use [`Context::signal_underflow`]
    /// for those, since `AbruptUnderflow` needs a distinct substitute value.
    pub fn signal(
        &mut self,
        class: SignalClass,
        message: impl Into<String>,
        default: Binary,
        xor_sign: bool,
    ) -> Result<Binary, SignalRaised> {
        let sig = Signal::new(class, message);
        let reg = self.lookup(class);
        log::trace!("signal {:?} dispatched via {:?}", sig.class, reg.kind);

        match reg.kind {
            HandlerKind::Default | HandlerKind::MaybeFlag => {
                if let Some(flag) = class.default_flag() {
                    self.flags.raise(flag);
                }
                Ok(default)
            }
            HandlerKind::NoFlag => Ok(default),
            HandlerKind::RecordException => {
                if let Some(flag) = class.default_flag() {
                    self.flags.raise(flag);
                }
                self.exceptions.push(sig);
                Ok(default)
            }
            HandlerKind::SubstituteValue => {
                let cb = reg.callback.expect("SubstituteValue handler missing callback");
                if let Some(flag) = class.default_flag() {
                    self.flags.raise(flag);
                }
                Ok(cb(&sig))
            }
            HandlerKind::SubstituteValueXor => {
                let cb = reg.callback.expect("SubstituteValueXor handler missing callback");
                if let Some(flag) = class.default_flag() {
                    self.flags.raise(flag);
                }
                let result = cb(&sig);
                if result.is_nan() || result.sign() == xor_sign {
                    Ok(result)
                } else {
                    Ok(result.negate())
                }
            }
            HandlerKind::AbruptUnderflow => {
                // Only reachable if a caller mis-registers AbruptUnderflow
                // against a non-Underflow class; set_handler rejects that
                // at registration time, so this is unreachable in practice.
                self.flags.raise(StatusFlag::Underflow);
                self.flags.raise(StatusFlag::Inexact);
                Ok(default)
            }
            HandlerKind::Raise => Err(SignalRaised(sig)),
        }
    }

    /// Raise a signal that has no numeric result to substitute (comparison
    /// predicates, `logb_integral`, and similar): apply the same handler
    /// dispatch as [`Context::signal`] minus the Binary-valued default/
    /// substitute machinery, which does not apply here.
    pub fn note_signal(&mut self, class: SignalClass, message: impl Into<String>) -> Result<(), SignalRaised> {
        let sig = Signal::new(class, message);
        let reg = self.lookup(class);
        log::trace!("signal {:?} dispatched via {:?}", sig.class, reg.kind);

        match reg.kind {
            HandlerKind::NoFlag => Ok(()),
            HandlerKind::RecordException => {
                if let Some(flag) = class.default_flag() {
                    self.flags.raise(flag);
                }
                self.exceptions.push(sig);
                Ok(())
            }
            HandlerKind::Raise => Err(SignalRaised(sig)),
            _ => {
                if let Some(flag) = class.default_flag() {
                    self.flags.raise(flag);
                }
                Ok(())
            }
        }
    }

    /// Raise an `UnderflowExact`/`UnderflowInexact` signal. `natural` is
    /// the (possibly subnormal) rounded result; `abrupt` is the ±0 or
    /// ±min-normal value `HandlerKind::AbruptUnderflow` substitutes.
    pub fn signal_underflow(
        &mut self,
        class: SignalClass,
        message: impl Into<String>,
        natural: Binary,
        abrupt: Binary,
    ) -> Result<Binary, SignalRaised> {
        debug_assert!(matches!(class, SignalClass::UnderflowExact | SignalClass::UnderflowInexact));
        let sig = Signal::new(class, message);
        let reg = self.lookup(class);
        log::trace!("signal {:?} dispatched via {:?}", sig.class, reg.kind);

        match reg.kind {
            HandlerKind::Default | HandlerKind::MaybeFlag => {
                if let Some(flag) = class.default_flag() {
                    self.flags.raise(flag);
                }
                Ok(natural)
            }
            HandlerKind::NoFlag => Ok(natural),
            HandlerKind::RecordException => {
                if let Some(flag) = class.default_flag() {
                    self.flags.raise(flag);
                }
                self.exceptions.push(sig);
                Ok(natural)
            }
            HandlerKind::SubstituteValue => {
                let cb = reg.callback.expect("SubstituteValue handler missing callback");
                if let Some(flag) = class.default_flag() {
                    self.flags.raise(flag);
                }
                Ok(cb(&sig))
            }
            HandlerKind::AbruptUnderflow => {
                self.flags.raise(StatusFlag::Underflow);
                self.flags.raise(StatusFlag::Inexact);
                Ok(abrupt)
            }
            HandlerKind::Raise => Err(SignalRaised(sig)),
            HandlerKind::SubstituteValueXor => {
                unreachable!("set_handler rejects SubstituteValueXor against Underflow classes")
            }
        }
    }
}

thread_local! {
    static CURRENT: RefCell<Context> = RefCell::new(Context::default());
}

/// A snapshot of the calling thread's current context.
pub fn current() -> Context {
    CURRENT.with(|c| c.borrow().clone())
}

/// Replace the calling thread's current context.
pub fn set(ctx: Context) {
    CURRENT.with(|c| *c.borrow_mut() = ctx);
    log::debug!("thread-local context replaced");
}

/// Mutate the calling thread's current context in place.
pub fn with_current_mut<R>(f: impl FnOnce(&mut Context) -> R) -> R {
    CURRENT.with(|c| f(&mut c.borrow_mut()))
}

/// Scoped acquisition of the thread-local context: installs a copy of
/// `ctx` on construction, restores the previously-installed context when
/// dropped (on every exit path, including unwinding).
pub struct ContextGuard {
    previous: Option<Context>,
}

impl ContextGuard {
    pub fn enter(ctx: Context) -> ContextGuard {
        let previous = current();
        set(ctx);
        ContextGuard { previous: Some(previous) }
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        if let Some(prev) = self.previous.take() {
            set(prev);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_handler_raises_flag() {
        let mut ctx = Context::new();
        let default = Binary::zero(crate::format::BinaryFormat::from_ieee(64).unwrap(), false);
        let result = ctx.signal(SignalClass::DivideByZero, "x/0", default, false);
        assert!(result.is_ok());
        assert!(ctx.flags().division_by_zero);
    }

    #[test]
    fn no_flag_handler_suppresses_flag() {
        let mut ctx = Context::new();
        ctx.set_handler(SignalClass::Inexact, HandlerKind::NoFlag, None).unwrap();
        let default = Binary::zero(crate::format::BinaryFormat::from_ieee(64).unwrap(), false);
        let _ = ctx.signal(SignalClass::Inexact, "rounded", default, false);
        assert!(!ctx.flags().inexact);
    }

    #[test]
    fn raise_handler_returns_error() {
        let mut ctx = Context::new();
        ctx.set_handler(SignalClass::Overflow, HandlerKind::Raise, None).unwrap();
        let default = Binary::zero(crate::format::BinaryFormat::from_ieee(64).unwrap(), false);
        let result = ctx.signal(SignalClass::Overflow, "overflowed", default, false);
        assert!(result.is_err());
    }

    #[test]
    fn incompatible_handler_rejected_at_registration() {
        let mut ctx = Context::new();
        let err = ctx.set_handler(SignalClass::InvalidAdd, HandlerKind::AbruptUnderflow, None);
        assert!(err.is_err());
    }

    #[test]
    fn guard_restores_previous_context_on_drop() {
        set(Context::new().with_rounding(RoundingMode::Ceiling));
        {
            let _guard = ContextGuard::enter(Context::new().with_rounding(RoundingMode::Floor));
            assert_eq!(current().rounding(), RoundingMode::Floor);
        }
        assert_eq!(current().rounding(), RoundingMode::Ceiling);
    }
}
