//! The contract a custom predicate implements in order to take part in
//! variable binding.
//!
//! A [`BuiltInFunction`] is asked two things by the binding machinery:
//! * whether it can produce values for the unbound argument positions given
//!   which positions are already bound ([`BuiltInFunction::is_applicable`]), and
//! * to compute those values for one concrete assignment
//!   ([`BuiltInFunction::apply`]).
//!
//! Functions that only ever see scalars can implement the narrower
//! [`ScalarFunction`] and be wrapped in [`ScalarOnly`].

use std::fmt;
use std::sync::Arc;

// used for the evaluation clock
use chrono::{Local, NaiveDateTime};

use crate::value::{Scalar, Value};

// ------------- Clock -------------
pub trait Clock: fmt::Debug + Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;
impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);
impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

// ------------- Context -------------
/// Evaluation context handed to every [`BuiltInFunction::apply`] call.
#[derive(Debug, Clone)]
pub struct Context {
    clock: Arc<dyn Clock>,
}
impl Context {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
    pub fn fixed(now: NaiveDateTime) -> Self {
        Self::new(Arc::new(FixedClock(now)))
    }
    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }
}
impl Default for Context {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

// ------------- Functions -------------
pub trait BuiltInFunction: Send + Sync {
    /// Decides from the boundness pattern alone (one flag per argument,
    /// constants count as bound) whether the function can bind the rest.
    /// Must be pure and must not depend on actual values.
    fn is_applicable(&self, bound_positions: &[bool]) -> bool;

    /// Computes the function for one assignment. `args` has one slot per
    /// argument, `None` for unbound positions. On success the empty slots
    /// are filled and `true` is returned; pre-filled slots must be left as
    /// they are. Returns `false` when the inputs do not satisfy the function.
    fn apply(&self, context: &Context, args: &mut [Option<Value>]) -> bool;
}

/// A function defined over scalar literals only.
pub trait ScalarFunction: Send + Sync {
    fn is_applicable(&self, bound_positions: &[bool]) -> bool;
    fn apply(&self, context: &Context, args: &mut [Option<Scalar>]) -> bool;
}

/// Adapts a [`ScalarFunction`] to the general contract. Any call where a
/// bound argument is an entity fails without reaching the wrapped function.
#[derive(Debug, Clone)]
pub struct ScalarOnly<F>(pub F);

impl<F: ScalarFunction> BuiltInFunction for ScalarOnly<F> {
    fn is_applicable(&self, bound_positions: &[bool]) -> bool {
        self.0.is_applicable(bound_positions)
    }
    fn apply(&self, context: &Context, args: &mut [Option<Value>]) -> bool {
        let mut scalars = Vec::with_capacity(args.len());
        for arg in args.iter() {
            match arg {
                None => scalars.push(None),
                Some(Value::Scalar(scalar)) => scalars.push(Some(scalar.clone())),
                Some(Value::Entity(_)) => return false,
            }
        }
        if !self.0.apply(context, &mut scalars) {
            return false;
        }
        // copied back wholesale so that a rewritten argument is still noticed
        for (slot, scalar) in args.iter_mut().zip(scalars) {
            *slot = scalar.map(Value::Scalar);
        }
        true
    }
}
