//! Adapter that lets a [`BuiltInFunction`] take part in a rule engine's
//! binding search.
//!
//! The host engine creates one [`BindingHelper`] per atom occurrence and
//! drives it synchronously, always in the same order:
//!
//! ```text
//! rebind -> [select_next_binding -> set_current_binding]* -> (rebind | drop)
//! ```
//!
//! A built-in function is evaluated exactly once per `rebind` and contributes
//! at most one candidate binding, so the cursor behind
//! [`BindingHelper::select_next_binding`] is a single flag rather than an
//! iterator. A helper is never shared between search branches; a branch that
//! needs independent exploration creates its own.

use std::fmt;
use std::sync::Arc;

// used for logging protocol transitions and failures
use tracing::{debug, error, warn};

// used for argument snapshots in failure reports
use serde::Serialize;

use crate::builtin::BuiltInFunction;
use crate::construct::{Atom, Binding, Variable, VariableSet};
use crate::error::{Result, RulebindError};
use crate::value::Value;

/// The contract a host engine uses to drive a custom predicate uniformly with
/// its native built-ins.
pub trait BindingAdapter {
    /// Whether the predicate can fire when `bound` are the bound variables.
    fn is_applicable(&self, bound: &VariableSet) -> bool;
    /// Variables the predicate would additionally bind, empty when it cannot fire.
    fn bindable_vars(&self, bound: &VariableSet) -> VariableSet;
    /// Variables that must be bound before the predicate can fire.
    fn prerequisite_vars(&self, bound: &VariableSet) -> VariableSet;
    /// Evaluates the predicate against `binding`. `Ok(false)` is a plain
    /// function failure, an `Err` is fatal for the whole evaluation.
    fn rebind(&mut self, binding: &Binding) -> Result<bool>;
    fn select_next_binding(&mut self) -> bool;
    fn set_current_binding(&mut self, target: &mut Binding) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelperState {
    Idle,
    Pending,
    Consumed,
}

/// Report of an `apply` call that returned `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionFailure {
    function: String,
    arguments: Vec<Option<Value>>,
}
impl FunctionFailure {
    pub fn new(function: impl Into<String>, arguments: Vec<Option<Value>>) -> Self {
        Self {
            function: function.into(),
            arguments,
        }
    }
    pub fn function(&self) -> &str {
        &self.function
    }
    pub fn arguments(&self) -> &[Option<Value>] {
        &self.arguments
    }
    pub fn snapshot(&self) -> String {
        serde_json::to_string(&self.arguments).unwrap_or_else(|e| e.to_string())
    }
}
impl fmt::Display for FunctionFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let arguments: Vec<String> = self
            .arguments
            .iter()
            .map(|a| a.as_ref().map_or("unbound".to_string(), |v| v.to_string()))
            .collect();
        write!(f, "{} [{}]", self.function, arguments.join(", "))
    }
}

// ------------- BindingHelper -------------
pub struct BindingHelper {
    atom: Atom,
    function: Arc<dyn BuiltInFunction>,
    pending: Option<Vec<(Variable, Value)>>,
    used: bool,     // the pending binding has been handed out
    selected: bool, // set_current_binding is allowed
    last_failure: Option<FunctionFailure>,
}

impl BindingHelper {
    pub fn new(atom: Atom, function: Arc<dyn BuiltInFunction>) -> Self {
        Self {
            atom,
            function,
            pending: None,
            used: false,
            selected: false,
            last_failure: None,
        }
    }
    pub fn atom(&self) -> &Atom {
        &self.atom
    }
    pub fn state(&self) -> HelperState {
        match (&self.pending, self.used) {
            (None, _) => HelperState::Idle,
            (Some(_), false) => HelperState::Pending,
            (Some(_), true) => HelperState::Consumed,
        }
    }
    pub fn pending(&self) -> Option<&[(Variable, Value)]> {
        self.pending.as_deref()
    }
    /// Why the latest `rebind` returned `false`, if it did.
    pub fn last_failure(&self) -> Option<&FunctionFailure> {
        self.last_failure.as_ref()
    }
    // The failure report only ever describes the most recent rebind.
    fn reset(&mut self) {
        self.pending = None;
        self.used = false;
        self.selected = false;
        self.last_failure = None;
    }
    fn fail(&mut self, arguments: Vec<Option<Value>>) -> Result<bool> {
        let failure = FunctionFailure::new(self.atom.predicate(), arguments);
        warn!(
            function = %self.atom.predicate(),
            atom = %self.atom,
            arguments = %failure.snapshot(),
            "function failure"
        );
        self.last_failure = Some(failure);
        Ok(false)
    }
    // Compares the slots before and after apply and collects what was filled in.
    fn collect(
        &self,
        before: &[Option<Value>],
        after: Vec<Option<Value>>,
    ) -> Result<Option<Vec<(Variable, Value)>>> {
        let mut entries: Vec<(Variable, Value)> = Vec::new();
        let slots = self.atom.arguments().iter().zip(before.iter().zip(after));
        for (position, (argument, (pre, post))) in slots.enumerate() {
            match (pre, post) {
                (Some(pre), post) => {
                    if post.as_ref() != Some(pre) {
                        return Err(RulebindError::Overwrite {
                            function: self.atom.predicate().to_string(),
                            position,
                            before: pre.to_string(),
                            after: post.map_or("unbound".to_string(), |v| v.to_string()),
                        });
                    }
                }
                (None, None) => {
                    return Err(RulebindError::UnknownValueKind(format!(
                        "{} succeeded but left argument {} unbound",
                        self.atom.predicate(),
                        position
                    )));
                }
                (None, Some(value)) => {
                    let Some(variable) = argument.variable() else {
                        return Err(RulebindError::Protocol(format!(
                            "constant argument {} of {} resolved to nothing",
                            position, self.atom
                        )));
                    };
                    match entries.iter().find(|(v, _)| v == variable) {
                        // the same variable got two different values
                        Some((_, existing)) if *existing != value => return Ok(None),
                        Some(_) => (),
                        None => entries.push((variable.clone(), value)),
                    }
                }
            }
        }
        Ok(Some(entries))
    }
}

impl BindingAdapter for BindingHelper {
    fn is_applicable(&self, bound: &VariableSet) -> bool {
        self.function.is_applicable(&self.atom.boundness(bound))
    }

    fn bindable_vars(&self, bound: &VariableSet) -> VariableSet {
        if !self.is_applicable(bound) {
            return VariableSet::default();
        }
        self.atom
            .variables()
            .into_iter()
            .filter(|v| !bound.contains(v))
            .collect()
    }

    fn prerequisite_vars(&self, bound: &VariableSet) -> VariableSet {
        let bindable = self.bindable_vars(bound);
        self.atom
            .variables()
            .into_iter()
            .filter(|v| !bindable.contains(v))
            .collect()
    }

    fn rebind(&mut self, binding: &Binding) -> Result<bool> {
        self.reset();
        let before = self.atom.resolve(binding);
        let mut after = before.clone();
        if !self.function.apply(binding.context(), &mut after) {
            return self.fail(before);
        }
        match self.collect(&before, after) {
            Ok(Some(entries)) => {
                debug!(atom = %self.atom, filled = entries.len(), "pending binding");
                self.pending = Some(entries);
                Ok(true)
            }
            Ok(None) => self.fail(before),
            Err(e) => {
                error!(atom = %self.atom, error = %e, "built-in broke the binding contract");
                Err(e)
            }
        }
    }

    fn select_next_binding(&mut self) -> bool {
        self.selected = self.pending.is_some() && !self.used;
        if self.selected {
            self.used = true;
        }
        self.selected
    }

    fn set_current_binding(&mut self, target: &mut Binding) -> Result<()> {
        if !self.selected {
            return Err(RulebindError::Protocol(format!(
                "no binding of {} has been selected",
                self.atom
            )));
        }
        self.selected = false;
        let Some(entries) = self.pending.as_ref() else {
            return Err(RulebindError::Protocol(format!(
                "selected binding of {} is gone",
                self.atom
            )));
        };
        // reconcile everything before writing so a bad entry leaves the target untouched
        let mut reconciled = Vec::with_capacity(entries.len());
        for (variable, value) in entries {
            reconciled.push((Binding::reconcile(variable, value)?, value.clone()));
        }
        for (variable, value) in reconciled {
            debug!(variable = %variable, kind = %variable.kind(), value = %value, "commit");
            target.set(&variable, value)?;
        }
        Ok(())
    }
}
