//! Table of custom built-ins, keyed by the identifier rules use to refer to them.
//!
//! Registration belongs to the initialisation phase of a process or session.
//! Once a [`Registry`] is sealed (which [`crate::session::Session::new`] does)
//! further registrations are refused, so the table never changes while an
//! evaluation is running. A process-wide instance is available through
//! [`global`] together with the free functions [`register`] and
//! [`create_helper`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use lazy_static::lazy_static;
use tracing::{debug, info};

use crate::builtin::BuiltInFunction;
use crate::construct::{Atom, OtherHasher};
use crate::error::{Result, RulebindError};
use crate::helper::BindingHelper;

type Functions = HashMap<String, Arc<dyn BuiltInFunction>, OtherHasher>;

lazy_static! {
    static ref GLOBAL: Registry = Registry::new();
}

pub struct Registry {
    functions: RwLock<Functions>,
    sealed: AtomicBool,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            functions: RwLock::new(Functions::default()),
            sealed: AtomicBool::new(false),
        }
    }
    /// Registers `function` under `function_id`, replacing and returning any
    /// function previously registered under the same identifier.
    pub fn register<F>(&self, function_id: &str, function: F) -> Result<Option<Arc<dyn BuiltInFunction>>>
    where
        F: BuiltInFunction + 'static,
    {
        self.register_arc(function_id, Arc::new(function))
    }
    pub fn register_arc(
        &self,
        function_id: &str,
        function: Arc<dyn BuiltInFunction>,
    ) -> Result<Option<Arc<dyn BuiltInFunction>>> {
        if self.is_sealed() {
            return Err(RulebindError::Protocol(format!(
                "cannot register {} once evaluation has started",
                function_id
            )));
        }
        let previous = self
            .functions
            .write()
            .map_err(|e| RulebindError::Lock(e.to_string()))?
            .insert(function_id.to_string(), function);
        info!(function = function_id, replaced = previous.is_some(), "registered built-in");
        Ok(previous)
    }
    pub fn lookup(&self, function_id: &str) -> Result<Option<Arc<dyn BuiltInFunction>>> {
        let functions = self
            .functions
            .read()
            .map_err(|e| RulebindError::Lock(e.to_string()))?;
        Ok(functions.get(function_id).map(Arc::clone))
    }
    pub fn contains(&self, function_id: &str) -> Result<bool> {
        Ok(self.lookup(function_id)?.is_some())
    }
    /// Builds a fresh helper for one occurrence of `atom` in a rule.
    pub fn create_helper(&self, atom: Atom) -> Result<BindingHelper> {
        let function = self
            .lookup(atom.predicate())?
            .ok_or_else(|| RulebindError::UnknownBuiltIn(atom.predicate().to_string()))?;
        debug!(atom = %atom, "creating binding helper");
        Ok(BindingHelper::new(atom, function))
    }
    pub fn seal(&self) {
        if !self.sealed.swap(true, Ordering::SeqCst) {
            debug!("registry sealed");
        }
    }
    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::SeqCst)
    }
    pub fn len(&self) -> Result<usize> {
        let functions = self
            .functions
            .read()
            .map_err(|e| RulebindError::Lock(e.to_string()))?;
        Ok(functions.len())
    }
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

pub fn global() -> &'static Registry {
    &GLOBAL
}

pub fn register<F>(function_id: &str, function: F) -> Result<Option<Arc<dyn BuiltInFunction>>>
where
    F: BuiltInFunction + 'static,
{
    GLOBAL.register(function_id, function)
}

pub fn create_helper(atom: Atom) -> Result<BindingHelper> {
    GLOBAL.create_helper(atom)
}
