//! A minimal evaluation session that drives binding helpers the way a host
//! rule engine does, one atom after the other in the given order.
//!
//! Function failures and atoms that cannot fire simply end the current
//! candidate (`Ok(None)`). Contract violations abort the session: the error
//! is returned and every later evaluation is refused.

use std::sync::Arc;

use tracing::{debug, error};

use crate::builtin::Context;
use crate::construct::{Atom, Binding};
use crate::error::{Result, RulebindError};
use crate::helper::BindingAdapter;
use crate::registry::Registry;

pub struct Session<'r> {
    registry: &'r Registry,
    context: Arc<Context>,
    aborted: Option<String>,
}

impl<'r> Session<'r> {
    /// Starting a session ends the registration phase of `registry`.
    pub fn new(registry: &'r Registry, context: Arc<Context>) -> Self {
        registry.seal();
        Self {
            registry,
            context,
            aborted: None,
        }
    }
    pub fn context(&self) -> Arc<Context> {
        Arc::clone(&self.context)
    }
    /// An empty binding carrying the session context.
    pub fn binding(&self) -> Binding {
        Binding::new(self.context())
    }
    pub fn is_aborted(&self) -> bool {
        self.aborted.is_some()
    }
    pub fn evaluate(&mut self, atoms: &[Atom], binding: Binding) -> Result<Option<Binding>> {
        if let Some(reason) = &self.aborted {
            return Err(RulebindError::Aborted(reason.clone()));
        }
        match self.run(atoms, binding) {
            Err(e) if e.is_fatal() => {
                error!(error = %e, "aborting evaluation");
                self.aborted = Some(e.to_string());
                Err(e)
            }
            result => result,
        }
    }
    fn run(&self, atoms: &[Atom], mut binding: Binding) -> Result<Option<Binding>> {
        for atom in atoms {
            let mut helper = self.registry.create_helper(atom.clone())?;
            let bound = binding.variables();
            if !helper.is_applicable(&bound) {
                debug!(atom = %atom, "not applicable to the bound variables");
                return Ok(None);
            }
            if !helper.rebind(&binding)? {
                return Ok(None);
            }
            while helper.select_next_binding() {
                helper.set_current_binding(&mut binding)?;
            }
        }
        Ok(Some(binding))
    }
}
