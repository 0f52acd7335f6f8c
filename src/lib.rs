//! Rulebind – custom built-in predicates for rule engines.
//!
//! A rule engine searching for variable bindings usually knows how to evaluate
//! its own built-ins. Rulebind lets user supplied functions take part in that
//! search as well, over a domain where a value is either an opaque *entity* or
//! a typed *scalar* literal:
//! * A [`value::Value`] is either a [`value::Entity`] or a [`value::Scalar`].
//! * An [`construct::Atom`] is a predicate applied to variables and constants.
//! * A [`construct::Binding`] maps variables to values during the search.
//! * A [`builtin::BuiltInFunction`] is the pluggable predicate itself.
//! * A [`helper::BindingHelper`] adapts one function to one atom occurrence and
//!   is what the engine actually drives.
//!
//! ## Modules
//! * [`value`] – Entities, scalars and scalar types.
//! * [`construct`] – Variables, atoms and bindings.
//! * [`builtin`] – The function contract, the evaluation context and its clock.
//! * [`helper`] – The binding protocol state machine.
//! * [`registry`] – The table of built-ins, including a process-wide instance.
//! * [`functions`] – Ready-made built-ins (`IRIparts`, `thisYear`).
//! * [`session`] – A minimal in-order driver that aborts on contract violations.
//! * [`settings`] – Layered configuration and logging setup.
//!
//! ## The Protocol
//! The engine asks a helper which variables it can bind given the bound ones
//! ([`helper::BindingAdapter::bindable_vars`]) and which must be bound first
//! ([`helper::BindingAdapter::prerequisite_vars`]). When the atom is reached it
//! calls `rebind`, which evaluates the function once for the current binding,
//! then `select_next_binding`, which yields the single candidate exactly once,
//! and finally `set_current_binding`, which writes the newly bound variables.
//!
//! A function that writes into an argument that was already bound breaks the
//! contract. This is reported as [`RulebindError::Overwrite`] and must end the
//! evaluation, whereas a function simply returning `false` only ends the
//! current candidate.
//!
//! ## Variables
//! Engines often keep separate identifier spaces for entity and scalar
//! variables. Here a [`construct::Variable`] is one logical key whose kind is
//! only a hint: lookups succeed whichever space it is tagged with, and a value
//! is filed under the kind that matches it when committed.
//!
//! ## Quick Start
//! ```
//! use rulebind::construct::{Atom, Binding, Variable};
//! use rulebind::functions::IriParts;
//! use rulebind::helper::BindingAdapter;
//! use rulebind::registry::Registry;
//! use rulebind::value::Value;
//!
//! let registry = Registry::new();
//! registry.register("urn:example#IRIparts", IriParts).unwrap();
//! let atom = Atom::new("urn:example#IRIparts", vec![
//!     Variable::scalar("x").into(),
//!     Value::string("#").into(),
//!     Variable::scalar("ns").into(),
//!     Variable::scalar("local").into(),
//! ]);
//! let mut helper = registry.create_helper(atom).unwrap();
//! let mut binding = Binding::default();
//! binding.set(&Variable::scalar("x"), Value::entity("http://example.org/people#Martin")).unwrap();
//! assert!(helper.rebind(&binding).unwrap());
//! assert!(helper.select_next_binding());
//! helper.set_current_binding(&mut binding).unwrap();
//! assert_eq!(binding.get(&Variable::scalar("local")), Some(&Value::string("Martin")));
//! ```

pub mod builtin;
pub mod construct;
pub mod error;
pub mod functions;
pub mod helper;
pub mod registry;
pub mod session;
pub mod settings;
pub mod value;

pub use error::{Result, RulebindError};
