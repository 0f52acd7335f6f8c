use std::sync::Arc;

use chrono::NaiveDate;
use rulebind::RulebindError;
use rulebind::builtin::{BuiltInFunction, Context, ScalarOnly};
use rulebind::construct::{Atom, Variable};
use rulebind::functions::{IriParts, ThisYear};
use rulebind::registry::{self, Registry};
use rulebind::session::Session;
use rulebind::value::Value;

// Overwrites its only argument.
struct Clobber;
impl BuiltInFunction for Clobber {
    fn is_applicable(&self, _bound_positions: &[bool]) -> bool {
        true
    }
    fn apply(&self, _context: &Context, args: &mut [Option<Value>]) -> bool {
        args[0] = Some(Value::string("clobbered"));
        true
    }
}

fn context_in(year: i32) -> Arc<Context> {
    let now = NaiveDate::from_ymd_opt(year, 1, 15).unwrap().and_hms_opt(8, 30, 0).unwrap();
    Arc::new(Context::fixed(now))
}

fn setup() -> Registry {
    let registry = Registry::new();
    registry.register("urn:t#IRIparts", IriParts).unwrap();
    registry.register("urn:t#thisYear", ScalarOnly(ThisYear)).unwrap();
    registry.register("urn:t#clobber", Clobber).unwrap();
    registry
}

fn split_atom() -> Atom {
    Atom::new(
        "urn:t#IRIparts",
        vec![
            Variable::scalar("x").into(),
            Value::string("#").into(),
            Variable::scalar("ns").into(),
            Variable::scalar("local").into(),
        ],
    )
}

#[test]
fn register_overwrites() {
    let registry = Registry::new();
    assert!(registry.is_empty().unwrap());
    assert!(registry.register("urn:t#f", IriParts).unwrap().is_none());
    assert!(registry.register("urn:t#f", ScalarOnly(ThisYear)).unwrap().is_some());
    assert_eq!(registry.len().unwrap(), 1);
    assert!(!registry.is_empty().unwrap());
    // the replacement is what gets used
    let f = registry.lookup("urn:t#f").unwrap().expect("registered");
    assert!(f.is_applicable(&[false]));
}

#[test]
fn unknown_built_in() {
    let registry = setup();
    let atom = Atom::new("urn:t#missing", vec![Variable::scalar("x").into()]);
    let err = registry.create_helper(atom).err().expect("unknown id");
    assert!(matches!(err, RulebindError::UnknownBuiltIn(_)));
}

#[test]
fn session_seals_registry() {
    let registry = setup();
    assert!(!registry.is_sealed());
    let _session = Session::new(&registry, context_in(2024));
    assert!(registry.is_sealed());
    let err = registry.register("urn:t#late", IriParts).err().expect("sealed");
    assert!(matches!(err, RulebindError::Protocol(_)));
}

#[test]
fn session_evaluates_atoms_in_order() {
    let registry = setup();
    let mut session = Session::new(&registry, context_in(2024));
    let mut binding = session.binding();
    binding.set(&Variable::scalar("x"), Value::entity("http://example.org/people#Martin")).unwrap();
    let atoms = [split_atom(), Atom::new("urn:t#thisYear", vec![Variable::scalar("y").into()])];
    let result = session.evaluate(&atoms, binding).unwrap().expect("both atoms fire");
    assert_eq!(result.get(&Variable::scalar("ns")), Some(&Value::string("http://example.org/people")));
    assert_eq!(result.get(&Variable::scalar("local")), Some(&Value::string("Martin")));
    assert_eq!(result.get(&Variable::scalar("y")).map(|v| v.to_string()), Some("\"2024\"^^xsd:integer".to_string()));
}

#[test]
fn session_skips_inapplicable_and_failing_atoms() {
    let registry = setup();
    let mut session = Session::new(&registry, context_in(2024));
    // ?x unbound: IRIparts cannot fire
    let empty = session.binding();
    assert!(session.evaluate(&[split_atom()], empty).unwrap().is_none());
    // a year that is not this one
    let mut binding = session.binding();
    binding.set(&Variable::scalar("y"), Value::integer(2023)).unwrap();
    let atoms = [Atom::new("urn:t#thisYear", vec![Variable::scalar("y").into()])];
    assert!(session.evaluate(&atoms, binding).unwrap().is_none());
    assert!(!session.is_aborted());
}

#[test]
fn overwrite_aborts_session() {
    let registry = setup();
    let mut session = Session::new(&registry, context_in(2024));
    let mut binding = session.binding();
    binding.set(&Variable::scalar("v"), Value::string("original")).unwrap();
    let atoms = [Atom::new("urn:t#clobber", vec![Variable::scalar("v").into()])];
    let err = session.evaluate(&atoms, binding).unwrap_err();
    assert!(matches!(err, RulebindError::Overwrite { position: 0, .. }));
    assert!(session.is_aborted());
    // nothing more is evaluated in this session
    let mut binding = session.binding();
    binding.set(&Variable::scalar("x"), Value::entity("http://x#a")).unwrap();
    let err = session.evaluate(&[split_atom()], binding).unwrap_err();
    assert!(matches!(err, RulebindError::Aborted(_)));
}

#[test]
fn global_registry() {
    registry::register("urn:global#IRIparts", IriParts).unwrap();
    assert!(registry::global().contains("urn:global#IRIparts").unwrap());
    let helper = registry::create_helper(split_atom_for("urn:global#IRIparts")).unwrap();
    assert_eq!(helper.atom().arity(), 4);
}

fn split_atom_for(id: &str) -> Atom {
    Atom::new(id, split_atom().arguments().to_vec())
}
