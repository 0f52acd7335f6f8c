use std::sync::Arc;

// other keepers use HashSet or HashMap
use core::hash::{BuildHasherDefault, Hasher};
use std::collections::{HashMap, HashSet};
use std::collections::hash_map::Iter;
use std::hash::Hash;
use seahash::SeaHasher;

// used to print out readable forms of a construct
use std::fmt;

// our own stuff that we need
use crate::builtin::Context;
use crate::error::{Result, RulebindError};
use crate::value::{Value, VariableKind};

pub type OtherHasher = BuildHasherDefault<SeaHasher>;

pub type VariableSet = HashSet<Variable, OtherHasher>;

// ------------- Variable -------------
#[derive(Clone, Debug)]
pub struct Variable {
    name: String,
    kind: VariableKind, // a hint, the bound value decides in the end
}

impl Variable {
    pub fn new(name: impl Into<String>, kind: VariableKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
    pub fn entity(name: impl Into<String>) -> Self {
        Self::new(name, VariableKind::Entity)
    }
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::new(name, VariableKind::Scalar)
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn kind(&self) -> VariableKind {
        self.kind
    }
    pub fn with_kind(&self, kind: VariableKind) -> Self {
        Self::new(self.name.clone(), kind)
    }
}
// A variable has one logical identity whichever kind it is tagged with,
// so only the name takes part in equality and hashing.
impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}
impl Eq for Variable {}
impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}
impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "?{}", self.name)
    }
}

// ------------- Atom -------------
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AtomArgument {
    Variable(Variable),
    Constant(Value),
}
impl AtomArgument {
    pub fn variable(&self) -> Option<&Variable> {
        match self {
            Self::Variable(variable) => Some(variable),
            Self::Constant(_) => None,
        }
    }
    pub fn is_bound(&self, bound: &VariableSet) -> bool {
        match self {
            Self::Variable(variable) => bound.contains(variable),
            Self::Constant(_) => true,
        }
    }
    pub fn resolve(&self, binding: &Binding) -> Option<Value> {
        match self {
            Self::Variable(variable) => binding.get(variable).cloned(),
            Self::Constant(value) => Some(value.clone()),
        }
    }
}
impl fmt::Display for AtomArgument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Variable(variable) => write!(f, "{}", variable),
            Self::Constant(value) => write!(f, "{}", value),
        }
    }
}
impl From<Variable> for AtomArgument {
    fn from(variable: Variable) -> Self {
        Self::Variable(variable)
    }
}
impl From<Value> for AtomArgument {
    fn from(value: Value) -> Self {
        Self::Constant(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Atom {
    predicate: String,
    arguments: Vec<AtomArgument>,
}
impl Atom {
    pub fn new(predicate: impl Into<String>, arguments: Vec<AtomArgument>) -> Self {
        Self {
            predicate: predicate.into(),
            arguments,
        }
    }
    pub fn predicate(&self) -> &str {
        &self.predicate
    }
    pub fn arguments(&self) -> &[AtomArgument] {
        &self.arguments
    }
    pub fn arity(&self) -> usize {
        self.arguments.len()
    }
    pub fn variables(&self) -> VariableSet {
        self.arguments
            .iter()
            .filter_map(AtomArgument::variable)
            .cloned()
            .collect()
    }
    pub fn boundness(&self, bound: &VariableSet) -> Vec<bool> {
        self.arguments.iter().map(|a| a.is_bound(bound)).collect()
    }
    pub fn resolve(&self, binding: &Binding) -> Vec<Option<Value>> {
        self.arguments.iter().map(|a| a.resolve(binding)).collect()
    }
}
impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let arguments: Vec<String> = self.arguments.iter().map(|a| a.to_string()).collect();
        write!(f, "{}({})", self.predicate, arguments.join(", "))
    }
}

// ------------- Binding -------------
#[derive(Clone, Debug)]
pub struct Binding {
    context: Arc<Context>,
    bound: HashMap<Variable, Value, OtherHasher>,
}
impl Binding {
    pub fn new(context: Arc<Context>) -> Self {
        Self {
            context,
            bound: HashMap::default(),
        }
    }
    pub fn context(&self) -> &Context {
        &self.context
    }
    pub fn get(&self, variable: &Variable) -> Option<&Value> {
        self.bound.get(variable)
    }
    // Picks the identifier a value is filed under. An entity given for a
    // scalar-tagged variable lands in the entity space.
    pub fn reconcile(variable: &Variable, value: &Value) -> Result<Variable> {
        match (variable.kind(), value.kind()) {
            (VariableKind::Entity, VariableKind::Scalar) => {
                Err(RulebindError::UnknownValueKind(format!(
                    "{} is declared as an entity but was given {}",
                    variable, value
                )))
            }
            (_, kind) => Ok(variable.with_kind(kind)),
        }
    }
    pub fn set(&mut self, variable: &Variable, value: Value) -> Result<Option<Value>> {
        let key = Self::reconcile(variable, &value)?;
        let previous = self.bound.remove(&key);
        self.bound.insert(key, value);
        Ok(previous)
    }
    pub fn contains(&self, variable: &Variable) -> bool {
        self.bound.contains_key(variable)
    }
    // Kind of the identifier the variable is currently filed under.
    pub fn kind_of(&self, variable: &Variable) -> Option<VariableKind> {
        self.bound.get_key_value(variable).map(|(key, _)| key.kind())
    }
    pub fn variables(&self) -> VariableSet {
        self.bound.keys().cloned().collect()
    }
    pub fn iter(&self) -> Iter<'_, Variable, Value> {
        self.bound.iter()
    }
    pub fn len(&self) -> usize {
        self.bound.len()
    }
    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}
impl Default for Binding {
    fn default() -> Self {
        Self::new(Arc::new(Context::default()))
    }
}
impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut entries: Vec<String> = self
            .bound
            .iter()
            .map(|(variable, value)| format!("{} = {}", variable, value))
            .collect();
        entries.sort();
        write!(f, "{{{}}}", entries.join(", "))
    }
}
