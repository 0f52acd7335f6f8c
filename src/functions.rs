//! Ready-made built-ins.
//!
//! * [`IriParts`] splits the identifier of an entity at a separator,
//!   `IRIparts(?entity, "sep", ?prefix, ?rest)`.
//! * [`ThisYear`] binds or checks the current year, `thisYear(?y)`.
//!
//! [`register_standard`] registers the ones enabled in the [`Settings`].

use chrono::Datelike;
use tracing::warn;

use crate::builtin::{BuiltInFunction, Context, ScalarFunction, ScalarOnly};
use crate::error::Result;
use crate::registry::Registry;
use crate::settings::Settings;
use crate::value::{Scalar, ScalarType, Value};

pub const IRI_PARTS: &str = "IRIparts";
pub const THIS_YEAR: &str = "thisYear";

// ------------- IriParts -------------
#[derive(Debug, Default, Clone, Copy)]
pub struct IriParts;

impl BuiltInFunction for IriParts {
    fn is_applicable(&self, bound_positions: &[bool]) -> bool {
        matches!(bound_positions, [true, true, false, false])
    }
    fn apply(&self, _context: &Context, args: &mut [Option<Value>]) -> bool {
        let [Some(Value::Entity(entity)), Some(Value::Scalar(separator)), None, None] = &*args else {
            return false;
        };
        let id = entity.id();
        let separator = separator.lexical();
        let Some(idx) = id.find(separator) else {
            return false;
        };
        let prefix = Value::string(&id[..idx]);
        let rest = Value::string(&id[idx + separator.len()..]);
        args[2] = Some(prefix);
        args[3] = Some(rest);
        true
    }
}

// ------------- ThisYear -------------
/// Reads the clock of the evaluation context, so two evaluations may
/// disagree when they straddle a new year.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThisYear;

impl ScalarFunction for ThisYear {
    fn is_applicable(&self, bound_positions: &[bool]) -> bool {
        bound_positions.len() == 1
    }
    fn apply(&self, context: &Context, args: &mut [Option<Scalar>]) -> bool {
        let year = format!("{:04}", context.now().year());
        match &*args {
            [None] => (),
            [Some(bound)] => return bound.lexical() == year,
            _ => return false,
        }
        match Scalar::new(year, ScalarType::Integer) {
            Ok(scalar) => {
                args[0] = Some(scalar);
                true
            }
            Err(_) => false,
        }
    }
}

pub fn register_standard(registry: &Registry, settings: &Settings) -> Result<usize> {
    let mut registered = 0;
    for name in &settings.enabled {
        let function_id = format!("{}{}", settings.namespace, name);
        match name.as_str() {
            IRI_PARTS => {
                registry.register(&function_id, IriParts)?;
            }
            THIS_YEAR => {
                registry.register(&function_id, ScalarOnly(ThisYear))?;
            }
            _ => {
                warn!(function = %name, "no such standard built-in, skipping");
                continue;
            }
        }
        registered += 1;
    }
    Ok(registered)
}
