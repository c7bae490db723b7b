mod errors;
mod parameter;
mod resolved;

pub use errors::{CoercionError, LocatorError, ResolveError, SessionError, REDACTED};
pub use parameter::{
    get_env_var_name, ParameterSchema, ParameterSchemaFile, ParameterType, ENV_VAR_PREFIX,
};
pub use resolved::{RawValue, ResolvedParameter, SourceKind};
