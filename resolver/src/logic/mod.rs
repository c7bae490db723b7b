mod resolver;
mod session;
mod sources;

pub use resolver::ParameterResolver;
pub use session::{FailurePolicy, ResolutionSession, SessionOptions};
pub use sources::{EnvironmentSource, ParameterFileSource, SavedConfigSource, ValueSource};
