pub mod interface;
pub mod logic;

pub use interface::{
    InteractivePrompter, MemoryConfigStore, ParameterFileLoader, ProjectLocator, PromptOutcome,
    SavedConfigStore,
};
pub use logic::{
    EnvironmentSource, FailurePolicy, ParameterFileSource, ParameterResolver, ResolutionSession,
    SavedConfigSource, SessionOptions, ValueSource,
};
