pub mod application;
pub mod connector;
pub mod domain;

pub use application::{
    build_messages, build_prompt, extract_reply_text, normalize_token_usage, AskRequest,
    AskUseCase, CompletionClient, ContextProvider, DispatchRequestUseCase, GenerationClient,
    ModelRegistry, VendorClient, VendorTarget,
};

pub use connector::{
    AppConfig, AzureOpenAiClient, ConfiguredModelRegistry, Container, ContainerConfig,
    FileContextProvider, GeminiClient, MockVendorClient, ModelEntry, OpenAiClient,
    RecordedRequest, VendorKind,
};

pub use domain::{
    ChatMessage, Context, ConversationTurn, DomainError, Response, Role, TokenUsage, VendorFamily,
};
