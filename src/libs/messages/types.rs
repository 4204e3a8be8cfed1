#[derive(Debug, Clone)]
pub enum Message {
    // === TODO MESSAGES ===
    TodoAdded,
    TodoUpdated,
    TodoDeleted,
    TodoAddFailed(String),
    TodoUpdateFailed(String),
    TodoDeleteFailed(String),
    TodoNotFoundWithId(i64),
    TodosHeader,
    NoTodosYet,
    RefreshFailed(String),

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigModuleDatastore,
    ConfigModuleServer,
    PromptSelectModules,
    PromptDatastoreUrl,
    PromptDatastoreKey,
    PromptPublicUrl,
    PromptHost,
    PromptPort,

    // === SERVER MESSAGES ===
    ServerListening(String),
    ServerShutdown,
    InvalidServerAddress(String),
    DatastoreNotConfigured,

    // === CLIENT MESSAGES ===
    ClientConnected(String),
    PromptAction,
    PromptNewTodoText,
    PromptEditTodoText,
    PromptSelectTodo,
    ClientGoodbye,
}
