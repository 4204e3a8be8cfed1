//! Display implementation for tudu application messages.
//!
//! All user-facing message text is defined here, keeping formatting
//! consistent and making the `Message` enum the single source of truth
//! for terminal output.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === TODO MESSAGES ===
            Message::TodoAdded => "Todo added successfully".to_string(),
            Message::TodoUpdated => "Todo updated successfully".to_string(),
            Message::TodoDeleted => "Todo deleted successfully".to_string(),
            Message::TodoAddFailed(error) => format!("Failed to add todo: {}", error),
            Message::TodoUpdateFailed(error) => format!("Failed to update todo: {}", error),
            Message::TodoDeleteFailed(error) => format!("Failed to delete todo: {}", error),
            Message::TodoNotFoundWithId(id) => format!("Todo with ID {} not found.", id),
            Message::TodosHeader => "Todos:".to_string(),
            Message::NoTodosYet => "No todos yet!".to_string(),
            Message::RefreshFailed(error) => format!("Failed to refresh todos: {}", error),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigModuleDatastore => "Datastore settings".to_string(),
            Message::ConfigModuleServer => "Server settings".to_string(),
            Message::PromptSelectModules => {
                "Select modules to configure (space to select, enter to confirm)".to_string()
            }
            Message::PromptDatastoreUrl => "Enter the datastore URL".to_string(),
            Message::PromptDatastoreKey => "Enter the datastore API key".to_string(),
            Message::PromptPublicUrl => "Enter the public base URL of this app".to_string(),
            Message::PromptHost => "Enter the host to bind".to_string(),
            Message::PromptPort => "Enter the port to bind".to_string(),

            // === SERVER MESSAGES ===
            Message::ServerListening(address) => format!("Listening on {}", address),
            Message::ServerShutdown => "Server shutdown complete".to_string(),
            Message::InvalidServerAddress(address) => {
                format!("Invalid server address: {}", address)
            }
            Message::DatastoreNotConfigured => {
                "Datastore is not configured. Run 'tudu init' or set TUDU_DATASTORE_URL and TUDU_DATASTORE_KEY.".to_string()
            }

            // === CLIENT MESSAGES ===
            Message::ClientConnected(url) => format!("Connected to {}", url),
            Message::PromptAction => "What do you want to do?".to_string(),
            Message::PromptNewTodoText => "What needs to be done?".to_string(),
            Message::PromptEditTodoText => "New text".to_string(),
            Message::PromptSelectTodo => "Select a todo".to_string(),
            Message::ClientGoodbye => "Bye!".to_string(),
        };
        write!(f, "{}", text)
    }
}
