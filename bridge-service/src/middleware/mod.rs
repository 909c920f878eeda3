pub mod conversation_id;

pub use conversation_id::{
    require_conversation_id, ChatwootConversationId, LibreChatConversationId,
};
