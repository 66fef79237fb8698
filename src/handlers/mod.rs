pub mod chat;
pub mod health;
pub mod recipes;
pub mod substitutions;

pub use chat::chat_config;
pub use health::{health_check, healthcheck, root};
pub use recipes::recipes_config;
pub use substitutions::substitutions_config;
