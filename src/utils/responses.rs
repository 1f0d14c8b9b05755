use serenity::builder::{CreateInteractionResponse, CreateInteractionResponseMessage};

pub fn default_response(message: &str) -> CreateInteractionResponse {
    let data = CreateInteractionResponseMessage::new().content(message);
    CreateInteractionResponse::Message(data)
}

pub fn error_response(message: &str) -> CreateInteractionResponse {
    let data = CreateInteractionResponseMessage::new()
        .content(format!("❌ {}", message))
        .ephemeral(true);
    CreateInteractionResponse::Message(data)
}
