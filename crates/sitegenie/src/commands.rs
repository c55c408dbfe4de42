//! One-shot commands: ask, history, clear

use anyhow::{Context, Result};
use sitegenie_common::{
    ChatSession, GeminiGateway, MessageStore, ModelGateway, SessionReconciler, SiteGenieConfig,
};

use crate::display::Ui;
use crate::repl;

/// Build the hosted model client from configuration
pub fn build_gateway(config: &SiteGenieConfig) -> Result<GeminiGateway> {
    GeminiGateway::new(config.model.clone()).context("Failed to set up the model gateway")
}

/// Handle a single user turn, exactly as the chat loop would
pub fn ask<G>(store: &MessageStore, gateway: &G, ui: &Ui, query: &[String]) -> Result<()>
where
    G: ModelGateway + ?Sized,
{
    let (mut session, load_error) = ChatSession::start(store, gateway);
    if let Some(e) = load_error {
        ui.warning(&format!("Chat history unavailable ({}). Reply will not be saved.", e));
    }

    let outcome = session.submit(&query.join(" "));
    repl::render_outcome(ui, &outcome);
    Ok(())
}

/// Print the saved conversation, oldest first
pub fn history(store: &MessageStore, ui: &Ui, json: bool) -> Result<()> {
    let turns = store.read_all().context("Failed to read chat history")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&turns)?);
        return Ok(());
    }

    if turns.is_empty() {
        ui.info("No saved conversation.");
        return Ok(());
    }

    for turn in &turns {
        ui.turn(turn);
    }
    Ok(())
}

/// Delete the saved conversation
pub fn clear(store: &MessageStore, ui: &Ui) -> Result<()> {
    let mut conversation = SessionReconciler::new(store)
        .load_or_initialize()
        .context("Failed to read chat history")?;
    let count = conversation.visible().len();

    SessionReconciler::new(store)
        .reset(&mut conversation)
        .context("Failed to clear chat history")?;

    ui.info(&format!("Cleared {} saved messages.", count));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitegenie_common::{FakeGateway, Role, Turn};
    use tempfile::tempdir;

    #[test]
    fn test_ask_persists_exchange() {
        let dir = tempdir().unwrap();
        let store = MessageStore::open(dir.path().join("chat.db")).unwrap();
        let gateway = FakeGateway::always_reply("Fe500D is common for seismic zones.");

        let query = vec!["steel".to_string(), "grade?".to_string()];
        ask(&store, &gateway, &Ui::plain(), &query).unwrap();

        assert_eq!(
            store.read_all().unwrap(),
            vec![
                Turn::user("steel grade?"),
                Turn::assistant("Fe500D is common for seismic zones."),
            ]
        );
    }

    #[test]
    fn test_clear_empties_store() {
        let dir = tempdir().unwrap();
        let store = MessageStore::open(dir.path().join("chat.db")).unwrap();
        store.append(Role::User, "site").unwrap();
        store.append(Role::Assistant, "yes").unwrap();

        clear(&store, &Ui::plain()).unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_history_on_unavailable_store_fails() {
        let dir = tempdir().unwrap();
        let store = MessageStore::new(dir.path().join("missing.db"));
        assert!(history(&store, &Ui::plain(), false).is_err());
    }

    #[test]
    fn test_build_gateway_uses_configured_model() {
        let mut config = SiteGenieConfig::default();
        config.model.name = "gemini-2.5-flash".to_string();
        let gateway = build_gateway(&config).unwrap();
        assert_eq!(gateway.model(), "gemini-2.5-flash");
    }
}
