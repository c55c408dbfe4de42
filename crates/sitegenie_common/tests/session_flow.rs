//! Chat session flow tests
//!
//! End-to-end checks of history persistence, reconciliation across restarts,
//! reset, and classifier routing, using an on-disk store and a fake model.

use sitegenie_common::classifier::{IDENTITY_REPLY, REFUSAL_REPLY};
use sitegenie_common::{
    ChatSession, Conversation, FakeGateway, MessageStore, ReplySource, Role, SessionReconciler,
    Turn,
};
use tempfile::TempDir;

fn fresh_store() -> (MessageStore, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = MessageStore::open(dir.path().join("data").join("chatbot.db")).unwrap();
    (store, dir)
}

#[test]
fn appended_turns_read_back_in_order() {
    let (store, _dir) = fresh_store();

    let turns: Vec<Turn> = (0..25)
        .map(|i| {
            if i % 2 == 0 {
                Turn::user(format!("question {} about site work", i))
            } else {
                Turn::assistant(format!("answer {}\nwith a second line", i))
            }
        })
        .collect();

    for turn in &turns {
        store.append(turn.role, &turn.content).unwrap();
    }

    assert_eq!(store.read_all().unwrap(), turns);
}

#[test]
fn clear_empties_any_log() {
    let (store, _dir) = fresh_store();
    store.clear().unwrap();
    assert!(store.read_all().unwrap().is_empty());

    for i in 0..10 {
        store.append(Role::User, &format!("turn {}", i)).unwrap();
    }
    store.clear().unwrap();
    assert!(store.read_all().unwrap().is_empty());
}

#[test]
fn reconciliation_is_idempotent() {
    let (store, _dir) = fresh_store();
    store.append(Role::User, "material takeoff").unwrap();
    store.append(Role::Assistant, "Start from the drawings.").unwrap();

    let reconciler = SessionReconciler::new(&store);
    let first = reconciler.load_or_initialize().unwrap();
    let second = reconciler.load_or_initialize().unwrap();

    assert_eq!(first, second);
    assert_eq!(store.read_all().unwrap().len(), 2);
}

#[test]
fn system_turn_is_never_persisted() {
    let (store, dir) = fresh_store();
    let gateway = FakeGateway::always_reply("Use M20 for slabs.");

    {
        let (mut session, _) = ChatSession::start(&store, &gateway);
        session.submit("concrete mix for building slab");
        session.submit("tell me a joke");
        session.submit("who are you");
    }

    // Simulated restart against the same file
    let reopened = MessageStore::open(dir.path().join("data").join("chatbot.db")).unwrap();
    let (session, _) = ChatSession::start(&reopened, &gateway);

    let stored = reopened.read_all().unwrap();
    assert_eq!(stored.len(), 6);
    assert!(stored.iter().all(|t| t.role != Role::System));

    let system_turns = session
        .conversation()
        .turns()
        .iter()
        .filter(|t| t.role == Role::System)
        .count();
    assert_eq!(system_turns, 1);
    assert_eq!(session.conversation().visible(), stored.as_slice());
}

#[test]
fn classifier_priority_end_to_end() {
    let (store, _dir) = fresh_store();
    let gateway = FakeGateway::always_reply("Use M25 with Fe500 steel.");
    let (mut session, _) = ChatSession::start(&store, &gateway);

    let identity = session.submit("who are you");
    assert_eq!(identity.reply, IDENTITY_REPLY);
    assert_eq!(gateway.call_count(), 0);

    let refused = session.submit("tell me a joke");
    assert_eq!(refused.reply, REFUSAL_REPLY);
    assert_eq!(refused.source, ReplySource::Refused);
    assert_eq!(gateway.call_count(), 0);

    let generated = session.submit("what cement grade for a 3-story building");
    assert_eq!(generated.source, ReplySource::Generated);
    assert_eq!(gateway.call_count(), 1);

    // The model saw every turn up to the question, system turn included
    let turns = session.conversation().turns();
    let expected = turns[..turns.len() - 1]
        .iter()
        .map(|t| format!("{}: {}", t.role.label(), t.content))
        .collect::<Vec<_>>()
        .join("\n");
    assert_eq!(gateway.prompts()[0], expected);
    assert!(expected.starts_with("System: "));
    assert!(expected.ends_with("User: what cement grade for a 3-story building"));
}

#[test]
fn load_append_reset_scenario() {
    let (store, _dir) = fresh_store();
    let gateway = FakeGateway::always_reply("Happy to help with your site.");

    let (mut session, err) = ChatSession::start(&store, &gateway);
    assert!(err.is_none());
    assert_eq!(session.conversation().len(), 1);

    let outcome = session.submit("hello construction site");
    assert!(outcome.persisted());
    assert_eq!(
        store.read_all().unwrap(),
        vec![
            Turn::user("hello construction site"),
            Turn::assistant("Happy to help with your site."),
        ]
    );

    session.reset().unwrap();
    assert!(store.read_all().unwrap().is_empty());
    assert_eq!(session.conversation().len(), 1);

    // A later restart sees the cleared state too
    let reloaded = SessionReconciler::new(&store).load_or_initialize().unwrap();
    assert_eq!(reloaded, Conversation::seeded());
}
