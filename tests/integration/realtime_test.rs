//! End-to-end encounter flows through the realtime engine, with in-memory
//! channels standing in for WebSockets.

use std::time::Duration;

use futures::StreamExt;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

use initiative_core::types::{SessionCode, SubscriberId};
use initiative_realtime::{Frame, Payload, run_connection};

use crate::helpers::TestApp;

type Inbound = Result<Frame, String>;

struct Client {
    frames: UnboundedSender<Inbound>,
    states: UnboundedReceiver<Payload>,
    task: JoinHandle<()>,
}

impl Client {
    fn connect(app: &TestApp, code: &str, uid: &str) -> Self {
        let (frames, inbound) = mpsc::unbounded::<Inbound>();
        let (outbound, states) = mpsc::unbounded::<Payload>();
        let task = tokio::spawn(run_connection(
            app.state.realtime.clone(),
            SessionCode::parse(code).expect("code"),
            SubscriberId::from(uid),
            outbound,
            inbound,
        ));
        Self {
            frames,
            states,
            task,
        }
    }

    fn send(&self, value: Value) {
        self.frames
            .unbounded_send(Ok(Frame::Data(value.to_string())))
            .expect("send");
    }

    async fn next_state(&mut self) -> Value {
        let payload = tokio::time::timeout(Duration::from_secs(2), self.states.next())
            .await
            .expect("timely state")
            .expect("state");
        let json: Value = serde_json::from_str(&payload).expect("json");
        assert_eq!(json["type"], "state");
        json["data"].clone()
    }

    async fn close(self) {
        self.frames.unbounded_send(Ok(Frame::Close)).expect("close");
        self.task.await.expect("join");
    }
}

fn find<'a>(state: &'a Value, name: &str) -> &'a Value {
    state["entries"]
        .as_array()
        .and_then(|entries| entries.iter().find(|e| e["name"] == name))
        .expect("entity present")
}

#[tokio::test]
async fn test_goblin_and_aria_encounter() {
    let app = TestApp::new();
    let code = app.join("ABCD", "U1").await;

    let mut dm = Client::connect(&app, &code, "U1");
    let mut player = Client::connect(&app, &code, "U2");
    let initial = dm.next_state().await;
    assert_eq!(initial["group"], "ABCD");
    assert_eq!(initial["dmUid"], "U1");
    player.next_state().await;

    dm.send(json!({"type": "addMonster", "data": {"name": "Goblin", "hp": 7, "bonus": 2, "initiative": 10}}));
    dm.next_state().await;
    player.next_state().await;

    player.send(json!({"type": "addPlayerRoll", "data": {"name": "Aria", "bonus": 3}}));
    let dm_view = dm.next_state().await;
    player.next_state().await;

    let names: Vec<&str> = dm_view["entries"]
        .as_array()
        .expect("entries")
        .iter()
        .filter_map(|e| e["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Aria", "Goblin"]);
    assert_eq!(find(&dm_view, "Aria")["initiative"], 15);

    let goblin_id = find(&dm_view, "Goblin")["id"].as_str().expect("id").to_string();
    dm.send(json!({"type": "damage", "data": {"id": goblin_id, "dmg": 10}}));

    let dm_view = dm.next_state().await;
    let player_view = player.next_state().await;
    assert_eq!(find(&dm_view, "Goblin")["hp"], 0);
    assert_eq!(find(&dm_view, "Goblin")["maxHp"], 7);
    assert_eq!(find(&player_view, "Goblin")["hp"], 0);
    assert_eq!(find(&player_view, "Goblin")["maxHp"], 0);

    dm.close().await;
    player.close().await;
    assert_eq!(app.state.realtime.hub.registry().session_count(), 0);
}

#[tokio::test]
async fn test_player_cannot_run_owner_commands() {
    let app = TestApp::new();
    let code = app.join("ABCD", "U1").await;

    let mut player = Client::connect(&app, &code, "U2");
    player.next_state().await;

    player.send(json!({"type": "addMonster", "data": {"name": "Dragon", "hp": 300}}));
    let state = player.next_state().await;
    assert_eq!(state["entries"].as_array().map(Vec::len), Some(0));

    player.send(json!({"type": "addPlayer", "data": {"name": "Aria", "initiative": 14}}));
    let state = player.next_state().await;
    assert_eq!(state["entries"].as_array().map(Vec::len), Some(1));

    let lookup = app
        .request("GET", &format!("/api/sessions/{code}"), None, Some("U2"))
        .await;
    assert_eq!(lookup.body["data"]["entityCount"], 1);
}

#[tokio::test]
async fn test_next_turn_cycles_rounds() {
    let app = TestApp::new();
    let code = app.join("ABCD", "U1").await;
    let mut dm = Client::connect(&app, &code, "U1");
    dm.next_state().await;

    for (name, initiative) in [("A", 20), ("B", 15), ("C", 10)] {
        dm.send(json!({"type": "addPlayer", "data": {"name": name, "initiative": initiative}}));
        dm.next_state().await;
    }

    let mut seen = Vec::new();
    for _ in 0..3 {
        dm.send(json!({"type": "next"}));
        let state = dm.next_state().await;
        seen.push((state["turn"].as_u64(), state["round"].as_u64()));
    }
    assert_eq!(
        seen,
        vec![(Some(1), Some(1)), (Some(2), Some(1)), (Some(0), Some(2))]
    );

    dm.send(json!({"type": "reset"}));
    let state = dm.next_state().await;
    assert_eq!((state["turn"].as_u64(), state["round"].as_u64()), (Some(0), Some(1)));
}

#[tokio::test]
async fn test_owner_sees_hp_edits_players_do_not() {
    let app = TestApp::new();
    let code = app.join("ABCD", "U1").await;
    let mut dm = Client::connect(&app, &code, "U1");
    let mut player = Client::connect(&app, &code, "U2");
    dm.next_state().await;
    player.next_state().await;

    dm.send(json!({"type": "addMonster", "data": {"name": "Ogre", "hp": 30, "initiative": 8}}));
    let state = dm.next_state().await;
    player.next_state().await;
    let id = find(&state, "Ogre")["id"].as_str().expect("id").to_string();

    dm.send(json!({"type": "editEntityHP", "data": {"id": id, "hp": 45, "maxHp": 50}}));
    let dm_view = dm.next_state().await;
    let player_view = player.next_state().await;
    assert_eq!(find(&dm_view, "Ogre")["hp"], 45);
    assert_eq!(find(&dm_view, "Ogre")["maxHp"], 50);
    assert_eq!(find(&player_view, "Ogre")["hp"], 0);
    assert_eq!(find(&player_view, "Ogre")["maxHp"], 0);

    dm.send(json!({"type": "addEntityTag", "data": {"id": id, "tag": "enraged"}}));
    let player_view = player.next_state().await;
    assert_eq!(find(&player_view, "Ogre")["tags"], json!(["enraged"]));

    dm.send(json!({"type": "deleteEntity", "data": {"id": id}}));
    let player_view = player.next_state().await;
    assert_eq!(player_view["entries"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_disconnect_leaves_others_connected() {
    let app = TestApp::new();
    let code = app.join("ABCD", "U1").await;
    let mut dm = Client::connect(&app, &code, "U1");
    let mut player = Client::connect(&app, &code, "U2");
    dm.next_state().await;
    player.next_state().await;

    player.close().await;
    assert_eq!(
        app.state
            .realtime
            .hub
            .registry()
            .subscriber_count(&SessionCode::parse(&code).expect("code")),
        1
    );

    dm.send(json!({"type": "next"}));
    dm.next_state().await;

    let health = app.request("GET", "/api/health/detailed", None, None).await;
    assert_eq!(health.body["data"]["ws_connections"], 1);
    assert_eq!(health.body["data"]["realtime"]["connections_total"], 2);
}
