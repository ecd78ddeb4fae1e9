use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::core::app_state::AppState;
use crate::game::audio::SoundSettings;
use crate::game::events::{GameEvent, UiEvent};
use crate::game::field::GameField;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Queued traffic between the game and the embedding page.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host page without expecting a response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin bridging the game and an embedding page over `postMessage`.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    forward_game_events.run_if(in_state(AppState::Running)),
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    let Some(window) = window() else {
        error!("Window object not available, host bridge disabled");
        return;
    };

    if let Err(e) =
        window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
    {
        error!("Failed to register message listener: {:?}", e);
        return;
    }

    // Ownership moves to JS so the listener outlives this system.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

/// Side effects a host request may ask for.
#[derive(Debug, Default, PartialEq)]
struct RpcEffects {
    ui_events: Vec<UiEvent>,
    sound_enabled: Option<bool>,
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    diagnostics: Res<DiagnosticsStore>,
    field: Option<Res<GameField>>,
    mut sound: ResMut<SoundSettings>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut ui_events: EventWriter<UiEvent>,
) {
    for event in events.read() {
        let request = match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => request,
            Err(parse_error) => {
                warn!("Dropping malformed RPC message: {}", parse_error);
                continue;
            }
        };

        let fps = diagnostics
            .get(&FrameTimeDiagnosticsPlugin::FPS)
            .and_then(|fps| fps.smoothed())
            .unwrap_or(0.0) as f32;
        let snapshot = field.as_deref().map(state_snapshot);

        let mut effects = RpcEffects::default();
        let response = handle_rpc_request(&request, fps, snapshot, &mut effects);

        if let Some(enabled) = effects.sound_enabled {
            sound.enabled = enabled;
        }
        ui_events.write_batch(effects.ui_events);

        if let Some(response) = response {
            rpc_interface.queue_response(response);
        }
    }
}

/// Handle individual RPC request and generate response based on method.
fn handle_rpc_request(
    request: &RpcRequest,
    fps: f32,
    snapshot: Option<serde_json::Value>,
    effects: &mut RpcEffects,
) -> Option<RpcResponse> {
    if request.jsonrpc != "2.0" {
        let id = request.id.clone()?;
        return Some(create_error_response(id, -32600, "Invalid request", None));
    }

    let result = match request.method.as_str() {
        "start_game" => {
            effects.ui_events.push(UiEvent::StartGame);
            Ok(serde_json::json!({ "success": true }))
        }
        "restart_game" => {
            effects.ui_events.push(UiEvent::RestartGame);
            Ok(serde_json::json!({ "success": true }))
        }
        "set_sound_enabled" => handle_set_sound_enabled(&request.params, effects),
        "get_state" => snapshot.ok_or_else(|| RpcError::internal_error("Game is still loading")),
        "get_fps" => Ok(serde_json::json!({ "fps": fps })),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            let id = request.id.clone()?;
            return Some(create_error_response(
                id,
                -32601,
                "Method not found",
                Some(serde_json::json!({"method": request.method})),
            ));
        }
    };

    // Notifications carry no id and get no response.
    let id = request.id.clone()?;

    Some(match result {
        Ok(result_value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        },
        Err(error) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        },
    })
}

fn handle_set_sound_enabled(
    params: &serde_json::Value,
    effects: &mut RpcEffects,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct SoundParams {
        enabled: bool,
    }

    let sound_params = serde_json::from_value::<SoundParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected boolean 'enabled' parameter"))?;

    effects.sound_enabled = Some(sound_params.enabled);
    effects.ui_events.push(UiEvent::SoundChanged);

    Ok(serde_json::json!({
        "success": true,
        "enabled": sound_params.enabled
    }))
}

fn state_snapshot(field: &GameField) -> serde_json::Value {
    let session = field.session();
    serde_json::json!({
        "phase": format!("{:?}", session.phase),
        "level": session.level_index,
        "score": session.score,
        "lives": session.lives,
        "round": session.round,
    })
}

/// Mirror game notifications to the host page.
fn forward_game_events(
    mut events: EventReader<GameEvent>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in events.read() {
        if let Some((method, params)) = game_event_notification(event) {
            rpc_interface.send_notification(method, params);
        }
    }
}

fn game_event_notification(event: &GameEvent) -> Option<(&'static str, serde_json::Value)> {
    let notification = match *event {
        GameEvent::LevelReady { level } => ("level_ready", serde_json::json!({ "level": level })),
        GameEvent::ScoreChanged(score) => ("score_changed", serde_json::json!({ "score": score })),
        GameEvent::LivesChanged(lives) => ("lives_changed", serde_json::json!({ "lives": lives })),
        GameEvent::RoundChanged(round) => ("round_changed", serde_json::json!({ "round": round })),
        GameEvent::GameOver => ("game_over", serde_json::json!({})),
        GameEvent::GameplayStarted => ("gameplay_started", serde_json::json!({})),
        GameEvent::ConsumableCollected { kind, position } => (
            "consumable_collected",
            serde_json::json!({ "kind": kind, "position": position }),
        ),
        _ => return None,
    };
    Some(notification)
}

fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the host page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    }
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}

impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}
