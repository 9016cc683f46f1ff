use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::command::{CommandKind, EncodeError, StateSlot, SurfaceCommand};
use crate::protocol::SurfaceEvent;

/// One-way channel to the rendering surface.
pub trait Transport {
    fn deliver(&mut self, script: &str) -> std::io::Result<()>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn deliver(&mut self, script: &str) -> std::io::Result<()> {
        (**self).deliver(script)
    }
}

/// Collects scripts in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingTransport {
    pub scripts: Vec<String>,
}

impl Transport for RecordingTransport {
    fn deliver(&mut self, script: &str) -> std::io::Result<()> {
        self.scripts.push(script.to_string());
        Ok(())
    }
}

/// Host side of the surface protocol.
///
/// State commands are cached per slot and only delivered once the surface has
/// reported `ready`; each `ready` replays the cache. Imperative commands go
/// out immediately.
pub struct MapBridge<T> {
    transport: T,
    ready: bool,
    state: BTreeMap<StateSlot, String>,
}

impl<T: Transport> MapBridge<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            ready: false,
            state: BTreeMap::new(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Encodes and routes `command`. Encoding errors leave the cache untouched.
    pub fn send(&mut self, command: SurfaceCommand) -> Result<(), EncodeError> {
        let script = command.encode()?;
        match command.kind() {
            CommandKind::State(slot) => {
                if self.ready {
                    self.deliver(&script);
                } else {
                    debug!(function = command.function(), "surface not ready; caching");
                }
                self.state.insert(slot, script);
            }
            CommandKind::Reset(slot) => {
                self.state.remove(&slot);
                if self.ready {
                    self.deliver(&script);
                }
            }
            CommandKind::Imperative => self.deliver(&script),
        }
        Ok(())
    }

    /// Decodes one inbound message. Malformed messages are logged and dropped.
    pub fn receive(&mut self, text: &str) -> Option<SurfaceEvent> {
        let event = match SurfaceEvent::decode(text) {
            Ok(event) => event,
            Err(err) => {
                warn!(error = %err, "dropping surface message");
                return None;
            }
        };
        if let SurfaceEvent::Ready { .. } = event {
            self.on_ready();
        }
        Some(event)
    }

    /// The surface was reloaded and will announce `ready` again.
    pub fn detach(&mut self) {
        self.ready = false;
    }

    fn on_ready(&mut self) {
        if self.ready {
            debug!("surface announced ready again; replaying state");
        } else {
            info!(slots = self.state.len(), "surface ready");
        }
        self.ready = true;
        let scripts: Vec<String> = self.state.values().cloned().collect();
        for script in &scripts {
            self.deliver(script);
        }
    }

    fn deliver(&mut self, script: &str) {
        if let Err(err) = self.transport.deliver(script) {
            warn!(error = %err, "surface transport failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundation::Coordinates;
    use layers::{DEFAULT_POI_COLOR, MarkerSpec};
    use pretty_assertions::assert_eq;

    const READY: &str = r#"{"type":"ready","bounds":{"minLat":52.51,"maxLat":52.53,"minLng":13.39,"maxLng":13.42}}"#;

    fn bridge() -> MapBridge<RecordingTransport> {
        MapBridge::new(RecordingTransport::default())
    }

    fn markers(ids: &[&str]) -> SurfaceCommand {
        SurfaceCommand::UpdateMarkers(
            ids.iter()
                .map(|id| MarkerSpec {
                    id: id.to_string(),
                    lat: 52.52,
                    lng: 13.4,
                    color: DEFAULT_POI_COLOR,
                })
                .collect(),
        )
    }

    fn location() -> SurfaceCommand {
        SurfaceCommand::UpdateUserLocation {
            position: Coordinates::new(52.52, 13.405).unwrap(),
            heading: Some(90.0),
        }
    }

    #[test]
    fn state_is_held_until_ready_then_replayed() {
        let mut b = bridge();
        b.send(markers(&["a"])).unwrap();
        b.send(markers(&["a", "b"])).unwrap();
        b.send(location()).unwrap();
        b.send(SurfaceCommand::SetNavigationMode { enabled: true }).unwrap();
        assert!(b.transport().scripts.is_empty());

        assert!(matches!(b.receive(READY), Some(SurfaceEvent::Ready { .. })));
        assert!(b.is_ready());
        let scripts = &b.transport().scripts;
        assert_eq!(scripts.len(), 3);
        assert!(scripts[0].starts_with("window.setNavigationMode(true)"));
        assert!(scripts[1].starts_with("window.updateUserLocation("));
        assert!(scripts[2].contains(r#""id":"b""#));
    }

    #[test]
    fn imperative_commands_are_not_cached() {
        let mut b = bridge();
        b.send(SurfaceCommand::SetBearing { bearing: 0.0 }).unwrap();
        assert_eq!(b.transport().scripts, vec!["window.setBearing(0.0); true;"]);

        b.receive(READY);
        assert_eq!(b.transport().scripts.len(), 1);
    }

    #[test]
    fn clear_empties_the_slot() {
        let mut b = bridge();
        b.send(markers(&["a"])).unwrap();
        b.send(SurfaceCommand::ClearMarkers).unwrap();
        b.receive(READY);
        assert!(b.transport().scripts.is_empty());

        b.send(markers(&["c"])).unwrap();
        b.send(SurfaceCommand::ClearMarkers).unwrap();
        assert_eq!(
            b.transport().scripts.last().map(String::as_str),
            Some("window.clearMarkers(); true;")
        );
    }

    #[test]
    fn reload_replays_latest_state() {
        let mut b = bridge();
        b.receive(READY);
        b.send(location()).unwrap();
        b.detach();
        b.send(markers(&["x"])).unwrap();
        let before = b.transport().scripts.len();

        b.receive(READY);
        assert_eq!(b.transport().scripts.len(), before + 2);
    }

    #[test]
    fn malformed_messages_are_dropped() {
        let mut b = bridge();
        assert_eq!(b.receive("{oops"), None);
        assert_eq!(b.receive(r#"{"type":"teleport"}"#), None);
        assert!(!b.is_ready());
        assert_eq!(
            b.receive(r#"{"type":"markerPress","poiId":"p1"}"#),
            Some(SurfaceEvent::MarkerTapped { id: "p1".into() })
        );
    }

    #[test]
    fn invalid_commands_are_refused_without_side_effects() {
        let mut b = bridge();
        b.receive(READY);
        let err = b.send(SurfaceCommand::SetBearing { bearing: f64::NAN });
        assert!(err.is_err());
        assert!(b.transport().scripts.is_empty());
    }
}
