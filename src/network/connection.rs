//! Lifecycle of the workflow event socket.
//!
//! The manager is a plain state machine: socket callbacks and timers are fed
//! in as method calls and it answers with [`LinkCommand`]s for the runtime to
//! carry out.  Each socket it opens gets a fresh generation number, and
//! callbacks from any other generation are dropped, which is what keeps a
//! manually replaced socket from triggering a second reconnect.

use std::fmt;

use super::messages::{decode, WorkflowEvent};

/// What the connection indicator shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketStatus {
    Connecting,
    Connected,
    Disconnected,
    Error,
}

impl SocketStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SocketStatus::Connecting => "Connecting...",
            SocketStatus::Connected => "Connected",
            SocketStatus::Disconnected => "Disconnected",
            SocketStatus::Error => "Connection Error",
        }
    }

    /// Class list for the status dot; only a live connection lights it.
    pub fn dot_class(&self) -> &'static str {
        match self {
            SocketStatus::Connected => "status-dot connected",
            _ => "status-dot",
        }
    }
}

impl fmt::Display for SocketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SocketStatus::Connecting => "connecting",
            SocketStatus::Connected => "connected",
            SocketStatus::Disconnected => "disconnected",
            SocketStatus::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// Raw callbacks of a socket, tagged by the runtime with its generation.
#[derive(Debug, Clone, PartialEq)]
pub enum SocketEvent {
    Opened,
    Message(String),
    Error(String),
    Closed,
}

/// Work the runtime has to perform on behalf of the manager.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkCommand {
    Open { generation: u64, url: String },
    Close { generation: u64 },
    /// Arm the (single) reconnect timer, replacing any pending one.
    ScheduleReconnect { delay_ms: u32 },
    CancelReconnect,
    Status(SocketStatus),
    Deliver(WorkflowEvent),
}

#[derive(Debug)]
pub struct ConnectionManager {
    url: String,
    reconnect_delay_ms: u32,
    manual_reconnect_delay_ms: u32,
    status: SocketStatus,
    generation: u64,
    live: Option<u64>,
    shut_down: bool,
}

impl ConnectionManager {
    pub fn new(url: &str, reconnect_delay_ms: u32, manual_reconnect_delay_ms: u32) -> Self {
        Self {
            url: url.to_string(),
            reconnect_delay_ms,
            manual_reconnect_delay_ms,
            status: SocketStatus::Disconnected,
            generation: 0,
            live: None,
            shut_down: false,
        }
    }

    pub fn status(&self) -> SocketStatus {
        self.status
    }

    /// Generation of the socket currently open or opening, if any.
    pub fn live_generation(&self) -> Option<u64> {
        self.live
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// First connection attempt.
    pub fn start(&mut self) -> Vec<LinkCommand> {
        if self.shut_down || self.live.is_some() {
            return Vec::new();
        }
        let mut commands = Vec::new();
        self.open(&mut commands);
        commands
    }

    /// Feed a socket callback.  Callbacks from stale generations are ignored.
    pub fn handle_socket(&mut self, generation: u64, event: SocketEvent) -> Vec<LinkCommand> {
        let mut commands = Vec::new();
        if self.shut_down || self.live != Some(generation) {
            if !matches!(event, SocketEvent::Closed) {
                crate::console_log!("Ignoring {:?} from stale socket #{}", event, generation);
            }
            return commands;
        }

        match event {
            SocketEvent::Opened => {
                crate::console_log!("🔗 Connected to workflow server");
                self.set_status(SocketStatus::Connected, &mut commands);
            }
            SocketEvent::Message(text) => match decode(&text) {
                Ok(event) => commands.push(LinkCommand::Deliver(event)),
                Err(e) => crate::console_error!("Dropping workflow message: {}", e),
            },
            SocketEvent::Error(detail) => {
                // The close callback that follows owns the reconnect.
                crate::console_error!("WebSocket error: {}", detail);
                self.set_status(SocketStatus::Error, &mut commands);
            }
            SocketEvent::Closed => {
                crate::console_log!("📡 Disconnected from workflow server");
                self.live = None;
                self.set_status(SocketStatus::Disconnected, &mut commands);
                commands.push(LinkCommand::ScheduleReconnect {
                    delay_ms: self.reconnect_delay_ms,
                });
            }
        }
        commands
    }

    /// The reconnect timer elapsed.
    pub fn reconnect_due(&mut self) -> Vec<LinkCommand> {
        let mut commands = Vec::new();
        if self.shut_down {
            return commands;
        }
        if self.live.is_some() {
            crate::console_log!("Reconnect timer fired while socket #{} is live, skipping", self.generation);
            return commands;
        }
        crate::console_log!("Attempting reconnection to {}", self.url);
        self.open(&mut commands);
        commands
    }

    /// User-requested reconnect: drop the current socket and open a new one
    /// after the short manual delay.
    pub fn reconnect(&mut self) -> Vec<LinkCommand> {
        let mut commands = Vec::new();
        if self.shut_down {
            return commands;
        }
        if let Some(generation) = self.live.take() {
            commands.push(LinkCommand::Close { generation });
        }
        commands.push(LinkCommand::CancelReconnect);
        self.set_status(SocketStatus::Connecting, &mut commands);
        commands.push(LinkCommand::ScheduleReconnect {
            delay_ms: self.manual_reconnect_delay_ms,
        });
        commands
    }

    /// Release the socket and stop reconnecting for good.
    pub fn shutdown(&mut self) -> Vec<LinkCommand> {
        let mut commands = Vec::new();
        if self.shut_down {
            return commands;
        }
        if let Some(generation) = self.live.take() {
            commands.push(LinkCommand::Close { generation });
        }
        commands.push(LinkCommand::CancelReconnect);
        self.set_status(SocketStatus::Disconnected, &mut commands);
        self.shut_down = true;
        commands
    }

    fn open(&mut self, commands: &mut Vec<LinkCommand>) {
        self.generation += 1;
        self.live = Some(self.generation);
        self.set_status(SocketStatus::Connecting, commands);
        commands.push(LinkCommand::Open {
            generation: self.generation,
            url: self.url.clone(),
        });
    }

    fn set_status(&mut self, status: SocketStatus, commands: &mut Vec<LinkCommand>) {
        self.status = status;
        commands.push(LinkCommand::Status(status));
    }
}
