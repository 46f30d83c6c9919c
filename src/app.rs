//! The single owned state of a running visualizer.
//!
//! `App::handle` is the only entry point.  It mutates the view, the
//! connection manager and the timer book, and answers with [`Effect`]s that
//! the runtime executes once it has released its borrow of the app.  Nothing
//! in here touches a socket or a clock, which keeps the whole controller
//! testable with a fake runtime.

use crate::canvas::SceneGraph;
use crate::config::VisualizerConfig;
use crate::network::{ConnectionManager, LinkCommand, SocketEvent, SocketStatus, WorkflowEvent};
use crate::timers::{TimerBook, TimerKind, TimerToken};
use crate::update::{self, Outcome};
use crate::view::WorkflowView;

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Start,
    Socket { generation: u64, event: SocketEvent },
    TimerFired(TimerToken),
    Resize,
    ManualReconnect,
    Shutdown,
    /// An event that did not come over the socket (the scripted run).
    Event(WorkflowEvent),
}

/// Side effects requested by the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    OpenSocket { generation: u64, url: String },
    CloseSocket { generation: u64 },
    Schedule { token: TimerToken, delay_ms: u32 },
    Cancel { token: TimerToken },
}

pub struct App<S: SceneGraph> {
    config: VisualizerConfig,
    view: WorkflowView<S>,
    link: ConnectionManager,
    timers: TimerBook,
    last_outcome: Option<Outcome>,
}

impl<S: SceneGraph> App<S> {
    pub fn new(scene: S, config: VisualizerConfig) -> Self {
        let link = ConnectionManager::new(
            &config.ws_url,
            config.reconnect_delay_ms,
            config.manual_reconnect_delay_ms,
        );
        Self {
            view: WorkflowView::new(scene, config.entrance_stagger_ms),
            link,
            timers: TimerBook::new(),
            last_outcome: None,
            config,
        }
    }

    pub fn view(&self) -> &WorkflowView<S> {
        &self.view
    }

    pub fn scene_mut(&mut self) -> &mut S {
        self.view.scene_mut()
    }

    pub fn status(&self) -> SocketStatus {
        self.link.status()
    }

    pub fn timers(&self) -> &TimerBook {
        &self.timers
    }

    pub fn is_shut_down(&self) -> bool {
        self.link.is_shut_down()
    }

    /// Outcome of the most recently dispatched workflow event.
    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.last_outcome.as_ref()
    }

    pub fn handle(&mut self, input: Input) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.link.is_shut_down() {
            return effects;
        }

        match input {
            Input::Start => {
                let commands = self.link.start();
                self.apply(commands, &mut effects);
            }
            Input::Socket { generation, event } => {
                let commands = self.link.handle_socket(generation, event);
                self.apply(commands, &mut effects);
            }
            Input::TimerFired(token) => match self.timers.fire(token) {
                Some(TimerKind::Reconnect) => {
                    let commands = self.link.reconnect_due();
                    self.apply(commands, &mut effects);
                }
                Some(TimerKind::ResizeDebounce) => {
                    if self.view.relayout() {
                        crate::console_log!("Relayout after resize");
                    }
                }
                None => {}
            },
            Input::Resize => {
                let (token, replaced) = self.timers.arm(TimerKind::ResizeDebounce);
                if let Some(old) = replaced {
                    effects.push(Effect::Cancel { token: old });
                }
                effects.push(Effect::Schedule {
                    token,
                    delay_ms: self.config.resize_debounce_ms,
                });
            }
            Input::ManualReconnect => {
                crate::console_log!("🔄 Manual reconnect requested");
                let commands = self.link.reconnect();
                self.apply(commands, &mut effects);
            }
            Input::Shutdown => {
                let commands = self.link.shutdown();
                self.apply(commands, &mut effects);
                if let Some(token) = self.timers.cancel(TimerKind::ResizeDebounce) {
                    effects.push(Effect::Cancel { token });
                }
            }
            Input::Event(event) => self.deliver(event),
        }
        effects
    }

    /// Report that the socket for `generation` could not even be created.
    /// It is treated as an error followed by a close so the normal retry
    /// loop takes over.
    pub fn socket_failed(&mut self, generation: u64, reason: &str) -> Vec<Effect> {
        let mut effects = self.handle(Input::Socket {
            generation,
            event: SocketEvent::Error(reason.to_string()),
        });
        effects.extend(self.handle(Input::Socket {
            generation,
            event: SocketEvent::Closed,
        }));
        effects
    }

    fn apply(&mut self, commands: Vec<LinkCommand>, effects: &mut Vec<Effect>) {
        for command in commands {
            match command {
                LinkCommand::Open { generation, url } => {
                    effects.push(Effect::OpenSocket { generation, url })
                }
                LinkCommand::Close { generation } => effects.push(Effect::CloseSocket { generation }),
                LinkCommand::ScheduleReconnect { delay_ms } => {
                    let (token, replaced) = self.timers.arm(TimerKind::Reconnect);
                    if let Some(old) = replaced {
                        effects.push(Effect::Cancel { token: old });
                    }
                    effects.push(Effect::Schedule { token, delay_ms });
                }
                LinkCommand::CancelReconnect => {
                    if let Some(token) = self.timers.cancel(TimerKind::Reconnect) {
                        effects.push(Effect::Cancel { token });
                    }
                }
                LinkCommand::Status(status) => self.view.show_socket_status(status),
                LinkCommand::Deliver(event) => self.deliver(event),
            }
        }
    }

    fn deliver(&mut self, event: WorkflowEvent) {
        let outcome = update::dispatch(&mut self.view, event);
        self.last_outcome = Some(outcome);
    }
}
