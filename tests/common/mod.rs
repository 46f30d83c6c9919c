//! Fake runtime for driving `App` in tests: a virtual clock, recorded socket
//! opens/closes and one-shot timers that fire in due order.
#![allow(dead_code)]

use std::collections::BTreeMap;

use workflow_visualizer::canvas::HeadlessScene;
use workflow_visualizer::models::Viewport;
use workflow_visualizer::timers::TimerToken;
use workflow_visualizer::{App, Effect, Input, SocketEvent, VisualizerConfig};

pub const URL: &str = "ws://workflow.test:8081";

pub struct Harness {
    pub app: App<HeadlessScene>,
    now: u64,
    timers: BTreeMap<TimerToken, u64>,
    /// `(time, generation)` of every socket the app asked to open.
    pub opened: Vec<(u64, u64)>,
    pub closed: Vec<u64>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_viewport(Viewport::new(1200.0, 800.0))
    }

    pub fn with_viewport(viewport: Viewport) -> Self {
        Self {
            app: App::new(HeadlessScene::new(viewport), VisualizerConfig::with_ws_url(URL)),
            now: 0,
            timers: BTreeMap::new(),
            opened: Vec::new(),
            closed: Vec::new(),
        }
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn send(&mut self, input: Input) {
        let effects = self.app.handle(input);
        self.run(effects);
    }

    pub fn socket(&mut self, generation: u64, event: SocketEvent) {
        self.send(Input::Socket { generation, event });
    }

    pub fn message(&mut self, generation: u64, json: &str) {
        self.socket(generation, SocketEvent::Message(json.to_string()));
    }

    /// Start and complete the handshake of the first socket.
    pub fn connected() -> Self {
        let mut harness = Self::new();
        harness.send(Input::Start);
        harness.socket(1, SocketEvent::Opened);
        harness
    }

    pub fn last_generation(&self) -> Option<u64> {
        self.opened.last().map(|(_, generation)| *generation)
    }

    /// Move the clock forward, firing every timer that falls due on the way.
    pub fn advance(&mut self, ms: u64) {
        let target = self.now + ms;
        loop {
            let next = self
                .timers
                .iter()
                .filter(|(_, due)| **due <= target)
                .min_by_key(|(token, due)| (**due, **token))
                .map(|(token, due)| (*token, *due));
            let Some((token, due)) = next else {
                break;
            };
            self.timers.remove(&token);
            self.now = due;
            self.send(Input::TimerFired(token));
        }
        self.now = target;
    }

    fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::OpenSocket { generation, url } => {
                    assert_eq!(url, URL);
                    self.opened.push((self.now, generation));
                }
                Effect::CloseSocket { generation } => self.closed.push(generation),
                Effect::Schedule { token, delay_ms } => {
                    self.timers.insert(token, self.now + u64::from(delay_ms));
                }
                Effect::Cancel { token } => {
                    self.timers.remove(&token);
                }
            }
        }
    }
}
