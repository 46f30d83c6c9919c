//! Browser runtime: owns the [`App`] and carries out its effects with real
//! sockets and timers.
//!
//! Every callback holds a `Weak` reference to the runtime, so dropping the
//! handle returned by [`mount`] releases the whole thing.  Inputs are queued
//! and drained one at a time; effects run only after the app borrow is
//! released.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, EventTarget, KeyboardEvent, Window};

use crate::app::{App, Effect, Input};
use crate::canvas::dom::DomScene;
use crate::config::VisualizerConfig;
use crate::demo;
use crate::network::ws_client::{BrowserSocket, SocketSink};
use crate::network::SocketEvent;
use crate::timers::TimerToken;
use crate::ui;

/// A window listener that unregisters itself when dropped.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref())
        {
            crate::console_warn!("Failed to remove {} listener: {:?}", self.kind, e);
        }
    }
}

struct Runtime {
    app: RefCell<App<DomScene>>,
    queue: RefCell<VecDeque<Input>>,
    draining: Cell<bool>,
    sockets: RefCell<HashMap<u64, BrowserSocket>>,
    timers: RefCell<HashMap<TimerToken, Timeout>>,
    listeners: RefCell<Vec<Listener>>,
    demo_running: Cell<bool>,
    me: Weak<Runtime>,
}

impl Runtime {
    fn new(app: App<DomScene>) -> Rc<Self> {
        Rc::new_cyclic(|me| Self {
            app: RefCell::new(app),
            queue: RefCell::new(VecDeque::new()),
            draining: Cell::new(false),
            sockets: RefCell::new(HashMap::new()),
            timers: RefCell::new(HashMap::new()),
            listeners: RefCell::new(Vec::new()),
            demo_running: Cell::new(false),
            me: me.clone(),
        })
    }

    /// Queue `input` and, unless a drain is already in progress further up
    /// the stack, process the queue.
    fn feed(&self, input: Input) {
        self.queue.borrow_mut().push_back(input);
        if self.draining.replace(true) {
            return;
        }
        loop {
            let Some(input) = self.queue.borrow_mut().pop_front() else {
                break;
            };
            let effects = self.app.borrow_mut().handle(input);
            self.execute(effects);
        }
        self.draining.set(false);
    }

    fn execute(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::OpenSocket { generation, url } => self.open_socket(generation, &url),
                Effect::CloseSocket { generation } => {
                    // Handlers are detached on drop, so no close event follows.
                    let socket = self.sockets.borrow_mut().remove(&generation);
                    drop(socket);
                }
                Effect::Schedule { token, delay_ms } => {
                    let me = self.me.clone();
                    let timeout = Timeout::new(delay_ms, move || {
                        if let Some(runtime) = me.upgrade() {
                            runtime.feed(Input::TimerFired(token));
                            runtime.forget_timer_later(token);
                        }
                    });
                    self.timers.borrow_mut().insert(token, timeout);
                }
                Effect::Cancel { token } => {
                    // Dropping a gloo `Timeout` clears it.
                    let timeout = self.timers.borrow_mut().remove(&token);
                    drop(timeout);
                }
            }
        }
    }

    fn open_socket(&self, generation: u64, url: &str) {
        let me = self.me.clone();
        let sink: SocketSink = Rc::new(move |generation, event| {
            let Some(runtime) = me.upgrade() else {
                return;
            };
            let closed = matches!(event, SocketEvent::Closed);
            runtime.feed(Input::Socket { generation, event });
            if closed {
                runtime.release_socket_later(generation);
            }
        });

        match BrowserSocket::open(url, generation, sink) {
            Ok(socket) => {
                self.sockets.borrow_mut().insert(socket.generation(), socket);
            }
            Err(e) => {
                crate::console_error!("Failed to create WebSocket for {}: {:?}", url, e);
                let reason = e.as_string().unwrap_or_else(|| format!("{:?}", e));
                let effects = self.app.borrow_mut().socket_failed(generation, &reason);
                self.execute(effects);
            }
        }
    }

    // A socket or timer cannot be dropped from inside its own callback; the
    // removal waits for the next microtask.

    fn release_socket_later(&self, generation: u64) {
        let me = self.me.clone();
        spawn_local(async move {
            if let Some(runtime) = me.upgrade() {
                let socket = runtime.sockets.borrow_mut().remove(&generation);
                drop(socket);
            }
        });
    }

    fn forget_timer_later(&self, token: TimerToken) {
        let me = self.me.clone();
        spawn_local(async move {
            if let Some(runtime) = me.upgrade() {
                let timeout = runtime.timers.borrow_mut().remove(&token);
                drop(timeout);
            }
        });
    }

    fn install_listeners(&self, window: &Window) -> Result<(), JsValue> {
        let me = self.me.clone();
        self.listen(window, "resize", move |_| {
            if let Some(runtime) = me.upgrade() {
                runtime.feed(Input::Resize);
            }
        })?;

        let me = self.me.clone();
        self.listen(window, "keydown", move |event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if key.ctrl_key() && key.key().eq_ignore_ascii_case("r") {
                event.prevent_default();
                if let Some(runtime) = me.upgrade() {
                    runtime.feed(Input::ManualReconnect);
                }
            }
        })?;

        let me = self.me.clone();
        self.listen(window, "pagehide", move |_| {
            if let Some(runtime) = me.upgrade() {
                runtime.shutdown();
            }
        })?;
        Ok(())
    }

    fn listen<F>(&self, window: &Window, kind: &'static str, handler: F) -> Result<(), JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let target: &EventTarget = window.as_ref();
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        self.listeners.borrow_mut().push(Listener {
            target: target.clone(),
            kind,
            callback,
        });
        Ok(())
    }

    fn shutdown(&self) {
        self.feed(Input::Shutdown);

        let me = self.me.clone();
        spawn_local(async move {
            if let Some(runtime) = me.upgrade() {
                let listeners: Vec<Listener> = runtime.listeners.borrow_mut().drain(..).collect();
                drop(listeners);
                let sockets: Vec<BrowserSocket> =
                    runtime.sockets.borrow_mut().drain().map(|(_, s)| s).collect();
                drop(sockets);
                runtime.timers.borrow_mut().clear();
            }
        });
    }

    fn run_demo(&self) {
        if self.demo_running.replace(true) {
            crate::console_warn!("Demo already running");
            return;
        }
        let me = self.me.clone();
        spawn_local(async move {
            for scripted in demo::scripted_run() {
                TimeoutFuture::new(scripted.delay_ms).await;
                let Some(runtime) = me.upgrade() else {
                    return;
                };
                if runtime.app.borrow().is_shut_down() {
                    runtime.demo_running.set(false);
                    return;
                }
                runtime.feed(Input::Event(scripted.event));
            }
            if let Some(runtime) = me.upgrade() {
                runtime.demo_running.set(false);
            }
        });
    }
}

/// JS-side handle of a mounted visualizer.
#[wasm_bindgen]
pub struct VisualizerHandle {
    runtime: Rc<Runtime>,
}

#[wasm_bindgen]
impl VisualizerHandle {
    /// Drop the current socket and connect again.
    pub fn reconnect(&self) {
        self.runtime.feed(Input::ManualReconnect);
    }

    /// Close the socket and stop every timer and listener.
    pub fn shutdown(&self) {
        self.runtime.shutdown();
    }

    /// Play the canned five-stage workflow through the visualizer.
    #[wasm_bindgen(js_name = runDemo)]
    pub fn run_demo(&self) {
        self.runtime.run_demo();
    }

    /// Current connection status: connecting, connected, disconnected or error.
    pub fn status(&self) -> String {
        self.runtime.app.borrow().status().to_string()
    }
}

/// Build the page chrome, attach the scene and connect to the workflow server.
#[wasm_bindgen]
pub fn mount() -> Result<VisualizerHandle, JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global `window` exists"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("should have a document on window"))?;

    ui::setup::ensure_chrome(&document)?;

    let mut config = VisualizerConfig::default();
    let search = window.location().search()?;
    config.apply_query(&search, |raw| {
        js_sys::decode_uri_component(raw).ok().map(String::from)
    });
    crate::console_log!("Workflow server: {}", config.ws_url);

    let scene = DomScene::attach(&document, config.summary_reveal_delay_ms)?;
    let runtime = Runtime::new(App::new(scene, config));
    runtime.install_listeners(&window)?;
    runtime.feed(Input::Start);

    Ok(VisualizerHandle { runtime })
}
