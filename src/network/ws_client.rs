use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, MessageEvent, WebSocket};

use super::connection::SocketEvent;

/// Receives the callbacks of a socket together with its generation.
pub type SocketSink = Rc<dyn Fn(u64, SocketEvent)>;

/// A browser WebSocket plus the closures attached to it.
///
/// The handlers are detached before the closures are released, so a socket
/// that is dropped while still closing never calls into freed memory.
pub struct BrowserSocket {
    generation: u64,
    ws: WebSocket,
    _onopen: Closure<dyn FnMut(Event)>,
    _onmessage: Closure<dyn FnMut(MessageEvent)>,
    _onerror: Closure<dyn FnMut(Event)>,
    _onclose: Closure<dyn FnMut(Event)>,
}

impl BrowserSocket {
    /// Create the socket and attach its handlers.  Fails synchronously only
    /// when the browser rejects the URL.
    pub fn open(url: &str, generation: u64, sink: SocketSink) -> Result<Self, JsValue> {
        let ws = WebSocket::new(url)?;

        let on_open = sink.clone();
        let onopen = Closure::wrap(Box::new(move |_: Event| {
            on_open(generation, SocketEvent::Opened);
        }) as Box<dyn FnMut(Event)>);
        ws.set_onopen(Some(onopen.as_ref().unchecked_ref()));

        let on_message = sink.clone();
        let onmessage = Closure::wrap(Box::new(move |event: MessageEvent| {
            match event.data().as_string() {
                Some(text) => on_message(generation, SocketEvent::Message(text)),
                None => crate::console_warn!("Received non-text WebSocket message"),
            }
        }) as Box<dyn FnMut(MessageEvent)>);
        ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));

        let on_error = sink.clone();
        let onerror = Closure::wrap(Box::new(move |event: Event| {
            on_error(generation, SocketEvent::Error(format!("{} event", event.type_())));
        }) as Box<dyn FnMut(Event)>);
        ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));

        let on_close = sink;
        let onclose = Closure::wrap(Box::new(move |_: Event| {
            on_close(generation, SocketEvent::Closed);
        }) as Box<dyn FnMut(Event)>);
        ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));

        Ok(Self {
            generation,
            ws,
            _onopen: onopen,
            _onmessage: onmessage,
            _onerror: onerror,
            _onclose: onclose,
        })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for BrowserSocket {
    fn drop(&mut self) {
        self.ws.set_onopen(None);
        self.ws.set_onmessage(None);
        self.ws.set_onerror(None);
        self.ws.set_onclose(None);

        let state = self.ws.ready_state();
        if state == WebSocket::CONNECTING || state == WebSocket::OPEN {
            if let Err(e) = self.ws.close_with_code(1000) {
                crate::console_error!("Error sending close command: {:?}", e);
            }
        }
    }
}
