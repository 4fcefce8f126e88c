/// Messages from the transport task to the UI thread, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    StreamStarted,
    StreamDelta(String),
    StreamEnd,
    StreamFailed(String),
}
