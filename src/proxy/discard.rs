//! Default log destination of endpoint clients.

use std::sync::OnceLock;

use tracing::level_filters::LevelFilter;
use tracing::span::{Attributes, Id, Record};
use tracing::subscriber::Interest;
use tracing::{Dispatch, Event, Metadata, Subscriber};

/// Subscriber that records nothing.
///
/// Unlike [`Dispatch::none`] it is registered with the callsite registry and
/// answers `sometimes` for every callsite, so a callsite first reached while
/// it is the current dispatcher stays enabled for other dispatchers.
#[derive(Debug, Clone, Copy, Default)]
struct Discard;

impl Subscriber for Discard {
    fn register_callsite(&self, _metadata: &'static Metadata<'static>) -> Interest {
        Interest::sometimes()
    }

    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        false
    }

    fn max_level_hint(&self) -> Option<LevelFilter> {
        Some(LevelFilter::OFF)
    }

    fn new_span(&self, _span: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, _event: &Event<'_>) {}

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}

/// Returns the shared dispatcher that discards every log event.
pub(crate) fn discard() -> Dispatch {
    static DISCARD: OnceLock<Dispatch> = OnceLock::new();
    DISCARD.get_or_init(|| Dispatch::new(Discard)).clone()
}
