//! Tracing subscriber setup
//!
//! Two fmt layers share one writer:
//! - application logs, text or JSON, filtered by `RUST_LOG`
//! - security events on the `security` target, written as the bare JSON
//!   document so each line parses on its own

use std::fmt;
use std::fmt::Write as _;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_subscriber::filter::{filter_fn, EnvFilter, Targets};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, Registry};

use crate::config::LogFormat;

/// Target of security event records
pub const SECURITY_TARGET: &str = "security";

/// Install the global subscriber writing to stdout
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    subscriber(format, filter, std::io::stdout).init();
}

/// Build the subscriber without installing it
pub fn subscriber<W>(format: LogFormat, filter: EnvFilter, make_writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Clone + Send + Sync + 'static,
{
    let not_security = filter_fn(|meta: &Metadata<'_>| meta.target() != SECURITY_TARGET);

    let app: Box<dyn Layer<Registry> + Send + Sync> = match format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(false)
            .without_time()
            .with_writer(make_writer.clone())
            .with_filter(not_security)
            .with_filter(filter)
            .boxed(),
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .without_time()
            .with_writer(make_writer.clone())
            .with_filter(not_security)
            .with_filter(filter)
            .boxed(),
    };

    let security = tracing_subscriber::fmt::layer()
        .event_format(SecurityLineFormat)
        .with_writer(make_writer)
        .with_filter(Targets::new().with_target(SECURITY_TARGET, Level::INFO));

    tracing_subscriber::registry().with(app).with(security)
}

/// Writes only the event message followed by a newline
struct SecurityLineFormat;

impl<S, N> FormatEvent<S, N> for SecurityLineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, _ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        let mut message = MessageVisitor::default();
        event.record(&mut message);
        writeln!(writer, "{}", message.0)
    }
}

#[derive(Default)]
struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.0 = value.to_string();
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}
