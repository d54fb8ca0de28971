//! # Peer-connection adapter over a simulated engine
//!
//! A stand-in "native engine" runs every operation on its own threads and
//! reports back through callbacks. The adapter turns those callbacks into
//! events (`on_candidate`, `on_signaling_state`) and awaitable operations
//! (`create_offer`, `set_remote_description`) that resume on a signaling strand.
//!
//! Run with:
//! ```text
//! RUST_LOG=callbridge=trace,engine_adapter=info cargo run --example engine_adapter
//! ```

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use callbridge::{
    bridge, Completion, ErrorCode, Event, EventSource, Expected, PeerConnectionError, ResultExt,
    Strand, StrandConfig,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SignalingState {
    Stable,
    HaveLocalOffer,
}

/// Events the engine raises, owned by the adapter.
#[derive(Default)]
struct Signals {
    candidate: EventSource<String>,
    signaling_state: EventSource<SignalingState>,
}

/// Simulated engine: each call returns at once and reports from a worker thread.
struct Engine {
    signals: Arc<Signals>,
}

impl Engine {
    fn create_offer(&self, done: Completion<String, PeerConnectionError>) {
        let signals = Arc::clone(&self.signals);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            signals.signaling_state.emit(SignalingState::HaveLocalOffer);
            done.succeed("v=0\r\no=- 4611 2 IN IP4 127.0.0.1\r\n".to_string());
            for port in [50000, 50001] {
                thread::sleep(Duration::from_millis(5));
                signals
                    .candidate
                    .emit(format!("candidate:1 1 udp 2122260223 192.0.2.1 {port} typ host"));
            }
        });
    }

    fn set_remote_description(&self, sdp: String, done: Completion<(), PeerConnectionError>) {
        let signals = Arc::clone(&self.signals);
        thread::spawn(move || {
            if !sdp.starts_with("v=0") {
                done.fail(PeerConnectionError::InvalidSdp);
                return;
            }
            // Treated as the answer to our offer.
            signals.signaling_state.emit(SignalingState::Stable);
            done.succeed(());
        });
    }
}

/// What application code sees.
struct PeerConnection {
    engine: Engine,
    strand: Strand,
}

impl PeerConnection {
    fn new(strand: Strand) -> Self {
        Self {
            engine: Engine {
                signals: Arc::default(),
            },
            strand,
        }
    }

    fn on_candidate(&self) -> &Event<String> {
        self.engine.signals.candidate.event()
    }

    fn on_signaling_state(&self) -> &Event<SignalingState> {
        self.engine.signals.signaling_state.event()
    }

    async fn create_offer(&self) -> Result<String, PeerConnectionError> {
        bridge::run_on(self.strand.executor(), |done| self.engine.create_offer(done)).await
    }

    async fn set_remote_description(&self, sdp: &str) -> Result<(), PeerConnectionError> {
        let sdp = sdp.to_string();
        bridge::run_on(self.strand.executor(), |done| {
            self.engine.set_remote_description(sdp, done)
        })
        .await
    }
}

/// Application-side observer; subscriptions end when it is dropped.
struct Ui {
    name: &'static str,
}

impl Ui {
    fn attach(self: &Arc<Self>, pc: &PeerConnection) {
        pc.on_candidate()
            .subscribe(&Arc::downgrade(self), |ui: &Ui, c: &String| {
                info!(ui = ui.name, candidate = %c, "local candidate");
            });
        pc.on_signaling_state()
            .subscribe(&Arc::downgrade(self), |ui: &Ui, s: &SignalingState| {
                info!(ui = ui.name, state = ?s, "signaling state changed");
            });
    }
}

async fn negotiate(pc: &PeerConnection, remote: &str) -> Expected<String> {
    let offer = pc.create_offer().await?;
    pc.set_remote_description(remote).await?;
    Ok(offer)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let strand = Strand::new(StrandConfig::named("signaling"));
    let pc = Arc::new(PeerConnection::new(strand.clone()));

    let ui = Arc::new(Ui { name: "main" });
    ui.attach(&pc);

    // Hosted on the strand: every step after an await runs there.
    let session = Arc::clone(&pc);
    let here = strand.clone();
    let first = strand
        .spawn(async move {
            let res = negotiate(&session, "v=0\r\n").await;
            info!(on_strand = here.running_in_this_strand(), "negotiation resumed");
            res
        })
        .await;
    match first {
        Ok(Ok(offer)) => info!(lines = offer.lines().count(), "negotiation finished"),
        Ok(Err(err)) => warn!(error = %err, "negotiation failed"),
        Err(closed) => warn!(error = %closed, "signaling strand stopped"),
    }

    let rejected = negotiate(&pc, "garbage").await;
    if rejected.has_error() {
        let code = rejected.error();
        report(&code);
        let label = code
            .as_domain::<PeerConnectionError>()
            .map(|e| e.as_label())
            .unwrap_or("foreign");
        info!(label, "second attempt rejected");
    }

    // Late candidates from the engine thread reach nobody once the UI is gone.
    drop(ui);
    tokio::time::sleep(Duration::from_millis(50)).await;
    info!(
        stored = pc.on_candidate().len(),
        "candidate subscriptions after UI dropped"
    );

    strand.shutdown().await;
}

fn report(code: &ErrorCode) {
    warn!(
        category = code.category().name(),
        value = code.value(),
        message = %code.message(),
        "engine rejected the operation"
    );
}
