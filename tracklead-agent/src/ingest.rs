//! Detection ingest from the vision pipeline.
//!
//! The producer connects over TCP and streams [`FrameCodec`] frames:
//!
//! ```text
//! tag 0  Detection (bincode: x, y, width, height as f64)
//! tag 1  no target this frame (empty payload)
//! ```
//!
//! One producer is served at a time; a new connection is accepted once
//! the previous one closes.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures::StreamExt;
use tokio::io::AsyncRead;
use tokio::net::TcpListener;
use tokio_util::codec::FramedRead;
use tracing::{debug, info, warn};

use tracklead_core::{Detection, Frame, FrameCodec, SlotSender, TrackError};

pub const TAG_DETECTION: u8 = 0;
pub const TAG_NO_TARGET: u8 = 1;

/// Build the frame a producer sends for one sample.
pub fn encode_sample(sample: Option<&Detection>) -> Result<Frame, TrackError> {
    match sample {
        Some(d) => Frame::encode(TAG_DETECTION, d),
        None => Ok(Frame::empty(TAG_NO_TARGET)),
    }
}

/// Interpret one frame as a slot sample.
pub fn decode_sample(frame: &Frame) -> Result<Option<Detection>, TrackError> {
    match frame.tag {
        TAG_DETECTION => Ok(Some(frame.decode()?)),
        TAG_NO_TARGET => Ok(None),
        other => Err(TrackError::UnknownTag(other)),
    }
}

pub struct DetectionServer {
    listener: TcpListener,
    slot: SlotSender,
}

impl DetectionServer {
    pub async fn bind(addr: &str, slot: SlotSender) -> Result<Self, TrackError> {
        let listener = TcpListener::bind(addr).await?;
        info!("detection ingest listening on {}", listener.local_addr()?);
        Ok(Self { listener, slot })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, TrackError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept producers until `running` clears.
    pub async fn run(&self, running: Arc<AtomicBool>) {
        while running.load(Ordering::SeqCst) {
            let accept = tokio::select! {
                result = self.listener.accept() => result,
                _ = wait_for_stop(&running) => break,
            };

            let (stream, peer) = match accept {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("accept error: {e}");
                    continue;
                }
            };
            let _ = stream.set_nodelay(true);

            info!("detection producer connected from {peer}");
            let received = tokio::select! {
                n = forward_samples(stream, &self.slot) => n,
                _ = wait_for_stop(&running) => break,
            };
            info!(
                "producer {peer} disconnected after {received} frames ({} dropped as stale)",
                self.slot.dropped()
            );
        }
    }
}

/// Read frames from `reader` into the slot until EOF or a framing
/// error. Undecodable frames are skipped. Returns the frame count.
pub async fn forward_samples<R: AsyncRead + Unpin>(reader: R, slot: &SlotSender) -> u64 {
    let mut frames = FramedRead::new(reader, FrameCodec);
    let mut count = 0;

    while let Some(next) = frames.next().await {
        let frame = match next {
            Ok(frame) => frame,
            Err(e) => {
                if !matches!(&e, TrackError::Io(io) if io.kind() == std::io::ErrorKind::UnexpectedEof)
                {
                    warn!("detection stream error: {e}");
                }
                break;
            }
        };
        count += 1;

        match decode_sample(&frame) {
            Ok(sample) => {
                slot.submit(sample);
            }
            Err(e) => debug!("skipping frame: {e}"),
        }
    }
    count
}

/// Resolves when `running` becomes false.
pub(crate) async fn wait_for_stop(running: &Arc<AtomicBool>) {
    loop {
        if !running.load(Ordering::SeqCst) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}
