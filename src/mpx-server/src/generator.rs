// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! The real-time generation thread.
//!
//! Owns the encoder, the mixer and the PCM sink. Control requests are
//! drained between blocks without blocking; the published state is pushed
//! to a watch channel after every applied change.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, info, warn};

use mpx_core::Mpx;
use mpx_protocol::ControlCommand;
use mpx_rds::{RdsEncoder, RdsState};

use crate::control::ControlRequest;
use crate::error::CommandError;
use crate::output::PcmSink;

const THREAD_NAME: &str = "mpx-gen";

/// Everything the generation thread takes ownership of.
pub struct Generator {
    pub encoder: RdsEncoder,
    pub mpx: Mpx,
    pub sink: PcmSink,
    pub frames_per_block: usize,
}

/// Channels connecting the generation thread to the control side.
pub struct GeneratorLinks {
    pub control_rx: mpsc::Receiver<ControlRequest>,
    pub state_tx: watch::Sender<RdsState>,
    pub stop: Arc<AtomicBool>,
    /// Fires when the thread exits for any reason.
    pub done_tx: oneshot::Sender<()>,
}

pub fn spawn_generator(gen: Generator, links: GeneratorLinks) -> io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name(THREAD_NAME.to_string())
        .spawn(move || {
            let GeneratorLinks {
                mut control_rx,
                state_tx,
                stop,
                done_tx,
            } = links;
            if let Err(e) = run_generator(gen, &mut control_rx, &state_tx, &stop) {
                error!("Generator thread error: {}", e);
            }
            let _ = done_tx.send(());
        })
}

fn run_generator(
    mut gen: Generator,
    control_rx: &mut mpsc::Receiver<ControlRequest>,
    state_tx: &watch::Sender<RdsState>,
    stop: &AtomicBool,
) -> io::Result<()> {
    let frames = gen.frames_per_block.max(1);
    let mut block = vec![0.0f32; frames * 2];
    info!(
        "Generator started: {} stream(s), {} frames per block, {:?}",
        gen.mpx.stream_count(),
        frames,
        gen.sink.format()
    );
    state_tx.send_replace(gen.encoder.state().clone());

    while !stop.load(Ordering::Relaxed) {
        drain_requests(&mut gen, control_rx, state_tx);

        let written = gen.mpx.next_frame_block(&mut gen.encoder, &mut block, frames);
        match gen.sink.write_samples(&block[..written * 2]) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                info!("Output closed, stopping generator");
                return Ok(());
            }
            Err(e) => return Err(e),
        }
    }

    gen.sink.flush()?;
    info!("Generator stopped");
    Ok(())
}

/// Apply every queued request. Never blocks.
fn drain_requests(
    gen: &mut Generator,
    control_rx: &mut mpsc::Receiver<ControlRequest>,
    state_tx: &watch::Sender<RdsState>,
) {
    loop {
        let req = match control_rx.try_recv() {
            Ok(req) => req,
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return,
        };
        let result = apply_command(gen, req.cmd);
        match &result {
            Ok(()) => {
                debug!("Applied {:?}", req.cmd);
                state_tx.send_replace(gen.encoder.state().clone());
            }
            Err(e) => warn!("Rejected {:?}: {}", req.cmd, e),
        }
        let _ = req.respond_to.send(result);
    }
}

fn apply_command(gen: &mut Generator, cmd: ControlCommand) -> Result<(), CommandError> {
    match cmd {
        ControlCommand::Rds(cmd) => gen.encoder.apply(cmd)?,
        ControlCommand::CarrierVolumes(levels) => {
            for (carrier, percent) in levels.into_iter().enumerate() {
                gen.mpx.set_carrier_volume(carrier, percent)?;
            }
        }
        ControlCommand::OutputVolume(percent) => gen.mpx.set_output_volume(percent),
        // Served from the state watch by the control side.
        ControlCommand::Status => {}
    }
    Ok(())
}
