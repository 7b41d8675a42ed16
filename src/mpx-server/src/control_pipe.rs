// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Control FIFO reader.
//!
//! Reads one command per line. A FIFO is opened without waiting for a
//! writer and stays open across writers. Any other file is read once.

use std::io;
use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::net::unix::pipe;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use mpx_protocol::ControlResponse;
use mpx_rds::RdsState;

use crate::control::{handle_line, ControlRequest};
use crate::wait_for_shutdown;

const REOPEN_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, PartialEq, Eq)]
enum LinesEnd {
    Eof,
    Shutdown,
}

pub async fn run_control_pipe(
    path: PathBuf,
    tx: mpsc::Sender<ControlRequest>,
    state_rx: watch::Receiver<RdsState>,
    shutdown_rx: watch::Receiver<bool>,
) -> io::Result<()> {
    let metadata = tokio::fs::metadata(&path).await?;
    if !metadata.file_type().is_fifo() {
        info!("Reading control commands from file {}", path.display());
        let file = File::open(&path).await?;
        read_commands(BufReader::new(file), &tx, &state_rx, &shutdown_rx).await?;
        debug!("Control file {} done", path.display());
        return Ok(());
    }

    info!("Reading control commands from {}", path.display());
    loop {
        let receiver = open_fifo(&path)?;
        debug!("Control pipe opened");
        if read_commands(BufReader::new(receiver), &tx, &state_rx, &shutdown_rx).await?
            == LinesEnd::Shutdown
        {
            return Ok(());
        }
        debug!("Control pipe writer closed, reopening");
        tokio::select! {
            _ = tokio::time::sleep(REOPEN_DELAY) => {}
            _ = wait_for_shutdown(shutdown_rx.clone()) => return Ok(()),
        }
    }
}

fn open_fifo(path: &Path) -> io::Result<pipe::Receiver> {
    let mut options = pipe::OpenOptions::new();
    // Holding the write end as well keeps reads from seeing EOF between writers.
    #[cfg(target_os = "linux")]
    options.read_write(true);
    options.open_receiver(path)
}

async fn read_commands<R: AsyncBufRead + Unpin>(
    reader: R,
    tx: &mpsc::Sender<ControlRequest>,
    state_rx: &watch::Receiver<RdsState>,
    shutdown_rx: &watch::Receiver<bool>,
) -> io::Result<LinesEnd> {
    let mut lines = reader.lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = wait_for_shutdown(shutdown_rx.clone()) => return Ok(LinesEnd::Shutdown),
        };
        let Some(line) = line else {
            return Ok(LinesEnd::Eof);
        };
        if line.trim().is_empty() {
            continue;
        }
        log_response(&line, handle_line(&line, tx, state_rx).await);
    }
}

fn log_response(line: &str, resp: ControlResponse) {
    match resp {
        ControlResponse::Error(e) => warn!("Control pipe: {:?} rejected: {}", line, e),
        ControlResponse::Ok => debug!("Control pipe: {:?} applied", line),
        status => info!("Control pipe: {}", status.to_line()),
    }
}
