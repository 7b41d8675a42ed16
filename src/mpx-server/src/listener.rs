// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Line-based TCP control listener.
//!
//! Each client line is one ASCII control command; the reply is `OK`,
//! `ERR <message>` or a JSON status line.

use std::net::SocketAddr;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info};

use mpx_rds::RdsState;

use crate::control::{handle_line, ControlRequest};
use crate::wait_for_shutdown;

/// Run the control listener until shutdown.
pub async fn run_listener(
    addr: SocketAddr,
    tx: mpsc::Sender<ControlRequest>,
    state_rx: watch::Receiver<RdsState>,
    shutdown_rx: watch::Receiver<bool>,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Control listener on {}", addr);
    serve(listener, tx, state_rx, shutdown_rx).await
}

async fn serve(
    listener: TcpListener,
    tx: mpsc::Sender<ControlRequest>,
    state_rx: watch::Receiver<RdsState>,
    shutdown_rx: watch::Receiver<bool>,
) -> std::io::Result<()> {
    loop {
        let (socket, peer) = tokio::select! {
            accepted = listener.accept() => accepted?,
            _ = wait_for_shutdown(shutdown_rx.clone()) => return Ok(()),
        };
        info!("Control client connected: {}", peer);

        let tx = tx.clone();
        let srx = state_rx.clone();
        let client_shutdown = shutdown_rx.clone();
        tokio::spawn(async move {
            tokio::select! {
                res = handle_client(socket, peer, tx, srx) => {
                    if let Err(e) = res {
                        error!("Control client {} error: {:?}", peer, e);
                    }
                }
                _ = wait_for_shutdown(client_shutdown) => {}
            }
        });
    }
}

async fn handle_client(
    socket: TcpStream,
    addr: SocketAddr,
    tx: mpsc::Sender<ControlRequest>,
    state_rx: watch::Receiver<RdsState>,
) -> std::io::Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            info!("Control client {} disconnected", addr);
            break;
        }

        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.trim().is_empty() {
            continue;
        }

        let resp = handle_line(trimmed, &tx, &state_rx).await;
        debug!("{} {:?} -> {:?}", addr, trimmed, resp);
        let resp_line = resp.to_line() + "\n";
        writer.write_all(resp_line.as_bytes()).await?;
        writer.flush().await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpx_protocol::ControlCommand;

    #[tokio::test]
    #[ignore = "requires TCP bind permissions"]
    async fn answers_each_line() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let (tx, mut rx) = mpsc::channel::<ControlRequest>(4);
        let (_state_tx, state_rx) = watch::channel(RdsState::default());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let server = tokio::spawn(serve(listener, tx, state_rx, shutdown_rx));
        tokio::spawn(async move {
            while let Some(req) = rx.recv().await {
                let result = match req.cmd {
                    ControlCommand::OutputVolume(_) => Ok(()),
                    _ => Err(mpx_rds::RdsError::PtyOutOfRange(40).into()),
                };
                let _ = req.respond_to.send(result);
            }
        });

        let stream = TcpStream::connect(addr).await.expect("connect");
        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);
        writer
            .write_all(b"VOL 80\r\nBOGUS\nSTATUS\n")
            .await
            .expect("write");

        let mut line = String::new();
        reader.read_line(&mut line).await.expect("read");
        assert_eq!(line, "OK\n");
        line.clear();
        reader.read_line(&mut line).await.expect("read");
        assert!(line.starts_with("ERR "));
        line.clear();
        reader.read_line(&mut line).await.expect("read");
        let status: serde_json::Value = serde_json::from_str(line.trim()).expect("json");
        assert_eq!(status["pi"], "1000");

        shutdown_tx.send(true).expect("shutdown");
        server.await.expect("join").expect("serve");
    }
}
