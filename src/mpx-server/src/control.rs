// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Line handling shared by the control pipe and the TCP listener.

use tokio::sync::{mpsc, oneshot, watch};
use tracing::error;

use mpx_protocol::{parse_command, ControlCommand, ControlResponse};
use mpx_rds::{RdsSnapshot, RdsState};

use crate::error::CommandError;

/// A validated command on its way to the generation thread.
pub struct ControlRequest {
    pub cmd: ControlCommand,
    pub respond_to: oneshot::Sender<Result<(), CommandError>>,
}

/// Parse one control line, forward it and wait for the outcome.
///
/// `STATUS` is served from the published state without involving the
/// generation thread.
pub async fn handle_line(
    line: &str,
    tx: &mpsc::Sender<ControlRequest>,
    state_rx: &watch::Receiver<RdsState>,
) -> ControlResponse {
    let region = state_rx.borrow().region;
    let cmd = match parse_command(line, region) {
        Ok(cmd) => cmd,
        Err(e) => return ControlResponse::Error(e.to_string()),
    };

    if matches!(cmd, ControlCommand::Status) {
        let state = state_rx.borrow().clone();
        return ControlResponse::Status(Box::new(RdsSnapshot::from_state(&state)));
    }

    let (resp_tx, resp_rx) = oneshot::channel();
    let req = ControlRequest {
        cmd,
        respond_to: resp_tx,
    };
    if let Err(e) = tx.send(req).await {
        error!("Failed to send request to generator: {:?}", e.0.cmd);
        return ControlResponse::Error("generator not running".into());
    }

    match resp_rx.await {
        Ok(Ok(())) => ControlResponse::Ok,
        Ok(Err(e)) => ControlResponse::Error(e.to_string()),
        Err(e) => {
            error!("Generator response oneshot recv error: {:?}", e);
            ControlResponse::Error("generator dropped the request".into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Answer requests the way the generation thread does, applying RDS
    /// commands to a local state.
    fn spawn_fake_generator(
        mut rx: mpsc::Receiver<ControlRequest>,
        state_tx: watch::Sender<RdsState>,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(req) = rx.recv().await {
                let result = match req.cmd {
                    ControlCommand::Rds(cmd) => {
                        let mut state = state_tx.borrow().clone();
                        let result = state.apply(cmd).map_err(CommandError::from);
                        state_tx.send_replace(state);
                        result
                    }
                    _ => Ok(()),
                };
                let _ = req.respond_to.send(result);
            }
        })
    }

    #[tokio::test]
    async fn applies_and_reports_status() {
        let (tx, rx) = mpsc::channel(4);
        let (state_tx, state_rx) = watch::channel(RdsState::default());
        let _gen = spawn_fake_generator(rx, state_tx);

        assert_eq!(handle_line("PS KLUB", &tx, &state_rx).await, ControlResponse::Ok);
        match handle_line("status", &tx, &state_rx).await {
            ControlResponse::Status(snapshot) => assert_eq!(snapshot.ps.trim_end(), "KLUB"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn parse_errors_never_reach_the_generator() {
        let (tx, mut rx) = mpsc::channel(4);
        let (_state_tx, state_rx) = watch::channel(RdsState::default());

        let resp = handle_line("PI zzzz", &tx, &state_rx).await;
        assert!(matches!(resp, ControlResponse::Error(_)));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn rejected_commands_are_errors() {
        let (tx, rx) = mpsc::channel(4);
        let (state_tx, state_rx) = watch::channel(RdsState::default());
        let _gen = spawn_fake_generator(rx, state_tx);

        for _ in 0..25 {
            assert_eq!(handle_line("AF 98.1", &tx, &state_rx).await, ControlResponse::Ok);
        }
        assert!(matches!(
            handle_line("AF 98.3", &tx, &state_rx).await,
            ControlResponse::Error(_)
        ));
        assert_eq!(state_rx.borrow().af.value().len(), 25);
    }

    #[tokio::test]
    async fn stopped_generator() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let (_state_tx, state_rx) = watch::channel(RdsState::default());
        assert_eq!(
            handle_line("TA 1", &tx, &state_rx).await,
            ControlResponse::Error("generator not running".into())
        );
    }
}
