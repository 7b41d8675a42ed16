// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

mod config;
mod control;
#[cfg(unix)]
mod control_pipe;
mod error;
mod generator;
mod listener;
mod output;

use std::future::Future;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::builder::BoolishValueParser;
use clap::Parser;
use tokio::signal;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use mpx_app::{init_logging, ConfigFile};
use mpx_core::{DynResult, Mpx};
use mpx_rds::{pty_code, EncoderVariant, RdsEncoder, RftSender};

use config::{exceeds_carrier_ceiling, parse_pi, ServerConfig};
use control::ControlRequest;
use generator::{Generator, GeneratorLinks};
use output::{PcmSink, SampleFormat};

const PKG_DESCRIPTION: &str = concat!(env!("CARGO_PKG_NAME"), " - FM MPX generator with RDS/RDS2");
const CONTROL_CHANNEL_BUFFER: usize = 32;

#[derive(Debug, Parser)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = PKG_DESCRIPTION,
)]
struct Cli {
    /// Path to configuration file
    #[arg(long = "config", short = 'C', value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print example configuration and exit
    #[arg(long = "print-config")]
    print_config: bool,
    /// Program Identification code (hex)
    #[arg(long = "pi", value_name = "HEX")]
    pi: Option<String>,
    /// Program Service name (up to 8 characters)
    #[arg(long = "ps")]
    ps: Option<String>,
    /// RadioText (up to 64 characters)
    #[arg(long = "rt")]
    rt: Option<String>,
    /// Program type, number or name
    #[arg(long = "pty")]
    pty: Option<String>,
    /// Traffic Program flag (0 or 1)
    #[arg(long = "tp", value_name = "0|1", value_parser = BoolishValueParser::new())]
    tp: Option<bool>,
    /// Alternative frequency (repeatable)
    #[arg(long = "af", value_name = "FREQ")]
    af: Vec<f32>,
    /// RBDS call sign; derives the PI code
    #[arg(short = 'c', long = "callsign")]
    callsign: Option<String>,
    /// Control FIFO path
    #[arg(long = "ctl", value_name = "FIFO")]
    ctl: Option<PathBuf>,
    /// Output file, or '-' for stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<String>,
    /// Output sample format
    #[arg(short = 'f', long = "format", value_enum)]
    format: Option<SampleFormat>,
    /// Output volume in percent
    #[arg(long = "volume", value_name = "PERCENT")]
    volume: Option<f32>,
    /// Enable RDS2 with this many extra streams
    #[arg(long = "rds2", value_name = "STREAMS", num_args = 0..=1, default_missing_value = "1")]
    rds2: Option<usize>,
    /// IP address for the TCP control listener (enables it)
    #[arg(short = 'l', long = "listen")]
    listen: Option<IpAddr>,
    /// Port for the TCP control listener (enables it)
    #[arg(short = 'p', long = "port")]
    port: Option<u16>,
}

/// Merge command line overrides into the file configuration.
fn apply_cli(cli: &Cli, cfg: &mut ServerConfig) -> DynResult<()> {
    if let Some(ref pi) = cli.pi {
        parse_pi(pi)?;
        cfg.rds.pi = Some(pi.clone());
        cfg.rds.callsign = None;
    }
    if let Some(ref callsign) = cli.callsign {
        cfg.rds.callsign = Some(callsign.clone());
    }
    if let Some(ref ps) = cli.ps {
        cfg.rds.ps = ps.clone();
    }
    if let Some(ref rt) = cli.rt {
        cfg.rds.rt = rt.clone();
    }
    if let Some(ref pty) = cli.pty {
        cfg.rds.pty = match pty.parse::<u8>() {
            Ok(code) => code,
            Err(_) => pty_code(pty, cfg.rds.region)
                .ok_or_else(|| format!("Unknown program type '{}'", pty))?,
        };
    }
    if let Some(tp) = cli.tp {
        cfg.rds.tp = tp;
    }
    if !cli.af.is_empty() {
        cfg.rds.af = cli.af.clone();
    }
    if let Some(ref ctl) = cli.ctl {
        cfg.control.pipe = Some(ctl.clone());
    }
    if let Some(ref output) = cli.output {
        cfg.output.path = output.clone();
    }
    if let Some(format) = cli.format {
        cfg.output.format = format;
    }
    if let Some(volume) = cli.volume {
        cfg.mpx.output_volume = volume;
    }
    if let Some(streams) = cli.rds2 {
        cfg.rds.variant = EncoderVariant::Rds2;
        cfg.mpx.rds2_streams = streams;
    }
    if let Some(listen) = cli.listen {
        cfg.control.listen = listen;
        cfg.control.listen_enabled = true;
    }
    if let Some(port) = cli.port {
        cfg.control.port = port;
        cfg.control.listen_enabled = true;
    }
    Ok(())
}

/// Build the encoder with its RDS2 streams: an `[[rft]]` entry turns a
/// stream into a file carousel, every other stream tunnels the station.
fn build_encoder(cfg: &ServerConfig) -> DynResult<RdsEncoder> {
    let params = cfg.rds.encoder_params()?;
    let mut encoder = RdsEncoder::new(&params)?;

    for stream in 1..=cfg.mpx.rds2_streams {
        match cfg.rft.iter().find(|rft| rft.stream == stream) {
            Some(rft) => {
                let data = std::fs::read(&rft.path).map_err(|e| {
                    format!("Failed to read RFT file {}: {}", rft.path.display(), e)
                })?;
                let sender = RftSender::new(rft.channel, &data)?;
                info!(
                    "RDS2 stream {}: RFT channel {}, {} ({} segments)",
                    stream,
                    rft.channel,
                    rft.path.display(),
                    sender.segments()
                );
                encoder.add_file_transfer(sender)?;
            }
            None => {
                encoder.add_tunnel()?;
                info!("RDS2 stream {}: tunneling", stream);
            }
        }
    }
    Ok(encoder)
}

pub(crate) async fn wait_for_shutdown(mut shutdown_rx: watch::Receiver<bool>) {
    if *shutdown_rx.borrow() {
        return;
    }
    while shutdown_rx.changed().await.is_ok() {
        if *shutdown_rx.borrow() {
            break;
        }
    }
}

#[tokio::main]
async fn main() -> DynResult<()> {
    let cli = Cli::parse();

    if cli.print_config {
        println!("{}", ServerConfig::example_combined_toml());
        return Ok(());
    }

    let (mut cfg, config_path) = ServerConfig::load(cli.config.as_deref())?;
    apply_cli(&cli, &mut cfg)?;
    cfg.validate()
        .map_err(|e| format!("Invalid server configuration: {}", e))?;

    init_logging(cfg.general.log_level.as_deref());

    if let Some(ref path) = config_path {
        info!("Loaded configuration from {}", path.display());
    }

    let encoder = build_encoder(&cfg)?;
    let levels = cfg.mpx.levels();
    if exceeds_carrier_ceiling(&levels) {
        warn!("Carrier volumes above 15% are clamped");
    }
    let mpx = Mpx::new(
        cfg.mpx.sample_rate,
        encoder.stream_count(),
        cfg.mpx.quadrature,
        &levels,
    )?;
    let sink = PcmSink::open(&cfg.output.path, cfg.output.format, cfg.mpx.frames_per_block)
        .map_err(|e| format!("Failed to open output {}: {}", cfg.output.path, e))?;

    info!(
        "Starting mpx-server ({} Hz, {:?}, {} stream(s), output {})",
        cfg.mpx.sample_rate,
        cfg.output.format,
        encoder.stream_count(),
        cfg.output.path
    );

    let (tx, rx) = mpsc::channel::<ControlRequest>(CONTROL_CHANNEL_BUFFER);
    let (state_tx, state_rx) = watch::channel(encoder.state().clone());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (done_tx, done_rx) = oneshot::channel();
    let stop = Arc::new(AtomicBool::new(false));

    let gen_handle = generator::spawn_generator(
        Generator {
            encoder,
            mpx,
            sink,
            frames_per_block: cfg.mpx.frames_per_block,
        },
        GeneratorLinks {
            control_rx: rx,
            state_tx,
            stop: Arc::clone(&stop),
            done_tx,
        },
    )?;

    let mut task_handles: Vec<JoinHandle<()>> = Vec::new();

    #[cfg(unix)]
    if let Some(pipe) = cfg.control.pipe.clone() {
        let pipe_tx = tx.clone();
        let pipe_state_rx = state_rx.clone();
        let pipe_shutdown_rx = shutdown_rx.clone();
        task_handles.push(tokio::spawn(async move {
            if let Err(e) =
                control_pipe::run_control_pipe(pipe, pipe_tx, pipe_state_rx, pipe_shutdown_rx)
                    .await
            {
                error!("Control pipe error: {:?}", e);
            }
        }));
    }

    #[cfg(not(unix))]
    if let Some(ref pipe) = cfg.control.pipe {
        warn!("Control FIFO {} needs a Unix host, ignoring", pipe.display());
    }

    if cfg.control.listen_enabled {
        let listen_addr = SocketAddr::from((cfg.control.listen, cfg.control.port));
        let listener_tx = tx.clone();
        let listener_state_rx = state_rx.clone();
        let listener_shutdown_rx = shutdown_rx.clone();
        task_handles.push(tokio::spawn(async move {
            if let Err(e) = listener::run_listener(
                listen_addr,
                listener_tx,
                listener_state_rx,
                listener_shutdown_rx,
            )
            .await
            {
                error!("Listener error: {:?}", e);
            }
        }));
    }

    let running = Running {
        stop,
        shutdown_tx,
        tx,
        task_handles,
        gen_handle,
    };
    run_until_stopped(signal::ctrl_c(), done_rx, running).await?;
    Ok(())
}

/// Handles needed to stop the generator thread and the control tasks.
struct Running {
    stop: Arc<AtomicBool>,
    shutdown_tx: watch::Sender<bool>,
    tx: mpsc::Sender<ControlRequest>,
    task_handles: Vec<JoinHandle<()>>,
    gen_handle: std::thread::JoinHandle<()>,
}

impl Running {
    async fn shutdown(self) {
        self.stop.store(true, Ordering::Relaxed);
        let _ = self.shutdown_tx.send(true);
        drop(self.tx);
        tokio::time::sleep(Duration::from_millis(400)).await;

        for handle in &self.task_handles {
            if !handle.is_finished() {
                handle.abort();
            }
        }
        for handle in self.task_handles {
            let _ = handle.await;
        }
        let gen_handle = self.gen_handle;
        if !matches!(
            tokio::task::spawn_blocking(move || gen_handle.join()).await,
            Ok(Ok(()))
        ) {
            warn!("Generator thread did not shut down cleanly");
        }
    }
}

/// Wait for `signal` or the generator exiting, then stop everything. A
/// signal error is returned only after the generator thread has joined.
async fn run_until_stopped<S>(
    signal: S,
    done_rx: oneshot::Receiver<()>,
    running: Running,
) -> io::Result<()>
where
    S: Future<Output = io::Result<()>>,
{
    let result = tokio::select! {
        res = signal => {
            match &res {
                Ok(()) => info!("Ctrl+C received, shutting down"),
                Err(e) => error!("Failed to listen for Ctrl+C: {}", e),
            }
            res
        }
        _ = done_rx => {
            info!("Generator exited, shutting down");
            Ok(())
        }
    };
    running.shutdown().await;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use mpx_core::{MpxLevels, MPX_SAMPLE_RATE};

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["mpx-server"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn overrides_apply_on_top_of_file() {
        let mut cfg = ServerConfig::default();
        let cli = cli(&[
            "--pi", "C201", "--ps", "RADIO", "--pty", "Rock Music", "--af", "97.3", "--af",
            "89.9", "--tp", "1", "-f", "s16", "--volume", "80", "--port", "5000",
        ]);
        apply_cli(&cli, &mut cfg).unwrap();
        assert_eq!(cfg.rds.pi.as_deref(), Some("C201"));
        assert_eq!(cfg.rds.ps, "RADIO");
        assert_eq!(cfg.rds.pty, 11);
        assert_eq!(cfg.rds.af, vec![97.3, 89.9]);
        assert!(cfg.rds.tp);
        assert_eq!(cfg.output.format, SampleFormat::S16);
        assert_eq!(cfg.mpx.output_volume, 80.0);
        assert!(cfg.control.listen_enabled);
        assert_eq!(cfg.control.port, 5000);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn tp_flag_can_clear_config_value() {
        let mut cfg = ServerConfig::default();
        cfg.rds.tp = true;
        apply_cli(&cli(&["--tp", "0"]), &mut cfg).unwrap();
        assert!(!cfg.rds.tp);

        apply_cli(&cli(&["--pty", "10"]), &mut cfg).unwrap();
        assert!(!cfg.rds.tp);

        apply_cli(&cli(&["--tp", "true"]), &mut cfg).unwrap();
        assert!(cfg.rds.tp);
        assert!(Cli::try_parse_from(["mpx-server", "--tp", "maybe"]).is_err());
    }

    #[test]
    fn rds2_flag_defaults_to_one_stream() {
        let mut cfg = ServerConfig::default();
        apply_cli(&cli(&["--rds2"]), &mut cfg).unwrap();
        assert_eq!(cfg.rds.variant, EncoderVariant::Rds2);
        assert_eq!(cfg.mpx.rds2_streams, 1);

        let encoder = build_encoder(&cfg).unwrap();
        assert_eq!(encoder.stream_count(), 2);
    }

    #[test]
    fn bad_overrides_are_rejected() {
        let mut cfg = ServerConfig::default();
        assert!(apply_cli(&cli(&["--pi", "nothex"]), &mut cfg).is_err());
        assert!(apply_cli(&cli(&["--pty", "polka"]), &mut cfg).is_err());
    }

    #[test]
    fn rft_stream_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0x5A; 1000]).unwrap();

        let mut cfg = ServerConfig::default();
        cfg.mpx.rds2_streams = 2;
        cfg.rft.push(config::RftConfig {
            stream: 2,
            path: file.path().to_path_buf(),
            channel: 1,
        });
        let encoder = build_encoder(&cfg).unwrap();
        assert_eq!(encoder.stream_count(), 3);
    }

    #[test]
    fn missing_rft_file() {
        let mut cfg = ServerConfig::default();
        cfg.mpx.rds2_streams = 1;
        cfg.rft.push(config::RftConfig {
            stream: 1,
            path: PathBuf::from("/nonexistent/logo.png"),
            channel: 0,
        });
        let err = build_encoder(&cfg).err().unwrap();
        assert!(err.to_string().contains("Failed to read RFT file"));
    }

    #[tokio::test]
    async fn signal_error_still_stops_generator() {
        let params = mpx_rds::EncoderParams {
            ps: "MPXGEN".into(),
            ..mpx_rds::EncoderParams::default()
        };
        let gen = Generator {
            encoder: RdsEncoder::new(&params).unwrap(),
            mpx: Mpx::new(MPX_SAMPLE_RATE, 1, false, &MpxLevels::default()).unwrap(),
            sink: PcmSink::new(Box::new(io::sink()), SampleFormat::F32, 64),
            frames_per_block: 64,
        };
        let (tx, rx) = mpsc::channel(1);
        let (state_tx, _state_rx) = watch::channel(gen.encoder.state().clone());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (done_tx, done_rx) = oneshot::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let gen_handle = generator::spawn_generator(
            gen,
            GeneratorLinks {
                control_rx: rx,
                state_tx,
                stop: Arc::clone(&stop),
                done_tx,
            },
        )
        .unwrap();
        let waiter = tokio::spawn(wait_for_shutdown(shutdown_rx));

        let running = Running {
            stop: Arc::clone(&stop),
            shutdown_tx,
            tx,
            task_handles: vec![waiter],
            gen_handle,
        };
        let failed = async { Err(io::Error::other("no signal handler")) };
        let res = run_until_stopped(failed, done_rx, running).await;

        assert!(res.is_err());
        assert!(stop.load(Ordering::Relaxed));
    }
}
