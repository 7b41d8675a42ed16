// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Configuration file support for mpx-server.
//!
//! Config is loaded from the `[mpx-server]` section of `mpx-rs.toml`.
//! Default search order:
//! 1. Path specified via `--config` CLI argument
//! 2. `./mpx-rs.toml`
//! 3. `~/.config/mpx-rs/mpx-rs.toml`
//! 4. `/etc/mpx-rs/mpx-rs.toml`

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use mpx_app::ConfigFile;
use mpx_core::{MpxLevels, MAX_CARRIER_VOLUME, MAX_STREAMS, MPX_SAMPLE_RATE, RDS_BIT_RATE};
use mpx_rds::{callsign_to_pi, EncoderParams, EncoderVariant, GroupVersion, Region};

use crate::output::{SampleFormat, STDOUT_PATH};

/// Top-level server configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Station content
    pub rds: RdsConfig,
    /// Signal levels and RDS2 streams
    pub mpx: MpxConfig,
    /// PCM sink
    pub output: OutputConfig,
    /// Control pipe and TCP listener
    pub control: ControlConfig,
    /// Files carried on RDS2 streams
    #[serde(rename = "rft", default)]
    pub rft: Vec<RftConfig>,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: Option<String>,
}

/// Initial station content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RdsConfig {
    /// PI code as hex, e.g. "C201"
    pub pi: Option<String>,
    /// RBDS call sign; derives the PI code (north_america only)
    pub callsign: Option<String>,
    pub region: Region,
    /// "rds" or "rds2" (adds Long PS, eRT and eRT+)
    pub variant: EncoderVariant,
    /// Version of the basic tuning group ("A" carries AFs)
    pub basic_tuning: GroupVersion,
    pub ps: String,
    pub rt: String,
    pub pty: u8,
    pub ptyn: String,
    pub tp: bool,
    pub ta: bool,
    pub ms: bool,
    pub di: u8,
    /// Send clock time groups
    pub ct: bool,
    /// Alternative frequencies, MHz for FM and kHz for LF/MF
    pub af: Vec<f32>,
    /// Two RT+ tags as type, start, length, type, start, length
    pub rtplus_tags: [u8; 6],
    pub lps: String,
    pub ert: String,
    pub ertplus_tags: [u8; 6],
}

impl Default for RdsConfig {
    fn default() -> Self {
        Self {
            pi: Some("1000".to_string()),
            callsign: None,
            region: Region::Europe,
            variant: EncoderVariant::Rds,
            basic_tuning: GroupVersion::A,
            ps: "MPXGEN".to_string(),
            rt: String::new(),
            pty: 0,
            ptyn: String::new(),
            tp: false,
            ta: false,
            ms: true,
            di: 1,
            ct: true,
            af: Vec::new(),
            rtplus_tags: [0; 6],
            lps: String::new(),
            ert: String::new(),
            ertplus_tags: [0; 6],
        }
    }
}

/// Signal generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MpxConfig {
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Frames generated and written per block
    pub frames_per_block: usize,
    /// Output level in percent
    pub output_volume: f32,
    /// 19 kHz pilot level in percent
    pub pilot_volume: f32,
    /// 57 kHz RDS level in percent
    pub rds_volume: f32,
    /// RDS2 carrier levels in percent
    pub rds2_volumes: [f32; 3],
    /// Number of RDS2 streams (0..=3)
    pub rds2_streams: usize,
    /// Phase-shift RDS2 carriers by 90/180/270 degrees
    pub quadrature: bool,
}

impl Default for MpxConfig {
    fn default() -> Self {
        let levels = MpxLevels::default();
        Self {
            sample_rate: MPX_SAMPLE_RATE,
            frames_per_block: 1024,
            output_volume: levels.output,
            pilot_volume: levels.pilot,
            rds_volume: levels.rds,
            rds2_volumes: levels.rds2,
            rds2_streams: 0,
            quadrature: false,
        }
    }
}

impl MpxConfig {
    pub fn levels(&self) -> MpxLevels {
        MpxLevels {
            pilot: self.pilot_volume,
            rds: self.rds_volume,
            rds2: self.rds2_volumes,
            output: self.output_volume,
        }
    }
}

/// PCM sink configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File path, or "-" for stdout
    pub path: String,
    pub format: SampleFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: STDOUT_PATH.to_string(),
            format: SampleFormat::F32,
        }
    }
}

/// Control transports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// FIFO to read commands from
    pub pipe: Option<PathBuf>,
    /// Whether the TCP listener is enabled
    pub listen_enabled: bool,
    /// IP address to listen on
    pub listen: IpAddr,
    /// TCP port
    pub port: u16,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            pipe: None,
            listen_enabled: false,
            listen: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 4540,
        }
    }
}

/// One file broadcast with RFT on an RDS2 stream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RftConfig {
    /// RDS2 stream index (1..=3)
    pub stream: usize,
    pub path: PathBuf,
    /// RFT pipe (0..=15)
    pub channel: u8,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), String> {
        validate_log_level(self.general.log_level.as_deref())?;
        self.rds.pi_code()?;

        if self.rds.pty > 31 {
            return Err("[rds].pty must be in range 0..=31".to_string());
        }
        if self.rds.di > 15 {
            return Err("[rds].di must be in range 0..=15".to_string());
        }

        if !whole_samples_per_bit(self.mpx.sample_rate) {
            return Err(format!(
                "[mpx].sample_rate {} is not a whole multiple of {} Hz",
                self.mpx.sample_rate, RDS_BIT_RATE
            ));
        }
        if self.mpx.frames_per_block == 0 {
            return Err("[mpx].frames_per_block must be > 0".to_string());
        }
        if !(0.0..=100.0).contains(&self.mpx.output_volume) {
            return Err("[mpx].output_volume must be in range 0..=100".to_string());
        }
        let carrier_levels = [self.mpx.pilot_volume, self.mpx.rds_volume]
            .into_iter()
            .chain(self.mpx.rds2_volumes);
        for level in carrier_levels {
            if level < 0.0 {
                return Err("[mpx] carrier volumes must not be negative".to_string());
            }
        }
        if self.mpx.rds2_streams > MAX_STREAMS - 1 {
            return Err(format!(
                "[mpx].rds2_streams must be in range 0..={}",
                MAX_STREAMS - 1
            ));
        }

        if self.output.path.trim().is_empty() {
            return Err("[output].path must not be empty".to_string());
        }

        if let Some(pipe) = &self.control.pipe {
            if pipe.as_os_str().is_empty() {
                return Err("[control].pipe must not be empty".to_string());
            }
        }
        if self.control.listen_enabled && self.control.port == 0 {
            return Err("[control].port must be > 0 when listener is enabled".to_string());
        }

        let mut used = [false; MAX_STREAMS];
        for rft in &self.rft {
            if rft.stream == 0 || rft.stream > self.mpx.rds2_streams {
                return Err(format!(
                    "[[rft]].stream {} must be in range 1..={} ([mpx].rds2_streams)",
                    rft.stream, self.mpx.rds2_streams
                ));
            }
            if std::mem::replace(&mut used[rft.stream], true) {
                return Err(format!("[[rft]].stream {} is used twice", rft.stream));
            }
            if rft.channel > 15 {
                return Err("[[rft]].channel must be in range 0..=15".to_string());
            }
            if rft.path.as_os_str().is_empty() {
                return Err("[[rft]].path must not be empty".to_string());
            }
        }
        Ok(())
    }

    /// Generate an example configuration wrapped under the `[mpx-server]`
    /// section header, suitable for use in a combined `mpx-rs.toml` file.
    pub fn example_combined_toml() -> String {
        #[derive(serde::Serialize)]
        struct Wrapper {
            #[serde(rename = "mpx-server")]
            inner: ServerConfig,
        }
        let example = ServerConfig {
            general: GeneralConfig {
                log_level: Some("info".to_string()),
            },
            rds: RdsConfig {
                pi: Some("C201".to_string()),
                ps: "MPXGEN".to_string(),
                rt: "Hello World".to_string(),
                pty: 10,
                af: vec![97.3, 89.9],
                ..RdsConfig::default()
            },
            mpx: MpxConfig::default(),
            output: OutputConfig::default(),
            control: ControlConfig {
                pipe: Some(PathBuf::from("/tmp/mpx-ctl")),
                listen_enabled: true,
                ..ControlConfig::default()
            },
            rft: Vec::new(),
        };
        toml::to_string_pretty(&Wrapper { inner: example }).unwrap_or_default()
    }
}

impl RdsConfig {
    /// PI code from the call sign (RBDS) or the hex `pi` field.
    pub fn pi_code(&self) -> Result<u16, String> {
        if let Some(callsign) = &self.callsign {
            if self.region != Region::NorthAmerica {
                return Err("[rds].callsign requires region = \"north_america\"".to_string());
            }
            return callsign_to_pi(callsign).map_err(|e| format!("[rds].callsign: {}", e));
        }
        match self.pi.as_deref() {
            Some(pi) => parse_pi(pi),
            None => Err("[rds].pi or [rds].callsign must be set".to_string()),
        }
    }

    pub fn encoder_params(&self) -> Result<EncoderParams, String> {
        Ok(EncoderParams {
            region: self.region,
            variant: self.variant,
            basic_tuning: self.basic_tuning,
            pi: self.pi_code()?,
            ps: self.ps.clone(),
            rt: self.rt.clone(),
            pty: self.pty,
            ptyn: self.ptyn.clone(),
            tp: self.tp,
            ta: self.ta,
            ms: self.ms,
            di: self.di,
            clock_time: self.ct,
            af: self.af.clone(),
            rtplus: self.rtplus_tags,
            lps: self.lps.clone(),
            ert: self.ert.clone(),
            ertplus: self.ertplus_tags,
        })
    }
}

/// Parse a 16-bit hex PI code, with or without `0x`.
pub fn parse_pi(s: &str) -> Result<u16, String> {
    let digits = s
        .trim()
        .trim_start_matches("0x")
        .trim_start_matches("0X");
    if digits.is_empty() || digits.len() > 4 {
        return Err(format!("PI '{}' must be 1 to 4 hex digits", s));
    }
    u16::from_str_radix(digits, 16).map_err(|e| format!("Invalid PI '{}': {}", s, e))
}

/// 1187.5 Hz must divide the sample rate.
fn whole_samples_per_bit(sample_rate: u32) -> bool {
    let twice = u64::from(sample_rate) * 2;
    let twice_bit_rate = (RDS_BIT_RATE * 2.0) as u64;
    sample_rate > 0 && twice % twice_bit_rate == 0
}

fn validate_log_level(level: Option<&str>) -> Result<(), String> {
    if let Some(level) = level {
        match level {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(format!(
                    "[general].log_level '{}' is invalid (expected one of: trace, debug, info, warn, error)",
                    level
                ))
            }
        }
    }
    Ok(())
}

impl ConfigFile for ServerConfig {
    fn section_key() -> &'static str {
        "mpx-server"
    }
}

/// Whether the mixer will clamp any of the configured carrier levels.
pub fn exceeds_carrier_ceiling(levels: &MpxLevels) -> bool {
    levels.carriers().iter().any(|l| *l > MAX_CARRIER_VOLUME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.rds.pi_code(), Ok(0x1000));
        assert_eq!(config.rds.ps, "MPXGEN");
        assert!(config.rds.ms);
        assert_eq!(config.mpx.sample_rate, 190_000);
        assert_eq!(config.mpx.rds2_streams, 0);
        assert_eq!(config.output.path, "-");
        assert_eq!(config.output.format, SampleFormat::F32);
        assert!(!config.control.listen_enabled);
        assert!(config.control.pipe.is_none());
        assert!(config.rft.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[general]
log_level = "debug"

[rds]
pi = "0xC201"
ps = "RADIO"
rt = "Now playing"
pty = 10
tp = true
af = [97.3, 531.0]
rtplus_tags = [4, 0, 10, 1, 13, 5]
variant = "rds2"
lps = "Radio Długa Nazwa"

[mpx]
sample_rate = 228000
rds2_streams = 2
quadrature = true
rds2_volumes = [5.0, 5.0, 5.0]

[output]
path = "/tmp/mpx.raw"
format = "s16"

[control]
pipe = "/tmp/mpx-ctl"
listen_enabled = true
port = 5000

[[rft]]
stream = 2
path = "logo.png"
channel = 3
"#;

        let config: ServerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level.as_deref(), Some("debug"));
        assert_eq!(config.rds.pi_code(), Ok(0xC201));
        assert_eq!(config.rds.variant, EncoderVariant::Rds2);
        assert_eq!(config.rds.af, vec![97.3, 531.0]);
        assert_eq!(config.mpx.rds2_streams, 2);
        assert_eq!(config.output.format, SampleFormat::S16);
        assert_eq!(config.control.port, 5000);
        assert_eq!(config.rft.len(), 1);
        assert_eq!(config.rft[0].channel, 3);
        assert!(config.validate().is_ok());

        let params = config.rds.encoder_params().unwrap();
        assert_eq!(params.pi, 0xC201);
        assert_eq!(params.rtplus, [4, 0, 10, 1, 13, 5]);
        assert!(params.clock_time);
    }

    #[test]
    fn test_section_lookup() {
        let doc = "[mpx-server.rds]\nps = \"KLUB\"\n\n[other]\nx = 1\n";
        let config = ServerConfig::from_toml_str(doc).unwrap();
        assert_eq!(config.rds.ps, "KLUB");
    }

    #[test]
    fn test_callsign_needs_north_america() {
        let mut config = ServerConfig::default();
        config.rds.callsign = Some("KXYZ".to_string());
        assert!(config.validate().is_err());

        config.rds.region = Region::NorthAmerica;
        assert!(config.validate().is_ok());
        assert_eq!(config.rds.pi_code(), callsign_to_pi("KXYZ").map_err(|e| e.to_string()));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ServerConfig::default();
        config.mpx.sample_rate = 44_100;
        assert!(config.validate().unwrap_err().contains("[mpx].sample_rate"));

        let mut config = ServerConfig::default();
        config.rds.pi = Some("12345".to_string());
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.rds.pty = 32;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.mpx.rds2_streams = 4;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.general.log_level = Some("loud".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rft_streams_must_exist_once() {
        let mut config = ServerConfig::default();
        config.rft.push(RftConfig {
            stream: 1,
            path: PathBuf::from("a.bin"),
            channel: 0,
        });
        assert!(config.validate().is_err());

        config.mpx.rds2_streams = 1;
        assert!(config.validate().is_ok());

        config.rft.push(config.rft[0].clone());
        assert!(config.validate().unwrap_err().contains("used twice"));
    }

    #[test]
    fn test_carrier_ceiling() {
        let mut mpx = MpxConfig::default();
        assert!(!exceeds_carrier_ceiling(&mpx.levels()));
        mpx.rds2_volumes[2] = 20.0;
        assert!(exceeds_carrier_ceiling(&mpx.levels()));
    }

    #[test]
    fn test_parse_pi() {
        assert_eq!(parse_pi("C201"), Ok(0xC201));
        assert_eq!(parse_pi("0x00ff"), Ok(0x00FF));
        assert!(parse_pi("").is_err());
        assert!(parse_pi("XYZ").is_err());
    }

    #[test]
    fn test_sample_rates() {
        assert!(whole_samples_per_bit(190_000));
        assert!(whole_samples_per_bit(228_000));
        assert!(!whole_samples_per_bit(48_000));
        assert!(!whole_samples_per_bit(0));
    }

    #[test]
    fn test_example_round_trips() {
        let example = ServerConfig::example_combined_toml();
        assert!(example.contains("[mpx-server.rds]"));
        let config = ServerConfig::from_toml_str(&example).unwrap();
        assert_eq!(config.rds.pi_code(), Ok(0xC201));
        assert!(config.validate().is_ok());
    }
}
