// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! ASCII command parser.
//!
//! Every text payload is converted to its fixed-size RDS form here, so the
//! generation thread only ever copies validated values.

use std::str::FromStr;

use mpx_rds::{
    pty_code, tags_from_fields, AfList, EnhancedText, LongPs, PsText, PtynText, RadioText,
    RdsCommand, RdsError, Region, RtPlusTag, TagSet, DI_MAX, PTY_MAX,
};

use crate::error::ParseError;
use crate::types::{ControlCommand, CARRIER_LEVELS};

/// Parse one control line. `region` selects the PTY name table and the
/// AF band plan used for validation.
pub fn parse_command(line: &str, region: Region) -> Result<ControlCommand, ParseError> {
    let line = line.trim_end_matches(['\r', '\n']).trim_start();
    if line.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    let (name, arg) = match line.split_once(' ') {
        Some((name, arg)) => (name, Some(arg)),
        None => (line, None),
    };
    let name = name.to_ascii_uppercase();

    let rds = |cmd: RdsCommand| -> Result<ControlCommand, ParseError> {
        Ok(ControlCommand::Rds(cmd))
    };

    match name.as_str() {
        "STATUS" => match arg.map(str::trim).filter(|a| !a.is_empty()) {
            None => Ok(ControlCommand::Status),
            Some(_) => Err(ParseError::UnexpectedArgument("STATUS")),
        },
        "PI" => rds(RdsCommand::SetPi(parse_hex(required("PI", arg)?)?)),
        "PS" => rds(RdsCommand::SetPs(PsText::new(required("PS", arg)?)?)),
        "RT" => rds(RdsCommand::SetRt(RadioText::new(required("RT", arg)?)?)),
        "TA" => rds(RdsCommand::SetTa(parse_flag("TA", arg)?)),
        "TP" => rds(RdsCommand::SetTp(parse_flag("TP", arg)?)),
        "MS" => rds(RdsCommand::SetMs(parse_flag("MS", arg)?)),
        "CT" => rds(RdsCommand::SetClockTime(parse_flag("CT", arg)?)),
        "DI" => {
            let di: u8 = parse_number("DI", required("DI", arg)?)?;
            if di > DI_MAX {
                return Err(RdsError::DiOutOfRange(di).into());
            }
            rds(RdsCommand::SetDi(di))
        }
        "PTY" => rds(RdsCommand::SetPty(parse_pty(required("PTY", arg)?, region)?)),
        "PTYN" => {
            let text = optional_text(required("PTYN", arg)?);
            rds(RdsCommand::SetPtyn(PtynText::new(text)?))
        }
        "AF" => {
            let value = required("AF", arg)?.trim();
            if value == "-" {
                return rds(RdsCommand::ClearAf);
            }
            let freq: f32 = parse_number("AF", value)?;
            AfList::new(region).add(freq)?;
            rds(RdsCommand::AddAf(freq))
        }
        "RTP" => rds(RdsCommand::SetRtPlusTags(parse_tags("RTP", arg)?)),
        "RTPF" => {
            let (running, toggle) = parse_tag_flags("RTPF", arg)?;
            rds(RdsCommand::SetRtPlusFlags { running, toggle })
        }
        "LPS" => {
            let text = optional_text(required("LPS", arg)?);
            rds(RdsCommand::SetLps(LongPs::new(text)?))
        }
        "ERT" => {
            let text = optional_text(required("ERT", arg)?);
            rds(RdsCommand::SetErt(EnhancedText::new(text)?))
        }
        "ERTP" => rds(RdsCommand::SetErtPlusTags(parse_tags("ERTP", arg)?)),
        "ERTPF" => {
            let (running, toggle) = parse_tag_flags("ERTPF", arg)?;
            rds(RdsCommand::SetErtPlusFlags { running, toggle })
        }
        "MPX" => {
            let levels: [f32; CARRIER_LEVELS] = parse_list("MPX", required("MPX", arg)?)?;
            Ok(ControlCommand::CarrierVolumes(levels))
        }
        "VOL" => Ok(ControlCommand::OutputVolume(parse_number(
            "VOL",
            required("VOL", arg)?,
        )?)),
        _ => Err(ParseError::UnknownCommand(name)),
    }
}

fn required<'a>(field: &'static str, arg: Option<&'a str>) -> Result<&'a str, ParseError> {
    match arg {
        Some(arg) if !arg.trim().is_empty() => Ok(arg),
        _ => Err(ParseError::MissingArgument(field)),
    }
}

/// `-` switches an optional text field off.
fn optional_text(arg: &str) -> &str {
    if arg.trim() == "-" {
        ""
    } else {
        arg
    }
}

fn parse_number<T: FromStr>(field: &'static str, value: &str) -> Result<T, ParseError> {
    value.trim().parse().map_err(|_| ParseError::BadNumber {
        field,
        value: value.trim().to_string(),
    })
}

fn parse_hex(value: &str) -> Result<u16, ParseError> {
    let value = value.trim();
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    if digits.is_empty() || digits.len() > 4 {
        return Err(ParseError::BadHex(value.to_string()));
    }
    u16::from_str_radix(digits, 16).map_err(|_| ParseError::BadHex(value.to_string()))
}

fn parse_flag(field: &'static str, arg: Option<&str>) -> Result<bool, ParseError> {
    match required(field, arg)?.trim() {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(ParseError::BadNumber {
            field,
            value: other.to_string(),
        }),
    }
}

fn parse_pty(value: &str, region: Region) -> Result<u8, ParseError> {
    let value = value.trim();
    if value.chars().all(|c| c.is_ascii_digit()) {
        let pty: u8 = parse_number("PTY", value)?;
        if pty > PTY_MAX {
            return Err(RdsError::PtyOutOfRange(pty).into());
        }
        return Ok(pty);
    }
    pty_code(value, region).ok_or_else(|| ParseError::UnknownPty(value.to_string()))
}

fn parse_list<T: FromStr + Copy + Default, const N: usize>(
    field: &'static str,
    value: &str,
) -> Result<[T; N], ParseError> {
    let parts: Vec<&str> = value.split(',').collect();
    if parts.len() != N {
        return Err(ParseError::FieldCount {
            field,
            expected: N,
            found: parts.len(),
        });
    }
    let mut out = [T::default(); N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = parse_number(field, part)?;
    }
    Ok(out)
}

fn parse_tags(
    field: &'static str,
    arg: Option<&str>,
) -> Result<[RtPlusTag; 2], ParseError> {
    let fields: [u8; 6] = parse_list(field, required(field, arg)?)?;
    let tags = tags_from_fields(fields);
    TagSet::validate(&tags)?;
    Ok(tags)
}

fn parse_tag_flags(field: &'static str, arg: Option<&str>) -> Result<(bool, bool), ParseError> {
    let [running, toggle]: [u8; 2] = parse_list(field, required(field, arg)?)?;
    Ok((running != 0, toggle != 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<ControlCommand, ParseError> {
        parse_command(line, Region::Europe)
    }

    #[test]
    fn text_fields_keep_inner_spaces() {
        assert_eq!(
            parse("PS MPX GEN\n"),
            Ok(ControlCommand::Rds(RdsCommand::SetPs(
                PsText::new("MPX GEN").unwrap()
            )))
        );
        assert_eq!(
            parse("RT Hello World"),
            Ok(ControlCommand::Rds(RdsCommand::SetRt(
                RadioText::new("Hello World").unwrap()
            )))
        );
    }

    #[test]
    fn command_names_are_case_insensitive() {
        assert_eq!(
            parse("pi 0x3AAB"),
            Ok(ControlCommand::Rds(RdsCommand::SetPi(0x3AAB)))
        );
        assert_eq!(parse("status"), Ok(ControlCommand::Status));
    }

    #[test]
    fn pi_must_be_hex() {
        assert_eq!(parse("PI 1000"), Ok(ControlCommand::Rds(RdsCommand::SetPi(0x1000))));
        assert_eq!(parse("PI XYZ"), Err(ParseError::BadHex("XYZ".into())));
        assert_eq!(parse("PI 12345"), Err(ParseError::BadHex("12345".into())));
        assert_eq!(parse("PI"), Err(ParseError::MissingArgument("PI")));
    }

    #[test]
    fn flags_and_numbers() {
        assert_eq!(parse("TA 1"), Ok(ControlCommand::Rds(RdsCommand::SetTa(true))));
        assert_eq!(parse("MS 0"), Ok(ControlCommand::Rds(RdsCommand::SetMs(false))));
        assert!(matches!(parse("TP yes"), Err(ParseError::BadNumber { .. })));
        assert_eq!(parse("DI 9"), Ok(ControlCommand::Rds(RdsCommand::SetDi(9))));
        assert_eq!(
            parse("DI 16"),
            Err(ParseError::Invalid(RdsError::DiOutOfRange(16)))
        );
    }

    #[test]
    fn pty_by_number_or_name() {
        assert_eq!(parse("PTY 10"), Ok(ControlCommand::Rds(RdsCommand::SetPty(10))));
        assert_eq!(
            parse("PTY rock music"),
            Ok(ControlCommand::Rds(RdsCommand::SetPty(11)))
        );
        assert_eq!(
            parse_command("PTY Top 40", Region::NorthAmerica),
            Ok(ControlCommand::Rds(RdsCommand::SetPty(9)))
        );
        assert_eq!(
            parse("PTY 32"),
            Err(ParseError::Invalid(RdsError::PtyOutOfRange(32)))
        );
        assert_eq!(parse("PTY Polka"), Err(ParseError::UnknownPty("Polka".into())));
    }

    #[test]
    fn limits_match_encoder_state() {
        let mut state = mpx_rds::RdsState::default();
        for line in [format!("DI {DI_MAX}"), format!("PTY {PTY_MAX}")] {
            match parse(&line) {
                Ok(ControlCommand::Rds(cmd)) => assert_eq!(state.apply(cmd), Ok(())),
                other => panic!("{line}: {other:?}"),
            }
        }
        assert!(parse(&format!("DI {}", DI_MAX + 1)).is_err());
        assert!(parse(&format!("PTY {}", PTY_MAX + 1)).is_err());
    }

    #[test]
    fn dash_disables_optional_text() {
        assert_eq!(
            parse("PTYN -"),
            Ok(ControlCommand::Rds(RdsCommand::SetPtyn(PtynText::default())))
        );
        assert_eq!(
            parse("ERT -"),
            Ok(ControlCommand::Rds(RdsCommand::SetErt(EnhancedText::default())))
        );
        assert_eq!(
            parse("LPS -"),
            Ok(ControlCommand::Rds(RdsCommand::SetLps(LongPs::default())))
        );
    }

    #[test]
    fn af_add_and_clear() {
        assert_eq!(parse("AF 97.3"), Ok(ControlCommand::Rds(RdsCommand::AddAf(97.3))));
        assert_eq!(parse("AF -"), Ok(ControlCommand::Rds(RdsCommand::ClearAf)));
        assert_eq!(
            parse("AF 150.0"),
            Err(ParseError::Invalid(RdsError::InvalidAfFrequency(150.0)))
        );
        assert!(matches!(parse("AF abc"), Err(ParseError::BadNumber { .. })));
    }

    #[test]
    fn rt_plus_tags_and_flags() {
        assert_eq!(
            parse("RTP 4,0,10,1,13,5"),
            Ok(ControlCommand::Rds(RdsCommand::SetRtPlusTags([
                RtPlusTag {
                    content_type: 4,
                    start: 0,
                    len: 10
                },
                RtPlusTag {
                    content_type: 1,
                    start: 13,
                    len: 5
                },
            ])))
        );
        assert_eq!(
            parse("RTP 4,0,10"),
            Err(ParseError::FieldCount {
                field: "RTP",
                expected: 6,
                found: 3
            })
        );
        assert_eq!(
            parse("ERTP 1,0,0,1,0,40"),
            Err(ParseError::Invalid(RdsError::TagOutOfRange {
                index: 5,
                value: 40
            }))
        );
        assert_eq!(
            parse("RTPF 1,0"),
            Ok(ControlCommand::Rds(RdsCommand::SetRtPlusFlags {
                running: true,
                toggle: false
            }))
        );
    }

    #[test]
    fn mixer_levels() {
        assert_eq!(
            parse("MPX 9,9,9.5,9.5,10"),
            Ok(ControlCommand::CarrierVolumes([9.0, 9.0, 9.5, 9.5, 10.0]))
        );
        assert_eq!(parse("VOL 80"), Ok(ControlCommand::OutputVolume(80.0)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse(""), Err(ParseError::Empty));
        assert_eq!(parse("   \n"), Err(ParseError::Empty));
        assert_eq!(parse("FOO bar"), Err(ParseError::UnknownCommand("FOO".into())));
        assert_eq!(
            parse("PS WAYTOOLONG"),
            Err(ParseError::Invalid(RdsError::TextTooLong {
                field: "PS",
                max: 8
            }))
        );
        assert_eq!(parse("STATUS now"), Err(ParseError::UnexpectedArgument("STATUS")));
    }
}
