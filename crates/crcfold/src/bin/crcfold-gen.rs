//! Folding-constant generator.
//!
//! Derives the constant tables for a CRC-32 polynomial and prints them in one
//! of the [`Format`]s. Set `RUST_LOG=debug` to see derivation details.

use std::{
  env,
  io::{self, Write},
  process::ExitCode,
};

use crcfold::{Crc32Fold, Crc32Params, emit::Format, params::parse_poly};

#[derive(Clone, Debug, Default)]
struct Args {
  reflect: bool,
  invert: bool,
  format: Format,
  poly: Option<String>,
}

fn parse_args() -> Result<Args, String> {
  let mut args = Args::default();
  let mut it = env::args().skip(1);
  while let Some(arg) = it.next() {
    match arg.as_str() {
      "--" => continue,
      "-r" | "--reflect" => args.reflect = true,
      "-x" | "--xor" => args.invert = true,
      "-rx" | "-xr" => {
        args.reflect = true;
        args.invert = true;
      }
      "-f" | "--format" => {
        let Some(value) = it.next() else {
          return Err("--format requires a value".to_owned());
        };
        args.format = value.parse().map_err(|err| format!("--format {value}: {err}"))?;
      }
      "--help" | "-h" => {
        print_help();
        return Err(String::new());
      }
      other if other.starts_with('-') => return Err(format!("Unknown arg: {other}")),
      other => {
        if args.poly.replace(other.to_owned()).is_some() {
          return Err("expected exactly one CRC".to_owned());
        }
      }
    }
  }
  Ok(args)
}

fn print_help() {
  eprintln!(
    "\
crcfold-gen: derive CRC-32 folding constants

USAGE:
  crcfold-gen [-r] [-x] [--format asm|rust|c] CRC

ARGS:
  CRC                     Polynomial without the top bit (0x04C11DB7 or decimal),
                          or a preset name (iso-hdlc, bzip2, iscsi)

OPTIONS:
  -r, --reflect           Bit-reflected (LSB-first) variant
  -x, --xor               Invert the register on input and output
  -f, --format <fmt>      asm (default), rust or c
"
  );
}

fn resolve(args: &Args) -> Result<Crc32Params, String> {
  let Some(text) = args.poly.as_deref() else {
    print_help();
    return Err("missing CRC".to_owned());
  };

  if let Some(preset) = Crc32Params::preset(text) {
    if args.reflect || args.invert {
      log::warn!("-r/-x ignored for preset {}", preset.name);
    }
    return Ok(preset);
  }

  let poly = parse_poly(text).map_err(|err| format!("{text}: {err}"))?;
  Ok(Crc32Params::custom(poly, args.reflect, args.invert))
}

fn run(args: &Args) -> Result<(), String> {
  let params = resolve(args)?;
  log::info!("generating {:?} constants for {params}", args.format);

  let ctx = Crc32Fold::new(params);
  let mut out = String::new();
  args.format.emit(&ctx, &mut out).map_err(|err| format!("formatting failed: {err}"))?;

  io::stdout().lock().write_all(out.as_bytes()).map_err(|err| format!("write failed: {err}"))
}

fn main() -> ExitCode {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

  let args = match parse_args() {
    Ok(args) => args,
    Err(msg) => {
      if msg.is_empty() {
        return ExitCode::SUCCESS;
      }
      eprintln!("{msg}");
      return ExitCode::FAILURE;
    }
  };

  match run(&args) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("crcfold-gen: {err}");
      ExitCode::FAILURE
    }
  }
}
