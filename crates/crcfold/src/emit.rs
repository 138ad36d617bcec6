//! Serializers for derived constant sets.
//!
//! One derivation ([`Crc32Fold::new`]), several output formats. Each
//! serializer writes to any [`fmt::Write`], so the same code fills a `String`
//! in tests and stdout in `crcfold-gen`.

use core::{fmt, str::FromStr};

use crate::{
  Crc32Fold,
  constants::{BLOCK_SIZE, BYTE_REVERSE, LONG_PAIRS, SHORT_QUADS},
  error::ParseParamsError,
  params::Convention,
};

/// Writes a context's tables in some textual format.
pub trait Emit {
  fn emit<W: fmt::Write>(&self, ctx: &Crc32Fold, out: &mut W) -> fmt::Result;
}

/// Output format selector for the generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Format {
  /// `.octa` assembler listing with a C byte table.
  #[default]
  Asm,
  /// Rust `const` items.
  Rust,
  /// C `static const` arrays.
  C,
}

impl Format {
  /// Write `ctx` in this format.
  pub fn emit<W: fmt::Write>(self, ctx: &Crc32Fold, out: &mut W) -> fmt::Result {
    match self {
      Self::Asm => Asm.emit(ctx, out),
      Self::Rust => RustSource.emit(ctx, out),
      Self::C => CHeader.emit(ctx, out),
    }
  }
}

impl FromStr for Format {
  type Err = ParseParamsError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim() {
      "asm" | "octa" => Ok(Self::Asm),
      "rust" | "rs" => Ok(Self::Rust),
      "c" | "h" => Ok(Self::C),
      _ => Err(ParseParamsError::UnknownFormat),
    }
  }
}

/// Suffix marking reflected values in comments.
fn mark(convention: Convention, shifted: bool) -> &'static str {
  match (convention, shifted) {
    (Convention::Normal, _) => "",
    (Convention::Reflected, false) => "`",
    (Convention::Reflected, true) => "` << 1",
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Assembler listing
// ─────────────────────────────────────────────────────────────────────────────

/// `.octa` listing: `#define`s, a byte table for C callers under
/// `#ifndef __ASSEMBLY__`, then the constant sections.
///
/// `.constants`, `.short_constants` and `.barrett_constants` follow the
/// classic vpmsum layout, including its reflected long pairs (see
/// [`FoldConstants::listing_long`](crate::constants::FoldConstants::listing_long)).
/// [`RustSource`] and [`CHeader`] write the engine's own pairs instead.
#[derive(Clone, Copy, Debug, Default)]
pub struct Asm;

impl Emit for Asm {
  fn emit<W: fmt::Write>(&self, ctx: &Crc32Fold, out: &mut W) -> fmt::Result {
    let p = ctx.params();
    let k = ctx.constants();
    let conv = p.convention;

    writeln!(out, "#define CRC {:#x}", p.poly)?;
    if p.invert {
      writeln!(out, "#define CRC_XOR")?;
    }
    if p.is_reflected() {
      writeln!(out, "#define REFLECT")?;
    }
    writeln!(out, "\n#ifndef __ASSEMBLY__")?;
    writeln!(out, "#ifdef CRC_TABLE")?;
    write!(out, "static const unsigned int crc_table[] = {{")?;
    write_table(out, ctx.table().entries(), "\n\t", " ", |out, v| write!(out, "{v:#010x},"))?;
    writeln!(out, "}};\n")?;
    writeln!(out, "#endif")?;
    writeln!(out, "#else")?;

    writeln!(out, "#define MAX_SIZE\t{BLOCK_SIZE}")?;
    writeln!(out, ".constants:")?;
    writeln!(out, "\n\t/* Reduce {} bits to 1024 bits */", BLOCK_SIZE * 8)?;
    let m = mark(conv, true);
    for idx in 0..LONG_PAIRS {
      let [(e0, v0), (e1, v1)] = k.listing_long(idx);
      writeln!(out, "\t/* x^{e0} mod p(x){m}, x^{e1} mod p(x){m} */")?;
      writeln!(out, "\t.octa 0x{v0:016x}{v1:016x}\n")?;
    }

    writeln!(out, ".short_constants:")?;
    writeln!(
      out,
      "\n\t/* Reduce final 1024-2048 bits to 64 bits, shifting 32 bits to include the trailing 32 bits of zeros */"
    )?;
    let m = mark(conv, false);
    for (idx, quad) in k.short.iter().enumerate() {
      let [e0, e1, e2, e3] = k.short_exponents(idx);
      writeln!(out, "\t/* x^{e0} mod p(x){m}, x^{e1} mod p(x){m}, x^{e2} mod p(x){m}, x^{e3} mod p(x){m} */")?;
      writeln!(out, "\t.octa 0x{:08x}{:08x}{:08x}{:08x}\n", quad[0], quad[1], quad[2], quad[3])?;
    }

    writeln!(out, "\n.barrett_constants:")?;
    let (width, m) = match conv {
      Convention::Normal => ("", ""),
      Convention::Reflected => ("33 bit reflected ", "`"),
    };
    writeln!(out, "\t/* {width}Barrett constant m - (4^32)/n */")?;
    writeln!(out, "\t.octa 0x{:032x}\t/* x^64 div p(x){m} */", k.barrett[0])?;
    writeln!(out, "\t/* {width}Barrett constant n */")?;
    writeln!(out, "\t.octa 0x{:032x}", k.barrett[1])?;

    // Sections below are extensions; consumers of the classic layout skip them.
    writeln!(out, "\n.final_fold_constants:")?;
    let m = mark(conv, true);
    writeln!(out, "\t/* x^96 mod p(x){m}, x^64 mod p(x){m} */")?;
    writeln!(out, "\t.octa 0x{:016x}{:016x}", k.final_fold[0], k.final_fold[1])?;

    writeln!(out, "\n.byteswap_constant:")?;
    writeln!(out, "\t/* byte reverse permute constant */")?;
    writeln!(out, "\t.octa 0x{BYTE_REVERSE:032x}")?;

    writeln!(out, "#endif")
  }
}

/// Four entries per row, `first` before each row and `sep` between entries.
fn write_table<W: fmt::Write>(
  out: &mut W,
  table: &[u32; 256],
  first: &str,
  sep: &str,
  mut entry: impl FnMut(&mut W, u32) -> fmt::Result,
) -> fmt::Result {
  for (i, &v) in table.iter().enumerate() {
    out.write_str(if i % 4 == 0 { first } else { sep })?;
    entry(out, v)?;
  }
  Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Rust source
// ─────────────────────────────────────────────────────────────────────────────

/// `pub const` items that mirror [`FoldConstants`](crate::constants::FoldConstants).
#[derive(Clone, Copy, Debug, Default)]
pub struct RustSource;

impl Emit for RustSource {
  fn emit<W: fmt::Write>(&self, ctx: &Crc32Fold, out: &mut W) -> fmt::Result {
    let p = ctx.params();
    let k = ctx.constants();

    writeln!(out, "//! Generated by crcfold-gen: {p}.\n")?;
    writeln!(out, "pub const POLY: u32 = {:#010x};", p.poly)?;
    writeln!(out, "pub const REFLECTED: bool = {};", p.is_reflected())?;
    writeln!(out, "pub const INVERT: bool = {};", p.invert)?;
    writeln!(out, "pub const BLOCK_SIZE: usize = {BLOCK_SIZE};\n")?;

    write!(out, "pub const CRC_TABLE: [u32; 256] = [")?;
    write_table(out, ctx.table().entries(), "\n  ", " ", |out, v| write!(out, "{v:#010x},"))?;
    writeln!(out, "\n];\n")?;

    writeln!(out, "pub const LONG: [[u64; 2]; {LONG_PAIRS}] = [")?;
    for (idx, pair) in k.long.iter().enumerate() {
      let [e0, e1] = k.long_exponents(idx);
      writeln!(out, "  [{:#011x}, {:#011x}], // x^{e0}, x^{e1}", pair[0], pair[1])?;
    }
    writeln!(out, "];\n")?;

    writeln!(out, "pub const SHORT: [[u64; 4]; {SHORT_QUADS}] = [")?;
    for (idx, quad) in k.short.iter().enumerate() {
      let [e0, e1, e2, e3] = k.short_exponents(idx);
      writeln!(
        out,
        "  [{:#010x}, {:#010x}, {:#010x}, {:#010x}], // x^{e0}, x^{e1}, x^{e2}, x^{e3}",
        quad[0], quad[1], quad[2], quad[3]
      )?;
    }
    writeln!(out, "];\n")?;

    writeln!(out, "pub const FINAL_FOLD: [u64; 2] = [{:#x}, {:#x}];", k.final_fold[0], k.final_fold[1])?;
    writeln!(out, "pub const BARRETT: [u64; 2] = [{:#x}, {:#x}];", k.barrett[0], k.barrett[1])?;
    writeln!(out, "pub const BYTE_REVERSE: u128 = {BYTE_REVERSE:#034x};")
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// C header
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default)]
pub struct CHeader;

impl Emit for CHeader {
  fn emit<W: fmt::Write>(&self, ctx: &Crc32Fold, out: &mut W) -> fmt::Result {
    let p = ctx.params();
    let k = ctx.constants();

    writeln!(out, "/* Generated by crcfold-gen: {p}. */")?;
    writeln!(out, "#define CRC {:#x}", p.poly)?;
    if p.invert {
      writeln!(out, "#define CRC_XOR")?;
    }
    if p.is_reflected() {
      writeln!(out, "#define REFLECT")?;
    }
    writeln!(out, "#define MAX_SIZE {BLOCK_SIZE}\n")?;

    write!(out, "static const unsigned int crc_table[256] = {{")?;
    write_table(out, ctx.table().entries(), "\n\t", " ", |out, v| write!(out, "{v:#010x},"))?;
    writeln!(out, "\n}};\n")?;

    writeln!(out, "static const unsigned long long fold_long[{LONG_PAIRS}][2] = {{")?;
    for pair in &k.long {
      writeln!(out, "\t{{ {:#x}ULL, {:#x}ULL }},", pair[0], pair[1])?;
    }
    writeln!(out, "}};\n")?;

    writeln!(out, "static const unsigned long long fold_short[{SHORT_QUADS}][4] = {{")?;
    for quad in &k.short {
      writeln!(out, "\t{{ {:#x}ULL, {:#x}ULL, {:#x}ULL, {:#x}ULL }},", quad[0], quad[1], quad[2], quad[3])?;
    }
    writeln!(out, "}};\n")?;

    let [f0, f1] = k.final_fold;
    writeln!(out, "static const unsigned long long final_fold[2] = {{ {f0:#x}ULL, {f1:#x}ULL }};")?;
    let [m, n] = k.barrett;
    writeln!(out, "static const unsigned long long barrett[2] = {{ {m:#x}ULL, {n:#x}ULL }};")
  }
}
