use super::Clmul;

/// Software multiplier. Always available.
#[derive(Clone, Copy, Debug, Default)]
pub struct Portable;

impl Clmul for Portable {
  const NAME: &'static str = "portable";

  #[inline(always)]
  fn clmul(self, a: u64, b: u64) -> u128 {
    // Operands here are at most 64×33 bits; iterate over the narrower one.
    if b.leading_zeros() < a.leading_zeros() {
      crate::gf2::clmul(b, a)
    } else {
      crate::gf2::clmul(a, b)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn operand_order_is_irrelevant() {
    let a = 0x8000_0000_0000_0001;
    let b = 0x1_DB71_0641;
    assert_eq!(Portable.clmul(a, b), Portable.clmul(b, a));
    assert_eq!(Portable.clmul(a, b), crate::gf2::clmul(a, b));
  }

  #[test]
  fn pair_multiplies_each_half_by_its_key() {
    assert_eq!(Portable.clmul_pair(1, 0xABCD, 0x1234), 0xABCD);
    assert_eq!(Portable.clmul_pair(1 << 64, 0xABCD, 0x1234), 0x1234);
    assert_eq!(Portable.clmul_pair(0b11 | (0b11 << 64), 0b11, 0b1), 0b101 ^ 0b11);
  }
}
