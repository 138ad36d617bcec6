//! Internal macros for preset hasher types.

/// Generate a streaming CRC-32 hasher bound to a shared preset context.
///
/// This macro creates:
/// - The struct definition with `crc: u32` (a finished checksum value)
/// - `context()` and `backend_name()` accessors
/// - `Checksum` trait implementation
///
/// # Arguments
///
/// - `$name`: The type name (e.g., `Crc32IsoHdlc`)
/// - `$context`: Function returning the `&'static Crc32Fold` (e.g., `reduce::iso_hdlc`)
macro_rules! define_crc32_type {
  (
    $(#[$outer:meta])*
    $vis:vis struct $name:ident {
      context: $context:path,
    }
  ) => {
    $(#[$outer])*
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    $vis struct $name {
      crc: u32,
    }

    impl $name {
      /// The shared context this hasher folds with.
      #[inline]
      #[must_use]
      pub fn context() -> &'static $crate::Crc32Fold {
        $context()
      }

      /// Name of the process-wide folding backend.
      #[must_use]
      pub fn backend_name() -> &'static str {
        $crate::dispatch::selected_backend()
      }
    }

    impl $crate::Checksum for $name {
      const OUTPUT_SIZE: usize = 4;
      type Output = u32;

      #[inline]
      fn new() -> Self {
        Self { crc: 0 }
      }

      #[inline]
      fn with_initial(initial: u32) -> Self {
        Self { crc: initial }
      }

      #[inline]
      fn update(&mut self, data: &[u8]) {
        self.crc = Self::context().reduce(self.crc, data);
      }

      #[inline]
      fn finalize(&self) -> u32 {
        self.crc
      }

      #[inline]
      fn reset(&mut self) {
        self.crc = 0;
      }
    }
  };
}
