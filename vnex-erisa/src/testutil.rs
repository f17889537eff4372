//! Test-side bit writer mirroring the MSB-first stream layout.

/// Accumulates bits MSB-first into bytes, with gamma-code support.
#[derive(Default)]
pub(crate) struct BitSink {
    bytes: Vec<u8>,
    bit: u8,
}

impl BitSink {
    pub fn push_bit(&mut self, bit: u8) {
        if self.bit == 0 {
            self.bytes.push(0);
        }
        if bit != 0 {
            *self.bytes.last_mut().unwrap() |= 1 << (7 - self.bit);
        }
        self.bit = (self.bit + 1) % 8;
    }

    pub fn push_bits(&mut self, value: u64, count: u32) {
        for i in (0..count).rev() {
            self.push_bit(((value >> i) & 1) as u8);
        }
    }

    pub fn push_gamma(&mut self, value: u64) {
        assert!(value >= 1);
        let bits = 64 - value.leading_zeros();
        for _ in 1..bits {
            self.push_bit(0);
        }
        self.push_bits(value, bits);
    }

    pub fn align(&mut self) {
        self.bit = 0;
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
