use super::common::Float;
use hexf::hexf64;

pub const ONE_MINUS_EPSILON: Float = hexf64!("0x1.fffffffffffffp-1");

pub const PCG32_DEFAULT_STATE: u64 = 0x853c49e6748fea9b;
pub const PCG32_DEFAULT_STREAM: u64 = 0xda3e39cb94b95bdb;
pub const PCG32_MULT: u64 = 0x5851f42d4c957f2d;

/// PCG pseudo-random number generator. Each render worker owns one, seeded
/// per row, so sample streams are reproducible and independent of how rows
/// are distributed across workers.
#[derive(Debug, Copy, Clone)]
pub struct Rng {
    state: u64,
    inc: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Rng {
        let mut rng = Rng {
            state: PCG32_DEFAULT_STATE,
            inc: PCG32_DEFAULT_STREAM,
        };
        rng.set_sequence(seed);
        rng
    }

    pub fn set_sequence(&mut self, initseq: u64) {
        self.state = 0;
        self.inc = initseq.wrapping_shl(1) | 1;
        self.uniform_u32();
        self.state = self.state.wrapping_add(PCG32_DEFAULT_STATE);
        self.uniform_u32();
    }

    pub fn uniform_u32(&mut self) -> u32 {
        let oldstate = self.state;
        self.state = oldstate.wrapping_mul(PCG32_MULT).wrapping_add(self.inc);
        let xorshifted = ((oldstate >> 18) ^ oldstate).wrapping_shr(27) as u32;
        let rot = (oldstate >> 59) as u32;
        xorshifted.wrapping_shr(rot) | xorshifted.wrapping_shl(rot.wrapping_neg() & 31)
    }

    /// A uniform draw in [0, 1).
    pub fn uniform_float(&mut self) -> Float {
        (self.uniform_u32() as Float * hexf64!("0x1.0p-32")).min(ONE_MINUS_EPSILON)
    }

    /// A uniform draw in [min, max).
    pub fn uniform_in_range(&mut self, min: Float, max: Float) -> Float {
        min + (max - min) * self.uniform_float()
    }
}

impl Default for Rng {
    fn default() -> Rng {
        Rng {
            state: PCG32_DEFAULT_STATE,
            inc: PCG32_DEFAULT_STREAM,
        }
    }
}
