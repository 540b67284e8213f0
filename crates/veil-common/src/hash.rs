//! CRC-32 name hashing.
//!
//! IEEE 802.3 polynomial in reflected form (`0xEDB88320`), initial value and
//! final xor `0xFFFFFFFF`. This is the checksum used by zlib and PNG, so
//! values can be cross-checked with any standard tool.
//!
//! The function is `const` so hashed names can be baked into constants at the
//! call site and never recomputed at runtime.

const POLYNOMIAL: u32 = 0xEDB8_8320;

const TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 {
                POLYNOMIAL ^ (crc >> 1)
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// CRC-32 of `bytes`.
pub const fn crc32(bytes: &[u8]) -> u32 {
    let mut crc = !0u32;
    let mut i = 0;
    while i < bytes.len() {
        let index = ((crc ^ bytes[i] as u32) & 0xFF) as usize;
        crc = TABLE[index] ^ (crc >> 8);
        i += 1;
    }
    !crc
}
