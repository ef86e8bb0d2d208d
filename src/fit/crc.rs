//! FIT CRC-16 (nibble-table variant of CRC-16/ARC).

const CRC_TABLE: [u16; 16] = [
    0x0000, 0xCC01, 0xD801, 0x1400, 0xF001, 0x3C00, 0x2800, 0xE401, 0xA001, 0x6C00, 0x7800, 0xB401,
    0x5000, 0x9C01, 0x8801, 0x4400,
];

/// Fold `bytes` into a running CRC.
pub fn update(crc: u16, bytes: &[u8]) -> u16 {
    bytes.iter().fold(crc, |crc, &byte| {
        // lower nibble
        let tmp = CRC_TABLE[(crc & 0xF) as usize];
        let crc = ((crc >> 4) & 0x0FFF) ^ tmp ^ CRC_TABLE[(byte & 0xF) as usize];
        // upper nibble
        let tmp = CRC_TABLE[(crc & 0xF) as usize];
        ((crc >> 4) & 0x0FFF) ^ tmp ^ CRC_TABLE[((byte >> 4) & 0xF) as usize]
    })
}

/// CRC of a complete byte slice.
pub fn checksum(bytes: &[u8]) -> u16 {
    update(0, bytes)
}
