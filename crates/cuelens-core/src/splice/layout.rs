pub const TABLE_ID: u8 = 0xFC;

pub const SECTION_HEADER_LEN: usize = 3;
pub const CRC_LEN: usize = 4;
pub const TIME_FIELD_LEN: usize = 5;

pub const CMD_SPLICE_NULL: u8 = 0x00;
pub const CMD_SPLICE_SCHEDULE: u8 = 0x04;
pub const CMD_SPLICE_INSERT: u8 = 0x05;
pub const CMD_BANDWIDTH_RESERVATION: u8 = 0x06;
pub const CMD_TIME_SIGNAL: u8 = 0x07;
pub const CMD_PRIVATE: u8 = 0xFF;

pub const TAG_AVAIL: u8 = 0x00;
pub const TAG_DTMF: u8 = 0x01;
pub const TAG_SEGMENTATION: u8 = 0x02;
pub const TAG_TIME: u8 = 0x03;
pub const TAG_AUDIO: u8 = 0x04;

pub const TICKS_PER_SECOND: u64 = 90_000;
