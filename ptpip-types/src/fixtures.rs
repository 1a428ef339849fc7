//! Captures from a Sony DSC-RX100M7

pub(crate) const SONY_DEVICE_INFO_HEX: &str = "
    64 00 11 00 00 00 64 00 14 53 00 6f 00 6e 00 79 00 20 00 50 00 54 00 50 00 20 00 45 00
    78 00 74 00 65 00 6e 00 73 00 69 00 6f 00 6e 00 73 00 00 00 00 00 1b 00 00 00 01 10 02
    10 03 10 04 10 05 10 06 10 07 10 08 10 09 10 0a 10 0d 10 1b 10 01 92 02 92 05 92 07 92
    09 92 0a 92 0b 92 0c 92 0d 92 0e 92 0f 92 01 98 02 98 03 98 05 98 0c 00 00 00 01 c2 02
    c2 03 c2 04 c2 05 c2 06 c2 07 c2 08 c2 09 c2 0a c2 0b c2 0c c2 00 00 00 00 00 00 00 00
    03 00 00 00 01 38 01 b3 01 b1 11 53 00 6f 00 6e 00 79 00 20 00 43 00 6f 00 72 00 70 00
    6f 00 72 00 61 00 74 00 69 00 6f 00 6e 00 00 00 0c 44 00 53 00 43 00 2d 00 52 00 58 00
    31 00 30 00 30 00 4d 00 37 00 00 00 05 31 00 2e 00 30 00 30 00 00 00 21 30 00 30 00 30
    00 30 00 30 00 30 00 30 00 30 00 30 00 30 00 30 00 30 00 30 00 30 00 30 00 30 00 38 00
    30 00 38 00 31 00 38 00 38 00 36 00 30 00 30 00 32 00 38 00 39 00 35 00 32 00 35 00 31
    00 00 00";

pub(crate) const SONY_EXT_INFO_HEX: &str = "
    2c 01 4e 00 00 00 05 50 07 50 0a 50 0b 50 0c 50 0e 50 10 50 13 50 00 d2 01 d2 03 d2
    0d d2 0e d2 0f d2 10 d2 11 d2 13 d2 14 d2 15 d2 17 d2 18 d2 1b d2 1c d2 1d d2 1e d2
    21 d2 22 d2 23 d2 2a d2 2c d2 31 d2 35 d2 36 d2 39 d2 3a d2 3b d2 3c d2 3d d2 3e d2
    3f d2 40 d2 41 d2 42 d2 43 d2 44 d2 45 d2 46 d2 47 d2 48 d2 49 d2 4a d2 4c d2 4e d2
    4f d2 50 d2 51 d2 52 d2 53 d2 54 d2 55 d2 59 d2 5a d2 5b d2 5c d2 5d d2 5f d2 60 d2
    61 d2 62 d2 63 d2 64 d2 67 d2 69 d2 6a d2 71 d2 72 d2 73 d2 78 d2 17 00 00 00 c1 d2
    c2 d2 c3 d2 c7 d2 c8 d2 c9 d2 ca d2 cd d2 ce d2 cf d2 d0 d2 d1 d2 d2 d2 d4 d2 d5 d2
    d6 d2 d7 d2 d8 d2 d9 d2 da d2 db d2 dc d2 dd d2";
