use roadstream_common::Color;

pub const ROAD: Color = Color::hex(0x333333);
pub const SIDEWALK: Color = Color::hex(0x999999);
pub const CURB: Color = Color::hex(0x888888);
pub const MARKING: Color = Color::hex(0xffffff);
pub const GROUND: Color = Color::hex(0x333333);

pub const BUILDING_BODY: [Color; 4] = [
    Color::hex(0x607d8b),
    Color::hex(0x455a64),
    Color::hex(0x37474f),
    Color::hex(0x263238),
];

/// Lit window colours. Unlit windows are black.
pub const WINDOW_LIT: [Color; 3] = [
    Color::hex(0xfffde7),
    Color::hex(0xe8f5e9),
    Color::hex(0x90a4ae),
];

pub const TRUNK: Color = Color::hex(0x4a2f21);
pub const FOLIAGE: [Color; 3] = [
    Color::hex(0x2e7d32),
    Color::hex(0x388e3c),
    Color::hex(0x43a047),
];
pub const BUSH: Color = Color::hex(0x2e7d32);
pub const BENCH_SEAT: Color = Color::hex(0x8b4513);
pub const BENCH_LEG: Color = Color::hex(0x654321);

pub const LAMP_POST: Color = Color::hex(0xaaaaaa);
pub const LAMP_LIGHT: Color = Color::hex(0xffffe0);

pub const CLOTHING: [Color; 2] = [Color::hex(0x2196f3), Color::hex(0xf44336)];
pub const SKIN: Color = Color::hex(0xffe0b2);

pub const VEHICLE: Color = Color::hex(0xff0000);
