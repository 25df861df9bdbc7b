//! Element symbol → display color lookup.
//!
//! Colors are the Jmol palette as packed `0xRRGGBB` integers. The table is
//! frozen: it is built once on first use and never mutated.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use crate::error::TrajviewError;

/// Jmol element colors, keyed by uppercase symbol.
const ELEMENT_COLORS: &[(&str, u32)] = &[
    ("H", 0xFF_FFFF),
    ("D", 0xFF_FFC0),
    ("HE", 0xD9_FFFF),
    ("LI", 0xCC_80FF),
    ("BE", 0xC2_FF00),
    ("B", 0xFF_B5B5),
    ("C", 0x90_9090),
    ("N", 0x30_50F8),
    ("O", 0xFF_0D0D),
    ("F", 0x90_E050),
    ("NE", 0xB3_E3F5),
    ("NA", 0xAB_5CF2),
    ("MG", 0x8A_FF00),
    ("AL", 0xBF_A6A6),
    ("SI", 0xF0_C8A0),
    ("P", 0xFF_8000),
    ("S", 0xFF_FF30),
    ("CL", 0x1F_F01F),
    ("AR", 0x80_D1E3),
    ("K", 0x8F_40D4),
    ("CA", 0x3D_FF00),
    ("SC", 0xE6_E6E6),
    ("TI", 0xBF_C2C7),
    ("V", 0xA6_A6AB),
    ("CR", 0x8A_99C7),
    ("MN", 0x9C_7AC7),
    ("FE", 0xE0_6633),
    ("CO", 0xF0_90A0),
    ("NI", 0x50_D050),
    ("CU", 0xC8_8033),
    ("ZN", 0x7D_80B0),
    ("GA", 0xC2_8F8F),
    ("GE", 0x66_8F8F),
    ("AS", 0xBD_80E3),
    ("SE", 0xFF_A100),
    ("BR", 0xA6_2929),
    ("KR", 0x5C_B8D1),
    ("RB", 0x70_2EB0),
    ("SR", 0x00_FF00),
    ("Y", 0x94_FFFF),
    ("ZR", 0x94_E0E0),
    ("NB", 0x73_C2C9),
    ("MO", 0x54_B5B5),
    ("TC", 0x3B_9E9E),
    ("RU", 0x24_8F8F),
    ("RH", 0x0A_7D8C),
    ("PD", 0x00_6985),
    ("AG", 0xC0_C0C0),
    ("CD", 0xFF_D98F),
    ("IN", 0xA6_7573),
    ("SN", 0x66_8080),
    ("SB", 0x9E_63B5),
    ("TE", 0xD4_7A00),
    ("I", 0x94_0094),
    ("XE", 0x42_9EB0),
    ("CS", 0x57_178F),
    ("BA", 0x00_C900),
    ("LA", 0x70_D4FF),
    ("CE", 0xFF_FFC7),
    ("PR", 0xD9_FFC7),
    ("ND", 0xC7_FFC7),
    ("PM", 0xA3_FFC7),
    ("SM", 0x8F_FFC7),
    ("EU", 0x61_FFC7),
    ("GD", 0x45_FFC7),
    ("TB", 0x30_FFC7),
    ("DY", 0x1F_FFC7),
    ("HO", 0x00_FF9C),
    ("ER", 0x00_E675),
    ("TM", 0x00_D452),
    ("YB", 0x00_BF38),
    ("LU", 0x00_AB24),
    ("HF", 0x4D_C2FF),
    ("TA", 0x4D_A6FF),
    ("W", 0x21_94D6),
    ("RE", 0x26_7DAB),
    ("OS", 0x26_6696),
    ("IR", 0x17_5487),
    ("PT", 0xD0_D0E0),
    ("AU", 0xFF_D123),
    ("HG", 0xB8_B8D0),
    ("TL", 0xA6_544D),
    ("PB", 0x57_5961),
    ("BI", 0x9E_4FB5),
    ("PO", 0xAB_5C00),
    ("AT", 0x75_4F45),
    ("RN", 0x42_8296),
    ("FR", 0x42_0066),
    ("RA", 0x00_7D00),
    ("AC", 0x70_ABFA),
    ("TH", 0x00_BAFF),
    ("PA", 0x00_A1FF),
    ("U", 0x00_8FFF),
    ("NP", 0x00_80FF),
    ("PU", 0x00_6BFF),
    ("AM", 0x54_5CF2),
    ("CM", 0x78_5CE3),
    ("BK", 0x8A_4FE3),
    ("CF", 0xA1_36D4),
    ("ES", 0xB3_1FD4),
    ("FM", 0xB3_1FBA),
    ("MD", 0xB3_0DA6),
    ("NO", 0xBD_0D87),
    ("LR", 0xC7_0066),
    ("RF", 0xCC_0059),
    ("DB", 0xD1_004F),
    ("SG", 0xD9_0045),
    ("BH", 0xE0_0038),
    ("HS", 0xE6_002E),
    ("MT", 0xEB_0026),
];

static COLOR_TABLE: LazyLock<FxHashMap<&'static str, u32>> =
    LazyLock::new(|| ELEMENT_COLORS.iter().copied().collect());

/// Display color for an element symbol, as `0xRRGGBB`.
///
/// The lookup is case-insensitive and ignores surrounding whitespace.
/// Symbols absent from the table are an error; there is no default color.
pub fn element_color(symbol: &str) -> Result<u32, TrajviewError> {
    let key = symbol.trim().to_ascii_uppercase();
    COLOR_TABLE
        .get(key.as_str())
        .copied()
        .ok_or_else(|| TrajviewError::UnknownElement(symbol.to_owned()))
}

/// Split a packed `0xRRGGBB` color into normalized `[r, g, b]` floats.
#[must_use]
pub fn rgb_components(color: u32) -> [f32; 3] {
    let channel = |shift: u32| ((color >> shift) & 0xFF) as f32 / 255.0;
    [channel(16), channel(8), channel(0)]
}
