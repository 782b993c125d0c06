//! Static vocabulary for header and content recognition.
//!
//! BoQ spreadsheets circulate in Serbian Latin, Serbian Cyrillic and English,
//! with a long tail of abbreviations per column. The tables here collect the
//! spellings observed in real workbooks; the mapper and the header locator do
//! exact membership tests against them after normalization.

use regex::Regex;
use std::sync::LazyLock;

/// The six canonical BoQ columns.
///
/// Variant order doubles as the matching priority when one header token is
/// listed under more than one field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Field {
    PositionId,
    Description,
    Unit,
    Quantity,
    UnitPrice,
    TotalPrice,
}

/// Known header spellings per canonical field, in matching priority order.
pub(crate) const COLUMN_VARIANTS: &[(Field, &[&str])] = &[
    (
        Field::PositionId,
        &[
            "redni broj",
            "r.br",
            "r. br.",
            "rb",
            "r-b",
            "red. br.",
            "pozicija",
            "poz.",
            "poz",
            "item no",
            "item",
            "no",
            "№",
            "бр.",
            "редни број",
            "ред. бр.",
            "поз.",
            "позиција",
        ],
    ),
    (
        Field::Description,
        &[
            "opis",
            "opis radova",
            "naziv",
            "naziv radova",
            "radovi",
            "description",
            "desc",
            "item description",
            "опис",
            "опис радова",
            "назив",
        ],
    ),
    (
        Field::Unit,
        &[
            "jm",
            "jedinica",
            "jedinica mere",
            "jed. mera",
            "jed. m.",
            "j.m.",
            "unit",
            "uom",
            "јединица",
            "јед. мера",
            "јм",
        ],
    ),
    (
        Field::Quantity,
        &[
            "količina",
            "kol.",
            "količ.",
            "količina [jm]",
            "qty",
            "quantity",
            "количина",
            "кол.",
        ],
    ),
    (
        Field::UnitPrice,
        &[
            "jedinična cena",
            "jed. cena",
            "jed.čena",
            "jedinicna cena",
            "jc",
            "cena/jm",
            "unit price",
            "rate",
            "јединична цена",
            "јед. цена",
        ],
    ),
    (
        Field::TotalPrice,
        &[
            "iznos",
            "ukupno",
            "vrednost",
            "amount",
            "total",
            "subtotal",
            "сума",
            "износ",
            "укупно",
            "вредност",
        ],
    ),
];

/// Unit-of-measure tokens accepted in the unit column.
pub(crate) const ALLOWED_UNITS: &[&str] = &[
    "m", "m2", "m3", "kg", "t", "kom", "set", "par", "dan", "h", "č", "km", "l", "kwh", "g",
    "pak", "rol", "pal", "voz", "sat", "mes", "god",
];

/// Substrings marking subtotal/total rows, which are never line items.
pub(crate) const TOTAL_MARKERS: &[&str] = &["ukupno", "sum", "zbir", "total"];

/// Position codes are dot/dash-delimited integer sequences, e.g. "3.2.1".
static POSITION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:[.\-]\d+)*$").expect("position code pattern"));

/// Tests a normalized token against the unit vocabulary.
pub(crate) fn is_allowed_unit(token: &str) -> bool {
    ALLOWED_UNITS.contains(&token)
}

/// Tests a normalized token against the position-code pattern.
pub(crate) fn is_position_code(token: &str) -> bool {
    !token.is_empty() && POSITION_PATTERN.is_match(token)
}

/// Tests whether a normalized cell value marks a subtotal/total row.
pub(crate) fn contains_total_marker(token: &str) -> bool {
    TOTAL_MARKERS.iter().any(|marker| token.contains(marker))
}
