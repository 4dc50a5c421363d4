//! The SI unit catalogue

use super::dispenser::{Prefix, UnitDispenser};
use super::unit::UnitSpec;

/// SI prefixes from yotta to yocto
fn si_prefixes() -> Vec<Prefix> {
    vec![
        Prefix::new("yotta", "Y", 1e24),
        Prefix::new("zetta", "Z", 1e21),
        Prefix::new("exa", "E", 1e18),
        Prefix::new("peta", "P", 1e15),
        Prefix::new("tera", "T", 1e12),
        Prefix::new("giga", "G", 1e9),
        Prefix::new("mega", "M", 1e6),
        Prefix::new("kilo", "k", 1e3),
        Prefix::new("milli", "m", 1e-3),
        Prefix::new("micro", "µ", 1e-6),
        Prefix::new("nano", "n", 1e-9),
        Prefix::new("pico", "p", 1e-12),
        Prefix::new("femto", "f", 1e-15),
        Prefix::new("atto", "a", 1e-18),
        Prefix::new("zepto", "z", 1e-21),
        Prefix::new("yocto", "y", 1e-24),
    ]
}

/// (name, abbreviation, relative scale, dimensions)
type Entry = (&'static str, &'static str, f64, &'static [(&'static str, i64)]);

const LENGTH: &[(&str, i64)] = &[("length", 1)];
const TIME: &[(&str, i64)] = &[("time", 1)];
const PRESSURE: &[(&str, i64)] = &[("mass", 1), ("length", -1), ("time", -2)];
const ENERGY: &[(&str, i64)] = &[("mass", 1), ("length", 2), ("time", -2)];
const FLUX_DENSITY: &[(&str, i64)] = &[("mass", 1), ("current", -1), ("time", -2)];
const VOLUME: &[(&str, i64)] = &[("length", 3)];

// Registration order matters: a later entry takes over any abbreviation an
// earlier prefixed variant claimed ("min" is the minute, not the milli-inch).
const CATALOGUE: &[Entry] = &[
    ("metre", "m", 1.0, LENGTH),
    ("second", "s", 1.0, TIME),
    ("gram", "g", 1e-3, &[("mass", 1)]),
    ("ampere", "A", 1.0, &[("current", 1)]),
    ("kelvin", "K", 1.0, &[("temperature", 1)]),
    ("mole", "mol", 1.0, &[("substance", 1)]),
    ("candela", "cd", 1.0, &[("intensity", 1)]),
    ("dollar", "$", 1.0, &[("currency", 1)]),
    // Scales
    ("angstrom", "Å", 1e-10, LENGTH),
    ("astronomical unit", "au", 149597870691.0, LENGTH),
    ("lightyear", "ly", 9460730472580800.0, LENGTH),
    // Imperial scales
    ("mile", "mi", 201168.0 / 125.0, LENGTH),
    ("yard", "yd", 0.9144, LENGTH),
    ("foot", "ft", 381.0 / 1250.0, LENGTH),
    ("inch", "in", 127.0 / 5000.0, LENGTH),
    ("point", "pt", 1.27 / 5000.0, LENGTH),
    ("mmHg", "mmHg", 101325.0 / 760.0, PRESSURE),
    // Time
    ("year", "year", 3944615652.0 / 125.0, TIME),
    ("day", "day", 86400.0, TIME),
    ("hour", "h", 3600.0, TIME),
    ("minute", "min", 60.0, TIME),
    ("hertz", "Hz", 1.0, &[("time", -1)]),
    // Force and pressure
    ("newton", "N", 1.0, &[("mass", 1), ("length", 1), ("time", -2)]),
    ("atm", "atm", 101325.0, PRESSURE),
    ("bar", "bar", 100000.0, PRESSURE),
    ("pascal", "Pa", 1.0, PRESSURE),
    ("psi", "psi", 6894.757, PRESSURE),
    // Energy and power
    ("joule", "J", 1.0, ENERGY),
    ("calorie", "cal", 4.1868, ENERGY),
    ("electronvolt", "eV", 1.602176487e-19, ENERGY),
    ("watt", "W", 1.0, &[("mass", 1), ("length", 2), ("time", -3)]),
    // Electromagnetism
    ("coulomb", "C", 1.0, &[("current", 1), ("time", 1)]),
    ("farad", "F", 1.0, &[("time", 4), ("current", 2), ("length", -2), ("mass", -1)]),
    ("henry", "H", 1.0, &[("mass", 1), ("length", 2), ("time", -2), ("current", -2)]),
    ("volt", "V", 1.0, &[("mass", 1), ("length", 2), ("current", -1), ("time", -3)]),
    ("ohm", "Ω", 1.0, &[("mass", 1), ("length", 2), ("time", -3), ("current", -2)]),
    ("siemens", "mho", 1.0, &[("mass", -1), ("length", -2), ("time", 3), ("current", 2)]),
    ("tesla", "T", 1.0, FLUX_DENSITY),
    ("gauss", "G", 1e-4, FLUX_DENSITY),
    // Volume
    ("litre", "L", 0.001, VOLUME),
    ("gallon", "gal", 4.0 * 473176473.0 / 125000000000.0, VOLUME),
    ("quart", "qt", 473176473.0 / 125000000000.0, VOLUME),
    ("weber", "Wb", 1.0, &[("length", 2), ("mass", 1), ("time", -2), ("current", -1)]),
];

const ALIASES: &[(&str, &str)] = &[("metre", "meter"), ("litre", "liter")];

const PLURALS: &[(&str, &str)] = &[("foot", "feet"), ("inch", "inches")];

fn catalogue_spec(&(name, abbr, rel, dimensions): &Entry) -> UnitSpec {
    let mut spec = dimensions
        .iter()
        .fold(UnitSpec::new(name, abbr, rel), |spec, &(dimension, exponent)| {
            spec.dimension(dimension, exponent)
        });
    for &(_, alias) in ALIASES.iter().filter(|(unit, _)| *unit == name) {
        spec = spec.alias(alias);
    }
    for &(_, plural) in PLURALS.iter().filter(|(unit, _)| *unit == name) {
        spec = spec.plural(plural);
    }
    spec
}

impl UnitDispenser {
    /// The standard SI catalogue
    ///
    /// Includes the SI prefixes, the seven base units (with `kg` as the mass
    /// basis), common derived, imperial and electromagnetic units, and the
    /// non-prefixable dimensionless `constant` unit.
    ///
    /// # Examples
    ///
    /// ```
    /// use scaled_params::units::UnitDispenser;
    ///
    /// let si = UnitDispenser::si();
    /// let mt = si.get("mT").unwrap();
    /// let t = si.get("T").unwrap();
    /// assert!((mt.scale(&t).unwrap() - 1e-3).abs() < 1e-15);
    /// assert_eq!(si.basis_unit("mass").unwrap().name(), "kilogram");
    /// ```
    pub fn si() -> Self {
        let mut dispenser = UnitDispenser::with_prefixes(si_prefixes());
        dispenser.mark_si();

        let constant = UnitSpec::new("constant", "", 1.0)
            .alias("non-dim")
            .not_prefixable();
        let specs = std::iter::once(constant).chain(CATALOGUE.iter().map(catalogue_spec));

        for spec in specs {
            if let Err(err) = dispenser.add(spec) {
                log::warn!("skipping SI unit: {}", err);
            }
        }
        if let Err(err) = dispenser.set_basis("mass", "kg") {
            log::warn!("could not set SI mass basis: {}", err);
        }
        dispenser
    }
}
